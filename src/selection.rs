//! Index selection over non-negative weights.
//!
//! Weights are "larger is better". MVO uses a selection to pick the white
//! hole a universe pulls a dimension value from.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use rand::Rng;

/// Strategy for drawing one index from a weight vector.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use u_heuristic::selection::Selection;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// let weights = [0.1, 0.7, 0.2];
/// assert_eq!(Selection::Rank.select(&weights, &mut rng), 1);
/// assert!(Selection::Roulette.select(&weights, &mut rng) < 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Fitness-proportionate draw.
    ///
    /// Falls back to a uniform draw when every weight is zero.
    #[default]
    Roulette,

    /// Deterministic: the index of the largest weight (first on ties).
    Rank,

    /// Draw `k` indices uniformly with replacement and keep the heaviest.
    Tournament(usize),

    /// Roulette over `exp(w / temperature)`.
    ///
    /// High temperatures flatten the distribution, low temperatures
    /// approach [`Selection::Rank`].
    Boltzmann {
        /// Must be positive.
        temperature: f64,
    },
}

impl Selection {
    /// Draws an index into `weights`.
    ///
    /// Negative and non-finite weights count as zero.
    ///
    /// # Panics
    /// Panics if `weights` is empty.
    pub fn select<R: Rng + ?Sized>(&self, weights: &[f64], rng: &mut R) -> usize {
        assert!(!weights.is_empty(), "cannot select from empty weights");

        match *self {
            Selection::Roulette => roulette(weights, rng),
            Selection::Rank => rank(weights),
            Selection::Tournament(k) => tournament(weights, k, rng),
            Selection::Boltzmann { temperature } => boltzmann(weights, temperature, rng),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        match *self {
            Selection::Tournament(0) => Err("tournament size must be at least 1".into()),
            Selection::Boltzmann { temperature } if !(temperature > 0.0 && temperature.is_finite()) => {
                Err(format!(
                    "boltzmann temperature must be positive and finite, got {temperature}"
                ))
            }
            _ => Ok(()),
        }
    }
}

fn sanitize(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

fn roulette<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    let n = weights.len();
    if n == 1 {
        return 0;
    }

    let total: f64 = weights.iter().map(|&w| sanitize(w)).sum();
    if !(total > 0.0 && total.is_finite()) {
        return rng.random_range(0..n);
    }

    let threshold = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += sanitize(w);
        if cumulative > threshold {
            return i;
        }
    }

    // floating-point fallback
    weights
        .iter()
        .rposition(|&w| sanitize(w) > 0.0)
        .unwrap_or(n - 1)
}

fn rank(weights: &[f64]) -> usize {
    let mut best = 0;
    for (i, &w) in weights.iter().enumerate().skip(1) {
        if sanitize(w) > sanitize(weights[best]) {
            best = i;
        }
    }
    best
}

fn tournament<R: Rng + ?Sized>(weights: &[f64], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = weights.len();

    let mut best = rng.random_range(0..n);
    for _ in 1..k {
        let i = rng.random_range(0..n);
        if sanitize(weights[i]) > sanitize(weights[best]) {
            best = i;
        }
    }
    best
}

fn boltzmann<R: Rng + ?Sized>(weights: &[f64], temperature: f64, rng: &mut R) -> usize {
    if !(temperature > 0.0 && temperature.is_finite()) {
        return rank(weights);
    }

    // Shift by the maximum so exp() cannot overflow.
    let max = weights.iter().map(|&w| sanitize(w)).fold(0.0, f64::max);
    let scaled: Vec<f64> = weights
        .iter()
        .map(|&w| ((sanitize(w) - max) / temperature).exp())
        .collect();
    roulette(&scaled, rng)
}
