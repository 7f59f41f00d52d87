//! Universes and white-hole rate normalization.

use crate::elite::Solution;

/// A candidate of the multi-verse: a position and its fitness.
pub type Universe<V> = Solution<V>;

/// Turns larger-is-better scores into white-hole rates in `[0, 1]`.
///
/// Non-finite scores (e.g. from a worst-possible fitness) are replaced by
/// the smallest finite score first, so they get the lowest rate.
///
/// # Examples
///
/// ```
/// use u_heuristic::mvo::Normalization;
///
/// let rates = Normalization::Sum.normalize(&[3.0, 1.0, 2.0]);
/// assert_eq!(rates, vec![2.0 / 3.0, 0.0, 1.0 / 3.0]);
///
/// let rates = Normalization::MinMax.normalize(&[3.0, 1.0, 2.0]);
/// assert_eq!(rates, vec![1.0, 0.0, 0.5]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Normalization {
    /// `(s - min) / sum(s - min)`; the rates sum to one.
    ///
    /// Uniform `1 / n` when all scores are equal.
    #[default]
    Sum,

    /// `(s - min) / (max - min)`; the best gets one, the worst zero.
    ///
    /// All ones when all scores are equal.
    MinMax,
}

impl Normalization {
    pub fn normalize(&self, scores: &[f64]) -> Vec<f64> {
        if scores.is_empty() {
            return Vec::new();
        }

        let finite_min = scores
            .iter()
            .copied()
            .filter(|s| s.is_finite())
            .fold(f64::INFINITY, f64::min);
        if !finite_min.is_finite() {
            return self.flat(scores.len());
        }

        let shifted: Vec<f64> = scores
            .iter()
            .map(|&s| if s.is_finite() { s - finite_min } else { 0.0 })
            .collect();

        match self {
            Normalization::Sum => {
                let total: f64 = shifted.iter().sum();
                if total > 0.0 && total.is_finite() {
                    shifted.iter().map(|s| s / total).collect()
                } else {
                    self.flat(scores.len())
                }
            }
            Normalization::MinMax => {
                let range = shifted.iter().copied().fold(0.0, f64::max);
                if range > 0.0 && range.is_finite() {
                    shifted.iter().map(|s| s / range).collect()
                } else {
                    self.flat(scores.len())
                }
            }
        }
    }

    fn flat(&self, n: usize) -> Vec<f64> {
        match self {
            Normalization::Sum => vec![1.0 / n as f64; n],
            Normalization::MinMax => vec![1.0; n],
        }
    }
}
