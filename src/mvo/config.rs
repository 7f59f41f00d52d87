//! MVO configuration and the WEP/TDR schedules.

use super::types::Normalization;
use crate::iteration::StopCriteria;
use crate::selection::Selection;

/// Configuration for the Multi-Verse Optimizer.
///
/// # Examples
///
/// ```
/// use u_heuristic::mvo::{MvoConfig, Normalization};
/// use u_heuristic::selection::Selection;
///
/// let config = MvoConfig::default()
///     .with_universe_amount(60)
///     .with_wep(0.2, 1.0)
///     .with_normalization(Normalization::MinMax)
///     .with_selection(Selection::Tournament(3))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MvoConfig {
    /// Population size.
    pub universe_amount: usize,

    /// Number of solutions returned (elite capacity).
    pub solution_amount: usize,

    /// Wormhole existence probability at the start of the run.
    pub min_wep: f64,

    /// Wormhole existence probability at the end of the run.
    pub max_wep: f64,

    /// Picks the white hole a dimension value is pulled from.
    pub selection: Selection,

    /// Turns fitness scores into white-hole rates.
    pub normalization: Normalization,

    pub criteria: StopCriteria,

    /// Evaluate universes in parallel (requires the `parallel` feature).
    pub parallel: bool,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for MvoConfig {
    fn default() -> Self {
        Self {
            universe_amount: 100,
            solution_amount: 1,
            min_wep: 0.2,
            max_wep: 1.0,
            selection: Selection::Roulette,
            normalization: Normalization::Sum,
            criteria: StopCriteria::default(),
            parallel: false,
            seed: None,
        }
    }
}

impl MvoConfig {
    pub fn with_universe_amount(mut self, n: usize) -> Self {
        self.universe_amount = n;
        self
    }

    pub fn with_solution_amount(mut self, n: usize) -> Self {
        self.solution_amount = n;
        self
    }

    pub fn with_wep(mut self, min: f64, max: f64) -> Self {
        self.min_wep = min;
        self.max_wep = max;
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn with_criteria(mut self, criteria: StopCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Wormhole existence probability at `progress` in `[0, 1]`.
    ///
    /// Linear from `min_wep` to `max_wep`.
    pub fn wep(&self, progress: f64) -> f64 {
        self.min_wep + (self.max_wep - self.min_wep) * progress
    }

    /// Travelling distance rate at `progress`: `1 - progress^(1/6)`.
    pub fn tdr(progress: f64) -> f64 {
        1.0 - progress.powf(1.0 / 6.0)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.universe_amount == 0 {
            return Err("universe_amount must be at least 1".into());
        }
        if self.solution_amount == 0 {
            return Err("solution_amount must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.min_wep) || !(0.0..=1.0).contains(&self.max_wep) {
            return Err(format!(
                "wep bounds must be in [0, 1], got [{}, {}]",
                self.min_wep, self.max_wep
            ));
        }
        if self.min_wep > self.max_wep {
            return Err(format!(
                "min_wep must not exceed max_wep, got {} > {}",
                self.min_wep, self.max_wep
            ));
        }
        self.selection.validate()
    }
}
