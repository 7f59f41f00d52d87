//! SAA configuration.

use crate::iteration::StopCriteria;

/// Direction of the random perturbation applied to a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Disturbance {
    /// `x + step * range * r` with `r` in `[0, 1)`: values only move up.
    #[default]
    Forward,

    /// `x + step * range * r` with `r` in `[-1, 1)`.
    Symmetric,
}

/// Configuration for Simulated Annealing over a callback model.
///
/// Temperature follows `T(k) = initial_temperature * gradient^k` where `k`
/// is the outer iteration; each outer iteration runs `markov_length`
/// perturbation trials.
///
/// # Examples
///
/// ```
/// use u_heuristic::saa::{Disturbance, SaaConfig};
///
/// let config = SaaConfig::default()
///     .with_temperatures(100.0, 1.0)
///     .with_gradient(0.95)
///     .with_markov_length(50)
///     .with_disturbance(Disturbance::Symmetric)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaaConfig {
    pub initial_temperature: f64,

    /// The run stops once the temperature is at or below this value.
    pub final_temperature: f64,

    /// Geometric cooling factor in (0, 1).
    pub gradient: f64,

    /// Perturbation trials per outer iteration.
    pub markov_length: usize,

    /// Perturbation size as a fraction of each dimension's range.
    pub step: f64,

    /// Factor applied to `step` whenever a new best is found.
    pub step_decay: f64,

    /// Number of distinct dimensions perturbed per trial.
    pub disturbance_amount: usize,

    pub disturbance: Disturbance,

    /// Starting candidates drawn from the model; the best one starts the
    /// trajectory.
    pub initial_amount: usize,

    /// Number of solutions returned (elite capacity).
    pub solution_amount: usize,

    pub criteria: StopCriteria,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            final_temperature: 1.0,
            gradient: 0.98,
            markov_length: 100,
            step: 0.5,
            step_decay: 0.99,
            disturbance_amount: 1,
            disturbance: Disturbance::Forward,
            initial_amount: 1,
            solution_amount: 1,
            criteria: StopCriteria::default(),
            seed: None,
        }
    }
}

impl SaaConfig {
    pub fn with_temperatures(mut self, initial: f64, last: f64) -> Self {
        self.initial_temperature = initial;
        self.final_temperature = last;
        self
    }

    pub fn with_gradient(mut self, gradient: f64) -> Self {
        self.gradient = gradient;
        self
    }

    pub fn with_markov_length(mut self, n: usize) -> Self {
        self.markov_length = n;
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn with_step_decay(mut self, decay: f64) -> Self {
        self.step_decay = decay;
        self
    }

    pub fn with_disturbance_amount(mut self, n: usize) -> Self {
        self.disturbance_amount = n;
        self
    }

    pub fn with_disturbance(mut self, disturbance: Disturbance) -> Self {
        self.disturbance = disturbance;
        self
    }

    pub fn with_initial_amount(mut self, n: usize) -> Self {
        self.initial_amount = n;
        self
    }

    pub fn with_solution_amount(mut self, n: usize) -> Self {
        self.solution_amount = n;
        self
    }

    pub fn with_criteria(mut self, criteria: StopCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.initial_temperature > 0.0 && self.initial_temperature.is_finite()) {
            return Err(format!(
                "initial_temperature must be positive and finite, got {}",
                self.initial_temperature
            ));
        }
        if !(self.final_temperature >= 0.0) {
            return Err(format!(
                "final_temperature must be non-negative, got {}",
                self.final_temperature
            ));
        }
        if self.final_temperature >= self.initial_temperature {
            return Err("final_temperature must be less than initial_temperature".into());
        }
        if !(self.gradient > 0.0 && self.gradient < 1.0) {
            return Err(format!("gradient must be in (0, 1), got {}", self.gradient));
        }
        if self.markov_length == 0 {
            return Err("markov_length must be at least 1".into());
        }
        if !(self.step > 0.0 && self.step.is_finite()) {
            return Err(format!("step must be positive and finite, got {}", self.step));
        }
        if !(self.step_decay > 0.0 && self.step_decay <= 1.0) {
            return Err(format!("step_decay must be in (0, 1], got {}", self.step_decay));
        }
        if self.disturbance_amount == 0 {
            return Err("disturbance_amount must be at least 1".into());
        }
        if self.initial_amount == 0 {
            return Err("initial_amount must be at least 1".into());
        }
        if self.solution_amount == 0 {
            return Err("solution_amount must be at least 1".into());
        }
        Ok(())
    }
}
