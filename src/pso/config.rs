//! PSO configuration.

use crate::iteration::StopCriteria;

/// Configuration for Particle Swarm Optimization.
///
/// # Examples
///
/// ```
/// use u_heuristic::iteration::StopCriteria;
/// use u_heuristic::pso::PsoConfig;
///
/// let config = PsoConfig::default()
///     .with_particle_amount(50)
///     .with_inertia(0.7)
///     .with_learning_factors(1.5, 1.5)
///     .with_criteria(StopCriteria::default().with_iteration_limit(200))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PsoConfig {
    /// Swarm size.
    pub particle_amount: usize,

    /// Number of solutions returned (elite capacity).
    pub solution_amount: usize,

    /// Inertia weight `w`.
    pub w: f64,

    /// Cognitive (personal best) learning factor.
    pub c1: f64,

    /// Social (global best) learning factor.
    pub c2: f64,

    /// Velocity components are clamped to `[-max_velocity, max_velocity]`.
    pub max_velocity: f64,

    /// Initial velocities are drawn uniformly from
    /// `[-initial_velocity, initial_velocity)`.
    pub initial_velocity: f64,

    pub criteria: StopCriteria,

    /// Evaluate particles in parallel (requires the `parallel` feature).
    pub parallel: bool,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for PsoConfig {
    fn default() -> Self {
        Self {
            particle_amount: 100,
            solution_amount: 1,
            w: 0.4,
            c1: 2.0,
            c2: 2.0,
            max_velocity: 10000.0,
            initial_velocity: 1.0,
            criteria: StopCriteria::default(),
            parallel: false,
            seed: None,
        }
    }
}

impl PsoConfig {
    pub fn with_particle_amount(mut self, n: usize) -> Self {
        self.particle_amount = n;
        self
    }

    pub fn with_solution_amount(mut self, n: usize) -> Self {
        self.solution_amount = n;
        self
    }

    pub fn with_inertia(mut self, w: f64) -> Self {
        self.w = w;
        self
    }

    pub fn with_learning_factors(mut self, c1: f64, c2: f64) -> Self {
        self.c1 = c1;
        self.c2 = c2;
        self
    }

    pub fn with_max_velocity(mut self, v: f64) -> Self {
        self.max_velocity = v;
        self
    }

    pub fn with_initial_velocity(mut self, v: f64) -> Self {
        self.initial_velocity = v;
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

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.particle_amount == 0 {
            return Err("particle_amount must be at least 1".into());
        }
        if self.solution_amount == 0 {
            return Err("solution_amount must be at least 1".into());
        }
        if !self.w.is_finite() {
            return Err(format!("inertia weight must be finite, got {}", self.w));
        }
        for (name, c) in [("c1", self.c1), ("c2", self.c2)] {
            if !(c >= 0.0 && c.is_finite()) {
                return Err(format!("{name} must be finite and non-negative, got {c}"));
            }
        }
        if !(self.max_velocity > 0.0) {
            return Err(format!(
                "max_velocity must be positive, got {}",
                self.max_velocity
            ));
        }
        if !(self.initial_velocity > 0.0 && self.initial_velocity.is_finite()) {
            return Err(format!(
                "initial_velocity must be positive and finite, got {}",
                self.initial_velocity
            ));
        }
        Ok(())
    }
}
