//! Stopping criteria shared by all engines.

use std::fmt;
use std::time::Duration;

/// Default wall-clock budget of a run.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(30 * 60);

/// Iteration, stagnation and time limits.
///
/// Each limit is independently disabled with `None`. A run stops once the
/// iteration counter *exceeds* its limit, so a limit of `N` allows
/// iterations `0..=N` to complete.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_heuristic::iteration::StopCriteria;
///
/// let criteria = StopCriteria::default()
///     .with_iteration_limit(500)
///     .with_not_better_iteration_limit(50)
///     .with_time_limit(Duration::from_secs(5));
/// assert_eq!(criteria.iteration_limit, Some(500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopCriteria {
    /// Maximum number of outer iterations.
    pub iteration_limit: Option<u64>,

    /// Maximum number of consecutive iterations without a new best.
    pub not_better_iteration_limit: Option<u64>,

    /// Wall-clock budget.
    pub time_limit: Option<Duration>,
}

impl Default for StopCriteria {
    fn default() -> Self {
        Self {
            iteration_limit: None,
            not_better_iteration_limit: None,
            time_limit: Some(DEFAULT_TIME_LIMIT),
        }
    }
}

impl StopCriteria {
    /// Criteria with every limit disabled.
    ///
    /// A run configured this way only stops through an engine-specific
    /// condition, the observer or cancellation.
    pub fn unlimited() -> Self {
        Self {
            iteration_limit: None,
            not_better_iteration_limit: None,
            time_limit: None,
        }
    }

    pub fn with_iteration_limit(mut self, limit: u64) -> Self {
        self.iteration_limit = Some(limit);
        self
    }

    pub fn with_not_better_iteration_limit(mut self, limit: u64) -> Self {
        self.not_better_iteration_limit = Some(limit);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn without_time_limit(mut self) -> Self {
        self.time_limit = None;
        self
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The iteration counter exceeded its limit.
    IterationLimit,
    /// Too many consecutive iterations without improvement.
    StagnationLimit,
    /// The wall-clock budget was spent.
    TimeLimit,
    /// Annealing temperature reached its floor.
    TemperatureFloor,
    /// The cancellation flag was raised.
    Cancelled,
    /// The model's iteration observer asked to stop.
    Observer,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::IterationLimit => "iteration limit reached",
            StopReason::StagnationLimit => "not-better iteration limit reached",
            StopReason::TimeLimit => "time limit reached",
            StopReason::TemperatureFloor => "temperature reached its floor",
            StopReason::Cancelled => "cancelled",
            StopReason::Observer => "stopped by observer",
        };
        f.write_str(text)
    }
}
