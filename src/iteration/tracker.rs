//! Iteration counter and bound tracker.

use super::criteria::{StopCriteria, StopReason};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Progress state of one solve.
///
/// Counts iterations and consecutive non-improving iterations, measures
/// elapsed time, and, for column-generation style loops, tracks the LP
/// relaxation objective, the incumbent objective and the lower/upper
/// bounds they imply. All objectives are treated as "smaller is better".
///
/// # Examples
///
/// ```
/// use u_heuristic::iteration::{Iteration, StopCriteria};
///
/// let criteria = StopCriteria::unlimited().with_iteration_limit(2);
/// let mut iteration = Iteration::new();
/// while !iteration.finished(&criteria) {
///     iteration.next(false);
/// }
/// assert_eq!(iteration.iteration(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Iteration {
    initial_slow_lp_step: f64,
    relative_improvement_step: f64,
    improvement_slow_count: u64,

    iteration: u64,
    not_better_iteration: u64,
    begin: Instant,

    slow_lp_step: f64,
    slow_lp_count: u64,
    slow_ip_count: u64,

    prev_lp_obj: f64,
    prev_ip_obj: f64,
    best_obj: f64,
    best_lp_obj: f64,
    best_dual_obj: f64,
    lower_bound: f64,
    upper_bound: Option<f64>,
}

impl Default for Iteration {
    fn default() -> Self {
        Self::new()
    }
}

impl Iteration {
    /// Starts a tracker with the default slow-improvement thresholds:
    /// initial LP step 100, relative step 0.01, slow after 5 iterations.
    pub fn new() -> Self {
        Self::with_thresholds(100.0, 0.01, 5)
    }

    /// Starts a tracker with explicit slow-improvement thresholds.
    pub fn with_thresholds(
        initial_slow_lp_step: f64,
        relative_improvement_step: f64,
        improvement_slow_count: u64,
    ) -> Self {
        Self {
            initial_slow_lp_step,
            relative_improvement_step,
            improvement_slow_count,
            iteration: 0,
            not_better_iteration: 0,
            begin: Instant::now(),
            slow_lp_step: f64::INFINITY,
            slow_lp_count: 0,
            slow_ip_count: 0,
            prev_lp_obj: f64::MAX,
            prev_ip_obj: f64::MAX,
            best_obj: f64::MAX,
            best_lp_obj: f64::MAX,
            best_dual_obj: f64::MIN,
            lower_bound: 0.0,
            upper_bound: None,
        }
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Consecutive iterations that did not improve the best fitness.
    pub fn not_better_iteration(&self) -> u64 {
        self.not_better_iteration
    }

    pub fn elapsed(&self) -> Duration {
        self.begin.elapsed()
    }

    /// Advances the counter by one.
    pub fn inc(&mut self) {
        self.iteration += 1;
    }

    /// Steps the counter back by one, saturating at zero.
    pub fn dec(&mut self) {
        self.iteration = self.iteration.saturating_sub(1);
    }

    /// Closes an iteration. `better` resets the stagnation counter.
    pub fn next(&mut self, better: bool) {
        self.inc();
        if better {
            self.not_better_iteration = 0;
        } else {
            self.not_better_iteration += 1;
        }
    }

    /// The first limit of `criteria` this state has passed, if any.
    pub fn stop_reason(&self, criteria: &StopCriteria) -> Option<StopReason> {
        if criteria
            .iteration_limit
            .is_some_and(|limit| self.iteration > limit)
        {
            return Some(StopReason::IterationLimit);
        }
        if criteria
            .not_better_iteration_limit
            .is_some_and(|limit| self.not_better_iteration > limit)
        {
            return Some(StopReason::StagnationLimit);
        }
        if criteria
            .time_limit
            .is_some_and(|limit| self.elapsed() > limit)
        {
            return Some(StopReason::TimeLimit);
        }
        None
    }

    pub fn finished(&self, criteria: &StopCriteria) -> bool {
        self.stop_reason(criteria).is_some()
    }

    /// Fraction of the budget spent, in `[0, 1]`.
    ///
    /// The larger of the time fraction and the iteration fraction; `0`
    /// when neither limit is set.
    pub fn progress(&self, criteria: &StopCriteria) -> f64 {
        let by_time = criteria
            .time_limit
            .map(|limit| {
                if limit.is_zero() {
                    1.0
                } else {
                    self.elapsed().as_secs_f64() / limit.as_secs_f64()
                }
            })
            .unwrap_or(0.0);
        let by_iteration = criteria
            .iteration_limit
            .map(|limit| {
                if limit == 0 {
                    1.0
                } else {
                    self.iteration as f64 / limit as f64
                }
            })
            .unwrap_or(0.0);
        by_time.max(by_iteration).clamp(0.0, 1.0)
    }

    // ---- bound tracking ----

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> Option<f64> {
        self.upper_bound
    }

    pub fn best_objective(&self) -> f64 {
        self.best_obj
    }

    pub fn best_lp_objective(&self) -> f64 {
        self.best_lp_obj
    }

    pub fn best_dual_objective(&self) -> f64 {
        self.best_dual_obj
    }

    pub fn slow_lp_improvement_step(&self) -> f64 {
        self.slow_lp_step
    }

    pub fn slow_lp_improvement_count(&self) -> u64 {
        self.slow_lp_count
    }

    /// Whether the incumbent has improved slowly for long enough.
    pub fn is_improvement_slow(&self) -> bool {
        self.slow_ip_count >= self.improvement_slow_count
    }

    /// Heuristic closeness to the proven optimum, in `[0, 1]`.
    ///
    /// `sqrt((lower + 1) / (best + 1))`, raised to the upper-bound gap
    /// `(upper - best) / upper` when an upper bound is known.
    pub fn optimal_rate(&self) -> f64 {
        let actual = ((self.lower_bound + 1.0) / (self.best_obj + 1.0)).sqrt();
        let rate = match self.upper_bound {
            Some(upper) => actual.max((upper - self.best_obj) / upper),
            None => actual,
        };
        rate.min(1.0)
    }

    /// Records an LP relaxation objective. Returns whether it is a new
    /// best LP objective.
    pub fn refresh_lp_obj(&mut self, obj: f64) -> bool {
        if self.slow_lp_step.is_infinite() {
            self.slow_lp_step = self
                .initial_slow_lp_step
                .max(obj * self.relative_improvement_step);
        } else if self.prev_lp_obj - obj < self.slow_lp_step
            || (self.best_obj - obj) / self.best_lp_obj < 1.0
        {
            self.slow_lp_count += 1;
        } else {
            self.slow_lp_count = 0;
        }
        self.prev_lp_obj = obj;

        if obj < self.best_lp_obj {
            tracing::debug!(from = self.best_lp_obj, to = obj, "best lp objective");
            self.best_lp_obj = obj;
            if self.best_lp_obj < self.lower_bound {
                self.lower_bound_to(self.best_lp_obj);
            }
            true
        } else {
            false
        }
    }

    /// Records an incumbent objective. Returns whether it is a new best.
    pub fn refresh_ip_obj(&mut self, obj: f64) -> bool {
        if (self.prev_ip_obj - obj).abs() < 0.01 || (self.best_obj - obj) / self.best_obj < 0.01 {
            self.slow_ip_count += 1;
        } else {
            self.slow_ip_count = 0;
        }
        self.prev_ip_obj = obj;
        if self.upper_bound.is_none() {
            self.upper_bound = Some(obj);
        }

        if obj < self.best_obj {
            tracing::debug!(from = self.best_obj, to = obj, "best objective");
            self.best_obj = obj;
            if self.best_obj < self.lower_bound {
                self.lower_bound_to(self.best_obj);
            }
            true
        } else {
            false
        }
    }

    /// Raises the dual bound from the reduced costs of freshly priced
    /// columns.
    ///
    /// Per executor key, the smallest reduced cost among `candidates` is
    /// taken; their sum plus the previous LP objective is a valid dual
    /// bound. It is kept when it lies strictly between the best dual bound
    /// and the best incumbent, and lifts the lower bound when higher.
    pub fn refresh_lower_bound<C, K, E, F>(&mut self, candidates: &[C], executor: E, reduced_cost: F)
    where
        K: Hash + Eq,
        E: Fn(&C) -> K,
        F: Fn(&C) -> f64,
    {
        let mut best_reduced_cost: HashMap<K, f64> = HashMap::new();
        for candidate in candidates {
            let cost = reduced_cost(candidate);
            best_reduced_cost
                .entry(executor(candidate))
                .and_modify(|best| *best = best.min(cost))
                .or_insert(cost);
        }

        let dual_obj = self.prev_lp_obj + best_reduced_cost.values().sum::<f64>();
        if self.best_dual_obj < dual_obj && dual_obj < self.best_obj {
            tracing::debug!(from = self.best_dual_obj, to = dual_obj, "best dual objective");
            self.best_dual_obj = dual_obj;
            if self.lower_bound < dual_obj {
                self.lower_bound_to(dual_obj);
            }
        }
    }

    /// Halves the slow LP improvement step.
    pub fn halve_step(&mut self) {
        self.slow_lp_step /= 2.0;
    }

    fn lower_bound_to(&mut self, value: f64) {
        tracing::debug!(from = self.lower_bound, to = value, "lower bound");
        self.lower_bound = value;
        tracing::debug!(
            "optimal rate: {:.2}%",
            self.optimal_rate() * 100.0
        );
    }
}

impl fmt::Display for Iteration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iteration)
    }
}
