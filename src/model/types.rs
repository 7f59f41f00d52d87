//! Core trait for callback models.

use super::bound::Bound;
use crate::fitness::{compare_optional, FitnessOrder};
use crate::iteration::Iteration;
use rand::Rng;
use std::cmp::Ordering;
use std::ops::ControlFlow;

/// Failure reported by a callback model while evaluating a candidate.
///
/// Distinct from infeasibility: an infeasible candidate yields an absent
/// fitness, an evaluation error aborts the run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("objective evaluation failed: {message}")]
pub struct EvaluationError {
    message: String,
}

impl EvaluationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Fitness type of a callback model.
pub type FitnessOf<M> = <<M as CallbackModel>::Order as FitnessOrder>::Value;

/// Black-box model consumed by every engine.
///
/// The implementer provides bounds, the objective and the fitness order.
/// Everything else has a default.
///
/// # Contract
///
/// - [`initial_solutions`](Self::initial_solutions) returns exactly
///   `amount` candidates, each of length [`dimension`](Self::dimension).
/// - Evaluation methods are cheap, side-effect free (caches aside) and
///   must not block.
/// - [`flush`](Self::flush) is called once per outer iteration.
///
/// # Thread Safety
///
/// `CallbackModel` must be `Send + Sync` because engines may evaluate the
/// candidates of one iteration in parallel using rayon.
///
/// # Examples
///
/// ```
/// use u_heuristic::fitness::ObjectiveCategory;
/// use u_heuristic::model::{Bound, CallbackModel, EvaluationError};
///
/// struct Shifted { bounds: Vec<Bound> }
///
/// impl CallbackModel for Shifted {
///     type Order = ObjectiveCategory;
///
///     fn order(&self) -> &ObjectiveCategory { &ObjectiveCategory::Minimize }
///     fn bounds(&self) -> &[Bound] { &self.bounds }
///     fn objective(&self, x: &[f64]) -> Result<Option<f64>, EvaluationError> {
///         Ok(Some((x[0] - 1.0).powi(2)))
///     }
/// }
/// ```
pub trait CallbackModel: Send + Sync {
    /// Order the fitness of this model is ranked by.
    type Order: FitnessOrder;

    fn order(&self) -> &Self::Order;

    /// Box bounds, one per decision dimension.
    fn bounds(&self) -> &[Bound];

    /// Evaluates the objective at `position`.
    ///
    /// `Ok(None)` marks the position as not evaluable. `Err` is reserved
    /// for failures the caller must see.
    fn objective(&self, position: &[f64]) -> Result<Option<FitnessOf<Self>>, EvaluationError>;

    /// Number of decision dimensions.
    fn dimension(&self) -> usize {
        self.bounds().len()
    }

    /// Produces `amount` starting candidates.
    ///
    /// The default draws every dimension uniformly inside its bound.
    fn initial_solutions<R: Rng>(&self, amount: usize, rng: &mut R) -> Vec<Vec<f64>> {
        (0..amount)
            .map(|_| self.bounds().iter().map(|b| b.sample(rng)).collect())
            .collect()
    }

    /// Feasibility of `position`; `None` when it was not checked.
    ///
    /// Engines treat `None` as infeasible.
    fn constraint_satisfied(&self, _position: &[f64]) -> Option<bool> {
        Some(true)
    }

    /// Three-way comparison of possibly absent fitness; `Less` is better.
    fn compare_objective(
        &self,
        lhs: Option<&FitnessOf<Self>>,
        rhs: Option<&FitnessOf<Self>>,
    ) -> Ordering {
        compare_optional(lhs, rhs, |l, r| self.order().compare(l, r))
    }

    /// Worst-possible fitness, substituted for absent fitness where a
    /// present value is required.
    fn default_objective(&self) -> FitnessOf<Self> {
        self.order().worst()
    }

    /// Divergence between two fitness values (annealing acceptance).
    fn objective_distance(&self, lhs: &FitnessOf<Self>, rhs: &FitnessOf<Self>) -> f64 {
        self.order().distance(lhs, rhs)
    }

    /// Releases per-iteration caches.
    fn flush(&self) {}

    /// Called at the end of each outer iteration with the best fitness so
    /// far. Returning `Break` stops the run.
    ///
    /// The default implementation always continues.
    fn on_iteration(
        &self,
        _iteration: &Iteration,
        _best: Option<&FitnessOf<Self>>,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Evaluates `position`, gating the objective on feasibility.
///
/// Only `constraint_satisfied == Some(true)` reaches the objective; both
/// `Some(false)` and `None` yield an absent fitness.
pub fn evaluate<M: CallbackModel + ?Sized>(
    model: &M,
    position: &[f64],
) -> Result<Option<FitnessOf<M>>, EvaluationError> {
    match model.constraint_satisfied(position) {
        Some(true) => model.objective(position),
        Some(false) | None => Ok(None),
    }
}

/// Evaluates a batch of positions, in parallel when requested and the
/// `parallel` feature is enabled.
pub(crate) fn evaluate_all<M, P>(
    model: &M,
    positions: &[P],
    parallel: bool,
) -> Result<Vec<Option<FitnessOf<M>>>, EvaluationError>
where
    M: CallbackModel,
    P: AsRef<[f64]> + Sync,
{
    #[cfg(feature = "parallel")]
    if parallel {
        use rayon::prelude::*;
        return positions
            .par_iter()
            .map(|p| evaluate(model, p.as_ref()))
            .collect();
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    positions.iter().map(|p| evaluate(model, p.as_ref())).collect()
}

/// Sorts `items` best-to-worst by the model's comparator.
pub(crate) fn sort_by_fitness<M, T, F>(model: &M, items: &mut [T], fitness: F)
where
    M: CallbackModel,
    F: Fn(&T) -> Option<&FitnessOf<M>>,
{
    items.sort_by(|a, b| model.compare_objective(fitness(a), fitness(b)));
}

/// Panics unless the model's dimension count matches its bounds and every
/// candidate has that many values.
pub(crate) fn assert_dimension<M: CallbackModel, P: AsRef<[f64]>>(model: &M, candidates: &[P]) {
    let dimension = model.dimension();
    assert_eq!(
        dimension,
        model.bounds().len(),
        "model dimension must equal the number of bounds"
    );
    for candidate in candidates {
        assert_eq!(
            candidate.as_ref().len(),
            dimension,
            "candidate length must equal the model dimension"
        );
    }
}
