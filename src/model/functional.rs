//! Closure-backed callback model.

use super::bound::Bound;
use super::types::{CallbackModel, EvaluationError, FitnessOf};
use crate::fitness::FitnessOrder;
use crate::iteration::Iteration;
use rand::{Rng, RngCore};
use std::fmt;
use std::ops::ControlFlow;

type Objective<V> = Box<dyn Fn(&[f64]) -> Result<Option<V>, EvaluationError> + Send + Sync>;
type Constraint = Box<dyn Fn(&[f64]) -> Option<bool> + Send + Sync>;
type Generator = Box<dyn Fn(&mut dyn RngCore) -> Vec<f64> + Send + Sync>;
type Distance<V> = Box<dyn Fn(&V, &V) -> f64 + Send + Sync>;
type Observer<V> = Box<dyn Fn(&Iteration, Option<&V>) -> ControlFlow<()> + Send + Sync>;

/// A [`CallbackModel`] assembled from closures.
///
/// # Examples
///
/// ```
/// use u_heuristic::fitness::ObjectiveCategory;
/// use u_heuristic::model::{evaluate, Bound, FnModel};
///
/// let model = FnModel::new(
///     ObjectiveCategory::Minimize,
///     vec![Bound::new(-10.0, 10.0).unwrap()],
///     |x| Some((x[0] - 1.0).powi(2)),
/// )
/// .with_constraint("non-negative", |x| Some(x[0] >= 0.0));
///
/// assert_eq!(evaluate(&model, &[3.0]), Ok(Some(4.0)));
/// assert_eq!(evaluate(&model, &[-3.0]), Ok(None));
/// ```
pub struct FnModel<O: FitnessOrder> {
    order: O,
    bounds: Vec<Bound>,
    objective: Objective<O::Value>,
    constraints: Vec<(String, Constraint)>,
    generator: Option<Generator>,
    distance: Option<Distance<O::Value>>,
    observer: Option<Observer<O::Value>>,
}

impl<O: FitnessOrder> FnModel<O> {
    /// Creates a model whose objective cannot fail.
    pub fn new<F>(order: O, bounds: Vec<Bound>, objective: F) -> Self
    where
        F: Fn(&[f64]) -> Option<O::Value> + Send + Sync + 'static,
    {
        Self::fallible(order, bounds, move |x| Ok(objective(x)))
    }

    /// Creates a model whose objective may report an [`EvaluationError`].
    pub fn fallible<F>(order: O, bounds: Vec<Bound>, objective: F) -> Self
    where
        F: Fn(&[f64]) -> Result<Option<O::Value>, EvaluationError> + Send + Sync + 'static,
    {
        Self {
            order,
            bounds,
            objective: Box::new(objective),
            constraints: Vec::new(),
            generator: None,
            distance: None,
            observer: None,
        }
    }

    /// Adds a named constraint. `None` means the constraint could not be
    /// checked.
    pub fn with_constraint<F>(mut self, name: impl Into<String>, constraint: F) -> Self
    where
        F: Fn(&[f64]) -> Option<bool> + Send + Sync + 'static,
    {
        self.constraints.push((name.into(), Box::new(constraint)));
        self
    }

    /// Replaces uniform sampling of initial candidates.
    pub fn with_initial_solution<F>(mut self, generator: F) -> Self
    where
        F: Fn(&mut dyn RngCore) -> Vec<f64> + Send + Sync + 'static,
    {
        self.generator = Some(Box::new(generator));
        self
    }

    /// Replaces the order's distance between fitness values.
    pub fn with_distance<F>(mut self, distance: F) -> Self
    where
        F: Fn(&O::Value, &O::Value) -> f64 + Send + Sync + 'static,
    {
        self.distance = Some(Box::new(distance));
        self
    }

    /// Installs a per-iteration observer.
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&Iteration, Option<&O::Value>) -> ControlFlow<()> + Send + Sync + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn constraint_names(&self) -> impl Iterator<Item = &str> {
        self.constraints.iter().map(|(name, _)| name.as_str())
    }
}

impl<O: FitnessOrder + fmt::Debug> fmt::Debug for FnModel<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnModel")
            .field("order", &self.order)
            .field("bounds", &self.bounds)
            .field("constraints", &self.constraint_names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<O: FitnessOrder> CallbackModel for FnModel<O> {
    type Order = O;

    fn order(&self) -> &O {
        &self.order
    }

    fn bounds(&self) -> &[Bound] {
        &self.bounds
    }

    fn objective(&self, position: &[f64]) -> Result<Option<O::Value>, EvaluationError> {
        (self.objective)(position)
    }

    fn initial_solutions<R: Rng>(&self, amount: usize, rng: &mut R) -> Vec<Vec<f64>> {
        match &self.generator {
            Some(generator) => (0..amount).map(|_| generator(&mut *rng)).collect(),
            None => (0..amount)
                .map(|_| self.bounds.iter().map(|b| b.sample(rng)).collect())
                .collect(),
        }
    }

    fn constraint_satisfied(&self, position: &[f64]) -> Option<bool> {
        let mut unknown = false;
        for (name, constraint) in &self.constraints {
            match constraint(position) {
                Some(true) => {}
                Some(false) => {
                    tracing::trace!(constraint = %name, "constraint violated");
                    return Some(false);
                }
                None => unknown = true,
            }
        }
        if unknown {
            None
        } else {
            Some(true)
        }
    }

    fn objective_distance(&self, lhs: &FitnessOf<Self>, rhs: &FitnessOf<Self>) -> f64 {
        match &self.distance {
            Some(distance) => distance(lhs, rhs),
            None => self.order.distance(lhs, rhs),
        }
    }

    fn on_iteration(&self, iteration: &Iteration, best: Option<&FitnessOf<Self>>) -> ControlFlow<()> {
        match &self.observer {
            Some(observer) => observer(iteration, best),
            None => ControlFlow::Continue(()),
        }
    }
}
