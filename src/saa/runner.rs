//! SAA execution loop.

use super::config::{Disturbance, SaaConfig};
use super::types::TemperatureSchedule;
use crate::elite::{refresh_elites, Solution};
use crate::error::HeuristicError;
use crate::iteration::{Iteration, StopReason};
use crate::model::{assert_dimension, evaluate, evaluate_all, sort_by_fitness, CallbackModel, FitnessOf};
use crate::random::rng_from;
use rand::Rng;
use std::cmp::Ordering;
use std::sync::atomic::{self, AtomicBool};
use std::sync::Arc;
use std::time::Duration;

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaaResult<V> {
    /// Up to `solution_amount` accepted solutions, best first.
    pub solutions: Vec<Solution<V>>,

    /// Completed outer iterations.
    pub iterations: u64,

    pub elapsed: Duration,

    pub stop_reason: StopReason,

    /// Temperature of the last completed iteration.
    pub final_temperature: f64,

    /// Perturbation step when the run stopped.
    pub final_step: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: u64,

    /// Number of improving moves.
    pub improving_moves: u64,

    /// Best fitness after each iteration.
    pub history: Vec<V>,
}

impl<V> SaaResult<V> {
    pub fn best(&self) -> Option<&Solution<V>> {
        self.solutions.first()
    }
}

/// Executes Simulated Annealing over a callback model.
///
/// Infeasible candidates carry the model's
/// [`default_objective`](CallbackModel::default_objective).
pub struct SaaRunner;

impl SaaRunner {
    /// Runs SAA with a generator seeded from `config.seed`.
    pub fn run<M: CallbackModel>(
        model: &M,
        config: &SaaConfig,
    ) -> Result<SaaResult<FitnessOf<M>>, HeuristicError> {
        Self::run_with_cancel(model, config, None)
    }

    /// Runs SAA with an optional cancellation token.
    pub fn run_with_cancel<M: CallbackModel>(
        model: &M,
        config: &SaaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaaResult<FitnessOf<M>>, HeuristicError> {
        let mut rng = rng_from(config.seed);
        Self::run_with_rng(model, config, &mut rng, cancel)
    }

    /// Runs SAA drawing every random number from `rng`.
    ///
    /// `config.seed` is ignored.
    #[tracing::instrument(skip_all, name = "saa")]
    pub fn run_with_rng<M: CallbackModel, R: Rng>(
        model: &M,
        config: &SaaConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaaResult<FitnessOf<M>>, HeuristicError> {
        config.validate().map_err(HeuristicError::InvalidConfig)?;
        if config.disturbance_amount > model.dimension() {
            return Err(HeuristicError::InvalidConfig(format!(
                "disturbance_amount {} exceeds the model dimension {}",
                config.disturbance_amount,
                model.dimension()
            )));
        }

        let mut iteration = Iteration::new();
        let mut schedule = TemperatureSchedule::new(config.initial_temperature, config.gradient);
        let mut step = config.step;

        let positions = model.initial_solutions(config.initial_amount, rng);
        assert_eq!(
            positions.len(),
            config.initial_amount,
            "initial_solutions must return the requested amount"
        );
        assert_dimension(model, &positions);

        let fitness = evaluate_all(model, &positions, false)?;
        let mut initial: Vec<Solution<FitnessOf<M>>> = positions
            .into_iter()
            .zip(fitness)
            .map(|(position, fitness)| {
                Solution::new(position, Some(fitness.unwrap_or_else(|| model.default_objective())))
            })
            .collect();
        sort_by_fitness(model, &mut initial, |s| s.fitness.as_ref());

        let mut elites: Vec<Solution<FitnessOf<M>>> =
            initial.iter().take(config.solution_amount).cloned().collect();
        let start = initial.swap_remove(0);
        let mut current = State {
            fitness: start.fitness.unwrap_or_else(|| model.default_objective()),
            position: start.position,
        };
        let mut best = current.clone();

        let mut history = Vec::new();
        let mut accepted_moves = 0u64;
        let mut improving_moves = 0u64;
        let mut temperature = config.initial_temperature;

        let stop_reason = loop {
            if let Some(reason) = iteration.stop_reason(&config.criteria) {
                break reason;
            }
            let next_temperature = schedule.temperature(iteration.iteration());
            if next_temperature <= config.final_temperature {
                break StopReason::TemperatureFloor;
            }
            if cancel
                .as_ref()
                .is_some_and(|flag| flag.load(atomic::Ordering::Relaxed))
            {
                break StopReason::Cancelled;
            }
            temperature = next_temperature;

            let mut better = false;
            let mut accepted = Vec::new();
            for _ in 0..config.markov_length {
                let position = perturb(model, config, &current.position, step, rng);
                let fitness = evaluate(model, &position)?.unwrap_or_else(|| model.default_objective());

                let improving = model.compare_objective(Some(&fitness), Some(&current.fitness))
                    == Ordering::Less;
                let accept = improving || {
                    let distance = model.objective_distance(&current.fitness, &fitness);
                    (-distance / temperature).exp() > rng.random::<f64>()
                };
                if !accept {
                    continue;
                }

                accepted_moves += 1;
                if improving {
                    improving_moves += 1;
                }
                current = State { position, fitness };

                if model.compare_objective(Some(&current.fitness), Some(&best.fitness))
                    == Ordering::Less
                {
                    tracing::debug!(
                        iteration = iteration.iteration(),
                        fitness = ?current.fitness,
                        step,
                        "new best"
                    );
                    best = current.clone();
                    better = true;
                    step *= config.step_decay;
                }
                accepted.push(current.to_solution());
            }

            sort_by_fitness(model, &mut accepted, |s| s.fitness.as_ref());
            accepted.truncate(config.solution_amount);
            refresh_elites(&mut elites, &accepted, config.solution_amount, |a, b| {
                model.compare_objective(a.fitness.as_ref(), b.fitness.as_ref())
            });

            model.flush();
            iteration.next(better);
            history.push(best.fitness.clone());
            tracing::trace!(
                iteration = iteration.iteration(),
                temperature,
                step,
                "saa iteration"
            );

            if model
                .on_iteration(&iteration, Some(&best.fitness))
                .is_break()
            {
                break StopReason::Observer;
            }
        };

        tracing::info!(
            %stop_reason,
            iterations = iteration.iteration(),
            best = ?best.fitness,
            "saa stopped"
        );

        Ok(SaaResult {
            solutions: elites,
            iterations: iteration.iteration(),
            elapsed: iteration.elapsed(),
            stop_reason,
            final_temperature: temperature,
            final_step: step,
            accepted_moves,
            improving_moves,
            history,
        })
    }
}

/// Trajectory point; fitness is always present on this path.
#[derive(Debug, Clone)]
struct State<V> {
    position: Vec<f64>,
    fitness: V,
}

impl<V: Clone> State<V> {
    fn to_solution(&self) -> Solution<V> {
        Solution::new(self.position.clone(), Some(self.fitness.clone()))
    }
}

/// Perturbs `disturbance_amount` distinct dimensions of `position`.
fn perturb<M: CallbackModel, R: Rng>(
    model: &M,
    config: &SaaConfig,
    position: &[f64],
    step: f64,
    rng: &mut R,
) -> Vec<f64> {
    let bounds = model.bounds();
    let mut next = position.to_vec();
    let points = rand::seq::index::sample(rng, next.len(), config.disturbance_amount);
    for d in points.into_iter() {
        let r = match config.disturbance {
            Disturbance::Forward => rng.random::<f64>(),
            Disturbance::Symmetric => rng.random_range(-1.0..1.0),
        };
        next[d] = bounds[d].clamp(next[d] + bounds[d].scaled_range(step * r));
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::ObjectiveCategory;
    use crate::iteration::StopCriteria;
    use crate::model::{Bound, FnModel};
    use std::ops::ControlFlow;

    fn sphere(dimension: usize) -> FnModel<ObjectiveCategory> {
        FnModel::new(
            ObjectiveCategory::Minimize,
            vec![Bound::new(-5.0, 5.0).unwrap(); dimension],
            |x| Some(x.iter().map(|v| v * v).sum()),
        )
    }

    #[test]
    fn test_saa_temperature_floor() {
        let flat = FnModel::new(
            ObjectiveCategory::Minimize,
            vec![Bound::new(0.0, 1.0).unwrap()],
            |_| Some(0.0),
        );
        let config = SaaConfig::default()
            .with_markov_length(1)
            .with_criteria(StopCriteria::unlimited())
            .with_seed(1);

        let result = SaaRunner::run(&flat, &config).unwrap();
        assert_eq!(result.stop_reason, StopReason::TemperatureFloor);
        assert_eq!(result.iterations, 228);
        assert!(result.final_temperature > 1.0);
    }

    #[test]
    fn test_saa_sphere_symmetric() {
        let config = SaaConfig::default()
            .with_disturbance(Disturbance::Symmetric)
            .with_temperatures(10.0, 1e-3)
            .with_gradient(0.95)
            .with_markov_length(100)
            .with_solution_amount(3)
            .with_seed(42);

        let result = SaaRunner::run(&sphere(2), &config).unwrap();
        let best = result.best().unwrap().fitness.unwrap();
        assert!(best < 0.05, "expected near-zero sphere value, got {best}");
        assert!(result.improving_moves > 0);
        assert!(result.accepted_moves >= result.improving_moves);
        assert!(result.final_step < config.step, "step must shrink on improvement");
        assert!(result.solutions.len() <= 3);
    }

    #[test]
    fn test_saa_forward_disturbance_only_moves_up() {
        let model = FnModel::new(
            ObjectiveCategory::Minimize,
            vec![Bound::new(0.0, 10.0).unwrap()],
            |x| Some(-x[0]),
        )
        .with_initial_solution(|_| vec![0.0]);
        let config = SaaConfig::default()
            .with_criteria(StopCriteria::unlimited().with_iteration_limit(20))
            .with_seed(3);

        let result = SaaRunner::run(&model, &config).unwrap();
        let best = result.best().unwrap();
        assert!(best.position[0] > 9.0, "expected x near 10, got {}", best.position[0]);
    }

    #[test]
    fn test_saa_best_history_non_increasing() {
        let config = SaaConfig::default()
            .with_disturbance(Disturbance::Symmetric)
            .with_markov_length(20)
            .with_criteria(StopCriteria::default().with_iteration_limit(100))
            .with_seed(42);

        let result = SaaRunner::run(&sphere(3), &config).unwrap();
        assert_eq!(result.history.len() as u64, result.iterations);
        for window in result.history.windows(2) {
            assert!(
                window[1] <= window[0] + 1e-12,
                "best history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_saa_metropolis_accepts_uphill_when_hot() {
        let config = SaaConfig::default()
            .with_disturbance(Disturbance::Symmetric)
            .with_temperatures(1e8, 1e7)
            .with_gradient(0.99)
            .with_markov_length(100)
            .with_criteria(StopCriteria::unlimited().with_iteration_limit(9))
            .with_seed(42);

        let result = SaaRunner::run(&sphere(1), &config).unwrap();
        let ratio = result.accepted_moves as f64 / (result.iterations * 100) as f64;
        assert!(ratio > 0.8, "expected high acceptance at high temp, got {ratio}");
    }

    #[test]
    fn test_saa_disturbance_exceeding_dimension() {
        let config = SaaConfig::default().with_disturbance_amount(3);
        let err = SaaRunner::run(&sphere(2), &config).unwrap_err();
        assert!(matches!(err, HeuristicError::InvalidConfig(_)));
    }

    #[test]
    fn test_saa_starts_from_best_initial() {
        let model = sphere(1);
        let config = SaaConfig::default()
            .with_initial_amount(50)
            .with_criteria(StopCriteria::unlimited().with_iteration_limit(0))
            .with_seed(5);

        let result = SaaRunner::run(&model, &config).unwrap();
        assert_eq!(result.iterations, 1);
        // One iteration of 100 trials cannot be worse than the best of 50 draws.
        let best = result.best().unwrap().fitness.unwrap();
        assert!(best < 1.0, "expected a good start, got {best}");
    }

    #[test]
    fn test_saa_observer_and_cancel() {
        let model = sphere(1).with_observer(|iteration, _| {
            if iteration.iteration() >= 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        let config = SaaConfig::default().with_markov_length(5).with_seed(1);
        let result = SaaRunner::run(&model, &config).unwrap();
        assert_eq!(result.stop_reason, StopReason::Observer);
        assert_eq!(result.iterations, 2);

        let cancel = Arc::new(AtomicBool::new(true));
        let result = SaaRunner::run_with_cancel(&sphere(1), &config, Some(cancel)).unwrap();
        assert_eq!(result.stop_reason, StopReason::Cancelled);
        assert_eq!(result.solutions.len(), 1);
    }

    #[test]
    fn test_saa_full_width_bounds() {
        let model = FnModel::new(
            ObjectiveCategory::Minimize,
            vec![Bound::new(-f64::MAX, f64::MAX).unwrap(); 2],
            |x| Some(x.iter().map(|v| (v / 1e300).abs()).sum()),
        );
        let config = SaaConfig::default()
            .with_disturbance(Disturbance::Symmetric)
            .with_markov_length(10)
            .with_criteria(StopCriteria::unlimited().with_iteration_limit(20))
            .with_seed(8);

        let result = SaaRunner::run(&model, &config).unwrap();
        let best = result.best().unwrap();
        assert!(best.position.iter().all(|v| v.is_finite()));
        assert!(best.fitness.unwrap().is_finite());
    }

    #[test]
    fn test_perturb_zero_draw_on_full_width_bound() {
        let model = FnModel::new(
            ObjectiveCategory::Minimize,
            vec![Bound::new(-f64::MAX, f64::MAX).unwrap()],
            |x| Some(x[0]),
        );
        let config = SaaConfig::default();
        let mut rng = crate::random::create_rng(5);
        // a zero step must leave the position where it was
        let next = perturb(&model, &config, &[42.0], 0.0, &mut rng);
        assert_eq!(next, vec![42.0]);
    }

    #[test]
    fn test_perturb_touches_distinct_dimensions() {
        let model = FnModel::new(
            ObjectiveCategory::Minimize,
            vec![Bound::new(0.0, 100.0).unwrap(); 6],
            |x| Some(x[0]),
        );
        let config = SaaConfig::default().with_disturbance_amount(4);
        let mut rng = crate::random::create_rng(17);
        let start = vec![10.0; 6];

        for _ in 0..50 {
            let next = perturb(&model, &config, &start, 0.5, &mut rng);
            let moved = next.iter().filter(|&&v| v != 10.0).count();
            assert!(moved <= 4, "expected at most 4 moved dimensions, got {moved}");
            assert!(next.iter().all(|&v| v >= 10.0), "forward disturbance moved down");
        }
    }
}
