//! PSO execution loop.

use super::config::PsoConfig;
use super::types::Particle;
use crate::elite::{refresh_elites, Solution};
use crate::error::HeuristicError;
use crate::iteration::{Iteration, StopReason};
use crate::model::{assert_dimension, evaluate_all, sort_by_fitness, CallbackModel, FitnessOf};
use crate::random::rng_from;
use rand::Rng;
use std::cmp::Ordering;
use std::sync::atomic::{self, AtomicBool};
use std::sync::Arc;
use std::time::Duration;

/// Result of a PSO run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PsoResult<V> {
    /// Up to `solution_amount` solutions, best first.
    pub solutions: Vec<Solution<V>>,

    /// Completed iterations.
    pub iterations: u64,

    pub elapsed: Duration,

    pub stop_reason: StopReason,

    /// Global best fitness after each iteration; the model's default
    /// objective while no feasible particle has been found.
    pub history: Vec<V>,
}

impl<V> PsoResult<V> {
    pub fn best(&self) -> Option<&Solution<V>> {
        self.solutions.first()
    }
}

/// Executes Particle Swarm Optimization.
pub struct PsoRunner;

impl PsoRunner {
    /// Runs PSO with a generator seeded from `config.seed`.
    pub fn run<M: CallbackModel>(
        model: &M,
        config: &PsoConfig,
    ) -> Result<PsoResult<FitnessOf<M>>, HeuristicError> {
        Self::run_with_cancel(model, config, None)
    }

    /// Runs PSO with an optional cancellation token.
    pub fn run_with_cancel<M: CallbackModel>(
        model: &M,
        config: &PsoConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<PsoResult<FitnessOf<M>>, HeuristicError> {
        let mut rng = rng_from(config.seed);
        Self::run_with_rng(model, config, &mut rng, cancel)
    }

    /// Runs PSO drawing every random number from `rng`.
    ///
    /// `config.seed` is ignored.
    #[tracing::instrument(skip_all, name = "pso")]
    pub fn run_with_rng<M: CallbackModel, R: Rng>(
        model: &M,
        config: &PsoConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<PsoResult<FitnessOf<M>>, HeuristicError> {
        config.validate().map_err(HeuristicError::InvalidConfig)?;

        let mut iteration = Iteration::new();
        let dimension = model.dimension();

        let positions = model.initial_solutions(config.particle_amount, rng);
        assert_eq!(
            positions.len(),
            config.particle_amount,
            "initial_solutions must return the requested amount"
        );
        assert_dimension(model, &positions);

        let fitness = evaluate_all(model, &positions, config.parallel)?;
        let mut particles: Vec<Particle<FitnessOf<M>>> = positions
            .into_iter()
            .zip(fitness)
            .map(|(position, fitness)| {
                let velocity = (0..dimension)
                    .map(|_| (2.0 * rng.random::<f64>() - 1.0) * config.initial_velocity)
                    .collect();
                Particle::new(position, velocity, fitness)
            })
            .collect();
        sort_by_fitness(model, &mut particles, |p| p.fitness.as_ref());

        let mut global = particles[0].snapshot();
        let mut elites: Vec<Solution<FitnessOf<M>>> = particles
            .iter()
            .take(config.solution_amount)
            .map(Solution::from)
            .collect();
        let mut history = Vec::new();

        let stop_reason = loop {
            if let Some(reason) = iteration.stop_reason(&config.criteria) {
                break reason;
            }
            if cancel
                .as_ref()
                .is_some_and(|flag| flag.load(atomic::Ordering::Relaxed))
            {
                break StopReason::Cancelled;
            }

            for particle in particles.iter_mut() {
                move_particle(model, config, particle, &global.position, rng);
            }

            let fitness = evaluate_all(model, &particles, config.parallel)?;
            for (particle, fitness) in particles.iter_mut().zip(fitness) {
                update_personal_best(model, particle, fitness);
            }
            sort_by_fitness(model, &mut particles, |p| p.fitness.as_ref());

            let better = model.compare_objective(particles[0].fitness.as_ref(), global.fitness.as_ref())
                == Ordering::Less;
            if better {
                tracing::debug!(
                    iteration = iteration.iteration(),
                    fitness = ?particles[0].fitness,
                    "new global best"
                );
                global = particles[0].snapshot();
            }

            // Candidates ranked past the capacity can never survive the merge.
            let candidates: Vec<Solution<FitnessOf<M>>> = particles
                .iter()
                .take(config.solution_amount)
                .map(Solution::from)
                .collect();
            refresh_elites(&mut elites, &candidates, config.solution_amount, |a, b| {
                model.compare_objective(a.fitness.as_ref(), b.fitness.as_ref())
            });

            model.flush();
            iteration.next(better);
            history.push(
                global
                    .fitness
                    .clone()
                    .unwrap_or_else(|| model.default_objective()),
            );
            tracing::trace!(
                iteration = iteration.iteration(),
                not_better = iteration.not_better_iteration(),
                "pso iteration"
            );

            if model
                .on_iteration(&iteration, global.fitness.as_ref())
                .is_break()
            {
                break StopReason::Observer;
            }
        };

        tracing::info!(
            %stop_reason,
            iterations = iteration.iteration(),
            best = ?global.fitness,
            "pso stopped"
        );

        Ok(PsoResult {
            solutions: elites,
            iterations: iteration.iteration(),
            elapsed: iteration.elapsed(),
            stop_reason,
            history,
        })
    }
}

/// Applies one velocity and position update to `particle`.
///
/// Per dimension, `r1` is drawn before `r2`. The new velocity is clamped
/// to `max_velocity` and the new position to the dimension's bound.
fn move_particle<M: CallbackModel, R: Rng>(
    model: &M,
    config: &PsoConfig,
    particle: &mut Particle<FitnessOf<M>>,
    global_best: &[f64],
    rng: &mut R,
) {
    let bounds = model.bounds();
    for d in 0..particle.size() {
        let r1: f64 = rng.random();
        let r2: f64 = rng.random();
        let velocity = config.w * particle.velocity[d]
            + config.c1 * r1 * (particle.best.position[d] - particle.position[d])
            + config.c2 * r2 * (global_best[d] - particle.position[d]);
        // inf - inf on full-width bounds
        let velocity = if velocity.is_nan() {
            0.0
        } else {
            velocity.clamp(-config.max_velocity, config.max_velocity)
        };

        particle.velocity[d] = velocity;
        particle.position[d] = bounds[d].clamp(particle.position[d] + velocity);
    }
}

/// Stores the particle's new fitness and adopts its state as the personal
/// best only when that fitness is strictly better. Returns whether it did.
fn update_personal_best<M: CallbackModel>(
    model: &M,
    particle: &mut Particle<FitnessOf<M>>,
    fitness: Option<FitnessOf<M>>,
) -> bool {
    particle.fitness = fitness;
    let improved = model.compare_objective(particle.fitness.as_ref(), particle.best.fitness.as_ref())
        == Ordering::Less;
    if improved {
        particle.adopt_as_best();
    }
    improved
}
