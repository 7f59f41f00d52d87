//! MVO execution loop.

use super::config::MvoConfig;
use super::types::Universe;
use crate::elite::refresh_elites;
use crate::error::HeuristicError;
use crate::fitness::FitnessOrder;
use crate::iteration::{Iteration, StopReason};
use crate::model::{
    assert_dimension, evaluate_all, sort_by_fitness, Bound, CallbackModel, FitnessOf,
};
use crate::random::rng_from;
use rand::Rng;
use std::cmp::Ordering;
use std::sync::atomic::{self, AtomicBool};
use std::sync::Arc;
use std::time::Duration;

/// Result of an MVO run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MvoResult<V> {
    /// Up to `solution_amount` universes, best first.
    pub solutions: Vec<Universe<V>>,

    /// Completed iterations.
    pub iterations: u64,

    pub elapsed: Duration,

    pub stop_reason: StopReason,

    /// Best fitness after each iteration.
    pub history: Vec<V>,
}

impl<V> MvoResult<V> {
    pub fn best(&self) -> Option<&Universe<V>> {
        self.solutions.first()
    }
}

/// Executes the Multi-Verse Optimizer.
///
/// Infeasible universes carry the model's
/// [`default_objective`](CallbackModel::default_objective) instead of an
/// absent fitness.
pub struct MvoRunner;

impl MvoRunner {
    /// Runs MVO with a generator seeded from `config.seed`.
    pub fn run<M: CallbackModel>(
        model: &M,
        config: &MvoConfig,
    ) -> Result<MvoResult<FitnessOf<M>>, HeuristicError> {
        Self::run_with_cancel(model, config, None)
    }

    /// Runs MVO with an optional cancellation token.
    pub fn run_with_cancel<M: CallbackModel>(
        model: &M,
        config: &MvoConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<MvoResult<FitnessOf<M>>, HeuristicError> {
        let mut rng = rng_from(config.seed);
        Self::run_with_rng(model, config, &mut rng, cancel)
    }

    /// Runs MVO drawing every random number from `rng`.
    ///
    /// `config.seed` is ignored.
    #[tracing::instrument(skip_all, name = "mvo")]
    pub fn run_with_rng<M: CallbackModel, R: Rng>(
        model: &M,
        config: &MvoConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<MvoResult<FitnessOf<M>>, HeuristicError> {
        config.validate().map_err(HeuristicError::InvalidConfig)?;

        let mut iteration = Iteration::new();

        let positions = model.initial_solutions(config.universe_amount, rng);
        assert_eq!(
            positions.len(),
            config.universe_amount,
            "initial_solutions must return the requested amount"
        );
        assert_dimension(model, &positions);

        let mut universes = evaluate_universes(model, positions, config.parallel)?;
        let mut best = universes[0].clone();
        let mut elites: Vec<Universe<FitnessOf<M>>> = universes
            .iter()
            .take(config.solution_amount)
            .cloned()
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

            let progress = iteration.progress(&config.criteria);
            let wep = config.wep(progress);
            let tdr = MvoConfig::tdr(progress);

            let positions = transform_universes(model, config, &universes, &best.position, wep, tdr, rng);
            universes = evaluate_universes(model, positions, config.parallel)?;

            let better = model.compare_objective(universes[0].fitness.as_ref(), best.fitness.as_ref())
                == Ordering::Less;
            if better {
                tracing::debug!(
                    iteration = iteration.iteration(),
                    fitness = ?universes[0].fitness,
                    "new best universe"
                );
                best = universes[0].clone();
            }

            // Candidates ranked past the capacity can never survive the merge.
            let candidates = &universes[..config.solution_amount.min(universes.len())];
            refresh_elites(&mut elites, candidates, config.solution_amount, |a, b| {
                model.compare_objective(a.fitness.as_ref(), b.fitness.as_ref())
            });

            model.flush();
            iteration.next(better);
            history.push(best.fitness.clone().unwrap_or_else(|| model.default_objective()));
            tracing::trace!(
                iteration = iteration.iteration(),
                wep,
                tdr,
                "mvo iteration"
            );

            if model
                .on_iteration(&iteration, best.fitness.as_ref())
                .is_break()
            {
                break StopReason::Observer;
            }
        };

        tracing::info!(
            %stop_reason,
            iterations = iteration.iteration(),
            best = ?best.fitness,
            "mvo stopped"
        );

        Ok(MvoResult {
            solutions: elites,
            iterations: iteration.iteration(),
            elapsed: iteration.elapsed(),
            stop_reason,
            history,
        })
    }
}

/// Evaluates `positions`, substitutes the default objective for infeasible
/// ones, and sorts best-to-worst.
fn evaluate_universes<M: CallbackModel>(
    model: &M,
    positions: Vec<Vec<f64>>,
    parallel: bool,
) -> Result<Vec<Universe<FitnessOf<M>>>, HeuristicError> {
    let fitness = evaluate_all(model, &positions, parallel)?;
    let mut universes: Vec<Universe<FitnessOf<M>>> = positions
        .into_iter()
        .zip(fitness)
        .map(|(position, fitness)| {
            Universe::new(position, Some(fitness.unwrap_or_else(|| model.default_objective())))
        })
        .collect();
    sort_by_fitness(model, &mut universes, |u| u.fitness.as_ref());
    Ok(universes)
}

/// Produces the next generation of positions.
///
/// Per universe and dimension: with probability equal to the universe's
/// white-hole rate the value is taken from a selected white hole, then
/// with probability `wep` a wormhole moves it around the best universe.
/// The result is clamped to the dimension's bound.
fn transform_universes<M: CallbackModel, R: Rng>(
    model: &M,
    config: &MvoConfig,
    universes: &[Universe<FitnessOf<M>>],
    best: &[f64],
    wep: f64,
    tdr: f64,
    rng: &mut R,
) -> Vec<Vec<f64>> {
    let scores: Vec<f64> = universes
        .iter()
        .map(|u| {
            u.fitness
                .as_ref()
                .map_or(f64::NEG_INFINITY, |f| model.order().score(f))
        })
        .collect();
    let rates = config.normalization.normalize(&scores);
    let bounds = model.bounds();

    let mut positions = Vec::with_capacity(universes.len());
    for (i, universe) in universes.iter().enumerate() {
        let mut position = universe.position.clone();
        for (d, value) in position.iter_mut().enumerate() {
            if rng.random::<f64>() < rates[i] {
                let white_hole = config.selection.select(&rates, rng);
                *value = universes[white_hole].position[d];
            }
            if rng.random::<f64>() < wep {
                *value = wormhole(best[d], &bounds[d], tdr, rng);
            }
            *value = bounds[d].clamp(*value);
        }
        positions.push(position);
    }
    positions
}

/// `best ± tdr * (range * r + lower)`, sign by a fair coin.
fn wormhole<R: Rng>(best: f64, bound: &Bound, tdr: f64, rng: &mut R) -> f64 {
    let forward = rng.random::<f64>() < 0.5;
    let offset = tdr * bound.interpolate(rng.random::<f64>());
    if forward {
        best + offset
    } else {
        best - offset
    }
}
