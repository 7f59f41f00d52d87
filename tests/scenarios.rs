//! End-to-end runs of the three engines through the public API.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use u_heuristic::elite::{refresh_elites, Solution};
use u_heuristic::fitness::{FitnessOrder, ObjectiveCategory, WeightedSum};
use u_heuristic::iteration::{StopCriteria, StopReason};
use u_heuristic::model::{Bound, CallbackModel, EvaluationError, FnModel};
use u_heuristic::mvo::{MvoConfig, MvoRunner};
use u_heuristic::pso::{PsoConfig, PsoRunner};
use u_heuristic::random::create_rng;
use u_heuristic::saa::{Disturbance, SaaConfig, SaaRunner};
use u_heuristic::HeuristicError;

fn shifted_parabola() -> FnModel<ObjectiveCategory> {
    FnModel::new(
        ObjectiveCategory::Minimize,
        vec![Bound::new(-10.0, 10.0).unwrap()],
        |x| Some((x[0] - 1.0).powi(2)),
    )
}

fn iterations(n: u64) -> StopCriteria {
    StopCriteria::unlimited().with_iteration_limit(n)
}

#[test]
fn test_pso_finds_parabola_minimum_within_two_seconds() {
    let config = PsoConfig::default()
        .with_particle_amount(50)
        .with_criteria(StopCriteria::unlimited().with_time_limit(Duration::from_secs(2)))
        .with_seed(7);

    let result = PsoRunner::run(&shifted_parabola(), &config).unwrap();
    assert_eq!(result.stop_reason, StopReason::TimeLimit);
    assert!(result.elapsed >= Duration::from_secs(2));
    let best = result.best().unwrap();

    assert!(
        (best.position[0] - 1.0).abs() < 0.05,
        "expected x near 1, got {}",
        best.position[0]
    );
    let fitness = best.fitness.unwrap();
    assert!(fitness < 0.01, "expected fitness near 0, got {fitness}");
}

#[test]
fn test_time_limit_alone_stops_every_engine() {
    let model = shifted_parabola();
    let limit = StopCriteria::unlimited().with_time_limit(Duration::from_millis(100));

    let pso = PsoRunner::run(
        &model,
        &PsoConfig::default()
            .with_particle_amount(10)
            .with_criteria(limit)
            .with_seed(1),
    )
    .unwrap();
    let mvo = MvoRunner::run(
        &model,
        &MvoConfig::default()
            .with_universe_amount(10)
            .with_criteria(limit)
            .with_seed(1),
    )
    .unwrap();
    // cooling to a zero floor at this rate outlasts the time limit
    let saa = SaaRunner::run(
        &model,
        &SaaConfig::default()
            .with_temperatures(100.0, 0.0)
            .with_gradient(0.99999)
            .with_markov_length(10)
            .with_criteria(limit)
            .with_seed(1),
    )
    .unwrap();

    for (name, reason, elapsed) in [
        ("pso", pso.stop_reason, pso.elapsed),
        ("mvo", mvo.stop_reason, mvo.elapsed),
        ("saa", saa.stop_reason, saa.elapsed),
    ] {
        assert_eq!(reason, StopReason::TimeLimit, "{name}");
        assert!(elapsed >= Duration::from_millis(100), "{name}: stopped early after {elapsed:?}");
    }
}

#[test]
fn test_full_width_bounds_run_on_every_engine() {
    let model = FnModel::new(
        ObjectiveCategory::Minimize,
        vec![Bound::new(-f64::MAX, f64::MAX).unwrap(); 3],
        |x| Some(x.iter().map(|v| (v / 1e300).powi(2)).sum()),
    );

    let pso = PsoRunner::run(
        &model,
        &PsoConfig::default()
            .with_particle_amount(10)
            .with_initial_velocity(1e308)
            .with_criteria(iterations(10))
            .with_seed(6),
    )
    .unwrap();
    let mvo = MvoRunner::run(
        &model,
        &MvoConfig::default()
            .with_universe_amount(10)
            .with_criteria(iterations(10))
            .with_seed(6),
    )
    .unwrap();
    let saa = SaaRunner::run(
        &model,
        &SaaConfig::default()
            .with_markov_length(10)
            .with_criteria(iterations(10))
            .with_seed(6),
    )
    .unwrap();

    for (name, best) in [
        ("pso", pso.best().unwrap()),
        ("mvo", mvo.best().unwrap()),
        ("saa", saa.best().unwrap()),
    ] {
        assert!(
            best.position.iter().all(|v| v.is_finite()),
            "{name}: expected finite positions, got {:?}",
            best.position
        );
    }
}

#[test]
fn test_elite_merge_worked_example() {
    let order = ObjectiveCategory::Minimize;
    let mut elites = vec![Solution::new(vec![0.0], Some(5.0))];
    let candidates = vec![
        Solution::new(vec![1.0], Some(3.0)),
        Solution::new(vec![2.0], Some(7.0)),
    ];

    refresh_elites(&mut elites, &candidates, 2, |a, b| {
        order.compare(a.fitness.as_ref().unwrap(), b.fitness.as_ref().unwrap())
    });

    assert_eq!(
        elites,
        vec![
            Solution::new(vec![1.0], Some(3.0)),
            Solution::new(vec![0.0], Some(5.0)),
        ]
    );
}

#[test]
fn test_saa_stops_at_temperature_floor_regardless_of_objective() {
    // ceil(ln(1/100) / ln(0.98)) = 228
    let config = SaaConfig::default()
        .with_temperatures(100.0, 1.0)
        .with_gradient(0.98)
        .with_markov_length(5)
        .with_criteria(StopCriteria::unlimited())
        .with_seed(11);

    let result = SaaRunner::run(&shifted_parabola(), &config).unwrap();

    assert_eq!(result.stop_reason, StopReason::TemperatureFloor);
    assert_eq!(result.iterations, 228);
}

#[test]
fn test_iteration_limit_terminates_every_engine() {
    let model = shifted_parabola();
    let n = 15;

    let pso = PsoRunner::run(
        &model,
        &PsoConfig::default()
            .with_particle_amount(10)
            .with_criteria(iterations(n))
            .with_seed(1),
    )
    .unwrap();
    let mvo = MvoRunner::run(
        &model,
        &MvoConfig::default()
            .with_universe_amount(10)
            .with_criteria(iterations(n))
            .with_seed(1),
    )
    .unwrap();
    let saa = SaaRunner::run(
        &model,
        &SaaConfig::default()
            .with_markov_length(10)
            .with_criteria(iterations(n))
            .with_seed(1),
    )
    .unwrap();

    for (name, reason, count) in [
        ("pso", pso.stop_reason, pso.iterations),
        ("mvo", mvo.stop_reason, mvo.iterations),
        ("saa", saa.stop_reason, saa.iterations),
    ] {
        assert_eq!(reason, StopReason::IterationLimit, "{name}");
        assert!(count <= n + 1, "{name}: expected at most {} iterations, got {count}", n + 1);
    }
}

#[test]
fn test_mvo_and_saa_approach_parabola_minimum() {
    let model = shifted_parabola();

    let mvo = MvoRunner::run(
        &model,
        &MvoConfig::default()
            .with_universe_amount(40)
            .with_criteria(iterations(200))
            .with_seed(3),
    )
    .unwrap();
    let mvo_best = mvo.best().unwrap().fitness.unwrap();
    assert!(mvo_best < 0.1, "expected mvo fitness below 0.1, got {mvo_best}");

    let saa = SaaRunner::run(
        &model,
        &SaaConfig::default()
            .with_disturbance(Disturbance::Symmetric)
            .with_criteria(StopCriteria::unlimited())
            .with_seed(3),
    )
    .unwrap();
    let saa_best = saa.best().unwrap().fitness.unwrap();
    assert!(saa_best < 0.1, "expected saa fitness below 0.1, got {saa_best}");
}

#[test]
fn test_weighted_sum_objectives_with_pso() {
    // both objectives agree on x = 0.5
    let model = FnModel::new(
        WeightedSum::new(ObjectiveCategory::Minimize, vec![1.0, 2.0]),
        vec![Bound::new(-3.0, 3.0).unwrap()],
        |x| Some(vec![(x[0] - 0.5).abs(), (x[0] - 0.5).powi(2)]),
    );
    let config = PsoConfig::default()
        .with_particle_amount(30)
        .with_solution_amount(3)
        .with_criteria(iterations(150))
        .with_seed(5);

    let result = PsoRunner::run(&model, &config).unwrap();
    assert_eq!(result.solutions.len(), 3);

    let best = result.best().unwrap();
    assert!(
        (best.position[0] - 0.5).abs() < 0.05,
        "expected x near 0.5, got {}",
        best.position[0]
    );
    for pair in result.solutions.windows(2) {
        assert_ne!(
            model.compare_objective(pair[0].fitness.as_ref(), pair[1].fitness.as_ref()),
            std::cmp::Ordering::Greater,
            "solutions must be ordered best first"
        );
    }
}

#[test]
fn test_caller_rng_makes_runs_reproducible() {
    let model = shifted_parabola();
    let config = MvoConfig::default()
        .with_universe_amount(15)
        .with_criteria(iterations(20));

    let a = MvoRunner::run_with_rng(&model, &config, &mut create_rng(99), None).unwrap();
    let b = MvoRunner::run_with_rng(&model, &config, &mut create_rng(99), None).unwrap();
    assert_eq!(a.solutions, b.solutions);
    assert_eq!(a.history, b.history);
}

#[test]
fn test_cancelled_before_first_iteration() {
    let model = shifted_parabola();
    let cancel = Arc::new(AtomicBool::new(true));

    let result = SaaRunner::run_with_cancel(
        &model,
        &SaaConfig::default().with_seed(2),
        Some(cancel),
    )
    .unwrap();
    assert_eq!(result.stop_reason, StopReason::Cancelled);
    assert_eq!(result.iterations, 0);
    assert_eq!(result.solutions.len(), 1, "initial candidate is still reported");
}

#[test]
fn test_evaluation_error_is_not_masked() {
    let model = FnModel::fallible(
        ObjectiveCategory::Minimize,
        vec![Bound::new(0.0, 1.0).unwrap()],
        |_| Err(EvaluationError::new("backend unavailable")),
    );

    let err = PsoRunner::run(&model, &PsoConfig::default().with_seed(1)).unwrap_err();
    assert!(matches!(err, HeuristicError::Evaluation(_)), "got {err:?}");
    let err = MvoRunner::run(&model, &MvoConfig::default().with_seed(1)).unwrap_err();
    assert!(matches!(err, HeuristicError::Evaluation(_)), "got {err:?}");
    let err = SaaRunner::run(&model, &SaaConfig::default().with_seed(1)).unwrap_err();
    assert!(matches!(err, HeuristicError::Evaluation(_)), "got {err:?}");
}
