//! Metaheuristic engines over a black-box callback model.
//!
//! The caller describes a problem through [`model::CallbackModel`]: box
//! bounds per dimension, a feasibility check, an objective, and the order
//! fitness is ranked by. Three engines search that model:
//!
//! - **Particle Swarm Optimization (PSO)**: velocity/position updates
//!   pulled toward personal and global bests, with bound clamping.
//! - **Multi-Verse Optimizer (MVO)**: white-hole value transfer and
//!   wormhole moves around the best universe, on a WEP/TDR schedule.
//! - **Simulated Annealing (SAA)**: single-trajectory search with
//!   geometric cooling and a shrinking perturbation step.
//!
//! Every engine keeps a bounded elite set ([`elite`]) and stops through
//! the shared convergence tracker ([`iteration`]), which also provides
//! the bound and optimality-rate bookkeeping of column-generation loops.
//!
//! # Fitness
//!
//! Fitness may be absent (infeasible or not evaluable); an absent fitness
//! ranks below every present one. Scalar objectives are ordered by
//! [`fitness::ObjectiveCategory`]; vector objectives by
//! [`fitness::Lexicographic`] or [`fitness::WeightedSum`].
//!
//! # Example
//!
//! ```
//! use u_heuristic::fitness::ObjectiveCategory;
//! use u_heuristic::iteration::StopCriteria;
//! use u_heuristic::model::{Bound, FnModel};
//! use u_heuristic::pso::{PsoConfig, PsoRunner};
//!
//! let model = FnModel::new(
//!     ObjectiveCategory::Minimize,
//!     vec![Bound::new(-10.0, 10.0).unwrap()],
//!     |x| Some((x[0] - 1.0).powi(2)),
//! );
//! let config = PsoConfig::default()
//!     .with_particle_amount(30)
//!     .with_criteria(StopCriteria::default().with_iteration_limit(100))
//!     .with_seed(42);
//!
//! let result = PsoRunner::run(&model, &config).unwrap();
//! assert!(result.best().unwrap().fitness.unwrap() < 0.01);
//! ```
//!
//! # Features
//!
//! - `parallel`: evaluate the candidates of one iteration with rayon.
//! - `serde`: derive `Serialize`/`Deserialize` on configs and results.

pub mod elite;
pub mod error;
pub mod fitness;
pub mod iteration;
pub mod model;
pub mod mvo;
pub mod pso;
pub mod random;
pub mod saa;
pub mod selection;

pub use error::HeuristicError;
