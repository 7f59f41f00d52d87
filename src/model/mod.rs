//! Callback model interface.
//!
//! Engines never see a symbolic model. They talk to the problem through
//! [`CallbackModel`]: box bounds per dimension, a feasibility check, an
//! objective, and the fitness order used to rank candidates.
//!
//! # Key Types
//!
//! - [`CallbackModel`]: the contract every engine consumes
//! - [`Bound`]: per-dimension `[lower, upper]` box
//! - [`FnModel`]: closure-backed implementation for direct use
//! - [`evaluate`]: feasibility-gated objective evaluation

mod bound;
mod functional;
mod types;

pub use bound::{Bound, BoundError};
pub use functional::FnModel;
pub use types::{evaluate, CallbackModel, EvaluationError, FitnessOf};

pub(crate) use types::{assert_dimension, evaluate_all, sort_by_fitness};
