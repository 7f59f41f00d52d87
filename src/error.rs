//! Error types shared by all engines.

use crate::model::EvaluationError;

/// Error returned by the engine runners.
///
/// Infeasible candidates are not errors; they carry an absent fitness.
/// Only configuration problems and failures reported by the callback
/// model surface here.
#[derive(Debug, thiserror::Error)]
pub enum HeuristicError {
    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The callback model failed to evaluate a candidate.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}
