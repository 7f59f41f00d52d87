//! Convergence tracking.
//!
//! [`Iteration`] is created once per solve and advanced after every outer
//! iteration. Engines ask it whether any [`StopCriteria`] limit has been
//! passed. Column-generation loops additionally feed it LP and incumbent
//! objectives to maintain lower/upper bounds and an optimality-rate
//! estimate.

mod criteria;
mod tracker;

pub use criteria::{StopCriteria, StopReason, DEFAULT_TIME_LIMIT};
pub use tracker::Iteration;
