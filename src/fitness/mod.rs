//! Fitness values and their ordering.
//!
//! Every engine ranks candidates with a three-way comparison in which
//! [`Ordering::Less`](std::cmp::Ordering::Less) means "the left-hand side
//! is the better candidate". Sorting a population with that comparison
//! therefore yields a best-to-worst order.
//!
//! # Key Types
//!
//! - [`ObjectiveCategory`]: minimization or maximization of a scalar objective
//! - [`FitnessOrder`]: the ordering contract a fitness type is ranked by
//! - [`Lexicographic`], [`WeightedSum`]: orders over multi-objective fitness
//! - [`compare_optional`]: lifts an order to absent (infeasible) fitness

mod multi_objective;
mod order;

pub use multi_objective::{Lexicographic, WeightedSum};
pub use order::{compare_optional, compare_scalar, FitnessOrder, ObjectiveCategory};
