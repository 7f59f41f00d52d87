//! Orders over multi-objective fitness vectors.
//!
//! Pareto dominance is not a total preorder and cannot drive a sort, so
//! multi-objective fitness is ranked either lexicographically or through
//! a weighted scalarization.

use super::order::{compare_scalar, FitnessOrder, ObjectiveCategory};
use std::cmp::Ordering;

/// Lexicographic order: the first objective decides, later objectives
/// break ties.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use u_heuristic::fitness::{FitnessOrder, Lexicographic, ObjectiveCategory};
///
/// let order = Lexicographic::new(ObjectiveCategory::Minimize, 2);
/// assert_eq!(order.compare(&vec![1.0, 9.0], &vec![2.0, 0.0]), Ordering::Less);
/// assert_eq!(order.compare(&vec![1.0, 9.0], &vec![1.0, 0.0]), Ordering::Greater);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lexicographic {
    category: ObjectiveCategory,
    objectives: usize,
}

impl Lexicographic {
    /// Creates a lexicographic order over `objectives` values.
    pub fn new(category: ObjectiveCategory, objectives: usize) -> Self {
        Self {
            category,
            objectives,
        }
    }

    pub fn objectives(&self) -> usize {
        self.objectives
    }
}

impl FitnessOrder for Lexicographic {
    type Value = Vec<f64>;

    fn compare(&self, lhs: &Vec<f64>, rhs: &Vec<f64>) -> Ordering {
        lhs.iter()
            .zip(rhs.iter())
            .map(|(&l, &r)| compare_scalar(self.category, l, r))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    fn worst(&self) -> Vec<f64> {
        vec![self.category.worst_value(); self.objectives]
    }

    fn score(&self, value: &Vec<f64>) -> f64 {
        value
            .first()
            .map(|v| self.category.score(v))
            .unwrap_or(0.0)
    }

    fn distance(&self, lhs: &Vec<f64>, rhs: &Vec<f64>) -> f64 {
        lhs.iter().zip(rhs.iter()).map(|(l, r)| (l - r).abs()).sum()
    }
}

/// Weighted-sum scalarization: `sum_i w_i * f_i`, compared in the given
/// direction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedSum {
    category: ObjectiveCategory,
    weights: Vec<f64>,
}

impl WeightedSum {
    /// Creates a weighted-sum order.
    ///
    /// # Panics
    ///
    /// Panics if any weight is negative or not finite.
    pub fn new(category: ObjectiveCategory, weights: Vec<f64>) -> Self {
        assert!(
            weights.iter().all(|w| w.is_finite() && *w >= 0.0),
            "weights must be finite and non-negative"
        );
        Self { category, weights }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Collapses a fitness vector to a single objective value.
    pub fn scalarize(&self, value: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(value.iter())
            .map(|(w, v)| w * v)
            .sum()
    }
}

impl FitnessOrder for WeightedSum {
    type Value = Vec<f64>;

    fn compare(&self, lhs: &Vec<f64>, rhs: &Vec<f64>) -> Ordering {
        compare_scalar(self.category, self.scalarize(lhs), self.scalarize(rhs))
    }

    fn worst(&self) -> Vec<f64> {
        vec![self.category.worst_value(); self.weights.len()]
    }

    fn score(&self, value: &Vec<f64>) -> f64 {
        self.category.score(&self.scalarize(value))
    }

    fn distance(&self, lhs: &Vec<f64>, rhs: &Vec<f64>) -> f64 {
        (self.scalarize(lhs) - self.scalarize(rhs)).abs()
    }
}
