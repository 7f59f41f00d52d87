//! Scalar ordering and the [`FitnessOrder`] contract.

use std::cmp::Ordering;
use std::fmt::Debug;

/// Direction of a scalar objective.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use u_heuristic::fitness::{compare_scalar, ObjectiveCategory};
///
/// assert_eq!(compare_scalar(ObjectiveCategory::Minimize, 1.0, 2.0), Ordering::Less);
/// assert_eq!(compare_scalar(ObjectiveCategory::Maximize, 1.0, 2.0), Ordering::Greater);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectiveCategory {
    /// Numerically smaller values are better.
    #[default]
    Minimize,
    /// Numerically larger values are better.
    Maximize,
}

impl ObjectiveCategory {
    /// The worst value a scalar objective can take in this direction.
    pub fn worst_value(self) -> f64 {
        match self {
            ObjectiveCategory::Minimize => f64::INFINITY,
            ObjectiveCategory::Maximize => f64::NEG_INFINITY,
        }
    }
}

/// Ordering contract for a fitness type.
///
/// `compare` must be a total preorder (ties allowed) so that populations
/// can be sorted with it. `Less` means `lhs` is preferred.
pub trait FitnessOrder: Send + Sync {
    /// The fitness representation ranked by this order.
    type Value: Clone + Debug + Send + Sync;

    /// Three-way comparison; `Less` when `lhs` is the better fitness.
    fn compare(&self, lhs: &Self::Value, rhs: &Self::Value) -> Ordering;

    /// Sentinel fitness that no evaluable candidate is worse than.
    fn worst(&self) -> Self::Value;

    /// Projects a fitness onto the real line, larger is better.
    ///
    /// Used where fitness has to become a weight (normalization,
    /// roulette selection).
    fn score(&self, value: &Self::Value) -> f64;

    /// Non-negative divergence between two fitness values.
    fn distance(&self, lhs: &Self::Value, rhs: &Self::Value) -> f64;
}

/// Compares two scalar objectives in the given direction.
///
/// NaN ranks below every number and equal to another NaN, so the result
/// stays a total preorder.
pub fn compare_scalar(category: ObjectiveCategory, lhs: f64, rhs: f64) -> Ordering {
    match (lhs.is_nan(), rhs.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let natural = lhs.partial_cmp(&rhs).unwrap_or(Ordering::Equal);
            match category {
                ObjectiveCategory::Minimize => natural,
                ObjectiveCategory::Maximize => natural.reverse(),
            }
        }
    }
}

/// Lifts a fitness comparison to possibly absent fitness.
///
/// An absent fitness marks a candidate that could not be evaluated; it
/// is worse than any present fitness and equal to another absent one.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use u_heuristic::fitness::{compare_optional, FitnessOrder, ObjectiveCategory};
///
/// let order = ObjectiveCategory::Minimize;
/// let cmp = |a: &f64, b: &f64| order.compare(a, b);
/// assert_eq!(compare_optional(None, Some(&1e9), cmp), Ordering::Greater);
/// assert_eq!(compare_optional::<f64, _>(None, None, cmp), Ordering::Equal);
/// ```
pub fn compare_optional<V, F>(lhs: Option<&V>, rhs: Option<&V>, compare: F) -> Ordering
where
    F: FnOnce(&V, &V) -> Ordering,
{
    match (lhs, rhs) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(l), Some(r)) => compare(l, r),
    }
}

impl FitnessOrder for ObjectiveCategory {
    type Value = f64;

    fn compare(&self, lhs: &f64, rhs: &f64) -> Ordering {
        compare_scalar(*self, *lhs, *rhs)
    }

    fn worst(&self) -> f64 {
        self.worst_value()
    }

    fn score(&self, value: &f64) -> f64 {
        match self {
            ObjectiveCategory::Minimize => -value,
            ObjectiveCategory::Maximize => *value,
        }
    }

    fn distance(&self, lhs: &f64, rhs: &f64) -> f64 {
        (lhs - rhs).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_minimize_prefers_smaller() {
        let order = ObjectiveCategory::Minimize;
        assert_eq!(order.compare(&1.0, &2.0), Ordering::Less);
        assert_eq!(order.compare(&2.0, &1.0), Ordering::Greater);
        assert_eq!(order.compare(&2.0, &2.0), Ordering::Equal);
    }

    #[test]
    fn test_maximize_prefers_larger() {
        let order = ObjectiveCategory::Maximize;
        assert_eq!(order.compare(&3.0, &2.0), Ordering::Less);
        assert_eq!(order.compare(&2.0, &3.0), Ordering::Greater);
    }

    #[test]
    fn test_nan_is_worst() {
        for category in [ObjectiveCategory::Minimize, ObjectiveCategory::Maximize] {
            assert_eq!(compare_scalar(category, f64::NAN, 1e300), Ordering::Greater);
            assert_eq!(compare_scalar(category, -1e300, f64::NAN), Ordering::Less);
            assert_eq!(compare_scalar(category, f64::NAN, f64::NAN), Ordering::Equal);
        }
    }

    #[test]
    fn test_worst_loses_to_everything_finite() {
        for category in [ObjectiveCategory::Minimize, ObjectiveCategory::Maximize] {
            let worst = category.worst();
            assert_eq!(category.compare(&0.0, &worst), Ordering::Less);
            assert_eq!(category.compare(&-1e308, &worst), Ordering::Less);
            assert_eq!(category.compare(&1e308, &worst), Ordering::Less);
        }
    }

    #[test]
    fn test_absent_fitness_is_dominated() {
        let order = ObjectiveCategory::Maximize;
        let cmp = |a: &f64, b: &f64| order.compare(a, b);
        assert_eq!(compare_optional(Some(&-1e9), None, cmp), Ordering::Less);
        assert_eq!(compare_optional(None, Some(&-1e9), cmp), Ordering::Greater);
        assert_eq!(compare_optional(None, None, cmp), Ordering::Equal);
    }

    #[test]
    fn test_score_direction() {
        assert!(ObjectiveCategory::Minimize.score(&1.0) > ObjectiveCategory::Minimize.score(&2.0));
        assert!(ObjectiveCategory::Maximize.score(&2.0) > ObjectiveCategory::Maximize.score(&1.0));
    }

    #[test]
    fn test_distance_is_absolute_difference() {
        assert!((ObjectiveCategory::Minimize.distance(&3.0, &5.5) - 2.5).abs() < 1e-12);
        assert!((ObjectiveCategory::Minimize.distance(&5.5, &3.0) - 2.5).abs() < 1e-12);
    }

    fn fitness() -> impl Strategy<Value = Option<f64>> {
        prop_oneof![
            1 => Just(None),
            1 => Just(Some(f64::NAN)),
            8 => (-1e6..1e6f64).prop_map(Some),
        ]
    }

    proptest! {
        #[test]
        fn prop_comparator_is_antisymmetric(a in fitness(), b in fitness(), maximize: bool) {
            let category = if maximize { ObjectiveCategory::Maximize } else { ObjectiveCategory::Minimize };
            let cmp = |l: &f64, r: &f64| category.compare(l, r);
            let forward = compare_optional(a.as_ref(), b.as_ref(), cmp);
            let backward = compare_optional(b.as_ref(), a.as_ref(), cmp);
            prop_assert_eq!(forward, backward.reverse());
        }

        #[test]
        fn prop_comparator_is_transitive(a in fitness(), b in fitness(), c in fitness()) {
            let category = ObjectiveCategory::Minimize;
            let cmp = |l: &Option<f64>, r: &Option<f64>| {
                compare_optional(l.as_ref(), r.as_ref(), |x: &f64, y: &f64| category.compare(x, y))
            };
            if cmp(&a, &b) != Ordering::Greater && cmp(&b, &c) != Ordering::Greater {
                prop_assert_ne!(cmp(&a, &c), Ordering::Greater);
            }
        }
    }
}
