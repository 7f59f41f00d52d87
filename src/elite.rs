//! Bounded elite set.
//!
//! Each engine keeps up to `K` best-known candidates across iterations.
//! [`refresh_elites`] folds a freshly sorted population into that list.

use std::cmp::Ordering;

/// A candidate position paired with its fitness.
///
/// `fitness` is `None` when the position could not be evaluated.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution<V> {
    pub position: Vec<f64>,
    pub fitness: Option<V>,
}

impl<V> Solution<V> {
    pub fn new(position: Vec<f64>, fitness: Option<V>) -> Self {
        Self { position, fitness }
    }
}

impl<V> AsRef<[f64]> for Solution<V> {
    fn as_ref(&self) -> &[f64] {
        &self.position
    }
}

/// Merges `candidates` into `elites`, keeping at most `capacity` entries.
///
/// Both slices must be sorted best-to-worst under `compare`. The merge
/// walks the two lists once: a candidate strictly better than the elite
/// under the cursor is inserted in front of it and both cursors advance;
/// otherwise only the elite cursor advances. Leftover candidates are
/// appended up to index `max(j, capacity - len)`, then the tail beyond
/// `capacity` is dropped.
///
/// This is a best-effort top-K under repeated calls, not an exact one: a
/// candidate skipped by the walk is never reconsidered.
///
/// # Examples
///
/// ```
/// use u_heuristic::elite::refresh_elites;
///
/// let mut elites = vec![5.0];
/// refresh_elites(&mut elites, &[3.0, 7.0], 2, |a: &f64, b: &f64| a.total_cmp(b));
/// assert_eq!(elites, vec![3.0, 5.0]);
/// ```
pub fn refresh_elites<T, F>(elites: &mut Vec<T>, candidates: &[T], capacity: usize, compare: F)
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    let mut i = 0;
    let mut j = 0;
    while i != elites.len() && j != candidates.len() {
        if compare(&candidates[j], &elites[i]) == Ordering::Less {
            elites.insert(i, candidates[j].clone());
            j += 1;
        }
        i += 1;
    }

    if j != candidates.len() {
        let end = candidates
            .len()
            .min(j.max(capacity.saturating_sub(elites.len())));
        if end > j {
            elites.extend_from_slice(&candidates[j..end]);
        }
    }

    elites.truncate(capacity);
}
