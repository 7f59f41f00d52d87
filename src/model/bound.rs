//! Box bounds for a single decision dimension.

use rand::Rng;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoundError {
    #[error("InvertedBound: lower bound must not exceed upper. lower = {lower}, upper = {upper}")]
    Inverted { lower: f64, upper: f64 },
    #[error("NonFiniteBound: bounds must be finite numbers. lower = {lower}, upper = {upper}")]
    NotFinite { lower: f64, upper: f64 },
}

/// Closed interval `[lower, upper]` a dimension is clamped to.
///
/// # Examples
///
/// ```
/// use u_heuristic::model::Bound;
///
/// let bound = Bound::new(-10.0, 10.0).unwrap();
/// assert_eq!(bound.clamp(12.5), 10.0);
/// assert_eq!(bound.range(), 20.0);
/// assert!(Bound::new(1.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bound {
    lower: f64,
    upper: f64,
}

impl Bound {
    pub fn new(lower: f64, upper: f64) -> Result<Self, BoundError> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(BoundError::NotFinite { lower, upper });
        }
        if lower > upper {
            return Err(BoundError::Inverted { lower, upper });
        }

        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Width of the interval.
    pub fn range(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.lower..=self.upper).contains(&value)
    }

    /// Clamps `value` into the interval. NaN maps to the lower bound.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.lower;
        }
        value.clamp(self.lower, self.upper)
    }

    /// The point at fraction `t` of the interval, `lower + range * t`.
    ///
    /// Stays finite when the width itself overflows, as it does for
    /// `[-f64::MAX, f64::MAX]`.
    pub fn interpolate(&self, t: f64) -> f64 {
        let range = self.range();
        if range.is_finite() {
            self.lower + range * t
        } else {
            self.lower * (1.0 - t) + self.upper * t
        }
    }

    /// `range * factor`, computed without overflowing the width first.
    pub fn scaled_range(&self, factor: f64) -> f64 {
        let range = self.range();
        if range.is_finite() {
            range * factor
        } else {
            self.upper * factor - self.lower * factor
        }
    }

    /// Draws a uniform value inside the interval.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.lower == self.upper {
            self.lower
        } else {
            self.clamp(self.interpolate(rng.random::<f64>()))
        }
    }
}
