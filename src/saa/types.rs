//! Cooling schedule.

/// Geometric cooling `T(k) = initial * gradient^k`, cached per iteration.
///
/// Each temperature is the previous one times `gradient`, so a lookup at
/// `k` costs one multiplication per iteration not yet cached.
///
/// # Examples
///
/// ```
/// use u_heuristic::saa::TemperatureSchedule;
///
/// let mut schedule = TemperatureSchedule::new(100.0, 0.5);
/// assert_eq!(schedule.temperature(0), 100.0);
/// assert_eq!(schedule.temperature(3), 12.5);
/// ```
#[derive(Debug, Clone)]
pub struct TemperatureSchedule {
    gradient: f64,
    cache: Vec<f64>,
}

impl TemperatureSchedule {
    pub fn new(initial: f64, gradient: f64) -> Self {
        Self {
            gradient,
            cache: vec![initial],
        }
    }

    pub fn temperature(&mut self, k: u64) -> f64 {
        let k = usize::try_from(k).unwrap_or(usize::MAX);
        while self.cache.len() <= k {
            let last = self.cache[self.cache.len() - 1];
            let next = last * self.gradient;
            self.cache.push(next);
            if next == 0.0 {
                return next;
            }
        }
        self.cache[k]
    }
}
