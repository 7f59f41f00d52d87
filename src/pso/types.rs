//! Particle state.

use crate::elite::Solution;

/// A particle's best-ever recorded state.
///
/// Held by value: replacing it never aliases the particle itself, so
/// particles can be re-sorted freely.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticleBest<V> {
    pub position: Vec<f64>,
    pub fitness: Option<V>,
}

/// A particle of the swarm.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Particle<V> {
    pub fitness: Option<V>,
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
    pub best: ParticleBest<V>,
}

impl<V: Clone> Particle<V> {
    /// Creates a particle that is its own personal best.
    ///
    /// # Panics
    /// Panics if `position` and `velocity` differ in length.
    pub fn new(position: Vec<f64>, velocity: Vec<f64>, fitness: Option<V>) -> Self {
        assert_eq!(
            position.len(),
            velocity.len(),
            "position and velocity must have the same length"
        );
        let best = ParticleBest {
            position: position.clone(),
            fitness: fitness.clone(),
        };
        Self {
            fitness,
            position,
            velocity,
            best,
        }
    }

    pub fn size(&self) -> usize {
        self.position.len()
    }

    /// Copies the current state into the personal best.
    pub fn adopt_as_best(&mut self) {
        self.best = self.snapshot();
    }

    /// Value copy of the current position and fitness.
    pub fn snapshot(&self) -> ParticleBest<V> {
        ParticleBest {
            position: self.position.clone(),
            fitness: self.fitness.clone(),
        }
    }
}

impl<V> AsRef<[f64]> for Particle<V> {
    fn as_ref(&self) -> &[f64] {
        &self.position
    }
}

impl<V: Clone> From<&Particle<V>> for Solution<V> {
    fn from(particle: &Particle<V>) -> Self {
        Solution::new(particle.position.clone(), particle.fitness.clone())
    }
}

impl<V> From<ParticleBest<V>> for Solution<V> {
    fn from(best: ParticleBest<V>) -> Self {
        Solution::new(best.position, best.fitness)
    }
}
