//! Particle Swarm Optimization (PSO).
//!
//! A population of particles moves through the box-bounded search space.
//! Each particle is pulled toward its own best-known position and the
//! swarm's global best; velocities and positions are clamped every step.
//!
//! # References
//!
//! - Kennedy & Eberhart (1995), "Particle Swarm Optimization"
//! - Shi & Eberhart (1998), "A Modified Particle Swarm Optimizer"

mod config;
mod runner;
mod types;

pub use config::PsoConfig;
pub use runner::{PsoResult, PsoRunner};
pub use types::{Particle, ParticleBest};
