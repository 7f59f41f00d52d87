//! Simulated Annealing (SAA) over a callback model.
//!
//! A single trajectory perturbs a few dimensions per trial and accepts
//! worsening moves with the Metropolis probability `exp(-d / T)`, where
//! `d` is the model's objective distance. Temperature cools
//! geometrically per outer iteration and the perturbation step shrinks
//! whenever a new best is found.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"

mod config;
mod runner;
mod types;

pub use config::{Disturbance, SaaConfig};
pub use runner::{SaaResult, SaaRunner};
pub use types::TemperatureSchedule;
