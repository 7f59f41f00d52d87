//! Multi-Verse Optimizer (MVO).
//!
//! Each candidate is a universe. Dimension values flow from universes
//! with high white-hole rates to others, and wormholes move values
//! around the best universe. The wormhole existence probability (WEP)
//! grows and the travelling distance rate (TDR) shrinks as the run
//! spends its budget.
//!
//! # References
//!
//! - Mirjalili, Mirjalili & Hatamlou (2016), "Multi-Verse Optimizer: a
//!   nature-inspired algorithm for global optimization"

mod config;
mod runner;
mod types;

pub use config::MvoConfig;
pub use runner::{MvoResult, MvoRunner};
pub use types::{Normalization, Universe};
