//! # EV Load Profile
//!
//! Stochastic charging load profiles of household electric vehicles, driven by
//! a per-minute occupancy series and national mobility statistics.

pub mod config;
pub mod data;
pub mod domain;
pub mod simulation;
pub mod telemetry;

pub use domain::{ConfigError, InvariantViolation, SimulationError};
