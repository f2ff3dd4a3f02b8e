//! Core shared library for the virtual clock service.
//!
//! This crate exposes the ambient primitives the clock crates depend on:
//! common errors, configuration loading and logging setup.

pub mod config;
pub mod errors;
pub mod logging;

pub use config::{ClockConfig, Environment};
pub use errors::{ConfigError, Result as CoreResult, VClockError};
