//! Virtual clock core.
//!
//! Converts between packed decimal timestamps (`YYMMDD.hhmmss` carried in an
//! `f64`) and calendar time, decodes packed deltas into durations using
//! fixed unit sizes, and keeps the offset between the virtual clock and real
//! time. [`ClockService`] composes these; [`ClockApiBuilder`] exposes it over
//! HTTP.

pub mod api;
pub mod codec;
pub mod delta;
pub mod error;
pub mod offset;
pub mod service;
pub mod source;

/// A fully resolved UTC timestamp.
pub type CalendarTime = chrono::DateTime<chrono::Utc>;

pub use api::ClockApiBuilder;
pub use codec::PackedTime;
pub use delta::{DeltaParts, PackedDelta};
pub use error::{ClockError, DecodeError, TimeField};
pub use offset::ClockOffset;
pub use service::ClockService;
pub use source::{ManualTimeSource, SystemTimeSource, TimeSource};
