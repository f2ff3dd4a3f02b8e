use std::sync::Arc;

use chrono::Duration;
use parking_lot::RwLock;

use crate::CalendarTime;

/// Difference between the virtual clock and real time.
///
/// Cloning shares the same underlying value. Every read and write goes
/// through one lock, so a reader never observes a torn update.
#[derive(Debug, Clone, Default)]
pub struct ClockOffset {
    inner: Arc<RwLock<Duration>>,
}

impl ClockOffset {
    /// Creates a zero offset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `target - reference` and returns the new offset.
    pub fn set(&self, target: CalendarTime, reference: CalendarTime) -> Duration {
        let offset = target.signed_duration_since(reference);
        *self.inner.write() = offset;
        offset
    }

    pub fn reset(&self) {
        *self.inner.write() = Duration::zero();
    }

    pub fn get(&self) -> Duration {
        *self.inner.read()
    }
}
