//! Sources of real time for the virtual clock.

use std::sync::Arc;

use chrono::{Duration, Utc};
use parking_lot::Mutex;

use crate::CalendarTime;

/// Provides the current real time in UTC.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> CalendarTime;
}

/// Wall clock of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> CalendarTime {
        Utc::now()
    }
}

/// A time source that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualTimeSource {
    current: Arc<Mutex<CalendarTime>>,
}

impl ManualTimeSource {
    pub fn new(start: CalendarTime) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, now: CalendarTime) {
        *self.current.lock() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock();
        *current += by;
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> CalendarTime {
        *self.current.lock()
    }
}
