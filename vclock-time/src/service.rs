use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};

use crate::codec::{self, PackedTime};
use crate::delta::{self, PackedDelta};
use crate::error::{ClockError, DecodeError};
use crate::offset::ClockOffset;
use crate::source::{SystemTimeSource, TimeSource};
use crate::CalendarTime;

/// The virtual clock: real time shifted by a settable offset.
///
/// Clones share the same offset, so one instance can be handed to every
/// request handler.
#[derive(Clone)]
pub struct ClockService {
    offset: ClockOffset,
    source: Arc<dyn TimeSource>,
}

impl Default for ClockService {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockService {
    /// Creates a clock driven by the host wall clock.
    pub fn new() -> Self {
        Self::with_source(Arc::new(SystemTimeSource))
    }

    pub fn with_source(source: Arc<dyn TimeSource>) -> Self {
        Self {
            offset: ClockOffset::new(),
            source,
        }
    }

    /// Current virtual time, packed.
    pub fn now(&self) -> PackedTime {
        codec::encode(self.virtual_now())
    }

    /// Renders a packed time as `YYYYMMDDhhmmss`.
    pub fn stringify(&self, packed: PackedTime) -> Result<String, DecodeError> {
        let time = decode_logged(packed)?;
        Ok(codec::to_long_string(&time))
    }

    /// Adds a packed delta to a packed time.
    ///
    /// Both arguments are required and the delta must be non-zero; a time
    /// that fails to decode is reported before the delta is looked at.
    pub fn add_delta(
        &self,
        time: Option<PackedTime>,
        delta: Option<PackedDelta>,
    ) -> Result<PackedTime, ClockError> {
        let time = time.ok_or(ClockError::MissingField("time"))?;
        let start = decode_logged(time)?;

        let delta = delta
            .filter(|delta| delta.value().is_finite())
            .ok_or(ClockError::MissingField("delta"))?;
        let duration = delta::decode(delta).ok_or(ClockError::OutOfRange)?;
        if duration == Duration::zero() {
            return Err(ClockError::MissingField("delta"));
        }

        let end = start
            .checked_add_signed(duration)
            .ok_or(ClockError::OutOfRange)?;
        Ok(codec::encode(end))
    }

    /// Moves the virtual clock so that it reads `packed` right now.
    ///
    /// The offset is untouched when `packed` does not decode.
    pub fn set_offset(&self, packed: PackedTime) -> Result<(), DecodeError> {
        let target = decode_logged(packed)?;
        let offset = self.offset.set(target, self.source.now());
        info!(
            time = %target,
            offset_secs = offset.num_seconds(),
            dropped_ms = packed.subsecond_remainder().num_milliseconds(),
            "virtual clock offset set"
        );
        Ok(())
    }

    /// Puts the virtual clock back on real time.
    pub fn reset_offset(&self) {
        self.offset.reset();
        info!("virtual clock offset reset");
    }

    fn virtual_now(&self) -> CalendarTime {
        let real = self.source.now();
        let offset = self.offset.get();
        real.checked_add_signed(offset).unwrap_or_else(|| {
            warn!(offset_secs = offset.num_seconds(), "offset overflows calendar range, using real time");
            real
        })
    }
}

fn decode_logged(packed: PackedTime) -> Result<CalendarTime, DecodeError> {
    codec::decode(packed).map_err(|err| {
        debug!(error = %err, "rejected packed time");
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimeField;
    use crate::source::ManualTimeSource;
    use chrono::{TimeZone, Utc};

    fn manual_service() -> (ClockService, ManualTimeSource) {
        let source = ManualTimeSource::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 15).unwrap());
        (ClockService::with_source(Arc::new(source.clone())), source)
    }

    #[test]
    fn now_without_offset_is_real_time() {
        let (service, _) = manual_service();
        assert_eq!(service.now(), PackedTime(240501.123015));
    }

    #[test]
    fn stringify_uses_four_digit_year() {
        let (service, _) = manual_service();
        assert_eq!(service.stringify(PackedTime(710822.010001)).unwrap(), "19710822010001");
        assert_eq!(service.stringify(PackedTime(822.010001499)).unwrap(), "20000822010001");
    }

    #[test]
    fn stringify_propagates_decode_error() {
        let (service, _) = manual_service();
        let err = service.stringify(PackedTime(711131.010001499)).unwrap_err();
        assert_eq!(err.field(), Some(TimeField::Day));
        assert_eq!(err.to_string(), r#"parsing time "711131.010001": day out of range"#);
    }

    #[test]
    fn add_delta_uses_fixed_units() {
        let (service, _) = manual_service();
        let result = service
            .add_delta(Some(PackedTime(710813.010000499)), Some(PackedDelta(10101.999999)))
            .unwrap();
        assert_eq!(result, PackedTime(720916.054039));
    }

    #[test]
    fn add_delta_requires_both_arguments() {
        let (service, _) = manual_service();
        let time = Some(PackedTime(710813.010000499));

        assert_eq!(
            service.add_delta(None, Some(PackedDelta(0.99))),
            Err(ClockError::MissingField("time"))
        );
        assert_eq!(service.add_delta(time, None), Err(ClockError::MissingField("delta")));
        assert_eq!(
            service.add_delta(time, Some(PackedDelta(0.0))),
            Err(ClockError::MissingField("delta"))
        );
        assert_eq!(
            service.add_delta(time, Some(PackedDelta(f64::NAN))),
            Err(ClockError::MissingField("delta"))
        );
    }

    #[test]
    fn add_delta_reports_time_error_first() {
        let (service, _) = manual_service();
        let err = service
            .add_delta(Some(PackedTime(711131.010001499)), None)
            .unwrap_err();
        assert!(matches!(err, ClockError::Decode(ref e) if e.field() == Some(TimeField::Day)));
    }

    #[test]
    fn add_delta_rejects_overflow() {
        let (service, _) = manual_service();
        assert_eq!(
            service.add_delta(Some(PackedTime(710813.01)), Some(PackedDelta(1e300))),
            Err(ClockError::OutOfRange)
        );
    }

    #[test]
    fn add_negative_delta_moves_backwards() {
        let (service, _) = manual_service();
        let result = service
            .add_delta(Some(PackedTime(710813.010000)), Some(PackedDelta(-1.01)))
            .unwrap();
        assert_eq!(result, PackedTime(710812.0));
    }

    #[test]
    fn set_offset_then_now_reads_target() {
        let (service, source) = manual_service();
        service.set_offset(PackedTime(710813.010000499)).unwrap();
        assert_eq!(service.now(), PackedTime(710813.010000));

        // The virtual clock keeps running at real speed.
        source.advance(Duration::seconds(61));
        assert_eq!(service.now(), PackedTime(710813.010101));
    }

    #[test]
    fn failed_set_leaves_offset_alone() {
        let (service, _) = manual_service();
        service.set_offset(PackedTime(710813.010000)).unwrap();

        let err = service.set_offset(PackedTime(711131.010001)).unwrap_err();
        assert_eq!(err.field(), Some(TimeField::Day));
        assert_eq!(service.now(), PackedTime(710813.010000));
    }

    #[test]
    fn reset_returns_to_real_time() {
        let (service, source) = manual_service();
        service.set_offset(PackedTime(710813.010000)).unwrap();
        service.reset_offset();
        assert_eq!(service.now(), codec::encode(source.now()));
    }

    #[test]
    fn system_clock_reset_is_close_to_real_time() {
        let service = ClockService::new();
        service.reset_offset();
        let now = codec::decode(service.now()).unwrap();
        assert!((Utc::now() - now).num_seconds().abs() <= 1);
    }

    #[test]
    fn concurrent_sets_land_on_one_target() {
        let (service, _) = manual_service();
        let targets = [
            PackedTime(710813.010000),
            PackedTime(991231.235959),
            PackedTime(200229.120000),
            PackedTime(680101.000001),
        ];

        let handles: Vec<_> = targets
            .iter()
            .copied()
            .map(|target| {
                let service = service.clone();
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        service.set_offset(target).unwrap();
                        let _ = service.now();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(targets.contains(&service.now()));
    }
}
