//! Packed decimal deltas.
//!
//! A delta uses the same digit grouping as a packed time, but every group is
//! a plain unit count: `...YYYYMMDD.hhmmssSSS` where years are 365 days and
//! months 30 days. Groups are not range checked, so `0.99` is ninety-nine
//! hours.
//!
//! Digits are read from the shortest decimal rendering of the value rather
//! than by scaling the float, so a unit boundary never moves because of
//! binary rounding.

use chrono::Duration;
use serde::{Deserialize, Serialize};

const DAYS_PER_YEAR: i64 = 365;
const DAYS_PER_MONTH: i64 = 30;

/// Fractional digits that carry meaning: hh mm ss SSS.
const FRACTION_DIGITS: usize = 9;

/// A signed offset packed as `YYYYMMDD.hhmmssSSS`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackedDelta(pub f64);

impl PackedDelta {
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Splits the delta into its unit counts.
    ///
    /// Returns `None` for NaN, infinities and year counts beyond `i64`.
    pub fn parts(&self) -> Option<DeltaParts> {
        if !self.0.is_finite() {
            return None;
        }

        let text = self.0.abs().to_string();
        let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

        let split = integer.len().saturating_sub(4);
        let years = if split == 0 {
            0
        } else {
            integer[..split].parse::<i64>().ok()?
        };
        let month_day = integer[split..].parse::<i64>().ok()?;

        let mut fraction = fraction.as_bytes().iter().take(FRACTION_DIGITS).map(|b| i64::from(b - b'0'));
        let mut group = |width: usize| (0..width).fold(0, |acc, _| acc * 10 + fraction.next().unwrap_or(0));

        let hours = group(2);
        let minutes = group(2);
        let seconds = group(2);
        let milliseconds = group(3);

        Some(DeltaParts {
            negative: self.0.is_sign_negative() && self.0 != 0.0,
            years,
            months: month_day / 100,
            days: month_day % 100,
            hours,
            minutes,
            seconds,
            milliseconds,
        })
    }
}

impl From<f64> for PackedDelta {
    fn from(value: f64) -> Self {
        PackedDelta(value)
    }
}

/// Unit counts of a packed delta. Counts are magnitudes; the sign is separate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeltaParts {
    pub negative: bool,
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub milliseconds: i64,
}

impl DeltaParts {
    /// Sums the unit counts into a duration using fixed unit sizes.
    pub fn to_duration(&self) -> Option<Duration> {
        let days = self
            .years
            .checked_mul(DAYS_PER_YEAR)?
            .checked_add(self.months * DAYS_PER_MONTH)?
            .checked_add(self.days)?;

        let total = Duration::try_days(days)?
            .checked_add(&Duration::try_hours(self.hours)?)?
            .checked_add(&Duration::try_minutes(self.minutes)?)?
            .checked_add(&Duration::try_seconds(self.seconds)?)?
            .checked_add(&Duration::try_milliseconds(self.milliseconds)?)?;

        Some(if self.negative { -total } else { total })
    }
}

/// Decodes a packed delta into a duration.
///
/// Returns `None` when the value is not finite or does not fit a duration.
pub fn decode(packed: PackedDelta) -> Option<Duration> {
    packed.parts()?.to_duration()
}
