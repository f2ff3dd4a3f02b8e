//! Packed decimal time codec.
//!
//! A packed time is an `f64` whose decimal digits read `YYMMDD.hhmmss`.
//! Decoding renders the value with exactly six integer and six fractional
//! digits and then validates each calendar field; encoding goes the other
//! way and drops everything below one second.

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, TimeField};
use crate::CalendarTime;

/// Two-digit years below this map to 20xx, the rest to 19xx.
const CENTURY_PIVOT: u32 = 69;

/// Width of the canonical `YYMMDD.hhmmss` rendering.
const PACKED_WIDTH: usize = 13;

/// A timestamp packed as `YYMMDD.hhmmss`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackedTime(pub f64);

impl PackedTime {
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Canonical text form, rounded to six fractional digits.
    pub fn canonical_text(&self) -> String {
        format!("{:013.6}", self.0)
    }

    /// Milliseconds carried by fractional digits seven to nine.
    ///
    /// [`decode`] does not apply this; the calendar time it returns is whole
    /// seconds, rounded by [`Self::canonical_text`].
    pub fn subsecond_remainder(&self) -> Duration {
        if !self.0.is_finite() {
            return Duration::zero();
        }
        let text = self.0.abs().to_string();
        let fraction = text.split_once('.').map(|(_, fraction)| fraction).unwrap_or("");
        let millis = fraction
            .bytes()
            .chain(std::iter::repeat(b'0'))
            .skip(6)
            .take(3)
            .fold(0, |acc, digit| acc * 10 + i64::from(digit - b'0'));
        Duration::milliseconds(millis)
    }
}

impl From<f64> for PackedTime {
    fn from(value: f64) -> Self {
        PackedTime(value)
    }
}

/// Decodes a packed time into a UTC calendar time.
///
/// Month, hour, minute and second are checked in layout order. Any
/// two-digit day is accepted until those pass; only then is it checked
/// against the length of its month, so `710132.250000` names the hour.
pub fn decode(packed: PackedTime) -> Result<CalendarTime, DecodeError> {
    let text = packed.canonical_text();
    let digits = match split_digits(&text) {
        Some(digits) => digits,
        None => return Err(DecodeError::Malformed { text }),
    };

    let [yy, month, day, hour, minute, second] = digits;
    let year = expand_year(yy);

    let out_of_range = |field| DecodeError::OutOfRange {
        field,
        text: text.clone(),
    };

    if !(1..=12).contains(&month) {
        return Err(out_of_range(TimeField::Month));
    }
    if hour > 23 {
        return Err(out_of_range(TimeField::Hour));
    }
    if minute > 59 {
        return Err(out_of_range(TimeField::Minute));
    }
    if second > 59 {
        return Err(out_of_range(TimeField::Second));
    }

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| out_of_range(TimeField::Day))?;
    let naive = date
        .and_hms_opt(hour, minute, second)
        .ok_or_else(|| out_of_range(TimeField::Second))?;

    Ok(Utc.from_utc_datetime(&naive))
}

/// Encodes a calendar time as `YYMMDD.hhmmss`, truncating sub-second precision.
pub fn encode(t: CalendarTime) -> PackedTime {
    let t = t.with_timezone(&Utc);
    let text = format!(
        "{:02}{:02}{:02}.{:02}{:02}{:02}",
        t.year().rem_euclid(100),
        t.month(),
        t.day(),
        t.hour(),
        t.minute(),
        t.second(),
    );
    PackedTime(text.parse().expect("packed text is always a plain decimal"))
}

/// Formats a calendar time as the fixed 14-digit `YYYYMMDDhhmmss` string.
pub fn to_long_string(t: &CalendarTime) -> String {
    t.format("%Y%m%d%H%M%S").to_string()
}

fn expand_year(yy: u32) -> i32 {
    let yy = yy as i32;
    if yy < CENTURY_PIVOT as i32 {
        2000 + yy
    } else {
        1900 + yy
    }
}

/// Splits `DDDDDD.DDDDDD` into six two-digit groups.
fn split_digits(text: &str) -> Option<[u32; 6]> {
    let bytes = text.as_bytes();
    if bytes.len() != PACKED_WIDTH || bytes[6] != b'.' {
        return None;
    }

    let mut groups = [0u32; 6];
    let digits = bytes[..6].iter().chain(&bytes[7..]);
    for (idx, byte) in digits.enumerate() {
        if !byte.is_ascii_digit() {
            return None;
        }
        groups[idx / 2] = groups[idx / 2] * 10 + u32::from(byte - b'0');
    }
    Some(groups)
}
