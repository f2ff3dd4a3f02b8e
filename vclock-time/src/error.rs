use std::fmt;

use thiserror::Error;

/// Calendar component of a packed time that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeField::Month => "month",
            TimeField::Day => "day",
            TimeField::Hour => "hour",
            TimeField::Minute => "minute",
            TimeField::Second => "second",
        }
    }
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A packed time that could not be turned into a calendar time.
///
/// `text` is always the canonical `YYMMDD.hhmmss` rendering that was parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("parsing time {text:?}: {field} out of range")]
    OutOfRange { field: TimeField, text: String },
    #[error("parsing time {text:?}: expected packed YYMMDD.hhmmss")]
    Malformed { text: String },
}

impl DecodeError {
    /// The offending calendar field, if the text was structurally valid.
    pub fn field(&self) -> Option<TimeField> {
        match self {
            DecodeError::OutOfRange { field, .. } => Some(*field),
            DecodeError::Malformed { .. } => None,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            DecodeError::OutOfRange { text, .. } | DecodeError::Malformed { text } => text,
        }
    }
}

/// Errors returned by [`crate::ClockService`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("time or delta outside the representable range")]
    OutOfRange,
}
