//! Parsing and validation of raw telemetry records.
//!
//! A raw record is a 3-field comma-separated line:
//! `"{timestampMs},{x},{y}"`. Validation is pure and has no side effects;
//! the first failing field (in record order) determines the error.

use crate::event::types::Event;

/// Validation failure for a raw record.
///
/// Each variant carries the offending raw field text so the rejection
/// message can echo exactly what was received.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field 1 did not parse as an integer millisecond timestamp.
    InvalidTimestamp(String),
    /// Field 2 did not parse as a real number, or fell outside `(0, 1)`.
    InvalidX(String),
    /// Field 3 did not parse as an integer, or fell outside the `y` domain.
    InvalidY(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidTimestamp(raw) => write!(
                f,
                "Timestamp must be a Unix timestamp in millisecond resolution, but received {raw}"
            ),
            ValidationError::InvalidX(raw) => {
                write!(f, "X must be in 0..1, but received {raw}")
            }
            ValidationError::InvalidY(raw) => {
                write!(
                    f,
                    "Y must be in 1,073,741,823..2,147,483,647, but received {raw}"
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Parse a raw record into a validated [`Event`].
///
/// A missing field counts as a parse failure of that field. Fields beyond
/// the third are ignored.
pub fn parse_record(data: &str) -> Result<Event, ValidationError> {
    let mut fields = data.split(',');

    let raw_timestamp = fields.next().unwrap_or("");
    let timestamp = raw_timestamp
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidTimestamp(raw_timestamp.to_string()))?;

    let raw_x = fields.next().unwrap_or("");
    let x = match raw_x.parse::<f64>() {
        Ok(value) if Event::x_in_range(value) => value,
        _ => return Err(ValidationError::InvalidX(raw_x.to_string())),
    };

    let raw_y = fields.next().unwrap_or("");
    let y = match raw_y.parse::<i64>() {
        Ok(value) if Event::y_in_range(value) => value,
        _ => return Err(ValidationError::InvalidY(raw_y.to_string())),
    };

    Ok(Event::new(timestamp, x, y))
}
