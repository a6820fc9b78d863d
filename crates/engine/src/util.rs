//! Parsing and validation helpers.
//!
//! The commitment catalog and the billing CSV share one timestamp format;
//! only the format and [`format_timestamp`] are re-exported.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{EngineError, ResultEngine};

/// Fixed timestamp format used by catalog check-ins and billing rows.
///
/// Values carry no offset and are always interpreted as UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a `YYYY-MM-DD HH:MM:SS` string as a UTC instant.
pub(crate) fn parse_timestamp(value: &str, label: &str) -> ResultEngine<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| EngineError::InvalidData(format!("invalid {label} timestamp: {value}")))
}

/// Format an instant back into the catalog timestamp format.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Trim a required text field, rejecting blank values.
pub(crate) fn required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidData(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}
