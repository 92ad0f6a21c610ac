//! Timestamp helpers.
//!
//! Every timestamp that leaves the domain is rendered with
//! [`TIMESTAMP_FORMAT`], which has whole-second precision. Timestamps created
//! here are truncated to seconds so formatting and parsing round-trip exactly.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};

use crate::constants::TIMESTAMP_FORMAT;
use crate::error::{DomainError, DomainResult};

/// Current UTC time truncated to whole seconds.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Render a timestamp in the fixed UTC pattern.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp in the fixed UTC pattern.
pub fn parse_timestamp(value: &str) -> DomainResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            DomainError::validation(format!(
                "Invalid timestamp '{}', expected format YYYY-MM-DDTHH:MM:SSZ",
                value
            ))
        })
}

/// Parse an optional timestamp; empty strings mean "absent".
pub fn parse_optional_timestamp(value: &str) -> DomainResult<Option<DateTime<Utc>>> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_timestamp(value).map(Some)
    }
}

/// Render an optional timestamp; absent values become an empty string.
pub fn format_optional_timestamp(value: Option<&DateTime<Utc>>) -> String {
    value.map(format_timestamp).unwrap_or_default()
}
