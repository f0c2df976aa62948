//! Timestamp decoding
//!
//! Raw logs carry ISO-8601 UTC stamps such as `2018-06-23T01:25:04.700Z`.
//! Cleaned files carry integer epoch seconds in the same column, so both
//! forms are accepted and the cleaner can be run over its own output.

use crate::{Result, TripError};
use chrono::NaiveDateTime;

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse a timestamp into whole seconds since the Unix epoch (UTC).
///
/// Any fractional second is truncated, not rounded.
pub fn parse_timestamp(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();

    if !trimmed.is_empty()
        && trimmed
            .strip_prefix('-')
            .unwrap_or(trimmed)
            .bytes()
            .all(|b| b.is_ascii_digit())
    {
        return trimmed
            .parse::<i64>()
            .map_err(|_| TripError::InvalidTimestamp(raw.to_string()));
    }

    let iso = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    let parsed = NaiveDateTime::parse_from_str(iso, ISO_FORMAT)
        .map_err(|_| TripError::InvalidTimestamp(raw.to_string()))?;

    Ok(parsed.and_utc().timestamp())
}
