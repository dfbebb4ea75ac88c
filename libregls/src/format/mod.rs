//! Creation timestamp handling.
//!
//! Config blobs carry their creation time as an RFC3339 string with up to
//! nanosecond precision. This module turns that string into a sort key and
//! into the fixed `YYYY-MM-DD HH:MM:SS` display form.

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::{RegistryError, Result};

#[cfg(test)]
mod tests;

/// Display layout for creation times.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses an RFC3339 timestamp, keeping its original offset.
///
/// # Examples
///
/// ```
/// use libregls::format::parse_created;
///
/// let ts = parse_created("2023-05-01T12:30:00.123456789Z").unwrap();
/// assert_eq!(ts.timestamp_subsec_nanos(), 123456789);
/// ```
pub fn parse_created(raw: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).map_err(|e| RegistryError::time_parse(raw, e))
}

/// Returns the instant used to order tags by creation time.
///
/// Unparseable timestamps map to the minimum representable instant so they
/// always sort as the oldest.
pub fn created_sort_key(raw: &str) -> DateTime<Utc> {
    parse_created(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Formats a creation timestamp for display, in the timestamp's own offset.
///
/// # Examples
///
/// ```
/// use libregls::format::format_created;
///
/// let shown = format_created("2023-05-01T12:30:00.123456Z").unwrap();
/// assert_eq!(shown, "2023-05-01 12:30:00");
/// ```
pub fn format_created(raw: &str) -> Result<String> {
    parse_created(raw).map(|dt| dt.format(DISPLAY_FORMAT).to_string())
}
