//! Conversion of the tracker's machine-readable timestamps to epoch seconds.

use chrono::DateTime;

use crate::ParseError;

/// Format of `datetime` attributes on the issue page, e.g.
/// `2016-12-14T14:42:08+0000`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Parses a `YYYY-MM-DDTHH:MM:SS±ZZZZ` timestamp into Unix epoch seconds,
/// honoring its UTC offset.
///
/// # Errors
///
/// Returns [`ParseError::Timestamp`] if `value` does not match
/// [`TIMESTAMP_FORMAT`].
pub fn epoch_seconds(value: &str) -> Result<i64, ParseError> {
    DateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|dt| dt.timestamp())
        .map_err(|source| ParseError::Timestamp {
            value: value.to_owned(),
            source,
        })
}
