//! Time-based expiry decisions.
//!
//! Expiry is derived from the entry file's last-modified time only; nothing
//! about freshness is stored inside the payload.

use std::fs::Metadata;
use std::time::Duration;

/// Whether an entry written at `last_modified_ms` is expired at `now_ms`.
///
/// `None` as the maximum age means the entry never expires by time. An entry
/// is expired once `now - last_modified >= max_age`.
pub fn is_expired(last_modified_ms: i64, now_ms: i64, max_age: Option<Duration>) -> bool {
    let Some(max_age) = max_age else {
        return false;
    };
    let max_age_ms = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
    now_ms.saturating_sub(last_modified_ms) >= max_age_ms
}

/// Last-modified time of a file in unix milliseconds, if the platform reports one.
pub fn modified_millis(metadata: &Metadata) -> Option<i64> {
    let modified = metadata.modified().ok()?;
    let timestamp = jiff::Timestamp::try_from(modified).ok()?;
    Some(timestamp.as_millisecond())
}

/// Expiry check for an entry whose modification time may be unknown.
///
/// An unknown modification time counts as expired whenever a maximum age
/// applies, so the entry is treated as a miss rather than trusted forever.
pub fn is_entry_expired(modified_ms: Option<i64>, now_ms: i64, max_age: Option<Duration>) -> bool {
    match (modified_ms, max_age) {
        (_, None) => false,
        (None, Some(_)) => true,
        (Some(modified), max_age) => is_expired(modified, now_ms, max_age),
    }
}
