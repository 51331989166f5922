//! UTC clock helpers shared by the store and the endpoints.
//!
//! Timestamps are truncated to whole seconds before they are stored so that
//! the RFC 3339 text SQLite holds compares and orders exactly, without
//! sub-second digits interfering.

use time::{Duration, OffsetDateTime};

/// The current UTC time, truncated to whole seconds.
pub fn now_utc() -> OffsetDateTime {
    truncate_to_seconds(OffsetDateTime::now_utc())
}

/// Drop the sub-second component of `datetime`.
pub fn truncate_to_seconds(datetime: OffsetDateTime) -> OffsetDateTime {
    datetime
        .replace_nanosecond(0)
        .expect("zero is a valid nanosecond")
}

/// The half-open range `[midnight_UTC(now), midnight_UTC(now) + 24h)`
/// covering the UTC calendar day that `now` falls in.
pub fn today_utc_range(now: OffsetDateTime) -> (OffsetDateTime, OffsetDateTime) {
    let start = now.date().midnight().assume_utc();

    (start, start + Duration::days(1))
}
