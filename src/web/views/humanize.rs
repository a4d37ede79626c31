//! Relative time phrases such as "5 minutes ago".

use chrono::{DateTime, Utc};

const UNITS: [(&str, i64); 7] = [
    ("year", 31_536_000),
    ("month", 2_592_000),
    ("week", 604_800),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
    ("second", 1),
];

/// Describes `then` relative to `now` using the largest whole unit.
///
/// Differences under one second read as "1 second".
#[must_use]
pub fn relative_to(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);
    let (seconds, suffix) = if delta.num_seconds() < 0 {
        (delta.num_seconds().saturating_neg(), "from now")
    } else {
        (delta.num_seconds(), "ago")
    };
    let seconds = seconds.max(1);
    let (unit, count) = UNITS
        .iter()
        .find(|(_, size)| seconds >= *size)
        .map_or(("second", seconds), |(unit, size)| {
            (*unit, seconds.div_euclid(*size))
        });
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} {unit}{plural} {suffix}")
}
