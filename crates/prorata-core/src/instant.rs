//! Instant normalization at the system boundary.
//!
//! Instants are exchanged as UTC epoch-second integers or ISO-8601 strings;
//! a string carrying no offset is read in the host's local timezone. All
//! instants are normalized to `DateTime<Utc>`, and the day arithmetic in
//! [`crate::usage`] works on UTC calendar days.

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::ValidationError;

/// Seconds in one day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Parse a boundary instant into UTC.
///
/// Accepted forms, tried in order:
///
/// 1. an integer epoch-second value (`"1709625600"`)
/// 2. an RFC 3339 / ISO-8601 string with offset (`"2024-03-05T08:00:00Z"`)
/// 3. an offset-less datetime (`"2024-03-05T08:00:00"` or
///    `"2024-03-05 08:00:00"`), read as local time
/// 4. a bare date (`"2024-03-05"`), read as local midnight
///
/// # Errors
///
/// [`ValidationError::MalformedInstant`] when the input matches none of the
/// accepted forms, or names a local time that does not exist (DST gap).
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = value.trim();

    if let Ok(seconds) = trimmed.parse::<i64>() {
        return DateTime::from_timestamp(seconds, 0).ok_or_else(|| malformed(value));
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return local_to_utc(naive).ok_or_else(|| malformed(value));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let naive = date.and_hms_opt(0, 0, 0).ok_or_else(|| malformed(value))?;
        return local_to_utc(naive).ok_or_else(|| malformed(value));
    }

    Err(malformed(value))
}

/// Whole days covered by `seconds`, rounding any partial day up.
///
/// Non-positive spans never round up: an empty or inverted interval
/// contributes at most zero days.
#[must_use]
pub fn whole_days_ceil(seconds: i64) -> i64 {
    (seconds + SECONDS_PER_DAY - 1).div_euclid(SECONDS_PER_DAY)
}

fn malformed(value: &str) -> ValidationError {
    ValidationError::MalformedInstant {
        value: value.to_owned(),
    }
}

/// Resolve an offset-less local datetime to UTC.
///
/// Ambiguous local times (DST fold) take the earlier reading; nonexistent
/// local times (DST gap) are rejected.
fn local_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(instant) => Some(instant.with_timezone(&Utc)),
        LocalResult::Ambiguous(earlier, _) => Some(earlier.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_epoch_seconds() {
        let instant = parse_instant("1709625600").unwrap();
        assert_eq!(instant.timestamp(), 1_709_625_600);
    }

    #[test]
    fn parses_rfc3339_and_normalizes_offset() {
        let utc = parse_instant("2024-03-05T08:00:00Z").unwrap();
        let offset = parse_instant("2024-03-05T10:00:00+02:00").unwrap();
        assert_eq!(utc, offset);
    }

    #[test]
    fn parses_offsetless_forms_as_local() {
        // The exact instant depends on the host timezone; both spellings
        // must agree, and the bare date is that day's local midnight.
        let t_form = parse_instant("2024-03-05T08:00:00").unwrap();
        let space_form = parse_instant("2024-03-05 08:00:00").unwrap();
        assert_eq!(t_form, space_form);

        assert!(parse_instant("2024-03-05").is_ok());
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_instant("next tuesday").unwrap_err();
        assert!(matches!(err, ValidationError::MalformedInstant { .. }));
    }

    #[test]
    fn whole_days_rounds_partial_days_up() {
        assert_eq!(whole_days_ceil(0), 0);
        assert_eq!(whole_days_ceil(1), 1);
        assert_eq!(whole_days_ceil(SECONDS_PER_DAY), 1);
        assert_eq!(whole_days_ceil(SECONDS_PER_DAY + 1), 2);
        assert_eq!(whole_days_ceil(7 * SECONDS_PER_DAY), 7);
    }

    #[test]
    fn whole_days_never_rounds_negative_spans_up() {
        assert_eq!(whole_days_ceil(-1), 0);
        assert_eq!(whole_days_ceil(-SECONDS_PER_DAY), -1);
    }
}
