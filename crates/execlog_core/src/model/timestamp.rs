//! Fixed text formats for record timestamps.
//!
//! # Responsibility
//! - Parse caller-supplied date filters and creation timestamps strictly.
//! - Render timestamps for list/detail responses and for storage.
//!
//! # Invariants
//! - Parsing requires zero-padded fields and `/` separators, exactly as in the
//!   documented patterns; shape is checked before calendar validity.
//! - Leap-second input (`:60`) is rejected.
//! - Year `0000` is rejected; `yyyy` covers years 0001 through 9999.
//! - Storage text sorts lexicographically in chronological order.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller-facing pattern for list date filters.
pub const DATE_FILTER_PATTERN: &str = "dd/MM/yyyy";
/// Caller-facing pattern for the `created` field on record creation.
pub const CREATED_PATTERN: &str = "dd/MM/yyyy HH:mm:ss";

const DATE_FILTER_FORMAT: &str = "%d/%m/%Y";
const CREATED_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
// 12-hour clock without an AM/PM marker; existing list consumers depend on it.
const LISTED_FORMAT: &str = "%d/%m/%Y %I:%M:%S";
const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const STORAGE_DATE_FORMAT: &str = "%Y-%m-%d";

static DATE_FILTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$").expect("valid date filter regex"));
static CREATED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4} [0-9]{2}:[0-9]{2}:[0-9]{2}$")
        .expect("valid created regex")
});

/// Timestamp parse failure. `Display` output is safe to return to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// List date filter did not match `dd/MM/yyyy`.
    InvalidDateFilter(String),
    /// Record `created` field did not match `dd/MM/yyyy HH:mm:ss`.
    InvalidCreated(String),
}

impl Display for TimestampError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDateFilter(value) => write!(
                f,
                "Invalid date: {value}. The correct date format is {DATE_FILTER_PATTERN}"
            ),
            Self::InvalidCreated(value) => write!(
                f,
                "Not a valid date: {value}. Field 'created' should be in the following format {CREATED_PATTERN}"
            ),
        }
    }
}

impl Error for TimestampError {}

/// Parses a list date filter in `dd/MM/yyyy` form.
pub fn parse_date_filter(value: &str) -> Result<NaiveDate, TimestampError> {
    if !DATE_FILTER_RE.is_match(value) {
        return Err(TimestampError::InvalidDateFilter(value.to_string()));
    }
    NaiveDate::parse_from_str(value, DATE_FILTER_FORMAT)
        .ok()
        .filter(|date| date.year() >= 1)
        .ok_or_else(|| TimestampError::InvalidDateFilter(value.to_string()))
}

/// Parses a record creation timestamp in `dd/MM/yyyy HH:mm:ss` (24-hour) form.
pub fn parse_created(value: &str) -> Result<NaiveDateTime, TimestampError> {
    if !CREATED_RE.is_match(value) {
        return Err(TimestampError::InvalidCreated(value.to_string()));
    }
    let parsed = NaiveDateTime::parse_from_str(value, CREATED_FORMAT)
        .map_err(|_| TimestampError::InvalidCreated(value.to_string()))?;
    if parsed.nanosecond() >= 1_000_000_000 || parsed.year() < 1 {
        return Err(TimestampError::InvalidCreated(value.to_string()));
    }
    Ok(parsed)
}

/// Renders `dd/MM/yyyy HH:mm:ss` (24-hour), used by create and get responses.
pub fn format_created(value: &NaiveDateTime) -> String {
    value.format(CREATED_FORMAT).to_string()
}

/// Renders `dd/MM/yyyy hh:mm:ss` (12-hour, no AM/PM), used by list responses.
pub fn format_listed(value: &NaiveDateTime) -> String {
    value.format(LISTED_FORMAT).to_string()
}

/// Renders the sortable storage text for `created_at` columns.
pub fn to_storage(value: &NaiveDateTime) -> String {
    value.format(STORAGE_FORMAT).to_string()
}

/// Renders the storage text of a calendar date, comparable with SQLite `date()`.
pub fn date_to_storage(value: &NaiveDate) -> String {
    value.format(STORAGE_DATE_FORMAT).to_string()
}

/// Parses storage text written by [`to_storage`].
pub fn from_storage(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, STORAGE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::{
        format_created, format_listed, from_storage, parse_created, parse_date_filter,
        to_storage, TimestampError,
    };
    use chrono::{Datelike, Timelike};

    #[test]
    fn first_representable_year_is_accepted() {
        assert_eq!(parse_date_filter("01/01/0001").unwrap().year(), 1);
        assert_eq!(parse_created("01/01/0001 00:00:00").unwrap().year(), 1);
    }

    #[test]
    fn date_filter_accepts_zero_padded_dates() {
        let date = parse_date_filter("15/03/2024").expect("valid date");
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 15));

        let leap = parse_date_filter("29/02/2024").expect("leap day");
        assert_eq!(leap.day(), 29);
    }

    #[test]
    fn date_filter_rejects_malformed_values() {
        for value in [
            "15-03-2024",
            "2024/03/15",
            "5/3/2024",
            "ab/cd/efgh",
            "32/01/2024",
            "15/13/2024",
            "29/02/2023",
            "01/01/0000",
            "15/03/2024 10:00:00",
            " 15/03/2024",
        ] {
            let err = parse_date_filter(value).expect_err(value);
            assert_eq!(err, TimestampError::InvalidDateFilter(value.to_string()));
        }
    }

    #[test]
    fn date_filter_error_names_value_and_pattern() {
        let message = parse_date_filter("2024-03-15").unwrap_err().to_string();
        assert!(message.contains("2024-03-15"));
        assert!(message.contains("dd/MM/yyyy"));
    }

    #[test]
    fn created_parses_twenty_four_hour_clock() {
        let parsed = parse_created("15/03/2024 14:30:00").expect("valid timestamp");
        assert_eq!(parsed.hour(), 14);
        assert_eq!(parsed.minute(), 30);
        assert_eq!(format_created(&parsed), "15/03/2024 14:30:00");
    }

    #[test]
    fn created_rejects_wrong_shapes_and_ranges() {
        for value in [
            "15/03/2024",
            "15/03/2024 2:30:00",
            "15/03/2024 24:00:00",
            "15/03/2024 14:30:60",
            "01/01/0000 00:00:00",
            "2024-03-15 14:30:00",
            "15/03/2024T14:30:00",
        ] {
            let err = parse_created(value).expect_err(value);
            assert!(err.to_string().contains("dd/MM/yyyy HH:mm:ss"));
        }
    }

    #[test]
    fn listed_format_uses_twelve_hour_clock_without_marker() {
        let afternoon = parse_created("15/03/2024 14:30:00").unwrap();
        assert_eq!(format_listed(&afternoon), "15/03/2024 02:30:00");

        let midnight = parse_created("01/01/2024 00:05:09").unwrap();
        assert_eq!(format_listed(&midnight), "01/01/2024 12:05:09");
    }

    #[test]
    fn storage_text_roundtrips_and_sorts_chronologically() {
        let earlier = parse_created("09/12/2023 23:59:59").unwrap();
        let later = parse_created("10/01/2024 00:00:00").unwrap();

        assert_eq!(from_storage(&to_storage(&earlier)), Some(earlier));
        assert!(to_storage(&earlier) < to_storage(&later));
        assert_eq!(from_storage("15/03/2024 14:30:00"), None);
    }
}
