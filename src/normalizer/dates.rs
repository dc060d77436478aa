//! Tolerant parsing of spreadsheet signup dates
//!
//! Spreadsheet exports mix ISO dates, timestamps, slash/dot separated
//! numeric dates and month-name spellings. Anything that cannot be read as a
//! calendar date is reported as `None` so the record can be dropped.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-only layouts, tried in order. Month-first precedes day-first for the
/// ambiguous `a/b/yyyy` form.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y%m%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d-%b-%Y",
];

/// Timestamp layouts whose date component is kept
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// Parse a signup date written in any of the supported layouts
///
/// # Arguments
///
/// * `value` - Raw cell text; surrounding whitespace is ignored
///
/// # Returns
///
/// The calendar date, or `None` if the text is not a valid date
pub fn parse_signup_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|timestamp| timestamp.date())
        })
}
