//! Field-level cleaning rules
//!
//! Each rule is a small free function so the normalizer can apply them in a
//! fixed order and count what each one removes.

use crate::models::{Country, CustomerRecord, RawRecord};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::debug;

use super::dates::parse_signup_date;

/// Check whether every required field is present and not blank
pub fn has_required_fields(record: &RawRecord) -> bool {
    record
        .fields()
        .into_iter()
        .all(|field| field.is_some_and(|value| !value.trim().is_empty()))
}

/// Remove exact duplicates, keeping the first occurrence of each record
///
/// # Returns
///
/// Tuple of (unique records in source order, duplicates removed)
pub fn remove_duplicates(records: Vec<RawRecord>) -> (Vec<RawRecord>, usize) {
    let mut seen = HashSet::with_capacity(records.len());
    let mut unique = Vec::with_capacity(records.len());
    let mut removed = 0;

    for record in records {
        if seen.contains(&record) {
            removed += 1;
            continue;
        }
        seen.insert(record.clone());
        unique.push(record);
    }

    (unique, removed)
}

/// Trim surrounding whitespace
pub fn clean_text(value: &str) -> String {
    value.trim().to_string()
}

/// Trim surrounding whitespace and lower-case
pub fn clean_lowercase(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Outcome of cleaning a single raw record whose date already parsed
#[derive(Debug, Clone, PartialEq)]
pub enum Cleaned {
    Valid(CustomerRecord),
    UnrecognizedCountry(String),
}

/// Trim and case-fold the string fields, then check the country
///
/// Callers must have already checked `has_required_fields`; any field still
/// missing is treated as empty text.
pub fn clean_record(record: RawRecord, signup_date: NaiveDate) -> Cleaned {
    let text = |value: Option<String>| value.as_deref().map(clean_text).unwrap_or_default();
    let lower = |value: Option<String>| value.as_deref().map(clean_lowercase).unwrap_or_default();

    let country_text = lower(record.country);
    let country = match country_text.parse::<Country>() {
        Ok(country) => country,
        Err(_) => {
            debug!("Dropping record with country '{}'", country_text);
            return Cleaned::UnrecognizedCountry(country_text);
        }
    };

    Cleaned::Valid(CustomerRecord {
        name: text(record.name),
        gender: text(record.gender),
        email: lower(record.email),
        address: lower(record.address),
        country,
        department: text(record.department),
        designation: lower(record.designation),
        signup_date,
    })
}

/// Parse the record's signup date, treating unparsable text as missing
pub fn signup_date_of(record: &RawRecord) -> Option<NaiveDate> {
    record.signup_date.as_deref().and_then(parse_signup_date)
}
