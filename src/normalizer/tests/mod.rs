//! Tests for the normalizer module
//!
//! Covers the individual cleaning rules, date parsing and the full
//! normalization pass.


use crate::models::RawRecord;

/// Create a raw record with every field present
pub fn raw_record(name: &str, email: &str, country: &str, signup_date: &str) -> RawRecord {
    RawRecord {
        name: Some(name.to_string()),
        gender: Some("Female".to_string()),
        email: Some(email.to_string()),
        address: Some("12 High Street, Springfield".to_string()),
        country: Some(country.to_string()),
        department: Some("Sales".to_string()),
        designation: Some("Account Manager".to_string()),
        signup_date: Some(signup_date.to_string()),
    }
}
