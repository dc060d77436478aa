//! Tests for the loader module
//!
//! SQL loads run against SQLite database files in temporary directories;
//! routing tests use in-memory destinations.

pub mod sql_tests;

use crate::models::{Country, CustomerRecord};
use chrono::NaiveDate;

/// Create a normalized customer
pub fn customer(name: &str, country: Country) -> CustomerRecord {
    CustomerRecord {
        name: name.to_string(),
        gender: "Female".to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        address: "10 downing street, london".to_string(),
        country,
        department: "Marketing".to_string(),
        designation: "brand manager".to_string(),
        signup_date: NaiveDate::from_ymd_opt(2023, 3, 14).unwrap(),
    }
}
