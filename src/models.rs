//! Core data structures for customer routing.
//!
//! Defines raw spreadsheet rows, normalized customer records and the set of
//! recognized countries used for partitioning and routing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Countries accepted by the normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    Usa,
    Uk,
    India,
}

impl Country {
    /// All recognized countries in extract order
    pub const ALL: [Country; 3] = [Country::Usa, Country::Uk, Country::India];

    /// Normalized, lower-case name stored in extracts and tables
    pub fn as_str(&self) -> &'static str {
        match self {
            Country::Usa => "usa",
            Country::Uk => "uk",
            Country::India => "india",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Country {
    type Err = String;

    /// Matches the normalized (trimmed, lower-case) spelling only
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "usa" => Ok(Country::Usa),
            "uk" => Ok(Country::Uk),
            "india" => Ok(Country::India),
            other => Err(format!("unrecognized country '{}'", other)),
        }
    }
}

/// One spreadsheet row as read from the source, before any cleaning
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawRecord {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub signup_date: Option<String>,
}

impl RawRecord {
    /// Field values in `CUSTOMER_COLUMNS` order
    pub fn fields(&self) -> [Option<&str>; 8] {
        [
            self.name.as_deref(),
            self.gender.as_deref(),
            self.email.as_deref(),
            self.address.as_deref(),
            self.country.as_deref(),
            self.department.as_deref(),
            self.designation.as_deref(),
            self.signup_date.as_deref(),
        ]
    }

    /// Build a record from values in `CUSTOMER_COLUMNS` order
    pub fn from_fields(mut fields: [Option<String>; 8]) -> Self {
        let mut take = |index: usize| fields[index].take();
        Self {
            name: take(0),
            gender: take(1),
            email: take(2),
            address: take(3),
            country: take(4),
            department: take(5),
            designation: take(6),
            signup_date: take(7),
        }
    }
}

/// A cleaned customer record
///
/// Every field is present and non-empty, the country is recognized and the
/// signup date is a valid calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub name: String,
    pub gender: String,
    pub email: String,
    pub address: String,
    pub country: Country,
    pub department: String,
    pub designation: String,
    pub signup_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_round_trip_through_str() {
        for country in Country::ALL {
            assert_eq!(country.as_str().parse::<Country>(), Ok(country));
        }
    }

    #[test]
    fn test_country_parse_is_exact() {
        assert!("USA".parse::<Country>().is_err());
        assert!(" uk".parse::<Country>().is_err());
        assert!("france".parse::<Country>().is_err());
    }

    #[test]
    fn test_raw_record_field_order() {
        let record = RawRecord::from_fields([
            Some("Ann".to_string()),
            Some("F".to_string()),
            Some("ann@example.com".to_string()),
            Some("1 Main St".to_string()),
            Some("usa".to_string()),
            Some("Sales".to_string()),
            Some("Manager".to_string()),
            None,
        ]);

        assert_eq!(record.name.as_deref(), Some("Ann"));
        assert_eq!(record.country.as_deref(), Some("usa"));
        assert_eq!(record.signup_date, None);
        assert_eq!(record.fields()[2], Some("ann@example.com"));
    }
}
