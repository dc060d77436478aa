//! Country partitioning of normalized records
//!
//! Splits the cleaned dataset into one bucket per recognized country. All
//! three countries are always present so downstream writers and loaders
//! never have to treat a missing country specially.

use crate::models::{Country, CustomerRecord};
use std::collections::BTreeMap;
use tracing::info;

/// Disjoint per-country buckets of normalized records
#[derive(Debug, Clone, PartialEq)]
pub struct CountryBuckets {
    buckets: BTreeMap<Country, Vec<CustomerRecord>>,
}

impl CountryBuckets {
    /// Buckets with every recognized country present and empty
    pub fn empty() -> Self {
        Self {
            buckets: Country::ALL
                .into_iter()
                .map(|country| (country, Vec::new()))
                .collect(),
        }
    }

    /// Records for one country, in source order
    pub fn get(&self, country: Country) -> &[CustomerRecord] {
        self.buckets
            .get(&country)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterate buckets in `Country::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = (Country, &[CustomerRecord])> {
        self.buckets
            .iter()
            .map(|(country, records)| (*country, records.as_slice()))
    }

    /// Records of several countries concatenated in the given country order
    pub fn records_for(&self, countries: &[Country]) -> Vec<CustomerRecord> {
        countries
            .iter()
            .flat_map(|country| self.get(*country).iter().cloned())
            .collect()
    }

    /// Record count per country
    pub fn counts(&self) -> BTreeMap<Country, usize> {
        self.iter()
            .map(|(country, records)| (country, records.len()))
            .collect()
    }

    /// Total number of records across all buckets
    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

impl Default for CountryBuckets {
    fn default() -> Self {
        Self::empty()
    }
}

/// Group normalized records by country in a single pass
///
/// Records keep their relative source order within each bucket.
pub fn partition(records: Vec<CustomerRecord>) -> CountryBuckets {
    let mut buckets = CountryBuckets::empty();

    for record in records {
        buckets
            .buckets
            .entry(record.country)
            .or_default()
            .push(record);
    }

    for (country, records) in buckets.iter() {
        info!("Routed {} records to {}", records.len(), country);
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn customer(name: &str, country: Country) -> CustomerRecord {
        CustomerRecord {
            name: name.to_string(),
            gender: "Male".to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            address: "1 main street".to_string(),
            country,
            department: "Engineering".to_string(),
            designation: "engineer".to_string(),
            signup_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
        }
    }

    #[test]
    fn test_all_countries_present_for_empty_input() {
        let buckets = partition(Vec::new());

        for country in Country::ALL {
            assert!(buckets.get(country).is_empty());
        }
        assert_eq!(buckets.counts().len(), 3);
        assert_eq!(buckets.total(), 0);
    }

    #[test]
    fn test_partition_totals_match_input() {
        let records = vec![
            customer("Ann", Country::Usa),
            customer("Raj", Country::India),
            customer("Tom", Country::Uk),
            customer("Sam", Country::Usa),
        ];

        let buckets = partition(records);

        let counts = buckets.counts();
        assert_eq!(counts[&Country::Usa], 2);
        assert_eq!(counts[&Country::Uk], 1);
        assert_eq!(counts[&Country::India], 1);
        assert_eq!(
            buckets.get(Country::Usa).len()
                + buckets.get(Country::Uk).len()
                + buckets.get(Country::India).len(),
            4
        );
        assert_eq!(buckets.total(), 4);
    }

    #[test]
    fn test_source_order_is_preserved_within_bucket() {
        let records = vec![
            customer("Zed", Country::Usa),
            customer("Raj", Country::India),
            customer("Amy", Country::Usa),
            customer("Bea", Country::Usa),
        ];

        let buckets = partition(records);

        let names: Vec<&str> = buckets
            .get(Country::Usa)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Zed", "Amy", "Bea"]);
    }

    #[test]
    fn test_records_for_concatenates_in_country_order() {
        let records = vec![
            customer("Raj", Country::India),
            customer("Tom", Country::Uk),
            customer("Ann", Country::Usa),
        ];

        let buckets = partition(records);
        let global = buckets.records_for(&[Country::Uk, Country::India]);

        let names: Vec<&str> = global.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Tom", "Raj"]);
    }
}
