//! Record normalization for raw spreadsheet rows
//!
//! Turns raw rows into valid [`CustomerRecord`]s by applying the cleaning
//! rules in a fixed order:
//!
//! 1. **Missing values**: drop rows with an absent or blank required field
//! 2. **Duplicates**: drop exact duplicates, keeping the first occurrence
//! 3. **Signup date**: parse tolerantly; unparsable dates count as missing
//! 4. **Whitespace**: trim every string field
//! 5. **Case**: lower-case `email`, `address`, `designation` and `country`
//! 6. **Country**: keep only `usa`, `uk` and `india`
//!
//! Counts for every stage are logged and returned in [`NormalizationStats`].
//!
//! [`CustomerRecord`]: crate::models::CustomerRecord

pub mod dates;
pub mod rules;
pub mod stats;

#[cfg(test)]
mod tests;

pub use dates::parse_signup_date;
pub use stats::{NormalizationResult, NormalizationStats};

use crate::models::RawRecord;
use rules::{Cleaned, clean_record, has_required_fields, remove_duplicates, signup_date_of};
use tracing::{debug, info};

/// Applies the cleaning rules to raw records
#[derive(Debug, Default, Clone, Copy)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Clean a batch of raw records
    ///
    /// # Arguments
    ///
    /// * `raw` - Rows as read from the record source, in source order
    ///
    /// # Returns
    ///
    /// The valid records in source order together with per-rule drop counts
    pub fn normalize(&self, raw: Vec<RawRecord>) -> NormalizationResult {
        let mut stats = NormalizationStats {
            total_input: raw.len(),
            ..Default::default()
        };
        info!("Cleaning {} records", stats.total_input);

        let complete: Vec<RawRecord> = raw.into_iter().filter(has_required_fields).collect();
        stats.missing_values = stats.total_input - complete.len();

        let (unique, duplicates) = remove_duplicates(complete);
        stats.duplicates = duplicates;
        info!(
            "Records after dropping missing values and duplicates: {}",
            unique.len()
        );

        let mut records = Vec::with_capacity(unique.len());
        for record in unique {
            let Some(signup_date) = signup_date_of(&record) else {
                debug!(
                    "Dropping record with unparsable signup_date {:?}",
                    record.signup_date
                );
                stats.invalid_dates += 1;
                continue;
            };

            match clean_record(record, signup_date) {
                Cleaned::Valid(customer) => records.push(customer),
                Cleaned::UnrecognizedCountry(_) => stats.unrecognized_country += 1,
            }
        }

        stats.final_output = records.len();
        info!(
            "Records after date parsing and country filter (usa, uk, india): {}",
            stats.final_output
        );
        debug!("{}", stats.summary());

        NormalizationResult { records, stats }
    }
}
