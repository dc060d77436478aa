//! Normalization statistics and result structures
//!
//! Tracks how many records each cleaning rule removed so a run can report
//! where its input went.

use crate::models::CustomerRecord;

/// Per-rule counts for one normalization pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationStats {
    /// Number of raw input records
    pub total_input: usize,
    /// Records dropped for a missing or blank required field
    pub missing_values: usize,
    /// Exact duplicates removed
    pub duplicates: usize,
    /// Records dropped because `signup_date` could not be parsed
    pub invalid_dates: usize,
    /// Records dropped because the country is not recognized
    pub unrecognized_country: usize,
    /// Records that survived every rule
    pub final_output: usize,
}

impl NormalizationStats {
    /// Total number of records removed by any rule
    pub fn dropped(&self) -> usize {
        self.missing_values + self.duplicates + self.invalid_dates + self.unrecognized_country
    }

    /// Percentage of input records that survived normalization
    pub fn retention_rate(&self) -> f64 {
        if self.total_input == 0 {
            0.0
        } else {
            (self.final_output as f64 / self.total_input as f64) * 100.0
        }
    }

    /// Single-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Normalization: {} -> {} records ({:.1}% kept) | missing values: {} | \
             duplicates: {} | invalid dates: {} | unrecognized country: {}",
            self.total_input,
            self.final_output,
            self.retention_rate(),
            self.missing_values,
            self.duplicates,
            self.invalid_dates,
            self.unrecognized_country
        )
    }
}

/// Output of the normalizer: the valid records plus drop accounting
#[derive(Debug, Clone)]
pub struct NormalizationResult {
    pub records: Vec<CustomerRecord>,
    pub stats: NormalizationStats,
}

impl NormalizationResult {
    /// Number of valid records
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
