//! Per-country CSV extract writing
//!
//! Writes each country bucket to `{output_dir}/country_{country}.csv`,
//! replacing whatever the previous run left there. Every country is written
//! independently: a failure for one file is recorded and the remaining
//! countries are still written.

use crate::constants::{EXTRACT_FILE_EXTENSION, EXTRACT_FILE_PREFIX};
use crate::error::{EtlError, Result};
use crate::frame::records_to_frame;
use crate::models::{Country, CustomerRecord};
use crate::partitioner::CountryBuckets;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// One extract file that was written successfully
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenExtract {
    pub country: Country,
    pub path: PathBuf,
    pub records: usize,
}

/// Outcome of writing all country extracts
#[derive(Debug, Default)]
pub struct ExtractReport {
    pub written: Vec<WrittenExtract>,
    pub failures: Vec<EtlError>,
}

impl ExtractReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Writes country buckets to CSV files in one output directory
#[derive(Debug, Clone)]
pub struct ExtractWriter {
    output_dir: PathBuf,
}

impl ExtractWriter {
    /// Create a writer targeting `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the extract for one country
    pub fn extract_path(&self, country: Country) -> PathBuf {
        self.output_dir.join(format!(
            "{}{}.{}",
            EXTRACT_FILE_PREFIX,
            country.as_str(),
            EXTRACT_FILE_EXTENSION
        ))
    }

    /// Write one file per country, isolating failures
    ///
    /// # Arguments
    ///
    /// * `buckets` - Normalized records grouped by country
    ///
    /// # Returns
    ///
    /// The files written and one `WriteFailure` per file that could not be written
    pub fn write_all(&self, buckets: &CountryBuckets) -> ExtractReport {
        info!(
            "Saving cleaned data by country to {}/",
            self.output_dir.display()
        );
        let mut report = ExtractReport::default();

        let dir_error = fs::create_dir_all(&self.output_dir).err();

        for (country, records) in buckets.iter() {
            let path = self.extract_path(country);

            let outcome = match &dir_error {
                Some(e) => Err(EtlError::write_failure(
                    &path,
                    format!(
                        "could not create output directory {}: {}",
                        self.output_dir.display(),
                        e
                    ),
                )),
                None => write_extract(&path, records),
            };

            match outcome {
                Ok(()) => {
                    info!("Saved {} records to {}", records.len(), path.display());
                    report.written.push(WrittenExtract {
                        country,
                        path,
                        records: records.len(),
                    });
                }
                Err(e) => {
                    error!("Failed to write extract for {}: {}", country, e);
                    report.failures.push(e);
                }
            }
        }

        report
    }
}

/// Write records as a header + rows CSV file, truncating any existing file
pub fn write_extract(path: &Path, records: &[CustomerRecord]) -> Result<()> {
    let mut df = records_to_frame(records).map_err(|e| EtlError::write_failure(path, e))?;
    let mut file = File::create(path).map_err(|e| EtlError::write_failure(path, e))?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| EtlError::write_failure(path, e))
}
