//! Run metadata report
//!
//! Summarizes the normalized dataset of one run: record totals, counts per
//! observed country, a processing timestamp and per-column type and sample
//! values. The report is written as indented JSON and replaces any report
//! left by a previous run.

use crate::constants::{CUSTOMER_COLUMNS, METADATA_SAMPLE_SIZE, PROCESSED_AT_FORMAT};
use crate::error::{EtlError, Result};
use crate::frame::records_to_frame;
use crate::models::CustomerRecord;
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Type and sample values of one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub dtype: String,
    pub sample: Vec<String>,
}

/// Summary of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub records_total: usize,
    pub records_by_country: BTreeMap<String, usize>,
    pub processed_at: String,
    pub column_info: BTreeMap<String, ColumnInfo>,
}

impl RunMetadata {
    /// Build the report from the normalized records of a run
    ///
    /// Only countries that actually occur in `records` appear in
    /// `records_by_country`.
    pub fn from_records(records: &[CustomerRecord]) -> Result<Self> {
        let mut records_by_country = BTreeMap::new();
        for record in records {
            *records_by_country
                .entry(record.country.as_str().to_string())
                .or_insert(0) += 1;
        }

        let df = records_to_frame(records)?;
        let mut column_info = BTreeMap::new();
        for name in CUSTOMER_COLUMNS {
            let series = df.column(name)?.as_materialized_series();
            column_info.insert(name.to_string(), column_info_of(series)?);
        }

        Ok(Self {
            records_total: records.len(),
            records_by_country,
            processed_at: Local::now().format(PROCESSED_AT_FORMAT).to_string(),
            column_info,
        })
    }

    /// Write the report as JSON indented with four spaces, replacing any existing file
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| EtlError::write_failure(path, e))?;
        }

        let file = File::create(path).map_err(|e| EtlError::write_failure(path, e))?;
        let mut writer = BufWriter::new(file);
        let mut serializer =
            Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)
            .map_err(|e| EtlError::write_failure(path, e))?;
        writer
            .write_all(b"\n")
            .and_then(|_| writer.flush())
            .map_err(|e| EtlError::write_failure(path, e))?;

        info!("Metadata saved to {}", path.display());
        Ok(())
    }
}

/// Dtype name plus the first distinct non-null values in first-seen order
fn column_info_of(series: &Series) -> Result<ColumnInfo> {
    let dtype = series.dtype().to_string();
    let as_text = series.cast(&DataType::String)?;

    let mut sample: Vec<String> = Vec::with_capacity(METADATA_SAMPLE_SIZE);
    for value in as_text.str()?.into_iter().flatten() {
        if sample.len() == METADATA_SAMPLE_SIZE {
            break;
        }
        if !sample.iter().any(|seen| seen == value) {
            sample.push(value.to_string());
        }
    }

    Ok(ColumnInfo { dtype, sample })
}
