//! Record sources
//!
//! A [`RecordSource`] yields the raw customer rows of one run. Spreadsheets
//! (xlsx, xls, xlsb, ods) are read with calamine and CSV files with the
//! polars CSV reader. Both locate the eight customer columns by header name
//! and keep every cell as text; cleaning is left to the normalizer.

use crate::constants::CUSTOMER_COLUMNS;
use crate::error::{EtlError, Result};
use crate::models::RawRecord;
use calamine::{Data, Reader, open_workbook_auto};
use chrono::{NaiveDate, TimeDelta};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Provider of raw customer rows
pub trait RecordSource: Send + Sync {
    /// Where the rows come from, for logs and error reports
    fn location(&self) -> &Path;

    /// Read every row in source order
    ///
    /// A readable source without data rows yields an empty vector; an
    /// unreadable source or one missing a required column yields
    /// `EtlError::SourceUnavailable`.
    fn extract(&self) -> Result<Vec<RawRecord>>;
}

/// Pick a source implementation from the file extension
pub fn source_for_path(path: impl Into<PathBuf>) -> Result<Box<dyn RecordSource>> {
    let path = path.into();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Box::new(ExcelSource::new(path))),
        "csv" => Ok(Box::new(CsvSource::new(path))),
        other => Err(EtlError::source_unavailable(
            &path,
            format!(
                "unsupported file extension '{}' (expected xlsx, xls, xlsb, ods or csv)",
                other
            ),
        )),
    }
}

/// Map each customer column to its position in a header row
fn column_positions<'a>(
    path: &Path,
    header: impl IntoIterator<Item = &'a str>,
) -> Result<[usize; 8]> {
    let header: Vec<&str> = header.into_iter().map(str::trim).collect();
    let mut positions = [0usize; 8];

    for (slot, column) in positions.iter_mut().zip(CUSTOMER_COLUMNS) {
        *slot = header
            .iter()
            .position(|name| *name == column)
            .ok_or_else(|| {
                EtlError::source_unavailable(path, format!("missing required column '{}'", column))
            })?;
    }

    Ok(positions)
}

/// First worksheet of a spreadsheet workbook
#[derive(Debug, Clone)]
pub struct ExcelSource {
    path: PathBuf,
}

impl ExcelSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for ExcelSource {
    fn location(&self) -> &Path {
        &self.path
    }

    fn extract(&self) -> Result<Vec<RawRecord>> {
        info!("Loading data from {}", self.path.display());
        let unavailable = |e: calamine::Error| EtlError::source_unavailable(&self.path, e.to_string());

        let mut workbook = open_workbook_auto(&self.path).map_err(unavailable)?;
        let sheet_name = workbook.sheet_names().first().cloned().ok_or_else(|| {
            EtlError::source_unavailable(&self.path, "workbook contains no worksheets")
        })?;
        debug!("Reading worksheet '{}'", sheet_name);
        let range = workbook.worksheet_range(&sheet_name).map_err(unavailable)?;

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Ok(Vec::new());
        };
        let header: Vec<String> = header_row
            .iter()
            .map(|cell| cell_text(cell).unwrap_or_default())
            .collect();
        let positions = column_positions(&self.path, header.iter().map(String::as_str))?;

        let records: Vec<RawRecord> = rows
            .map(|row| {
                RawRecord::from_fields(
                    positions.map(|position| row.get(position).and_then(cell_text)),
                )
            })
            .collect();

        info!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }
}

/// Text value of a spreadsheet cell; empty and error cells are missing
pub fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64()).map(|d| d.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

/// Serial of 9999-12-31, the last date spreadsheets can represent
const MAX_SPREADSHEET_SERIAL: f64 = 2_958_465.0;

/// Convert a spreadsheet serial date (days since 1899-12-30) to a calendar date
///
/// Serials outside the spreadsheet date range give `None`.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(0.0..=MAX_SPREADSHEET_SERIAL).contains(&serial) {
        return None;
    }
    let days = TimeDelta::try_days(serial.floor() as i64)?;
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_signed(days)
}

/// Comma separated file with a header row
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for CsvSource {
    fn location(&self) -> &Path {
        &self.path
    }

    fn extract(&self) -> Result<Vec<RawRecord>> {
        info!("Loading data from {}", self.path.display());
        if !self.path.is_file() {
            return Err(EtlError::source_unavailable(&self.path, "file not found"));
        }

        let unavailable = |e: PolarsError| EtlError::source_unavailable(&self.path, e.to_string());
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(self.path.clone()))
            .map_err(unavailable)?
            .finish()
            .map_err(unavailable)?;

        let header = df.get_column_names();
        column_positions(&self.path, header.iter().map(|name| name.as_str()))?;

        let mut columns = Vec::with_capacity(CUSTOMER_COLUMNS.len());
        for name in CUSTOMER_COLUMNS {
            let values: Vec<Option<String>> = df
                .column(name)
                .and_then(|c| c.as_materialized_series().cast(&DataType::String))
                .map_err(unavailable)?
                .str()
                .map_err(unavailable)?
                .into_iter()
                .map(|value| value.map(str::to_string))
                .collect();
            columns.push(values);
        }

        let records: Vec<RawRecord> = (0..df.height())
            .map(|row| RawRecord::from_fields(std::array::from_fn(|i| columns[i][row].clone())))
            .collect();

        info!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }
}
