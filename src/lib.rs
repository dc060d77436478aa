//! Customer Router Library
//!
//! Cleans messy customer records read from a spreadsheet or CSV file,
//! partitions them by country and routes each partition to a CSV extract
//! and to a relational destination, finishing with a JSON run report.
//!
//! This library provides tools for:
//! - Reading raw rows from xlsx/xls/xlsb/ods workbooks and CSV files
//! - Normalizing records (missing values, duplicates, dates, case, country)
//! - Writing one CSV extract per country
//! - Loading country subsets into PostgreSQL, MySQL or SQLite tables
//! - Reporting record counts and column samples for each run

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod frame;
pub mod loader;
pub mod metadata;
pub mod models;
pub mod normalizer;
pub mod partitioner;
pub mod pipeline;
pub mod source;

// Re-export commonly used types
pub use config::{DestinationConfig, PipelineConfig};
pub use error::{EtlError, Result};
pub use models::{Country, CustomerRecord, RawRecord};
pub use pipeline::{Pipeline, PipelineStage, RunSummary};
