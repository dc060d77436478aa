//! Tests for the pipeline orchestrator
//!
//! Runs use an in-memory record source and in-memory destinations; the
//! SQL-backed end-to-end runs live in the crate's integration tests.


use crate::error::{EtlError, Result};
use crate::loader::{Destination, LoadReport, TableSpec};
use crate::models::{CustomerRecord, RawRecord};
use crate::source::RecordSource;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Record source serving fixed rows
pub struct MemorySource {
    location: PathBuf,
    rows: Vec<RawRecord>,
}

impl MemorySource {
    pub fn boxed(rows: Vec<RawRecord>) -> Box<dyn RecordSource> {
        Box::new(Self {
            location: PathBuf::from("memory://customers"),
            rows,
        })
    }
}

impl RecordSource for MemorySource {
    fn location(&self) -> &Path {
        &self.location
    }

    fn extract(&self) -> Result<Vec<RawRecord>> {
        Ok(self.rows.clone())
    }
}

/// Record source that cannot be read
pub struct UnreadableSource;

impl RecordSource for UnreadableSource {
    fn location(&self) -> &Path {
        Path::new("missing.xlsx")
    }

    fn extract(&self) -> Result<Vec<RawRecord>> {
        Err(EtlError::source_unavailable("missing.xlsx", "file not found"))
    }
}

/// Destination accepting every batch
pub struct AcceptingDestination(pub &'static str);

#[async_trait]
impl Destination for AcceptingDestination {
    fn id(&self) -> &str {
        self.0
    }

    async fn load(&self, table: &TableSpec, records: &[CustomerRecord]) -> Result<LoadReport> {
        Ok(LoadReport {
            destination: self.0.to_string(),
            table: table.name.to_string(),
            attempted: records.len(),
            inserted: records.len(),
            elapsed: Duration::ZERO,
        })
    }
}

/// Destination refusing every connection
pub struct RefusingDestination(pub &'static str);

#[async_trait]
impl Destination for RefusingDestination {
    fn id(&self) -> &str {
        self.0
    }

    async fn load(&self, table: &TableSpec, _records: &[CustomerRecord]) -> Result<LoadReport> {
        Err(EtlError::load_failure(
            self.0,
            table.name.as_str(),
            "connection refused",
        ))
    }
}

/// Create a raw record with every field present
pub fn raw(name: &str, email: &str, country: &str, signup_date: &str) -> RawRecord {
    RawRecord {
        name: Some(name.to_string()),
        gender: Some("Male".to_string()),
        email: Some(email.to_string()),
        address: Some("42 Wallaby Way, Sydney".to_string()),
        country: Some(country.to_string()),
        department: Some("Operations".to_string()),
        designation: Some("Coordinator".to_string()),
        signup_date: Some(signup_date.to_string()),
    }
}

/// Six rows: one missing email, one duplicate, one unrecognized country
pub fn scenario_rows() -> Vec<RawRecord> {
    let mut missing_email = raw("Bea", "", "USA", "2023-02-01");
    missing_email.email = None;

    vec![
        raw("Ann", "Ann@Example.com", " USA ", "2023-01-15"),
        missing_email,
        raw("Cal", "cal@example.com", "India", "2023-03-01"),
        raw("Cal", "cal@example.com", "India", "2023-03-01"),
        raw("Dee", "dee@example.com", "France", "2023-04-01"),
        raw("Eve", "eve@example.com", "UK", "2023-05-01"),
    ]
}
