//! Error handling for customer routing operations.
//!
//! Provides error types with context for source extraction, extract and
//! report writing, relational loading and configuration failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Configuration file could not be parsed: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Source unavailable at {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    #[error("Source at {path} contained no records")]
    EmptySource { path: PathBuf },

    #[error("No valid records remained after cleaning {input} input records")]
    NoValidRecords { input: usize },

    #[error("Failed to write {path}: {reason}")]
    WriteFailure { path: PathBuf, reason: String },

    #[error("Load into destination '{destination}' (table {table}) failed: {reason}")]
    LoadFailure {
        destination: String,
        table: String,
        reason: String,
    },

    #[error("Invalid SQL identifier '{identifier}'")]
    InvalidIdentifier { identifier: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl EtlError {
    /// Create a source unavailable error
    pub fn source_unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a write failure for an extract or report artifact
    pub fn write_failure(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::WriteFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a load failure for one destination
    pub fn load_failure(
        destination: impl Into<String>,
        table: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::LoadFailure {
            destination: destination.into(),
            table: table.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error ends the run instead of being recorded and skipped
    pub fn aborts_run(&self) -> bool {
        !matches!(self, Self::WriteFailure { .. } | Self::LoadFailure { .. })
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_failures_do_not_abort() {
        assert!(!EtlError::write_failure("out/country_uk.csv", "disk full").aborts_run());
        assert!(!EtlError::load_failure("global", "global_customers", "refused").aborts_run());
    }

    #[test]
    fn test_source_and_cleaning_failures_abort() {
        assert!(EtlError::source_unavailable("missing.xlsx", "not found").aborts_run());
        assert!(EtlError::NoValidRecords { input: 5 }.aborts_run());
        assert!(
            EtlError::EmptySource {
                path: PathBuf::from("empty.csv")
            }
            .aborts_run()
        );
    }

    #[test]
    fn test_infrastructure_conversions() {
        let polars: EtlError =
            polars::error::PolarsError::ColumnNotFound("signup_date".into()).into();
        assert!(matches!(polars, EtlError::Polars(_)));
        assert!(polars.aborts_run());

        let toml: EtlError = toml::from_str::<toml::Table>("input_path = ").unwrap_err().into();
        assert!(matches!(toml, EtlError::ConfigParse(_)));
    }

    #[test]
    fn test_load_failure_message_names_destination() {
        let error = EtlError::load_failure("global", "global_customers", "connection refused");
        let message = error.to_string();
        assert!(message.contains("global"));
        assert!(message.contains("global_customers"));
        assert!(message.contains("connection refused"));
    }
}
