//! Configuration management and validation.
//!
//! Provides the pipeline configuration: input and output locations, the
//! insert policy and the destination routing table. Configuration is read
//! from an optional TOML file and then overridden by command line flags.
//! Connection URLs are never literals in code; they come from the file or
//! from environment variables named by the file.

use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_INPUT_PATH, DEFAULT_METADATA_PATH, DEFAULT_OUTPUT_DIR,
    global_destination, us_destination,
};
use crate::error::{EtlError, Result};
use crate::loader::{DestinationRoute, InsertMode, SqlDestination, TableName, TableSpec};
use crate::models::Country;
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// One relational destination and the countries routed to it
#[derive(Debug, Clone, Deserialize)]
pub struct DestinationConfig {
    /// Identifier used in logs and failure reports
    pub id: String,

    /// Target table name
    pub table: String,

    /// Countries loaded into this destination
    pub countries: Vec<Country>,

    /// Connection URL given directly
    #[serde(default)]
    pub url: Option<SecretString>,

    /// Environment variable holding the connection URL
    #[serde(default)]
    pub url_env: Option<String>,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl DestinationConfig {
    pub fn new(id: impl Into<String>, table: impl Into<String>, countries: Vec<Country>) -> Self {
        Self {
            id: id.into(),
            table: table.into(),
            countries,
            url: None,
            url_env: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(SecretString::new(url.into()));
        self
    }

    pub fn with_url_env(mut self, variable: impl Into<String>) -> Self {
        self.url_env = Some(variable.into());
        self
    }

    pub fn with_connect_timeout_secs(mut self, seconds: u64) -> Self {
        self.connect_timeout_secs = seconds;
        self
    }

    /// Connection URL from `url`, falling back to the `url_env` variable
    pub fn resolve_url(&self) -> Result<SecretString> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }

        match &self.url_env {
            Some(variable) => std::env::var(variable)
                .map(SecretString::new)
                .map_err(|_| {
                    EtlError::configuration(format!(
                        "destination '{}': environment variable {} is not set",
                        self.id, variable
                    ))
                }),
            None => Err(EtlError::configuration(format!(
                "destination '{}' has neither url nor url_env",
                self.id
            ))),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Main pipeline configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Spreadsheet or CSV file holding the raw customer rows
    pub input_path: PathBuf,

    /// Directory receiving the per-country extracts
    pub output_dir: PathBuf,

    /// Location of the run metadata report
    pub metadata_path: PathBuf,

    pub insert_mode: InsertMode,

    pub destinations: Vec<DestinationConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            metadata_path: PathBuf::from(DEFAULT_METADATA_PATH),
            insert_mode: InsertMode::default(),
            destinations: vec![
                DestinationConfig::new(us_destination::ID, us_destination::TABLE, vec![
                    Country::Usa,
                ])
                .with_url_env(us_destination::URL_ENV),
                DestinationConfig::new(global_destination::ID, global_destination::TABLE, vec![
                    Country::Uk,
                    Country::India,
                ])
                .with_url_env(global_destination::URL_ENV),
            ],
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EtlError::configuration(format!(
                "could not read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: Self = toml::from_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_metadata_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata_path = path.into();
        self
    }

    pub fn with_insert_mode(mut self, insert_mode: InsertMode) -> Self {
        self.insert_mode = insert_mode;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<DestinationConfig>) -> Self {
        self.destinations = destinations;
        self
    }

    /// Check the routing table before any work starts
    ///
    /// Every recognized country must be routed to exactly one destination,
    /// destination ids must be unique and table names valid identifiers.
    /// Connection URLs are only checked when `require_urls` is set.
    pub fn validate(&self, require_urls: bool) -> Result<()> {
        let mut ids = HashSet::new();
        let mut routed: BTreeMap<Country, &str> = BTreeMap::new();

        for destination in &self.destinations {
            if !ids.insert(destination.id.as_str()) {
                return Err(EtlError::configuration(format!(
                    "duplicate destination id '{}'",
                    destination.id
                )));
            }
            TableName::new(destination.table.as_str())?;

            for country in &destination.countries {
                if let Some(previous) = routed.insert(*country, destination.id.as_str()) {
                    return Err(EtlError::configuration(format!(
                        "country '{}' is routed to both '{}' and '{}'",
                        country, previous, destination.id
                    )));
                }
            }

            if require_urls {
                destination.resolve_url()?;
            }
        }

        if let Some(country) = Country::ALL.iter().find(|c| !routed.contains_key(*c)) {
            return Err(EtlError::configuration(format!(
                "country '{}' is not routed to any destination",
                country
            )));
        }

        Ok(())
    }

    /// Build the loader routes, resolving every connection URL
    pub fn build_routes(&self) -> Result<Vec<DestinationRoute>> {
        self.destinations
            .iter()
            .map(|destination| -> Result<DestinationRoute> {
                let table = TableSpec::new(
                    TableName::new(destination.table.as_str())?,
                    self.insert_mode,
                );
                let sql = SqlDestination::new(
                    destination.id.as_str(),
                    destination.resolve_url()?,
                    destination.connect_timeout(),
                )?;
                Ok(DestinationRoute::new(
                    Arc::new(sql),
                    table,
                    destination.countries.clone(),
                ))
            })
            .collect()
    }
}
