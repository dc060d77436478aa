//! Command-line interface components.

use crate::config::PipelineConfig;
use crate::constants::DEFAULT_CONFIG_PATH;
use crate::error::Result;
use crate::loader::InsertMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "customer-router")]
#[command(
    about = "Clean spreadsheet customer records, split them by country and load them into CSV extracts and SQL databases"
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// TOML configuration file (defaults to ./customer_router.toml when present)
    #[arg(short, long, env = "CUSTOMER_ROUTER_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Spreadsheet (xlsx, xls, xlsb, ods) or CSV file with the raw customer rows
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Directory for the per-country CSV extracts
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path of the JSON run metadata report
    #[arg(short, long, value_name = "PATH")]
    pub metadata: Option<PathBuf>,

    /// How rows are inserted into destination tables
    #[arg(long, value_enum)]
    pub insert_mode: Option<InsertModeArg>,

    /// Run every stage except the database load
    #[arg(long)]
    pub skip_load: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Insert policy as spelled on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InsertModeArg {
    /// Insert every row; re-running duplicates rows
    Append,
    /// Skip rows already present in the table
    IgnoreDuplicates,
}

impl From<InsertModeArg> for InsertMode {
    fn from(arg: InsertModeArg) -> Self {
        match arg {
            InsertModeArg::Append => InsertMode::Append,
            InsertModeArg::IgnoreDuplicates => InsertMode::IgnoreDuplicates,
        }
    }
}

impl Args {
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Load configuration in layers: defaults, then the config file, then flags
    pub fn load_config(&self) -> Result<PipelineConfig> {
        let config_file = match &self.config {
            Some(path) => Some(path.clone()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_PATH)).filter(|path| path.exists()),
        };

        let config = match &config_file {
            Some(path) => {
                info!("Using config file: {}", path.display());
                PipelineConfig::from_file(path)?
            }
            None => {
                info!("No config file found, using defaults and environment variables");
                PipelineConfig::default()
            }
        };

        Ok(self.apply_overrides(config))
    }

    /// Apply command line flags on top of a loaded configuration
    pub fn apply_overrides(&self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(input) = &self.input {
            config = config.with_input_path(input);
        }
        if let Some(output_dir) = &self.output_dir {
            config = config.with_output_dir(output_dir);
        }
        if let Some(metadata) = &self.metadata {
            config = config.with_metadata_path(metadata);
        }
        if let Some(insert_mode) = self.insert_mode {
            config = config.with_insert_mode(insert_mode.into());
        }
        debug!("Effective configuration: {:?}", config);
        config
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("customer_router={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}
