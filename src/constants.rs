//! Application constants for the customer router
//!
//! Column names, output naming, default paths and database sizing used
//! throughout the pipeline.

// =============================================================================
// Record Layout
// =============================================================================

/// Customer record columns in the fixed order used for extracts and tables
pub const CUSTOMER_COLUMNS: [&str; 8] = [
    "name",
    "gender",
    "email",
    "address",
    "country",
    "department",
    "designation",
    "signup_date",
];

// =============================================================================
// Output Naming
// =============================================================================

/// Prefix of the per-country extract file names (`country_usa.csv`)
pub const EXTRACT_FILE_PREFIX: &str = "country_";

/// Extension of the per-country extract files
pub const EXTRACT_FILE_EXTENSION: &str = "csv";

/// Default directory for per-country extracts
pub const DEFAULT_OUTPUT_DIR: &str = "final_data";

/// Default path of the run metadata report
pub const DEFAULT_METADATA_PATH: &str = "metadata.json";

/// Default spreadsheet input
pub const DEFAULT_INPUT_PATH: &str = "messy_customers_data.xlsx";

/// Configuration file picked up from the working directory when present
pub const DEFAULT_CONFIG_PATH: &str = "customer_router.toml";

/// Timestamp format written to `processed_at`
pub const PROCESSED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Maximum number of distinct sample values reported per column
pub const METADATA_SAMPLE_SIZE: usize = 3;

// =============================================================================
// Relational Destinations
// =============================================================================

/// Width of the general text columns
pub const TEXT_COLUMN_LENGTH: usize = 64;

/// Width of the address column
pub const ADDRESS_COLUMN_LENGTH: usize = 255;

/// Rows per multi-row INSERT statement (8 bound parameters per row)
pub const INSERT_BATCH_SIZE: usize = 100;

/// Seconds to wait for a destination connection before giving up
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Destination used for US customers by default
pub mod us_destination {
    pub const ID: &str = "us";
    pub const TABLE: &str = "us_customers";
    pub const URL_ENV: &str = "CUSTOMER_US_DATABASE_URL";
}

/// Destination used for UK and Indian customers by default
pub mod global_destination {
    pub const ID: &str = "global";
    pub const TABLE: &str = "global_customers";
    pub const URL_ENV: &str = "CUSTOMER_GLOBAL_DATABASE_URL";
}

// =============================================================================
// Process Exit Codes
// =============================================================================

pub mod exit_codes {
    /// Every stage completed without failures
    pub const SUCCESS: i32 = 0;

    /// The run was aborted or could not be set up
    pub const ABORTED: i32 = 1;

    /// The run completed but at least one extract, report or load failed
    pub const PARTIAL_FAILURE: i32 = 2;
}
