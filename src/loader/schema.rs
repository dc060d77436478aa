//! Table schema and SQL text generation for relational destinations
//!
//! Only identifiers (table and column names) ever appear in generated SQL.
//! Table names are validated before use; every data value is bound as a
//! parameter by the caller.

use crate::constants::{ADDRESS_COLUMN_LENGTH, CUSTOMER_COLUMNS, TEXT_COLUMN_LENGTH};
use crate::error::{EtlError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// SQL dialect of a destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    Postgres,
    MySql,
    Sqlite,
}

impl SqlDialect {
    /// Detect the dialect from a connection URL scheme
    pub fn from_url(url: &str) -> Result<Self> {
        let scheme = url.split(':').next().unwrap_or_default().to_lowercase();
        match scheme.as_str() {
            "postgres" | "postgresql" => Ok(SqlDialect::Postgres),
            "mysql" | "mariadb" => Ok(SqlDialect::MySql),
            "sqlite" => Ok(SqlDialect::Sqlite),
            other => Err(EtlError::configuration(format!(
                "unsupported database URL scheme '{}' (expected postgres, mysql or sqlite)",
                other
            ))),
        }
    }
}

/// How rows are inserted into a destination table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertMode {
    /// Insert every row unconditionally; re-running a load duplicates rows
    Append,
    /// Keep one copy of each distinct record across runs
    ///
    /// Duplicates are skipped through a `UNIQUE` constraint over all eight
    /// columns, which is only declared when the load creates the table. A
    /// table that already exists without it, for example one first created
    /// in `Append` mode, keeps receiving every row.
    #[default]
    IgnoreDuplicates,
}

/// Column type of the fixed customer schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Varchar(usize),
    Date,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Varchar(length) => write!(f, "varchar({})", length),
            ColumnType::Date => f.write_str("DATE"),
        }
    }
}

/// Column type for each customer column
pub fn column_type(column: &str) -> ColumnType {
    match column {
        "signup_date" => ColumnType::Date,
        "address" => ColumnType::Varchar(ADDRESS_COLUMN_LENGTH),
        _ => ColumnType::Varchar(TEXT_COLUMN_LENGTH),
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("identifier pattern is valid")
    })
}

/// A validated destination table name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    /// Validate a table name so it can be embedded in SQL text
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if identifier_pattern().is_match(&name) {
            Ok(Self(name))
        } else {
            Err(EtlError::InvalidIdentifier { identifier: name })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Table descriptor handed to a destination: name plus insert policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub name: TableName,
    pub insert_mode: InsertMode,
}

impl TableSpec {
    pub fn new(name: TableName, insert_mode: InsertMode) -> Self {
        Self { name, insert_mode }
    }
}

/// SQL statements for loading one table in one dialect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadStatements {
    pub create_table: String,
    /// `INSERT ... (columns) ` prefix; the VALUES list is appended by a query builder
    pub insert_prefix: String,
    /// Conflict clause appended after the VALUES list (may be empty)
    pub insert_suffix: String,
}

impl LoadStatements {
    pub fn new(table: &TableSpec, dialect: SqlDialect) -> Self {
        Self {
            create_table: create_table_sql(table, dialect),
            insert_prefix: insert_prefix_sql(table, dialect),
            insert_suffix: insert_suffix_sql(table.insert_mode, dialect).to_string(),
        }
    }
}

/// `CREATE TABLE IF NOT EXISTS` for the fixed customer schema
///
/// An existing table is left untouched, including a missing duplicate
/// constraint.
pub fn create_table_sql(table: &TableSpec, dialect: SqlDialect) -> String {
    let mut definitions: Vec<String> = CUSTOMER_COLUMNS
        .iter()
        .map(|column| format!("{} {}", column, column_type(column)))
        .collect();

    if table.insert_mode == InsertMode::IgnoreDuplicates {
        let constraint = format!("uq_{}_record", table.name);
        let columns = CUSTOMER_COLUMNS.join(", ");
        definitions.push(match dialect {
            SqlDialect::MySql => format!("UNIQUE KEY {} ({})", constraint, columns),
            SqlDialect::Postgres | SqlDialect::Sqlite => {
                format!("CONSTRAINT {} UNIQUE ({})", constraint, columns)
            }
        });
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        table.name,
        definitions.join(", ")
    )
}

fn insert_prefix_sql(table: &TableSpec, dialect: SqlDialect) -> String {
    let verb = match (table.insert_mode, dialect) {
        (InsertMode::IgnoreDuplicates, SqlDialect::MySql) => "INSERT IGNORE INTO",
        _ => "INSERT INTO",
    };
    format!("{} {} ({}) ", verb, table.name, CUSTOMER_COLUMNS.join(", "))
}

fn insert_suffix_sql(insert_mode: InsertMode, dialect: SqlDialect) -> &'static str {
    match (insert_mode, dialect) {
        (InsertMode::IgnoreDuplicates, SqlDialect::Postgres | SqlDialect::Sqlite) => {
            " ON CONFLICT DO NOTHING"
        }
        _ => "",
    }
}
