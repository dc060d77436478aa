//! Relational loading of country buckets
//!
//! Each [`DestinationRoute`] maps a set of countries to one table on one
//! destination. Routes are loaded concurrently and independently: a route
//! that fails is reported as a `LoadFailure` while the other routes still
//! commit.
//!
//! # Architecture
//!
//! - [`schema`] - table schema, identifier validation and SQL text
//! - [`sql`] - sqlx-backed destinations (PostgreSQL, MySQL, SQLite)

pub mod schema;
pub mod sql;

pub use schema::{InsertMode, SqlDialect, TableName, TableSpec};
pub use sql::SqlDestination;

use crate::error::{EtlError, Result};
use crate::models::{Country, CustomerRecord};
use crate::partitioner::CountryBuckets;
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// A relational target that can receive a batch of customer records
#[async_trait]
pub trait Destination: Send + Sync {
    /// Identifier used in logs and failure reports
    fn id(&self) -> &str;

    /// Create the table if needed and insert every record atomically
    ///
    /// Either all rows of this call are committed or none are. Failures are
    /// returned as `EtlError::LoadFailure`.
    async fn load(&self, table: &TableSpec, records: &[CustomerRecord]) -> Result<LoadReport>;
}

/// Result of one successful destination load
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub destination: String,
    pub table: String,
    /// Records handed to the destination
    pub attempted: usize,
    /// Rows actually inserted (lower than `attempted` when duplicates were skipped)
    pub inserted: usize,
    pub elapsed: Duration,
}

impl LoadReport {
    pub fn skipped(&self) -> usize {
        self.attempted.saturating_sub(self.inserted)
    }
}

/// Countries routed to one table on one destination
#[derive(Clone)]
pub struct DestinationRoute {
    pub destination: Arc<dyn Destination>,
    pub table: TableSpec,
    pub countries: Vec<Country>,
}

impl DestinationRoute {
    pub fn new(destination: Arc<dyn Destination>, table: TableSpec, countries: Vec<Country>) -> Self {
        Self {
            destination,
            table,
            countries,
        }
    }

    pub fn destination_id(&self) -> &str {
        self.destination.id()
    }

    /// Load this route's share of the buckets
    pub async fn load(&self, buckets: &CountryBuckets) -> Result<LoadReport> {
        let records = buckets.records_for(&self.countries);
        info!(
            "Loading {} records ({}) into destination '{}' table '{}'",
            records.len(),
            self.countries
                .iter()
                .map(Country::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            self.destination_id(),
            self.table.name
        );

        match self.destination.load(&self.table, &records).await {
            Ok(report) => Ok(report),
            Err(e @ EtlError::LoadFailure { .. }) => Err(e),
            Err(e) => Err(EtlError::load_failure(
                self.destination_id(),
                self.table.name.as_str(),
                e,
            )),
        }
    }
}

impl std::fmt::Debug for DestinationRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DestinationRoute")
            .field("destination", &self.destination_id())
            .field("table", &self.table)
            .field("countries", &self.countries)
            .finish()
    }
}

/// Outcome of loading one route
#[derive(Debug)]
pub struct RouteOutcome {
    pub destination: String,
    pub table: String,
    pub result: Result<LoadReport>,
}

/// Load every route concurrently, keeping each failure isolated
///
/// # Returns
///
/// One outcome per route, in route order
pub async fn load_routes(routes: &[DestinationRoute], buckets: &CountryBuckets) -> Vec<RouteOutcome> {
    let loads = routes.iter().map(|route| async move {
        let result = route.load(buckets).await;
        if let Err(e) = &result {
            error!("{}", e);
        }
        RouteOutcome {
            destination: route.destination_id().to_string(),
            table: route.table.name.to_string(),
            result,
        }
    });

    join_all(loads).await
}

#[cfg(test)]
mod tests;
