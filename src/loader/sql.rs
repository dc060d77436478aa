//! sqlx-backed relational destinations
//!
//! A [`SqlDestination`] opens its own single-connection pool for each load,
//! creates the customer table if needed, inserts the bucket in batched
//! multi-row statements inside one transaction and closes the pool again,
//! whether the load committed or failed. Table creation happens outside the
//! insert transaction and is not undone when the inserts roll back.

use super::schema::{LoadStatements, SqlDialect, TableSpec};
use super::{Destination, LoadReport};
use crate::constants::INSERT_BATCH_SIZE;
use crate::error::{EtlError, Result};
use crate::models::CustomerRecord;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{MySql, Postgres, QueryBuilder, Sqlite};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Stamps out a load function for one sqlx backend.
///
/// The generated function connects, creates the table, runs every insert
/// batch in a single transaction, commits, and always closes the pool before
/// returning.
///
/// `CREATE TABLE` runs on the pool before the transaction opens. MySQL
/// commits implicitly on any DDL statement, so issuing it inside the
/// transaction would leave each later insert batch autocommitted.
macro_rules! backend_load_fn {
    ($fn_name:ident, $pool_options:ty, $database:ty) => {
        async fn $fn_name(
            url: &str,
            connect_timeout: Duration,
            statements: &LoadStatements,
            records: &[CustomerRecord],
        ) -> std::result::Result<u64, sqlx::Error> {
            let pool = <$pool_options>::new()
                .max_connections(1)
                .acquire_timeout(connect_timeout)
                .connect(url)
                .await?;

            let outcome = async {
                sqlx::query(&statements.create_table).execute(&pool).await?;

                let mut tx = pool.begin().await?;

                let mut inserted = 0u64;
                for batch in records.chunks(INSERT_BATCH_SIZE) {
                    let mut builder =
                        QueryBuilder::<$database>::new(statements.insert_prefix.as_str());
                    builder.push_values(batch, |mut row, record| {
                        row.push_bind(record.name.clone())
                            .push_bind(record.gender.clone())
                            .push_bind(record.email.clone())
                            .push_bind(record.address.clone())
                            .push_bind(record.country.as_str())
                            .push_bind(record.department.clone())
                            .push_bind(record.designation.clone())
                            .push_bind(record.signup_date);
                    });
                    builder.push(statements.insert_suffix.as_str());

                    inserted += builder.build().execute(&mut *tx).await?.rows_affected();
                }

                tx.commit().await?;
                Ok::<u64, sqlx::Error>(inserted)
            }
            .await;

            pool.close().await;
            outcome
        }
    };
}

backend_load_fn!(load_postgres, PgPoolOptions, Postgres);
backend_load_fn!(load_mysql, MySqlPoolOptions, MySql);
backend_load_fn!(load_sqlite, SqlitePoolOptions, Sqlite);

/// A PostgreSQL, MySQL or SQLite destination identified by a connection URL
#[derive(Debug, Clone)]
pub struct SqlDestination {
    id: String,
    url: SecretString,
    dialect: SqlDialect,
    connect_timeout: Duration,
}

impl SqlDestination {
    /// Create a destination; the dialect is taken from the URL scheme
    pub fn new(id: impl Into<String>, url: SecretString, connect_timeout: Duration) -> Result<Self> {
        let dialect = SqlDialect::from_url(url.expose_secret())?;
        Ok(Self {
            id: id.into(),
            url,
            dialect,
            connect_timeout,
        })
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }
}

#[async_trait]
impl Destination for SqlDestination {
    fn id(&self) -> &str {
        &self.id
    }

    async fn load(&self, table: &TableSpec, records: &[CustomerRecord]) -> Result<LoadReport> {
        let start = Instant::now();
        let statements = LoadStatements::new(table, self.dialect);
        debug!(
            "Loading {} records into {} ({:?}, {:?})",
            records.len(),
            table.name,
            self.dialect,
            table.insert_mode
        );

        let url = self.url.expose_secret();
        let result = match self.dialect {
            SqlDialect::Postgres => {
                load_postgres(url, self.connect_timeout, &statements, records).await
            }
            SqlDialect::MySql => load_mysql(url, self.connect_timeout, &statements, records).await,
            SqlDialect::Sqlite => {
                load_sqlite(url, self.connect_timeout, &statements, records).await
            }
        };

        let inserted = result
            .map_err(|e| EtlError::load_failure(&self.id, table.name.as_str(), e))?
            as usize;

        info!(
            "Loaded {} of {} records into table '{}' on destination '{}'",
            inserted,
            records.len(),
            table.name,
            self.id
        );

        Ok(LoadReport {
            destination: self.id.clone(),
            table: table.name.to_string(),
            attempted: records.len(),
            inserted,
            elapsed: start.elapsed(),
        })
    }
}
