use async_trait::async_trait;
use sqlx::mysql::{MySqlArguments, MySqlPoolOptions};
use sqlx::{Arguments, MySqlPool};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::config::DatabaseSettings;
use crate::core::{QueryExecutor, SqlStatement, SqlValue};
use crate::models::ProfileRow;

/// Errors that can occur when interacting with MySQL
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Query timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to bind parameter: {0}")]
    BindError(String),
}

/// MySQL client executing the search statements
///
/// Every statement checks a connection out of the pool for its own
/// duration only; the connection goes back to the pool when the query
/// future completes or is dropped.
pub struct MySqlClient {
    pool: MySqlPool,
    query_timeout: Option<Duration>,
}

impl MySqlClient {
    /// Create a new MySQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, DatabaseError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self {
            pool,
            query_timeout: None,
        })
    }

    /// Create a new MySQL client from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, DatabaseError> {
        tracing::info!("Connecting to MySQL");

        let client = Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
            Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(settings.idle_timeout_secs.unwrap_or(600)),
        )
        .await?;

        Ok(client.with_query_timeout(settings.query_timeout_secs.map(Duration::from_secs)))
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self {
            pool,
            query_timeout: None,
        }
    }

    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    async fn timed<T, F>(&self, query: F) -> Result<T, DatabaseError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match self.query_timeout {
            Some(limit) => tokio::time::timeout(limit, query)
                .await
                .map_err(|_| DatabaseError::Timeout(limit))?
                .map_err(Into::into),
            None => query.await.map_err(Into::into),
        }
    }
}

/// Bind values in placeholder order
pub(crate) fn arguments(params: &[SqlValue]) -> Result<MySqlArguments, DatabaseError> {
    let mut args = MySqlArguments::default();
    for value in params {
        let bound = match value {
            SqlValue::Int(v) => args.add(*v),
            SqlValue::UInt(v) => args.add(*v),
            SqlValue::Text(v) => args.add(v.clone()),
        };
        bound.map_err(|e| DatabaseError::BindError(e.to_string()))?;
    }
    Ok(args)
}

#[async_trait]
impl QueryExecutor for MySqlClient {
    async fn count(&self, statement: &SqlStatement) -> Result<u64, DatabaseError> {
        let args = arguments(&statement.params)?;
        let total: i64 = self
            .timed(sqlx::query_scalar_with::<_, i64, _>(&statement.sql, args).fetch_one(&self.pool))
            .await?;

        Ok(total.max(0) as u64)
    }

    async fn fetch_profiles(&self, statement: &SqlStatement) -> Result<Vec<ProfileRow>, DatabaseError> {
        let args = arguments(&statement.params)?;
        let rows = self
            .timed(sqlx::query_as_with::<_, ProfileRow, _>(&statement.sql, args).fetch_all(&self.pool))
            .await?;

        tracing::debug!("Fetched {} profile rows", rows.len());

        Ok(rows)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, DatabaseError> {
        self.timed(sqlx::query("SELECT 1").fetch_one(&self.pool))
            .await
            .map(|_| true)
    }
}
