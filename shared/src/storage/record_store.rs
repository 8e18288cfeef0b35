//! Metric row storage trait and implementations.
//!
//! Provides the `RecordStore` trait for persisting collected metric rows, an
//! `InMemoryRecordStore` for development and testing, and a
//! `ClickHouseRecordStore` writing to the `crux_metrics` table.

use crate::models::MetricRow;
use std::fmt::Write as _;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Table the collected rows are written to.
pub const METRICS_TABLE: &str = "crux_metrics";

/// Errors that can occur during record store operations.
#[derive(Debug, Error)]
pub enum RecordStoreError {
    /// Failed to acquire lock on the store.
    #[error("Failed to acquire lock on record store")]
    LockError,

    /// Generic storage error.
    #[error("Storage error: {0}")]
    StorageError(String),
}

/// Query parameters for reading back stored rows.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    /// Filter by origin.
    pub url: Option<String>,

    /// Filter by metric name.
    pub metric: Option<String>,

    /// Maximum number of rows to return.
    pub limit: Option<usize>,
}

impl RecordQuery {
    /// Creates a new empty query (returns all rows).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the origin filter.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the metric name filter.
    #[must_use]
    pub fn with_metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = Some(metric.into());
        self
    }

    /// Sets the maximum number of results.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, row: &MetricRow) -> bool {
        self.url.as_ref().is_none_or(|url| &row.url == url)
            && self.metric.as_ref().is_none_or(|metric| &row.metric == metric)
    }
}

/// Trait for record storage implementations.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait RecordStore: Send + Sync {
    /// Inserts a single row.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn insert(&self, row: MetricRow) -> Result<(), RecordStoreError>;

    /// Inserts multiple rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn insert_batch(&self, rows: Vec<MetricRow>) -> Result<(), RecordStoreError>;

    /// Returns the rows matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query operation fails.
    fn query(&self, query: RecordQuery) -> Result<Vec<MetricRow>, RecordStoreError>;

    /// Returns the total number of stored rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the count operation fails.
    fn count(&self) -> Result<usize, RecordStoreError>;
}

/// In-memory record store implementation.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    rows: Arc<RwLock<Vec<MetricRow>>>,
}

impl InMemoryRecordStore {
    /// Creates a new empty in-memory record store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn insert(&self, row: MetricRow) -> Result<(), RecordStoreError> {
        let mut rows = self.rows.write().map_err(|_| RecordStoreError::LockError)?;
        rows.push(row);
        Ok(())
    }

    fn insert_batch(&self, new_rows: Vec<MetricRow>) -> Result<(), RecordStoreError> {
        let mut rows = self.rows.write().map_err(|_| RecordStoreError::LockError)?;
        rows.extend(new_rows);
        Ok(())
    }

    fn query(&self, query: RecordQuery) -> Result<Vec<MetricRow>, RecordStoreError> {
        let rows = self.rows.read().map_err(|_| RecordStoreError::LockError)?;
        let matching = rows.iter().filter(|row| query.matches(row)).cloned();

        Ok(match query.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }

    fn count(&self) -> Result<usize, RecordStoreError> {
        let rows = self.rows.read().map_err(|_| RecordStoreError::LockError)?;
        Ok(rows.len())
    }
}

#[derive(clickhouse::Row, serde::Serialize, serde::Deserialize)]
struct CruxMetricRow {
    url: String,
    metric: String,
    score: f64,
    good: f64,
    needs_improvement: f64,
    poor: f64,
}

impl From<MetricRow> for CruxMetricRow {
    fn from(row: MetricRow) -> Self {
        Self {
            url: row.url,
            metric: row.metric,
            score: row.score,
            good: row.good,
            needs_improvement: row.needs_improvement,
            poor: row.poor,
        }
    }
}

impl From<CruxMetricRow> for MetricRow {
    fn from(row: CruxMetricRow) -> Self {
        Self {
            url: row.url,
            metric: row.metric,
            score: row.score,
            good: row.good,
            needs_improvement: row.needs_improvement,
            poor: row.poor,
        }
    }
}

/// Builds the `SELECT` statement for `query`.
fn select_sql(query: &RecordQuery) -> String {
    let mut sql = format!(
        "SELECT url, metric, score, good, needs_improvement, poor FROM {METRICS_TABLE} WHERE 1=1"
    );

    if let Some(ref url) = query.url {
        let _ = write!(&mut sql, " AND url = '{}'", url.replace('\'', "''"));
    }
    if let Some(ref metric) = query.metric {
        let _ = write!(&mut sql, " AND metric = '{}'", metric.replace('\'', "''"));
    }
    if let Some(limit) = query.limit {
        let _ = write!(&mut sql, " LIMIT {limit}");
    }

    sql
}

/// `ClickHouse`-backed record store implementation.
///
/// Writes into the `crux_metrics` table, which must already exist.
#[derive(Clone)]
pub struct ClickHouseRecordStore {
    client: Arc<clickhouse::Client>,
}

impl ClickHouseRecordStore {
    /// Creates a new `ClickHouse` record store with the given client.
    #[must_use]
    pub fn new(client: Arc<clickhouse::Client>) -> Self {
        Self { client }
    }

    /// Helper to execute async operations synchronously.
    fn block_on<F, T>(future: F) -> Result<T, RecordStoreError>
    where
        F: std::future::Future<Output = Result<T, clickhouse::error::Error>>,
    {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current()
                .block_on(future)
                .map_err(|e| RecordStoreError::StorageError(e.to_string()))
        })
    }
}

impl RecordStore for ClickHouseRecordStore {
    fn insert(&self, row: MetricRow) -> Result<(), RecordStoreError> {
        self.insert_batch(vec![row])
    }

    fn insert_batch(&self, rows: Vec<MetricRow>) -> Result<(), RecordStoreError> {
        if rows.is_empty() {
            return Ok(());
        }

        let client = Arc::clone(&self.client);
        Self::block_on(async move {
            let mut inserter = client.insert::<CruxMetricRow>(METRICS_TABLE).await?;
            for row in rows {
                inserter.write(&CruxMetricRow::from(row)).await?;
            }
            inserter.end().await?;
            Ok(())
        })
    }

    fn query(&self, query: RecordQuery) -> Result<Vec<MetricRow>, RecordStoreError> {
        let sql = select_sql(&query);
        let client = Arc::clone(&self.client);

        let rows = Self::block_on(async move {
            client.query(&sql).fetch_all::<CruxMetricRow>().await
        })?;

        Ok(rows.into_iter().map(MetricRow::from).collect())
    }

    fn count(&self) -> Result<usize, RecordStoreError> {
        let client = Arc::clone(&self.client);
        let count: u64 = Self::block_on(async move {
            client
                .query(&format!("SELECT count() FROM {METRICS_TABLE}"))
                .fetch_one::<u64>()
                .await
        })?;

        Ok(usize::try_from(count).unwrap_or(usize::MAX))
    }
}
