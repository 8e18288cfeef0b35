//! Per-origin collection loop.
//!
//! Origins are processed one at a time. A failed fetch or a failed insert is
//! logged and recorded in the [`RunSummary`]; it never stops the run.

use crate::fetcher::MetricFetcher;
use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::models::MetricRow;
use shared::storage::RecordStore;
use tracing::{error, info, warn};

/// What happened to a single origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OriginOutcome {
    /// The origin was fetched and its rows were written.
    Stored {
        /// Rows written.
        stored: usize,
        /// Rows whose insert failed.
        failed: usize,
    },
    /// The fetch failed; nothing was written for this origin.
    FetchFailed {
        /// The fetch error message.
        error: String,
    },
}

/// Outcome of one origin in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OriginReport {
    /// The origin.
    pub origin: String,
    /// What happened to it.
    #[serde(flatten)]
    pub outcome: OriginOutcome,
}

/// Summary of a collection run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Per-origin outcomes, in processing order.
    pub origins: Vec<OriginReport>,
}

impl RunSummary {
    /// Total number of rows written.
    #[must_use]
    pub fn rows_stored(&self) -> usize {
        self.origins
            .iter()
            .map(|report| match report.outcome {
                OriginOutcome::Stored { stored, .. } => stored,
                OriginOutcome::FetchFailed { .. } => 0,
            })
            .sum()
    }

    /// Total number of rows whose insert failed.
    #[must_use]
    pub fn rows_failed(&self) -> usize {
        self.origins
            .iter()
            .map(|report| match report.outcome {
                OriginOutcome::Stored { failed, .. } => failed,
                OriginOutcome::FetchFailed { .. } => 0,
            })
            .sum()
    }

    /// Number of origins whose fetch failed.
    #[must_use]
    pub fn origins_failed(&self) -> usize {
        self.origins
            .iter()
            .filter(|report| matches!(report.outcome, OriginOutcome::FetchFailed { .. }))
            .count()
    }
}

/// Collects `desired_metrics` for every origin and writes them to `store`.
pub async fn collect(
    fetcher: &MetricFetcher,
    store: &dyn RecordStore,
    api_key: &str,
    origins: &[String],
    desired_metrics: &[String],
) -> RunSummary {
    let started_at = Utc::now();
    let mut reports = Vec::with_capacity(origins.len());

    for origin in origins {
        let outcome = match fetcher.fetch(origin, api_key, desired_metrics).await {
            Ok(records) => {
                let rows = records
                    .iter()
                    .map(|record| MetricRow::from_record(origin.as_str(), record));
                store_rows(store, origin, rows)
            }
            Err(e) => {
                error!(origin = %origin, error = %e, "Failed to fetch metrics");
                OriginOutcome::FetchFailed {
                    error: e.to_string(),
                }
            }
        };

        reports.push(OriginReport {
            origin: origin.clone(),
            outcome,
        });
    }

    let summary = RunSummary {
        started_at,
        finished_at: Utc::now(),
        origins: reports,
    };

    info!(
        origins = summary.origins.len(),
        origins_failed = summary.origins_failed(),
        rows_stored = summary.rows_stored(),
        rows_failed = summary.rows_failed(),
        "Collection run complete"
    );

    summary
}

/// Inserts rows one by one so a failed insert only loses that row.
fn store_rows(
    store: &dyn RecordStore,
    origin: &str,
    rows: impl Iterator<Item = MetricRow>,
) -> OriginOutcome {
    let mut stored = 0;
    let mut failed = 0;

    for row in rows {
        let metric = row.metric.clone();
        match store.insert(row) {
            Ok(()) => stored += 1,
            Err(e) => {
                warn!(origin = %origin, metric = %metric, error = %e, "Failed to insert row");
                failed += 1;
            }
        }
    }

    info!(origin = %origin, stored, failed, "Stored metrics");
    OriginOutcome::Stored { stored, failed }
}
