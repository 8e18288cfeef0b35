//! CrUX Collector Binary
//!
//! Collects Core Web Vitals for every origin in the configured origin list.

#![deny(unsafe_code)]

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    collector::init_tracing();

    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "No .env file loaded");
    }

    let summary = collector::run_collection().await?;

    tracing::info!(
        origins = summary.origins.len(),
        rows_stored = summary.rows_stored(),
        "Collector finished"
    );
    Ok(())
}
