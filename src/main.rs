//! Conductor - Geospatial Catalog Lifecycle Auditor
//!
//! Contributors open tracking issues carrying a machine-readable conductor
//! tag naming a dataset and a scheduled effective date. Conductor
//! independently confirms the dataset has actually appeared (or been
//! removed) across the systems of record - the internal store, the public
//! and open mirrors, the metadata registry, the web mapping platform, the
//! open-data portal, and the stewardship spreadsheet - then posts a graded
//! report back on the issue.

mod checks;
mod config;
mod error;
mod github;
mod identity;
mod metadata;
mod pipeline;
mod sheets;

use crate::checks::BackendSuite;
use crate::config::Settings;
use crate::github::GithubClient;
use crate::pipeline::{report, Orchestrator};
use crate::sheets::SheetsClient;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("🚂 starting conductor");

    let settings = Settings::load()?;
    info!("configuration loaded for {}", settings.github.repo);

    let tracker = GithubClient::new(&settings.github);
    let sheets = SheetsClient::new(&settings.sheet);
    let suite = BackendSuite::new(&settings, &sheets);

    let orchestrator = Orchestrator::new(&tracker, &suite);
    let reports = orchestrator.run().await?;
    info!("checked {} datasets", reports.len());

    report::publish(&tracker, &reports).await?;

    info!("👋 run complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,conductor=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .compact(),
        )
        .init();
}
