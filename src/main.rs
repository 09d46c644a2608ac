mod config;
mod error;
mod jira;
mod store;
mod sync;
mod tracing_init;
mod watermark;

use config::AppConfig;
use tracing_init::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing("info");
    let _ = dotenvy::dotenv();

    tracing::info!(service = "jira-ingest", "starting");

    let cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    match sync::run(&cfg).await {
        Ok(report) => {
            tracing::info!(
                fetched = report.fetched,
                loaded = report.loaded,
                incremental = report.incremental,
                partial = report.partial,
                "sync completed"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "sync failed");
            std::process::exit(1);
        }
    }
}
