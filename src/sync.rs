use crate::config::AppConfig;
use crate::error::PipelineResult;
use crate::jira::client::JiraClient;
use crate::store::duck::IssueStore;
use crate::store::record::map_records;
use crate::watermark::format_watermark;

/// Outcome of one pipeline run.
#[derive(Debug)]
pub struct SyncReport {
    pub fetched: usize,
    pub loaded: usize,
    pub incremental: bool,
    pub partial: bool,
}

/// Run the full pipeline: watermark read, paginated fetch, mapped upsert.
pub async fn run(cfg: &AppConfig) -> PipelineResult<SyncReport> {
    let mut store = IssueStore::connect(&cfg.destination)?;
    let client = JiraClient::new(cfg.jira.clone())
        .map_err(crate::jira::client::JiraClientError::RequestError)?;
    execute(&client, &mut store, &cfg.jira.project_key).await
}

/// Pipeline body over already-constructed collaborators.
///
/// A partial fetch (pagination stopped early on an error) is loaded anyway:
/// the issues collected before the failure are still fresh data, and the
/// report flags the early stop for the caller.
pub async fn execute(
    client: &JiraClient,
    store: &mut IssueStore,
    project_key: &str,
) -> PipelineResult<SyncReport> {
    let raw_watermark = store.latest_updated()?;
    let since = format_watermark(raw_watermark.as_deref());

    match &since {
        Some(ts) => tracing::info!(project = project_key, since = %ts, "incremental load"),
        None => tracing::info!(project = project_key, "full load"),
    }

    let outcome = client.search_issues(project_key, since.as_deref()).await;
    if let Some(err) = &outcome.error {
        tracing::warn!(
            fetched = outcome.issues.len(),
            error = %err,
            "pagination stopped early, loading partial result"
        );
    }
    tracing::info!(count = outcome.issues.len(), "fetched jira issues");

    store.ensure_table()?;
    let loaded = store.upsert(map_records(&outcome.issues))?;

    Ok(SyncReport {
        fetched: outcome.issues.len(),
        loaded,
        incremental: since.is_some(),
        partial: outcome.is_partial(),
    })
}
