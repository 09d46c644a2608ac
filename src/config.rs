use std::env;

use crate::error::{PipelineError, PipelineResult};

const DEFAULT_JIRA_SERVER: &str = "https://validis.atlassian.net";

/// Jira connection settings.
///
/// Email and token default to empty strings when unset: a run without Jira
/// credentials fails per-request with a 401 during fetch, not at startup.
#[derive(Debug, Clone)]
pub struct JiraConfig {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    pub project_key: String,
    pub timeout_secs: u64,
}

/// MotherDuck destination settings.
///
/// Schema and table are explicit fields rather than a convention implied by the
/// database name.
#[derive(Debug, Clone)]
pub struct DestinationConfig {
    pub database: String,
    pub token: String,
    pub schema: String,
    pub table: String,
}

impl DestinationConfig {
    /// Connection string for the MotherDuck database.
    pub fn connection_string(&self) -> String {
        format!("md:{}?motherduck_token={}", self.database, self.token)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jira: JiraConfig,
    pub destination: DestinationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// `MOTHERDUCK_TOKEN` is required; a missing token aborts the run before
    /// any network activity. Everything else has a default.
    pub fn from_env() -> PipelineResult<Self> {
        let jira = JiraConfig {
            base_url: get_var_or("JIRA_SERVER", DEFAULT_JIRA_SERVER),
            email: get_var_or("JIRA_EMAIL", ""),
            api_token: get_var_or("JIRA_API_TOKEN", ""),
            project_key: get_var_or("JIRA_PROJECT_KEY", "DT"),
            timeout_secs: get_var_or("JIRA_TIMEOUT_SECS", "30")
                .parse()
                .map_err(|e| PipelineError::Config(format!("invalid JIRA_TIMEOUT_SECS: {e}")))?,
        };

        let destination = DestinationConfig {
            database: get_var_or("MOTHERDUCK_DATABASE", "jira_issues"),
            token: get_var("MOTHERDUCK_TOKEN")?,
            schema: get_var_or("MOTHERDUCK_SCHEMA", "jira_issues"),
            table: get_var_or("MOTHERDUCK_TABLE", "jira_issues"),
        };

        Ok(Self { jira, destination })
    }
}

fn get_var(key: &str) -> PipelineResult<String> {
    env::var(key).map_err(|_| PipelineError::Config(format!("{key} is required but not set")))
}

fn get_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
