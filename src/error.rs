use thiserror::Error;

use crate::jira::client::JiraClientError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] duckdb::Error),

    #[error("jira client error: {0}")]
    Jira(#[from] JiraClientError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
