use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::config::JiraConfig;

use super::models::{JiraIssue, SearchResponse};
use super::query::{build_search_jql, SEARCH_FIELDS};

const PAGE_SIZE: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum JiraClientError {
    #[error("HTTP {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    RequestError(#[from] reqwest::Error),
}

/// The result of a paginated search.
///
/// Pagination fails open: a mid-loop error stops the fetch but keeps the pages
/// already accumulated, and `error` records why the loop stopped early so the
/// caller can decide whether a partial load is acceptable.
#[derive(Debug)]
pub struct FetchOutcome {
    pub issues: Vec<JiraIssue>,
    pub error: Option<JiraClientError>,
}

impl FetchOutcome {
    pub fn is_partial(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Clone)]
pub struct JiraClient {
    client: Client,
    config: JiraConfig,
}

impl JiraClient {
    pub fn new(config: JiraConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Fetch all issues of a project, optionally bounded to those updated at or
    /// after `since` (a `YYYY-MM-DD HH:MM` JQL literal).
    ///
    /// Pages of 100 are requested until `startAt` reaches the reported `total`.
    /// Any transport error, non-2xx status, or undecodable body ends the loop;
    /// the outcome then carries the issues fetched so far plus the error.
    pub async fn search_issues(&self, project_key: &str, since: Option<&str>) -> FetchOutcome {
        let url = format!("{}/rest/api/3/search", self.config.base_url);
        let jql = build_search_jql(project_key, since);
        tracing::debug!(jql = %jql, "searching jira issues");

        let mut all_issues = Vec::new();
        let mut start_at = 0usize;

        loop {
            let start_at_param = start_at.to_string();
            let max_results_param = PAGE_SIZE.to_string();
            let response = match self
                .client
                .get(&url)
                .basic_auth(&self.config.email, Some(&self.config.api_token))
                .header("Accept", "application/json")
                .query(&[
                    ("jql", jql.as_str()),
                    ("fields", SEARCH_FIELDS),
                    ("startAt", start_at_param.as_str()),
                    ("maxResults", max_results_param.as_str()),
                ])
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::error!(start_at, error = %e, "search request failed");
                    return FetchOutcome {
                        issues: all_issues,
                        error: Some(JiraClientError::RequestError(e)),
                    };
                }
            };

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                tracing::error!(start_at, %status, body = %body, "search page rejected");
                return FetchOutcome {
                    issues: all_issues,
                    error: Some(JiraClientError::HttpError { status, body }),
                };
            }

            let page: SearchResponse = match response.json().await {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!(start_at, error = %e, "search page undecodable");
                    return FetchOutcome {
                        issues: all_issues,
                        error: Some(JiraClientError::RequestError(e)),
                    };
                }
            };

            all_issues.extend(page.issues);
            start_at += PAGE_SIZE;

            if start_at >= page.total {
                break;
            }
        }

        FetchOutcome {
            issues: all_issues,
            error: None,
        }
    }
}
