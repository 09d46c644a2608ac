use crate::jira::models::JiraIssue;

/// The flat row shape persisted to the destination table.
///
/// `id` is the natural key: re-loading a record with a previously seen id
/// replaces the stored row entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueRecord {
    pub id: String,
    pub key: String,
    pub summary: String,
    pub status: String,
    pub assignee: Option<String>,
    pub created_date: String,
    pub updated_date: String,
    pub issue_type: String,
    pub fields_json: String,
}

impl From<&JiraIssue> for IssueRecord {
    fn from(issue: &JiraIssue) -> Self {
        let f = &issue.fields;
        Self {
            id: issue.id.clone(),
            key: issue.key.clone(),
            summary: f.summary_or_empty(),
            status: f.status_name(),
            assignee: f.assignee_display_name(),
            created_date: f.created.clone().unwrap_or_default(),
            updated_date: f.updated.clone().unwrap_or_default(),
            issue_type: f.issue_type_name(),
            fields_json: serde_json::to_string(f).unwrap_or_else(|_| "{}".to_string()),
        }
    }
}

/// Map raw issues lazily, one record per issue. Total: missing optional
/// sub-fields default per the record schema, never fail.
pub fn map_records(issues: &[JiraIssue]) -> impl Iterator<Item = IssueRecord> + '_ {
    issues.iter().map(IssueRecord::from)
}
