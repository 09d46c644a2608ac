use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One page of the Jira Cloud search API (`/rest/api/3/search`).
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub issues: Vec<JiraIssue>,
}

/// An issue as returned by the search API, restricted to the requested fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssue {
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

/// The `fields` object of an issue.
///
/// Every sub-field is optional: Jira omits fields that are unset on an issue,
/// and accessors must degrade to empty/None rather than fail. Unknown fields
/// are kept in `extra` so the record's `fields_json` round-trips them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    // v2 returns a string, v3 an ADF document; carried opaquely either way
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuetype: Option<NamedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NamedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Assignee>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IssueFields {
    pub fn summary_or_empty(&self) -> String {
        self.summary.clone().unwrap_or_default()
    }

    pub fn status_name(&self) -> String {
        named(&self.status)
    }

    pub fn issue_type_name(&self) -> String {
        named(&self.issuetype)
    }

    pub fn assignee_display_name(&self) -> Option<String> {
        self.assignee.as_ref().and_then(|a| a.display_name.clone())
    }
}

fn named(field: &Option<NamedField>) -> String {
    field
        .as_ref()
        .and_then(|f| f.name.clone())
        .unwrap_or_default()
}

/// A `{ "name": ... }` sub-object (status, issuetype).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_issue_deserializes() {
        let json = serde_json::json!({
            "id": "10042",
            "key": "DT-42",
            "fields": {
                "summary": "Fix the widget",
                "description": "It is broken",
                "created": "2024-01-05T10:15:30.000+0000",
                "updated": "2024-02-01T08:00:00.000+0000",
                "issuetype": { "name": "Bug" },
                "status": { "name": "In Progress" },
                "assignee": { "displayName": "Mia Krystof" }
            }
        });
        let issue: JiraIssue = serde_json::from_value(json).unwrap();
        assert_eq!(issue.id, "10042");
        assert_eq!(issue.key, "DT-42");
        assert_eq!(issue.fields.summary_or_empty(), "Fix the widget");
        assert_eq!(issue.fields.status_name(), "In Progress");
        assert_eq!(issue.fields.issue_type_name(), "Bug");
        assert_eq!(
            issue.fields.assignee_display_name().as_deref(),
            Some("Mia Krystof")
        );
    }

    #[test]
    fn minimal_issue_deserializes() {
        let json = serde_json::json!({
            "id": "1",
            "key": "DT-1",
            "fields": {}
        });
        let issue: JiraIssue = serde_json::from_value(json).unwrap();
        assert_eq!(issue.fields.summary_or_empty(), "");
        assert_eq!(issue.fields.status_name(), "");
        assert_eq!(issue.fields.issue_type_name(), "");
        assert!(issue.fields.assignee_display_name().is_none());
    }

    #[test]
    fn null_assignee_maps_to_none() {
        let json = serde_json::json!({
            "id": "2",
            "key": "DT-2",
            "fields": { "summary": "Unassigned", "assignee": null }
        });
        let issue: JiraIssue = serde_json::from_value(json).unwrap();
        assert!(issue.fields.assignee_display_name().is_none());
    }

    #[test]
    fn status_without_name_maps_to_empty() {
        let json = serde_json::json!({
            "id": "3",
            "key": "DT-3",
            "fields": { "status": { "id": "10000" } }
        });
        let issue: JiraIssue = serde_json::from_value(json).unwrap();
        assert_eq!(issue.fields.status_name(), "");
    }

    #[test]
    fn adf_description_is_carried_opaquely() {
        let json = serde_json::json!({
            "id": "4",
            "key": "DT-4",
            "fields": {
                "description": {
                    "type": "doc",
                    "version": 1,
                    "content": []
                }
            }
        });
        let issue: JiraIssue = serde_json::from_value(json).unwrap();
        assert!(issue.fields.description.as_ref().unwrap().is_object());
    }

    #[test]
    fn unknown_fields_survive_reserialization() {
        let json = serde_json::json!({
            "id": "5",
            "key": "DT-5",
            "fields": {
                "summary": "Keep extras",
                "customfield_10016": 5.0
            }
        });
        let issue: JiraIssue = serde_json::from_value(json).unwrap();
        let out = serde_json::to_value(&issue.fields).unwrap();
        assert_eq!(out["customfield_10016"], 5.0);
        assert_eq!(out["summary"], "Keep extras");
    }

    #[test]
    fn search_response_deserializes() {
        let json = serde_json::json!({
            "startAt": 0,
            "maxResults": 100,
            "total": 2,
            "issues": [
                { "id": "1", "key": "DT-1", "fields": {} },
                { "id": "2", "key": "DT-2", "fields": {} }
            ]
        });
        let response: SearchResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.total, 2);
        assert_eq!(response.issues.len(), 2);
        assert_eq!(response.issues[0].key, "DT-1");
    }
}
