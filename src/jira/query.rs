/// Build the JQL for an issue search bounded to one project.
///
/// With a watermark: `project = KEY AND updated >= "2024-03-01 00:00" ORDER BY updated DESC`
/// — most-recently-changed issues surface first on incremental runs.
/// Without: `project = KEY ORDER BY created DESC` (full load).
pub fn build_search_jql(project_key: &str, since: Option<&str>) -> String {
    let project_clause = format!("project = {}", escape_jql_value(project_key));
    match since {
        Some(ts) => format!("{project_clause} AND updated >= \"{ts}\" ORDER BY updated DESC"),
        None => format!("{project_clause} ORDER BY created DESC"),
    }
}

/// The fixed field subset requested from the search API, as a `fields` query
/// parameter value. Keeps payloads small versus fetching all fields.
pub const SEARCH_FIELDS: &str = "summary,description,created,updated,issuetype,status,assignee";

/// Escape a JQL value — wrap in quotes if it contains special characters.
fn escape_jql_value(value: &str) -> String {
    if value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }
}
