// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Jira issue summary model.
//!
//! Built from the raw proxy JSON rather than a derived deserializer: the
//! interesting fields live under `fields.*` with site-configurable shapes,
//! and absent optionals arrive as JSON `null`.

use chrono::{DateTime, Utc};
use serde_json::Value;

use unfurlbot_core::{UnfurlMetadata, UnfurlbotError};

/// Summary of one Jira issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiraIssueSummary {
    /// The issue key, e.g. `DM-42877`.
    pub key: String,
    /// One-line summary.
    pub summary: String,
    /// Plain-text status label; statuses are site-configurable.
    pub status_label: Option<String>,
    /// Longer description, often absent.
    pub description: Option<String>,
    /// Creation time, normalized to UTC.
    pub date_created: Option<DateTime<Utc>>,
    /// Resolution time, if resolved.
    pub date_resolved: Option<DateTime<Utc>>,
    /// Reporter display name.
    pub reporter_name: Option<String>,
    /// Assignee display name, if assigned.
    pub assignee_name: Option<String>,
    /// Browse URL for the issue.
    pub homepage: String,
}

impl JiraIssueSummary {
    /// Parses the Jira REST `issue` resource.
    ///
    /// `root_url` is the browse-link root (no trailing slash) used to build
    /// the homepage URL.
    pub fn from_json(data: &Value, root_url: &str) -> Result<Self, UnfurlbotError> {
        let key = required_str(data, "key")?;
        let fields = data
            .get("fields")
            .filter(|f| f.is_object())
            .ok_or_else(|| malformed("fields"))?;
        let summary = required_str(fields, "summary")?;

        Ok(Self {
            homepage: format!("{}/browse/{key}", root_url.trim_end_matches('/')),
            key,
            summary,
            status_label: fields
                .pointer("/status/name")
                .and_then(Value::as_str)
                .map(String::from),
            description: fields
                .get("description")
                .and_then(Value::as_str)
                .map(String::from),
            date_created: fields
                .get("created")
                .and_then(Value::as_str)
                .and_then(parse_jira_datetime),
            date_resolved: fields
                .get("resolutiondate")
                .and_then(Value::as_str)
                .and_then(parse_jira_datetime),
            reporter_name: fields
                .pointer("/reporter/displayName")
                .and_then(Value::as_str)
                .map(String::from),
            assignee_name: fields
                .pointer("/assignee/displayName")
                .and_then(Value::as_str)
                .map(String::from),
        })
    }
}

impl From<JiraIssueSummary> for UnfurlMetadata {
    fn from(issue: JiraIssueSummary) -> Self {
        Self {
            title: issue.summary,
            url: issue.homepage,
            status: issue.status_label,
            description: issue.description,
            created: issue.date_created,
            resolved: issue.date_resolved,
            reporter: issue.reporter_name,
            assignee: issue.assignee_name,
        }
    }
}

fn required_str(value: &Value, field: &str) -> Result<String, UnfurlbotError> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| malformed(field))
}

fn malformed(field: &str) -> UnfurlbotError {
    UnfurlbotError::Internal(format!("jira issue response missing field `{field}`"))
}

/// Parses Jira's timestamp format.
///
/// Jira emits `2024-02-13T16:23:06.000+0000`, which is not quite RFC 3339
/// (no colon in the offset); accept both.
fn parse_jira_datetime(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ROOT: &str = "https://jira.example.org";

    fn issue_json() -> Value {
        json!({
            "key": "DM-42877",
            "fields": {
                "summary": "Create a ticket/identifier unfurler",
                "status": {"name": "In Progress"},
                "created": "2024-02-13T16:23:06.000+0000",
                "resolutiondate": null,
                "description": "This backend will replace the old one.",
                "reporter": {"displayName": "Alex Example"},
                "assignee": {"displayName": "Alex Example"}
            }
        })
    }

    #[test]
    fn parses_a_full_issue() {
        let issue = JiraIssueSummary::from_json(&issue_json(), ROOT).unwrap();
        assert_eq!(issue.key, "DM-42877");
        assert_eq!(issue.summary, "Create a ticket/identifier unfurler");
        assert_eq!(issue.status_label.as_deref(), Some("In Progress"));
        assert_eq!(
            issue.date_created.unwrap().to_rfc3339(),
            "2024-02-13T16:23:06+00:00"
        );
        assert!(issue.date_resolved.is_none());
        assert_eq!(issue.reporter_name.as_deref(), Some("Alex Example"));
        assert_eq!(issue.homepage, "https://jira.example.org/browse/DM-42877");
    }

    #[test]
    fn parses_a_resolved_issue_with_offset_timezone() {
        let mut data = issue_json();
        data["fields"]["resolutiondate"] = json!("2024-01-30T23:11:11.000+0000");
        let issue = JiraIssueSummary::from_json(&data, ROOT).unwrap();
        assert_eq!(
            issue.date_resolved.unwrap().to_rfc3339(),
            "2024-01-30T23:11:11+00:00"
        );
    }

    #[test]
    fn null_optionals_are_tolerated() {
        let mut data = issue_json();
        data["fields"]["description"] = json!(null);
        data["fields"]["assignee"] = json!(null);
        data["fields"]["status"] = json!(null);
        let issue = JiraIssueSummary::from_json(&data, ROOT).unwrap();
        assert!(issue.description.is_none());
        assert!(issue.assignee_name.is_none());
        assert!(issue.status_label.is_none());
    }

    #[test]
    fn missing_summary_is_an_error() {
        let mut data = issue_json();
        data["fields"].as_object_mut().unwrap().remove("summary");
        assert!(JiraIssueSummary::from_json(&data, ROOT).is_err());
    }

    #[test]
    fn converts_into_unfurl_metadata() {
        let issue = JiraIssueSummary::from_json(&issue_json(), ROOT).unwrap();
        let metadata: UnfurlMetadata = issue.into();
        assert_eq!(metadata.title, "Create a ticket/identifier unfurler");
        assert_eq!(metadata.url, "https://jira.example.org/browse/DM-42877");
        assert_eq!(metadata.status.as_deref(), Some("In Progress"));
    }
}
