//! Structured task filters.
//!
//! Clients send filters as a JSON object in the `filters` query parameter,
//! e.g. `filters={"status":"uncompleted","tag":"work"}`. All recognized keys
//! are AND-combined; unknown keys are ignored.

use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Keys accepted for the project reference, in precedence order.
const PROJECT_KEYS: [&str; 3] = ["project", "projectid", "projectId"];

/// Special `status` value meaning "anything but Completed".
pub const UNCOMPLETED: &str = "uncompleted";

/// Status predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    Equals(String),
    NotCompleted,
}

/// Parsed task filter set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub status: Option<StatusFilter>,
    pub context: Option<String>,
    pub project_id: Option<Uuid>,
    /// Matched case-insensitively against each tag.
    pub tag: Option<String>,
    /// Only tasks without a project.
    pub unassigned: bool,
    raw: Option<Map<String, JsonValue>>,
}

/// Text of a filter value; strings as-is, other scalars as their JSON text.
fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl TaskFilter {
    /// Parse the `filters` query parameter and the `unassigned` shortcut.
    ///
    /// A missing or blank `filters` value means no structured filters. Any
    /// value that is not a JSON object is rejected.
    pub fn parse(filters: Option<&str>, unassigned: bool) -> Result<Self> {
        let raw = match filters.map(str::trim).filter(|s| !s.is_empty()) {
            None => None,
            Some(text) => match serde_json::from_str::<JsonValue>(text) {
                Ok(JsonValue::Object(map)) => Some(map),
                Ok(_) => {
                    return Err(Error::InvalidFilter(
                        "filters must be a JSON object".to_string(),
                    ))
                }
                Err(e) => return Err(Error::InvalidFilter(e.to_string())),
            },
        };

        let mut filter = TaskFilter {
            unassigned,
            ..Default::default()
        };

        if let Some(map) = &raw {
            filter.status = map.get("status").and_then(scalar_text).map(|s| {
                if s == UNCOMPLETED {
                    StatusFilter::NotCompleted
                } else {
                    StatusFilter::Equals(s)
                }
            });
            filter.context = map.get("context").and_then(scalar_text);
            filter.project_id = PROJECT_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(scalar_text))
                .and_then(|s| Uuid::parse_str(s.trim()).ok());
            filter.tag = map.get("tag").and_then(scalar_text);
        }

        filter.raw = raw;
        Ok(filter)
    }

    /// Restrict to one project, overriding any project filter from the client.
    pub fn with_project(mut self, project_id: Uuid) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Whether the client asked for any filtering at all.
    pub fn is_requested(&self) -> bool {
        self.raw.is_some() || self.unassigned
    }

    /// Echo of the filters as received, plus the `unassigned` flag when set.
    pub fn echo(&self) -> JsonValue {
        let mut map = self.raw.clone().unwrap_or_default();
        if self.unassigned {
            map.insert("unassigned".to_string(), JsonValue::Bool(true));
        }
        JsonValue::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_filters_are_empty() {
        let filter = TaskFilter::parse(None, false).unwrap();
        assert_eq!(filter, TaskFilter::default());
        assert!(!filter.is_requested());

        let blank = TaskFilter::parse(Some("  "), false).unwrap();
        assert!(!blank.is_requested());
    }

    #[test]
    fn test_uncompleted_status() {
        let filter = TaskFilter::parse(Some(r#"{"status":"uncompleted"}"#), false).unwrap();
        assert_eq!(filter.status, Some(StatusFilter::NotCompleted));
    }

    #[test]
    fn test_exact_status_and_context() {
        let filter =
            TaskFilter::parse(Some(r#"{"status":"On Hold","context":"home"}"#), false).unwrap();
        assert_eq!(
            filter.status,
            Some(StatusFilter::Equals("On Hold".to_string()))
        );
        assert_eq!(filter.context.as_deref(), Some("home"));
    }

    #[test]
    fn test_project_key_variants() {
        let id = Uuid::now_v7();
        for key in ["project", "projectid", "projectId"] {
            let text = json!({ key: id.to_string() }).to_string();
            let filter = TaskFilter::parse(Some(&text), false).unwrap();
            assert_eq!(filter.project_id, Some(id), "{}", key);
        }
    }

    #[test]
    fn test_invalid_project_reference_is_ignored() {
        let filter = TaskFilter::parse(Some(r#"{"project":"abc"}"#), false).unwrap();
        assert_eq!(filter.project_id, None);
        assert!(filter.is_requested());
    }

    #[test]
    fn test_non_object_is_rejected() {
        for bad in ["[1,2]", "\"status\"", "42", "{not json"] {
            match TaskFilter::parse(Some(bad), false) {
                Err(Error::InvalidFilter(_)) => {}
                other => panic!("Expected InvalidFilter for {}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_null_values_ignored_and_scalars_stringified() {
        let filter =
            TaskFilter::parse(Some(r#"{"status":null,"context":7,"tag":true}"#), false).unwrap();
        assert_eq!(filter.status, None);
        assert_eq!(filter.context.as_deref(), Some("7"));
        assert_eq!(filter.tag.as_deref(), Some("true"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let filter = TaskFilter::parse(Some(r#"{"colour":"red"}"#), false).unwrap();
        assert_eq!(filter.status, None);
        assert_eq!(filter.tag, None);
        assert_eq!(filter.echo(), json!({"colour": "red"}));
    }

    #[test]
    fn test_unassigned_alone_counts_as_requested() {
        let filter = TaskFilter::parse(None, true).unwrap();
        assert!(filter.is_requested());
        assert_eq!(filter.echo(), json!({"unassigned": true}));
    }

    #[test]
    fn test_with_project_overrides() {
        let id = Uuid::now_v7();
        let filter = TaskFilter::parse(Some(r#"{"project":"abc"}"#), false)
            .unwrap()
            .with_project(id);
        assert_eq!(filter.project_id, Some(id));
    }
}
