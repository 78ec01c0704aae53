//! Task lifecycle rules that span more than one field.

use chrono::{DateTime, Utc};

use crate::models::TaskStatus;

/// `completed_at` for a task created with `status`.
pub fn completed_at_on_create(status: TaskStatus, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    status.is_completed().then_some(now)
}

/// Pick the canonical title from the `title` and `name` inputs.
///
/// Whichever is non-blank wins; `title` is preferred when both are.
pub fn reconcile_title(title: Option<&str>, name: Option<&str>) -> Option<String> {
    [title, name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_completed_stamps_now() {
        let now = Utc::now();
        assert_eq!(completed_at_on_create(TaskStatus::Completed, now), Some(now));
        assert_eq!(completed_at_on_create(TaskStatus::InProgress, now), None);
    }

    #[test]
    fn test_reconcile_title_prefers_title() {
        assert_eq!(
            reconcile_title(Some("Title"), Some("Name")),
            Some("Title".to_string())
        );
    }

    #[test]
    fn test_reconcile_title_falls_back_to_name() {
        assert_eq!(
            reconcile_title(Some("  "), Some(" Name ")),
            Some("Name".to_string())
        );
        assert_eq!(reconcile_title(None, Some("Name")), Some("Name".to_string()));
    }

    #[test]
    fn test_reconcile_title_none_when_both_blank() {
        assert_eq!(reconcile_title(Some(""), None), None);
        assert_eq!(reconcile_title(None, None), None);
    }
}
