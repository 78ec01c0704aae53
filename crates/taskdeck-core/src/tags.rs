//! Tag normalization.
//!
//! Tags arrive from clients as arbitrary JSON. Only an array made entirely of
//! strings is accepted; every other shape normalizes to no tags rather than
//! failing the write.

use serde_json::Value as JsonValue;

/// Maximum number of tags kept on a single task or project.
pub const MAX_TAGS: usize = 64;

/// Normalize client-supplied tags into a clean list of strings.
///
/// Entries are trimmed, empty entries dropped and exact duplicates removed
/// (first occurrence wins, original order kept).
pub fn normalize_tags(input: &JsonValue) -> Vec<String> {
    let Some(items) = input.as_array() else {
        return Vec::new();
    };

    if !items.iter().all(JsonValue::is_string) {
        return Vec::new();
    }

    let mut tags: Vec<String> = Vec::with_capacity(items.len());
    for tag in items.iter().filter_map(JsonValue::as_str) {
        let tag = tag.trim();
        if tag.is_empty() || tags.iter().any(|t| t == tag) {
            continue;
        }
        tags.push(tag.to_string());
        if tags.len() == MAX_TAGS {
            break;
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_of_strings_is_kept() {
        assert_eq!(
            normalize_tags(&json!(["work", "important"])),
            vec!["work", "important"]
        );
    }

    #[test]
    fn test_entries_are_trimmed_and_empties_dropped() {
        assert_eq!(normalize_tags(&json!([" a ", "", "  ", "b"])), vec!["a", "b"]);
    }

    #[test]
    fn test_duplicates_removed_keeping_first() {
        assert_eq!(normalize_tags(&json!(["x", "y", "x"])), vec!["x", "y"]);
    }

    #[test]
    fn test_case_variants_are_distinct_tags() {
        assert_eq!(
            normalize_tags(&json!(["Important", "important"])),
            vec!["Important", "important"]
        );
    }

    #[test]
    fn test_malformed_shapes_become_empty() {
        assert!(normalize_tags(&json!("work,home")).is_empty());
        assert!(normalize_tags(&json!(42)).is_empty());
        assert!(normalize_tags(&json!({"tag": "work"})).is_empty());
        assert!(normalize_tags(&json!(null)).is_empty());
        assert!(normalize_tags(&json!(["work", 7])).is_empty());
    }

    #[test]
    fn test_tag_count_is_capped() {
        let many: Vec<String> = (0..100).map(|i| format!("t{}", i)).collect();
        assert_eq!(normalize_tags(&json!(many)).len(), MAX_TAGS);
    }
}
