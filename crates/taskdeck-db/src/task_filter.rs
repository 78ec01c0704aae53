//! Task filter query builder.
//!
//! Turns a parsed [`TaskFilter`] into a parameterized SQL WHERE fragment over
//! the `tasks t` alias.

use uuid::Uuid;

use taskdeck_core::{StatusFilter, TaskFilter};

/// Type-safe parameter binding for SQL queries.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    /// Single UUID parameter.
    Uuid(Uuid),
    /// String parameter.
    String(String),
}

/// Generates SQL WHERE clause fragments for task filters.
///
/// # Example
///
/// ```rust,ignore
/// let filter = TaskFilter::parse(Some(r#"{"tag":"Work"}"#), true)?;
/// let (sql, params) = TaskFilterQueryBuilder::new(&filter, 1).build();
/// // sql: "t.project_id IS NULL AND EXISTS (SELECT 1 FROM unnest(t.tags) AS tag WHERE LOWER(tag) = LOWER($2))"
/// // params: [QueryParam::String("Work")]
/// ```
pub struct TaskFilterQueryBuilder<'a> {
    filter: &'a TaskFilter,
    param_offset: usize,
}

impl<'a> TaskFilterQueryBuilder<'a> {
    /// `param_offset` is the number of parameters already bound in the query.
    pub fn new(filter: &'a TaskFilter, param_offset: usize) -> Self {
        Self {
            filter,
            param_offset,
        }
    }

    /// Build the WHERE fragment and its parameters, in binding order.
    ///
    /// An empty filter yields `("TRUE", [])`.
    pub fn build(&self) -> (String, Vec<QueryParam>) {
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        let mut param_idx = self.param_offset;

        if self.filter.unassigned {
            clauses.push("t.project_id IS NULL".to_string());
        }

        match &self.filter.status {
            Some(StatusFilter::NotCompleted) => {
                clauses.push("t.status <> 'Completed'".to_string());
            }
            Some(StatusFilter::Equals(status)) => {
                param_idx += 1;
                clauses.push(format!("t.status = ${}", param_idx));
                params.push(QueryParam::String(status.clone()));
            }
            None => {}
        }

        if let Some(context) = &self.filter.context {
            param_idx += 1;
            clauses.push(format!("t.context = ${}", param_idx));
            params.push(QueryParam::String(context.clone()));
        }

        if let Some(project_id) = self.filter.project_id {
            param_idx += 1;
            clauses.push(format!("t.project_id = ${}", param_idx));
            params.push(QueryParam::Uuid(project_id));
        }

        if let Some(tag) = &self.filter.tag {
            param_idx += 1;
            clauses.push(format!(
                "EXISTS (SELECT 1 FROM unnest(t.tags) AS tag WHERE LOWER(tag) = LOWER(${}))",
                param_idx
            ));
            params.push(QueryParam::String(tag.clone()));
        }

        if clauses.is_empty() {
            return ("TRUE".to_string(), params);
        }
        (clauses.join(" AND "), params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(filters: Option<&str>, unassigned: bool, offset: usize) -> (String, Vec<QueryParam>) {
        let filter = TaskFilter::parse(filters, unassigned).unwrap();
        TaskFilterQueryBuilder::new(&filter, offset).build()
    }

    #[test]
    fn test_empty_filter_is_true() {
        let (sql, params) = build(None, false, 1);
        assert_eq!(sql, "TRUE");
        assert!(params.is_empty());
    }

    #[test]
    fn test_uncompleted_needs_no_parameter() {
        let (sql, params) = build(Some(r#"{"status":"uncompleted"}"#), false, 1);
        assert_eq!(sql, "t.status <> 'Completed'");
        assert!(params.is_empty());
    }

    #[test]
    fn test_exact_status_is_parameterized() {
        let (sql, params) = build(Some(r#"{"status":"On Hold"}"#), false, 1);
        assert_eq!(sql, "t.status = $2");
        assert_eq!(params, vec![QueryParam::String("On Hold".to_string())]);
    }

    #[test]
    fn test_tag_match_is_case_insensitive() {
        let (sql, params) = build(Some(r#"{"tag":"Work"}"#), false, 1);
        assert!(sql.contains("LOWER(tag) = LOWER($2)"));
        assert_eq!(params, vec![QueryParam::String("Work".to_string())]);
    }

    #[test]
    fn test_clauses_are_and_combined_in_order() {
        let id = Uuid::now_v7();
        let filters = format!(
            r#"{{"status":"Completed","context":"home","project":"{}","tag":"x"}}"#,
            id
        );
        let (sql, params) = build(Some(&filters), true, 3);
        assert_eq!(
            sql,
            "t.project_id IS NULL AND t.status = $4 AND t.context = $5 AND t.project_id = $6 \
             AND EXISTS (SELECT 1 FROM unnest(t.tags) AS tag WHERE LOWER(tag) = LOWER($7))"
        );
        assert_eq!(
            params,
            vec![
                QueryParam::String("Completed".to_string()),
                QueryParam::String("home".to_string()),
                QueryParam::Uuid(id),
                QueryParam::String("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_unassigned_only() {
        let (sql, params) = build(None, true, 1);
        assert_eq!(sql, "t.project_id IS NULL");
        assert!(params.is_empty());
    }

    #[test]
    fn test_invalid_project_adds_no_clause() {
        let (sql, _) = build(Some(r#"{"project":"nope"}"#), false, 1);
        assert_eq!(sql, "TRUE");
    }
}
