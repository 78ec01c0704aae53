//! Row to model mapping shared by the repositories.

use std::str::FromStr;

use sqlx::postgres::PgRow;
use sqlx::Row;

use taskdeck_core::{Error, Project, Result, Task, User};

/// Column list selected for tasks, in the order `task_from_row` expects.
pub const TASK_COLUMNS: &str = "t.id, t.user_id, t.project_id, t.title, t.description, t.tags, \
     t.deadline, t.priority, t.urgency, t.status, t.assignee, t.context, t.sort_order, \
     t.completed_at, t.created_at_utc, t.updated_at_utc";

/// Column list selected for projects.
pub const PROJECT_COLUMNS: &str = "p.id, p.owner_id, p.name, p.description, p.tags, p.deadline, \
     p.urgency, p.status, p.created_at_utc, p.updated_at_utc";

/// Column list selected for users.
pub const USER_COLUMNS: &str =
    "id, email, username, password_hash, created_at_utc, updated_at_utc";

fn parse_column<T: FromStr<Err = String>>(column: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|e| Error::Internal(format!("Unexpected value in column {}: {}", column, e)))
}

fn parse_optional<T: FromStr<Err = String>>(
    column: &str,
    value: Option<String>,
) -> Result<Option<T>> {
    value.map(|v| parse_column(column, &v)).transpose()
}

pub fn task_from_row(r: &PgRow) -> Result<Task> {
    Ok(Task {
        id: r.get("id"),
        user_id: r.get("user_id"),
        project_id: r.get("project_id"),
        title: r.get("title"),
        description: r.get("description"),
        tags: r.get::<Vec<String>, _>("tags"),
        deadline: r.get("deadline"),
        priority: parse_optional("priority", r.get("priority"))?,
        urgency: parse_optional("urgency", r.get("urgency"))?,
        status: parse_column("status", r.get::<&str, _>("status"))?,
        assignee: r.get("assignee"),
        context: parse_column("context", r.get::<&str, _>("context"))?,
        order: r.get("sort_order"),
        completed_at: r.get("completed_at"),
        created_at_utc: r.get("created_at_utc"),
        updated_at_utc: r.get("updated_at_utc"),
    })
}

pub fn project_from_row(r: &PgRow) -> Result<Project> {
    Ok(Project {
        id: r.get("id"),
        owner_id: r.get("owner_id"),
        name: r.get("name"),
        description: r.get("description"),
        tags: r.get::<Vec<String>, _>("tags"),
        deadline: r.get("deadline"),
        urgency: parse_column("urgency", r.get::<&str, _>("urgency"))?,
        status: parse_column("status", r.get::<&str, _>("status"))?,
        created_at_utc: r.get("created_at_utc"),
        updated_at_utc: r.get("updated_at_utc"),
    })
}

pub fn user_from_row(r: &PgRow) -> User {
    User {
        id: r.get("id"),
        email: r.get("email"),
        username: r.get("username"),
        password_hash: r.get("password_hash"),
        created_at_utc: r.get("created_at_utc"),
        updated_at_utc: r.get("updated_at_utc"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_core::{Priority, TaskStatus};

    #[test]
    fn test_parse_column_reports_column() {
        let err = parse_column::<TaskStatus>("status", "Done").unwrap_err();
        assert!(err.to_string().contains("status"));
    }

    #[test]
    fn test_parse_optional_null_is_none() {
        assert_eq!(parse_optional::<Priority>("priority", None).unwrap(), None);
        assert_eq!(
            parse_optional::<Priority>("priority", Some("urgent".to_string())).unwrap(),
            Some(Priority::Urgent)
        );
    }
}
