//! Client request bodies and their validation.
//!
//! Enum and date fields are received as plain strings so that every bad
//! value is reported as a field message instead of a deserialization failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::dates::parse_deadline;
use crate::error::{Error, Result};
use crate::lifecycle::{completed_at_on_create, reconcile_title};
use crate::models::{
    NewProject, NewTask, Priority, ProjectChanges, ProjectStatus, TaskChanges, TaskContext,
    TaskOrder, TaskStatus, Urgency,
};
use crate::tags::normalize_tags;
use crate::validation::{
    validate_email, validate_password, validate_username, ValidationErrors, MAX_DESCRIPTION_LEN,
    MAX_TITLE_LEN,
};

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
pub fn nullable<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn parse_project_ref(errors: &mut ValidationErrors, raw: &str) -> Option<Uuid> {
    match Uuid::parse_str(raw.trim()) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push(format!("projectId: '{}' is not a valid identifier", raw));
            None
        }
    }
}

fn parse_deadline_field(errors: &mut ValidationErrors, raw: &str) -> Option<DateTime<Utc>> {
    match parse_deadline(raw) {
        Ok(dt) => Some(dt),
        Err(e) => {
            errors.push(format!("deadline: {}", e));
            None
        }
    }
}

// =============================================================================
// TASKS
// =============================================================================

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    /// Alias for `title`.
    pub name: Option<String>,
    pub description: Option<String>,
    pub project_id: Option<String>,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub tags: JsonValue,
    pub deadline: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub context: Option<String>,
    pub order: Option<i32>,
}

impl CreateTaskRequest {
    /// Validate into an insertable task owned by `user_id`.
    pub fn validate(self, user_id: Uuid, now: DateTime<Utc>) -> Result<NewTask> {
        let mut errors = ValidationErrors::new();

        let picked = reconcile_title(self.title.as_deref(), self.name.as_deref());
        let title = errors.required_text("title", picked.as_deref(), MAX_TITLE_LEN);
        let description = errors
            .bounded_text("description", self.description.as_deref(), MAX_DESCRIPTION_LEN)
            .unwrap_or_default();
        let project_id = self
            .project_id
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .and_then(|raw| parse_project_ref(&mut errors, raw));
        let deadline = self
            .deadline
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .and_then(|raw| parse_deadline_field(&mut errors, raw));
        let priority: Option<Priority> = errors.parse_enum("priority", self.priority.as_deref());
        let status: Option<TaskStatus> = errors.parse_enum("status", self.status.as_deref());
        let context: Option<TaskContext> = errors.parse_enum("context", self.context.as_deref());
        let assignee = errors
            .bounded_text("assignee", self.assignee.as_deref(), MAX_TITLE_LEN)
            .unwrap_or_default();
        let tags = normalize_tags(&self.tags);

        errors.finish(|| {
            let status = status.unwrap_or_default();
            NewTask {
                user_id,
                project_id,
                title: title.unwrap_or_default(),
                description,
                tags,
                deadline,
                priority: priority.unwrap_or(Priority::Medium),
                status,
                assignee: assignee.trim().to_string(),
                context: context.unwrap_or_default(),
                order: self.order.unwrap_or(0),
                completed_at: completed_at_on_create(status, now),
            }
        })
    }
}

/// Body of `PATCH /api/tasks/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    /// Alias for `title`.
    pub name: Option<String>,
    pub description: Option<String>,
    /// `null` detaches the task from its project.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub project_id: Option<Option<String>>,
    #[schema(value_type = Option<Vec<String>>)]
    pub tags: Option<JsonValue>,
    /// `null` clears the deadline.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub deadline: Option<Option<String>>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub context: Option<String>,
    pub order: Option<i32>,
}

impl UpdateTaskRequest {
    /// Validate the fields present in the body, producing the columns to write.
    ///
    /// `completedAt` is not part of the result: the store derives it from the
    /// row's current value whenever a status is written.
    pub fn validate(self) -> Result<TaskChanges> {
        let mut errors = ValidationErrors::new();

        let title = if self.title.is_some() || self.name.is_some() {
            let picked = reconcile_title(self.title.as_deref(), self.name.as_deref());
            errors.required_text("title", picked.as_deref(), MAX_TITLE_LEN)
        } else {
            None
        };
        let description =
            errors.bounded_text("description", self.description.as_deref(), MAX_DESCRIPTION_LEN);
        let project_id = match self.project_id {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) if raw.trim().is_empty() => Some(None),
            Some(Some(raw)) => parse_project_ref(&mut errors, &raw).map(Some),
        };
        let deadline = match self.deadline {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) if raw.trim().is_empty() => Some(None),
            Some(Some(raw)) => parse_deadline_field(&mut errors, &raw).map(Some),
        };
        let priority: Option<Priority> = errors.parse_enum("priority", self.priority.as_deref());
        let status: Option<TaskStatus> = errors.parse_enum("status", self.status.as_deref());
        let context: Option<TaskContext> = errors.parse_enum("context", self.context.as_deref());
        let assignee = errors
            .bounded_text("assignee", self.assignee.as_deref(), MAX_TITLE_LEN)
            .map(|a| a.trim().to_string());
        let tags = self.tags.as_ref().map(normalize_tags);

        errors.finish(|| TaskChanges {
            title,
            description,
            project_id,
            tags,
            deadline,
            priority,
            status,
            assignee,
            context,
            order: self.order,
        })
    }
}

// =============================================================================
// PROJECTS
// =============================================================================

/// Body of `POST /api/projects`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub tags: JsonValue,
    pub deadline: Option<String>,
    pub urgency: Option<String>,
    pub status: Option<String>,
}

impl CreateProjectRequest {
    pub fn validate(self, owner_id: Uuid) -> Result<NewProject> {
        let mut errors = ValidationErrors::new();

        let name = errors.required_text("name", self.name.as_deref(), MAX_TITLE_LEN);
        let description = errors
            .bounded_text("description", self.description.as_deref(), MAX_DESCRIPTION_LEN)
            .unwrap_or_default();
        let deadline = match self.deadline.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(raw) => parse_deadline_field(&mut errors, raw),
            None => {
                errors.push("deadline is required");
                None
            }
        };
        let urgency: Option<Urgency> = errors.parse_enum("urgency", self.urgency.as_deref());
        let status: Option<ProjectStatus> = errors.parse_enum("status", self.status.as_deref());
        let tags = normalize_tags(&self.tags);

        // name and deadline are Some whenever no message was recorded
        errors.finish(|| NewProject {
            owner_id,
            name: name.unwrap_or_default(),
            description,
            tags,
            deadline: deadline.unwrap_or_default(),
            urgency: urgency.unwrap_or(Urgency::Medium),
            status: status.unwrap_or_default(),
        })
    }
}

/// Body of `PATCH /api/projects/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<Vec<String>>)]
    pub tags: Option<JsonValue>,
    pub deadline: Option<String>,
    pub urgency: Option<String>,
    pub status: Option<String>,
}

impl UpdateProjectRequest {
    pub fn validate(self) -> Result<ProjectChanges> {
        let mut errors = ValidationErrors::new();

        let name = match self.name.as_deref() {
            Some(raw) => errors.required_text("name", Some(raw), MAX_TITLE_LEN),
            None => None,
        };
        let description =
            errors.bounded_text("description", self.description.as_deref(), MAX_DESCRIPTION_LEN);
        let deadline = match self.deadline.as_deref() {
            Some(raw) if raw.trim().is_empty() => {
                errors.push("deadline cannot be removed from a project");
                None
            }
            Some(raw) => parse_deadline_field(&mut errors, raw),
            None => None,
        };
        let urgency: Option<Urgency> = errors.parse_enum("urgency", self.urgency.as_deref());
        let status: Option<ProjectStatus> = errors.parse_enum("status", self.status.as_deref());
        let tags = self.tags.as_ref().map(normalize_tags);

        errors.finish(|| ProjectChanges {
            name,
            description,
            tags,
            deadline,
            urgency,
            status,
        })
    }
}

/// Body of `PUT /api/tasks/reorder`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ReorderRequest {
    pub orders: Vec<TaskOrder>,
}

// =============================================================================
// ACCOUNTS
// =============================================================================

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Registration input after validation; the password is still plaintext.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration> {
        let mut errors = ValidationErrors::new();
        let email = validate_email(&mut errors, &self.email);
        let username = validate_username(&mut errors, &self.username);
        validate_password(&mut errors, &self.password);
        errors.finish(|| Registration {
            email,
            username,
            password: self.password,
        })
    }
}

/// Body of `POST /api/auth/login`. Either `email` or `username` identifies the account.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: String,
}

/// How a login identifies the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Email(String),
    Username(String),
}

impl LoginRequest {
    pub fn identifier(&self) -> Result<LoginIdentifier> {
        let email = self.email.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let username = self
            .username
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        match (email, username) {
            (Some(email), _) => Ok(LoginIdentifier::Email(email.to_lowercase())),
            (None, Some(username)) => Ok(LoginIdentifier::Username(username.to_string())),
            (None, None) => Err(Error::validation("email or username is required")),
        }
    }
}

/// Body of `PUT /api/settings/username`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ChangeUsernameRequest {
    pub username: String,
}

impl ChangeUsernameRequest {
    pub fn validate(self) -> Result<String> {
        let mut errors = ValidationErrors::new();
        let username = validate_username(&mut errors, &self.username);
        errors.finish(|| username)
    }
}

/// Body of `PUT /api/settings/password`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl ChangePasswordRequest {
    /// Check the new password's shape; the current one is verified against the stored hash.
    pub fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();
        validate_password(&mut errors, &self.new_password);
        errors.finish(|| ())
    }
}
