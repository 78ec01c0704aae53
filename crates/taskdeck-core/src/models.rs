//! Core data models for taskdeck.
//!
//! These types are shared across all taskdeck crates and represent the
//! domain entities as stored and as returned to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// ENUMS
// =============================================================================

/// Task priority as chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    /// Urgency is never chosen directly; it follows from priority.
    pub fn urgency(self) -> Urgency {
        match self {
            Self::Low => Urgency::Low,
            Self::Medium => Urgency::Medium,
            Self::High | Self::Urgent => Urgency::High,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Urgent => write!(f, "urgent"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(format!(
                "Invalid priority: '{}' (expected low, medium, high or urgent)",
                s
            )),
        }
    }
}

/// Urgency level shared by tasks (derived) and projects (chosen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    pub const ALL: [Urgency; 3] = [Urgency::Low, Urgency::Medium, Urgency::High];

    /// Rank used by the urgency sort methods.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

impl std::str::FromStr for Urgency {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!(
                "Invalid urgency: '{}' (expected High, Medium or Low)",
                s
            )),
        }
    }
}

/// Task workflow status.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    #[serde(rename = "On Hold")]
    OnHold,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::OnHold,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::OnHold => "On Hold",
        }
    }

    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid task status: '{}' (expected Not Started, In Progress, Completed or On Hold)",
                    s
                )
            })
    }
}

/// Project status. Canonical superset of the values the API and UI use.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Planning,
    #[serde(rename = "In Review")]
    InReview,
    #[serde(rename = "On Hold")]
    OnHold,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 7] = [
        ProjectStatus::NotStarted,
        ProjectStatus::InProgress,
        ProjectStatus::Planning,
        ProjectStatus::InReview,
        ProjectStatus::OnHold,
        ProjectStatus::Completed,
        ProjectStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Planning => "Planning",
            Self::InReview => "In Review",
            Self::OnHold => "On Hold",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ProjectStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid project status: '{}'", s))
    }
}

/// Life domain a task belongs to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum TaskContext {
    Office,
    School,
    Home,
    DailyLife,
    #[default]
    Other,
}

impl TaskContext {
    pub const ALL: [TaskContext; 5] = [
        TaskContext::Office,
        TaskContext::School,
        TaskContext::Home,
        TaskContext::DailyLife,
        TaskContext::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Office => "office",
            Self::School => "school",
            Self::Home => "home",
            Self::DailyLife => "daily-life",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for TaskContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskContext {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TaskContext::ALL
            .into_iter()
            .find(|context| context.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid context: '{}' (expected office, school, home, daily-life or other)",
                    s
                )
            })
    }
}

// =============================================================================
// USER TYPES
// =============================================================================

/// Stored user account, including the password hash.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
            created_at_utc: self.created_at_utc,
        }
    }
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at_utc: DateTime<Utc>,
}

/// Validated input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

// =============================================================================
// PROJECT TYPES
// =============================================================================

/// A grouping container for tasks.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub deadline: DateTime<Utc>,
    pub urgency: Urgency,
    pub status: ProjectStatus,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

/// Validated input for inserting a project.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub deadline: DateTime<Utc>,
    pub urgency: Urgency,
    pub status: ProjectStatus,
}

/// Validated partial update for a project; `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub deadline: Option<DateTime<Utc>>,
    pub urgency: Option<Urgency>,
    pub status: Option<ProjectStatus>,
}

impl ProjectChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Which follow-up actions to take on a project's tasks when it is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectDeletion {
    pub delete_tasks: bool,
    pub unassign_tasks: bool,
}

/// Outcome of a project deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct ProjectDeletionReport {
    /// Set only when task deletion was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_tasks: Option<u64>,
    /// Set only when unassignment was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unassigned_tasks: Option<u64>,
}

// =============================================================================
// TASK TYPES
// =============================================================================

/// A unit of work owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub deadline: Option<DateTime<Utc>>,
    /// `None` only for rows written before priority existed.
    pub priority: Option<Priority>,
    pub urgency: Option<Urgency>,
    pub status: TaskStatus,
    pub assignee: String,
    pub context: TaskContext,
    pub order: i32,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

/// Validated input for inserting a task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub user_id: Uuid,
    pub project_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub assignee: String,
    pub context: TaskContext,
    pub order: i32,
    pub completed_at: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn urgency(&self) -> Urgency {
        self.priority.urgency()
    }
}

/// Validated partial update for a task.
///
/// Outer `None` leaves a column untouched; `Some(None)` clears a nullable one.
/// Writing `status` also rewrites `completed_at` from the row's current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub project_id: Option<Option<Uuid>>,
    pub tags: Option<Vec<String>>,
    pub deadline: Option<Option<DateTime<Utc>>>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub assignee: Option<String>,
    pub context: Option<TaskContext>,
    pub order: Option<i32>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Urgency to write alongside a priority change.
    pub fn urgency(&self) -> Option<Urgency> {
        self.priority.map(Priority::urgency)
    }
}

/// One entry of a bulk manual reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TaskOrder {
    pub id: Uuid,
    pub order: i32,
}

// =============================================================================
// STATISTICS
// =============================================================================

/// Count of rows sharing one status value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Aggregate counts for one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CollectionStats {
    pub total: i64,
    pub by_status: Vec<StatusCount>,
}

impl CollectionStats {
    /// Build buckets in enum order, filling statuses absent from `counts` with zero.
    pub fn from_counts<'a>(
        statuses: impl IntoIterator<Item = &'a str>,
        counts: &[(String, i64)],
    ) -> Self {
        let by_status: Vec<StatusCount> = statuses
            .into_iter()
            .map(|status| StatusCount {
                status: status.to_string(),
                count: counts
                    .iter()
                    .find(|(s, _)| s == status)
                    .map(|(_, c)| *c)
                    .unwrap_or(0),
            })
            .collect();
        Self {
            total: counts.iter().map(|(_, c)| c).sum(),
            by_status,
        }
    }
}

/// Task and project statistics for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Statistics {
    pub tasks: CollectionStats,
    pub projects: CollectionStats,
    /// Active tasks whose deadline has passed.
    pub overdue: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_to_urgency_mapping() {
        assert_eq!(Priority::Low.urgency(), Urgency::Low);
        assert_eq!(Priority::Medium.urgency(), Urgency::Medium);
        assert_eq!(Priority::High.urgency(), Urgency::High);
        assert_eq!(Priority::Urgent.urgency(), Urgency::High);
    }

    #[test]
    fn test_priority_parse_is_case_insensitive() {
        assert_eq!("URGENT".parse::<Priority>().unwrap(), Priority::Urgent);
        assert_eq!(" low ".parse::<Priority>().unwrap(), Priority::Low);
        assert!("critical".parse::<Priority>().is_err());
    }

    #[test]
    fn test_task_status_round_trips_through_display() {
        for status in TaskStatus::ALL {
            assert_eq!(status.to_string().parse::<TaskStatus>().unwrap(), status);
        }
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_task_status_serde_uses_display_names() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let parsed: TaskStatus = serde_json::from_str("\"On Hold\"").unwrap();
        assert_eq!(parsed, TaskStatus::OnHold);
    }

    #[test]
    fn test_project_status_accepts_all_seven_values() {
        for name in [
            "Not Started",
            "In Progress",
            "Planning",
            "In Review",
            "On Hold",
            "Completed",
            "Cancelled",
        ] {
            assert!(name.parse::<ProjectStatus>().is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_context_kebab_case() {
        assert_eq!(
            "daily-life".parse::<TaskContext>().unwrap(),
            TaskContext::DailyLife
        );
        assert_eq!(
            serde_json::to_string(&TaskContext::DailyLife).unwrap(),
            "\"daily-life\""
        );
    }

    #[test]
    fn test_urgency_rank() {
        assert!(Urgency::High.rank() > Urgency::Medium.rank());
        assert!(Urgency::Medium.rank() > Urgency::Low.rank());
    }

    #[test]
    fn test_task_changes_default_is_empty() {
        assert!(TaskChanges::default().is_empty());
        let changes = TaskChanges {
            order: Some(3),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_collection_stats_fills_missing_buckets() {
        let counts = vec![("Completed".to_string(), 2), ("Not Started".to_string(), 3)];
        let stats =
            CollectionStats::from_counts(TaskStatus::ALL.iter().map(|s| s.as_str()), &counts);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.by_status.len(), 4);
        assert_eq!(stats.by_status[0].status, "Not Started");
        assert_eq!(stats.by_status[0].count, 3);
        assert_eq!(stats.by_status[1].count, 0);
        assert_eq!(stats.by_status[2].count, 2);
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let now = Utc::now();
        let task = Task {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            project_id: None,
            title: "Write report".to_string(),
            description: String::new(),
            tags: vec![],
            deadline: None,
            priority: Some(Priority::High),
            urgency: Some(Urgency::High),
            status: TaskStatus::NotStarted,
            assignee: String::new(),
            context: TaskContext::Office,
            order: 0,
            completed_at: None,
            created_at_utc: now,
            updated_at_utc: now,
        };
        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("projectId").is_some());
        assert!(value.get("completedAt").is_some());
        assert_eq!(value["priority"], "high");
        assert_eq!(value["urgency"], "High");
    }
}
