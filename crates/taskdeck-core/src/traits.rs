//! Repository traits for taskdeck storage.
//!
//! Every method that touches user data takes the caller's id; rows owned by
//! someone else behave exactly like rows that do not exist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::filter::TaskFilter;
use crate::models::*;

// =============================================================================
// USER REPOSITORY
// =============================================================================

/// Repository for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Duplicate email or username yields `Error::Conflict`.
    async fn insert(&self, user: NewUser) -> Result<User>;

    async fn get(&self, id: Uuid) -> Result<Option<User>>;

    /// Lookup by (lowercased) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Rename a user. A taken username yields `Error::Conflict`.
    async fn update_username(&self, id: Uuid, username: &str) -> Result<User>;

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<()>;
}

// =============================================================================
// PROJECT REPOSITORY
// =============================================================================

/// Repository for projects.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn insert(&self, project: NewProject) -> Result<Project>;

    /// Fetch a project owned by `owner_id`.
    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Project>>;

    /// All projects owned by `owner_id`, ascending id.
    async fn list(&self, owner_id: Uuid) -> Result<Vec<Project>>;

    /// Apply a partial update. Returns `None` when the project is not found.
    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        changes: ProjectChanges,
    ) -> Result<Option<Project>>;

    /// Delete a project and apply the requested task follow-ups in one
    /// transaction. Returns `None` when the project is not found.
    async fn delete(
        &self,
        owner_id: Uuid,
        id: Uuid,
        options: ProjectDeletion,
    ) -> Result<Option<ProjectDeletionReport>>;
}

// =============================================================================
// TASK REPOSITORY
// =============================================================================

/// Repository for tasks.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn insert(&self, task: NewTask) -> Result<Task>;

    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<Task>>;

    /// Tasks owned by `user_id` matching `filter`, ascending id.
    async fn list(&self, user_id: Uuid, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Count of all tasks owned by `user_id`.
    async fn count(&self, user_id: Uuid) -> Result<i64>;

    /// Apply a partial update. Returns `None` when the task is not found.
    async fn update(&self, user_id: Uuid, id: Uuid, changes: TaskChanges) -> Result<Option<Task>>;

    /// Delete a task. Returns whether a row was removed.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool>;

    /// Set manual positions in one transaction. Ids the caller does not own
    /// are skipped; returns the number of rows updated.
    async fn reorder(&self, user_id: Uuid, orders: &[TaskOrder]) -> Result<u64>;

    /// Case-insensitive substring search over title, description and tags.
    async fn search(&self, user_id: Uuid, query: &str, limit: Option<i64>) -> Result<Vec<Task>>;
}

// =============================================================================
// STATISTICS
// =============================================================================

/// Aggregate counts for dashboards.
#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn statistics(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Statistics>;
}
