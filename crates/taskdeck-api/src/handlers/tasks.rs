//! Task endpoints: listing, CRUD and bulk reorder.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use taskdeck_db::{
    arrange_tasks, CreateTaskRequest, ReorderRequest, Task, TaskFilter, TaskRepository,
    TaskSortMethod, UpdateTaskRequest,
};

use super::{parse_limit, MessageResponse};
use crate::auth::AuthUser;
use crate::error::{parse_id, ApiJson, ApiQuery, ErrorBody};
use crate::{ApiError, AppState};

/// Query parameters shared by `GET /api/tasks` and `GET /api/projects/{id}/tasks`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTasksQuery {
    /// Sort method name. Unknown values sort by id.
    pub sorting_method: Option<String>,
    /// JSON object of filters, e.g. `{"status":"uncompleted","tag":"work"}`.
    pub filters: Option<String>,
    /// Only tasks without a project.
    pub unassigned: Option<bool>,
    /// Maximum number of tasks returned (at least 1).
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskListResponse {
    pub success: bool,
    /// Matching tasks before the limit is applied.
    pub count: usize,
    /// All of the caller's tasks.
    pub total: i64,
    pub tasks: Vec<Task>,
    pub sorting_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub filters: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filtered_total: Option<usize>,
}

impl TaskListResponse {
    /// Build the listing envelope from the filtered tasks.
    ///
    /// `count` and `filtered_total` are taken before the limit; the limit
    /// applies after completed tasks have been moved behind active ones.
    fn assemble(
        tasks: Vec<Task>,
        total: i64,
        filter: &TaskFilter,
        sorting_method: String,
        limit: Option<usize>,
        now: DateTime<Utc>,
    ) -> Self {
        let count = tasks.len();
        let mut tasks = arrange_tasks(tasks, TaskSortMethod::parse(&sorting_method), now);
        if let Some(limit) = limit {
            tasks.truncate(limit);
        }

        let filtered = filter.is_requested();
        Self {
            success: true,
            count,
            total,
            tasks,
            sorting_method,
            filters: filtered.then(|| filter.echo()),
            filtered_total: filtered.then_some(count),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskResponse {
    pub success: bool,
    pub task: Task,
}

impl TaskResponse {
    fn new(task: Task) -> Json<Self> {
        Json(Self {
            success: true,
            task,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReorderResponse {
    pub success: bool,
    /// Tasks whose order was changed; ids the caller does not own are skipped.
    pub updated: u64,
}

/// Filter, arrange (active before completed) and truncate the caller's tasks.
pub(crate) async fn task_listing(
    state: &AppState,
    user_id: Uuid,
    query: ListTasksQuery,
    project_id: Option<Uuid>,
) -> Result<TaskListResponse, ApiError> {
    let limit = parse_limit(query.limit)?;
    let unassigned = query.unassigned.unwrap_or(false);
    let mut filter = TaskFilter::parse(query.filters.as_deref(), unassigned)?;
    if let Some(project_id) = project_id {
        filter = filter.with_project(project_id);
    }
    let sorting_method = query.sorting_method.unwrap_or_else(|| "id".to_string());

    let total = state.db.tasks.count(user_id).await?;
    let tasks = state.db.tasks.list(user_id, &filter).await?;
    let listing =
        TaskListResponse::assemble(tasks, total, &filter, sorting_method, limit, Utc::now());

    debug!(
        subsystem = "api",
        component = "tasks",
        op = "list",
        sorting_method = %listing.sorting_method,
        result_count = listing.count,
        returned = listing.tasks.len(),
        "Listed tasks"
    );
    Ok(listing)
}

async fn load_task(state: &AppState, user_id: Uuid, id: Uuid) -> Result<Task, ApiError> {
    state
        .db
        .tasks
        .get(user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}

/// List the caller's tasks.
///
/// # Returns
/// - 200 with the listing envelope
/// - 400 for a malformed `filters` object or a non-positive `limit`
#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "Tasks",
    params(ListTasksQuery),
    responses(
        (status = 200, body = TaskListResponse),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_tasks(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<ListTasksQuery>,
) -> Result<Json<TaskListResponse>, ApiError> {
    Ok(Json(task_listing(&state, user.user_id, query, None).await?))
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "Tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, body = TaskResponse),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_task(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(body): ApiJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let new_task = body.validate(user.user_id, Utc::now())?;
    let task = state.db.tasks.insert(new_task).await?;
    Ok((StatusCode::CREATED, TaskResponse::new(task)))
}

#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = Uuid, Path, description = "Task id")),
    responses(
        (status = 200, body = TaskResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let id = parse_id(&id)?;
    Ok(TaskResponse::new(load_task(&state, user.user_id, id).await?))
}

/// Partially update a task. Also mounted as `PUT`.
///
/// Status changes maintain `completedAt`: entering Completed stamps it,
/// leaving Completed clears it, staying Completed keeps it.
#[utoipa::path(
    patch,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = Uuid, Path, description = "Task id")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, body = TaskResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let id = parse_id(&id)?;
    let changes = body.validate()?;
    if changes.is_empty() {
        return Ok(TaskResponse::new(load_task(&state, user.user_id, id).await?));
    }

    let task = state
        .db
        .tasks
        .update(user.user_id, id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;
    Ok(TaskResponse::new(task))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = Uuid, Path, description = "Task id")),
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    if !state.db.tasks.delete(user.user_id, id).await? {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }
    info!(subsystem = "api", component = "tasks", op = "delete", task_id = %id, "Task deleted");
    Ok(Json(MessageResponse::new("Task deleted")))
}

/// Set the manual order of many tasks in one transaction.
#[utoipa::path(
    put,
    path = "/api/tasks/reorder",
    tag = "Tasks",
    request_body = ReorderRequest,
    responses(
        (status = 200, body = ReorderResponse),
        (status = 400, body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn reorder_tasks(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(body): ApiJson<ReorderRequest>,
) -> Result<Json<ReorderResponse>, ApiError> {
    let updated = state.db.tasks.reorder(user.user_id, &body.orders).await?;
    Ok(Json(ReorderResponse {
        success: true,
        updated,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_db::{Priority, TaskContext, TaskStatus, Urgency};

    fn task(title: &str, status: TaskStatus, order: i32) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::now_v7(),
            user_id: Uuid::nil(),
            project_id: None,
            title: title.to_string(),
            description: String::new(),
            tags: vec![],
            deadline: None,
            priority: Some(Priority::Medium),
            urgency: Some(Urgency::Medium),
            status,
            assignee: String::new(),
            context: TaskContext::Other,
            order,
            completed_at: status.is_completed().then_some(now),
            created_at_utc: now,
            updated_at_utc: now,
        }
    }

    fn titles(listing: &TaskListResponse) -> Vec<&str> {
        listing.tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn test_unfiltered_listing_omits_filter_echo() {
        let tasks = vec![task("A", TaskStatus::NotStarted, 0)];
        let filter = TaskFilter::parse(None, false).unwrap();
        let listing =
            TaskListResponse::assemble(tasks, 1, &filter, "id".to_string(), None, Utc::now());

        let body = serde_json::to_value(&listing).unwrap();
        assert_eq!(body["count"], 1);
        assert_eq!(body["total"], 1);
        assert_eq!(body["sorting_method"], "id");
        assert!(body.get("filters").is_none());
        assert!(body.get("filtered_total").is_none());
    }

    #[test]
    fn test_filtered_listing_echoes_filters_and_totals() {
        let tasks = vec![
            task("A", TaskStatus::InProgress, 0),
            task("B", TaskStatus::NotStarted, 0),
        ];
        let filter = TaskFilter::parse(Some(r#"{"status":"uncompleted"}"#), true).unwrap();
        let listing =
            TaskListResponse::assemble(tasks, 5, &filter, "Title".to_string(), None, Utc::now());

        let body = serde_json::to_value(&listing).unwrap();
        assert_eq!(body["count"], 2);
        assert_eq!(body["total"], 5);
        assert_eq!(body["filtered_total"], 2);
        assert_eq!(body["sorting_method"], "Title");
        assert_eq!(body["filters"]["status"], "uncompleted");
        assert_eq!(body["filters"]["unassigned"], true);
    }

    #[test]
    fn test_limit_applies_after_completed_tasks_move_last() {
        // Store order puts the completed task first; by manual order it would
        // also come first.
        let tasks = vec![
            task("Done", TaskStatus::Completed, 0),
            task("A", TaskStatus::InProgress, 1),
            task("B", TaskStatus::NotStarted, 2),
        ];
        let filter = TaskFilter::default();
        let listing =
            TaskListResponse::assemble(tasks, 3, &filter, "order".to_string(), Some(2), Utc::now());

        assert_eq!(titles(&listing), vec!["A", "B"]);
        assert_eq!(listing.count, 3);
        assert_eq!(listing.total, 3);
    }

    #[test]
    fn test_limit_larger_than_result_keeps_everything() {
        let tasks = vec![
            task("A", TaskStatus::NotStarted, 0),
            task("Done", TaskStatus::Completed, 0),
        ];
        let filter = TaskFilter::default();
        let listing =
            TaskListResponse::assemble(tasks, 2, &filter, "id".to_string(), Some(10), Utc::now());

        assert_eq!(titles(&listing), vec!["A", "Done"]);
    }
}
