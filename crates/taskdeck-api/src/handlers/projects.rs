//! Project endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use taskdeck_db::{
    sort_projects, CreateProjectRequest, Project, ProjectDeletion, ProjectDeletionReport,
    ProjectRepository, ProjectSortMethod, UpdateProjectRequest,
};

use super::parse_limit;
use super::tasks::{task_listing, ListTasksQuery, TaskListResponse};
use crate::auth::AuthUser;
use crate::error::{parse_id, ApiJson, ApiQuery, ErrorBody};
use crate::{ApiError, AppState};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProjectsQuery {
    /// Sort method name. Unknown values sort by id.
    pub sorting_method: Option<String>,
    /// Maximum number of projects returned (at least 1).
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProjectQuery {
    /// Delete the project's tasks as well.
    pub delete_tasks: Option<bool>,
    /// Detach the project's tasks (after any deletion).
    pub unassign_tasks: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectListResponse {
    pub success: bool,
    pub count: usize,
    pub projects: Vec<Project>,
    pub sorting_method: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectResponse {
    pub success: bool,
    pub project: Project,
}

impl ProjectResponse {
    fn new(project: Project) -> Json<Self> {
        Json(Self {
            success: true,
            project,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteProjectResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub report: ProjectDeletionReport,
}

async fn load_project(state: &AppState, owner_id: Uuid, id: Uuid) -> Result<Project, ApiError> {
    state
        .db
        .projects
        .get(owner_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))
}

#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Projects",
    params(ListProjectsQuery),
    responses(
        (status = 200, body = ProjectListResponse),
        (status = 400, body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_projects(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<ListProjectsQuery>,
) -> Result<Json<ProjectListResponse>, ApiError> {
    let limit = parse_limit(query.limit)?;
    let sorting_method = query.sorting_method.unwrap_or_else(|| "id".to_string());

    let mut projects = state.db.projects.list(user.user_id).await?;
    sort_projects(&mut projects, ProjectSortMethod::parse(&sorting_method));
    if let Some(limit) = limit {
        projects.truncate(limit);
    }

    debug!(
        subsystem = "api",
        component = "projects",
        op = "list",
        sorting_method = %sorting_method,
        result_count = projects.len(),
        "Listed projects"
    );

    Ok(Json(ProjectListResponse {
        success: true,
        count: projects.len(),
        projects,
        sorting_method,
    }))
}

#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, body = ProjectResponse),
        (status = 400, body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_project(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(body): ApiJson<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    let new_project = body.validate(user.user_id)?;
    let project = state.db.projects.insert(new_project).await?;
    Ok((StatusCode::CREATED, ProjectResponse::new(project)))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, body = ProjectResponse),
        (status = 404, body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let id = parse_id(&id)?;
    Ok(ProjectResponse::new(load_project(&state, user.user_id, id).await?))
}

/// Partially update a project. Also mounted as `PUT`.
#[utoipa::path(
    patch,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "Project id")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, body = ProjectResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let id = parse_id(&id)?;
    let changes = body.validate()?;
    if changes.is_empty() {
        return Ok(ProjectResponse::new(load_project(&state, user.user_id, id).await?));
    }

    let project = state
        .db
        .projects
        .update(user.user_id, id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;
    Ok(ProjectResponse::new(project))
}

/// Delete a project.
///
/// `deleteTasks=true` removes its tasks, `unassignTasks=true` detaches
/// them. With neither, tasks keep a reference to the deleted project.
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "Project id"), DeleteProjectQuery),
    responses(
        (status = 200, body = DeleteProjectResponse),
        (status = 404, body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<DeleteProjectQuery>,
) -> Result<Json<DeleteProjectResponse>, ApiError> {
    let id = parse_id(&id)?;
    let options = ProjectDeletion {
        delete_tasks: query.delete_tasks.unwrap_or(false),
        unassign_tasks: query.unassign_tasks.unwrap_or(false),
    };

    let report = state
        .db
        .projects
        .delete(user.user_id, id, options)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    info!(
        subsystem = "api",
        component = "projects",
        op = "delete",
        project_id = %id,
        deleted_tasks = ?report.deleted_tasks,
        unassigned_tasks = ?report.unassigned_tasks,
        "Project deleted"
    );

    Ok(Json(DeleteProjectResponse {
        success: true,
        message: "Project deleted".to_string(),
        report,
    }))
}

/// The task listing restricted to one project.
#[utoipa::path(
    get,
    path = "/api/projects/{id}/tasks",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "Project id"), ListTasksQuery),
    responses(
        (status = 200, body = TaskListResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_project_tasks(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<ListTasksQuery>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let id = parse_id(&id)?;
    load_project(&state, user.user_id, id).await?;
    Ok(Json(task_listing(&state, user.user_id, query, Some(id)).await?))
}
