//! OpenAPI document served at `/api-docs/openapi.json` and browsed at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use taskdeck_db::{
    ChangePasswordRequest, ChangeUsernameRequest, CollectionStats, CreateProjectRequest,
    CreateTaskRequest, LoginRequest, Priority, Project, ProjectDeletionReport, ProjectStatus,
    RegisterRequest, ReorderRequest, Statistics, StatusCount, Task, TaskContext, TaskOrder,
    TaskStatus, UpdateProjectRequest, UpdateTaskRequest, Urgency, UserProfile,
};

use crate::error::ErrorBody;
use crate::handlers::{self, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taskdeck API",
        description = "Personal task and project tracking with smart prioritization"
    ),
    paths(
        handlers::health::health_check,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::me,
        handlers::tasks::list_tasks,
        handlers::tasks::create_task,
        handlers::tasks::get_task,
        handlers::tasks::update_task,
        handlers::tasks::delete_task,
        handlers::tasks::reorder_tasks,
        handlers::projects::list_projects,
        handlers::projects::create_project,
        handlers::projects::get_project,
        handlers::projects::update_project,
        handlers::projects::delete_project,
        handlers::projects::list_project_tasks,
        handlers::search::search_tasks,
        handlers::stats::get_stats,
        handlers::settings::get_settings,
        handlers::settings::change_username,
        handlers::settings::change_password,
    ),
    components(schemas(
        Task,
        Project,
        Priority,
        Urgency,
        TaskStatus,
        ProjectStatus,
        TaskContext,
        TaskOrder,
        UserProfile,
        StatusCount,
        CollectionStats,
        Statistics,
        ProjectDeletionReport,
        CreateTaskRequest,
        UpdateTaskRequest,
        CreateProjectRequest,
        UpdateProjectRequest,
        ReorderRequest,
        RegisterRequest,
        LoginRequest,
        ChangeUsernameRequest,
        ChangePasswordRequest,
        ErrorBody,
        MessageResponse,
        handlers::health::HealthResponse,
        handlers::auth::AuthResponse,
        handlers::auth::ProfileResponse,
        handlers::tasks::TaskListResponse,
        handlers::tasks::TaskResponse,
        handlers::tasks::ReorderResponse,
        handlers::projects::ProjectListResponse,
        handlers::projects::ProjectResponse,
        handlers::projects::DeleteProjectResponse,
        handlers::search::SearchResponse,
        handlers::stats::StatsResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Auth", description = "Registration, login and the current user"),
        (name = "Tasks", description = "Task CRUD, listing and manual ordering"),
        (name = "Projects", description = "Project CRUD and per-project task listings"),
        (name = "Search", description = "Substring search over tasks"),
        (name = "Stats", description = "Per-status counts"),
        (name = "Settings", description = "Account settings"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` JWT scheme referenced by protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/auth/register",
            "/api/tasks",
            "/api/tasks/{id}",
            "/api/tasks/reorder",
            "/api/projects/{id}/tasks",
            "/api/search",
            "/api/stats",
            "/api/settings/password",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
