//! Substring search over the caller's tasks.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use taskdeck_db::{Task, TaskRepository};

use super::parse_limit;
use crate::auth::AuthUser;
use crate::error::{ApiQuery, ErrorBody};
use crate::{ApiError, AppState};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring matched against title, description and tags.
    pub q: Option<String>,
    /// Maximum number of tasks returned (at least 1).
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub count: usize,
    pub tasks: Vec<Task>,
}

/// Search the caller's tasks.
///
/// A blank query returns an empty list without touching the database.
#[utoipa::path(
    get,
    path = "/api/search",
    tag = "Search",
    params(SearchQuery),
    responses(
        (status = 200, body = SearchResponse),
        (status = 400, body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn search_tasks(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let limit = parse_limit(query.limit)?;
    let text = query.q.unwrap_or_default();

    let tasks = if text.trim().is_empty() {
        Vec::new()
    } else {
        let limit = limit.map(|n| i64::try_from(n).unwrap_or(i64::MAX));
        state.db.tasks.search(user.user_id, &text, limit).await?
    };

    debug!(
        subsystem = "api",
        component = "search",
        op = "search",
        query = %text,
        result_count = tasks.len(),
        "Searched tasks"
    );

    Ok(Json(SearchResponse {
        success: true,
        query: text,
        count: tasks.len(),
        tasks,
    }))
}
