//! Dashboard statistics.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use taskdeck_db::{Statistics, StatsRepository};

use crate::auth::AuthUser;
use crate::error::ErrorBody;
use crate::{ApiError, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: Statistics,
}

/// Task and project counts per status for the caller, plus overdue tasks.
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "Stats",
    responses(
        (status = 200, body = StatsResponse),
        (status = 401, body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = state.db.stats.statistics(user.user_id, Utc::now()).await?;
    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}
