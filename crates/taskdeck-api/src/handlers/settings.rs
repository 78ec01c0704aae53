//! Account settings: profile, username and password changes.

use axum::{extract::State, Json};
use tracing::{info, warn};

use taskdeck_db::{ChangePasswordRequest, ChangeUsernameRequest, UserRepository};

use super::auth::{auth_response, current_user, AuthResponse, ProfileResponse};
use super::MessageResponse;
use crate::auth::{hash_password_blocking, verify_password_blocking, AuthUser};
use crate::error::{ApiJson, ErrorBody};
use crate::{ApiError, AppState};

#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Settings",
    responses(
        (status = 200, body = ProfileResponse),
        (status = 401, body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_settings(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = current_user(&state, caller.user_id).await?;
    Ok(Json(ProfileResponse {
        success: true,
        user: user.profile(),
    }))
}

/// Rename the caller. A fresh token is returned since tokens carry the username.
#[utoipa::path(
    put,
    path = "/api/settings/username",
    tag = "Settings",
    request_body = ChangeUsernameRequest,
    responses(
        (status = 200, body = AuthResponse),
        (status = 400, body = ErrorBody),
        (status = 409, body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_username(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(body): ApiJson<ChangeUsernameRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let username = body.validate()?;
    let user = state
        .db
        .users
        .update_username(caller.user_id, &username)
        .await?;

    info!(
        subsystem = "auth",
        op = "change_username",
        user_id = %user.id,
        previous = %caller.username,
        "Username changed"
    );
    Ok(Json(auth_response(&state, &user)?))
}

/// Change the caller's password after verifying the current one.
///
/// # Returns
/// - 200 on success
/// - 400 when the new password is too short
/// - 401 when the current password does not match
#[utoipa::path(
    put,
    path = "/api/settings/password",
    tag = "Settings",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_password(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(body): ApiJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    body.validate()?;
    let user = current_user(&state, caller.user_id).await?;

    if !verify_password_blocking(body.current_password, user.password_hash).await? {
        warn!(
            subsystem = "auth",
            op = "change_password",
            user_id = %user.id,
            "Wrong current password"
        );
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let password_hash = hash_password_blocking(body.new_password).await?;
    state
        .db
        .users
        .update_password_hash(user.id, &password_hash)
        .await?;

    info!(subsystem = "auth", op = "change_password", user_id = %user.id, "Password changed");
    Ok(Json(MessageResponse::new("Password updated")))
}
