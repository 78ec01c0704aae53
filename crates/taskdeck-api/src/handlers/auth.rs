//! Registration, login and the current-user profile.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use taskdeck_db::{
    LoginIdentifier, LoginRequest, NewUser, RegisterRequest, User, UserProfile, UserRepository,
};

use crate::auth::{hash_password_blocking, verify_password_blocking, AuthUser};
use crate::error::{ApiJson, ErrorBody};
use crate::{ApiError, AppState};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: UserProfile,
}

/// Load the caller's account; a token for a deleted account is no longer valid.
pub(crate) async fn current_user(state: &AppState, user_id: Uuid) -> Result<User, ApiError> {
    state
        .db
        .users
        .get(user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Account no longer exists".to_string()))
}

pub(crate) fn auth_response(state: &AppState, user: &User) -> Result<AuthResponse, ApiError> {
    Ok(AuthResponse {
        success: true,
        token: state.jwt.issue(user)?,
        user: user.profile(),
    })
}

/// Create an account and sign the caller in.
///
/// # Returns
/// - 201 with a token and the new profile
/// - 400 when email, username or password are malformed
/// - 409 when the email or username is taken
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, body = AuthResponse),
        (status = 400, body = ErrorBody),
        (status = 409, body = ErrorBody),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let registration = body.validate()?;
    let password_hash = hash_password_blocking(registration.password).await?;

    let user = state
        .db
        .users
        .insert(NewUser {
            email: registration.email,
            username: registration.username,
            password_hash,
        })
        .await?;

    info!(subsystem = "auth", op = "register", user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(auth_response(&state, &user)?)))
}

/// Exchange email (or username) and password for a token.
///
/// Unknown accounts and wrong passwords get the same 401 response.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, body = AuthResponse),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let found = match body.identifier()? {
        LoginIdentifier::Email(email) => state.db.users.find_by_email(&email).await?,
        LoginIdentifier::Username(username) => state.db.users.find_by_username(&username).await?,
    };

    let Some(user) = found else {
        warn!(subsystem = "auth", op = "login", "Login for unknown account");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };
    if !verify_password_blocking(body.password, user.password_hash.clone()).await? {
        warn!(subsystem = "auth", op = "login", user_id = %user.id, "Wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    info!(subsystem = "auth", op = "login", user_id = %user.id, "User logged in");
    Ok(Json(auth_response(&state, &user)?))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, body = ProfileResponse),
        (status = 401, body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = current_user(&state, caller.user_id).await?;
    Ok(Json(ProfileResponse {
        success: true,
        user: user.profile(),
    }))
}
