//! Authentication route handlers
//!
//! Provides register, login, refresh, and current-user endpoints.

use crate::auth::{create_tokens, refresh_tokens, verify_password, Claims};
use crate::error::{validation_failure, ApiResult, AppError};
use crate::models::{
    ApiResponse, AuthResult, LoginRequest, RefreshRequest, RegisterRequest, UserDto,
};
use crate::state::SharedState;
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use validator::Validate;

/// POST /api/auth/register
pub async fn register(
    State(state): State<SharedState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<ApiResponse<AuthResult>> {
    payload.validate().map_err(|e| validation_failure(&e))?;

    if !state.users.is_unique_user(&payload.username).await? {
        return Err(AppError::Validation(vec![
            "Username already registered.".to_string(),
        ]));
    }

    let role = payload.role.unwrap_or_default();
    let user = state
        .users
        .register(&payload.username, &payload.name, &payload.password, role)
        .await?;
    info!("User registered: {} ({})", user.username, user.role);

    let tokens = create_tokens(&state.jwt_secret, user.id, &user.username, user.role)?;

    Ok(ApiResponse::ok(
        StatusCode::CREATED,
        AuthResult {
            user: UserDto::from(user),
            tokens,
        },
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<ApiResponse<AuthResult>> {
    let user = state
        .users
        .find_by_username(&payload.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let tokens = create_tokens(&state.jwt_secret, user.id, &user.username, user.role)?;
    info!("User logged in: {}", user.username);

    Ok(ApiResponse::ok(
        StatusCode::OK,
        AuthResult {
            user: UserDto::from(user),
            tokens,
        },
    ))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<SharedState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<ApiResponse<crate::auth::TokenPair>> {
    let tokens = refresh_tokens(&state.jwt_secret, &payload.refresh_token)?;
    Ok(ApiResponse::ok(StatusCode::OK, tokens))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<ApiResponse<UserDto>> {
    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User no longer exists".to_string()))?;

    Ok(ApiResponse::ok(StatusCode::OK, UserDto::from(user)))
}
