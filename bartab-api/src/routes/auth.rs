/// Authentication endpoints
///
/// - `POST /api/auth/login` - Exchange credentials for a token pair
/// - `POST /api/auth/refresh` - Exchange a refresh token for a new access token
///
/// There is no self-service registration: operator accounts are
/// provisioned by a superuser through the users endpoints (or the
/// seed-admin binary).

use crate::{
    app::AppState,
    error::{ApiError, ApiJson, ApiResult},
    routes::users::PublicUser,
};
use axum::{extract::State, Json};
use bartab_shared::{
    auth::{jwt, password},
    models::user::User,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username (case-insensitive)
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Access token (24h)
    pub token: String,

    /// Refresh token (30d)
    pub refresh_token: String,

    /// The authenticated operator
    pub user: PublicUser,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub token: String,
}

/// Login endpoint
///
/// Authenticates an operator and returns a JWT token pair. The access
/// token carries the operator's role, so no further lookups are needed on
/// protected calls.
///
/// # Errors
///
/// - `400 Bad Request`: Missing username or password
/// - `401 Unauthorized`: Invalid credentials (same message for unknown
///   username and wrong password)
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(|| {
            warn!(username = %req.username, "login with unknown username");
            ApiError::Unauthorized("Invalid username or password".to_string())
        })?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        warn!(username = %user.username, "login with wrong password");
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let access_claims = jwt::Claims::new(
        user.id,
        user.username.clone(),
        user.role,
        jwt::TokenType::Access,
    );
    let refresh_claims = jwt::Claims::new(
        user.id,
        user.username.clone(),
        user.role,
        jwt::TokenType::Refresh,
    );

    let token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    info!(user_id = %user.id, username = %user.username, "operator logged in");

    Ok(Json(LoginResponse {
        token,
        refresh_token,
        user: PublicUser::from(user),
    }))
}

/// Token refresh endpoint
///
/// Exchanges a valid refresh token for a new access token.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid or expired refresh token
pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { token }))
}
