/// Operator account endpoints
///
/// - `GET /api/users` - List operators (any authenticated role)
/// - `POST /api/users` - Create an operator (superuser only)
/// - `DELETE /api/users/:id` - Delete an operator (superuser only)
///
/// Responses never include the password hash. Superuser accounts cannot
/// be deleted through the deletion endpoint, no matter who asks.

use crate::{
    app::AppState,
    error::{ApiError, ApiJson, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use bartab_shared::{
    auth::{
        authorization::require_user_management,
        middleware::AuthContext,
        password::{hash_password, validate_password_strength},
    },
    models::user::{CreateUser, User, UserRole},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// An operator as exposed over the API (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Create operator request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Username (stored lowercase)
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,

    /// Password (strength-checked)
    pub password: String,

    /// Role to assign; defaults to worker
    #[serde(default = "default_role")]
    pub role: UserRole,
}

fn default_role() -> UserRole {
    UserRole::Worker
}

/// Lists all operators, ordered by username
pub async fn list_users(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<PublicUser>>> {
    let users = User::list(&state.db).await?;

    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

/// Creates an operator account (superuser only)
///
/// # Errors
///
/// - `400 Bad Request`: Weak password or invalid username
/// - `403 Forbidden`: Caller is not a superuser
/// - `409 Conflict`: Username already taken
pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<PublicUser>)> {
    require_user_management(&auth)?;

    req.validate()?;

    validate_password_strength(&req.password).map_err(ApiError::BadRequest)?;

    // Friendly 409 before the insert; the unique constraint is the backstop
    if User::find_by_username(&state.db, &req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let password_hash = hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            password_hash,
            role: req.role,
        },
    )
    .await?;

    info!(
        user_id = %user.id,
        username = %user.username,
        role = user.role.as_str(),
        created_by = %auth.username,
        "operator created"
    );

    Ok((StatusCode::CREATED, Json(PublicUser::from(user))))
}

/// Deletes an operator account (superuser only)
///
/// Superuser accounts are never deletable through this endpoint.
///
/// # Errors
///
/// - `400 Bad Request`: Target is a superuser
/// - `403 Forbidden`: Caller is not a superuser
/// - `404 Not Found`: No such operator
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    require_user_management(&auth)?;

    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if user.role == UserRole::Superuser {
        return Err(ApiError::BadRequest(
            "Cannot delete a superuser account".to_string(),
        ));
    }

    User::delete(&state.db, id).await?;

    info!(user_id = %id, deleted_by = %auth.username, "operator deleted");

    Ok(Json(serde_json::json!({ "message": "User deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_user_has_no_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            username: "anna".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: UserRole::Worker,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(PublicUser::from(user)).unwrap();

        assert_eq!(json["username"], "anna");
        assert_eq!(json["role"], "worker");
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("argon2id"));
    }

    #[test]
    fn test_create_user_role_defaults_to_worker() {
        let req: CreateUserRequest =
            serde_json::from_str(r#"{"username": "bob", "password": "Secret1!"}"#).unwrap();

        assert_eq!(req.role, UserRole::Worker);
    }
}
