/// Authentication middleware for Axum
///
/// This module provides middleware for JWT authentication. It extracts the
/// Bearer token from the request, validates it, and adds an [`AuthContext`]
/// to the request extensions for handlers to consume.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use bartab_shared::auth::middleware::{create_jwt_middleware, AuthContext};
///
/// async fn protected(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}!", auth.username)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected))
///     .layer(middleware::from_fn(create_jwt_middleware("your-jwt-secret")));
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::jwt::{validate_access_token, JwtError};
use crate::models::user::UserRole;

/// Authentication context added to request extensions
///
/// Handlers extract it with Axum's `Extension` extractor. The role comes
/// straight from the validated token, so role checks are pure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated operator's user ID
    pub user_id: Uuid,

    /// Authenticated operator's username
    pub username: String,

    /// Authenticated operator's role
    pub role: UserRole,
}

impl AuthContext {
    /// Creates auth context from validated JWT claims
    pub fn from_claims(user_id: Uuid, username: String, role: UserRole) -> Self {
        Self {
            user_id,
            username,
            role,
        }
    }
}

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Invalid authorization header format
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            AuthError::MissingCredentials => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Missing credentials".to_string(),
            ),
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
        };

        let body = Json(json!({
            "error": error_code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// JWT authentication middleware
///
/// Validates the token from the `Authorization: Bearer <token>` header.
///
/// # Errors
///
/// - 401 Unauthorized if the header is missing, or the token is invalid or
///   expired
/// - 400 Bad Request if the header is not a Bearer scheme
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_access_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    let auth_context = AuthContext::from_claims(claims.sub, claims.username, claims.role);
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

/// Creates a JWT authentication middleware closure
///
/// Helper that captures the JWT secret and returns a middleware function
/// for `axum::middleware::from_fn`.
pub fn create_jwt_middleware(
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>,
> + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_context_from_claims() {
        let user_id = Uuid::new_v4();

        let context = AuthContext::from_claims(user_id, "anna".to_string(), UserRole::Worker);

        assert_eq!(context.user_id, user_id);
        assert_eq!(context.username, "anna");
        assert_eq!(context.role, UserRole::Worker);
    }

    #[test]
    fn test_auth_error_into_response() {
        let err = AuthError::MissingCredentials;
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let err = AuthError::InvalidFormat("test".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let err = AuthError::InvalidToken("test".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
