/// JWT token generation and validation module
///
/// This module provides JWT functionality for operator authentication.
/// Tokens are signed using HS256 (HMAC-SHA256) and carry the operator's
/// identity and role, so authorization checks never need a database
/// round-trip.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: 24 hours for access tokens, 30 days for refresh tokens
/// - **Validation**: Signature, expiration, and issuer checks
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits)
///
/// # Example
///
/// ```
/// use bartab_shared::auth::jwt::{create_token, validate_token, Claims, TokenType};
/// use bartab_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
///
/// let claims = Claims::new(user_id, "anna".to_string(), UserRole::Worker, TokenType::Access);
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let validated = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated.sub, user_id);
/// assert_eq!(validated.role, UserRole::Worker);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// Token issuer claim
const ISSUER: &str = "bartab";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid token issuer")]
    InvalidIssuer,
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token (short-lived, 24 hours)
    Access,

    /// Refresh token (long-lived, 30 days)
    Refresh,
}

impl TokenType {
    /// Gets default expiration duration for token type
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::Refresh => Duration::days(30),
        }
    }

    /// Gets token type as string
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT claims structure
///
/// Standard claims (`sub`, `iss`, `iat`, `exp`, `nbf`) plus the BarTab
/// identity claims: the operator's username and role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Issuer - always "bartab"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Operator username (custom claim)
    pub username: String,

    /// Operator role (custom claim)
    pub role: UserRole,

    /// Token type (custom claim)
    pub token_type: TokenType,
}

impl Claims {
    /// Creates new claims with the default expiration for the token type
    pub fn new(user_id: Uuid, username: String, role: UserRole, token_type: TokenType) -> Self {
        Self::with_expiration(
            user_id,
            username,
            role,
            token_type,
            token_type.default_expiration(),
        )
    }

    /// Creates claims with a custom expiration
    pub fn with_expiration(
        user_id: Uuid,
        username: String,
        role: UserRole,
        token_type: TokenType,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            username,
            role,
            token_type,
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 with the provided secret.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token creation fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies the signature, expiration, not-before time, and issuer.
///
/// # Errors
///
/// - `JwtError::Expired` if the token has expired
/// - `JwtError::InvalidIssuer` if the issuer doesn't match
/// - `JwtError::ValidationError` for any other failure
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Validates a token and checks it's an access token
///
/// Convenience wrapper around [`validate_token`] that also ensures the
/// token type is `Access`.
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Access {
        return Err(JwtError::ValidationError(
            "Expected access token, got refresh token".to_string(),
        ));
    }

    Ok(claims)
}

/// Validates a token and checks it's a refresh token
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Refresh {
        return Err(JwtError::ValidationError(
            "Expected refresh token, got access token".to_string(),
        ));
    }

    Ok(claims)
}

/// Exchanges a valid refresh token for a new access token
///
/// The new access token carries the same identity and role as the refresh
/// token it came from.
pub fn refresh_access_token(refresh_token: &str, secret: &str) -> Result<String, JwtError> {
    let claims = validate_refresh_token(refresh_token, secret)?;

    let access_claims = Claims::new(
        claims.sub,
        claims.username,
        claims.role,
        TokenType::Access,
    );

    create_token(&access_claims, secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn make_claims(role: UserRole, token_type: TokenType) -> Claims {
        Claims::new(Uuid::new_v4(), "anna".to_string(), role, token_type)
    }

    #[test]
    fn test_create_and_validate_token() {
        let claims = make_claims(UserRole::Worker, TokenType::Access);
        let token = create_token(&claims, SECRET).expect("Token creation should succeed");

        let validated = validate_token(&token, SECRET).expect("Validation should succeed");
        assert_eq!(validated.sub, claims.sub);
        assert_eq!(validated.username, "anna");
        assert_eq!(validated.role, UserRole::Worker);
        assert_eq!(validated.iss, "bartab");
        assert_eq!(validated.token_type, TokenType::Access);
    }

    #[test]
    fn test_validate_rejects_wrong_secret() {
        let claims = make_claims(UserRole::Worker, TokenType::Access);
        let token = create_token(&claims, SECRET).expect("Token creation should succeed");

        let result = validate_token(&token, "a-completely-different-secret-key!!");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_expired_token() {
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            "anna".to_string(),
            UserRole::Worker,
            TokenType::Access,
            Duration::seconds(-120),
        );
        let token = create_token(&claims, SECRET).expect("Token creation should succeed");

        assert!(claims.is_expired());

        let result = validate_token(&token, SECRET);
        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_token_type_strings() {
        assert_eq!(TokenType::Access.as_str(), "access");
        assert_eq!(TokenType::Refresh.as_str(), "refresh");
        assert!(TokenType::Refresh.default_expiration() > TokenType::Access.default_expiration());
    }

    #[test]
    fn test_access_validation_rejects_refresh_token() {
        let claims = make_claims(UserRole::Worker, TokenType::Refresh);
        let token = create_token(&claims, SECRET).expect("Token creation should succeed");

        assert!(validate_access_token(&token, SECRET).is_err());
        assert!(validate_refresh_token(&token, SECRET).is_ok());
    }

    #[test]
    fn test_refresh_access_token_preserves_identity() {
        let claims = make_claims(UserRole::Superuser, TokenType::Refresh);
        let refresh = create_token(&claims, SECRET).expect("Token creation should succeed");

        let access = refresh_access_token(&refresh, SECRET).expect("Refresh should succeed");
        let validated = validate_access_token(&access, SECRET).expect("Validation should succeed");

        assert_eq!(validated.sub, claims.sub);
        assert_eq!(validated.username, claims.username);
        assert_eq!(validated.role, UserRole::Superuser);
    }

    #[test]
    fn test_refresh_rejects_access_token() {
        let claims = make_claims(UserRole::Worker, TokenType::Access);
        let token = create_token(&claims, SECRET).expect("Token creation should succeed");

        assert!(refresh_access_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_role_is_carried_in_claims() {
        let claims = make_claims(UserRole::Superuser, TokenType::Access);
        let token = create_token(&claims, SECRET).expect("Token creation should succeed");

        let validated = validate_token(&token, SECRET).expect("Validation should succeed");
        assert!(validated.role.can_manage_users());
    }
}
