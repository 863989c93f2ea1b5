/// Authorization helpers and permission checks
///
/// This module provides role-based access control over the authenticated
/// [`AuthContext`]. The operator's role travels inside the token, so every
/// check here is pure; there is no database lookup between "who are you"
/// and "may you do this".
///
/// # Permission Model
///
/// Two roles, strictly ordered: `superuser > worker`. Every protected
/// operation declares its minimum role. Missing or invalid credentials are
/// an authentication failure (401, handled by the middleware); a valid
/// identity below the required role is an authorization failure (403,
/// handled here).
///
/// # Example
///
/// ```
/// use bartab_shared::auth::authorization::require_role;
/// use bartab_shared::auth::middleware::AuthContext;
/// use bartab_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// let auth = AuthContext::from_claims(Uuid::new_v4(), "anna".to_string(), UserRole::Worker);
///
/// assert!(require_role(&auth, UserRole::Worker).is_ok());
/// assert!(require_role(&auth, UserRole::Superuser).is_err());
/// ```

use super::middleware::AuthContext;
use crate::models::user::UserRole;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller's role is below the operation's minimum
    #[error("Insufficient permissions: requires {required:?}, has {actual:?}")]
    InsufficientRole {
        required: UserRole,
        actual: UserRole,
    },
}

/// Checks that the caller holds at least the required role
///
/// # Errors
///
/// Returns `AuthzError::InsufficientRole` when the caller's role is below
/// `required`
pub fn require_role(auth: &AuthContext, required: UserRole) -> Result<(), AuthzError> {
    if !auth.role.has_permission(&required) {
        return Err(AuthzError::InsufficientRole {
            required,
            actual: auth.role,
        });
    }

    Ok(())
}

/// Checks that the caller may manage customers (superuser only)
pub fn require_customer_management(auth: &AuthContext) -> Result<(), AuthzError> {
    require_role(auth, UserRole::Superuser)
}

/// Checks that the caller may manage the drink catalog (superuser only)
pub fn require_catalog_management(auth: &AuthContext) -> Result<(), AuthzError> {
    require_role(auth, UserRole::Superuser)
}

/// Checks that the caller may manage operator accounts (superuser only)
pub fn require_user_management(auth: &AuthContext) -> Result<(), AuthzError> {
    require_role(auth, UserRole::Superuser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn context(role: UserRole) -> AuthContext {
        AuthContext::from_claims(Uuid::new_v4(), "anna".to_string(), role)
    }

    #[test]
    fn test_require_role_hierarchy() {
        let worker = context(UserRole::Worker);
        let superuser = context(UserRole::Superuser);

        assert!(require_role(&worker, UserRole::Worker).is_ok());
        assert!(require_role(&worker, UserRole::Superuser).is_err());
        assert!(require_role(&superuser, UserRole::Worker).is_ok());
        assert!(require_role(&superuser, UserRole::Superuser).is_ok());
    }

    #[test]
    fn test_management_checks_are_superuser_only() {
        let worker = context(UserRole::Worker);
        let superuser = context(UserRole::Superuser);

        assert!(require_customer_management(&worker).is_err());
        assert!(require_catalog_management(&worker).is_err());
        assert!(require_user_management(&worker).is_err());

        assert!(require_customer_management(&superuser).is_ok());
        assert!(require_catalog_management(&superuser).is_ok());
        assert!(require_user_management(&superuser).is_ok());
    }

    #[test]
    fn test_authz_error_display() {
        let err = AuthzError::InsufficientRole {
            required: UserRole::Superuser,
            actual: UserRole::Worker,
        };
        assert!(err.to_string().contains("Insufficient permissions"));
    }
}
