/// Authentication and authorization utilities
///
/// This module provides the secure authentication primitives for BarTab:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and validation
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: Axum middleware extracting an [`middleware::AuthContext`]
/// - [`authorization`]: Role checks over the authenticated context
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing with configurable expiration
/// - **Constant-time Comparison**: Verification uses constant-time operations
///
/// # Example
///
/// ```
/// use bartab_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("operator_password")?;
/// assert!(verify_password("operator_password", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
