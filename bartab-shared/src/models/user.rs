/// User model and database operations
///
/// This module provides the User model and CRUD operations for managing
/// operator accounts. Every operator has exactly one role; the role is
/// embedded in issued tokens, so permission checks never need a lookup.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('superuser', 'worker');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username TEXT NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'worker',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Roles
///
/// - **superuser**: Manage customers, the drink catalog, and operator accounts
/// - **worker**: Read everything, record transactions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Operator roles
///
/// Hierarchy: Superuser > Worker. A superuser can do everything a worker
/// can, plus account, customer, and catalog management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full control: manage customers, drinks, and operator accounts
    Superuser,

    /// Day-to-day operation: record transactions, read entities
    Worker,
}

impl UserRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Superuser => "superuser",
            UserRole::Worker => "worker",
        }
    }

    /// Can create, rename, and delete customers
    pub fn can_manage_customers(&self) -> bool {
        matches!(self, UserRole::Superuser)
    }

    /// Can manage the drink catalog
    pub fn can_manage_catalog(&self) -> bool {
        matches!(self, UserRole::Superuser)
    }

    /// Can create and delete operator accounts
    pub fn can_manage_users(&self) -> bool {
        matches!(self, UserRole::Superuser)
    }

    /// Can record transactions against a tab
    pub fn can_record_transactions(&self) -> bool {
        true
    }

    /// Checks if this role meets the required permission level
    ///
    /// Hierarchy: Superuser > Worker
    pub fn has_permission(&self, required: &UserRole) -> bool {
        self.permission_level() >= required.permission_level()
    }

    /// Returns numeric permission level for comparison
    fn permission_level(&self) -> u8 {
        match self {
            UserRole::Superuser => 2,
            UserRole::Worker => 1,
        }
    }
}

/// User model representing an operator account
///
/// Passwords are stored as Argon2id hashes, never in plaintext. Usernames
/// are stored lowercase so lookups are case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Username (unique, stored lowercase)
    pub username: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Operator role
    pub role: UserRole,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Username (will be stored lowercase)
    pub username: String,

    /// Argon2id password hash (NOT a plaintext password!)
    pub password_hash: String,

    /// Role to assign
    pub role: UserRole,
}

impl User {
    /// Creates a new user in the database
    ///
    /// The username is case-folded before insertion so that `Anna` and
    /// `anna` refer to the same account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Username already exists (unique constraint violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(data.username.trim().to_lowercase())
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username (case-insensitive)
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.trim().to_lowercase())
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Updates a user's password hash
    ///
    /// # Returns
    ///
    /// True if the user was found and updated, false otherwise
    pub async fn update_password(
        pool: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Updates a user's role
    ///
    /// # Returns
    ///
    /// True if the user was found and updated, false otherwise
    pub async fn update_role(pool: &PgPool, id: Uuid, role: UserRole) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET role = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(role)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a user by ID
    ///
    /// The superuser-protection rule (a superuser account is never deletable
    /// through the standard deletion operation) is enforced by the API layer
    /// before this is called.
    ///
    /// # Returns
    ///
    /// True if the user was deleted, false if the user didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all users, ordered by username
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, created_at, updated_at
            FROM users
            ORDER BY username ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hierarchy() {
        assert!(UserRole::Superuser.has_permission(&UserRole::Worker));
        assert!(UserRole::Superuser.has_permission(&UserRole::Superuser));
        assert!(UserRole::Worker.has_permission(&UserRole::Worker));
        assert!(!UserRole::Worker.has_permission(&UserRole::Superuser));
    }

    #[test]
    fn test_role_capabilities() {
        assert!(UserRole::Superuser.can_manage_customers());
        assert!(UserRole::Superuser.can_manage_catalog());
        assert!(UserRole::Superuser.can_manage_users());
        assert!(UserRole::Superuser.can_record_transactions());

        assert!(!UserRole::Worker.can_manage_customers());
        assert!(!UserRole::Worker.can_manage_catalog());
        assert!(!UserRole::Worker.can_manage_users());
        assert!(UserRole::Worker.can_record_transactions());
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&UserRole::Superuser).unwrap(),
            "\"superuser\""
        );
        assert_eq!(
            serde_json::from_str::<UserRole>("\"worker\"").unwrap(),
            UserRole::Worker
        );
    }

    #[test]
    fn test_create_user_struct() {
        let create_user = CreateUser {
            username: "anna".to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::Worker,
        };

        assert_eq!(create_user.username, "anna");
        assert_eq!(create_user.role, UserRole::Worker);
    }

    // Database CRUD paths require a running PostgreSQL instance
}
