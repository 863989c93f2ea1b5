/// Database models for BarTab
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Operator accounts with role-based access
/// - `customer`: Tab customers and their running balances
/// - `drink`: The purchasable drink catalog
/// - `transaction`: Write-once monetary events against a customer's tab
///
/// # Example
///
/// ```no_run
/// use bartab_shared::models::user::{CreateUser, User, UserRole};
/// use bartab_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     username: "anna".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::Worker,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod customer;
pub mod drink;
pub mod transaction;
pub mod user;
