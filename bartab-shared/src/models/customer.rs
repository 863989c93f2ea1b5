/// Customer model and database operations
///
/// A customer is a tab holder: a name plus a running balance. The balance
/// is negative while the customer owes money and moves toward zero as
/// payments come in.
///
/// The balance column is only ever written by the ledger update protocol
/// (`ledger::protocol`) and by the explicit reconciliation routine
/// [`Customer::recompute_balance`]. Everything else treats it as read-only.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE customers (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name TEXT NOT NULL UNIQUE,
///     balance NUMERIC(12, 2) NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::transaction::Transaction;

/// Customer model representing one tab
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    /// Unique customer ID (UUID v4)
    pub id: Uuid,

    /// Display name (unique)
    pub name: String,

    /// Running balance: sum of all transaction amounts for this customer.
    /// Negative = owes money, positive = credit.
    pub balance: Decimal,

    /// When the customer was created
    pub created_at: DateTime<Utc>,

    /// When the customer was last updated
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Creates a new customer with a zero balance
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Name already exists (unique constraint violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, name: &str) -> Result<Self, sqlx::Error> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, balance)
            VALUES ($1, 0)
            RETURNING id, name, balance, created_at, updated_at
            "#,
        )
        .bind(name.trim())
        .fetch_one(pool)
        .await?;

        Ok(customer)
    }

    /// Finds a customer by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, balance, created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(customer)
    }

    /// Finds a customer by exact name
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, balance, created_at, updated_at
            FROM customers
            WHERE name = $1
            "#,
        )
        .bind(name.trim())
        .fetch_optional(pool)
        .await?;

        Ok(customer)
    }

    /// Lists all customers, ordered by name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, balance, created_at, updated_at
            FROM customers
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(customers)
    }

    /// Renames a customer
    ///
    /// # Returns
    ///
    /// The updated customer if found, None otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if the new name is already taken
    pub async fn rename(
        pool: &PgPool,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, balance, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name.trim())
        .fetch_optional(pool)
        .await?;

        Ok(customer)
    }

    /// Deletes a customer and all of its transactions
    ///
    /// Transactions are deleted first, then the customer row. If the
    /// process dies between the two statements the result is an orphaned
    /// customer with no history, never a balance with no explanatory
    /// transactions. The RESTRICT foreign key enforces this order.
    ///
    /// # Returns
    ///
    /// True if the customer existed and was deleted
    pub async fn delete_cascade(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let removed = Transaction::delete_by_customer(pool, id).await?;

        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(customer_id = %id, transactions_removed = removed, "customer deleted");
        }

        Ok(deleted)
    }

    /// Recomputes a customer's balance from the transaction log
    ///
    /// This is the reconciliation routine: the stored balance is replaced
    /// with the sum of all transaction amounts for the customer. It is
    /// never run automatically; an operator invokes it when the stored
    /// balance is suspected stale (e.g. after a crash between a ledger
    /// write and its balance update on a store without transactions).
    ///
    /// # Returns
    ///
    /// The recomputed balance if the customer exists, None otherwise
    pub async fn recompute_balance(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<Decimal>, sqlx::Error> {
        let balance = sqlx::query_scalar::<_, Decimal>(
            r#"
            UPDATE customers
            SET balance = (
                SELECT COALESCE(SUM(amount), 0)
                FROM transactions
                WHERE customer_id = $1
            ),
            updated_at = NOW()
            WHERE id = $1
            RETURNING balance
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        if let Some(balance) = &balance {
            info!(customer_id = %id, %balance, "balance reconciled from transaction log");
        }

        Ok(balance)
    }
}
