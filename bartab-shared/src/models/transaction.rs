/// Transaction model and database operations
///
/// Transactions are the monetary events of the ledger: a signed amount
/// against one customer, with a free-text label and the operator who
/// recorded it. Negative amounts are charges (drinks), positive amounts
/// are payments.
///
/// The log is write-once, read-many: rows are created by the ledger
/// update protocol and deleted only as part of a customer cascade. There
/// is deliberately no update operation in this module; a correction is a
/// new offsetting transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// One ledger event
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    /// Unique transaction ID (UUID v4)
    pub id: Uuid,

    /// Owning customer (immutable after creation)
    pub customer_id: Uuid,

    /// Denormalized description: a drink name, payment method, or free text
    pub label: String,

    /// Signed amount: negative = charge, positive = payment
    pub amount: Decimal,

    /// Username of the operator who recorded the event
    pub actor: String,

    /// When the event was recorded
    pub created_at: DateTime<Utc>,
}

/// A transaction joined with its customer, for populated listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TransactionWithCustomer {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub label: String,
    pub amount: Decimal,
    pub actor: String,
    pub created_at: DateTime<Utc>,

    /// Name of the owning customer
    pub customer_name: String,

    /// Current balance of the owning customer
    pub customer_balance: Decimal,
}

impl Transaction {
    /// Lists all transactions, newest first, with their customer populated
    pub async fn list_newest_first(
        pool: &PgPool,
    ) -> Result<Vec<TransactionWithCustomer>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TransactionWithCustomer>(
            r#"
            SELECT t.id, t.customer_id, t.label, t.amount, t.actor, t.created_at,
                   c.name AS customer_name, c.balance AS customer_balance
            FROM transactions t
            JOIN customers c ON c.id = t.customer_id
            ORDER BY t.created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Lists one customer's transactions, oldest first
    ///
    /// Oldest-first is the natural receipt order: the aggregator preserves
    /// this order for payment lines.
    pub async fn list_for_customer(
        pool: &PgPool,
        customer_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, customer_id, label, amount, actor, created_at
            FROM transactions
            WHERE customer_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(customer_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Deletes all transactions belonging to a customer
    ///
    /// Only valid as the first step of a customer cascade delete
    /// ([`crate::models::customer::Customer::delete_cascade`]).
    ///
    /// # Returns
    ///
    /// Number of rows removed
    pub async fn delete_by_customer(pool: &PgPool, customer_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM transactions WHERE customer_id = $1")
            .bind(customer_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
