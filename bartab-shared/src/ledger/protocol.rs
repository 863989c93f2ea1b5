/// The ledger update protocol
///
/// A recorded transaction has two effects that must be observed together:
/// the new row in the transaction log and the balance adjustment on the
/// owning customer. Both run inside one database transaction here, so no
/// reader ever sees one without the other.
///
/// The balance adjustment is the store's atomic increment
/// (`balance = balance + $amount`), never an application-level
/// read-modify-write. Increments commute, so concurrent recordings against
/// the same customer converge to the correct sum in any interleaving.
///
/// Transactions are never edited or reversed in place. A correction is a
/// new offsetting transaction.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::transaction::Transaction;

/// Error type for ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The referenced customer does not exist
    #[error("Customer not found")]
    CustomerNotFound(Uuid),

    /// The amount is missing, non-numeric, or not finite
    #[error("A numeric amount is required")]
    InvalidAmount,

    /// Storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// The canonical internal record for a new ledger event
///
/// Both external request encodings normalize into this before anything is
/// persisted.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Owning customer
    pub customer_id: Uuid,

    /// Signed amount: negative = charge, positive = payment
    pub amount: Decimal,

    /// Optional description; defaulted by amount sign when absent
    pub label: Option<String>,

    /// Operator recording the event
    pub actor: String,
}

/// Parses a raw JSON value into a ledger amount
///
/// Accepts JSON numbers and numeric strings (legacy clients send both).
/// Anything else, including non-finite floats, is [`LedgerError::InvalidAmount`].
/// The result is rounded to cents so the in-memory value matches what the
/// NUMERIC(12,2) column will store.
pub fn parse_amount(raw: &Value) -> Result<Decimal, LedgerError> {
    let amount = match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Decimal::from(i)
            } else if let Some(f) = n.as_f64() {
                Decimal::from_f64(f).ok_or(LedgerError::InvalidAmount)?
            } else {
                return Err(LedgerError::InvalidAmount);
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<Decimal>()
            .map_err(|_| LedgerError::InvalidAmount)?,
        _ => return Err(LedgerError::InvalidAmount),
    };

    Ok(amount.round_dp(2))
}

/// Default label for an unlabelled event, chosen by amount sign
pub fn default_label(amount: Decimal) -> &'static str {
    if amount < Decimal::ZERO {
        "Drink"
    } else {
        "Payment"
    }
}

/// Records a transaction and adjusts the customer's balance
///
/// Within one database transaction:
///
/// 1. `UPDATE customers SET balance = balance + $amount`, the atomic
///    increment. Zero rows affected means the customer does not exist;
///    nothing is committed and [`LedgerError::CustomerNotFound`] is
///    returned, so a transaction never references a missing customer.
/// 2. The event row is inserted into the log.
///
/// The commit makes both effects visible together. Any failure after
/// validation is returned to the caller; nothing is silently dropped.
///
/// # Errors
///
/// - [`LedgerError::CustomerNotFound`] if the customer id resolves to nothing
/// - [`LedgerError::Storage`] on any database failure
pub async fn record_transaction(
    pool: &PgPool,
    new: NewTransaction,
) -> Result<Transaction, LedgerError> {
    let label = match new.label.as_deref().map(str::trim) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => default_label(new.amount).to_string(),
    };

    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE customers
        SET balance = balance + $1, updated_at = NOW()
        WHERE id = $2
        "#,
    )
    .bind(new.amount)
    .bind(new.customer_id)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        // Dropping the open transaction rolls the increment back
        return Err(LedgerError::CustomerNotFound(new.customer_id));
    }

    let recorded = sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (customer_id, label, amount, actor)
        VALUES ($1, $2, $3, $4)
        RETURNING id, customer_id, label, amount, actor, created_at
        "#,
    )
    .bind(new.customer_id)
    .bind(&label)
    .bind(new.amount)
    .bind(&new.actor)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        transaction_id = %recorded.id,
        customer_id = %recorded.customer_id,
        amount = %recorded.amount,
        actor = %recorded.actor,
        "transaction recorded"
    );

    Ok(recorded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_amount_integer() {
        assert_eq!(parse_amount(&json!(-5)).unwrap(), dec!(-5));
        assert_eq!(parse_amount(&json!(7)).unwrap(), dec!(7));
        assert_eq!(parse_amount(&json!(0)).unwrap(), dec!(0));
    }

    #[test]
    fn test_parse_amount_float_rounds_to_cents() {
        assert_eq!(parse_amount(&json!(-4.5)).unwrap(), dec!(-4.5));
        assert_eq!(parse_amount(&json!(2.345)).unwrap(), dec!(2.34));
        assert_eq!(parse_amount(&json!(2.355)).unwrap(), dec!(2.36));
    }

    #[test]
    fn test_parse_amount_numeric_string() {
        // Legacy clients coerce with Number(...), so numeric strings pass
        assert_eq!(parse_amount(&json!("-5")).unwrap(), dec!(-5));
        assert_eq!(parse_amount(&json!(" 7.50 ")).unwrap(), dec!(7.50));
    }

    #[test]
    fn test_parse_amount_rejects_non_numeric() {
        assert!(matches!(
            parse_amount(&json!("five")),
            Err(LedgerError::InvalidAmount)
        ));
        assert!(matches!(
            parse_amount(&json!(null)),
            Err(LedgerError::InvalidAmount)
        ));
        assert!(matches!(
            parse_amount(&json!(true)),
            Err(LedgerError::InvalidAmount)
        ));
        assert!(matches!(
            parse_amount(&json!([1])),
            Err(LedgerError::InvalidAmount)
        ));
    }

    #[test]
    fn test_default_label_by_sign() {
        assert_eq!(default_label(dec!(-5)), "Drink");
        assert_eq!(default_label(dec!(7)), "Payment");
        // Zero is not a charge
        assert_eq!(default_label(dec!(0)), "Payment");
    }

    // record_transaction paths require a running PostgreSQL instance
}
