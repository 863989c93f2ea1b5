/// Transaction endpoints
///
/// - `GET /api/transactions` - All transactions, newest first, customer populated
/// - `GET /api/transactions/customer/:id` - One customer's history, oldest first
/// - `POST /api/transactions` - Record a transaction (any authenticated role)
///
/// Recording accepts two body encodings:
///
/// - canonical: `{"customerId": ..., "amount": ..., "description": ...}`
/// - legacy: `{"customer": ..., "price": ..., "drink": ..., "worker": ...}`
///
/// Both normalize to the same internal record before anything touches the
/// ledger. Amounts may arrive as JSON numbers or numeric strings; anything
/// else is a 400.

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
    auth::middleware::AuthContext,
    ledger::protocol::{parse_amount, record_transaction, NewTransaction},
    models::{
        customer::Customer,
        transaction::{Transaction, TransactionWithCustomer},
    },
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// The two accepted request encodings for recording a transaction
///
/// Represented as an untagged union; whichever shape the body matches is
/// normalized to [`NewTransaction`] immediately.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CreateTransactionRequest {
    /// Canonical shape
    Canonical {
        #[serde(rename = "customerId")]
        customer_id: Uuid,
        amount: Value,
        #[serde(default)]
        description: Option<String>,
    },

    /// Legacy shape used by older dashboard builds
    Legacy {
        customer: Uuid,
        price: Value,
        #[serde(default)]
        drink: Option<String>,
        #[serde(default)]
        worker: Option<String>,
    },
}

impl CreateTransactionRequest {
    /// Normalizes either encoding into the canonical internal record
    ///
    /// The actor is the authenticated operator; the legacy `worker` field
    /// wins when present (older terminals sent it explicitly).
    pub fn normalize(self, auth: &AuthContext) -> Result<NewTransaction, ApiError> {
        let (customer_id, raw_amount, label, actor) = match self {
            CreateTransactionRequest::Canonical {
                customer_id,
                amount,
                description,
            } => (customer_id, amount, description, auth.username.clone()),
            CreateTransactionRequest::Legacy {
                customer,
                price,
                drink,
                worker,
            } => (
                customer,
                price,
                drink,
                worker.unwrap_or_else(|| auth.username.clone()),
            ),
        };

        let amount = parse_amount(&raw_amount)?;

        Ok(NewTransaction {
            customer_id,
            amount,
            label: label.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()),
            actor,
        })
    }
}

/// The customer as embedded in transaction listings
#[derive(Debug, Serialize)]
pub struct CustomerSummary {
    pub id: Uuid,
    pub name: String,
    pub balance: Decimal,
}

/// A transaction with its customer populated
#[derive(Debug, Serialize)]
pub struct TransactionView {
    pub id: Uuid,
    pub label: String,
    pub amount: Decimal,
    pub actor: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub customer: CustomerSummary,
}

impl From<TransactionWithCustomer> for TransactionView {
    fn from(row: TransactionWithCustomer) -> Self {
        Self {
            id: row.id,
            label: row.label,
            amount: row.amount,
            actor: row.actor,
            created_at: row.created_at,
            customer: CustomerSummary {
                id: row.customer_id,
                name: row.customer_name,
                balance: row.customer_balance,
            },
        }
    }
}

/// Lists all transactions, newest first, with their customers populated
pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<TransactionView>>> {
    let transactions = Transaction::list_newest_first(&state.db).await?;

    Ok(Json(transactions.into_iter().map(TransactionView::from).collect()))
}

/// Lists one customer's transactions, oldest first (receipt order)
pub async fn list_customer_transactions(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let transactions = Transaction::list_for_customer(&state.db, id).await?;

    Ok(Json(transactions))
}

/// Records a transaction against a customer's tab
///
/// Any authenticated role may record. The body is parsed leniently (both
/// encodings, see module docs) and then handed to the ledger update
/// protocol, which appends the event and adjusts the balance atomically.
///
/// # Errors
///
/// - `400 Bad Request`: Body matches neither encoding, or the amount is
///   not numeric
/// - `404 Not Found`: The customer does not exist; nothing is persisted
pub async fn create_transaction(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<(StatusCode, Json<TransactionView>)> {
    let request: CreateTransactionRequest = serde_json::from_value(body).map_err(|_| {
        ApiError::BadRequest("customerId and numeric amount are required".to_string())
    })?;

    let new = request.normalize(&auth)?;

    let transaction = record_transaction(&state.db, new).await?;

    // Populate the customer for parity with the listing shape; the balance
    // read here already includes this transaction
    let customer = Customer::find_by_id(&state.db, transaction.customer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionView {
            id: transaction.id,
            label: transaction.label,
            amount: transaction.amount,
            actor: transaction.actor,
            created_at: transaction.created_at,
            customer: CustomerSummary {
                id: customer.id,
                name: customer.name,
                balance: customer.balance,
            },
        }),
    ))
}
