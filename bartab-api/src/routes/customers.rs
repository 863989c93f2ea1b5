/// Customer endpoints
///
/// - `GET /api/customers` - List customers (any authenticated role)
/// - `POST /api/customers` - Create a customer (superuser only)
/// - `PUT /api/customers/:id` - Rename a customer (superuser only)
/// - `DELETE /api/customers/:id` - Delete a customer and its transactions (superuser only)
/// - `POST /api/customers/:id/reconcile` - Recompute the balance from the log (superuser only)
/// - `GET /api/customers/:id/receipt` - Aggregated receipt (any authenticated role)

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
    auth::{authorization::require_customer_management, middleware::AuthContext},
    ledger::receipt::{build_receipt, Receipt},
    models::{customer::Customer, transaction::Transaction},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

/// Create / rename customer request
#[derive(Debug, Deserialize, Validate)]
pub struct CustomerNameRequest {
    /// Customer display name
    #[validate(length(min = 1, max = 128, message = "Name is required"))]
    pub name: String,
}

/// A customer's receipt, with the customer embedded
#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
    /// The customer the receipt belongs to
    pub customer: Customer,

    /// The aggregated receipt
    #[serde(flatten)]
    pub receipt: Receipt,
}

/// Lists all customers, ordered by name
pub async fn list_customers(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Customer>>> {
    let customers = Customer::list(&state.db).await?;

    Ok(Json(customers))
}

/// Creates a customer with a zero balance (superuser only)
///
/// # Errors
///
/// - `400 Bad Request`: Empty name
/// - `403 Forbidden`: Caller is not a superuser
/// - `409 Conflict`: Name already taken
pub async fn create_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<CustomerNameRequest>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    require_customer_management(&auth)?;

    req.validate()?;

    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Name is required".to_string()));
    }

    // Friendly 409 before the insert; the unique constraint is the backstop
    if Customer::find_by_name(&state.db, &req.name).await?.is_some() {
        return Err(ApiError::Conflict("Customer already exists".to_string()));
    }

    let customer = Customer::create(&state.db, &req.name).await?;

    info!(
        customer_id = %customer.id,
        name = %customer.name,
        created_by = %auth.username,
        "customer created"
    );

    Ok((StatusCode::CREATED, Json(customer)))
}

/// Renames a customer (superuser only)
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a superuser
/// - `404 Not Found`: No such customer
/// - `409 Conflict`: New name already taken
pub async fn rename_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<CustomerNameRequest>,
) -> ApiResult<Json<Customer>> {
    require_customer_management(&auth)?;

    req.validate()?;

    let customer = Customer::rename(&state.db, id, &req.name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    Ok(Json(customer))
}

/// Deletes a customer and all of its transactions (superuser only)
///
/// Transactions are deleted first, then the customer row, so an
/// interrupted delete can never leave a balance without its explanatory
/// history.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a superuser
/// - `404 Not Found`: No such customer
pub async fn delete_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    require_customer_management(&auth)?;

    let customer = Customer::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    Customer::delete_cascade(&state.db, customer.id).await?;

    info!(customer_id = %id, deleted_by = %auth.username, "customer deleted with history");

    Ok(Json(serde_json::json!({ "message": "Customer deleted" })))
}

/// Recomputes a customer's balance from the transaction log (superuser only)
///
/// The reconciliation procedure: the stored balance is replaced with the
/// sum of the customer's transactions. Never run automatically; this is
/// the recovery path for a balance left stale by a crash.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a superuser
/// - `404 Not Found`: No such customer
pub async fn reconcile_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Customer>> {
    require_customer_management(&auth)?;

    Customer::recompute_balance(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    let customer = Customer::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    info!(customer_id = %id, balance = %customer.balance, reconciled_by = %auth.username, "balance reconciled");

    Ok(Json(customer))
}

/// Builds the aggregated receipt for one customer
///
/// Reads the customer's full history oldest-first and runs the receipt
/// aggregator over it.
///
/// # Errors
///
/// - `404 Not Found`: No such customer
pub async fn customer_receipt(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ReceiptResponse>> {
    let customer = Customer::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    let transactions = Transaction::list_for_customer(&state.db, customer.id).await?;
    let receipt = build_receipt(&transactions);

    // The receipt's net total and the stored balance are the same sum by
    // construction; a mismatch means a reconciliation is due.
    if receipt.net_total != customer.balance {
        warn!(
            customer_id = %customer.id,
            stored_balance = %customer.balance,
            derived_total = %receipt.net_total,
            "stored balance does not match transaction log"
        );
    }

    Ok(Json(ReceiptResponse { customer, receipt }))
}
