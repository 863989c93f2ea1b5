/// Drink catalog endpoints
///
/// - `GET /api/drinks` - List the catalog (any authenticated role)
/// - `POST /api/drinks` - Add a drink (superuser only)
/// - `PUT /api/drinks/:id` - Update a drink (superuser only)
/// - `DELETE /api/drinks/:id` - Remove a drink (superuser only)
///
/// Catalog changes never rewrite history: transactions copy the label at
/// purchase time.

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
    auth::{authorization::require_catalog_management, middleware::AuthContext},
    models::drink::{CreateDrink, Drink, UpdateDrink},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

/// Create drink request
#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    /// Display name
    pub name: String,

    /// Price, must be >= 0
    pub price: Decimal,

    /// Defaults to true when absent
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Update drink request; only present fields change
#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub active: Option<bool>,
}

/// Lists the whole catalog, ordered by name
pub async fn list_drinks(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Drink>>> {
    let drinks = Drink::list(&state.db).await?;

    Ok(Json(drinks))
}

/// Adds a drink to the catalog (superuser only)
///
/// # Errors
///
/// - `400 Bad Request`: Empty name or negative price
/// - `403 Forbidden`: Caller is not a superuser
/// - `409 Conflict`: Name already exists
pub async fn create_drink(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<CreateDrinkRequest>,
) -> ApiResult<(StatusCode, Json<Drink>)> {
    require_catalog_management(&auth)?;

    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Name and numeric price are required".to_string(),
        ));
    }
    if req.price < Decimal::ZERO {
        return Err(ApiError::BadRequest(
            "Price must not be negative".to_string(),
        ));
    }

    let drink = Drink::create(
        &state.db,
        CreateDrink {
            name: req.name,
            price: req.price,
            active: req.active,
        },
    )
    .await?;

    info!(
        drink_id = %drink.id,
        name = %drink.name,
        price = %drink.price,
        created_by = %auth.username,
        "drink added to catalog"
    );

    Ok((StatusCode::CREATED, Json(drink)))
}

/// Updates a drink (superuser only)
///
/// # Errors
///
/// - `400 Bad Request`: Negative price
/// - `403 Forbidden`: Caller is not a superuser
/// - `404 Not Found`: No such drink
/// - `409 Conflict`: New name already exists
pub async fn update_drink(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<UpdateDrinkRequest>,
) -> ApiResult<Json<Drink>> {
    require_catalog_management(&auth)?;

    if let Some(price) = req.price {
        if price < Decimal::ZERO {
            return Err(ApiError::BadRequest(
                "Price must not be negative".to_string(),
            ));
        }
    }

    let drink = Drink::update(
        &state.db,
        id,
        UpdateDrink {
            name: req.name,
            price: req.price,
            active: req.active,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Drink not found".to_string()))?;

    Ok(Json(drink))
}

/// Removes a drink from the catalog (superuser only)
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a superuser
/// - `404 Not Found`: No such drink
pub async fn delete_drink(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    require_catalog_management(&auth)?;

    let deleted = Drink::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Drink not found".to_string()));
    }

    info!(drink_id = %id, deleted_by = %auth.username, "drink removed from catalog");

    Ok(Json(serde_json::json!({ "message": "Deleted", "id": id })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_drink_active_defaults_to_true() {
        let req: CreateDrinkRequest =
            serde_json::from_str(r#"{"name": "Beer", "price": 5.0}"#).unwrap();

        assert!(req.active);
        assert_eq!(req.price, dec!(5.0));
    }

    #[test]
    fn test_create_drink_rejects_non_numeric_price() {
        let result = serde_json::from_str::<CreateDrinkRequest>(
            r#"{"name": "Beer", "price": "five"}"#,
        );

        assert!(result.is_err());
    }
}
