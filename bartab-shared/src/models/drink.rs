/// Drink catalog model and database operations
///
/// Drinks are purchasable items. Transactions copy a drink's name into
/// their label at purchase time and never reference the catalog row, so
/// renaming, repricing, or deleting a drink never rewrites history.
/// Setting `active = false` hides a drink from the purchase UI without
/// touching past transactions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Drink {
    /// Unique drink ID (UUID v4)
    pub id: Uuid,

    /// Display name (unique)
    pub name: String,

    /// Price, non-negative (CHECK constraint)
    pub price: Decimal,

    /// Whether the drink is offered for purchase
    pub active: bool,

    /// When the drink was created
    pub created_at: DateTime<Utc>,

    /// When the drink was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new drink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDrink {
    /// Display name
    pub name: String,

    /// Price, must be >= 0
    pub price: Decimal,

    /// Defaults to true when absent
    pub active: bool,
}

/// Input for updating an existing drink
///
/// All fields are optional. Only non-None fields are updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDrink {
    /// New display name
    pub name: Option<String>,

    /// New price
    pub price: Option<Decimal>,

    /// New availability flag
    pub active: Option<bool>,
}

impl Drink {
    /// Creates a new drink in the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the name already exists (unique constraint)
    pub async fn create(pool: &PgPool, data: CreateDrink) -> Result<Self, sqlx::Error> {
        let drink = sqlx::query_as::<_, Drink>(
            r#"
            INSERT INTO drinks (name, price, active)
            VALUES ($1, $2, $3)
            RETURNING id, name, price, active, created_at, updated_at
            "#,
        )
        .bind(data.name.trim())
        .bind(data.price)
        .bind(data.active)
        .fetch_one(pool)
        .await?;

        Ok(drink)
    }

    /// Lists the whole catalog, ordered by name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let drinks = sqlx::query_as::<_, Drink>(
            r#"
            SELECT id, name, price, active, created_at, updated_at
            FROM drinks
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(drinks)
    }

    /// Updates an existing drink
    ///
    /// Only non-None fields in `data` are written. The `updated_at`
    /// timestamp is always refreshed.
    ///
    /// # Returns
    ///
    /// The updated drink if found, None if the drink doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateDrink,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the SET list from the fields that are present
        let mut query = String::from("UPDATE drinks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.price.is_some() {
            bind_count += 1;
            query.push_str(&format!(", price = ${}", bind_count));
        }
        if data.active.is_some() {
            bind_count += 1;
            query.push_str(&format!(", active = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, price, active, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Drink>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name.trim().to_string());
        }
        if let Some(price) = data.price {
            q = q.bind(price);
        }
        if let Some(active) = data.active {
            q = q.bind(active);
        }

        let drink = q.fetch_optional(pool).await?;

        Ok(drink)
    }

    /// Deletes a drink from the catalog
    ///
    /// Past transactions keep their copied labels, so history is unaffected.
    ///
    /// # Returns
    ///
    /// True if the drink was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_drink_default_is_empty() {
        let update = UpdateDrink::default();
        assert!(update.name.is_none());
        assert!(update.price.is_none());
        assert!(update.active.is_none());
    }

    // Database CRUD paths require a running PostgreSQL instance
}
