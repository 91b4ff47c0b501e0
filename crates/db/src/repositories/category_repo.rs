//! Repository for the `price_categories` table.

use reforma_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::{CategoryUpdate, NewCategory, PriceCategory};

/// Column list for `price_categories` queries.
const COLUMNS: &str =
    "id, name, description, icon, display_order, owner_id, created_at, updated_at";

/// Provides CRUD operations for price categories.
///
/// Write methods are scoped by owner: global categories (NULL owner) are
/// never matched by an owner-scoped UPDATE/DELETE.
pub struct CategoryRepo;

impl CategoryRepo {
    /// List the categories visible to a user: the shared global set plus
    /// the user's own, ordered by display order then name.
    pub async fn list_visible(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<PriceCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM price_categories \
             WHERE owner_id IS NULL OR owner_id = $1 \
             ORDER BY display_order, name"
        );
        sqlx::query_as::<_, PriceCategory>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Find a category by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PriceCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM price_categories WHERE id = $1");
        sqlx::query_as::<_, PriceCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new user-owned category, appended after the highest
    /// display order currently visible to that user.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &NewCategory,
    ) -> Result<PriceCategory, sqlx::Error> {
        let query = format!(
            "INSERT INTO price_categories (name, description, icon, display_order, owner_id) \
             VALUES ($1, $2, $3, \
                (SELECT COALESCE(MAX(display_order), 0) + 1 FROM price_categories \
                 WHERE owner_id IS NULL OR owner_id = $4), \
                $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PriceCategory>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.icon)
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Update a category owned by the caller. Only non-`None` fields are
    /// applied. Returns `None` if no owned row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        input: &CategoryUpdate,
    ) -> Result<Option<PriceCategory>, sqlx::Error> {
        let query = format!(
            "UPDATE price_categories SET \
                name = COALESCE($3, name), \
                description = COALESCE($4, description), \
                icon = COALESCE($5, icon), \
                display_order = COALESCE($6, display_order) \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PriceCategory>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.icon)
            .bind(input.display_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category owned by the caller. Returns `true` if a row was
    /// removed.
    pub async fn delete(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM price_categories WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
