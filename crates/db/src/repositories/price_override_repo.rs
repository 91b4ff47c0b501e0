//! Repository for the per-country `user_price_overrides*` tables.
//!
//! All reads and writes are scoped to one owner. Inserts go through an
//! `ON CONFLICT (owner_id, code) DO UPDATE` upsert: two writers racing to
//! materialize the same override converge on a single row, the second
//! write winning field-by-field.

use reforma_core::types::DbId;
use sqlx::PgPool;

use crate::models::price_override::{NewPriceOverride, PriceOverride, PriceOverrideValues};

/// Column list shared across `user_price_overrides*` queries.
const COLUMNS: &str = "id, owner_id, origin_code, code, category_id, subcategory, \
    description, unit, labor_cost, material_cost, equipment_cost, other_cost, \
    base_price, margin_percentage, final_price, is_custom, is_imported, is_active, \
    notes, color, brand, model, created_at, updated_at";

/// Provides data access to a country's override table.
pub struct PriceOverrideRepo;

impl PriceOverrideRepo {
    /// Find an override by row id, scoped to its owner.
    pub async fn find_by_id(
        pool: &PgPool,
        table: &str,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<PriceOverride>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {table} WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, PriceOverride>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an owner's active override for a natural key. Matches both the
    /// override's own code and the code of the global row it shadows.
    pub async fn find_by_code(
        pool: &PgPool,
        table: &str,
        owner_id: DbId,
        code: &str,
    ) -> Result<Option<PriceOverride>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table} \
             WHERE owner_id = $1 AND (code = $2 OR origin_code = $2) AND is_active = true"
        );
        sqlx::query_as::<_, PriceOverride>(&query)
            .bind(owner_id)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// List an owner's active overrides, ordered by code.
    pub async fn list_for_owner(
        pool: &PgPool,
        table: &str,
        owner_id: DbId,
    ) -> Result<Vec<PriceOverride>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table} \
             WHERE owner_id = $1 AND is_active = true \
             ORDER BY code"
        );
        sqlx::query_as::<_, PriceOverride>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// List an owner's active overrides for one category, ordered by code.
    pub async fn list_by_category(
        pool: &PgPool,
        table: &str,
        owner_id: DbId,
        category_id: DbId,
    ) -> Result<Vec<PriceOverride>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table} \
             WHERE owner_id = $1 AND category_id = $2 AND is_active = true \
             ORDER BY code"
        );
        sqlx::query_as::<_, PriceOverride>(&query)
            .bind(owner_id)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive substring search over the owner's active
    /// overrides, capped at `limit` rows.
    pub async fn search(
        pool: &PgPool,
        table: &str,
        owner_id: DbId,
        term: &str,
        limit: i64,
    ) -> Result<Vec<PriceOverride>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table} \
             WHERE owner_id = $1 AND is_active = true \
               AND (description ILIKE '%' || $2 || '%' \
                    OR subcategory ILIKE '%' || $2 || '%' \
                    OR code ILIKE '%' || $2 || '%') \
             ORDER BY code \
             LIMIT $3"
        );
        sqlx::query_as::<_, PriceOverride>(&query)
            .bind(owner_id)
            .bind(term)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Upsert an override row.
    ///
    /// On `(owner_id, code)` conflict the incoming values replace the
    /// stored ones and the row is reactivated; a concurrent copy-on-write
    /// insert therefore degrades to an update instead of failing.
    pub async fn upsert(
        pool: &PgPool,
        table: &str,
        input: &NewPriceOverride,
    ) -> Result<PriceOverride, sqlx::Error> {
        let query = format!(
            "INSERT INTO {table} \
                (owner_id, origin_code, code, category_id, subcategory, description, unit, \
                 labor_cost, material_cost, equipment_cost, other_cost, \
                 base_price, margin_percentage, final_price, \
                 is_custom, is_imported, is_active, notes, color, brand, model) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
                     $15, $16, $17, $18, $19, $20, $21) \
             ON CONFLICT (owner_id, code) DO UPDATE SET \
                origin_code = EXCLUDED.origin_code, \
                category_id = EXCLUDED.category_id, \
                subcategory = EXCLUDED.subcategory, \
                description = EXCLUDED.description, \
                unit = EXCLUDED.unit, \
                labor_cost = EXCLUDED.labor_cost, \
                material_cost = EXCLUDED.material_cost, \
                equipment_cost = EXCLUDED.equipment_cost, \
                other_cost = EXCLUDED.other_cost, \
                base_price = EXCLUDED.base_price, \
                margin_percentage = EXCLUDED.margin_percentage, \
                final_price = EXCLUDED.final_price, \
                is_custom = EXCLUDED.is_custom, \
                is_imported = EXCLUDED.is_imported, \
                is_active = EXCLUDED.is_active, \
                notes = EXCLUDED.notes, \
                color = EXCLUDED.color, \
                brand = EXCLUDED.brand, \
                model = EXCLUDED.model \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PriceOverride>(&query)
            .bind(input.owner_id)
            .bind(&input.origin_code)
            .bind(&input.code)
            .bind(input.category_id)
            .bind(&input.subcategory)
            .bind(&input.description)
            .bind(&input.unit)
            .bind(input.labor_cost)
            .bind(input.material_cost)
            .bind(input.equipment_cost)
            .bind(input.other_cost)
            .bind(input.base_price)
            .bind(input.margin_percentage)
            .bind(input.final_price)
            .bind(input.is_custom)
            .bind(input.is_imported)
            .bind(input.is_active)
            .bind(&input.notes)
            .bind(&input.color)
            .bind(&input.brand)
            .bind(&input.model)
            .fetch_one(pool)
            .await
    }

    /// Replace an owned override's values in place. Returns `None` if no
    /// owned row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        table: &str,
        id: DbId,
        owner_id: DbId,
        values: &PriceOverrideValues,
    ) -> Result<Option<PriceOverride>, sqlx::Error> {
        let query = format!(
            "UPDATE {table} SET \
                category_id = $3, \
                subcategory = $4, \
                description = $5, \
                unit = $6, \
                labor_cost = $7, \
                material_cost = $8, \
                equipment_cost = $9, \
                other_cost = $10, \
                base_price = $11, \
                margin_percentage = $12, \
                final_price = $13, \
                is_active = $14, \
                notes = $15, \
                color = $16, \
                brand = $17, \
                model = $18 \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PriceOverride>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(values.category_id)
            .bind(&values.subcategory)
            .bind(&values.description)
            .bind(&values.unit)
            .bind(values.labor_cost)
            .bind(values.material_cost)
            .bind(values.equipment_cost)
            .bind(values.other_cost)
            .bind(values.base_price)
            .bind(values.margin_percentage)
            .bind(values.final_price)
            .bind(values.is_active)
            .bind(&values.notes)
            .bind(&values.color)
            .bind(&values.brand)
            .bind(&values.model)
            .fetch_optional(pool)
            .await
    }

    /// Multiply an owned override's final price by `factor` in place.
    /// Returns `None` if no owned row with the given `id` exists.
    pub async fn scale_final_price(
        pool: &PgPool,
        table: &str,
        id: DbId,
        owner_id: DbId,
        factor: f64,
    ) -> Result<Option<PriceOverride>, sqlx::Error> {
        let query = format!(
            "UPDATE {table} SET final_price = final_price * $3 \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PriceOverride>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(factor)
            .fetch_optional(pool)
            .await
    }

    /// Remove an owned override. Returns `true` if a row was deleted.
    pub async fn delete(
        pool: &PgPool,
        table: &str,
        id: DbId,
        owner_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {table} WHERE id = $1 AND owner_id = $2");
        let result = sqlx::query(&query)
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deactivate an owned override without removing the row.
    /// Returns `true` if a row was deactivated.
    pub async fn deactivate(
        pool: &PgPool,
        table: &str,
        id: DbId,
        owner_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE {table} SET is_active = false \
             WHERE id = $1 AND owner_id = $2 AND is_active = true"
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
