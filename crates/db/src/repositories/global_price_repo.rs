//! Read-only repository for the per-country `global_prices*` tables.
//!
//! The engine never writes these rows; seeding and maintenance happen in
//! an administrative pipeline outside this codebase.

use reforma_core::types::DbId;
use sqlx::PgPool;

use crate::models::global_price::GlobalPrice;

/// Column list shared across `global_prices*` queries.
const COLUMNS: &str = "id, code, category_id, subcategory, description, unit, \
    labor_cost, material_cost, equipment_cost, other_cost, \
    base_price, margin_percentage, final_price, is_active, \
    notes, color, brand, model, created_at, updated_at";

/// Provides read access to a country's global price table.
pub struct GlobalPriceRepo;

impl GlobalPriceRepo {
    /// Find a global entry by row id.
    pub async fn find_by_id(
        pool: &PgPool,
        table: &str,
        id: DbId,
    ) -> Result<Option<GlobalPrice>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {table} WHERE id = $1");
        sqlx::query_as::<_, GlobalPrice>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active global entry by its natural key.
    pub async fn find_by_code(
        pool: &PgPool,
        table: &str,
        code: &str,
    ) -> Result<Option<GlobalPrice>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM {table} WHERE code = $1 AND is_active = true");
        sqlx::query_as::<_, GlobalPrice>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// List all active global entries, ordered by code.
    pub async fn list_active(pool: &PgPool, table: &str) -> Result<Vec<GlobalPrice>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM {table} WHERE is_active = true ORDER BY code");
        sqlx::query_as::<_, GlobalPrice>(&query).fetch_all(pool).await
    }

    /// List active global entries for one category, ordered by code.
    pub async fn list_by_category(
        pool: &PgPool,
        table: &str,
        category_id: DbId,
    ) -> Result<Vec<GlobalPrice>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table} \
             WHERE category_id = $1 AND is_active = true \
             ORDER BY code"
        );
        sqlx::query_as::<_, GlobalPrice>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive substring search over description, subcategory,
    /// and code, capped at `limit` rows.
    pub async fn search(
        pool: &PgPool,
        table: &str,
        term: &str,
        limit: i64,
    ) -> Result<Vec<GlobalPrice>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table} \
             WHERE is_active = true \
               AND (description ILIKE '%' || $1 || '%' \
                    OR subcategory ILIKE '%' || $1 || '%' \
                    OR code ILIKE '%' || $1 || '%') \
             ORDER BY code \
             LIMIT $2"
        );
        sqlx::query_as::<_, GlobalPrice>(&query)
            .bind(term)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
