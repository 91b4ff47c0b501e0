//! Global price catalog entity model.
//!
//! One table of this shape exists per country (see [`crate::routing`]).
//! Rows are seeded and maintained by catalog administrators; the engine
//! only ever reads them. Personalization happens in the override table,
//! correlated by `code` -- the stable, human-meaningful natural key
//! (e.g. `01-D-01`), never by row id.

use reforma_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from a `global_prices*` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GlobalPrice {
    pub id: DbId,
    /// Natural key, unique per country table.
    pub code: String,
    pub category_id: Option<DbId>,
    pub subcategory: Option<String>,
    pub description: String,
    /// Unit of measure (m2, ml, unit, ...).
    pub unit: String,
    pub labor_cost: f64,
    pub material_cost: f64,
    pub equipment_cost: f64,
    pub other_cost: f64,
    /// Always the sum of the four cost components.
    pub base_price: f64,
    pub margin_percentage: f64,
    /// Always `base_price * (1 + margin_percentage / 100)` at this layer.
    pub final_price: f64,
    pub is_active: bool,
    pub notes: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
