//! User price override model and DTOs.
//!
//! An override is a user-owned row that shadows the global entry sharing
//! its `code`, or a fully custom entry with no global counterpart
//! (`origin_code` NULL, `is_custom` true). For a given owner there is at
//! most one override per `code`, enforced by the `(owner_id, code)` unique
//! constraint -- once it exists, the override is the single source of
//! truth for that code.

use reforma_core::pricing;
use reforma_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::global_price::GlobalPrice;

/// A row from a `user_price_overrides*` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PriceOverride {
    pub id: DbId,
    pub owner_id: DbId,
    /// `code` of the global entry this row shadows; NULL for custom items.
    pub origin_code: Option<String>,
    pub code: String,
    pub category_id: Option<DbId>,
    pub subcategory: Option<String>,
    pub description: String,
    pub unit: String,
    pub labor_cost: f64,
    pub material_cost: f64,
    pub equipment_cost: f64,
    pub other_cost: f64,
    pub base_price: f64,
    pub margin_percentage: f64,
    pub final_price: f64,
    /// True iff the row has no global counterpart.
    pub is_custom: bool,
    /// Provenance flag for bulk-imported rows.
    pub is_imported: bool,
    pub is_active: bool,
    pub notes: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PriceOverride {
    /// The natural key this override resolves under: its origin's code when
    /// it shadows a global entry, its own code otherwise.
    pub fn merge_key(&self) -> &str {
        self.origin_code.as_deref().unwrap_or(&self.code)
    }
}

/// Full insert row for an override (everything but id/timestamps).
///
/// Built by the engine, never deserialized from callers: the mutation
/// engine synthesizes one from a global row plus a patch, the custom item
/// creator from caller-supplied fields plus a generated code.
#[derive(Debug, Clone)]
pub struct NewPriceOverride {
    pub owner_id: DbId,
    pub origin_code: Option<String>,
    pub code: String,
    pub category_id: Option<DbId>,
    pub subcategory: Option<String>,
    pub description: String,
    pub unit: String,
    pub labor_cost: f64,
    pub material_cost: f64,
    pub equipment_cost: f64,
    pub other_cost: f64,
    pub base_price: f64,
    pub margin_percentage: f64,
    pub final_price: f64,
    pub is_custom: bool,
    pub is_imported: bool,
    pub is_active: bool,
    pub notes: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
}

impl NewPriceOverride {
    /// Copy-on-write seed: every field taken verbatim from the global row,
    /// keyed by its `code`.
    pub fn from_global(global: &GlobalPrice, owner_id: DbId) -> Self {
        Self {
            owner_id,
            origin_code: Some(global.code.clone()),
            code: global.code.clone(),
            category_id: global.category_id,
            subcategory: global.subcategory.clone(),
            description: global.description.clone(),
            unit: global.unit.clone(),
            labor_cost: global.labor_cost,
            material_cost: global.material_cost,
            equipment_cost: global.equipment_cost,
            other_cost: global.other_cost,
            base_price: global.base_price,
            margin_percentage: global.margin_percentage,
            final_price: global.final_price,
            is_custom: false,
            is_imported: false,
            is_active: true,
            notes: global.notes.clone(),
            color: global.color.clone(),
            brand: global.brand.clone(),
            model: global.model.clone(),
        }
    }

    /// Fully custom row: no origin, derived prices computed from the
    /// supplied components and margin.
    pub fn from_custom(owner_id: DbId, code: String, input: &NewCustomPrice) -> Self {
        let base = pricing::base_price(
            input.labor_cost,
            input.material_cost,
            input.equipment_cost,
            input.other_cost,
        );
        Self {
            owner_id,
            origin_code: None,
            code,
            category_id: input.category_id,
            subcategory: input.subcategory.clone(),
            description: input.description.clone(),
            unit: input.unit.clone(),
            labor_cost: input.labor_cost,
            material_cost: input.material_cost,
            equipment_cost: input.equipment_cost,
            other_cost: input.other_cost,
            base_price: base,
            margin_percentage: input.margin_percentage,
            final_price: pricing::final_price(base, input.margin_percentage),
            is_custom: true,
            is_imported: false,
            is_active: true,
            notes: input.notes.clone(),
            color: input.color.clone(),
            brand: input.brand.clone(),
            model: input.model.clone(),
        }
    }
}

/// Caller-facing patch for a priced item. Only non-`None` fields apply;
/// `base_price` and `final_price` are derived, never accepted as input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceUpdate {
    pub category_id: Option<DbId>,
    pub subcategory: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub labor_cost: Option<f64>,
    pub material_cost: Option<f64>,
    pub equipment_cost: Option<f64>,
    pub other_cost: Option<f64>,
    pub margin_percentage: Option<f64>,
    pub is_active: Option<bool>,
    pub notes: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
}

/// Resolved values for an in-place override update. Unlike [`PriceUpdate`]
/// every field is concrete: the engine has already folded the patch into
/// the existing row and recomputed the derived prices.
#[derive(Debug, Clone)]
pub struct PriceOverrideValues {
    pub category_id: Option<DbId>,
    pub subcategory: Option<String>,
    pub description: String,
    pub unit: String,
    pub labor_cost: f64,
    pub material_cost: f64,
    pub equipment_cost: f64,
    pub other_cost: f64,
    pub base_price: f64,
    pub margin_percentage: f64,
    pub final_price: f64,
    pub is_active: bool,
    pub notes: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
}

/// DTO for creating a fully user-authored priced item.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomPrice {
    pub category_id: Option<DbId>,
    pub subcategory: Option<String>,
    pub description: String,
    pub unit: String,
    pub labor_cost: f64,
    pub material_cost: f64,
    pub equipment_cost: f64,
    pub other_cost: f64,
    pub margin_percentage: f64,
    pub notes: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
}
