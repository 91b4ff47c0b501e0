//! The merged catalog view.
//!
//! Not persisted: for each `code` present in either the global set or the
//! caller's override set, the override wins. The `source` tag records
//! which side supplied the row, mirroring the shape downstream consumers
//! (budgets, proposals) read.

use reforma_core::types::DbId;
use serde::Serialize;

use super::global_price::GlobalPrice;
use super::price_override::PriceOverride;

/// Which layer supplied an effective entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Global,
    Override,
}

/// One entry of the merged, effective catalog.
#[derive(Debug, Clone, Serialize)]
pub struct EffectivePrice {
    /// Row id in the table named by `source`.
    pub id: DbId,
    pub code: String,
    /// Set when the entry is an override of a global row.
    pub origin_code: Option<String>,
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
    pub notes: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub source: PriceSource,
}

impl From<GlobalPrice> for EffectivePrice {
    fn from(g: GlobalPrice) -> Self {
        Self {
            id: g.id,
            code: g.code,
            origin_code: None,
            category_id: g.category_id,
            subcategory: g.subcategory,
            description: g.description,
            unit: g.unit,
            labor_cost: g.labor_cost,
            material_cost: g.material_cost,
            equipment_cost: g.equipment_cost,
            other_cost: g.other_cost,
            base_price: g.base_price,
            margin_percentage: g.margin_percentage,
            final_price: g.final_price,
            is_custom: false,
            is_imported: false,
            notes: g.notes,
            color: g.color,
            brand: g.brand,
            model: g.model,
            source: PriceSource::Global,
        }
    }
}

impl From<PriceOverride> for EffectivePrice {
    fn from(o: PriceOverride) -> Self {
        Self {
            id: o.id,
            code: o.code,
            origin_code: o.origin_code,
            category_id: o.category_id,
            subcategory: o.subcategory,
            description: o.description,
            unit: o.unit,
            labor_cost: o.labor_cost,
            material_cost: o.material_cost,
            equipment_cost: o.equipment_cost,
            other_cost: o.other_cost,
            base_price: o.base_price,
            margin_percentage: o.margin_percentage,
            final_price: o.final_price,
            is_custom: o.is_custom,
            is_imported: o.is_imported,
            notes: o.notes,
            color: o.color,
            brand: o.brand,
            model: o.model,
            source: PriceSource::Override,
        }
    }
}
