//! Price category model and DTOs.
//!
//! Categories group priced items for display. Rows with a NULL `owner_id`
//! are the shared global categories and are immutable from the engine;
//! user-created categories belong to exactly one owner.

use reforma_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `price_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PriceCategory {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub display_order: i32,
    /// NULL for shared global categories.
    pub owner_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PriceCategory {
    /// Whether this is a shared global category (no owner).
    pub fn is_global(&self) -> bool {
        self.owner_id.is_none()
    }
}

/// DTO for creating a new user-owned category.
///
/// `display_order` is assigned by the repository (appended after the
/// caller's current maximum), not supplied by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// DTO for renaming/reordering a category. Only non-`None` fields apply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub display_order: Option<i32>,
}
