//! Price arithmetic and input validation shared by the mutation and
//! bulk-adjustment paths.
//!
//! A priced item carries four cost components (labor, material, equipment,
//! other). `base_price` is their sum; `final_price` is the base with the
//! margin percentage applied. Bulk adjustments scale an existing final
//! price directly, without touching the components.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Tolerance for comparing derived monetary amounts.
pub const PRICE_TOLERANCE: f64 = 1e-6;

/// Lower bound (exclusive) for any percentage input. At exactly -100 every
/// price collapses to zero and the catalog becomes unrecoverable.
pub const MIN_PERCENTAGE: f64 = -100.0;

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Sum of the four cost components.
pub fn base_price(labor: f64, material: f64, equipment: f64, other: f64) -> f64 {
    labor + material + equipment + other
}

/// Apply a margin percentage to a base price.
pub fn final_price(base_price: f64, margin_percentage: f64) -> f64 {
    apply_percentage(base_price, margin_percentage)
}

/// Scale a price by a percentage: `price * (1 + pct / 100)`.
pub fn apply_percentage(price: f64, percentage: f64) -> f64 {
    price * (1.0 + percentage / 100.0)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that a cost component is a finite, non-negative amount.
pub fn validate_cost_component(value: f64, name: &str) -> Result<(), CoreError> {
    if !value.is_finite() {
        return Err(CoreError::Validation(format!(
            "{name} must be a finite amount, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(CoreError::Validation(format!(
            "{name} must not be negative, got {value}"
        )));
    }
    Ok(())
}

/// Validate a margin or adjustment percentage: finite and above -100.
pub fn validate_percentage(value: f64, name: &str) -> Result<(), CoreError> {
    if !value.is_finite() {
        return Err(CoreError::Validation(format!(
            "{name} must be a finite percentage, got {value}"
        )));
    }
    if value <= MIN_PERCENTAGE {
        return Err(CoreError::Validation(format!(
            "{name} must be greater than {MIN_PERCENTAGE}, got {value}"
        )));
    }
    Ok(())
}
