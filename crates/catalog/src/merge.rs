//! Read-time merge of the global catalog and a user's override overlay.
//!
//! The key space partitions cleanly: one override per code per user, so
//! there is no tie to break -- an override always displaces the global
//! entry sharing its natural key, regardless of recency.

use std::collections::BTreeMap;

use reforma_db::models::effective_price::EffectivePrice;
use reforma_db::models::global_price::GlobalPrice;
use reforma_db::models::price_override::PriceOverride;

/// Merge one scope's global entries with the caller's overrides.
///
/// Globals land first; each override is then keyed by the code of the
/// global row it shadows (its own code for custom items) and replaces
/// whatever that key held. The result is unique by code and ordered by
/// code -- each entry is either a pristine global row or a user override,
/// never both.
pub fn merge_catalog(
    globals: Vec<GlobalPrice>,
    overrides: Vec<PriceOverride>,
) -> Vec<EffectivePrice> {
    let mut merged: BTreeMap<String, EffectivePrice> = BTreeMap::new();

    for global in globals {
        merged.insert(global.code.clone(), global.into());
    }
    for ovr in overrides {
        merged.insert(ovr.merge_key().to_string(), ovr.into());
    }

    merged.into_values().collect()
}
