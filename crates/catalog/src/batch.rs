//! Bulk percentage adjustment over a user's effective catalog.
//!
//! One algorithm at two scopes (whole catalog, one category): globals the
//! user has not yet touched are copy-on-write materialized with a scaled
//! final price; existing overrides are scaled in place. Scaling multiplies
//! the *current* final price, so repeated runs compound multiplicatively.
//!
//! Writes are chunked. Chunks run sequentially; the writes inside one
//! chunk are issued together and awaited together. A failing chunk aborts
//! the rest -- chunks already committed are not rolled back.

use std::collections::HashSet;

use futures::future::try_join_all;
use reforma_core::pricing;
use reforma_core::types::DbId;
use reforma_db::models::price_override::NewPriceOverride;
use reforma_db::repositories::{GlobalPriceRepo, PriceOverrideRepo};
use reforma_db::routing::CatalogTables;
use sqlx::PgPool;

use crate::error::CatalogError;

/// Rows written per storage round: bounds request size for large catalogs.
const ADJUSTMENT_BATCH_SIZE: usize = 50;

/// Scope of a bulk adjustment.
#[derive(Debug, Clone, Copy)]
pub(crate) enum AdjustmentScope {
    /// Every active entry in the caller's country catalog.
    All,
    /// Active entries of one category.
    Category(DbId),
}

/// Apply a uniform percentage change across the scope.
///
/// Returns the number of override rows created plus updated.
pub(crate) async fn apply_percentage(
    pool: &PgPool,
    tables: CatalogTables,
    owner_id: DbId,
    scope: AdjustmentScope,
    percentage: f64,
) -> Result<u64, CatalogError> {
    let factor = 1.0 + percentage / 100.0;

    let globals = match scope {
        AdjustmentScope::All => GlobalPriceRepo::list_active(pool, tables.global).await?,
        AdjustmentScope::Category(category_id) => {
            GlobalPriceRepo::list_by_category(pool, tables.global, category_id).await?
        }
    };
    let overrides = match scope {
        AdjustmentScope::All => {
            PriceOverrideRepo::list_for_owner(pool, tables.overrides, owner_id).await?
        }
        AdjustmentScope::Category(category_id) => {
            PriceOverrideRepo::list_by_category(pool, tables.overrides, owner_id, category_id)
                .await?
        }
    };

    // Globals already shadowed by an override are handled on the update
    // side; the rest get a fresh override carrying the global fields
    // verbatim with only the final price scaled.
    let shadowed: HashSet<&str> = overrides.iter().map(|o| o.merge_key()).collect();
    let to_create: Vec<NewPriceOverride> = globals
        .iter()
        .filter(|g| !shadowed.contains(g.code.as_str()))
        .map(|g| {
            let mut row = NewPriceOverride::from_global(g, owner_id);
            row.final_price = pricing::apply_percentage(g.final_price, percentage);
            row
        })
        .collect();

    let mut affected = insert_chunked(pool, tables, &to_create).await?;

    for (chunk_no, chunk) in overrides.chunks(ADJUSTMENT_BATCH_SIZE).enumerate() {
        let writes = chunk.iter().map(|o| {
            PriceOverrideRepo::scale_final_price(pool, tables.overrides, o.id, owner_id, factor)
        });
        match try_join_all(writes).await {
            Ok(rows) => affected += rows.iter().flatten().count() as u64,
            Err(err) => {
                tracing::error!(
                    chunk = chunk_no,
                    affected,
                    error = %err,
                    "bulk adjustment aborted while scaling overrides; committed chunks remain applied"
                );
                return Err(err.into());
            }
        }
    }

    tracing::info!(affected, percentage, "applied bulk price adjustment");
    Ok(affected)
}

/// Insert override rows in sequential chunks, the rows of each chunk
/// written concurrently. Returns the number of rows written.
pub(crate) async fn insert_chunked(
    pool: &PgPool,
    tables: CatalogTables,
    rows: &[NewPriceOverride],
) -> Result<u64, CatalogError> {
    let mut written: u64 = 0;
    for (chunk_no, chunk) in rows.chunks(ADJUSTMENT_BATCH_SIZE).enumerate() {
        let writes = chunk
            .iter()
            .map(|row| PriceOverrideRepo::upsert(pool, tables.overrides, row));
        match try_join_all(writes).await {
            Ok(created) => written += created.len() as u64,
            Err(err) => {
                tracing::error!(
                    chunk = chunk_no,
                    written,
                    error = %err,
                    "bulk insert aborted; committed chunks remain applied"
                );
                return Err(err.into());
            }
        }
    }
    Ok(written)
}
