//! The engine's operation surface.
//!
//! Every operation resolves the caller through the identity provider
//! (failing closed), routes the caller's country to its table pair, and
//! runs its storage calls sequentially -- the only concurrency lives in
//! the chunked bulk writes of [`crate::batch`].

use std::sync::Arc;

use reforma_core::codes;
use reforma_core::error::CoreError;
use reforma_core::pricing;
use reforma_core::types::DbId;
use reforma_db::models::category::{CategoryUpdate, NewCategory, PriceCategory};
use reforma_db::models::effective_price::EffectivePrice;
use reforma_db::models::price_override::{
    NewCustomPrice, NewPriceOverride, PriceOverride, PriceOverrideValues, PriceUpdate,
};
use reforma_db::repositories::{CategoryRepo, GlobalPriceRepo, PriceOverrideRepo};
use reforma_db::routing::{self, CatalogTables};
use sqlx::PgPool;

use crate::batch::{self, AdjustmentScope};
use crate::error::{CatalogError, CatalogResult};
use crate::merge::merge_catalog;
use crate::providers::{IdentityProvider, LocaleProvider};

/// Per-side row cap for storage-level search, applied before the merge.
const SEARCH_RESULT_CAP: i64 = 500;

/// A resolved caller: identity plus the table pair for their country.
struct Session {
    user_id: DbId,
    tables: CatalogTables,
}

/// The pricing catalog engine.
///
/// Cheap to clone; holds the pool and the two external providers.
#[derive(Clone)]
pub struct CatalogService {
    pool: PgPool,
    identity: Arc<dyn IdentityProvider>,
    locale: Arc<dyn LocaleProvider>,
}

impl CatalogService {
    pub fn new(
        pool: PgPool,
        identity: Arc<dyn IdentityProvider>,
        locale: Arc<dyn LocaleProvider>,
    ) -> Self {
        Self {
            pool,
            identity,
            locale,
        }
    }

    /// Resolve the caller and their country's table pair.
    ///
    /// Fails closed: no identity, no storage access.
    async fn session(&self) -> CatalogResult<Session> {
        let user_id = self
            .identity
            .current_user()
            .await
            .ok_or(CatalogError::Unauthenticated)?;
        let country = self.locale.country_code().unwrap_or_default();
        Ok(Session {
            user_id,
            tables: routing::resolve_tables(&country),
        })
    }

    // -----------------------------------------------------------------------
    // Resolution / merge
    // -----------------------------------------------------------------------

    /// The effective catalog for one category, ordered by code.
    pub async fn list_by_category(&self, category_id: DbId) -> CatalogResult<Vec<EffectivePrice>> {
        let s = self.session().await?;
        let globals =
            GlobalPriceRepo::list_by_category(&self.pool, s.tables.global, category_id).await?;
        let overrides = PriceOverrideRepo::list_by_category(
            &self.pool,
            s.tables.overrides,
            s.user_id,
            category_id,
        )
        .await?;
        Ok(merge_catalog(globals, overrides))
    }

    /// The full effective catalog, ordered by code. Entries carry their
    /// category id for client-side grouping.
    pub async fn list_all(&self) -> CatalogResult<Vec<EffectivePrice>> {
        let s = self.session().await?;
        let globals = GlobalPriceRepo::list_active(&self.pool, s.tables.global).await?;
        let overrides =
            PriceOverrideRepo::list_for_owner(&self.pool, s.tables.overrides, s.user_id).await?;
        Ok(merge_catalog(globals, overrides))
    }

    /// Case-insensitive substring search over description, subcategory,
    /// and code. Both sides are matched at the storage layer and capped
    /// before the merge, so a large catalog cannot blow up the response.
    pub async fn search(&self, term: &str) -> CatalogResult<Vec<EffectivePrice>> {
        let s = self.session().await?;
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        let globals =
            GlobalPriceRepo::search(&self.pool, s.tables.global, term, SEARCH_RESULT_CAP).await?;
        let overrides = PriceOverrideRepo::search(
            &self.pool,
            s.tables.overrides,
            s.user_id,
            term,
            SEARCH_RESULT_CAP,
        )
        .await?;
        Ok(merge_catalog(globals, overrides))
    }

    /// Resolve one natural key to its effective entry: the caller's
    /// override when it exists, else the pristine global entry.
    pub async fn resolve_by_code(&self, code: &str) -> CatalogResult<Option<EffectivePrice>> {
        let s = self.session().await?;
        if let Some(ovr) =
            PriceOverrideRepo::find_by_code(&self.pool, s.tables.overrides, s.user_id, code).await?
        {
            return Ok(Some(ovr.into()));
        }
        Ok(GlobalPriceRepo::find_by_code(&self.pool, s.tables.global, code)
            .await?
            .map(Into::into))
    }

    // -----------------------------------------------------------------------
    // Mutation (copy-on-write)
    // -----------------------------------------------------------------------

    /// Apply a partial edit to a priced item.
    ///
    /// `id` may name either an override row the caller owns (updated in
    /// place) or a global row. A first edit of a global entry materializes
    /// a personal override; the global row is never written. Later edits
    /// addressed by the same global id find the override through the
    /// entry's `code` and update it in place, so no duplicate override can
    /// accumulate.
    pub async fn update_price(&self, id: DbId, patch: &PriceUpdate) -> CatalogResult<EffectivePrice> {
        validate_patch(patch)?;
        let s = self.session().await?;

        if let Some(existing) =
            PriceOverrideRepo::find_by_id(&self.pool, s.tables.overrides, id, s.user_id).await?
        {
            return self.update_override_in_place(&s, existing, patch).await;
        }

        let Some(global) = GlobalPriceRepo::find_by_id(&self.pool, s.tables.global, id).await?
        else {
            return Err(CoreError::not_found("priced item", id).into());
        };

        // The override lookup is keyed by the global entry's code, not its
        // row id: an earlier copy-on-write for this code must be edited,
        // not re-synthesized from the global row.
        if let Some(existing) = PriceOverrideRepo::find_by_code(
            &self.pool,
            s.tables.overrides,
            s.user_id,
            &global.code,
        )
        .await?
        {
            return self.update_override_in_place(&s, existing, patch).await;
        }

        let mut row = NewPriceOverride::from_global(&global, s.user_id);
        apply_patch(&mut row, patch);
        let created = PriceOverrideRepo::upsert(&self.pool, s.tables.overrides, &row).await?;
        Ok(created.into())
    }

    async fn update_override_in_place(
        &self,
        s: &Session,
        existing: PriceOverride,
        patch: &PriceUpdate,
    ) -> CatalogResult<EffectivePrice> {
        let values = resolve_values(&existing, patch);
        let updated = PriceOverrideRepo::update(
            &self.pool,
            s.tables.overrides,
            existing.id,
            s.user_id,
            &values,
        )
        .await?
        .ok_or_else(|| CoreError::not_found("price override", existing.id))?;
        Ok(updated.into())
    }

    /// Insert a fully user-authored priced item under a synthesized code.
    /// No global-catalog interaction.
    pub async fn create_custom_price(&self, input: &NewCustomPrice) -> CatalogResult<PriceOverride> {
        validate_custom(input)?;
        let s = self.session().await?;
        let row = NewPriceOverride::from_custom(s.user_id, codes::generate_custom_code(), input);
        Ok(PriceOverrideRepo::upsert(&self.pool, s.tables.overrides, &row).await?)
    }

    /// Bulk insert of user-authored entries flagged as imported.
    /// Returns the number of rows written.
    pub async fn import_prices(&self, inputs: &[NewCustomPrice]) -> CatalogResult<u64> {
        for input in inputs {
            validate_custom(input)?;
        }
        let s = self.session().await?;
        let rows: Vec<NewPriceOverride> = inputs
            .iter()
            .map(|input| {
                let mut row =
                    NewPriceOverride::from_custom(s.user_id, codes::generate_custom_code(), input);
                row.is_imported = true;
                row
            })
            .collect();
        batch::insert_chunked(&self.pool, s.tables, &rows).await
    }

    /// Remove an override the caller owns. A derived override reverts its
    /// code to the pristine global entry on the next merge; a custom item
    /// disappears entirely. Returns `true` if a row was removed.
    pub async fn delete_price(&self, id: DbId) -> CatalogResult<bool> {
        let s = self.session().await?;
        Ok(PriceOverrideRepo::delete(&self.pool, s.tables.overrides, id, s.user_id).await?)
    }

    /// Soft-delete an override: the row stays for provenance but stops
    /// participating in merges. Returns `true` if a row was deactivated.
    pub async fn deactivate_price(&self, id: DbId) -> CatalogResult<bool> {
        let s = self.session().await?;
        Ok(PriceOverrideRepo::deactivate(&self.pool, s.tables.overrides, id, s.user_id).await?)
    }

    // -----------------------------------------------------------------------
    // Bulk percentage adjustment
    // -----------------------------------------------------------------------

    /// Apply a uniform percentage change to every entry of the caller's
    /// catalog. Returns the number of override rows created + updated.
    pub async fn increase_all_prices(&self, percentage: f64) -> CatalogResult<u64> {
        pricing::validate_percentage(percentage, "percentage")?;
        let s = self.session().await?;
        batch::apply_percentage(
            &self.pool,
            s.tables,
            s.user_id,
            AdjustmentScope::All,
            percentage,
        )
        .await
    }

    /// Same adjustment restricted to one category.
    pub async fn increase_prices_by_category(
        &self,
        category_id: DbId,
        percentage: f64,
    ) -> CatalogResult<u64> {
        pricing::validate_percentage(percentage, "percentage")?;
        let s = self.session().await?;
        batch::apply_percentage(
            &self.pool,
            s.tables,
            s.user_id,
            AdjustmentScope::Category(category_id),
            percentage,
        )
        .await
    }

    /// The single-item variant: scale an existing override in place, or
    /// copy-on-write a new one with the scaled price.
    pub async fn increase_price_by_id(
        &self,
        id: DbId,
        percentage: f64,
    ) -> CatalogResult<EffectivePrice> {
        pricing::validate_percentage(percentage, "percentage")?;
        let s = self.session().await?;
        let factor = 1.0 + percentage / 100.0;

        if let Some(existing) =
            PriceOverrideRepo::find_by_id(&self.pool, s.tables.overrides, id, s.user_id).await?
        {
            let updated = PriceOverrideRepo::scale_final_price(
                &self.pool,
                s.tables.overrides,
                existing.id,
                s.user_id,
                factor,
            )
            .await?
            .ok_or_else(|| CoreError::not_found("price override", existing.id))?;
            return Ok(updated.into());
        }

        let Some(global) = GlobalPriceRepo::find_by_id(&self.pool, s.tables.global, id).await?
        else {
            return Err(CoreError::not_found("priced item", id).into());
        };

        if let Some(existing) = PriceOverrideRepo::find_by_code(
            &self.pool,
            s.tables.overrides,
            s.user_id,
            &global.code,
        )
        .await?
        {
            let updated = PriceOverrideRepo::scale_final_price(
                &self.pool,
                s.tables.overrides,
                existing.id,
                s.user_id,
                factor,
            )
            .await?
            .ok_or_else(|| CoreError::not_found("price override", existing.id))?;
            return Ok(updated.into());
        }

        let mut row = NewPriceOverride::from_global(&global, s.user_id);
        row.final_price = pricing::apply_percentage(global.final_price, percentage);
        let created = PriceOverrideRepo::upsert(&self.pool, s.tables.overrides, &row).await?;
        Ok(created.into())
    }

    // -----------------------------------------------------------------------
    // Category management
    // -----------------------------------------------------------------------

    /// The categories visible to the caller: shared global ones plus their
    /// own, ordered by display order.
    pub async fn list_categories(&self) -> CatalogResult<Vec<PriceCategory>> {
        let s = self.session().await?;
        Ok(CategoryRepo::list_visible(&self.pool, s.user_id).await?)
    }

    /// Create a category owned by the caller, appended after the highest
    /// display order they can see.
    pub async fn create_category(&self, input: &NewCategory) -> CatalogResult<PriceCategory> {
        if input.name.trim().is_empty() {
            return Err(CoreError::Validation("Category name must not be empty".into()).into());
        }
        let s = self.session().await?;
        Ok(CategoryRepo::create(&self.pool, s.user_id, input).await?)
    }

    /// Rename/reorder a category the caller owns. Global categories are
    /// immutable from this engine.
    pub async fn update_category(
        &self,
        id: DbId,
        input: &CategoryUpdate,
    ) -> CatalogResult<PriceCategory> {
        let s = self.session().await?;
        self.check_category_ownership(id, s.user_id).await?;
        CategoryRepo::update(&self.pool, id, s.user_id, input)
            .await?
            .ok_or_else(|| CoreError::not_found("category", id).into())
    }

    /// Delete a category the caller owns.
    pub async fn delete_category(&self, id: DbId) -> CatalogResult<bool> {
        let s = self.session().await?;
        self.check_category_ownership(id, s.user_id).await?;
        Ok(CategoryRepo::delete(&self.pool, id, s.user_id).await?)
    }

    async fn check_category_ownership(&self, id: DbId, user_id: DbId) -> CatalogResult<()> {
        let category = CategoryRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::not_found("category", id))?;
        if category.is_global() {
            return Err(
                CoreError::Forbidden("global categories cannot be modified".into()).into(),
            );
        }
        if category.owner_id != Some(user_id) {
            return Err(
                CoreError::Forbidden("only the owner may modify this category".into()).into(),
            );
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Patch resolution
// ---------------------------------------------------------------------------

/// Fold a patch into an existing override and recompute the derived
/// prices from the resulting components and margin.
fn resolve_values(existing: &PriceOverride, patch: &PriceUpdate) -> PriceOverrideValues {
    let labor = patch.labor_cost.unwrap_or(existing.labor_cost);
    let material = patch.material_cost.unwrap_or(existing.material_cost);
    let equipment = patch.equipment_cost.unwrap_or(existing.equipment_cost);
    let other = patch.other_cost.unwrap_or(existing.other_cost);
    let margin = patch.margin_percentage.unwrap_or(existing.margin_percentage);
    let base = pricing::base_price(labor, material, equipment, other);

    PriceOverrideValues {
        category_id: patch.category_id.or(existing.category_id),
        subcategory: patch
            .subcategory
            .clone()
            .or_else(|| existing.subcategory.clone()),
        description: patch
            .description
            .clone()
            .unwrap_or_else(|| existing.description.clone()),
        unit: patch.unit.clone().unwrap_or_else(|| existing.unit.clone()),
        labor_cost: labor,
        material_cost: material,
        equipment_cost: equipment,
        other_cost: other,
        base_price: base,
        margin_percentage: margin,
        final_price: pricing::final_price(base, margin),
        is_active: patch.is_active.unwrap_or(existing.is_active),
        notes: patch.notes.clone().or_else(|| existing.notes.clone()),
        color: patch.color.clone().or_else(|| existing.color.clone()),
        brand: patch.brand.clone().or_else(|| existing.brand.clone()),
        model: patch.model.clone().or_else(|| existing.model.clone()),
    }
}

/// Fold a patch into a freshly synthesized override row and recompute the
/// derived prices.
fn apply_patch(row: &mut NewPriceOverride, patch: &PriceUpdate) {
    if let Some(v) = patch.category_id {
        row.category_id = Some(v);
    }
    if patch.subcategory.is_some() {
        row.subcategory = patch.subcategory.clone();
    }
    if let Some(v) = &patch.description {
        row.description = v.clone();
    }
    if let Some(v) = &patch.unit {
        row.unit = v.clone();
    }
    if let Some(v) = patch.labor_cost {
        row.labor_cost = v;
    }
    if let Some(v) = patch.material_cost {
        row.material_cost = v;
    }
    if let Some(v) = patch.equipment_cost {
        row.equipment_cost = v;
    }
    if let Some(v) = patch.other_cost {
        row.other_cost = v;
    }
    if let Some(v) = patch.margin_percentage {
        row.margin_percentage = v;
    }
    if let Some(v) = patch.is_active {
        row.is_active = v;
    }
    if patch.notes.is_some() {
        row.notes = patch.notes.clone();
    }
    if patch.color.is_some() {
        row.color = patch.color.clone();
    }
    if patch.brand.is_some() {
        row.brand = patch.brand.clone();
    }
    if patch.model.is_some() {
        row.model = patch.model.clone();
    }
    row.base_price = pricing::base_price(
        row.labor_cost,
        row.material_cost,
        row.equipment_cost,
        row.other_cost,
    );
    row.final_price = pricing::final_price(row.base_price, row.margin_percentage);
}

/// Reject invalid monetary inputs before anything reaches storage.
fn validate_patch(patch: &PriceUpdate) -> Result<(), CoreError> {
    if let Some(v) = patch.labor_cost {
        pricing::validate_cost_component(v, "labor_cost")?;
    }
    if let Some(v) = patch.material_cost {
        pricing::validate_cost_component(v, "material_cost")?;
    }
    if let Some(v) = patch.equipment_cost {
        pricing::validate_cost_component(v, "equipment_cost")?;
    }
    if let Some(v) = patch.other_cost {
        pricing::validate_cost_component(v, "other_cost")?;
    }
    if let Some(v) = patch.margin_percentage {
        pricing::validate_percentage(v, "margin_percentage")?;
    }
    Ok(())
}

fn validate_custom(input: &NewCustomPrice) -> Result<(), CoreError> {
    if input.description.trim().is_empty() {
        return Err(CoreError::Validation("Description must not be empty".into()));
    }
    if input.unit.trim().is_empty() {
        return Err(CoreError::Validation("Unit must not be empty".into()));
    }
    pricing::validate_cost_component(input.labor_cost, "labor_cost")?;
    pricing::validate_cost_component(input.material_cost, "material_cost")?;
    pricing::validate_cost_component(input.equipment_cost, "equipment_cost")?;
    pricing::validate_cost_component(input.other_cost, "other_cost")?;
    pricing::validate_percentage(input.margin_percentage, "margin_percentage")?;
    Ok(())
}
