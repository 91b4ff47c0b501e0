//! Shared fixtures for engine integration tests: pinned identity/locale
//! providers, user creation, and seeding of global entries the way the
//! administrative pipeline would (derived prices precomputed).

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use reforma_catalog::providers::{IdentityProvider, LocaleProvider};
use reforma_catalog::CatalogService;
use reforma_core::types::DbId;
use sqlx::PgPool;

pub const TOLERANCE: f64 = 1e-6;

/// Identity provider pinned to one user, or to no session at all.
pub struct FixedIdentity(pub Option<DbId>);

#[async_trait]
impl IdentityProvider for FixedIdentity {
    async fn current_user(&self) -> Option<DbId> {
        self.0
    }
}

/// Locale provider pinned to one country code.
pub struct FixedLocale(pub Option<String>);

impl LocaleProvider for FixedLocale {
    fn country_code(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Build a service for a pinned user and country.
pub fn service(pool: &PgPool, user: Option<DbId>, country: Option<&str>) -> CatalogService {
    CatalogService::new(
        pool.clone(),
        Arc::new(FixedIdentity(user)),
        Arc::new(FixedLocale(country.map(str::to_string))),
    )
}

pub async fn create_user(pool: &PgPool, email: &str) -> DbId {
    let row: (DbId,) = sqlx::query_as("INSERT INTO users (email) VALUES ($1) RETURNING id")
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

/// Id of a seeded global category by name.
pub async fn category_id(pool: &PgPool, name: &str) -> DbId {
    let row: (DbId,) =
        sqlx::query_as("SELECT id FROM price_categories WHERE name = $1 AND owner_id IS NULL")
            .bind(name)
            .fetch_one(pool)
            .await
            .unwrap();
    row.0
}

/// Seed a global entry into `table` with derived prices precomputed from
/// the components and margin. Returns the row id.
pub async fn seed_global_price(
    pool: &PgPool,
    table: &str,
    code: &str,
    category: Option<DbId>,
    components: [f64; 4],
    margin: f64,
) -> DbId {
    let base: f64 = components.iter().sum();
    let final_price = base * (1.0 + margin / 100.0);
    let query = format!(
        "INSERT INTO {table} \
            (code, category_id, description, unit, \
             labor_cost, material_cost, equipment_cost, other_cost, \
             base_price, margin_percentage, final_price) \
         VALUES ($1, $2, $3, 'm2', $4, $5, $6, $7, $8, $9, $10) \
         RETURNING id"
    );
    let row: (DbId,) = sqlx::query_as(&query)
        .bind(code)
        .bind(category)
        .bind(format!("Seeded item {code}"))
        .bind(components[0])
        .bind(components[1])
        .bind(components[2])
        .bind(components[3])
        .bind(base)
        .bind(margin)
        .bind(final_price)
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

/// Count all override rows for an owner in `table`, active or not.
pub async fn count_overrides(pool: &PgPool, table: &str, owner: DbId) -> i64 {
    let query = format!("SELECT COUNT(*) FROM {table} WHERE owner_id = $1");
    let row: (i64,) = sqlx::query_as(&query)
        .bind(owner)
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}
