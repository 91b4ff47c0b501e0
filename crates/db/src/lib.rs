//! PostgreSQL access layer for the pricing catalog.
//!
//! - [`models`] -- `FromRow` entity structs and create/update DTOs.
//! - [`repositories`] -- zero-sized structs with async CRUD methods taking
//!   `&PgPool` as the first argument.
//! - [`routing`] -- the static country -> table-pair router.
//!
//! Repositories that operate on a per-country table take its name as a
//! parameter, resolved up front by [`routing::resolve_tables`]; nothing
//! below the router branches on the country itself.

pub mod models;
pub mod repositories;
pub mod routing;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Database configuration loaded from environment variables.
///
/// | Env Var               | Default                          |
/// |-----------------------|----------------------------------|
/// | `DATABASE_URL`        | `postgres://localhost/reforma`   |
/// | `DB_MAX_CONNECTIONS`  | `20`                             |
/// | `DB_ACQUIRE_TIMEOUT_SECS` | `5`                          |
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl DbConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/reforma".into());

        let max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let acquire_timeout_secs: u64 = std::env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("DB_ACQUIRE_TIMEOUT_SECS must be a valid u64");

        Self {
            url,
            max_connections,
            acquire_timeout_secs,
        }
    }
}

/// Create a connection pool from a [`DbConfig`].
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
