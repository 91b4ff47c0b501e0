//! Pricing catalog resolution and override engine.
//!
//! The shared global catalog is an immutable reference dataset; each
//! user's edits live in a sparse overlay of override rows keyed by the
//! item's natural `code`. This crate implements the read-time merge of
//! the two layers, copy-on-write materialization of overrides on first
//! edit, creation of fully custom items, bulk percentage adjustments,
//! and owner-scoped category management.
//!
//! Identity and locale arrive through the provider traits in
//! [`providers`]; storage is a `sqlx` Postgres pool handed to
//! [`CatalogService::new`].

mod batch;
pub mod error;
pub mod merge;
pub mod providers;
pub mod service;

pub use error::{CatalogError, CatalogResult};
pub use service::CatalogService;
