//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Repositories over the
//! per-country price tables additionally take the physical table name,
//! resolved once by [`crate::routing::resolve_tables`].

pub mod category_repo;
pub mod global_price_repo;
pub mod price_override_repo;

pub use category_repo::CategoryRepo;
pub use global_price_repo::GlobalPriceRepo;
pub use price_override_repo::PriceOverrideRepo;
