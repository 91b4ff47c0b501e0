//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the write paths that accept caller input
//!
//! The global price table has no create/update DTO: it is seeded and
//! maintained by catalog administrators outside this engine's write path.

pub mod category;
pub mod effective_price;
pub mod global_price;
pub mod price_override;
