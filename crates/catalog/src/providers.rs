//! Interfaces to the engine's external collaborators.
//!
//! Session management and locale detection live outside this subsystem;
//! the engine only consumes their results through these traits.

use async_trait::async_trait;
use reforma_core::types::DbId;

/// Supplies the identity of the current caller.
///
/// Every engine operation resolves the caller first and fails closed with
/// [`crate::CatalogError::Unauthenticated`] when no user is available.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The current user's id, or `None` when no session is active.
    async fn current_user(&self) -> Option<DbId>;
}

/// Supplies the caller's country code.
pub trait LocaleProvider: Send + Sync {
    /// ISO country code, or `None` to use the base-country catalog.
    fn country_code(&self) -> Option<String>;
}
