use reforma_core::error::CoreError;

/// Engine-level error type.
///
/// Wraps [`CoreError`] for domain failures and `sqlx::Error` for storage
/// failures. Nothing here retries: every failure propagates to the caller,
/// which owns the translation into user-facing messages.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// No resolvable caller identity; the operation never reaches storage.
    #[error("Not authenticated")]
    Unauthenticated,

    /// A domain-level error from `reforma-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An underlying storage failure.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Convenience type alias for engine operation results.
pub type CatalogResult<T> = Result<T, CatalogError>;
