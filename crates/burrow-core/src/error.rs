use thiserror::Error;

/// Result alias for service-level operations.
pub type Result<T> = std::result::Result<T, TinyUrlError>;

/// Errors reported by a mapping store backend.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("url key already exists: {0}")]
    Conflict(String),
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out: {0}")]
    Timeout(String),
    #[error("store query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("store operation failed: {0}")]
    Operation(String),
}

/// Errors surfaced by the shortening and resolution services.
///
/// All variants are passed to the caller unmodified; there is no retry or
/// fallback layer in front of them.
#[derive(Debug, Clone, Error)]
pub enum TinyUrlError {
    #[error("an empty url key was requested")]
    InvalidKey,
    #[error("target url must not be empty")]
    InvalidTargetUrl,
    #[error("url key '{0}' already points to a different target url")]
    KeyConflict(String),
    #[error("no valid mapping for key '{0}'")]
    NotFound(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
