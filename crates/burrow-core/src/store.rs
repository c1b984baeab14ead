use crate::error::StoreError;
use crate::fingerprint::Fingerprint;
use crate::key::UrlKey;
use crate::record::{MappingRecord, NewMapping};
use async_trait::async_trait;

type Result<T> = std::result::Result<T, StoreError>;

/// Persistence contract for tiny-URL mappings.
///
/// The store is the single source of truth. Implementations must provide
/// atomic identifier assignment on insert, and atomic insert-if-absent
/// semantics for pre-assigned keys: a unique-constraint violation is
/// reported as [`StoreError::Conflict`], never as a generic fault.
#[async_trait]
pub trait MappingStore: Send + Sync + 'static {
    /// Looks up the live mapping for a target-URL fingerprint.
    ///
    /// Keyless rows (mid two-phase insert) and expired rows are treated as
    /// absent.
    async fn find_by_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<MappingRecord>>;

    /// Looks up the live mapping for an outward-facing key.
    async fn find_by_key(&self, key: &UrlKey) -> Result<Option<MappingRecord>>;

    /// Inserts a new mapping and returns the store-assigned identifier.
    async fn insert(&self, mapping: NewMapping) -> Result<u64>;

    /// Assigns the derived key to a freshly inserted keyless row.
    async fn update_key(&self, identifier: u64, key: &UrlKey) -> Result<()>;

    /// Deletes the mapping for a key. Returns `true` if a row was removed.
    ///
    /// The return value is the success gate for one-time keys: of two
    /// concurrent deletes for the same key, at most one observes `true`.
    async fn delete_by_key(&self, key: &UrlKey) -> Result<bool>;

    /// Increments the resolution counter for a key. Counting a key that was
    /// deleted concurrently is a no-op, not an error.
    async fn increment_hit_count(&self, key: &UrlKey) -> Result<()>;
}
