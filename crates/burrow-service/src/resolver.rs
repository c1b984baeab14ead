use async_trait::async_trait;
use burrow_core::error::{Result, TinyUrlError};
use burrow_core::{MappingStore, Resolver, UrlKey};
use std::sync::Arc;
use tracing::{debug, trace};

/// A concrete implementation of the [`Resolver`] trait.
///
/// Looks up the mapping for a key, enforces expiry, consumes one-time
/// mappings, and counts successful resolutions.
#[derive(Debug, Clone)]
pub struct ResolverService<S> {
    store: Arc<S>,
}

impl<S: MappingStore> ResolverService<S> {
    /// Creates a service owning a fresh store handle.
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Creates a service sharing an existing store handle.
    pub fn shared(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: MappingStore> Resolver for ResolverService<S> {
    async fn resolve(&self, key: &UrlKey) -> Result<String> {
        trace!(key = %key, "resolving tiny url key");

        let Some(record) = self.store.find_by_key(key).await? else {
            return Err(TinyUrlError::NotFound(key.to_string()));
        };

        // Stores already filter expired rows; re-check so a backend racing
        // the expiry instant still never resolves a stale row.
        if record.is_expired() {
            debug!(key = %key, "mapping has expired");
            return Err(TinyUrlError::NotFound(key.to_string()));
        }

        if record.delete_on_use {
            // The conditional delete is the success gate: losing it means a
            // concurrent resolution already consumed this key.
            if !self.store.delete_by_key(key).await? {
                return Err(TinyUrlError::NotFound(key.to_string()));
            }
            debug!(key = %key, "one-time mapping consumed");
            return Ok(record.target_url);
        }

        self.store.increment_hit_count(key).await?;
        debug!(key = %key, url = %record.target_url, "resolved tiny url key");
        Ok(record.target_url)
    }
}
