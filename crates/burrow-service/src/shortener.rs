use async_trait::async_trait;
use burrow_core::error::{Result, StoreError, TinyUrlError};
use burrow_core::{Fingerprint, MappingStore, NewMapping, ShortenOptions, Shortener, UrlKey};
use std::sync::Arc;
use tracing::debug;

/// A concrete implementation of the [`Shortener`] trait.
///
/// Wraps a [`MappingStore`] and handles fingerprint dedup, custom-key
/// reservation, and the two-phase derived-key assignment for new rows.
/// Conflicts are detected before insert where possible; a concurrent
/// reservation losing the store's unique-constraint race surfaces the same
/// way as a pre-checked conflict.
#[derive(Debug, Clone)]
pub struct ShortenerService<S> {
    store: Arc<S>,
}

/// Outcome of checking a requested custom key against the store.
enum CustomKey {
    /// The key already maps this exact URL; no insert needed.
    Reused(UrlKey),
    /// The key is free and can be pre-assigned on insert.
    Available(UrlKey),
}

impl<S: MappingStore> ShortenerService<S> {
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

    async fn check_custom_key(&self, raw: &str, fingerprint: &Fingerprint) -> Result<CustomKey> {
        let key = UrlKey::custom(raw)?;

        match self.store.find_by_key(&key).await? {
            Some(existing) if existing.fingerprint != *fingerprint => {
                Err(TinyUrlError::KeyConflict(key.to_string()))
            }
            Some(_) => Ok(CustomKey::Reused(key)),
            None => Ok(CustomKey::Available(key)),
        }
    }
}

#[async_trait]
impl<S: MappingStore> Shortener for ShortenerService<S> {
    async fn shorten(&self, target_url: &str, options: &ShortenOptions) -> Result<UrlKey> {
        if target_url.is_empty() {
            return Err(TinyUrlError::InvalidTargetUrl);
        }

        let fingerprint = Fingerprint::of(target_url);

        if let Some(existing) = self.store.find_by_fingerprint(&fingerprint).await? {
            // A 256-bit fingerprint does not collide by accident; a mismatch
            // means the stored data is corrupt.
            if existing.target_url != target_url {
                return Err(TinyUrlError::Store(StoreError::InvalidData(format!(
                    "fingerprint {fingerprint} is bound to a different target url"
                ))));
            }

            return match existing.key {
                Some(key) => {
                    debug!(key = %key, "reusing existing tiny url mapping");
                    Ok(key)
                }
                None => Err(TinyUrlError::Store(StoreError::InvalidData(
                    "live mapping without a key".to_string(),
                ))),
            };
        }

        if let Some(raw) = options.url_key.as_deref() {
            return match self.check_custom_key(raw, &fingerprint).await? {
                CustomKey::Reused(key) => Ok(key),
                CustomKey::Available(key) => {
                    let mapping = NewMapping {
                        target_url: target_url.to_string(),
                        fingerprint,
                        key: Some(key.clone()),
                        delete_on_use: options.delete_on_use,
                        valid_until: options.valid_until,
                    };

                    match self.store.insert(mapping).await {
                        Ok(identifier) => {
                            debug!(identifier, key = %key, "created mapping with custom key");
                            Ok(key)
                        }
                        Err(StoreError::Conflict(_)) => {
                            Err(TinyUrlError::KeyConflict(key.to_string()))
                        }
                        Err(err) => Err(err.into()),
                    }
                }
            };
        }

        // Auto path: insert first, then assign the key derived from the
        // store-assigned identifier. The row stays invisible to lookups
        // until the key lands.
        let mapping = NewMapping {
            target_url: target_url.to_string(),
            fingerprint,
            key: None,
            delete_on_use: options.delete_on_use,
            valid_until: options.valid_until,
        };

        let identifier = self.store.insert(mapping).await?;
        let key = UrlKey::from_identifier(identifier);
        self.store.update_key(identifier, &key).await?;

        debug!(identifier, key = %key, "created tiny url mapping");
        Ok(key)
    }
}
