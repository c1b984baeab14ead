use crate::fingerprint::Fingerprint;
use crate::key::UrlKey;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A persisted tiny-URL mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRecord {
    /// Store-assigned sequence number; never reused.
    pub identifier: u64,
    /// The original, full-length URL being shortened.
    pub target_url: String,
    /// Dedup lookup key; a pure function of `target_url`.
    pub fingerprint: Fingerprint,
    /// Outward-facing key. `None` only inside the two-phase window while the
    /// derived key is being assigned; lookups treat keyless rows as absent.
    pub key: Option<UrlKey>,
    /// Delete the record as part of its first successful resolution.
    pub delete_on_use: bool,
    /// After this instant the record no longer resolves.
    pub valid_until: Option<Timestamp>,
    /// Number of successful resolutions.
    pub hit_count: u64,
}

impl MappingRecord {
    /// Whether the record has passed its expiry instant.
    pub fn is_expired(&self) -> bool {
        self.valid_until
            .is_some_and(|valid_until| Timestamp::now() >= valid_until)
    }
}

/// Insert payload for a new mapping.
#[derive(Debug, Clone)]
pub struct NewMapping {
    pub target_url: String,
    pub fingerprint: Fingerprint,
    /// Pre-assigned custom key, or `None` to assign a derived key after
    /// insert.
    pub key: Option<UrlKey>,
    pub delete_on_use: bool,
    pub valid_until: Option<Timestamp>,
}
