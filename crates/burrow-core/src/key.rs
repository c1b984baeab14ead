use crate::error::TinyUrlError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;

/// Short textual key used in outward-facing tiny URLs.
///
/// A key is either derived from a store-assigned identifier or supplied by
/// the caller as a custom key. Custom keys must be non-empty; beyond that,
/// key policy is the caller's concern.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UrlKey(SmolStr);

impl UrlKey {
    /// Creates a custom key after validating that it is non-empty.
    pub fn custom(key: impl Into<SmolStr>) -> Result<Self, TinyUrlError> {
        let key = key.into();
        if key.is_empty() {
            return Err(TinyUrlError::InvalidKey);
        }
        Ok(Self(key))
    }

    /// Derives the key for a store-assigned identifier.
    ///
    /// Encodes the identifier's minimal big-endian bytes as base58. The
    /// mapping is injective over `u64`, so the auto-generated path never
    /// needs a collision re-check against previously derived keys.
    pub fn from_identifier(identifier: u64) -> Self {
        let bytes = identifier.to_be_bytes();
        let start = bytes
            .iter()
            .position(|byte| *byte != 0)
            .unwrap_or(bytes.len() - 1);
        let encoded = bs58::encode(&bytes[start..]).into_string();
        Self(SmolStr::new(encoded))
    }

    /// Creates a key without validation.
    ///
    /// Use this only for key material read back from the store, which was
    /// validated when it was written.
    pub fn new_unchecked(key: impl Into<SmolStr>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UrlKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
