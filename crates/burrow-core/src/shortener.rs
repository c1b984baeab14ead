use crate::error::Result;
use crate::key::UrlKey;
use async_trait::async_trait;
use jiff::Timestamp;
use typed_builder::TypedBuilder;

/// Per-request options for a shortening call.
///
/// Options are passed explicitly into every call; there is no shared mutable
/// per-request state.
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct ShortenOptions {
    /// Invalidate the mapping after its first successful resolution.
    #[builder(default)]
    pub delete_on_use: bool,
    /// Expiry instant; `None` means the mapping never expires.
    #[builder(default)]
    pub valid_until: Option<Timestamp>,
    /// Caller-supplied key overriding auto-generation. Must be non-empty
    /// when set.
    #[builder(default)]
    pub url_key: Option<String>,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Returns the short key for a target URL, creating a mapping on first
    /// use. Shortening the same URL again returns the same key.
    async fn shorten(&self, target_url: &str, options: &ShortenOptions) -> Result<UrlKey>;
}
