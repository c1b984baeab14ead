use crate::error::Result;
use crate::key::UrlKey;
use async_trait::async_trait;

#[async_trait]
pub trait Resolver: Send + Sync + 'static {
    /// Resolves a key to its target URL.
    ///
    /// Fails with `NotFound` if the key is unknown, expired, or was already
    /// consumed. One-time mappings are deleted as part of the same
    /// resolution, so at most one resolution of such a key ever succeeds.
    async fn resolve(&self, key: &UrlKey) -> Result<String>;
}
