use crate::common::error::Result;
use async_trait::async_trait;

/// Source of raw catalog documents.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the body of `url` as text. Fails with `CatalogError::Fetch` once
    /// the implementation's retry budget is spent.
    async fn fetch(&self, url: &str) -> Result<String>;
}
