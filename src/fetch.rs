//! The page-loading capability consumed by the pipeline.

use async_trait::async_trait;
use kenning_fetch::{FetchError, FetchResult, PageFetcher};

/// Something that can turn a URL into extracted page text.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Load `url` and extract its readable text.
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError>;
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        PageFetcher::fetch(self, url).await
    }
}
