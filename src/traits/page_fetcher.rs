use async_trait::async_trait;
use url::Url;

use crate::error::FetchError;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the response body of `url`.
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}
