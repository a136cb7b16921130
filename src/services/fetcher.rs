use std::time::Duration;

use async_trait::async_trait;
use bon::bon;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::error::FetchError;
use crate::traits::page_fetcher::PageFetcher;

/// Fetches pages over HTTP(S) with a browser user agent, since some sites
/// reject default client agents.
pub struct HttpPageFetcher {
    client: Client,
}

#[bon]
impl HttpPageFetcher {
    #[builder]
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        info!(url = %url, "page: fetch");
        let request_err = |source| FetchError::Request { url: url.to_string(), source };

        let response = self.client.get(url.clone()).send().await.map_err(request_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status });
        }

        let body = response.text().await.map_err(request_err)?;
        debug!(url = %url, bytes = body.len(), "page: fetched");
        Ok(body)
    }
}
