use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use tracing::info;

use crate::config::default_headers;

/// HTTP client wrapper for fetching a single product page.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .default_headers(default_headers())
            .timeout(Duration::from_secs(40))
            .build()?;

        Ok(Self { client })
    }

    /// Fetch the page body. Any transport error, timeout, or non-success
    /// status is a hard failure; the caller decides whether the run survives.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        info!("Starting request to URL");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to fetch product page: {}",
                response.status()
            ));
        }

        let html = response.text().await?;
        info!("Request to URL successful");

        Ok(html)
    }
}

impl Clone for Fetcher {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}
