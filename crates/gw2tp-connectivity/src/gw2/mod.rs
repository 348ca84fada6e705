mod rest;
mod types;

use std::{borrow::Cow, time::Duration};

use anyhow::{Context, Result};
use gw2tp_core::{ItemPrice, PriceFetcher};
use gw2tp_primitives::ItemId;
use reqwest::Client;
use tracing::instrument;

pub const GW2_API_URL: &str = "https://api.guildwars2.com";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the public GW2 commerce endpoints. No API key is needed for
/// prices.
pub struct CommerceClient {
    client: Client,
    base_url: Cow<'static, str>,
}

impl CommerceClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: Cow::Borrowed(GW2_API_URL),
        })
    }

    /// Point the client at a mirror or a mock server. A trailing `/` is
    /// dropped.
    pub fn set_base_url(&mut self, url: &str) {
        self.base_url = Cow::Owned(url.trim_end_matches('/').to_string());
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl PriceFetcher for CommerceClient {
    fn id(&self) -> &'static str {
        "gw2-commerce"
    }

    #[instrument(skip(self, ids), fields(items = ids.len()))]
    async fn fetch_prices(&self, ids: &[ItemId]) -> Result<Vec<ItemPrice>> {
        self.rest_prices(ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commerce_client_defaults() -> Result<()> {
        let client = CommerceClient::new()?;
        assert_eq!(client.id(), "gw2-commerce");
        assert_eq!(client.base_url(), GW2_API_URL);
        Ok(())
    }

    #[test]
    fn test_set_base_url_trims_trailing_slash() -> Result<()> {
        let mut client = CommerceClient::new()?;
        client.set_base_url("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
        Ok(())
    }
}
