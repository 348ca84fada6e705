// GW2 commerce REST API: price lookups.

use anyhow::{Context, Result, bail};
use gw2tp_core::ItemPrice;
use gw2tp_primitives::ItemId;
use tracing::{debug, info};

use super::types::{CommercePrice, join_ids};

const PRICES_PATH: &str = "/v2/commerce/prices";

impl super::CommerceClient {
    pub(super) async fn rest_prices(&self, ids: &[ItemId]) -> Result<Vec<ItemPrice>> {
        let url = format!("{}{}?ids={}", self.base_url, PRICES_PATH, join_ids(ids));

        debug!(url = %url, "requesting prices");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .context("commerce API returned an error status")?;

        let wire: Vec<CommercePrice> = resp
            .json()
            .await
            .context("Failed to parse commerce prices response")?;

        if wire.is_empty() {
            bail!("no items found");
        }

        let prices: Vec<ItemPrice> = wire.into_iter().map(ItemPrice::from).collect();
        info!(requested = ids.len(), received = prices.len(), "prices received");
        Ok(prices)
    }
}
