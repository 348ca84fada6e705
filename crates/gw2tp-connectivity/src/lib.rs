pub mod gw2;

mod fixed;

use anyhow::Result;
pub use fixed::FixedPrices;
use gw2tp_core::{ItemPrice, PriceFetcher};
use gw2tp_primitives::ItemId;
pub use gw2::CommerceClient;

// ---------------------------------------------------------------------------
// AnySource: runtime price source dispatch via enum
// ---------------------------------------------------------------------------

/// Runtime dispatch between price sources.
///
/// Lets `RefreshCycle<AnySource>` run against either the live API or a
/// fixed board without `Box<dyn PriceFetcher>`.
pub enum AnySource {
    /// Live GW2 commerce API.
    Live(CommerceClient),
    /// In-memory price board.
    Fixed(FixedPrices),
}

impl PriceFetcher for AnySource {
    fn id(&self) -> &'static str {
        match self {
            Self::Live(s) => s.id(),
            Self::Fixed(s) => s.id(),
        }
    }

    async fn fetch_prices(&self, ids: &[ItemId]) -> Result<Vec<ItemPrice>> {
        match self {
            Self::Live(s) => s.fetch_prices(ids).await,
            Self::Fixed(s) => s.fetch_prices(ids).await,
        }
    }
}

impl From<CommerceClient> for AnySource {
    fn from(client: CommerceClient) -> Self {
        Self::Live(client)
    }
}

impl From<FixedPrices> for AnySource {
    fn from(board: FixedPrices) -> Self {
        Self::Fixed(board)
    }
}

#[cfg(test)]
mod tests {
    use gw2tp_primitives::Coins;

    use super::*;

    #[tokio::test]
    async fn test_any_source_fixed_id_and_fetch() -> Result<()> {
        let any = AnySource::from(FixedPrices::sample_board());
        assert_eq!(any.id(), "fixed");

        let prices = any.fetch_prices(&[ItemId::new(19721)]).await?;
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].sell, Coins::from_copper(3_118));
        Ok(())
    }

    #[test]
    fn test_any_source_live_id() -> Result<()> {
        let any = AnySource::from(CommerceClient::new()?);
        assert_eq!(any.id(), "gw2-commerce");
        Ok(())
    }
}
