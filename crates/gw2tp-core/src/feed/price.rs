use anyhow::Result;
use chrono::{DateTime, Utc};
use gw2tp_primitives::{Coins, ItemId};
use serde::{Deserialize, Serialize};

use crate::profit::TradingPostFee;

/// Current Trading Post quote for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPrice {
    pub id: ItemId,
    /// Highest buy order.
    pub buy: Coins,
    /// Lowest sell listing.
    pub sell: Coins,
}

impl ItemPrice {
    pub fn new(id: ItemId, buy: Coins, sell: Coins) -> Self {
        Self { id, buy, sell }
    }

    pub fn sell_after_fee(&self, fee: TradingPostFee) -> Coins {
        fee.apply(self.sell)
    }

    /// Profit from filling a buy order and relisting at the lowest sell
    /// price.
    pub fn flip_profit(&self, fee: TradingPostFee) -> Coins {
        self.sell_after_fee(fee) - self.buy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub price: ItemPrice,
    pub recorded_at: DateTime<Utc>,
}

impl PriceSnapshot {
    pub fn new(price: ItemPrice, recorded_at: DateTime<Utc>) -> Self {
        Self { price, recorded_at }
    }
}

/// A source of Trading Post prices.
// `async_fn_in_trait`: used through generics only (`RefreshCycle<F>`), never
// as `dyn PriceFetcher`; `Send` is checked where the concrete future is
// spawned.
#[allow(async_fn_in_trait)]
pub trait PriceFetcher: Send + Sync {
    fn id(&self) -> &'static str;

    /// Fetch the current quote for every id the source knows about. Ids the
    /// source cannot price are omitted from the result.
    async fn fetch_prices(&self, ids: &[ItemId]) -> Result<Vec<ItemPrice>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_profit_applies_fee_to_sell_side() {
        let price = ItemPrice::new(
            ItemId::new(19721),
            Coins::from_copper(3_000),
            Coins::from_copper(4_000),
        );
        let fee = TradingPostFee::default();
        assert_eq!(price.sell_after_fee(fee), Coins::from_copper(3_400));
        assert_eq!(price.flip_profit(fee), Coins::from_copper(400));
    }

    #[test]
    fn test_flip_profit_can_be_negative() {
        let price = ItemPrice::new(
            ItemId::new(24836),
            Coins::from_copper(1_000),
            Coins::from_copper(1_001),
        );
        // floor(1001 * 0.85) = 850
        assert_eq!(
            price.flip_profit(TradingPostFee::default()),
            Coins::from_copper(-150)
        );
    }

    #[test]
    fn test_snapshot_serialization() -> Result<()> {
        let snapshot = PriceSnapshot::new(
            ItemPrice::new(
                ItemId::new(24836),
                Coins::from_copper(120),
                Coins::from_copper(150),
            ),
            Utc::now(),
        );
        let json = serde_json::to_string(&snapshot)?;
        assert!(json.contains("\"id\":24836"));
        let back: PriceSnapshot = serde_json::from_str(&json)?;
        assert_eq!(back, snapshot);
        Ok(())
    }
}
