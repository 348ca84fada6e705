// Wire-format types for the GW2 commerce REST API.

use gw2tp_core::ItemPrice;
use gw2tp_primitives::{Coins, ItemId};
use serde::Deserialize;

/// One element of the `/v2/commerce/prices` response array.
#[derive(Debug, Deserialize)]
pub(super) struct CommercePrice {
    pub(super) id: u32,
    pub(super) buys: CommerceQuote,
    pub(super) sells: CommerceQuote,
}

#[derive(Debug, Deserialize)]
pub(super) struct CommerceQuote {
    pub(super) unit_price: i64,
}

impl From<CommercePrice> for ItemPrice {
    fn from(wire: CommercePrice) -> Self {
        ItemPrice::new(
            ItemId::new(wire.id),
            Coins::from_copper(wire.buys.unit_price),
            Coins::from_copper(wire.sells.unit_price),
        )
    }
}

/// Comma-separated id list for the `ids` query parameter.
pub(super) fn join_ids(ids: &[ItemId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
