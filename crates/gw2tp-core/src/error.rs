use gw2tp_primitives::ItemId;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    #[error("Invalid Fee: rate {0} is outside 0..=1")]
    InvalidFee(Decimal),

    #[error("Empty Watch List: no items to fetch prices for")]
    EmptyWatchList,

    #[error("No Prices: source returned no items")]
    NoPrices,

    #[error("Missing Price: no quote for item {0}")]
    MissingPrice(ItemId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatting_invalid_fee() {
        let err = CoreError::InvalidFee(Decimal::new(15, 1));
        assert_eq!(format!("{err}"), "Invalid Fee: rate 1.5 is outside 0..=1");
    }

    #[test]
    fn test_error_formatting_empty_watch_list() {
        assert_eq!(
            format!("{}", CoreError::EmptyWatchList),
            "Empty Watch List: no items to fetch prices for"
        );
    }

    #[test]
    fn test_error_formatting_no_prices() {
        assert_eq!(
            format!("{}", CoreError::NoPrices),
            "No Prices: source returned no items"
        );
    }

    #[test]
    fn test_error_formatting_missing_price() {
        assert_eq!(
            CoreError::MissingPrice(ItemId::new(19721)).to_string(),
            "Missing Price: no quote for item 19721"
        );
    }
}
