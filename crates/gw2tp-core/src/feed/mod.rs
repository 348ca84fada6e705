mod price;

pub use price::{ItemPrice, PriceFetcher, PriceSnapshot};
