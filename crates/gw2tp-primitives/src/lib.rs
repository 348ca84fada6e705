pub mod coins;
pub mod item;

pub use coins::{COPPER_PER_GOLD, COPPER_PER_SILVER, Coins, Gsc};
pub use item::{ItemId, TRACKED_ITEMS, TrackedItem};
