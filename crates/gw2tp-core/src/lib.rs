//! Core logic for the Trading Post toolkit.
//!
//! UI state lives in small cloneable surfaces ([`widget::Label`],
//! [`widget::Popup`]) that are handed to the components which write to
//! them. Nothing in this crate reaches for a global document.

pub mod error;
pub mod feed;
pub mod history;
pub mod last_updated;
pub mod notifier;
pub mod profit;
pub mod recipes;
pub mod refresh;
pub mod scheduler;
pub mod widget;

pub use error::CoreError;
pub use feed::{ItemPrice, PriceFetcher, PriceSnapshot};
pub use history::PriceHistory;
pub use last_updated::{LastUpdated, format_elapsed};
pub use notifier::Notifier;
pub use profit::{ManualTrade, PriceEntry, ProfitReport, TradingPostFee, calculate_manual_profit};
pub use recipes::{CraftReport, PriceBoard, RECIPES, Recipe, quote_recipe};
pub use refresh::RefreshCycle;
pub use scheduler::{Schedule, SchedulerCommand, run_scheduler};
pub use widget::{Color, Label, Popup};
