use clap::{Parser, Subcommand};
use gw2tp_core::Recipe;
use gw2tp_primitives::{ItemId, TrackedItem};

/// Accepts a tracked item slug (`scholar_rune`) or a numeric item id.
fn parse_item(s: &str) -> Result<ItemId, String> {
    if let Some(item) = TrackedItem::by_slug(s) {
        return Ok(item.id);
    }
    s.parse::<ItemId>()
        .map_err(|_| format!("unknown item '{s}': expected a tracked item name or a numeric id"))
}

fn parse_recipe(s: &str) -> Result<&'static Recipe, String> {
    Recipe::by_slug(s).ok_or_else(|| format!("unknown recipe '{s}': see 'help' for the list"))
}

#[derive(Parser, Debug)]
#[command(name = "", bin_name = "", disable_help_subcommand = true)]
pub struct ReplCli {
    #[command(subcommand)]
    pub command: ReplCommand,
}

#[derive(Subcommand, Debug)]
pub enum ReplCommand {
    /// Net profit of buying at one price and selling at another after the
    /// Trading Post fee. Missing or non-numeric fields count as 0.
    Profit {
        #[arg(long = "buy-g", allow_hyphen_values = true)]
        buy_gold: Option<String>,
        #[arg(long = "buy-s", allow_hyphen_values = true)]
        buy_silver: Option<String>,
        #[arg(long = "buy-c", allow_hyphen_values = true)]
        buy_copper: Option<String>,
        #[arg(long = "sell-g", allow_hyphen_values = true)]
        sell_gold: Option<String>,
        #[arg(long = "sell-s", allow_hyphen_values = true)]
        sell_silver: Option<String>,
        #[arg(long = "sell-c", allow_hyphen_values = true)]
        sell_copper: Option<String>,
    },
    Refresh,
    /// Latest fetched quote for one item, or for every watched item.
    Price {
        #[arg(value_parser = parse_item)]
        item: Option<ItemId>,
    },
    Status,
    /// Quotes recorded for an item over the last 24 hours.
    History {
        #[arg(value_parser = parse_item)]
        item: ItemId,
    },
    Watch {
        #[arg(value_parser = parse_item)]
        item: ItemId,
    },
    Unwatch {
        #[arg(value_parser = parse_item)]
        item: ItemId,
    },
    /// Cost of the cheapest ingredient set against the fee-adjusted sale.
    Craft {
        #[arg(value_parser = parse_recipe)]
        recipe: &'static Recipe,
    },
    #[command(name = "quit", visible_alias = "exit")]
    Quit,
    Help,
}
