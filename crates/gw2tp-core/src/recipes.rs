//! Crafting and Mystic Forge margins priced from Trading Post quotes.
//!
//! A recipe lists one or more alternative ingredient sets. The cheapest set
//! that can be priced is the recipe's cost; revenue is the expected sale of
//! its outputs weighted by their share of attempts.

use std::{collections::HashMap, fmt};

use anyhow::{Context, Result};
use gw2tp_primitives::{Coins, Gsc, ItemId};
use tracing::{debug, instrument};

use crate::{
    error::CoreError,
    feed::{ItemPrice, PriceFetcher},
    profit::TradingPostFee,
};

/// How one ingredient is paid for.
#[derive(Debug, Clone, Copy)]
pub enum Cost {
    /// Placing a buy order at the highest bid.
    Buy(ItemId),
    /// Buying instantly from the lowest listing.
    Sell(ItemId),
    /// A fixed vendor price.
    Vendor(Coins),
    /// Crafting it, at the cheapest cost of that recipe.
    Crafted(&'static Recipe),
}

#[derive(Debug, Clone, Copy)]
pub struct Ingredient {
    pub cost: Cost,
    pub quantity: u32,
}

impl Ingredient {
    const fn buy(id: u32, quantity: u32) -> Self {
        Self {
            cost: Cost::Buy(ItemId::new(id)),
            quantity,
        }
    }

    const fn sell(id: u32, quantity: u32) -> Self {
        Self {
            cost: Cost::Sell(ItemId::new(id)),
            quantity,
        }
    }

    const fn vendor(copper: i64, quantity: u32) -> Self {
        Self {
            cost: Cost::Vendor(Coins::from_copper(copper)),
            quantity,
        }
    }

    const fn crafted(recipe: &'static Recipe, quantity: u32) -> Self {
        Self {
            cost: Cost::Crafted(recipe),
            quantity,
        }
    }

    pub fn unit_cost(&self, board: &PriceBoard) -> Result<Coins, CoreError> {
        Ok(match self.cost {
            Cost::Buy(id) => board.quote(id)?.buy,
            Cost::Sell(id) => board.quote(id)?.sell,
            Cost::Vendor(price) => price,
            Cost::Crafted(recipe) => recipe.cost(board)?.1,
        })
    }
}

/// A possible result of one attempt and its share of attempts, in percent.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub item: ItemId,
    pub percent: u32,
}

impl Output {
    const fn always(id: u32) -> Self {
        Self::share(id, 100)
    }

    const fn share(id: u32, percent: u32) -> Self {
        Self {
            item: ItemId::new(id),
            percent,
        }
    }
}

#[derive(Debug)]
pub struct Recipe {
    /// Short name used on the command line, e.g. `scholar_rune`.
    pub slug: &'static str,
    pub name: &'static str,
    pub variants: &'static [&'static [Ingredient]],
    pub outputs: &'static [Output],
}

impl Recipe {
    pub fn by_slug(slug: &str) -> Option<&'static Recipe> {
        RECIPES
            .iter()
            .copied()
            .find(|recipe| recipe.slug.eq_ignore_ascii_case(slug))
    }

    /// Every item that needs a quote to evaluate this recipe, sorted.
    ///
    /// Crafted ingredients contribute their own inputs, not their output.
    pub fn item_ids(&self) -> Vec<ItemId> {
        let mut ids = Vec::new();
        self.collect_inputs(&mut ids);
        ids.extend(self.outputs.iter().map(|output| output.item));
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    fn collect_inputs(&self, ids: &mut Vec<ItemId>) {
        for ingredient in self.variants.iter().flat_map(|variant| variant.iter()) {
            match ingredient.cost {
                Cost::Buy(id) | Cost::Sell(id) => ids.push(id),
                Cost::Vendor(_) => {}
                Cost::Crafted(recipe) => recipe.collect_inputs(ids),
            }
        }
    }

    /// Index and cost of the cheapest variant.
    ///
    /// A variant with an unquoted ingredient is skipped; the first missing
    /// price is returned only if no variant can be priced.
    pub fn cost(&self, board: &PriceBoard) -> Result<(usize, Coins), CoreError> {
        let mut best: Option<(usize, Coins)> = None;
        let mut missing = None;
        for (index, variant) in self.variants.iter().enumerate() {
            match variant_cost(variant, board) {
                Ok(total) => {
                    if best.is_none_or(|(_, cheapest)| total < cheapest) {
                        best = Some((index, total));
                    }
                }
                Err(e) => {
                    missing.get_or_insert(e);
                }
            }
        }
        match (best, missing) {
            (Some(best), _) => Ok(best),
            (None, Some(e)) => Err(e),
            (None, None) => Ok((0, Coins::ZERO)),
        }
    }

    /// Expected gross sale of the outputs, rounded down to whole copper.
    pub fn revenue(&self, board: &PriceBoard) -> Result<Coins, CoreError> {
        let mut weighted: i64 = 0;
        for output in self.outputs {
            let sell = board.quote(output.item)?.sell.copper();
            weighted = weighted.saturating_add(sell.saturating_mul(i64::from(output.percent)));
        }
        Ok(Coins::from_copper(weighted.div_euclid(100)))
    }

    pub fn evaluate(
        &self,
        board: &PriceBoard,
        fee: TradingPostFee,
    ) -> Result<CraftReport, CoreError> {
        let (variant, cost) = self.cost(board)?;
        let revenue = self.revenue(board)?;
        let sell_after_fee = fee.apply(revenue);
        let flip = match self.outputs {
            [single] => Some(board.quote(single.item)?.flip_profit(fee)),
            _ => None,
        };
        Ok(CraftReport {
            variant,
            cost,
            revenue,
            sell_after_fee,
            profit: sell_after_fee - cost,
            flip,
        })
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

fn variant_cost(variant: &[Ingredient], board: &PriceBoard) -> Result<Coins, CoreError> {
    let mut total = Coins::ZERO;
    for ingredient in variant {
        total += ingredient.unit_cost(board)? * ingredient.quantity;
    }
    Ok(total)
}

/// Quotes keyed by item, as needed to evaluate a recipe.
#[derive(Debug, Clone, Default)]
pub struct PriceBoard {
    quotes: HashMap<ItemId, ItemPrice>,
}

impl PriceBoard {
    pub fn quote(&self, id: ItemId) -> Result<&ItemPrice, CoreError> {
        self.quotes.get(&id).ok_or(CoreError::MissingPrice(id))
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl FromIterator<ItemPrice> for PriceBoard {
    fn from_iter<I: IntoIterator<Item = ItemPrice>>(iter: I) -> Self {
        Self {
            quotes: iter.into_iter().map(|p| (p.id, p)).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CraftReport {
    /// Which ingredient set was cheapest.
    pub variant: usize,
    pub cost: Coins,
    pub revenue: Coins,
    pub sell_after_fee: Coins,
    pub profit: Coins,
    /// Buy-order-to-listing margin on the output itself. Only set for
    /// recipes with a single output.
    pub flip: Option<Coins>,
}

impl CraftReport {
    pub fn is_loss(&self) -> bool {
        self.profit.is_sign_negative()
    }

    pub fn breakdown(&self) -> Gsc {
        self.profit.magnitude()
    }
}

impl fmt::Display for CraftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_loss() { "Loss" } else { "Profit" };
        write!(f, "{kind}: {}", self.breakdown())
    }
}

/// Fetch every quote `recipe` needs from `fetcher` and evaluate it.
#[instrument(skip_all, fields(recipe = recipe.slug, source = fetcher.id()))]
pub async fn quote_recipe<F: PriceFetcher>(
    fetcher: &F,
    recipe: &Recipe,
    fee: TradingPostFee,
) -> Result<CraftReport> {
    let ids = recipe.item_ids();
    let board: PriceBoard = fetcher
        .fetch_prices(&ids)
        .await
        .with_context(|| format!("failed to fetch prices from {}", fetcher.id()))?
        .into_iter()
        .collect();
    debug!(requested = ids.len(), quoted = board.len(), "recipe prices fetched");
    if board.is_empty() {
        return Err(CoreError::NoPrices.into());
    }

    let report = recipe.evaluate(&board, fee)?;
    debug!(
        variant = report.variant,
        profit = report.profit.copper(),
        "recipe evaluated"
    );
    Ok(report)
}

const ECTO: u32 = 19721;
const LUCENT_CRYSTAL: u32 = 89271;
const LUCENT_MOTE: u32 = 89140;
const CHARM_OF_BRILLIANCE: u32 = 89103;
const CHARM_OF_POTENCE: u32 = 89258;
const CHARM_OF_SKILL: u32 = 89216;
const SYMBOL_OF_ENHANCEMENT: u32 = 89141;
const SYMBOL_OF_PAIN: u32 = 89182;
const SYMBOL_OF_CONTROL: u32 = 89098;
const ELONIAN_WINE_COPPER: i64 = 2504;

pub static SCHOLAR_RUNE: Recipe = Recipe {
    slug: "scholar_rune",
    name: "Superior Rune of the Scholar",
    variants: &[
        &[
            Ingredient::buy(ECTO, 5),
            Ingredient::buy(24300, 5),
            Ingredient::buy(LUCENT_CRYSTAL, 8),
            Ingredient::buy(CHARM_OF_BRILLIANCE, 2),
        ],
        &[
            Ingredient::buy(ECTO, 5),
            Ingredient::buy(24300, 5),
            Ingredient::buy(LUCENT_MOTE, 80),
            Ingredient::buy(CHARM_OF_BRILLIANCE, 2),
        ],
    ],
    outputs: &[Output::always(24836)],
};

pub static GUARDIAN_RUNE: Recipe = Recipe {
    slug: "guardian_rune",
    name: "Superior Rune of the Guardian",
    // charged loadstones rarely fill as buy orders
    variants: &[&[
        Ingredient::sell(24305, 1),
        Ingredient::buy(CHARM_OF_POTENCE, 1),
        Ingredient::buy(ECTO, 5),
        Ingredient::buy(LUCENT_CRYSTAL, 12),
    ]],
    outputs: &[Output::always(24824)],
};

pub static DRAGONHUNTER_RUNE: Recipe = Recipe {
    slug: "dragonhunter_rune",
    name: "Superior Rune of the Dragonhunter",
    variants: &[&[
        Ingredient::crafted(&GUARDIAN_RUNE, 1),
        Ingredient::buy(68942, 1),
        Ingredient::buy(74202, 10),
    ]],
    outputs: &[Output::always(74978)],
};

pub static RELIC_OF_FIREWORKS: Recipe = Recipe {
    slug: "relic_of_fireworks",
    name: "Relic of Fireworks",
    variants: &[
        &[
            Ingredient::buy(ECTO, 15),
            Ingredient::buy(CHARM_OF_SKILL, 3),
            Ingredient::buy(LUCENT_CRYSTAL, 48),
        ],
        &[
            Ingredient::buy(ECTO, 15),
            Ingredient::buy(CHARM_OF_SKILL, 3),
            Ingredient::buy(LUCENT_MOTE, 480),
        ],
    ],
    outputs: &[Output::always(100_947)],
};

pub static RELIC_OF_THIEF: Recipe = Recipe {
    slug: "relic_of_thief",
    name: "Relic of the Thief",
    variants: &[
        &[
            Ingredient::buy(ECTO, 15),
            Ingredient::buy(CHARM_OF_SKILL, 3),
            Ingredient::buy(LUCENT_CRYSTAL, 48),
            Ingredient::buy(19737, 5),
        ],
        &[
            Ingredient::buy(ECTO, 15),
            Ingredient::buy(CHARM_OF_SKILL, 3),
            Ingredient::buy(LUCENT_MOTE, 480),
            Ingredient::buy(19737, 5),
        ],
    ],
    outputs: &[Output::always(100_916)],
};

pub static RELIC_OF_ARISTOCRACY: Recipe = Recipe {
    slug: "relic_of_aristocracy",
    name: "Relic of the Aristocracy",
    variants: &[
        &[
            Ingredient::buy(ECTO, 15),
            Ingredient::buy(CHARM_OF_SKILL, 3),
            Ingredient::buy(LUCENT_CRYSTAL, 48),
            Ingredient::vendor(ELONIAN_WINE_COPPER, 3),
        ],
        &[
            Ingredient::buy(ECTO, 15),
            Ingredient::buy(CHARM_OF_SKILL, 3),
            Ingredient::buy(LUCENT_MOTE, 480),
            Ingredient::vendor(ELONIAN_WINE_COPPER, 3),
        ],
    ],
    outputs: &[Output::always(100_849)],
};

pub static THESIS_ON_MASTERFUL_MALICE: Recipe = Recipe {
    slug: "thesis_on_masterful_malice",
    name: "Thesis on Masterful Malice",
    variants: &[&[
        Ingredient::buy(72510, 3),
        Ingredient::buy(24277, 5),
        Ingredient::buy(19725, 48),
        Ingredient::buy(19732, 10),
        Ingredient::buy(19701, 12),
        Ingredient::buy(19745, 20),
        Ingredient::buy(19790, 10),
        Ingredient::buy(70426, 3),
        Ingredient::buy(75862, 3),
        Ingredient::buy(12156, 20),
    ]],
    outputs: &[Output::always(76738)],
};

/// Three symbols in, one random symbol of the same tier out.
pub static SYMBOL_FORGE: Recipe = Recipe {
    slug: "symbol_forge",
    name: "Symbol of Enhancement (Mystic Forge)",
    variants: &[&[Ingredient::buy(SYMBOL_OF_ENHANCEMENT, 3)]],
    outputs: &[
        Output::share(SYMBOL_OF_ENHANCEMENT, 20),
        Output::share(SYMBOL_OF_PAIN, 40),
        Output::share(SYMBOL_OF_CONTROL, 40),
    ],
};

/// Three charms in, one random charm of the same tier out.
pub static CHARM_FORGE: Recipe = Recipe {
    slug: "charm_forge",
    name: "Charm of Brilliance (Mystic Forge)",
    variants: &[&[Ingredient::buy(CHARM_OF_BRILLIANCE, 3)]],
    outputs: &[
        Output::share(CHARM_OF_BRILLIANCE, 20),
        Output::share(CHARM_OF_POTENCE, 40),
        Output::share(CHARM_OF_SKILL, 40),
    ],
};

pub static RECIPES: &[&Recipe] = &[
    &SCHOLAR_RUNE,
    &GUARDIAN_RUNE,
    &DRAGONHUNTER_RUNE,
    &RELIC_OF_FIREWORKS,
    &RELIC_OF_THIEF,
    &RELIC_OF_ARISTOCRACY,
    &THESIS_ON_MASTERFUL_MALICE,
    &SYMBOL_FORGE,
    &CHARM_FORGE,
];
