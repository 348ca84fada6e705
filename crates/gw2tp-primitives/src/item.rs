use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

/// Trading Post item identifier as used by the GW2 API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u32);

impl ItemId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ItemId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// An item the toolkit watches by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedItem {
    pub id: ItemId,
    /// Short name used on the command line, e.g. `scholar_rune`.
    pub slug: &'static str,
    pub name: &'static str,
}

impl TrackedItem {
    const fn new(id: u32, slug: &'static str, name: &'static str) -> Self {
        Self {
            id: ItemId::new(id),
            slug,
            name,
        }
    }

    pub fn by_slug(slug: &str) -> Option<&'static TrackedItem> {
        TRACKED_ITEMS
            .iter()
            .find(|item| item.slug.eq_ignore_ascii_case(slug))
    }

    pub fn by_id(id: ItemId) -> Option<&'static TrackedItem> {
        TRACKED_ITEMS.iter().find(|item| item.id == id)
    }
}

impl fmt::Display for TrackedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Runes and relics whose crafting margins the price history follows.
pub const TRACKED_ITEMS: &[TrackedItem] = &[
    TrackedItem::new(24836, "scholar_rune", "Superior Rune of the Scholar"),
    TrackedItem::new(24824, "guardian_rune", "Superior Rune of the Guardian"),
    TrackedItem::new(74978, "dragonhunter_rune", "Superior Rune of the Dragonhunter"),
    TrackedItem::new(100947, "relic_of_fireworks", "Relic of Fireworks"),
    TrackedItem::new(100916, "relic_of_thief", "Relic of the Thief"),
    TrackedItem::new(100849, "relic_of_aristocracy", "Relic of the Aristocracy"),
    TrackedItem::new(19721, "ecto", "Glob of Ectoplasm"),
];
