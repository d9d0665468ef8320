//! Scripted player for headless runs.
//!
//! Each decision looks at the shop listing the way a player would see it
//! and, with some probability, buys one affordable item. Plants and
//! upgrades are preferred over the market crash, which is only bought when
//! nothing else is affordable.

use crate::{
    rng::AutoRng,
    shop::{ItemKind, ShopListing},
    types::ItemId,
};

pub struct AutoPlayer {
    rng:             AutoRng,
    /// Chance to buy something on each decision.
    purchase_chance: f64,
}

impl AutoPlayer {
    pub fn new(seed: u64, purchase_chance: f64) -> Self {
        Self {
            rng: AutoRng::new(seed),
            purchase_chance: purchase_chance.clamp(0.0, 1.0),
        }
    }

    /// Pick the next item to buy, if any.
    pub fn choose(&mut self, listing: &[ShopListing]) -> Option<ItemId> {
        if !self.rng.chance(self.purchase_chance) {
            return None;
        }

        let growth: Vec<&ShopListing> = listing
            .iter()
            .filter(|l| l.affordable && l.kind != ItemKind::Reset)
            .collect();
        if !growth.is_empty() {
            let pick = self.rng.next_below(growth.len());
            return Some(growth[pick].id.clone());
        }

        listing
            .iter()
            .find(|l| l.affordable && l.kind == ItemKind::Reset)
            .map(|l| l.id.clone())
    }
}
