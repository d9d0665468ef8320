//! Shop catalog: item definitions, cost curves, and purchase resolution.
//!
//! The catalog resolves a purchase against a balance it is handed and
//! returns the effect. It never touches the simulation: the caller debits
//! the balance and applies the effect (see `GameSession::purchase`).

use crate::{
    config::{GameConfig, ItemDefinition},
    error::{SimError, SimResult},
    types::{ItemId, Leafs},
};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};

/// What buying an item does.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemEffect {
    /// Adds leafs/sec to the flat production bonus. Shown in the plant grid.
    FlatRate { rate: f64 },
    /// Multiplies total production. Usually one-time.
    Multiplier { factor: f64 },
    /// Resets the cost of every flat-rate item to its base cost.
    CostReset,
}

impl ItemEffect {
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::FlatRate { .. }   => ItemKind::Plant,
            Self::Multiplier { .. } => ItemKind::Upgrade,
            Self::CostReset         => ItemKind::Reset,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Plant,
    Upgrade,
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShopItem {
    pub id:          ItemId,
    pub name:        String,
    pub description: String,
    base_cost:       u64,
    current_cost:    u64,
    cost_growth:     f64,
    one_time:        bool,
    purchased:       bool,
    effect:          ItemEffect,
}

impl ShopItem {
    fn from_definition(def: &ItemDefinition) -> SimResult<Self> {
        let invalid = |reason: String| SimError::InvalidCatalog {
            item_id: def.id.clone(),
            reason,
        };

        if def.id.trim().is_empty() {
            return Err(invalid("empty id".into()));
        }
        if !(def.cost_growth.is_finite() && def.cost_growth >= 1.0) {
            return Err(invalid(format!("cost_growth {} must be >= 1.0", def.cost_growth)));
        }
        match def.effect {
            ItemEffect::FlatRate { rate } if !(rate.is_finite() && rate > 0.0) => {
                return Err(invalid(format!("flat rate {rate} must be > 0")));
            }
            ItemEffect::Multiplier { factor } if !(factor.is_finite() && factor > 1.0) => {
                return Err(invalid(format!("multiplier {factor} must be > 1.0")));
            }
            _ => {}
        }

        Ok(Self {
            id:           def.id.clone(),
            name:         def.name.clone(),
            description:  def.description.clone(),
            base_cost:    def.base_cost,
            current_cost: def.base_cost,
            cost_growth:  def.cost_growth,
            one_time:     def.one_time,
            purchased:    false,
            effect:       def.effect,
        })
    }

    pub fn base_cost(&self) -> u64 { self.base_cost }
    pub fn current_cost(&self) -> u64 { self.current_cost }
    pub fn cost_growth(&self) -> f64 { self.cost_growth }
    pub fn is_one_time(&self) -> bool { self.one_time }
    pub fn is_purchased(&self) -> bool { self.purchased }
    pub fn effect(&self) -> ItemEffect { self.effect }

    /// One-time item already bought.
    pub fn is_owned(&self) -> bool {
        self.one_time && self.purchased
    }

    fn is_upgrade(&self) -> bool {
        matches!(self.effect, ItemEffect::Multiplier { .. })
    }
}

/// Next cost after one purchase: `floor(cost × growth)`.
pub fn grow_cost(cost: u64, growth: f64) -> u64 {
    (cost as f64 * growth).floor() as u64
}

/// Effect of a successful purchase, to be applied to the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseEffect {
    pub flat_rate:  f64,
    pub multiplier: f64,
    /// Set for items that show up in the plant grid.
    pub grid_item:  Option<ItemId>,
}

impl PurchaseEffect {
    fn none() -> Self {
        Self { flat_rate: 0.0, multiplier: 1.0, grid_item: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub item_id:     ItemId,
    pub kind:        ItemKind,
    /// What the item cost at the moment of purchase.
    pub cost:        u64,
    pub new_balance: Leafs,
    pub next_cost:   u64,
    pub effect:      PurchaseEffect,
}

/// Persisted per-item shop state. Both fields are optional so older
/// documents with only `cost` or only `purchased` still merge cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemState {
    pub id: ItemId,
    #[serde(default, deserialize_with = "de_cost", skip_serializing_if = "Option::is_none")]
    pub cost: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchased: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopState {
    #[serde(default)]
    pub shop_items:    Vec<ItemState>,
    #[serde(default)]
    pub upgrade_items: Vec<ItemState>,
}

// Costs were written as plain JSON numbers; accept floats and truncate.
fn de_cost<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(c) if c.is_finite() && c >= 0.0 => Ok(Some(c.floor() as u64)),
        Some(c) => Err(serde::de::Error::custom(format!("invalid item cost {c}"))),
    }
}

/// Presentation view of one catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopListing {
    pub id:          ItemId,
    pub name:        String,
    pub description: String,
    pub kind:        ItemKind,
    pub cost:        u64,
    pub affordable:  bool,
    pub owned:       bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShopCatalog {
    items: Vec<ShopItem>,
}

impl ShopCatalog {
    /// Build and validate a catalog. Insertion order is display order.
    pub fn new(definitions: &[ItemDefinition]) -> SimResult<Self> {
        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(definitions.len());
        for def in definitions {
            if !seen.insert(def.id.as_str()) {
                return Err(SimError::InvalidCatalog {
                    item_id: def.id.clone(),
                    reason:  "duplicate id".into(),
                });
            }
            items.push(ShopItem::from_definition(def)?);
        }
        Ok(Self { items })
    }

    pub fn from_config(config: &GameConfig) -> SimResult<Self> {
        Self::new(&config.catalog)
    }

    pub fn items(&self) -> &[ShopItem] {
        &self.items
    }

    pub fn item(&self, item_id: &str) -> Option<&ShopItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Resolve a purchase of `item_id` against `available_balance`.
    ///
    /// On error nothing in the catalog changes.
    pub fn purchase(&mut self, item_id: &str, available_balance: Leafs) -> SimResult<PurchaseReceipt> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| SimError::ItemNotFound { item_id: item_id.to_string() })?;

        let item = &self.items[index];
        if item.is_owned() {
            return Err(SimError::AlreadyOwned { item_id: item.id.clone() });
        }
        let cost = item.current_cost;
        if available_balance < cost as f64 {
            return Err(SimError::InsufficientFunds {
                needed:    cost as f64,
                available: available_balance,
            });
        }

        let item = &mut self.items[index];
        item.current_cost = grow_cost(cost, item.cost_growth);
        if item.one_time {
            item.purchased = true;
        }
        let next_cost = item.current_cost;
        let effect_kind = item.effect;

        let effect = match effect_kind {
            ItemEffect::FlatRate { rate } => PurchaseEffect {
                flat_rate:  rate,
                multiplier: 1.0,
                grid_item:  Some(item_id.to_string()),
            },
            ItemEffect::Multiplier { factor } => PurchaseEffect {
                flat_rate:  0.0,
                multiplier: factor,
                grid_item:  None,
            },
            ItemEffect::CostReset => {
                self.reset_plant_costs();
                PurchaseEffect::none()
            }
        };

        log::debug!("purchase: {item_id} for {cost} leafs, next cost {next_cost}");

        Ok(PurchaseReceipt {
            item_id: item_id.to_string(),
            kind: effect_kind.kind(),
            cost,
            new_balance: available_balance - cost as f64,
            next_cost,
            effect,
        })
    }

    fn reset_plant_costs(&mut self) {
        for item in &mut self.items {
            if matches!(item.effect, ItemEffect::FlatRate { .. }) {
                item.current_cost = item.base_cost;
            }
        }
    }

    /// Costs and ownership flags for persistence.
    pub fn export_state(&self) -> ShopState {
        let mut state = ShopState::default();
        for item in &self.items {
            if item.is_upgrade() {
                state.upgrade_items.push(ItemState {
                    id:        item.id.clone(),
                    cost:      Some(item.current_cost),
                    purchased: Some(item.purchased),
                });
            } else {
                state.shop_items.push(ItemState {
                    id:        item.id.clone(),
                    cost:      Some(item.current_cost),
                    purchased: item.one_time.then_some(item.purchased),
                });
            }
        }
        state
    }

    /// Merge a persisted state into the catalog. Unknown ids are ignored;
    /// items absent from `state` keep their current values.
    pub fn import_state(&mut self, state: &ShopState) {
        let saved: HashMap<&str, &ItemState> = state
            .shop_items
            .iter()
            .chain(state.upgrade_items.iter())
            .map(|s| (s.id.as_str(), s))
            .collect();

        for item in &mut self.items {
            let Some(entry) = saved.get(item.id.as_str()) else { continue };
            if let Some(cost) = entry.cost {
                item.current_cost = cost;
            }
            if let (true, Some(purchased)) = (item.one_time, entry.purchased) {
                item.purchased = purchased;
            }
        }

        let unknown = saved.keys().filter(|id| self.item(id).is_none()).count();
        if unknown > 0 {
            log::debug!("import_state: ignored {unknown} unknown item ids");
        }
    }

    /// Catalog rows for a shop screen, in display order.
    pub fn listing(&self, balance: Leafs) -> Vec<ShopListing> {
        self.items
            .iter()
            .map(|item| ShopListing {
                id:          item.id.clone(),
                name:        item.name.clone(),
                description: item.description.clone(),
                kind:        item.effect.kind(),
                cost:        item.current_cost,
                affordable:  !item.is_owned() && balance >= item.current_cost as f64,
                owned:       item.is_owned(),
            })
            .collect()
    }
}
