//! Save document: the persisted snapshot of a game.
//!
//! ## Compatibility
//!
//! Every field is optional and default-filled, so documents written by
//! older builds (no `plant_grid`, no `shop_state`, no
//! `production_multiplier`) still load. Saves that only stored a `plants`
//! count get that many placeholder entries in the plant grid.
//!
//! New fields are added as optional only. Removing or changing the meaning
//! of an existing field breaks old saves and is not allowed.

use crate::{
    clock::Season,
    config::GameConfig,
    error::{SimError, SimResult},
    shop::{ShopCatalog, ShopState},
    simulation::EconomySimulation,
    types::{ItemId, Leafs, Seconds},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default save file name inside the file store.
pub const SAVE_FILE: &str = "savegame.json";

/// Largest legacy `plants` count accepted without a plant grid.
pub const MAX_LEGACY_PLANTS: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveDocument {
    #[serde(default)]
    pub leafs: Leafs,
    #[serde(default)]
    pub season: Season,
    #[serde(default)]
    pub plant_grid: Option<Vec<ItemId>>,
    #[serde(default)]
    pub upgrade_rate_bonus: f64,
    #[serde(default = "default_multiplier")]
    pub production_multiplier: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_state: Option<ShopState>,
    /// Plant count. Written for old readers; only read when `plant_grid` is empty.
    #[serde(default)]
    pub plants: u64,
    /// Seconds into the current season.
    #[serde(default)]
    pub season_timer: Seconds,
    /// Unix timestamp (seconds) of the last write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<f64>,
}

fn default_multiplier() -> f64 {
    1.0
}

impl Default for SaveDocument {
    fn default() -> Self {
        Self {
            leafs:                 0.0,
            season:                Season::Spring,
            plant_grid:            None,
            upgrade_rate_bonus:    0.0,
            production_multiplier: 1.0,
            shop_state:            None,
            plants:                0,
            season_timer:          0.0,
            last_updated:          None,
        }
    }
}

impl SaveDocument {
    /// The document a "New Game" starts from.
    pub fn new_game(config: &GameConfig) -> Self {
        Self {
            leafs: config.economy.starting_leafs,
            ..Self::default()
        }
    }

    /// Parse a stored document. Any parse or shape failure is
    /// `CorruptSaveDocument`.
    pub fn from_bytes(bytes: &[u8]) -> SimResult<Self> {
        let doc: Self = serde_json::from_slice(bytes)
            .map_err(|e| SimError::CorruptSaveDocument(e.to_string()))?;
        doc.check_shape()?;
        Ok(doc)
    }

    fn check_shape(&self) -> SimResult<()> {
        let needs_migration = self.plant_grid.as_ref().map_or(true, |g| g.is_empty());
        if needs_migration && self.plants > MAX_LEGACY_PLANTS {
            return Err(SimError::CorruptSaveDocument(format!(
                "legacy plant count {} exceeds {MAX_LEGACY_PLANTS}",
                self.plants
            )));
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> SimResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn stamp(&mut self, now: DateTime<Utc>) {
        self.last_updated = Some(now.timestamp_millis() as f64 / 1000.0);
    }

    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.last_updated
            .filter(|t| t.is_finite())
            .and_then(|t| DateTime::from_timestamp_millis((t * 1000.0) as i64))
    }

    /// Plant grid after applying the legacy count migration.
    pub fn resolved_plant_grid(&self, placeholder_id: &str) -> Vec<ItemId> {
        match &self.plant_grid {
            Some(grid) if !grid.is_empty() => grid.clone(),
            _ if self.plants > 0 => {
                log::info!("migrating legacy save: {} plants without a grid", self.plants);
                vec![placeholder_id.to_string(); self.plants as usize]
            }
            _ => Vec::new(),
        }
    }
}

/// Capture the simulation and catalog into a save document.
/// `last_updated` is left for the writer to stamp.
pub fn serialize(sim: &EconomySimulation, catalog: &ShopCatalog) -> SaveDocument {
    SaveDocument {
        leafs:                 sim.balance(),
        season:                sim.season(),
        plant_grid:            Some(sim.owned_items().to_vec()),
        upgrade_rate_bonus:    sim.flat_rate_bonus(),
        production_multiplier: sim.multiplier(),
        shop_state:            Some(catalog.export_state()),
        plants:                sim.owned_items().len() as u64,
        season_timer:          sim.season_elapsed(),
        last_updated:          None,
    }
}

/// Rebuild the simulation and catalog from a save document.
pub fn deserialize(
    doc: &SaveDocument,
    config: &GameConfig,
) -> SimResult<(EconomySimulation, ShopCatalog)> {
    let economy = &config.economy;
    economy.validate()?;
    doc.check_shape()?;
    let sim = EconomySimulation::new(economy, doc.leafs).restore(
        doc.season,
        doc.season_timer,
        doc.upgrade_rate_bonus,
        doc.production_multiplier,
        doc.resolved_plant_grid(&economy.legacy_placeholder_id),
    );

    let mut catalog = ShopCatalog::from_config(config)?;
    if let Some(state) = &doc.shop_state {
        catalog.import_state(state);
    }
    Ok((sim, catalog))
}
