use crate::{
    clock::Season,
    shop::ItemEffect,
    types::{ItemId, Leafs, Seconds},
};
use serde::{Deserialize, Serialize};

/// Production factor applied per season.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SeasonFactors {
    pub spring: f64,
    pub summer: f64,
    pub fall:   f64,
    pub winter: f64,
}

impl SeasonFactors {
    pub fn factor(&self, season: Season) -> f64 {
        match season {
            Season::Spring => self.spring,
            Season::Summer => self.summer,
            Season::Fall   => self.fall,
            Season::Winter => self.winter,
        }
    }
}

impl Default for SeasonFactors {
    fn default() -> Self {
        Self {
            spring: 1.3,
            summer: 1.1,
            fall:   1.0,
            winter: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EconomyConfig {
    pub season_duration_secs:   Seconds,
    /// Length of the season change cue. Presentation only.
    pub transition_secs:        Seconds,
    pub season_factors:         SeasonFactors,
    pub autosave_interval_secs: Seconds,
    /// Balance of a brand new game.
    pub starting_leafs:         Leafs,
    /// How many owned items the plant grid shows.
    pub display_limit:          usize,
    /// Item id used to fill the plant grid of saves that only stored a count.
    pub legacy_placeholder_id:  ItemId,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            season_duration_secs:   3.0 * 60.0,
            transition_secs:        3.0,
            season_factors:         SeasonFactors::default(),
            autosave_interval_secs: 30.0,
            starting_leafs:         10.0,
            display_limit:          100,
            legacy_placeholder_id:  "buy_plant".into(),
        }
    }
}

impl EconomyConfig {
    /// Reject tunings that would stall the clock or drain the balance.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.season_duration_secs.is_finite() && self.season_duration_secs > 0.0,
            "season_duration_secs must be positive, got {}",
            self.season_duration_secs
        );
        anyhow::ensure!(
            self.autosave_interval_secs.is_finite() && self.autosave_interval_secs > 0.0,
            "autosave_interval_secs must be positive, got {}",
            self.autosave_interval_secs
        );
        anyhow::ensure!(
            self.transition_secs.is_finite() && self.transition_secs >= 0.0,
            "transition_secs must be >= 0, got {}",
            self.transition_secs
        );
        anyhow::ensure!(
            self.starting_leafs.is_finite() && self.starting_leafs >= 0.0,
            "starting_leafs must be >= 0, got {}",
            self.starting_leafs
        );
        for season in Season::ALL {
            let factor = self.season_factors.factor(season);
            anyhow::ensure!(
                factor.is_finite() && factor >= 0.0,
                "season factor for {} must be >= 0, got {factor}",
                season.name()
            );
        }
        Ok(())
    }
}

/// One shop entry as written in `catalog.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemDefinition {
    pub id:          ItemId,
    pub name:        String,
    #[serde(default)]
    pub description: String,
    pub base_cost:   u64,
    #[serde(default = "default_cost_growth")]
    pub cost_growth: f64,
    #[serde(default)]
    pub one_time:    bool,
    pub effect:      ItemEffect,
}

fn default_cost_growth() -> f64 {
    1.1
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    items: Vec<ItemDefinition>,
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub economy: EconomyConfig,
    pub catalog: Vec<ItemDefinition>,
}

impl GameConfig {
    /// Load from a data directory holding `economy.json` and `catalog.json`.
    /// Without a data directory, use `GameConfig::default()`.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let economy_path = format!("{data_dir}/economy.json");
        let economy_content = std::fs::read_to_string(&economy_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {economy_path}: {e}"))?;
        let economy: EconomyConfig = serde_json::from_str(&economy_content)?;

        let catalog_path = format!("{data_dir}/catalog.json");
        let catalog_content = std::fs::read_to_string(&catalog_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {catalog_path}: {e}"))?;
        let catalog_file: CatalogFile = serde_json::from_str(&catalog_content)?;

        economy.validate()?;

        log::info!(
            "Loaded config from {data_dir}: {} catalog items, season length {}s",
            catalog_file.items.len(),
            economy.season_duration_secs
        );

        Ok(Self {
            economy,
            catalog: catalog_file.items,
        })
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            economy: EconomyConfig::default(),
            catalog: default_catalog(),
        }
    }
}

fn plant(id: &str, name: &str, cost: u64, rate: f64, growth: f64) -> ItemDefinition {
    ItemDefinition {
        id:          id.into(),
        name:        name.into(),
        description: format!("+{rate} Leaf/sec"),
        base_cost:   cost,
        cost_growth: growth,
        one_time:    false,
        effect:      ItemEffect::FlatRate { rate },
    }
}

fn upgrade(id: &str, name: &str, cost: u64, factor: f64, description: &str) -> ItemDefinition {
    ItemDefinition {
        id:          id.into(),
        name:        name.into(),
        description: description.into(),
        base_cost:   cost,
        cost_growth: default_cost_growth(),
        one_time:    true,
        effect:      ItemEffect::Multiplier { factor },
    }
}

/// The built-in shop, plants first, then the market crash, then upgrades.
pub fn default_catalog() -> Vec<ItemDefinition> {
    vec![
        plant("maple_sapling",  "Maple Sapling",  10,        0.5,     1.1),
        plant("oak_tree",       "Oak Tree",       100,       5.0,     1.2),
        plant("willow_tree",    "Weeping Willow", 1_000,     25.0,    1.3),
        plant("ginkgo_tree",    "Ginkgo Tree",    7_500,     100.0,   1.4),
        plant("ancient_banyan", "Ancient Banyan", 50_000,    500.0,   1.5),
        plant("crystal_tree",   "Crystal Tree",   500_000,   5000.0,  1.5),
        plant("spirit_blossom", "Spirit Blossom", 1_000_000, 10000.0, 1.5),
        ItemDefinition {
            id:          "inflation_reset".into(),
            name:        "Market Crash".into(),
            description: "Reset shop costs to default.".into(),
            base_cost:   100_000,
            cost_growth: 20.0,
            one_time:    false,
            effect:      ItemEffect::CostReset,
        },
        upgrade("rate_10%",   "Fertilizer",           100,               1.1,  "Output +10%"),
        upgrade("rate_20%",   "Sprinkler",            500,               1.2,  "Output +20%"),
        upgrade("rate_30%",   "Rich Compost",         2_500,             1.3,  "Output +30%"),
        upgrade("rate_50%",   "Magic Pollen",         15_000,            1.5,  "Output +50%"),
        upgrade("rate_100%",  "Holy Water",           250_000,           2.0,  "Output x2"),
        upgrade("rate_300%",  "Terra Mater",          5_000_000,         4.0,  "Output x4"),
        upgrade("rate_700%",  "Gaia's Bless",         1_000_000_000,     8.0,  "Output x8"),
        upgrade("rate_1500%", "Mother of all Nature", 1_000_000_000_000, 16.0, "Output x16"),
    ]
}
