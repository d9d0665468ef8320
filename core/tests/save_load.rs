//! Save document compatibility: round trips, legacy documents, corruption.

use chrono::{TimeZone, Utc};
use leafy_core::{
    clock::Season,
    config::GameConfig,
    error::SimError,
    save::{self, SaveDocument},
    shop::ShopCatalog,
    simulation::EconomySimulation,
};

fn played_state(config: &GameConfig) -> (EconomySimulation, ShopCatalog) {
    let mut catalog = ShopCatalog::from_config(config).expect("catalog");
    let mut sim = EconomySimulation::new(&config.economy, 5_000.0);
    for id in ["maple_sapling", "oak_tree", "rate_20%", "oak_tree"] {
        let receipt = catalog.purchase(id, sim.balance()).expect("purchase");
        sim.debit(receipt.cost as f64).expect("debit");
        sim.apply_purchase_effect(
            receipt.effect.flat_rate,
            receipt.effect.multiplier,
            receipt.effect.grid_item.as_deref(),
        );
    }
    sim.advance(250.0);
    (sim, catalog)
}

#[test]
fn round_trip_preserves_progress() {
    let config = GameConfig::default();
    let (sim, catalog) = played_state(&config);

    let doc = save::serialize(&sim, &catalog);
    let bytes = doc.to_bytes().expect("encode");
    let parsed = SaveDocument::from_bytes(&bytes).expect("decode");
    let (sim2, catalog2) = save::deserialize(&parsed, &config).expect("restore");

    assert_eq!(sim2.balance(), sim.balance());
    assert_eq!(sim2.season(), Season::Summer);
    assert_eq!(sim2.season_elapsed(), sim.season_elapsed());
    assert_eq!(sim2.flat_rate_bonus(), sim.flat_rate_bonus());
    assert_eq!(sim2.multiplier(), sim.multiplier());
    assert_eq!(sim2.owned_items(), sim.owned_items());
    assert_eq!(catalog2, catalog);
    assert_eq!(parsed.plants, 3);
}

#[test]
fn legacy_plant_count_becomes_placeholder_grid() {
    let config = GameConfig::default();
    let doc = SaveDocument::from_bytes(br#"{"leafs": 10, "plants": 3}"#).expect("legacy doc");
    let (sim, catalog) = save::deserialize(&doc, &config).expect("restore");

    assert_eq!(sim.balance(), 10.0);
    assert_eq!(sim.owned_items(), &["buy_plant", "buy_plant", "buy_plant"]);

    let resaved = save::serialize(&sim, &catalog);
    assert_eq!(resaved.plants, 3);
    assert_eq!(resaved.plant_grid.map(|g| g.len()), Some(3));
}

#[test]
fn missing_fields_take_defaults() {
    let config = GameConfig::default();
    let doc = SaveDocument::from_bytes(b"{}").expect("empty doc");
    assert_eq!(doc, SaveDocument::default());

    let (sim, catalog) = save::deserialize(&doc, &config).expect("restore");
    assert_eq!(sim.balance(), 0.0);
    assert_eq!(sim.season(), Season::Spring);
    assert_eq!(sim.multiplier(), 1.0);
    assert!(sim.owned_items().is_empty());
    assert_eq!(catalog.item("oak_tree").map(|i| i.current_cost()), Some(100));
}

#[test]
fn older_documents_without_shop_state_load() {
    let config = GameConfig::default();
    let doc = SaveDocument::from_bytes(
        br#"{
            "leafs": 812.5,
            "season": "Winter",
            "plant_grid": ["oak_tree", "maple_sapling"],
            "upgrade_rate_bonus": 5.5,
            "plants": 2,
            "season_timer": 42.0
        }"#,
    )
    .expect("doc");
    let (sim, catalog) = save::deserialize(&doc, &config).expect("restore");

    assert_eq!(sim.season(), Season::Winter);
    assert_eq!(sim.season_elapsed(), 42.0);
    assert_eq!(sim.multiplier(), 1.0);
    assert_eq!(sim.owned_items(), &["oak_tree", "maple_sapling"]);
    assert_eq!(catalog.item("maple_sapling").map(|i| i.current_cost()), Some(10));
}

#[test]
fn non_empty_grid_wins_over_plant_count() {
    let doc = SaveDocument::from_bytes(br#"{"plant_grid": ["oak_tree"], "plants": 7}"#).expect("doc");
    assert_eq!(doc.resolved_plant_grid("buy_plant"), vec!["oak_tree".to_string()]);
}

#[test]
fn oversized_legacy_plant_count_is_corrupt() {
    let result = SaveDocument::from_bytes(br#"{"leafs": 10, "plants": 100000000000}"#);
    assert!(matches!(result, Err(SimError::CorruptSaveDocument(_))));

    let doc = SaveDocument { plants: 100_000_000_000, ..SaveDocument::default() };
    assert!(matches!(
        save::deserialize(&doc, &GameConfig::default()),
        Err(SimError::CorruptSaveDocument(_))
    ));

    // A real grid makes the count informational only.
    let doc = SaveDocument::from_bytes(br#"{"plant_grid": ["oak_tree"], "plants": 100000000000}"#)
        .expect("grid wins");
    assert_eq!(doc.resolved_plant_grid("buy_plant").len(), 1);
}

#[test]
fn out_of_range_values_are_clamped_on_load() {
    let config = GameConfig::default();
    let doc = SaveDocument::from_bytes(
        br#"{"leafs": -40, "production_multiplier": 0.2, "upgrade_rate_bonus": -1, "season_timer": 9999}"#,
    )
    .expect("doc");
    let (sim, _) = save::deserialize(&doc, &config).expect("restore");
    assert_eq!(sim.balance(), 0.0);
    assert_eq!(sim.multiplier(), 1.0);
    assert_eq!(sim.flat_rate_bonus(), 0.0);
    assert_eq!(sim.season_elapsed(), config.economy.season_duration_secs);
}

#[test]
fn corrupt_documents_are_reported() {
    for bytes in [
        &b"not json"[..],
        &br#"{"leafs": "lots"}"#[..],
        &br#"{"season": "Monsoon"}"#[..],
        &br#"{"shop_state": {"shop_items": [{"id": "oak_tree", "cost": -5}]}}"#[..],
    ] {
        assert!(matches!(
            SaveDocument::from_bytes(bytes),
            Err(SimError::CorruptSaveDocument(_))
        ));
    }
}

#[test]
fn stamp_records_unix_seconds() {
    let mut doc = SaveDocument::default();
    assert_eq!(doc.last_updated_at(), None);

    let when = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    doc.stamp(when);
    assert_eq!(doc.last_updated, Some(1_709_294_400.0));
    assert_eq!(doc.last_updated_at(), Some(when));
}
