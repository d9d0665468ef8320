//! Catalog construction, purchase resolution and shop state merging.

use leafy_core::{
    config::{GameConfig, ItemDefinition},
    error::SimError,
    shop::{ItemEffect, ItemKind, ItemState, ShopCatalog, ShopState},
};

fn catalog() -> ShopCatalog {
    ShopCatalog::from_config(&GameConfig::default()).expect("default catalog")
}

fn cost_of(catalog: &ShopCatalog, id: &str) -> u64 {
    catalog.item(id).map(|i| i.current_cost()).expect("known item")
}

fn def(id: &str, effect: ItemEffect) -> ItemDefinition {
    ItemDefinition {
        id:          id.into(),
        name:        id.into(),
        description: String::new(),
        base_cost:   10,
        cost_growth: 1.1,
        one_time:    false,
        effect,
    }
}

#[test]
fn default_catalog_is_valid_and_ordered() {
    let catalog = catalog();
    let ids: Vec<&str> = catalog.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids.first(), Some(&"maple_sapling"));
    assert_eq!(ids.len(), 16);
    assert_eq!(catalog.item("inflation_reset").map(|i| i.effect().kind()), Some(ItemKind::Reset));
    assert!(catalog.item("rate_100%").map(|i| i.is_one_time()).unwrap_or(false));
}

#[test]
fn purchase_grows_cost_and_returns_effect() {
    let mut catalog = catalog();
    let receipt = catalog.purchase("oak_tree", 250.0).expect("purchase");
    assert_eq!(receipt.cost, 100);
    assert_eq!(receipt.next_cost, 120);
    assert_eq!(receipt.new_balance, 150.0);
    assert_eq!(receipt.kind, ItemKind::Plant);
    assert_eq!(receipt.effect.flat_rate, 5.0);
    assert_eq!(receipt.effect.multiplier, 1.0);
    assert_eq!(receipt.effect.grid_item.as_deref(), Some("oak_tree"));
}

#[test]
fn costs_compound_and_truncate() {
    let mut catalog = catalog();
    let mut paid = Vec::new();
    for _ in 0..4 {
        paid.push(catalog.purchase("maple_sapling", 1_000.0).expect("purchase").cost);
    }
    // 10 -> 11 -> 12 -> 13 -> 14, each floor(cost * 1.1)
    assert_eq!(paid, vec![10, 11, 12, 13]);
    assert_eq!(cost_of(&catalog, "maple_sapling"), 14);
}

#[test]
fn failed_purchases_change_nothing() {
    let mut catalog = catalog();
    let before = catalog.clone();

    let err = catalog.purchase("oak_tree", 99.99).unwrap_err();
    assert!(matches!(err, SimError::InsufficientFunds { .. }));
    assert!(err.is_purchase_rejection());

    let err = catalog.purchase("golden_rake", 1e12).unwrap_err();
    assert!(matches!(err, SimError::ItemNotFound { .. }));
    assert!(!err.is_purchase_rejection());

    assert_eq!(catalog, before);
}

#[test]
fn one_time_upgrade_can_only_be_bought_once() {
    let mut catalog = catalog();
    let receipt = catalog.purchase("rate_10%", 100.0).expect("first purchase");
    assert_eq!(receipt.kind, ItemKind::Upgrade);
    assert_eq!(receipt.effect.multiplier, 1.1);
    assert_eq!(receipt.effect.grid_item, None);

    let err = catalog.purchase("rate_10%", 1e9).unwrap_err();
    assert!(matches!(err, SimError::AlreadyOwned { .. }));

    let row = catalog
        .listing(1e9)
        .into_iter()
        .find(|l| l.id == "rate_10%")
        .expect("listed");
    assert!(row.owned);
    assert!(!row.affordable);
}

#[test]
fn owned_check_comes_before_funds_check() {
    let mut catalog = catalog();
    catalog.purchase("rate_10%", 100.0).expect("purchase");
    assert!(matches!(
        catalog.purchase("rate_10%", 0.0),
        Err(SimError::AlreadyOwned { .. })
    ));
}

#[test]
fn market_crash_resets_plant_costs_only() {
    let mut catalog = catalog();
    for _ in 0..5 {
        catalog.purchase("maple_sapling", 1e9).expect("sapling");
        catalog.purchase("oak_tree", 1e9).expect("oak");
    }
    catalog.purchase("rate_10%", 1e9).expect("upgrade");
    let upgrade_cost = cost_of(&catalog, "rate_10%");
    assert!(cost_of(&catalog, "oak_tree") > 100);

    let receipt = catalog.purchase("inflation_reset", 1e9).expect("crash");
    assert_eq!(receipt.kind, ItemKind::Reset);
    assert_eq!(receipt.effect.flat_rate, 0.0);
    assert_eq!(receipt.effect.multiplier, 1.0);
    assert_eq!(receipt.effect.grid_item, None);

    assert_eq!(cost_of(&catalog, "maple_sapling"), 10);
    assert_eq!(cost_of(&catalog, "oak_tree"), 100);
    assert_eq!(cost_of(&catalog, "inflation_reset"), 2_000_000);
    assert_eq!(cost_of(&catalog, "rate_10%"), upgrade_cost);
    assert!(catalog.item("rate_10%").map(|i| i.is_purchased()).unwrap_or(false));
}

#[test]
fn export_splits_upgrades_from_shop_items() {
    let mut catalog = catalog();
    catalog.purchase("rate_20%", 1e9).expect("upgrade");
    catalog.purchase("willow_tree", 1e9).expect("willow");

    let state = catalog.export_state();
    assert_eq!(state.shop_items.len(), 8);
    assert_eq!(state.upgrade_items.len(), 8);

    let willow = state.shop_items.iter().find(|s| s.id == "willow_tree").expect("willow");
    assert_eq!(willow.cost, Some(1_300));
    assert_eq!(willow.purchased, None);

    let upgrade = state.upgrade_items.iter().find(|s| s.id == "rate_20%").expect("upgrade");
    assert_eq!(upgrade.purchased, Some(true));
}

#[test]
fn import_merges_and_ignores_unknown_ids() {
    let mut catalog = catalog();
    let state = ShopState {
        shop_items: vec![
            ItemState { id: "oak_tree".into(), cost: Some(144), purchased: None },
            ItemState { id: "retired_cactus".into(), cost: Some(5), purchased: None },
        ],
        upgrade_items: vec![ItemState { id: "rate_30%".into(), cost: None, purchased: Some(true) }],
    };
    catalog.import_state(&state);

    assert_eq!(cost_of(&catalog, "oak_tree"), 144);
    assert_eq!(cost_of(&catalog, "maple_sapling"), 10);
    assert_eq!(cost_of(&catalog, "rate_30%"), 2_500);
    assert!(catalog.item("rate_30%").map(|i| i.is_owned()).unwrap_or(false));
    assert!(catalog.item("retired_cactus").is_none());
}

#[test]
fn exported_state_restores_an_equal_catalog() {
    let mut original = catalog();
    original.purchase("ginkgo_tree", 1e9).expect("ginkgo");
    original.purchase("rate_50%", 1e9).expect("upgrade");
    original.purchase("inflation_reset", 1e9).expect("crash");

    let mut restored = catalog();
    restored.import_state(&original.export_state());
    assert_eq!(restored, original);
}

#[test]
fn listing_marks_affordability() {
    let listing = catalog().listing(100.0);
    let affordable: Vec<&str> = listing
        .iter()
        .filter(|l| l.affordable)
        .map(|l| l.id.as_str())
        .collect();
    assert_eq!(affordable, vec!["maple_sapling", "oak_tree", "rate_10%"]);
}

#[test]
fn invalid_catalogs_are_rejected() {
    let duplicate = vec![
        def("fern", ItemEffect::FlatRate { rate: 1.0 }),
        def("fern", ItemEffect::FlatRate { rate: 2.0 }),
    ];
    assert!(matches!(ShopCatalog::new(&duplicate), Err(SimError::InvalidCatalog { .. })));

    let zero_rate = vec![def("fern", ItemEffect::FlatRate { rate: 0.0 })];
    assert!(matches!(ShopCatalog::new(&zero_rate), Err(SimError::InvalidCatalog { .. })));

    let weak_multiplier = vec![def("tonic", ItemEffect::Multiplier { factor: 1.0 })];
    assert!(matches!(ShopCatalog::new(&weak_multiplier), Err(SimError::InvalidCatalog { .. })));

    let mut shrinking = def("fern", ItemEffect::FlatRate { rate: 1.0 });
    shrinking.cost_growth = 0.9;
    assert!(matches!(ShopCatalog::new(&[shrinking]), Err(SimError::InvalidCatalog { .. })));
}

#[test]
fn catalog_json_effects_parse() {
    let defs: Vec<ItemDefinition> = serde_json::from_str(
        r#"[
            {"id": "fern", "name": "Fern", "base_cost": 5, "effect": {"kind": "flat_rate", "rate": 0.1}},
            {"id": "tonic", "name": "Tonic", "base_cost": 50, "one_time": true,
             "effect": {"kind": "multiplier", "factor": 1.25}},
            {"id": "crash", "name": "Crash", "base_cost": 500, "cost_growth": 20.0,
             "effect": {"kind": "cost_reset"}}
        ]"#,
    )
    .expect("parse");
    let catalog = ShopCatalog::new(&defs).expect("valid");
    assert_eq!(catalog.item("fern").map(|i| i.cost_growth()), Some(1.1));
    assert_eq!(catalog.item("crash").map(|i| i.effect()), Some(ItemEffect::CostReset));
}
