use kernel::optimizer::{maximize_level, maximize_splits};
use kernel::{Collection, CollectionServerState, PriceTable, ProfileServerState, Rarity};
use serde_json::json;

fn load() -> Collection {
    let profile: ProfileServerState = serde_json::from_value(json!({
        "Account": {"Id": "acc", "CardStats": {"Hulk": 20, "Thor": 5}},
        "Wallet": {"_currencies": {"Credits": {"Credits": {"TotalAmount": 1000}}}}
    }))
    .unwrap();
    let state: CollectionServerState = serde_json::from_value(json!({
        "CardDefStats": {"Stats": {
            "Hulk": {"Boosters": 60, "InfinitySplitCount": 1},
            "Thor": {"Boosters": 12},
            "Ant": {"Boosters": 0}
        }},
        "Cards": [
            {"CardDefId": "Hulk", "RarityDefId": "UltraLegendary"},
            {"CardDefId": "Hulk", "ArtVariantDefId": "Pixel", "RarityDefId": "Common"},
            {"CardDefId": "Thor", "RarityDefId": "Common"},
            {"CardDefId": "Thor", "ArtVariantDefId": "Comic", "RarityDefId": "Common"},
            {"CardDefId": "Ant", "RarityDefId": "Common"}
        ]
    }))
    .unwrap();
    Collection::from_server_state(&profile.account, state).unwrap()
}

#[test]
fn planners_work_on_a_loaded_collection() {
    let collection = load();
    let prices = PriceTable::global();

    let level = maximize_level(&collection, 1000);
    let summary: Vec<_> = level.iter().map(|u| (u.def_id.as_str(), u.units)).collect();
    assert_eq!(summary, [("Hulk", 1), ("Thor", 2)]);

    let splits: Vec<_> = maximize_splits(&collection, prices, 1000).collect();
    assert_eq!(splits.len(), 1);
    assert_eq!(splits[0].card.def_id, "Hulk");
    assert_eq!(splits[0].upgrade.source, Rarity::Ultra);
    assert!(splits[0].upgrade.is_split());

    // planning never touches the collection
    assert_eq!(collection.get("Hulk").map(|c| c.boosters), Some(60));
}

#[test]
fn empty_budget_gives_empty_plans() {
    let collection = load();
    assert!(maximize_level(&collection, 0).is_empty());
    assert_eq!(maximize_splits(&collection, PriceTable::global(), 0).count(), 0);
}
