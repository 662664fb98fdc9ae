//! Catalog loading and crafting-graph construction.

use craftsearch::graph::{Catalog, CatalogError, RelationKind};
use craftsearch::{Item, Recipe};
use std::sync::Arc;

fn base_items() -> Vec<Item> {
    vec![
        Item::base("Water"),
        Item::base("Fire"),
        Item::base("Earth"),
        Item::base("Air"),
    ]
}

fn scenario_b() -> Vec<Item> {
    let mut items = base_items();
    items.push(Item::new("Steam", 1, vec![Recipe::new("Water", "Fire")]));
    items.push(Item::new("Lava", 1, vec![Recipe::new("Earth", "Fire")]));
    items.push(Item::new(
        "Stone",
        2,
        vec![Recipe::new("Lava", "Water"), Recipe::new("Earth", "Earth")],
    ));
    items
}

// --- catalog loading ---

#[test]
fn test_load_json_with_null_recipes() {
    let json = r#"[
        {"name": "Water", "tier": 0, "recipes": null},
        {"name": "Fire", "tier": 0},
        {"name": "Steam", "tier": 1, "recipes": [{"ingredients": ["Water", "Fire"]}]}
    ]"#;
    let catalog = Catalog::from_json_str(json).unwrap();
    assert_eq!(catalog.len(), 3);
    assert!(catalog.get("Water").unwrap().recipes.is_empty());
    assert!(catalog.get("Fire").unwrap().recipes.is_empty());
    assert_eq!(
        catalog.get("Steam").unwrap().recipes,
        vec![Recipe::new("Water", "Fire")]
    );
}

#[test]
fn test_load_keeps_malformed_recipes() {
    let json = r#"[
        {"name": "Water", "tier": 0, "recipes": []},
        {"name": "Odd", "tier": 1, "recipes": [{"ingredients": ["Water"]}, {"ingredients": ["Water", "Water", "Water"]}]}
    ]"#;
    let catalog = Catalog::from_json_str(json).unwrap();
    assert_eq!(catalog.get("Odd").unwrap().recipes.len(), 2);
}

#[test]
fn test_load_rejects_negative_tier() {
    let json = r#"[{"name": "Water", "tier": -1, "recipes": []}]"#;
    assert!(matches!(
        Catalog::from_json_str(json),
        Err(CatalogError::Parse(_))
    ));
}

#[test]
fn test_duplicate_item_rejected() {
    let items = vec![Item::base("Water"), Item::base("Water")];
    match Catalog::from_items(items) {
        Err(CatalogError::DuplicateItem(name)) => assert_eq!(name, "Water"),
        other => panic!("expected DuplicateItem, got {other:?}"),
    }
}

#[test]
fn test_empty_name_rejected() {
    let items = vec![Item::base("Water"), Item::base("  ")];
    assert!(matches!(
        Catalog::from_items(items),
        Err(CatalogError::EmptyName(1))
    ));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let err = Catalog::load(std::path::Path::new("/nonexistent/elements.json")).unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
}

// --- catalog queries ---

#[test]
fn test_item_lookup() {
    let catalog = Catalog::from_items(scenario_b()).unwrap();
    assert_eq!(catalog.item("Lava").unwrap().tier, 1);
    assert!(matches!(
        catalog.item("Unobtainium"),
        Err(CatalogError::NotFound(_))
    ));
}

#[test]
fn test_tier_groups_sorted() {
    let catalog = Catalog::from_items(scenario_b()).unwrap();
    let groups = catalog.tier_groups();
    assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(groups[&0], vec!["Air", "Earth", "Fire", "Water"]);
    assert_eq!(groups[&1], vec!["Lava", "Steam"]);
    assert_eq!(groups[&2], vec!["Stone"]);
}

// --- graph construction ---

#[test]
fn test_parent_relations_follow_tier_invariant() {
    let catalog = Catalog::from_items(scenario_b()).unwrap();
    let graph = catalog.graph();
    for id in 0..graph.len() {
        let tier = graph.node(id).item.tier;
        for rel in graph.parent_relations(id) {
            assert_eq!(rel.target, id);
            for &src in &rel.sources {
                assert!(graph.node(src).item.tier < tier);
            }
        }
    }
    assert_eq!(graph.get("Stone").unwrap().parents.len(), 2);
    assert_eq!(graph.diagnostics().retained, 4);
}

#[test]
fn test_equal_tier_ingredient_filtered() {
    let mut items = scenario_b();
    // Earth promoted to tier 2: Earth + Earth no longer builds Stone.
    items[2] = Item::new("Earth", 2, vec![]);
    let catalog = Catalog::from_items(items).unwrap();
    let graph = catalog.graph();
    let stone = graph.get("Stone").unwrap();
    assert_eq!(stone.parents.len(), 1);
    assert_eq!(
        graph.relation(stone.parents[0]).recipe(),
        Some(&Recipe::new("Lava", "Water"))
    );
    // Lava = Earth + Fire is dropped too.
    assert!(graph.get("Lava").unwrap().parents.is_empty());
    assert_eq!(graph.diagnostics().tier_violation, 2);
}

#[test]
fn test_unknown_ingredient_excluded() {
    let mut items = base_items();
    items.push(Item::new(
        "Steam",
        1,
        vec![Recipe::new("Water", "Fire"), Recipe::new("Water", "Plasma")],
    ));
    let catalog = Catalog::from_items(items).unwrap();
    let graph = catalog.graph();
    let steam = graph.get("Steam").unwrap();
    assert_eq!(steam.parents.len(), 1);
    let rel = graph.relation(steam.parents[0]);
    assert_eq!(rel.recipe(), Some(&Recipe::new("Water", "Fire")));
    assert_eq!(graph.diagnostics().unknown_ingredient, 1);
}

#[test]
fn test_malformed_recipe_counted() {
    let mut items = base_items();
    items.push(Item::new(
        "Odd",
        1,
        vec![
            Recipe {
                ingredients: vec!["Water".into()],
            },
            Recipe {
                ingredients: vec!["Water".into(), "Fire".into(), "Air".into()],
            },
            Recipe::new("Air", "Air"),
        ],
    ));
    let catalog = Catalog::from_items(items).unwrap();
    let graph = catalog.graph();
    assert_eq!(graph.diagnostics().malformed, 2);
    assert_eq!(graph.get("Odd").unwrap().parents.len(), 1);
}

#[test]
fn test_self_pair_recipe_single_child_link() {
    let catalog = Catalog::from_items(scenario_b()).unwrap();
    let graph = catalog.graph();
    let stone = graph.node_id("Stone").unwrap();
    let earth_consumers: Vec<_> = graph
        .consumers("Earth")
        .into_iter()
        .filter(|rel| rel.target == stone)
        .collect();
    assert_eq!(earth_consumers.len(), 1);
    assert_eq!(earth_consumers[0].sources.len(), 2);
}

#[test]
fn test_consumers_lists_reverse_dependencies() {
    let catalog = Catalog::from_items(scenario_b()).unwrap();
    let graph = catalog.graph();
    let mut used_in: Vec<&str> = graph
        .consumers("Fire")
        .into_iter()
        .map(|rel| graph.node(rel.target).item.name.as_str())
        .collect();
    used_in.sort();
    assert_eq!(used_in, vec!["Lava", "Steam"]);
    assert!(graph.consumers("Stone").is_empty());
    assert!(graph.consumers("Nope").is_empty());
}

#[test]
fn test_base_items_linked_from_root() {
    let catalog = Catalog::from_items(scenario_b()).unwrap();
    let graph = catalog.graph();
    let mut names: Vec<&str> = graph.base_items().map(|n| n.item.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["Air", "Earth", "Fire", "Water"]);
    // Root bookkeeping never shows up as a parent or consumer relation.
    for id in 0..graph.len() {
        for rel in graph.parent_relations(id) {
            assert_ne!(rel.kind, RelationKind::BasicElement);
        }
    }
}

// --- idempotent build ---

#[test]
fn test_graph_built_once_per_catalog() {
    let catalog = Catalog::from_items(scenario_b()).unwrap();
    let first = catalog.graph();
    let second = catalog.graph();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_rebuild_is_structurally_identical() {
    let a = Catalog::from_items(scenario_b()).unwrap();
    let b = Catalog::from_items(scenario_b()).unwrap();
    assert_eq!(a.graph().retained_parents(), b.graph().retained_parents());
    assert_eq!(a.graph().diagnostics(), b.graph().diagnostics());
}
