//! End-to-end searches: bounds, dedup, grounding, BFS/DFS parity, streaming, cancellation, cache.

use craftsearch::engine::expand::{Expansion, ExpansionCache, diagonal_cells};
use craftsearch::graph::Catalog;
use craftsearch::pipeline::pool_size;
use craftsearch::{
    BuildTree, Item, Recipe, SearchError, SearchMode, SearchRequest, Searcher, find_recipes,
    stream_recipes,
};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

fn base_items() -> Vec<Item> {
    vec![
        Item::base("Water"),
        Item::base("Fire"),
        Item::base("Earth"),
        Item::base("Air"),
    ]
}

fn scenario_a() -> Catalog {
    let mut items = base_items();
    items.push(Item::new("Steam", 1, vec![Recipe::new("Water", "Fire")]));
    Catalog::from_items(items).unwrap()
}

fn scenario_b() -> Catalog {
    let mut items = base_items();
    items.push(Item::new("Steam", 1, vec![Recipe::new("Water", "Fire")]));
    items.push(Item::new("Lava", 1, vec![Recipe::new("Earth", "Fire")]));
    items.push(Item::new(
        "Stone",
        2,
        vec![Recipe::new("Lava", "Water"), Recipe::new("Earth", "Earth")],
    ));
    Catalog::from_items(items).unwrap()
}

/// Layered catalog with several ways to build each intermediate.
///
/// Steam: 2 trees, Cloud: 5, Rain: 5, Storm: 25. Mud has two mirrored recipes (1 tree).
fn weather() -> Catalog {
    let mut items = base_items();
    items.push(Item::new(
        "Steam",
        1,
        vec![Recipe::new("Water", "Fire"), Recipe::new("Air", "Fire")],
    ));
    items.push(Item::new(
        "Mud",
        1,
        vec![Recipe::new("Water", "Earth"), Recipe::new("Earth", "Water")],
    ));
    items.push(Item::new(
        "Cloud",
        2,
        vec![Recipe::new("Steam", "Air"), Recipe::new("Steam", "Steam")],
    ));
    items.push(Item::new("Rain", 3, vec![Recipe::new("Cloud", "Water")]));
    items.push(Item::new("Storm", 4, vec![Recipe::new("Rain", "Cloud")]));
    // Plasma cannot be grounded: its only ingredient never resolves to tier 0.
    items.push(Item::new("Ghost", 1, vec![]));
    items.push(Item::new("Plasma", 2, vec![Recipe::new("Ghost", "Fire")]));
    Catalog::from_items(items).unwrap()
}

fn keys(trees: &[Arc<BuildTree>]) -> BTreeSet<String> {
    trees.iter().map(|t| t.canonical_key()).collect()
}

fn run(catalog: &Catalog, target: &str, count: usize, mode: SearchMode) -> Vec<Arc<BuildTree>> {
    find_recipes(&catalog.graph(), target, count, mode)
        .unwrap()
        .root
        .ingredients
}

// --- scenarios ---

#[test]
fn test_single_recipe_target() {
    let catalog = scenario_a();
    let outcome = find_recipes(&catalog.graph(), "Steam", 5, SearchMode::Bfs).unwrap();
    assert_eq!(outcome.len(), 1);
    assert_eq!(outcome.root.target, "Steam");
    let tree = &outcome.root.trees()[0];
    assert_eq!(tree.item(), "Steam");
    assert_eq!(
        tree.recipe(),
        Some(&["Water".to_string(), "Fire".to_string()])
    );
    assert!(tree.children().iter().all(|c| c.is_leaf()));
    assert!(outcome.nodes_visited > 0);
}

#[test]
fn test_two_recipe_target_dfs() {
    let catalog = scenario_b();
    let trees = run(&catalog, "Stone", 5, SearchMode::Dfs);
    assert_eq!(trees.len(), 2);
    let recipes: HashSet<_> = trees
        .iter()
        .map(|t| t.recipe().cloned().unwrap())
        .collect();
    assert!(recipes.contains(&["Lava".to_string(), "Water".to_string()]));
    assert!(recipes.contains(&["Earth".to_string(), "Earth".to_string()]));
    // Simpler build first.
    assert_eq!(trees[0].complexity(), 3);
    assert_eq!(trees[1].complexity(), 5);
}

#[test]
fn test_unknown_target_not_found() {
    let catalog = scenario_b();
    match find_recipes(&catalog.graph(), "Unobtainium", 1, SearchMode::Bfs) {
        Err(SearchError::NotFound(name)) => assert_eq!(name, "Unobtainium"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    let err = find_recipes(&catalog.graph(), "Unobtainium", 1, SearchMode::Bfs).unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[test]
fn test_zero_count_rejected() {
    let catalog = scenario_b();
    let err = find_recipes(&catalog.graph(), "Stone", 0, SearchMode::Bfs).unwrap_err();
    assert!(matches!(err, SearchError::InvalidCount(0)));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn test_base_item_is_single_leaf() {
    let catalog = scenario_b();
    let trees = run(&catalog, "Water", 10, SearchMode::Bfs);
    assert_eq!(trees.len(), 1);
    assert!(trees[0].is_leaf());
    assert_eq!(trees[0].item(), "Water");
}

#[test]
fn test_crafted_item_without_recipes_is_single_leaf() {
    let catalog = weather();
    for mode in [SearchMode::Bfs, SearchMode::Dfs] {
        let trees = run(&catalog, "Ghost", 5, mode);
        assert_eq!(trees.len(), 1);
        assert!(trees[0].is_leaf());
        assert_eq!(trees[0].item(), "Ghost");
        assert!(trees[0].is_complete());
    }
}

#[test]
fn test_ungroundable_target_yields_nothing() {
    let catalog = weather();
    assert!(run(&catalog, "Plasma", 5, SearchMode::Bfs).is_empty());
    assert!(run(&catalog, "Plasma", 5, SearchMode::Dfs).is_empty());
}

// --- bound and dedup ---

#[test]
fn test_exhaustive_counts() {
    let catalog = weather();
    for mode in [SearchMode::Bfs, SearchMode::Dfs] {
        assert_eq!(run(&catalog, "Steam", 50, mode).len(), 2);
        assert_eq!(run(&catalog, "Cloud", 50, mode).len(), 5);
        assert_eq!(run(&catalog, "Rain", 50, mode).len(), 5);
        assert_eq!(run(&catalog, "Storm", 50, mode).len(), 25);
    }
}

#[test]
fn test_bound_respected() {
    let catalog = weather();
    for count in [1, 3, 10, 24] {
        for mode in [SearchMode::Bfs, SearchMode::Dfs] {
            assert_eq!(run(&catalog, "Storm", count, mode).len(), count);
        }
    }
}

#[test]
fn test_mirrored_recipes_deduplicated() {
    let catalog = weather();
    let trees = run(&catalog, "Mud", 10, SearchMode::Bfs);
    assert_eq!(trees.len(), 1);
}

#[test]
fn test_results_pairwise_distinct() {
    let catalog = weather();
    let trees = run(&catalog, "Storm", 25, SearchMode::Bfs);
    assert_eq!(keys(&trees).len(), trees.len());
}

#[test]
fn test_leaves_are_base_items_and_trees_complete() {
    let catalog = weather();
    for tree in run(&catalog, "Storm", 25, SearchMode::Dfs) {
        assert!(tree.is_complete());
        assert_eq!(tree.item(), "Storm");
        for leaf in tree.leaves() {
            assert_eq!(catalog.item(leaf).unwrap().tier, 0, "leaf {leaf}");
        }
    }
}

#[test]
fn test_results_sorted_by_complexity() {
    let catalog = weather();
    let trees = run(&catalog, "Storm", 25, SearchMode::Bfs);
    assert!(trees.windows(2).all(|w| w[0].complexity() <= w[1].complexity()));
}

#[test]
fn test_bfs_and_dfs_find_the_same_set_when_exhaustive() {
    let catalog = weather();
    let bfs = run(&catalog, "Storm", 100, SearchMode::Bfs);
    let dfs = run(&catalog, "Storm", 100, SearchMode::Dfs);
    assert_eq!(keys(&bfs), keys(&dfs));
}

#[test]
fn test_single_worker_matches_pool() {
    let catalog = weather();
    let request = SearchRequest::new("Cloud", 100, SearchMode::Bfs);
    let one = Searcher::new(catalog.graph())
        .with_threads(Some(1))
        .find_recipes(&request)
        .unwrap();
    let many = Searcher::new(catalog.graph())
        .find_recipes(&request)
        .unwrap();
    assert_eq!(keys(one.root.trees()), keys(many.root.trees()));
}

// --- streaming ---

#[test]
fn test_stream_delivers_accepted_trees() {
    let catalog = weather();
    let stream = stream_recipes(&catalog.graph(), "Storm", 7, SearchMode::Bfs).unwrap();
    assert_eq!(stream.target(), "Storm");
    let mut streamed = Vec::new();
    while let Some(tree) = stream.recv() {
        streamed.push(tree);
    }
    let outcome = stream.wait().unwrap();
    assert_eq!(streamed.len(), 7);
    assert_eq!(keys(&streamed), keys(outcome.root.trees()));
}

#[test]
fn test_dropping_stream_reader_does_not_block() {
    let catalog = weather();
    let stream = stream_recipes(&catalog.graph(), "Storm", 25, SearchMode::Dfs).unwrap();
    let outcome = stream.wait().unwrap();
    assert_eq!(outcome.len(), 25);
}

#[test]
fn test_stream_rejects_bad_requests_up_front() {
    let catalog = weather();
    assert!(matches!(
        stream_recipes(&catalog.graph(), "Nope", 1, SearchMode::Bfs),
        Err(SearchError::NotFound(_))
    ));
    assert!(matches!(
        stream_recipes(&catalog.graph(), "Storm", 0, SearchMode::Bfs),
        Err(SearchError::InvalidCount(0))
    ));
}

// --- cancellation ---

#[test]
fn test_pre_cancelled_search_returns_empty() {
    let catalog = weather();
    let cancel = Arc::new(AtomicBool::new(true));
    let request = SearchRequest::new("Storm", 25, SearchMode::Bfs).with_cancel(cancel);
    let outcome = Searcher::new(catalog.graph())
        .find_recipes(&request)
        .unwrap();
    assert!(outcome.is_empty());
}

#[test]
fn test_cancel_keeps_accepted_trees() {
    let catalog = weather();
    let stream = Searcher::new(catalog.graph())
        .stream_recipes(&SearchRequest::new("Storm", 25, SearchMode::Bfs))
        .unwrap();
    let first = stream.recv().unwrap();
    stream.cancel();
    let outcome = stream.wait().unwrap();
    assert!(!outcome.is_empty());
    assert!(outcome.len() <= 25);
    assert!(keys(outcome.root.trees()).contains(&first.canonical_key()));
}

// --- cache ---

#[test]
fn test_cache_filled_and_reused() {
    let catalog = weather();
    let searcher = Searcher::new(catalog.graph());
    assert!(searcher.cache().is_empty());
    let request = SearchRequest::new("Storm", 100, SearchMode::Bfs);
    let first = searcher.find_recipes(&request).unwrap();
    assert!(!searcher.cache().is_empty());
    let second = searcher.find_recipes(&request).unwrap();
    assert_eq!(keys(first.root.trees()), keys(second.root.trees()));
}

#[test]
fn test_cache_upgrades_for_larger_count() {
    let catalog = weather();
    let searcher = Searcher::new(catalog.graph());
    let small = searcher
        .find_recipes(&SearchRequest::new("Storm", 3, SearchMode::Bfs))
        .unwrap();
    assert_eq!(small.len(), 3);
    let large = searcher
        .find_recipes(&SearchRequest::new("Storm", 100, SearchMode::Bfs))
        .unwrap();
    assert_eq!(large.len(), 25);
}

#[test]
fn test_cache_keeps_more_complete_entry() {
    let cache = ExpansionCache::new();
    let tree = |name: &str| Arc::new(BuildTree::leaf(name));
    let partial = Expansion {
        trees: Arc::new(vec![tree("A")]),
        exhaustive: false,
    };
    let full = Expansion {
        trees: Arc::new(vec![tree("A"), tree("B")]),
        exhaustive: true,
    };

    cache.store("Cloud", 2, partial.clone());
    assert!(cache.lookup("Cloud", 2, 1).is_some());
    assert!(cache.lookup("Cloud", 2, 2).is_none());

    cache.store("Cloud", 2, full);
    let hit = cache.lookup("Cloud", 2, 50).unwrap();
    assert!(hit.exhaustive);
    assert_eq!(hit.trees.len(), 2);

    // An exhaustive entry is never downgraded.
    cache.store("Cloud", 2, partial);
    assert!(cache.lookup("Cloud", 2, 50).unwrap().exhaustive);

    // Tier is part of the key.
    assert!(cache.lookup("Cloud", 3, 1).is_none());
    cache.clear();
    assert!(cache.is_empty());
}

// --- enumeration order ---

#[test]
fn test_diagonal_cells_order() {
    let (cells, cut) = diagonal_cells(2, 3, false, 10);
    assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0), (0, 2), (1, 1), (1, 2)]);
    assert!(!cut);
}

#[test]
fn test_diagonal_cells_symmetric_skips_mirrors() {
    let (cells, cut) = diagonal_cells(3, 3, true, 10);
    assert_eq!(cells, vec![(0, 0), (0, 1), (0, 2), (1, 1), (1, 2), (2, 2)]);
    assert!(!cut);
}

#[test]
fn test_diagonal_cells_capped() {
    let (cells, cut) = diagonal_cells(4, 4, false, 3);
    assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0)]);
    assert!(cut);
    let (empty, cut) = diagonal_cells(0, 4, false, 3);
    assert!(empty.is_empty());
    assert!(!cut);
}

#[test]
fn test_pool_size_bounds() {
    assert_eq!(pool_size(0, None), 1);
    assert_eq!(pool_size(5, Some(2)), 2);
    assert_eq!(pool_size(2, Some(8)), 2);
    assert!(pool_size(1000, None) >= 1);
}
