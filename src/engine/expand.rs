//! Cached expansion of intermediate items into their complete subtrees.
//!
//! The list for an item is computed once per `(name, tier)` and reused by every combination
//! that needs it, so a shared intermediate is expanded once instead of once per path.
//! Lists are capped at the requested result count: `cap` distinct subtrees per ingredient are
//! enough to form `cap` distinct combinations above it.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::engine::tree::BuildTree;
use crate::graph::{CraftGraph, NodeId};

pub type Subtrees = Arc<Vec<Arc<BuildTree>>>;

/// Subtree list for one item.
#[derive(Clone, Debug)]
pub struct Expansion {
    pub trees: Subtrees,
    /// True when `trees` holds every distinct subtree, not just the first `cap`.
    pub exhaustive: bool,
}

impl Expansion {
    fn covers(&self, cap: usize) -> bool {
        self.exhaustive || self.trees.len() >= cap
    }
}

/// Expansion lists keyed by `(item name, tier)`. Shared by every search on the same graph.
///
/// Two workers may compute the same key concurrently; each write is a single store, and a
/// capped entry is only replaced by one that covers more.
#[derive(Debug, Default)]
pub struct ExpansionCache {
    entries: RwLock<HashMap<(String, u32), Expansion>>,
}

impl ExpansionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached list usable for `cap`, if any.
    pub fn lookup(&self, name: &str, tier: u32, cap: usize) -> Option<Expansion> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(&(name.to_string(), tier))
            .filter(|e| e.covers(cap))
            .cloned()
    }

    pub fn store(&self, name: &str, tier: u32, expansion: Expansion) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let key = (name.to_string(), tier);
        let replace = match entries.get(&key) {
            None => true,
            Some(old) => {
                !old.exhaustive
                    && (expansion.exhaustive || expansion.trees.len() > old.trees.len())
            }
        };
        if replace {
            entries.insert(key, expansion);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

/// Cells `(left, right)` of a `rows x cols` choice grid in diagonal order, at most `cap`.
/// With `symmetric` (both ingredients are the same item) only `left <= right` is produced,
/// since the mirrored cell is the same build.
/// Returns the cells and whether the grid had more than `cap`.
pub fn diagonal_cells(
    rows: usize,
    cols: usize,
    symmetric: bool,
    cap: usize,
) -> (Vec<(usize, usize)>, bool) {
    let total = if symmetric {
        rows * (rows + 1) / 2
    } else {
        rows * cols
    };
    let mut cells = Vec::with_capacity(total.min(cap));
    if rows == 0 || cols == 0 {
        return (cells, false);
    }
    'diagonals: for d in 0..(rows + cols - 1) {
        for i in 0..=d.min(rows - 1) {
            let j = d - i;
            if j >= cols || (symmetric && i > j) {
                continue;
            }
            if cells.len() == cap {
                break 'diagonals;
            }
            cells.push((i, j));
        }
    }
    let more = total > cells.len();
    (cells, more)
}

/// Interleave per-relation lists (first of each, then second of each, ...), drop
/// duplicates by canonical key, keep at most `cap`. Returns whether anything was cut.
fn round_robin(lists: Vec<Vec<Arc<BuildTree>>>, cap: usize) -> (Vec<Arc<BuildTree>>, bool) {
    let longest = lists.iter().map(Vec::len).max().unwrap_or(0);
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for idx in 0..longest {
        for list in &lists {
            let Some(tree) = list.get(idx) else {
                continue;
            };
            if !seen.insert(tree.canonical_key()) {
                continue;
            }
            if out.len() == cap {
                return (out, true);
            }
            out.push(Arc::clone(tree));
        }
    }
    (out, false)
}

/// Expands items for one worker. Holds only borrowed, shared state.
pub struct Expander<'a> {
    graph: &'a CraftGraph,
    cache: &'a ExpansionCache,
    nodes_visited: &'a AtomicUsize,
    should_stop: &'a dyn Fn() -> bool,
    cap: usize,
}

impl<'a> Expander<'a> {
    pub fn new(
        graph: &'a CraftGraph,
        cache: &'a ExpansionCache,
        nodes_visited: &'a AtomicUsize,
        should_stop: &'a dyn Fn() -> bool,
        cap: usize,
    ) -> Self {
        Self {
            graph,
            cache,
            nodes_visited,
            should_stop,
            cap,
        }
    }

    pub fn should_stop(&self) -> bool {
        (self.should_stop)()
    }

    pub fn visit(&self) {
        self.nodes_visited.fetch_add(1, Ordering::Relaxed);
    }

    /// All complete subtrees for `id`, capped. An empty list means the item cannot be grounded
    /// in tier-0 items. `None` when the search was stopped mid-way; nothing is cached then.
    pub fn subtrees(&self, id: NodeId) -> Option<Expansion> {
        let item = &self.graph.node(id).item;
        if item.is_base() {
            return Some(Expansion {
                trees: Arc::new(vec![Arc::new(BuildTree::leaf(item.name.as_str()))]),
                exhaustive: true,
            });
        }
        if let Some(hit) = self.cache.lookup(&item.name, item.tier, self.cap) {
            return Some(hit);
        }

        let mut per_relation = Vec::new();
        let mut exhaustive = true;
        for relation in self.graph.parent_relations(id) {
            if self.should_stop() {
                return None;
            }
            self.visit();
            let Some((l, r)) = relation.pair() else {
                continue;
            };
            let left = self.subtrees(l)?;
            let right = self.subtrees(r)?;
            let (cells, cut) =
                diagonal_cells(left.trees.len(), right.trees.len(), l == r, self.cap);
            exhaustive &= left.exhaustive && right.exhaustive && !cut;
            let combos: Vec<Arc<BuildTree>> = cells
                .into_iter()
                .map(|(i, j)| {
                    Arc::new(BuildTree::craft(
                        item.name.as_str(),
                        Arc::clone(&left.trees[i]),
                        Arc::clone(&right.trees[j]),
                    ))
                })
                .collect();
            per_relation.push(combos);
        }

        let (mut trees, cut) = round_robin(per_relation, self.cap);
        trees.sort_by_key(|t| t.complexity());
        let expansion = Expansion {
            trees: Arc::new(trees),
            exhaustive: exhaustive && !cut,
        };
        self.cache.store(&item.name, item.tier, expansion.clone());
        Some(expansion)
    }
}
