//! Public and internal types for the craftsearch API and CLI.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::engine::tree::RootTree;

/// Combination of ingredients that produces an item.
///
/// Only two-ingredient recipes are usable; the length is checked while building the
/// [`CraftGraph`](crate::graph::CraftGraph), so a bad recipe never fails a catalog load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ingredients: Vec<String>,
}

impl Recipe {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            ingredients: vec![left.into(), right.into()],
        }
    }

    /// The ingredient pair, or `None` when the recipe does not have exactly two ingredients.
    pub fn pair(&self) -> Option<[&str; 2]> {
        match self.ingredients.as_slice() {
            [a, b] => Some([a.as_str(), b.as_str()]),
            _ => None,
        }
    }
}

/// One catalog record: name (unique), tier (0 = base item) and the recipes producing it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub tier: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recipes: Vec<Recipe>,
}

impl Item {
    pub fn new(name: impl Into<String>, tier: u32, recipes: Vec<Recipe>) -> Self {
        Self {
            name: name.into(),
            tier,
            recipes,
        }
    }

    pub fn base(name: impl Into<String>) -> Self {
        Self::new(name, 0, Vec::new())
    }

    pub fn is_base(&self) -> bool {
        self.tier == 0
    }
}

/// Crawled catalogs write `null` for items without recipes.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Order in which a worker walks its share of the combination space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Level order: choices are explored diagonal by diagonal.
    #[default]
    Bfs,
    /// Stack order: one left choice is exhausted before the next is tried.
    Dfs,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Bfs => write!(f, "bfs"),
            SearchMode::Dfs => write!(f, "dfs"),
        }
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(SearchMode::Bfs),
            "dfs" => Ok(SearchMode::Dfs),
            other => Err(format!("unknown search method '{other}' (expected bfs or dfs)")),
        }
    }
}

/// One search invocation: target item, result bound, traversal order and an optional cancel flag.
#[derive(Clone, Debug)]
pub struct SearchRequest {
    pub target: String,
    /// Upper bound on distinct trees returned. Must be positive.
    pub max_count: usize,
    pub mode: SearchMode,
    /// Checked by workers at the same point as the `max_count` bound.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl SearchRequest {
    pub fn new(target: impl Into<String>, max_count: usize, mode: SearchMode) -> Self {
        Self {
            target: target.into(),
            max_count,
            mode,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Final aggregate of a search: accepted trees under a synthetic root, plus telemetry.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub root: RootTree,
    /// Expansion steps considered across all workers. Reporting only.
    pub nodes_visited: usize,
    pub duration: Duration,
}

impl SearchOutcome {
    pub fn len(&self) -> usize {
        self.root.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.ingredients.is_empty()
    }
}

/// Resolved CLI options after merging defaults, `.craftsearch.toml`, environment and flags.
#[derive(Clone, Debug, Default)]
pub struct Opts {
    /// Catalog JSON path. When None, resolved from env / `.env` / default location.
    pub catalog: Option<PathBuf>,
    pub mode: SearchMode,
    pub count: usize,
    /// Pause between streamed messages, in milliseconds (presentation pacing only).
    pub delay_ms: u64,
    /// Override worker thread count. When None, derived from available parallelism.
    pub threads: Option<usize>,
    pub verbose: bool,
    /// Print stream messages as JSON lines instead of rendered trees.
    pub json: bool,
}
