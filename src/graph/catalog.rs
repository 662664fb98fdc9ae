//! Item catalog: loading, validation and lookups. Owns the lazily built [`CraftGraph`].

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use log::debug;
use thiserror::Error;

use super::builder::CraftGraph;
use crate::Item;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate item in catalog: {0}")]
    DuplicateItem(String),

    #[error("Catalog item at position {0} has an empty name")]
    EmptyName(usize),

    #[error("Item not found: {0}")]
    NotFound(String),
}

/// Immutable, validated set of items. Names are unique.
#[derive(Debug)]
pub struct Catalog {
    items: Vec<Item>,
    by_name: HashMap<String, usize>,
    graph: OnceLock<Arc<CraftGraph>>,
}

impl Catalog {
    /// Validate names (non-empty, unique) and index the items. Recipes are not checked here.
    pub fn from_items(items: Vec<Item>) -> Result<Self, CatalogError> {
        let mut by_name = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if item.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(idx));
            }
            if by_name.insert(item.name.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateItem(item.name.clone()));
            }
        }
        Ok(Self {
            items,
            by_name,
            graph: OnceLock::new(),
        })
    }

    pub fn from_json_str(s: &str) -> Result<Self, CatalogError> {
        let items: Vec<Item> = serde_json::from_str(s)?;
        Self::from_items(items)
    }

    /// Load a JSON array of `{name, tier, recipes}` records.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let data = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json_str(&data)?;
        debug!("Loaded {} items from {}", catalog.items.len(), path.display());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.by_name.get(name).map(|&idx| &self.items[idx])
    }

    /// Element lookup by name.
    pub fn item(&self, name: &str) -> Result<&Item, CatalogError> {
        self.get(name).ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    /// Item names grouped by tier. Tiers ascend; names within a tier are sorted.
    pub fn tier_groups(&self) -> BTreeMap<u32, Vec<String>> {
        let mut groups: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for item in &self.items {
            groups.entry(item.tier).or_default().push(item.name.clone());
        }
        for names in groups.values_mut() {
            names.sort();
        }
        groups
    }

    /// The crafting graph for this catalog. Built on first call; later calls return the same graph.
    pub fn graph(&self) -> Arc<CraftGraph> {
        Arc::clone(
            self.graph
                .get_or_init(|| Arc::new(CraftGraph::build(&self.items))),
        )
    }
}
