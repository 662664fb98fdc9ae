//! Crafting graph: one node per item, recipe relations between them.
//!
//! A relation is kept as a parent of its target only when both ingredients exist and have a
//! strictly lower tier than the target. Tier strictly decreases along every parent edge, so the
//! parent relations form a DAG and any walk over them terminates.

use std::collections::{BTreeMap, HashMap};

use log::debug;

use crate::{Item, Recipe};

pub type NodeId = usize;
pub type RelationId = usize;

/// What a relation represents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelationKind {
    /// Two-ingredient recipe producing the target.
    Recipe(Recipe),
    /// Link from the synthetic root to a tier-0 item. Bookkeeping only.
    BasicElement,
}

/// `sources` produce `target`. Recipe relations have two sources (equal for `X + X`);
/// basic-element relations have none.
#[derive(Clone, Debug)]
pub struct CraftRelation {
    pub target: NodeId,
    pub sources: Vec<NodeId>,
    pub kind: RelationKind,
}

impl CraftRelation {
    /// The two ingredient nodes of a recipe relation.
    pub fn pair(&self) -> Option<(NodeId, NodeId)> {
        match (&self.kind, self.sources.as_slice()) {
            (RelationKind::Recipe(_), &[left, right]) => Some((left, right)),
            _ => None,
        }
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        match &self.kind {
            RelationKind::Recipe(recipe) => Some(recipe),
            RelationKind::BasicElement => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CraftNode {
    pub item: Item,
    /// Relations producing this item.
    pub parents: Vec<RelationId>,
    /// Relations consuming this item as an ingredient.
    pub children: Vec<RelationId>,
}

/// Counters for recipes dropped while building. Filtering is not an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphDiagnostics {
    /// Recipes without exactly two ingredients.
    pub malformed: usize,
    /// Recipes naming an item missing from the catalog.
    pub unknown_ingredient: usize,
    /// Recipes with an ingredient whose tier is not strictly below the target's.
    pub tier_violation: usize,
    /// Recipes kept as parent relations.
    pub retained: usize,
}

/// Read-only after [`CraftGraph::build`]; share it freely across searches.
#[derive(Debug)]
pub struct CraftGraph {
    nodes: Vec<CraftNode>,
    relations: Vec<CraftRelation>,
    by_name: HashMap<String, NodeId>,
    /// Relations from the synthetic root to every tier-0 item.
    root_relations: Vec<RelationId>,
    diagnostics: GraphDiagnostics,
}

impl CraftGraph {
    /// Build the graph in one pass over `items`. Node ids follow catalog order.
    pub fn build(items: &[Item]) -> Self {
        let mut nodes: Vec<CraftNode> = items
            .iter()
            .map(|item| CraftNode {
                item: item.clone(),
                parents: Vec::new(),
                children: Vec::new(),
            })
            .collect();
        let by_name: HashMap<String, NodeId> = nodes
            .iter()
            .enumerate()
            .map(|(id, node)| (node.item.name.clone(), id))
            .collect();
        let mut relations = Vec::new();
        let mut diagnostics = GraphDiagnostics::default();

        for target in 0..nodes.len() {
            let target_tier = nodes[target].item.tier;
            let recipes = nodes[target].item.recipes.clone();
            for recipe in recipes {
                let Some([a, b]) = recipe.pair() else {
                    diagnostics.malformed += 1;
                    continue;
                };
                let (Some(&left), Some(&right)) = (by_name.get(a), by_name.get(b)) else {
                    diagnostics.unknown_ingredient += 1;
                    continue;
                };
                if nodes[left].item.tier >= target_tier || nodes[right].item.tier >= target_tier {
                    diagnostics.tier_violation += 1;
                    continue;
                }

                let id = relations.len();
                relations.push(CraftRelation {
                    target,
                    sources: vec![left, right],
                    kind: RelationKind::Recipe(recipe),
                });
                nodes[target].parents.push(id);
                nodes[left].children.push(id);
                if right != left {
                    nodes[right].children.push(id);
                }
                diagnostics.retained += 1;
            }
        }

        let mut root_relations = Vec::new();
        for (id, node) in nodes.iter().enumerate() {
            if node.item.is_base() {
                root_relations.push(relations.len());
                relations.push(CraftRelation {
                    target: id,
                    sources: Vec::new(),
                    kind: RelationKind::BasicElement,
                });
            }
        }

        debug!(
            "Crafting graph: {} nodes, {} recipes kept, {} malformed, {} unknown ingredient, {} tier violation",
            nodes.len(),
            diagnostics.retained,
            diagnostics.malformed,
            diagnostics.unknown_ingredient,
            diagnostics.tier_violation
        );

        Self {
            nodes,
            relations,
            by_name,
            root_relations,
            diagnostics,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn node(&self, id: NodeId) -> &CraftNode {
        &self.nodes[id]
    }

    pub fn get(&self, name: &str) -> Option<&CraftNode> {
        self.node_id(name).map(|id| &self.nodes[id])
    }

    pub fn relation(&self, id: RelationId) -> &CraftRelation {
        &self.relations[id]
    }

    pub fn parent_relations(&self, id: NodeId) -> impl Iterator<Item = &CraftRelation> + '_ {
        self.nodes[id]
            .parents
            .iter()
            .map(move |&rel| &self.relations[rel])
    }

    /// Relations in which `name` is an ingredient (reverse dependencies).
    pub fn consumers(&self, name: &str) -> Vec<&CraftRelation> {
        self.get(name)
            .map(|node| {
                node.children
                    .iter()
                    .map(|&rel| &self.relations[rel])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Tier-0 items, reached through the synthetic root.
    pub fn base_items(&self) -> impl Iterator<Item = &CraftNode> + '_ {
        self.root_relations
            .iter()
            .map(move |&rel| &self.nodes[self.relations[rel].target])
    }

    pub fn diagnostics(&self) -> GraphDiagnostics {
        self.diagnostics
    }

    /// Retained parent recipes per item, by name. Used to compare two builds structurally.
    pub fn retained_parents(&self) -> BTreeMap<String, Vec<[String; 2]>> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(id, node)| {
                let pairs = self
                    .parent_relations(id)
                    .filter_map(|rel| rel.pair())
                    .map(|(l, r)| {
                        [
                            self.nodes[l].item.name.clone(),
                            self.nodes[r].item.name.clone(),
                        ]
                    })
                    .collect();
                (node.item.name.clone(), pairs)
            })
            .collect()
    }
}
