//! Catalog and crafting graph.

pub mod builder;
pub mod catalog;

pub use builder::{
    CraftGraph, CraftNode, CraftRelation, GraphDiagnostics, NodeId, RelationId, RelationKind,
};
pub use catalog::{Catalog, CatalogError};
