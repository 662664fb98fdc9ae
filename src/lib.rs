//! Craftsearch: concurrent recipe-tree search for combination-crafting games.
//!
//! Load a [`Catalog`], take its [`CraftGraph`], and run searches through a [`Searcher`]:
//!
//! ```ignore
//! let catalog = craftsearch::Catalog::load(std::path::Path::new("data/elements.json"))?;
//! let searcher = craftsearch::Searcher::new(catalog.graph());
//! let request = craftsearch::SearchRequest::new("Steam", 5, craftsearch::SearchMode::Bfs);
//! let outcome = searcher.find_recipes(&request)?;
//! for tree in outcome.root.trees() {
//!     print!("{}", tree.render());
//! }
//! ```

pub mod engine;
pub mod graph;
pub mod pipeline;
pub mod query;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use engine::{BuildTree, RecipeStream, RootTree, SearchError, Searcher};
pub use graph::{Catalog, CatalogError, CraftGraph, GraphDiagnostics};
pub use query::{QueryError, SearchQuery};

use std::sync::Arc;

/// Blocking search over `graph`: up to `max_count` distinct trees for `target`, plus the
/// nodes-visited count and elapsed time in the returned outcome.
///
/// Builds a fresh [`Searcher`] (and expansion cache) per call; keep a `Searcher` around to
/// reuse the cache across searches.
pub fn find_recipes(
    graph: &Arc<CraftGraph>,
    target: &str,
    max_count: usize,
    mode: SearchMode,
) -> Result<SearchOutcome, SearchError> {
    Searcher::new(Arc::clone(graph)).find_recipes(&SearchRequest::new(target, max_count, mode))
}

/// Streaming search over `graph`. Trees arrive on the stream as they are accepted;
/// [`RecipeStream::wait`] returns the same summary as [`find_recipes`].
pub fn stream_recipes(
    graph: &Arc<CraftGraph>,
    target: &str,
    max_count: usize,
    mode: SearchMode,
) -> Result<RecipeStream, SearchError> {
    Searcher::new(Arc::clone(graph)).stream_recipes(&SearchRequest::new(target, max_count, mode))
}
