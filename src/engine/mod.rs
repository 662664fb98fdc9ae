//! Engine module: tree search core plus the CLI surface

pub mod arg_parser;
pub mod cli;
pub mod core;
pub mod expand;
pub mod handlers;
pub mod progress;
pub mod traversal;
pub mod tree;

// Re-export commonly used items
pub use arg_parser::{Cli, Commands, CommonArgs};
pub use cli::handle_run;
pub use core::{RecipeStream, SearchError, Searcher};
pub use expand::{Expander, Expansion, ExpansionCache};
pub use handlers::{handle_element, handle_search, handle_tiers};
pub use traversal::{Flow, explore_relation};
pub use tree::{BuildTree, RootTree, merge};
