pub mod catalog_path;
pub mod config;
pub mod craftsearch_toml;
pub mod logger;

pub use catalog_path::resolve_catalog_path;
pub use config::*;
pub use craftsearch_toml::{apply_file_to_opts, load_craftsearch_toml};
pub use logger::{Colors, setup_logging};
