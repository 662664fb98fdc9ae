//! Application configuration constants.
//! Tuning and defaults in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
    catalog_env_key: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
                catalog_env_key: format!("{}_CATALOG", pkg.to_uppercase()),
            }
        })
    }

    pub fn pkg_name(&self) -> &'static str {
        self.pkg_name
    }

    /// Per-directory settings file, e.g. `.craftsearch.toml`.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Environment variable naming the catalog file, e.g. `CRAFTSEARCH_CATALOG`.
    pub fn catalog_env_key(&self) -> &str {
        &self.catalog_env_key
    }
}

/// Catalog location when neither flag, env nor settings file name one.
pub const DEFAULT_CATALOG_PATH: &str = "data/elements.json";

// ---- Search ----

/// Trees returned when no count is given.
pub const DEFAULT_COUNT: usize = 1;

/// Capacity of the worker -> collector channel. Workers block only here, and the collector
/// always drains it.
pub const FOUND_CHANNEL_CAP: usize = 256;

// ---- Worker threads ----

/// Worker pool limits. Use [`WorkerLimits::current()`] to fill `all_threads` from rayon.
#[derive(Clone, Copy, Debug)]
pub struct WorkerLimits {
    /// Available threads (from rayon); set by [`WorkerLimits::current()`].
    pub all_threads: usize,
}

impl WorkerLimits {
    /// Pool never shrinks below this.
    pub const FLOOR_THREADS: usize = 1;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
        }
    }
}
