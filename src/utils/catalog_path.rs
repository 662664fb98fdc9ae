//! Catalog location: explicit path → env var → `.env` in dir → default.

use log::debug;
use std::path::{Path, PathBuf};

use crate::utils::config::{DEFAULT_CATALOG_PATH, PackagePaths};

fn try_env_then_dotenv(dir: &Path) -> Option<PathBuf> {
    let key = PackagePaths::get().catalog_env_key();
    if let Ok(s) = std::env::var(key) {
        let s = s.trim().to_string();
        if !s.is_empty() {
            return Some(PathBuf::from(s));
        }
    }
    let env_path = dir.join(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(&env_path);
        if let Ok(s) = std::env::var(key) {
            let s = s.trim().to_string();
            if !s.is_empty() {
                return Some(PathBuf::from(s));
            }
        }
    }
    None
}

/// Resolve the catalog path. `explicit` comes from the CLI flag or the settings file.
/// Relative results are taken relative to `dir`.
pub fn resolve_catalog_path(dir: &Path, explicit: Option<&Path>) -> PathBuf {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => try_env_then_dotenv(dir).unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH)),
    };
    let path = if path.is_relative() {
        dir.join(path)
    } else {
        path
    };
    debug!("Catalog: {}", path.display());
    path
}
