//! Load `.craftsearch.toml` from a directory (CLI only). The library takes its settings as
//! arguments; nothing here is consulted by `Searcher`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::SearchMode;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct CraftsearchToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    catalog: Option<String>,
    method: Option<SearchMode>,
    count: Option<usize>,
    delay_ms: Option<u64>,
    threads: Option<usize>,
    verbose: Option<bool>,
    json: Option<bool>,
}

/// Load the settings file from `dir` if present. Returns None if missing or unreadable.
pub fn load_craftsearch_toml(dir: &Path) -> Option<CraftsearchToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    parse_craftsearch_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

pub fn parse_craftsearch_toml(s: &str) -> Result<CraftsearchToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $opts:expr, $field:ident => $opts_field:ident) => {
        if let Some(v) = $section.$field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file settings to opts (only fields present in the file). Call before applying CLI flags.
pub fn apply_file_to_opts(file: &CraftsearchToml, opts: &mut Opts) {
    let s = &file.settings;
    if let Some(ref p) = s.catalog {
        opts.catalog = Some(PathBuf::from(p));
    }
    apply_file_opt!(s, opts, method => mode);
    if let Some(count) = s.count.filter(|&n| n > 0) {
        opts.count = count;
    }
    apply_file_opt!(s, opts, delay_ms => delay_ms);
    if let Some(threads) = s.threads {
        opts.threads = Some(threads);
    }
    apply_file_opt!(s, opts, verbose => verbose);
    apply_file_opt!(s, opts, json => json);
}
