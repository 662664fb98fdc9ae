//! Logger setup and terminal colours for the CLI.

use colored::{ColoredString, Colorize};
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

use crate::utils::config::PackagePaths;

/// Install the crate logger. Dependencies log warnings only; this crate logs at info, or at
/// debug with `verbose`. `RUST_LOG` still overrides both.
pub fn setup_logging(verbose: bool) {
    let own_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // try_init: tests and embedders may have installed a logger already.
    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(PackagePaths::get().pkg_name(), own_level)
        .format(|buf, record| {
            let prefix = PackagePaths::get().pkg_name().cyan();
            match record.level() {
                Level::Error => writeln!(buf, "[{prefix} {}] {}", "ERROR".red(), record.args()),
                Level::Warn => writeln!(
                    buf,
                    "[{prefix} {} {}] {}",
                    "WARN".yellow(),
                    record.target().white(),
                    record.args()
                ),
                Level::Debug | Level::Trace => {
                    writeln!(buf, "[{prefix} {}] {}", "debug".dimmed(), record.args())
                }
                Level::Info => writeln!(buf, "[{prefix}] {}", record.args()),
            }
        })
        .try_init();
}

/// Colours for CLI summaries.
pub struct Colors;

impl Colors {
    pub const TARGET: &'static str = "cyan";
    pub const COUNT: &'static str = "green";
    pub const MUTED: &'static str = "white";
    pub const TIER: &'static str = "yellow";

    pub fn colorize(color: &str, text: &str) -> ColoredString {
        text.color(color)
    }
}
