//! CLI command handler: merge settings file and flags, then dispatch the subcommand.

use anyhow::Result;
use log::debug;

use crate::Opts;
use crate::engine::arg_parser::{Cli, Commands, CommonArgs};
use crate::engine::handlers::{handle_element, handle_search, handle_tiers};
use crate::utils::config::{DEFAULT_COUNT, PackagePaths};
use crate::utils::{apply_file_to_opts, load_craftsearch_toml, setup_logging};

/// Defaults, then `.craftsearch.toml` in the working directory, then common flags.
fn setup_opts(common: &CommonArgs) -> Opts {
    let mut opts = Opts {
        count: DEFAULT_COUNT,
        ..Opts::default()
    };
    if let Ok(cwd) = std::env::current_dir()
        && let Some(file) = load_craftsearch_toml(&cwd)
    {
        apply_file_to_opts(&file, &mut opts);
    }
    if let Some(ref catalog) = common.catalog {
        opts.catalog = Some(catalog.clone());
    }
    if let Some(verbose) = common.verbose {
        opts.verbose = verbose;
    }
    setup_logging(opts.verbose);
    debug!(
        "{} CONFIG:{:#?}",
        PackagePaths::get().pkg_name().to_uppercase(),
        opts
    );
    opts
}

/// Run the requested subcommand.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let mut opts = setup_opts(cli.command.common());
    match &cli.command {
        Commands::Search {
            target,
            method,
            count,
            delay,
            threads,
            json,
            ..
        } => {
            if let Some(m) = method {
                opts.mode = *m;
            }
            if let Some(n) = count {
                opts.count = *n;
            }
            if let Some(d) = delay {
                opts.delay_ms = *d;
            }
            if threads.is_some() {
                opts.threads = *threads;
            }
            if let Some(j) = json {
                opts.json = *j;
            }
            handle_search(&opts, target)
        }
        Commands::Tiers { .. } => handle_tiers(&opts),
        Commands::Element { name, .. } => handle_element(&opts, name),
    }
}
