//! Craftsearch CLI: stream distinct recipe trees for an item; list tiers; inspect elements.

use clap::Parser;
use craftsearch::engine::arg_parser::Cli;
use craftsearch::engine::handle_run;
use craftsearch::utils::config::PackagePaths;
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let started = Instant::now();
    let cli = Cli::parse();
    let result = handle_run(&cli);
    log::debug!("Finished in {:?}", started.elapsed());
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e:#}", PackagePaths::get().pkg_name());
            ExitCode::FAILURE
        }
    }
}
