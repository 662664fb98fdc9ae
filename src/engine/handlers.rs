//! Command handlers for search, tiers and element operations

use anyhow::{Context, Result};
use log::{info, warn};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::engine::Searcher;
use crate::engine::progress::{setup_counter, update_progress_bar};
use crate::graph::Catalog;
use crate::pipeline::{TreePayload, relay_stream};
use crate::utils::{Colors, resolve_catalog_path};
use crate::{Opts, SearchOutcome, SearchRequest};

/// Load the catalog named by opts (or env / default), relative to the working directory.
pub fn load_catalog(opts: &Opts) -> Result<Catalog> {
    let cwd = std::env::current_dir().context("read current directory")?;
    let path = resolve_catalog_path(&cwd, opts.catalog.as_deref());
    Catalog::load(&path).with_context(|| format!("load catalog {}", path.display()))
}

/// Handle search command: stream trees as they are accepted, then print the summary.
pub fn handle_search(opts: &Opts, target: &str) -> Result<()> {
    let catalog = load_catalog(opts)?;
    let searcher = Searcher::new(catalog.graph()).with_threads(opts.threads);

    let cancel_requested = Arc::new(AtomicBool::new(false));
    let cancel_requested_handler = Arc::clone(&cancel_requested);
    ctrlc::set_handler(move || {
        cancel_requested_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;

    let request = SearchRequest::new(target, opts.count, opts.mode)
        .with_cancel(Arc::clone(&cancel_requested));
    let stream = searcher.stream_recipes(&request)?;
    let counter = setup_counter(opts.verbose && !opts.json, "Found", " trees");
    let delay = Some(Duration::from_millis(opts.delay_ms));

    let mut stdout = std::io::stdout().lock();
    let mut shown = 0_usize;
    let outcome = relay_stream(stream, delay, |msg| {
        if opts.json {
            writeln!(stdout, "{}", serde_json::to_string(msg)?)?;
            return Ok(());
        }
        if let TreePayload::Recipe(tree) = &msg.tree {
            shown += 1;
            if let Some(bar) = &counter {
                update_progress_bar(bar, 1);
            }
            writeln!(stdout, "#{shown} ({} nodes)", tree.complexity())?;
            write!(stdout, "{}", tree.render())?;
        }
        Ok(())
    })?;
    drop(stdout);

    if !opts.json {
        print_summary(&outcome);
    }
    if cancel_requested.load(Ordering::Relaxed) {
        warn!("Search cancelled by user; results are partial");
    }
    Ok(())
}

fn print_summary(outcome: &SearchOutcome) {
    info!(
        "{} | {} | {}",
        Colors::colorize(Colors::TARGET, &outcome.root.target),
        Colors::colorize(Colors::COUNT, &format!("Trees: {}", outcome.len())),
        Colors::colorize(
            Colors::MUTED,
            &format!(
                "Visited: {} in {:?}",
                outcome.nodes_visited, outcome.duration
            )
        )
    );
}

/// Handle tiers command: item names grouped by tier.
pub fn handle_tiers(opts: &Opts) -> Result<()> {
    let catalog = load_catalog(opts)?;
    let groups = catalog.tier_groups();
    if opts.json {
        let tiers: Vec<u32> = groups.keys().copied().collect();
        println!(
            "{}",
            serde_json::to_string(&json!({ "tiers": tiers, "elements": groups }))?
        );
        return Ok(());
    }
    for (tier, names) in &groups {
        println!(
            "{} ({}): {}",
            Colors::colorize(Colors::TIER, &format!("Tier {tier}")),
            names.len(),
            names.join(", ")
        );
    }
    Ok(())
}

/// Handle element command: the catalog record plus its reverse dependencies.
pub fn handle_element(opts: &Opts, name: &str) -> Result<()> {
    let catalog = load_catalog(opts)?;
    let item = catalog.item(name)?;
    let graph = catalog.graph();
    let used_in: Vec<&str> = graph
        .consumers(name)
        .into_iter()
        .map(|rel| graph.node(rel.target).item.name.as_str())
        .collect();

    if opts.json {
        println!(
            "{}",
            serde_json::to_string(&json!({ "element": item, "usedIn": used_in }))?
        );
        return Ok(());
    }
    println!(
        "{} {}",
        Colors::colorize(Colors::TARGET, &item.name),
        Colors::colorize(Colors::TIER, &format!("(tier {})", item.tier))
    );
    for recipe in &item.recipes {
        println!("  = {}", recipe.ingredients.join(" + "));
    }
    if !used_in.is_empty() {
        println!("  used in: {}", used_in.join(", "));
    }
    Ok(())
}
