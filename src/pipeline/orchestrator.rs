use crossbeam_channel::{Receiver, Sender};
use log::debug;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::SearchOutcome;
use crate::engine::SearchError;
use crate::engine::tree::{BuildTree, merge};
use crate::pipeline;
use crate::pipeline::context::Offer;
use crate::pipeline::workers::WorkerEnv;
use crate::utils::config::{FOUND_CHANNEL_CAP, WorkerLimits};

/// Worker count for a search: one per top-level relation, capped by the override or by
/// available parallelism, at least one.
pub fn pool_size(relations: usize, override_threads: Option<usize>) -> usize {
    let limit = override_threads.unwrap_or(WorkerLimits::current().all_threads);
    relations.min(limit).max(WorkerLimits::FLOOR_THREADS)
}

/// Collector: drains found trees and forwards them to the caller's stream. Runs until every
/// worker has dropped its sender. A gone reader is ignored so workers never block on it.
pub fn spawn_collector(
    found_rx: Receiver<Arc<BuildTree>>,
    stream_tx: Sender<Arc<BuildTree>>,
) -> JoinHandle<usize> {
    thread::spawn(move || {
        let mut streamed = 0_usize;
        while let Ok(tree) = found_rx.recv() {
            streamed += 1;
            let _ = stream_tx.send(tree);
        }
        streamed
    })
}

/// Run one search to completion: collector first, then seed the work queue and start the
/// workers, join everything, merge the accepted trees.
pub fn run_search(
    env: WorkerEnv,
    num_threads: Option<usize>,
    stream_tx: Sender<Arc<BuildTree>>,
    started: Instant,
) -> Result<SearchOutcome, SearchError> {
    let target = env.graph.node(env.target);
    let target_name = target.item.name.clone();

    if target.item.is_base() || target.parents.is_empty() {
        debug!("{target_name}: no recipes to expand, single leaf result");
        let leaf = Arc::new(BuildTree::leaf(target_name.as_str()));
        if env.ctx.offer(&leaf) == Offer::Accepted {
            let _ = stream_tx.send(leaf);
        }
        return Ok(finish(&env, target_name, started));
    }

    let relations = target.parents.clone();
    let num_threads = pool_size(relations.len(), num_threads);
    debug!(
        "{target_name}: {} top-level recipe(s), {} worker(s), mode {}",
        relations.len(),
        num_threads,
        env.mode
    );

    let channels = pipeline::create_search_channels(relations.len(), FOUND_CHANNEL_CAP);
    let collector = spawn_collector(channels.found_rx, stream_tx);

    for rel in relations {
        // Capacity covers every relation; the receiver is alive until workers exit.
        let _ = channels.work_tx.send(rel);
    }
    drop(channels.work_tx);

    let worker_handles =
        pipeline::spawn_search_workers(channels.work_rx, &channels.found_tx, &env, num_threads);

    // Dropping the last sender closes the channel so the collector exits.
    drop(channels.found_tx);

    pipeline::join_search_threads(worker_handles, collector)?;
    Ok(finish(&env, target_name, started))
}

fn finish(env: &WorkerEnv, target_name: String, started: Instant) -> SearchOutcome {
    let root = merge(target_name, env.ctx.take_results());
    let outcome = SearchOutcome {
        root,
        nodes_visited: env.ctx.nodes_visited(),
        duration: started.elapsed(),
    };
    debug!(
        "{}: {} tree(s), {} node(s) visited in {:?}",
        outcome.root.target,
        outcome.len(),
        outcome.nodes_visited,
        outcome.duration
    );
    outcome
}
