use crossbeam_channel::{Receiver, Sender};
use log::debug;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::SearchMode;
use crate::engine::expand::{ExpansionCache, Expander};
use crate::engine::traversal::{Flow, explore_relation};
use crate::engine::tree::BuildTree;
use crate::graph::{CraftGraph, NodeId, RelationId};
use crate::pipeline::context::{Offer, SearchContext};

/// Everything a search worker reads. Cloned (by `Arc`) into each worker thread.
#[derive(Clone)]
pub struct WorkerEnv {
    pub graph: Arc<CraftGraph>,
    pub cache: Arc<ExpansionCache>,
    pub ctx: Arc<SearchContext>,
    pub target: NodeId,
    pub mode: SearchMode,
}

/// Single search worker: take top-level relations from work_rx, explore each, send accepted
/// trees on found_tx. Exits when the queue is drained or the search stops.
fn search_worker_loop(
    worker_id: usize,
    work_rx: Receiver<RelationId>,
    found_tx: Sender<Arc<BuildTree>>,
    env: WorkerEnv,
) {
    let ctx = Arc::clone(&env.ctx);
    let should_stop = move || ctx.should_stop();
    let expander = Expander::new(
        &env.graph,
        &env.cache,
        &env.ctx.nodes_visited,
        &should_stop,
        env.ctx.max_count(),
    );
    let target_name = env.graph.node(env.target).item.name.as_str();
    let mut explored = 0_usize;

    while let Ok(rel_id) = work_rx.recv() {
        if env.ctx.should_stop() {
            break;
        }
        explored += 1;
        let flow = explore_relation(
            &expander,
            target_name,
            env.graph.relation(rel_id),
            env.mode,
            |tree| match env.ctx.offer(&tree) {
                Offer::Accepted => {
                    if found_tx.send(tree).is_err() {
                        Flow::Stop
                    } else {
                        Flow::Continue
                    }
                }
                Offer::Duplicate => Flow::Continue,
                Offer::Closed => Flow::Stop,
            },
        );
        if flow == Flow::Stop {
            break;
        }
    }
    debug!("worker {worker_id}: done after {explored} relation(s)");
    drop(found_tx);
}

/// Spawn search workers on `work_rx`. Caller must drop its `found_tx` after this so the
/// collector sees the channel close once the last worker exits.
pub fn spawn_search_workers(
    work_rx: Receiver<RelationId>,
    found_tx: &Sender<Arc<BuildTree>>,
    env: &WorkerEnv,
    num_threads: usize,
) -> Vec<JoinHandle<()>> {
    (0..num_threads)
        .map(|worker_id| {
            let work_rx = work_rx.clone();
            let found_tx = found_tx.clone();
            let env = env.clone();
            thread::spawn(move || search_worker_loop(worker_id, work_rx, found_tx, env))
        })
        .collect()
}
