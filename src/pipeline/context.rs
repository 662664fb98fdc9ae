//! Search context and channels: the only state shared between the workers of one search.

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::engine::tree::BuildTree;
use crate::graph::RelationId;

/// Result of offering a finished tree to the context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Offer {
    /// New tree, counted; stream it.
    Accepted,
    /// Same canonical key as an earlier tree. Dropped.
    Duplicate,
    /// Bound reached or search cancelled. Dropped; the worker should stop.
    Closed,
}

/// Per-search shared state. Scoped to one search call; never reused across targets.
#[derive(Debug)]
pub struct SearchContext {
    max_count: usize,
    /// Expansion steps considered, all workers. Reporting only.
    pub nodes_visited: Arc<AtomicUsize>,
    seen: Mutex<HashSet<String>>,
    results: Mutex<Vec<Arc<BuildTree>>>,
    full: AtomicBool,
    cancel: Arc<AtomicBool>,
}

impl SearchContext {
    /// `cancel` is the caller's flag when given, else a fresh one (see [`Self::cancel_flag`]).
    pub fn new(max_count: usize, cancel: Option<Arc<AtomicBool>>) -> Self {
        Self {
            max_count,
            nodes_visited: Arc::new(AtomicUsize::new(0)),
            seen: Mutex::new(HashSet::new()),
            results: Mutex::new(Vec::new()),
            full: AtomicBool::new(false),
            cancel: cancel.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
        }
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Single stop signal: bound reached or cancelled.
    pub fn should_stop(&self) -> bool {
        self.full.load(Ordering::Acquire) || self.is_cancelled()
    }

    /// Dedup by canonical key (check-and-set), then append under the results lock unless full.
    pub fn offer(&self, tree: &Arc<BuildTree>) -> Offer {
        if self.should_stop() {
            return Offer::Closed;
        }
        let key = tree.canonical_key();
        let fresh = self
            .seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key);
        if !fresh {
            return Offer::Duplicate;
        }
        let mut results = self.results.lock().unwrap_or_else(|e| e.into_inner());
        if results.len() >= self.max_count {
            self.full.store(true, Ordering::Release);
            return Offer::Closed;
        }
        results.push(Arc::clone(tree));
        if results.len() == self.max_count {
            self.full.store(true, Ordering::Release);
        }
        Offer::Accepted
    }

    /// Accepted trees in collection order.
    pub fn take_results(&self) -> Vec<Arc<BuildTree>> {
        std::mem::take(&mut *self.results.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn nodes_visited(&self) -> usize {
        self.nodes_visited.load(Ordering::Relaxed)
    }
}

/// Channels for one search.
/// Work queue: top-level relations. Found: workers -> collector. Stream: collector -> caller.
pub struct SearchChannels {
    pub work_tx: Sender<RelationId>,
    pub work_rx: Receiver<RelationId>,
    pub found_tx: Sender<Arc<BuildTree>>,
    pub found_rx: Receiver<Arc<BuildTree>>,
}

/// `work_cap` must fit every seeded relation so seeding never blocks.
pub fn create_search_channels(work_cap: usize, found_cap: usize) -> SearchChannels {
    let (work_tx, work_rx) = bounded::<RelationId>(work_cap.max(1));
    let (found_tx, found_rx) = bounded::<Arc<BuildTree>>(found_cap.max(1));
    SearchChannels {
        work_tx,
        work_rx,
        found_tx,
        found_rx,
    }
}

/// Caller-facing stream. Unbounded, but the collector forwards at most `max_count` trees,
/// so the collector never blocks on a slow or absent reader.
pub fn create_stream_channel() -> (Sender<Arc<BuildTree>>, Receiver<Arc<BuildTree>>) {
    unbounded::<Arc<BuildTree>>()
}
