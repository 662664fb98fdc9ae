//! Search entry points: blocking [`Searcher::find_recipes`] and streaming [`Searcher::stream_recipes`].

use crossbeam_channel::Receiver;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use thiserror::Error;

use crate::engine::expand::ExpansionCache;
use crate::engine::tree::BuildTree;
use crate::graph::CraftGraph;
use crate::pipeline::{self, SearchContext, WorkerEnv};
use crate::{SearchOutcome, SearchRequest};

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Result count must be positive, got {0}")]
    InvalidCount(usize),

    #[error("Search worker panicked")]
    WorkerPanicked,
}

impl SearchError {
    /// HTTP-equivalent status for transport layers.
    pub fn status_code(&self) -> u16 {
        match self {
            SearchError::NotFound(_) => 404,
            SearchError::InvalidCount(_) => 400,
            SearchError::WorkerPanicked => 500,
        }
    }
}

/// Runs searches over one crafting graph. The expansion cache lives here and is shared by
/// every search started from this searcher (and its clones).
#[derive(Clone, Debug)]
pub struct Searcher {
    graph: Arc<CraftGraph>,
    cache: Arc<ExpansionCache>,
    num_threads: Option<usize>,
}

impl Searcher {
    pub fn new(graph: Arc<CraftGraph>) -> Self {
        Self {
            graph,
            cache: Arc::new(ExpansionCache::new()),
            num_threads: None,
        }
    }

    /// Override the worker count (otherwise derived from available parallelism).
    pub fn with_threads(mut self, num_threads: Option<usize>) -> Self {
        self.num_threads = num_threads.filter(|&n| n > 0);
        self
    }

    pub fn graph(&self) -> &Arc<CraftGraph> {
        &self.graph
    }

    pub fn cache(&self) -> &ExpansionCache {
        &self.cache
    }

    /// Start a search in the background. Trees arrive on the returned stream as they are
    /// accepted; [`RecipeStream::wait`] gives the final aggregate.
    ///
    /// Fails fast with `NotFound` for an unknown target and `InvalidCount` for a zero bound.
    pub fn stream_recipes(&self, request: &SearchRequest) -> Result<RecipeStream, SearchError> {
        if request.max_count == 0 {
            return Err(SearchError::InvalidCount(request.max_count));
        }
        let target = self
            .graph
            .node_id(&request.target)
            .ok_or_else(|| SearchError::NotFound(request.target.clone()))?;

        let started = Instant::now();
        let ctx = Arc::new(SearchContext::new(
            request.max_count,
            request.cancel.clone(),
        ));
        let nodes_visited = Arc::clone(&ctx.nodes_visited);
        let cancel = ctx.cancel_flag();
        let env = WorkerEnv {
            graph: Arc::clone(&self.graph),
            cache: Arc::clone(&self.cache),
            ctx,
            target,
            mode: request.mode,
        };
        let (stream_tx, stream_rx) = pipeline::create_stream_channel();
        let num_threads = self.num_threads;
        let coordinator =
            thread::spawn(move || pipeline::run_search(env, num_threads, stream_tx, started));

        Ok(RecipeStream {
            target: request.target.clone(),
            trees: stream_rx,
            nodes_visited,
            cancel,
            coordinator,
        })
    }

    /// Blocking search: run to completion and return the aggregate.
    pub fn find_recipes(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
        self.stream_recipes(request)?.wait()
    }
}

/// Live results of one search. Dropping the receiver side early is safe: the collector
/// keeps draining the workers either way.
pub struct RecipeStream {
    target: String,
    trees: Receiver<Arc<BuildTree>>,
    nodes_visited: Arc<AtomicUsize>,
    cancel: Arc<AtomicBool>,
    coordinator: JoinHandle<Result<SearchOutcome, SearchError>>,
}

impl RecipeStream {
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Accepted trees, in per-worker discovery order. Closes when the search ends.
    pub fn trees(&self) -> &Receiver<Arc<BuildTree>> {
        &self.trees
    }

    /// Next tree, or `None` once the search is over and everything was delivered.
    pub fn recv(&self) -> Option<Arc<BuildTree>> {
        self.trees.recv().ok()
    }

    pub fn nodes_visited(&self) -> usize {
        self.nodes_visited.load(Ordering::Relaxed)
    }

    /// Ask workers to stop at their next bound check. Already accepted trees are kept.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Wait for every worker and return the aggregate (accepted trees sorted by complexity).
    pub fn wait(self) -> Result<SearchOutcome, SearchError> {
        drop(self.trees);
        self.coordinator
            .join()
            .map_err(|_| SearchError::WorkerPanicked)?
    }
}
