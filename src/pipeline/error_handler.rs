use log::{debug, warn};
use std::thread::JoinHandle;

use crate::engine::SearchError;

/// Join every worker, then the collector. A panicked worker is reported once all threads
/// have exited, so nothing is left running behind the error.
pub fn join_search_threads(
    worker_handles: Vec<JoinHandle<()>>,
    collector: JoinHandle<usize>,
) -> Result<usize, SearchError> {
    let mut panicked = 0_usize;
    for h in worker_handles {
        if h.join().is_err() {
            panicked += 1;
        }
    }
    let streamed = collector.join().map_err(|_| {
        warn!("collector thread panicked");
        SearchError::WorkerPanicked
    })?;
    if panicked > 0 {
        warn!("{panicked} search worker(s) panicked");
        return Err(SearchError::WorkerPanicked);
    }
    debug!("collector: {streamed} tree(s) streamed");
    Ok(streamed)
}
