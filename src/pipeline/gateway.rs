//! Streaming gateway: turns a [`RecipeStream`] into timed delta messages for a remote client.
//!
//! Every accepted tree becomes one `done: false` message, followed by exactly one
//! `done: true` message carrying the aggregate root and total duration. Transport (socket,
//! HTTP chunking, stdout) is the sink's business.

use anyhow::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::SearchOutcome;
use crate::engine::RecipeStream;
use crate::engine::tree::{BuildTree, RootTree};

/// Tree carried by a message. The `kind` tag keeps the synthetic root apart from real items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TreePayload {
    Recipe(Arc<BuildTree>),
    Root(RootTree),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeMessage {
    pub tree: TreePayload,
    pub nodes_visited: usize,
    /// Total search time in milliseconds; final message only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    pub done: bool,
}

impl TreeMessage {
    pub fn partial(tree: Arc<BuildTree>, nodes_visited: usize) -> Self {
        Self {
            tree: TreePayload::Recipe(tree),
            nodes_visited,
            duration_ms: None,
            done: false,
        }
    }

    pub fn last(outcome: &SearchOutcome) -> Self {
        Self {
            tree: TreePayload::Root(outcome.root.clone()),
            nodes_visited: outcome.nodes_visited,
            duration_ms: Some(outcome.duration.as_millis() as u64),
            done: true,
        }
    }
}

/// Deliver every tree of `stream` to `sink`, then the final aggregate.
///
/// `delay` pauses between consecutive deliveries (presentation pacing); the search itself
/// keeps running meanwhile. If the sink fails (client gone) the search is cancelled, workers
/// are joined, and the sink error is returned.
pub fn relay_stream<F>(
    stream: RecipeStream,
    delay: Option<Duration>,
    mut sink: F,
) -> Result<SearchOutcome>
where
    F: FnMut(&TreeMessage) -> Result<()>,
{
    let delay = delay.filter(|d| !d.is_zero());
    let mut delivered = 0_usize;

    while let Some(tree) = stream.recv() {
        if let Some(d) = delay
            && delivered > 0
        {
            std::thread::sleep(d);
        }
        let msg = TreeMessage::partial(tree, stream.nodes_visited());
        if let Err(e) = sink(&msg) {
            warn!("Stream sink failed after {delivered} message(s); cancelling search");
            stream.cancel();
            let _ = stream.wait();
            return Err(e);
        }
        delivered += 1;
    }

    let outcome = stream.wait()?;
    if let Some(d) = delay
        && delivered > 0
    {
        std::thread::sleep(d);
    }
    sink(&TreeMessage::last(&outcome))?;
    debug!("Relayed {delivered} partial message(s) + final");
    Ok(outcome)
}
