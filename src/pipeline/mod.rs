//! Search pipeline: shared context, worker pool, collector, streaming gateway.

pub mod context;
pub mod error_handler;
pub mod gateway;
pub mod orchestrator;
pub mod workers;

pub use context::{
    Offer, SearchChannels, SearchContext, create_search_channels, create_stream_channel,
};
pub use error_handler::join_search_threads;
pub use gateway::{TreeMessage, TreePayload, relay_stream};
pub use orchestrator::{pool_size, run_search, spawn_collector};
pub use workers::{WorkerEnv, spawn_search_workers};
