//! Query-parameter binding for HTTP-style transports: `target`, `method`, `count`, `delay`.

use std::time::Duration;
use thiserror::Error;

use crate::graph::CraftGraph;
use crate::utils::config::DEFAULT_COUNT;
use crate::{SearchMode, SearchRequest};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    #[error("target is required")]
    MissingTarget,

    #[error("Item not found: {0}")]
    UnknownTarget(String),

    #[error("count must be a positive integer, got '{0}'")]
    InvalidCount(String),

    #[error("method must be bfs or dfs, got '{0}'")]
    InvalidMethod(String),

    #[error("delay must be a non-negative integer (ms), got '{0}'")]
    InvalidDelay(String),
}

impl QueryError {
    /// Not-found class for a missing or unknown target, bad-request for malformed values.
    pub fn status_code(&self) -> u16 {
        match self {
            QueryError::MissingTarget | QueryError::UnknownTarget(_) => 404,
            QueryError::InvalidCount(_)
            | QueryError::InvalidMethod(_)
            | QueryError::InvalidDelay(_) => 400,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQuery {
    pub target: String,
    pub mode: SearchMode,
    pub count: usize,
    /// Pause between streamed messages.
    pub delay: Duration,
}

impl SearchQuery {
    /// Parse raw `(key, value)` pairs. Unknown keys are ignored; later duplicates win.
    pub fn from_params<'a, I>(params: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut target = None;
        let mut mode = SearchMode::default();
        let mut count = DEFAULT_COUNT;
        let mut delay = Duration::ZERO;

        for (key, value) in params {
            match key {
                "target" => {
                    let v = value.trim();
                    target = (!v.is_empty()).then(|| v.to_string());
                }
                "method" => {
                    mode = value
                        .parse()
                        .map_err(|_| QueryError::InvalidMethod(value.to_string()))?;
                }
                "count" => {
                    count = value
                        .trim()
                        .parse::<usize>()
                        .ok()
                        .filter(|&n| n > 0)
                        .ok_or_else(|| QueryError::InvalidCount(value.to_string()))?;
                }
                "delay" => {
                    let ms = value
                        .trim()
                        .parse::<u64>()
                        .map_err(|_| QueryError::InvalidDelay(value.to_string()))?;
                    delay = Duration::from_millis(ms);
                }
                _ => {}
            }
        }

        Ok(Self {
            target: target.ok_or(QueryError::MissingTarget)?,
            mode,
            count,
            delay,
        })
    }

    /// Reject a target the graph does not know before any search starts.
    pub fn validate(self, graph: &CraftGraph) -> Result<Self, QueryError> {
        if graph.node_id(&self.target).is_none() {
            return Err(QueryError::UnknownTarget(self.target));
        }
        Ok(self)
    }

    pub fn to_request(&self) -> SearchRequest {
        SearchRequest::new(self.target.clone(), self.count, self.mode)
    }
}
