//! Messages exchanged across the search worker boundary.
//!
//! Serialized as JSON objects tagged by `type` (`hydrate`, `search`,
//! `index-ready`, `results-start`, `results-chunk`, `results-end`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::EntryCounts;

use super::entry::SearchEntry;

/// Requests sent from the caller to the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WorkerRequest {
    /// Replace the current index with one built from a raw dataset keyed by
    /// kind. Replies with [`WorkerResponse::IndexReady`].
    Hydrate {
        #[serde(default)]
        payload: Value,
    },
    /// Run a query. The payload is `{ "query": string, "filters": [type] }`;
    /// anything malformed defaults to an empty query with no filters.
    Search {
        #[serde(rename = "requestId")]
        request_id: u64,
        #[serde(default)]
        payload: Value,
    },
}

/// Responses sent from the worker to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WorkerResponse {
    /// A hydrate finished; `total` entries are searchable.
    IndexReady {
        total: usize,
        counts: EntryCounts,
        generation: u64,
    },
    /// First message of a result stream.
    ResultsStart {
        #[serde(rename = "requestId")]
        request_id: u64,
        total: usize,
    },
    /// A slice of results beginning at `offset`.
    ResultsChunk {
        #[serde(rename = "requestId")]
        request_id: u64,
        offset: usize,
        items: Vec<SearchEntry>,
    },
    /// Last message of a result stream; `total` repeats the start count.
    ResultsEnd {
        #[serde(rename = "requestId")]
        request_id: u64,
        total: usize,
    },
}

impl WorkerResponse {
    /// Request id this response belongs to, if it is part of a result stream.
    pub fn request_id(&self) -> Option<u64> {
        match self {
            Self::IndexReady { .. } => None,
            Self::ResultsStart { request_id, .. }
            | Self::ResultsChunk { request_id, .. }
            | Self::ResultsEnd { request_id, .. } => Some(*request_id),
        }
    }
}
