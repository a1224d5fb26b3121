//! Compendium Index: in-memory search and list virtualization for rules content.
//!
//! Normalizes heterogeneous records (spells, feats, items, rules) into uniform
//! searchable entries, indexes them by token, answers queries by token
//! intersection with a substring fallback, streams results in chunks across a
//! worker boundary, and computes which rows of a long result list to render.

pub mod cli;
pub mod config;
pub mod engine;
pub mod index;
pub mod normalize;
pub mod types;
pub mod viewport;
pub mod worker;

// Re-export commonly used types at the crate root
pub use config::{load_config, resolve_config, CompendiumConfig};
pub use engine::{Candidates, Query, QueryEngine, ResultStream};
pub use index::{search_vector, tokenize, SearchIndex};
pub use normalize::{build_entries, normalize, EntryCounts};
pub use types::{
    CompendiumError, CompendiumResult, Dataset, EntryType, SearchEntry, SourceRecord, Stat,
    WorkerRequest, WorkerResponse, DEFAULT_BUFFER_ROWS, DEFAULT_CHUNK_SIZE, DEFAULT_ROW_HEIGHT,
};
pub use viewport::{EntryRow, EntryRowRenderer, VirtualList, Viewport, VisibleWindow};
pub use worker::{spawn_worker, BufferEvent, CompendiumSession, ResultBuffer, WorkerHandle};
