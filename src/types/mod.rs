//! All data types for the compendium library.

pub mod entry;
pub mod error;
pub mod message;
pub mod record;

pub use entry::{EntryType, SearchEntry, Stat};
pub use error::{CompendiumError, CompendiumResult};
pub use message::{WorkerRequest, WorkerResponse};
pub use record::{
    dataset_key, Dataset, FeatRecord, ItemRecord, Provenance, RecordCommon, RuleRecord,
    SourceRecord, SpellRecord,
};

/// Number of entries carried by one `results-chunk` message.
pub const DEFAULT_CHUNK_SIZE: usize = 60;

/// Maximum summary length in characters, ellipsis included.
pub const SUMMARY_MAX_CHARS: usize = 160;

/// Summary shown for entries without a description.
pub const SUMMARY_PLACEHOLDER: &str = "Open the detail drawer for full rules text.";

/// Default row height of the result list, in pixels.
pub const DEFAULT_ROW_HEIGHT: u32 = 132;

/// Rows materialized above and below the visible window.
pub const DEFAULT_BUFFER_ROWS: usize = 4;
