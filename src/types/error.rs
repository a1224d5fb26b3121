//! Error types for the compendium library.

use thiserror::Error;

/// All errors that can occur in the compendium library.
///
/// Malformed records and malformed search payloads are not errors: they are
/// recovered by dropping the record or defaulting the payload.
#[derive(Error, Debug)]
pub enum CompendiumError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A dataset or message could not be parsed as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration file could not be parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// The search worker is gone (channel closed or task panicked).
    #[error("Search worker unavailable")]
    WorkerUnavailable,

    /// No entry with the given id exists in the index.
    #[error("Entry {0} not found")]
    EntryNotFound(String),

    /// Unknown entry type name.
    #[error("Invalid entry type: {0}")]
    InvalidEntryType(String),
}

/// Convenience result type for compendium operations.
pub type CompendiumResult<T> = Result<T, CompendiumError>;
