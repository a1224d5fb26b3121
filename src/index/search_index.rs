//! Inverted index over normalized entries. Maps each token to the set of
//! entry positions whose search vector contains it.

use std::collections::{HashMap, HashSet};

use crate::normalize::{build_entries, EntryCounts};
use crate::types::{Dataset, SearchEntry};

use super::tokenizer::tokenize;

/// Entries in canonical (case-insensitive name) order, their flattened search
/// vectors, and the token → positions map derived from those vectors.
///
/// Built once per dataset and never mutated afterwards; a dataset change means
/// a full rebuild.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
    /// `search_vectors[i]` is the lowercase flattened text of `entries[i]`.
    search_vectors: Vec<String>,
    token_index: HashMap<String, HashSet<usize>>,
    by_id: HashMap<String, usize>,
    counts: EntryCounts,
    /// Bumped by the worker on every hydrate.
    generation: u64,
}

impl SearchIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from entries already sorted into canonical order
    /// (see [`build_entries`]). Positions are the indices into `entries`.
    pub fn build(entries: Vec<SearchEntry>) -> Self {
        let mut search_vectors = Vec::with_capacity(entries.len());
        let mut token_index: HashMap<String, HashSet<usize>> = HashMap::new();
        let mut by_id = HashMap::with_capacity(entries.len());

        for (position, entry) in entries.iter().enumerate() {
            let vector = search_vector(entry);
            for token in tokenize(&vector) {
                token_index.entry(token).or_default().insert(position);
            }
            search_vectors.push(vector);
            by_id.entry(entry.id.clone()).or_insert(position);
        }

        let counts = EntryCounts::tally(&entries);
        log::info!(
            "Built search index: {} entries, {} distinct tokens",
            entries.len(),
            token_index.len()
        );

        Self {
            entries,
            search_vectors,
            token_index,
            by_id,
            counts,
            generation: 0,
        }
    }

    /// Normalize a raw dataset and build the index from it.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self::build(build_entries(dataset))
    }

    /// Tag this index with a hydrate generation.
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Hydrate generation this index was built for (0 if never hydrated).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// All entries in canonical order.
    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    /// Entry at a position.
    pub fn entry(&self, position: usize) -> Option<&SearchEntry> {
        self.entries.get(position)
    }

    /// Search vectors, parallel to [`entries`](Self::entries).
    pub fn search_vectors(&self) -> &[String] {
        &self.search_vectors
    }

    /// Search vector at a position.
    pub fn vector(&self, position: usize) -> Option<&str> {
        self.search_vectors.get(position).map(String::as_str)
    }

    /// Posting set for a token, if any entry contains it.
    pub fn postings(&self, token: &str) -> Option<&HashSet<usize>> {
        self.token_index.get(token)
    }

    /// The full token → positions map.
    pub fn token_index(&self) -> &HashMap<String, HashSet<usize>> {
        &self.token_index
    }

    /// Number of distinct tokens.
    pub fn token_count(&self) -> usize {
        self.token_index.len()
    }

    /// Look up an entry by id (`"<type>:<slug>"`).
    pub fn get(&self, id: &str) -> Option<&SearchEntry> {
        self.position(id).and_then(|p| self.entries.get(p))
    }

    /// Position of an entry by id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Per-kind entry counts.
    pub fn counts(&self) -> EntryCounts {
        self.counts
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Flatten an entry into its lowercase search vector: name, subtitle,
/// summary, description, source detail, tags, then `"<label> <value>"` per
/// stat, single-space joined with empty fields skipped.
pub fn search_vector(entry: &SearchEntry) -> String {
    let tags = entry.tags.join(" ");
    let stats = entry
        .stats
        .iter()
        .map(|s| format!("{} {}", s.label, s.value))
        .collect::<Vec<_>>()
        .join(" ");

    [
        entry.name.as_str(),
        entry.subtitle.as_str(),
        entry.summary.as_str(),
        entry.description.as_str(),
        entry.source_detail.as_str(),
        tags.as_str(),
        stats.as_str(),
    ]
    .iter()
    .map(|field| field.trim())
    .filter(|field| !field.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}
