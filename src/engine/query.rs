//! Query executor: token intersection, then substring containment, then type filters.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::index::{tokenize, SearchIndex};
use crate::types::{EntryType, SearchEntry, DEFAULT_CHUNK_SIZE};

use super::stream::ResultStream;

/// A free-text query plus an optional set of entry types to keep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Raw query text; trimmed and lowercased at search time.
    pub text: String,
    /// Entry types to keep. Empty = all types.
    pub type_filters: BTreeSet<EntryType>,
}

impl Query {
    /// Create a query with no type filters.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            type_filters: BTreeSet::new(),
        }
    }

    /// Restrict results to the given types.
    pub fn with_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = EntryType>,
    {
        self.type_filters.extend(types);
        self
    }

    /// Parse a search payload `{ "query": string, "filters": [type] }`.
    ///
    /// Never fails: a non-object payload, a non-string query, a non-array
    /// filter list, or unknown filter names all fall back to defaults.
    pub fn from_payload(payload: &Value) -> Self {
        let Some(obj) = payload.as_object() else {
            if !payload.is_null() {
                log::debug!("Search payload is not an object; using an empty query");
            }
            return Self::default();
        };
        let text = obj
            .get("query")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let type_filters = obj
            .get("filters")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .filter_map(EntryType::from_name)
                    .collect()
            })
            .unwrap_or_default();
        Self { text, type_filters }
    }

    /// Serialize back into the payload shape accepted by [`from_payload`](Self::from_payload).
    pub fn to_payload(&self) -> Value {
        serde_json::json!({
            "query": self.text,
            "filters": self.type_filters.iter().map(|t| t.name()).collect::<Vec<_>>(),
        })
    }

    /// The text the engine actually matches against: trimmed and lowercased.
    pub fn normalized_text(&self) -> String {
        self.text.trim().to_lowercase()
    }

    fn keeps(&self, entry_type: EntryType) -> bool {
        self.type_filters.is_empty() || self.type_filters.contains(&entry_type)
    }
}

/// Positions under consideration before substring and type narrowing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
    /// Ascending positions.
    pub positions: Vec<usize>,
    /// True when token intersection pruned the full position range.
    pub narrowed: bool,
}

/// The query engine. Read-only against the index, so any number of queries
/// may run concurrently against the same [`SearchIndex`].
#[derive(Debug, Clone)]
pub struct QueryEngine {
    chunk_size: usize,
}

impl QueryEngine {
    /// Create a query engine that streams chunks of [`DEFAULT_CHUNK_SIZE`].
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Create a query engine with a custom chunk size (0 means the default).
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: if chunk_size == 0 {
                DEFAULT_CHUNK_SIZE
            } else {
                chunk_size
            },
        }
    }

    /// Entries per `results-chunk` message.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Derive the candidate set for already-normalized query text.
    ///
    /// Empty text, a text without tokens, or an empty intersection all yield
    /// every position. A non-empty intersection narrows the set.
    pub fn candidates(&self, index: &SearchIndex, normalized: &str) -> Candidates {
        if !normalized.is_empty() {
            let tokens = tokenize(normalized);
            if !tokens.is_empty() {
                let intersected = intersect_tokens(index, &tokens);
                if !intersected.is_empty() {
                    return Candidates {
                        positions: intersected,
                        narrowed: true,
                    };
                }
            }
        }
        Candidates {
            positions: (0..index.len()).collect(),
            narrowed: false,
        }
    }

    /// Matching positions in index order.
    pub fn positions(&self, index: &SearchIndex, query: &Query) -> Vec<usize> {
        let normalized = query.normalized_text();
        let candidates = self.candidates(index, &normalized);

        let mut matched = if normalized.is_empty() {
            candidates.positions
        } else {
            let mut matched = substring_filter(index, &candidates.positions, &normalized);
            if matched.is_empty() && candidates.narrowed {
                // Intersection only prunes; containment decides. Retry against
                // everything so boundary-spanning substrings are not lost.
                let all: Vec<usize> = (0..index.len()).collect();
                matched = substring_filter(index, &all, &normalized);
            }
            matched
        };

        if !query.type_filters.is_empty() {
            matched.retain(|&p| {
                index
                    .entry(p)
                    .map(|e| query.keeps(e.entry_type))
                    .unwrap_or(false)
            });
        }
        matched
    }

    /// Matching entries in index order (alphabetical by name).
    pub fn search<'a>(&self, index: &'a SearchIndex, query: &Query) -> Vec<&'a SearchEntry> {
        self.positions(index, query)
            .into_iter()
            .filter_map(|p| index.entry(p))
            .collect()
    }

    /// Run a query and package the results as a start/chunk/end message stream
    /// tagged with `request_id`. The result list is materialized up front.
    pub fn stream(&self, index: &SearchIndex, request_id: u64, query: &Query) -> ResultStream {
        let results: Vec<SearchEntry> = self.search(index, query).into_iter().cloned().collect();
        log::debug!(
            "Request {} matched {} of {} entries (generation {})",
            request_id,
            results.len(),
            index.len(),
            index.generation()
        );
        ResultStream::new(request_id, results, self.chunk_size)
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// AND-intersect the posting sets of `tokens`, starting from the first
/// token's set. Any token without postings empties the result. Returns
/// ascending positions.
pub fn intersect_tokens(index: &SearchIndex, tokens: &[String]) -> Vec<usize> {
    let mut result: Option<Vec<usize>> = None;
    for token in tokens {
        let Some(hits) = index.postings(token).filter(|h| !h.is_empty()) else {
            return Vec::new();
        };
        let next = match result {
            None => hits.iter().copied().collect(),
            Some(mut current) => {
                current.retain(|p| hits.contains(p));
                current
            }
        };
        if next.is_empty() {
            return Vec::new();
        }
        result = Some(next);
    }
    let mut positions = result.unwrap_or_default();
    positions.sort_unstable();
    positions
}

fn substring_filter(index: &SearchIndex, positions: &[usize], needle: &str) -> Vec<usize> {
    positions
        .iter()
        .copied()
        .filter(|&p| index.vector(p).is_some_and(|v| v.contains(needle)))
        .collect()
}
