//! Caller-side merge of streamed results into one filtered list.

use crate::normalize::EntryCounts;
use crate::types::{SearchEntry, WorkerResponse};

/// What applying one response did to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferEvent {
    /// A new index is live.
    IndexReady { total: usize, counts: EntryCounts },
    /// The list was replaced by `total` empty slots.
    Reset { total: usize },
    /// Slots `[offset, offset + len)` were filled.
    Filled { offset: usize, len: usize },
    /// The stream for the current request finished.
    Complete { total: usize },
    /// The response belonged to an older request and was ignored.
    Stale,
}

/// The filtered list as seen by the caller.
///
/// Tracks the most recent request id; messages for any other id are
/// ignored. `results-start` pre-sizes the list with empty slots so the
/// renderer can show placeholders until each chunk lands.
#[derive(Debug, Clone, Default)]
pub struct ResultBuffer {
    current: Option<u64>,
    slots: Vec<Option<SearchEntry>>,
    complete: bool,
}

impl ResultBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `request_id`. The previous list stays visible until the
    /// new stream's start message arrives.
    pub fn begin(&mut self, request_id: u64) {
        self.current = Some(request_id);
        self.complete = false;
    }

    /// The request id currently tracked.
    pub fn current_request(&self) -> Option<u64> {
        self.current
    }

    /// Apply one worker response.
    pub fn apply(&mut self, response: WorkerResponse) -> BufferEvent {
        if let WorkerResponse::IndexReady { total, counts, .. } = response {
            return BufferEvent::IndexReady { total, counts };
        }
        if response.request_id() != self.current {
            return BufferEvent::Stale;
        }
        match response {
            WorkerResponse::ResultsStart { total, .. } => {
                self.slots = vec![None; total];
                self.complete = false;
                BufferEvent::Reset { total }
            }
            WorkerResponse::ResultsChunk { offset, items, .. } => {
                let len = items.len();
                for (i, item) in items.into_iter().enumerate() {
                    if let Some(slot) = self.slots.get_mut(offset + i) {
                        *slot = Some(item);
                    }
                }
                BufferEvent::Filled { offset, len }
            }
            WorkerResponse::ResultsEnd { total, .. } => {
                self.complete = true;
                BufferEvent::Complete { total }
            }
            WorkerResponse::IndexReady { .. } => BufferEvent::Stale,
        }
    }

    /// All slots, in result order. `None` marks a slot not yet delivered.
    pub fn slots(&self) -> &[Option<SearchEntry>] {
        &self.slots
    }

    /// Entry at a position, if delivered.
    pub fn get(&self, index: usize) -> Option<&SearchEntry> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Find a delivered entry by id (detail drawer lookup).
    pub fn find(&self, id: &str) -> Option<&SearchEntry> {
        self.slots.iter().flatten().find(|e| e.id == id)
    }

    /// Delivered entries in result order.
    pub fn entries(&self) -> Vec<&SearchEntry> {
        self.slots.iter().flatten().collect()
    }

    /// Whether the current request's end message has arrived.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
