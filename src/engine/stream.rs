//! Chunked result streams: one start message, fixed-size chunks, one end
//! message, all tagged with the request id.

use crate::types::{SearchEntry, WorkerResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Chunks,
    Done,
}

/// An iterator over the messages of one request's result stream.
///
/// The cursor only moves forward, so chunk offsets are strictly increasing
/// by the chunk size. An empty result produces start and end only.
#[derive(Debug, Clone)]
pub struct ResultStream {
    request_id: u64,
    results: Vec<SearchEntry>,
    chunk_size: usize,
    cursor: usize,
    phase: Phase,
}

impl ResultStream {
    /// Create a stream over a materialized result list.
    pub fn new(request_id: u64, results: Vec<SearchEntry>, chunk_size: usize) -> Self {
        Self {
            request_id,
            results,
            chunk_size: chunk_size.max(1),
            cursor: 0,
            phase: Phase::Start,
        }
    }

    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    /// Total number of results in the stream.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Number of chunk messages the stream emits: `ceil(total / chunk_size)`.
    pub fn chunk_count(&self) -> usize {
        self.results.len().div_ceil(self.chunk_size)
    }
}

impl Iterator for ResultStream {
    type Item = WorkerResponse;

    fn next(&mut self) -> Option<WorkerResponse> {
        match self.phase {
            Phase::Start => {
                self.phase = Phase::Chunks;
                Some(WorkerResponse::ResultsStart {
                    request_id: self.request_id,
                    total: self.results.len(),
                })
            }
            Phase::Chunks if self.cursor < self.results.len() => {
                let offset = self.cursor;
                let end = (offset + self.chunk_size).min(self.results.len());
                self.cursor = end;
                Some(WorkerResponse::ResultsChunk {
                    request_id: self.request_id,
                    offset,
                    items: self.results[offset..end].to_vec(),
                })
            }
            Phase::Chunks => {
                self.phase = Phase::Done;
                Some(WorkerResponse::ResultsEnd {
                    request_id: self.request_id,
                    total: self.results.len(),
                })
            }
            Phase::Done => None,
        }
    }
}
