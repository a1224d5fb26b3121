//! Caller side of the worker boundary: issues requests, correlates responses
//! by request id, and keeps the merged result list.

use std::future::Future;

use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::config::CompendiumConfig;
use crate::engine::{Query, QueryEngine};
use crate::normalize::EntryCounts;
use crate::types::{
    CompendiumError, CompendiumResult, SearchEntry, WorkerRequest, WorkerResponse,
};

use super::actor::{spawn_worker, WorkerHandle};
use super::buffer::{BufferEvent, ResultBuffer};

/// A browsing session against one search worker.
pub struct CompendiumSession {
    handle: WorkerHandle,
    responses: UnboundedReceiver<WorkerResponse>,
    task: JoinHandle<()>,
    buffer: ResultBuffer,
    next_request_id: u64,
    counts: EntryCounts,
}

impl CompendiumSession {
    /// Wait for the dataset, spawn a worker, and hydrate it.
    ///
    /// Fails if the dataset future fails or the worker stops before the
    /// index is ready.
    pub async fn open<F>(dataset_ready: F, config: &CompendiumConfig) -> CompendiumResult<Self>
    where
        F: Future<Output = CompendiumResult<Value>>,
    {
        let dataset = dataset_ready.await?;
        let (handle, responses, task) =
            spawn_worker(QueryEngine::with_chunk_size(config.chunk_size));
        let mut session = Self {
            handle,
            responses,
            task,
            buffer: ResultBuffer::new(),
            next_request_id: 0,
            counts: EntryCounts::default(),
        };
        session.hydrate(dataset).await?;
        Ok(session)
    }

    /// Replace the worker's index and wait until it is ready.
    pub async fn hydrate(&mut self, payload: Value) -> CompendiumResult<EntryCounts> {
        if !self.handle.send(WorkerRequest::Hydrate { payload }) {
            return Err(CompendiumError::WorkerUnavailable);
        }
        loop {
            if let BufferEvent::IndexReady { counts, .. } = self.next_event().await? {
                self.counts = counts;
                return Ok(counts);
            }
        }
    }

    /// Issue a query and return its request id. Responses for any earlier
    /// request are ignored from now on.
    pub fn search(&mut self, query: &Query) -> CompendiumResult<u64> {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.buffer.begin(request_id);
        let request = WorkerRequest::Search {
            request_id,
            payload: query.to_payload(),
        };
        if !self.handle.send(request) {
            return Err(CompendiumError::WorkerUnavailable);
        }
        Ok(request_id)
    }

    /// Receive and apply the next response.
    pub async fn next_event(&mut self) -> CompendiumResult<BufferEvent> {
        let response = self
            .responses
            .recv()
            .await
            .ok_or(CompendiumError::WorkerUnavailable)?;
        Ok(self.buffer.apply(response))
    }

    /// Issue a query and wait for its full result list.
    pub async fn search_all(&mut self, query: &Query) -> CompendiumResult<Vec<SearchEntry>> {
        self.search(query)?;
        while !self.buffer.is_complete() {
            self.next_event().await?;
        }
        Ok(self.buffer.entries().into_iter().cloned().collect())
    }

    /// The merged result list of the latest request.
    pub fn results(&self) -> &ResultBuffer {
        &self.buffer
    }

    /// Per-kind counts reported by the last hydrate.
    pub fn counts(&self) -> EntryCounts {
        self.counts
    }

    /// Stop the worker and wait for it to exit.
    pub async fn close(self) -> CompendiumResult<()> {
        let Self {
            handle,
            responses,
            task,
            ..
        } = self;
        drop(handle);
        drop(responses);
        task.await.map_err(|_| CompendiumError::WorkerUnavailable)
    }
}
