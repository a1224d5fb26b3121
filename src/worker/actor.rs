//! The search worker actor: owns the current index and answers requests
//! arriving on its inbound channel.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::engine::{Query, QueryEngine};
use crate::index::SearchIndex;
use crate::types::{Dataset, WorkerRequest, WorkerResponse};

/// Sending half of the worker's inbound channel.
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    requests: UnboundedSender<WorkerRequest>,
}

impl WorkerHandle {
    /// Queue a request. Returns false if the worker has stopped.
    pub fn send(&self, request: WorkerRequest) -> bool {
        self.requests.send(request).is_ok()
    }

    /// Whether the worker has stopped receiving.
    pub fn is_closed(&self) -> bool {
        self.requests.is_closed()
    }
}

/// Spawn a search worker on the current tokio runtime.
///
/// Returns the request handle, the response receiver, and the actor task.
/// The actor stops when every [`WorkerHandle`] is dropped or the response
/// receiver is closed.
pub fn spawn_worker(
    engine: QueryEngine,
) -> (WorkerHandle, UnboundedReceiver<WorkerResponse>, JoinHandle<()>) {
    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let (response_tx, response_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(engine, request_rx, response_tx));
    (
        WorkerHandle {
            requests: request_tx,
        },
        response_rx,
        task,
    )
}

/// Hydrates are applied in arrival order, so a search queued after a
/// hydrate always sees that hydrate's index. Each search streams from its
/// own snapshot on the blocking pool; streams of different requests may
/// interleave.
async fn run(
    engine: QueryEngine,
    mut requests: UnboundedReceiver<WorkerRequest>,
    responses: UnboundedSender<WorkerResponse>,
) {
    let mut index = Arc::new(SearchIndex::new());
    let mut generation = 0u64;

    while let Some(request) = requests.recv().await {
        match request {
            WorkerRequest::Hydrate { payload } => {
                generation += 1;
                let next_generation = generation;
                let built = tokio::task::spawn_blocking(move || {
                    SearchIndex::from_dataset(&Dataset::from_value(&payload))
                        .with_generation(next_generation)
                })
                .await;
                match built {
                    Ok(next) => index = Arc::new(next),
                    Err(e) => {
                        log::warn!(
                            "Index build for generation {next_generation} failed: {e}; keeping generation {}",
                            index.generation()
                        );
                    }
                }
                let ready = WorkerResponse::IndexReady {
                    total: index.len(),
                    counts: index.counts(),
                    generation: index.generation(),
                };
                if responses.send(ready).is_err() {
                    log::warn!("Response channel closed; stopping search worker");
                    break;
                }
            }
            WorkerRequest::Search {
                request_id,
                payload,
            } => {
                let snapshot = Arc::clone(&index);
                let engine = engine.clone();
                let responses = responses.clone();
                tokio::task::spawn_blocking(move || {
                    let query = Query::from_payload(&payload);
                    for message in engine.stream(&snapshot, request_id, &query) {
                        if responses.send(message).is_err() {
                            log::debug!("Dropping results for request {request_id}: receiver gone");
                            break;
                        }
                    }
                });
            }
        }
    }
    log::debug!("Search worker stopped at generation {generation}");
}
