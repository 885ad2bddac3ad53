//! Worker threads.
//!
//! Each worker owns its own [`GeneratorContext`] (built from the `Init`
//! message) and a shared read-only atlas, receives requests on a private
//! channel and reports on the pool-wide result channel. Workers share no
//! mutable state with the coordinator or with each other.

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, unbounded};
use voxa_mesh::{AtlasTable, mesh_chunk};
use voxa_terrain::GeneratorContext;

use crate::error::SchedulerError;
use crate::protocol::{TaskOutput, WorkerRequest, WorkerResponse};

/// Coordinator-side handle to one worker thread.
pub(crate) struct WorkerHandle {
    pub(crate) index: usize,
    sender: Sender<WorkerRequest>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Spawns worker `index`, named `voxa-worker-<index>`.
    pub(crate) fn spawn(
        index: usize,
        atlas: Arc<AtlasTable>,
        results: Sender<WorkerResponse>,
    ) -> Result<Self, SchedulerError> {
        let (sender, requests) = unbounded::<WorkerRequest>();
        let thread = std::thread::Builder::new()
            .name(format!("voxa-worker-{index}"))
            .spawn(move || run(index, &requests, &results, &atlas))?;
        Ok(Self {
            index,
            sender,
            thread: Some(thread),
        })
    }

    /// Hands a request to the worker. Ownership of its payload moves with it.
    pub(crate) fn send(&self, request: WorkerRequest) -> Result<(), SchedulerError> {
        self.sender
            .send(request)
            .map_err(|_| SchedulerError::Disconnected(self.index))
    }

    /// Asks the worker to exit and waits for it.
    pub(crate) fn shutdown(&mut self) {
        let _ = self.sender.send(WorkerRequest::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!(worker = self.index, "worker thread panicked");
            }
        }
    }
}

fn run(
    index: usize,
    requests: &Receiver<WorkerRequest>,
    results: &Sender<WorkerResponse>,
    atlas: &AtlasTable,
) {
    let mut context: Option<GeneratorContext> = None;
    tracing::debug!(worker = index, "worker started");

    while let Ok(request) = requests.recv() {
        let response = match request {
            WorkerRequest::Init { seed } => {
                context = Some(GeneratorContext::new(seed));
                continue;
            }
            WorkerRequest::Shutdown => break,
            WorkerRequest::Generate {
                id,
                coord,
                dimension,
            } => {
                let Some(ctx) = context.as_ref() else {
                    tracing::warn!(worker = index, id, "generate request before init, dropped");
                    continue;
                };
                WorkerResponse {
                    id,
                    worker: index,
                    coord,
                    dimension,
                    output: TaskOutput::Generated(ctx.generate(coord, dimension)),
                }
            }
            WorkerRequest::Mesh {
                id,
                coord,
                dimension,
                center,
                neighbors,
                lod,
            } => {
                let refs = neighbors.each_ref().map(|n| n.as_deref());
                let geometry = mesh_chunk(&center, &refs, lod, atlas);
                WorkerResponse {
                    id,
                    worker: index,
                    coord,
                    dimension,
                    output: TaskOutput::Meshed { lod, geometry },
                }
            }
        };
        if results.send(response).is_err() {
            break;
        }
    }
    tracing::debug!(worker = index, "worker exiting");
}
