//! Worker pool scheduler.
//!
//! Accepts generation and meshing tasks from the coordinating thread,
//! deduplicates them by [`TaskKey`], caps the number in flight, queues the
//! overflow in FIFO order and assigns dispatched tasks to workers
//! round-robin. Completed results are collected with
//! [`Scheduler::drain_completed`]; every completion frees a slot that is
//! immediately refilled from the queue.
//!
//! Changing the active dimension clears the queue and discards any later
//! result tagged with another dimension. Tasks already running are never
//! preempted and there is no timeout: a task whose worker never answers
//! stays pending and is reported by [`Scheduler::stalled_tasks`].

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, unbounded};
use rustc_hash::{FxHashMap, FxHashSet};
use voxa_mesh::AtlasTable;
use voxa_voxel::{ChunkCoord, Dimension};

use crate::error::SchedulerError;
use crate::protocol::{TaskId, TaskKey, TaskOutput, TaskPayload, WorkerRequest, WorkerResponse};
use crate::worker::WorkerHandle;

/// Default in-flight tasks per worker.
pub const DEFAULT_IN_FLIGHT_MULTIPLIER: usize = 4;

/// Pool sizing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Number of worker threads. Zero disables the pool.
    pub pool_size: usize,
    /// Maximum tasks dispatched to workers at once.
    pub max_in_flight: usize,
    /// Log a warning once for each task dispatched longer than this.
    pub stall_warning: Option<Duration>,
}

impl SchedulerConfig {
    /// `pool_size` workers with the default in-flight multiplier.
    pub fn with_pool_size(pool_size: usize) -> Self {
        Self {
            pool_size,
            max_in_flight: (pool_size * DEFAULT_IN_FLIGHT_MULTIPLIER).max(1),
            stall_warning: None,
        }
    }

    /// Leaves two cores for the coordinating and render threads.
    pub fn auto() -> Self {
        Self::with_pool_size(default_pool_size())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::auto()
    }
}

/// `num_cpus - 2`, at least one.
pub fn default_pool_size() -> usize {
    num_cpus::get().saturating_sub(2).max(1)
}

/// Lifecycle of a scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Uninitialized,
    Ready,
    Terminated,
}

/// What `submit` did with a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Sent to a worker.
    Dispatched,
    /// Parked in the overflow queue behind the concurrency cap.
    Queued,
    /// A task with the same key is already pending; nothing was created.
    Duplicate,
}

/// A finished task for the currently active dimension.
#[derive(Debug)]
pub struct Completion {
    pub key: TaskKey,
    pub id: TaskId,
    /// Worker that ran the task.
    pub worker: usize,
    pub output: TaskOutput,
}

/// Scheduler counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub submitted: u64,
    pub duplicates: u64,
    pub dispatched: u64,
    pub completed: u64,
    /// Results dropped because their dimension was no longer active.
    pub stale_discarded: u64,
    /// Queued tasks dropped by a dimension change.
    pub queue_cleared: u64,
}

#[derive(Clone, Copy, Debug)]
enum TaskState {
    Queued,
    Dispatched { worker: usize, at: Instant },
}

#[derive(Debug)]
struct PendingTask {
    id: TaskId,
    state: TaskState,
}

struct QueuedTask {
    id: TaskId,
    key: TaskKey,
    payload: TaskPayload,
}

/// Fixed pool of worker threads with a pending-task table.
pub struct Scheduler {
    config: SchedulerConfig,
    atlas: Arc<AtlasTable>,
    state: SchedulerState,
    dimension: Dimension,
    workers: Vec<WorkerHandle>,
    results_tx: Sender<WorkerResponse>,
    results_rx: Receiver<WorkerResponse>,
    next_worker: usize,
    next_id: TaskId,
    pending: FxHashMap<TaskKey, PendingTask>,
    queue: VecDeque<QueuedTask>,
    in_flight: usize,
    stall_warned: FxHashSet<TaskId>,
    stats: SchedulerStats,
}

impl Scheduler {
    /// Creates an uninitialised scheduler. No threads are spawned until
    /// [`init`](Self::init).
    pub fn new(config: SchedulerConfig, atlas: Arc<AtlasTable>) -> Self {
        let (results_tx, results_rx) = unbounded();
        Self {
            config,
            atlas,
            state: SchedulerState::Uninitialized,
            dimension: Dimension::default(),
            workers: Vec::new(),
            results_tx,
            results_rx,
            next_worker: 0,
            next_id: 0,
            pending: FxHashMap::default(),
            queue: VecDeque::new(),
            in_flight: 0,
            stall_warned: FxHashSet::default(),
            stats: SchedulerStats::default(),
        }
    }

    /// Spawns the pool (on first call) and seeds every worker.
    ///
    /// Returns `false` if the pool cannot be used (zero workers, a spawn
    /// failure, or after [`terminate`](Self::terminate)); the caller must then
    /// fall back to synchronous generation and meshing.
    pub fn init(&mut self, seed: i32) -> bool {
        match self.state {
            SchedulerState::Terminated => return false,
            SchedulerState::Ready => return self.seed_workers(seed),
            SchedulerState::Uninitialized => {}
        }
        if self.config.pool_size == 0 {
            tracing::warn!("worker pool size is zero, running synchronously");
            return false;
        }

        for index in 0..self.config.pool_size {
            match WorkerHandle::spawn(index, Arc::clone(&self.atlas), self.results_tx.clone()) {
                Ok(worker) => self.workers.push(worker),
                Err(error) => {
                    tracing::warn!(%error, index, "worker spawn failed, running synchronously");
                    self.shutdown_workers();
                    return false;
                }
            }
        }
        if !self.seed_workers(seed) {
            self.shutdown_workers();
            return false;
        }

        self.state = SchedulerState::Ready;
        tracing::info!(
            workers = self.workers.len(),
            max_in_flight = self.config.max_in_flight,
            seed,
            "worker pool ready"
        );
        true
    }

    fn seed_workers(&self, seed: i32) -> bool {
        for worker in &self.workers {
            if let Err(error) = worker.send(WorkerRequest::Init { seed }) {
                tracing::warn!(%error, "failed to seed worker");
                return false;
            }
        }
        true
    }

    /// Submits a task for `coord` in the active dimension.
    ///
    /// Never blocks. A key that is already pending (queued or dispatched)
    /// is reported as [`SubmitOutcome::Duplicate`].
    pub fn submit(
        &mut self,
        coord: ChunkCoord,
        payload: TaskPayload,
    ) -> Result<SubmitOutcome, SchedulerError> {
        match self.state {
            SchedulerState::Uninitialized => return Err(SchedulerError::NotReady),
            SchedulerState::Terminated => return Err(SchedulerError::Terminated),
            SchedulerState::Ready => {}
        }

        let key = TaskKey {
            coord,
            dimension: self.dimension,
            kind: payload.kind(),
        };
        if self.pending.contains_key(&key) {
            self.stats.duplicates += 1;
            return Ok(SubmitOutcome::Duplicate);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.stats.submitted += 1;

        if self.in_flight < self.config.max_in_flight {
            self.dispatch(id, key, payload)?;
            Ok(SubmitOutcome::Dispatched)
        } else {
            self.pending.insert(
                key,
                PendingTask {
                    id,
                    state: TaskState::Queued,
                },
            );
            self.queue.push_back(QueuedTask { id, key, payload });
            Ok(SubmitOutcome::Queued)
        }
    }

    fn dispatch(&mut self, id: TaskId, key: TaskKey, payload: TaskPayload) -> Result<(), SchedulerError> {
        let worker = self.next_worker % self.workers.len();
        self.next_worker = self.next_worker.wrapping_add(1);

        let request = match payload {
            TaskPayload::Generate => WorkerRequest::Generate {
                id,
                coord: key.coord,
                dimension: key.dimension,
            },
            TaskPayload::Mesh {
                center,
                neighbors,
                lod,
            } => WorkerRequest::Mesh {
                id,
                coord: key.coord,
                dimension: key.dimension,
                center,
                neighbors,
                lod,
            },
        };
        if let Err(error) = self.workers[worker].send(request) {
            self.pending.remove(&key);
            return Err(error);
        }

        self.pending.insert(
            key,
            PendingTask {
                id,
                state: TaskState::Dispatched {
                    worker,
                    at: Instant::now(),
                },
            },
        );
        self.in_flight += 1;
        self.stats.dispatched += 1;
        tracing::trace!(id, worker, cx = key.coord.cx, cz = key.coord.cz, kind = ?key.kind, "task dispatched");
        Ok(())
    }

    /// Fills free concurrency slots from the front of the queue.
    fn pump_queue(&mut self) {
        while self.in_flight < self.config.max_in_flight {
            let Some(task) = self.queue.pop_front() else {
                break;
            };
            if let Err(error) = self.dispatch(task.id, task.key, task.payload) {
                tracing::warn!(%error, id = task.id, "queued task could not be dispatched");
            }
        }
    }

    /// Collects every result that has arrived, without blocking.
    ///
    /// Results for an inactive dimension are discarded. Each collected
    /// result, stale or not, releases its slot to the next queued task.
    pub fn drain_completed(&mut self) -> Vec<Completion> {
        let mut completed = Vec::new();
        while let Ok(response) = self.results_rx.try_recv() {
            let key = response.key();
            let known = self.pending.get(&key).is_some_and(|entry| entry.id == response.id);
            if !known {
                tracing::debug!(id = response.id, "result for unknown task ignored");
                continue;
            }
            self.pending.remove(&key);
            self.in_flight = self.in_flight.saturating_sub(1);
            self.stall_warned.remove(&response.id);

            if response.dimension != self.dimension {
                self.stats.stale_discarded += 1;
                tracing::debug!(
                    id = response.id,
                    cx = key.coord.cx,
                    cz = key.coord.cz,
                    dimension = %response.dimension,
                    "stale result discarded"
                );
            } else {
                self.stats.completed += 1;
                tracing::trace!(id = response.id, worker = response.worker, "task completed");
                completed.push(Completion {
                    key,
                    id: response.id,
                    worker: response.worker,
                    output: response.output,
                });
            }
            self.pump_queue();
        }

        if let Some(threshold) = self.config.stall_warning {
            self.warn_stalled(threshold);
        }
        completed
    }

    fn warn_stalled(&mut self, threshold: Duration) {
        let now = Instant::now();
        for (key, entry) in &self.pending {
            if let TaskState::Dispatched { worker, at } = entry.state {
                let waited = now.duration_since(at);
                if waited >= threshold && self.stall_warned.insert(entry.id) {
                    tracing::warn!(
                        id = entry.id,
                        worker,
                        cx = key.coord.cx,
                        cz = key.coord.cz,
                        waited_ms = waited.as_millis() as u64,
                        "task has not completed"
                    );
                }
            }
        }
    }

    /// Dispatched tasks that have been waiting at least `older_than`, oldest first.
    pub fn stalled_tasks(&self, older_than: Duration) -> Vec<TaskKey> {
        let now = Instant::now();
        let mut stalled: Vec<(TaskId, TaskKey)> = self
            .pending
            .iter()
            .filter_map(|(key, entry)| match entry.state {
                TaskState::Dispatched { at, .. } if now.duration_since(at) >= older_than => {
                    Some((entry.id, *key))
                }
                _ => None,
            })
            .collect();
        stalled.sort_unstable_by_key(|(id, _)| *id);
        stalled.into_iter().map(|(_, key)| key).collect()
    }

    /// Switches the active dimension.
    ///
    /// Queued tasks are dropped; dispatched tasks run to completion and their
    /// results are discarded on arrival.
    pub fn set_dimension(&mut self, dimension: Dimension) {
        if dimension == self.dimension {
            return;
        }
        let cleared = self.queue.len();
        for task in self.queue.drain(..) {
            self.pending.remove(&task.key);
        }
        self.stats.queue_cleared += cleared as u64;
        tracing::info!(from = %self.dimension, to = %dimension, cleared, "active dimension changed");
        self.dimension = dimension;
    }

    /// Stops every worker. Pending tasks are forgotten.
    pub fn terminate(&mut self) {
        if self.state == SchedulerState::Terminated {
            return;
        }
        let workers = self.workers.len();
        self.shutdown_workers();
        self.queue.clear();
        self.pending.clear();
        self.in_flight = 0;
        self.state = SchedulerState::Terminated;
        tracing::info!(workers, "worker pool terminated");
    }

    fn shutdown_workers(&mut self) {
        for worker in &mut self.workers {
            worker.shutdown();
        }
        self.workers.clear();
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SchedulerState::Ready
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Queued plus dispatched tasks.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight
    }

    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_pending(&self, key: &TaskKey) -> bool {
        self.pending.contains_key(key)
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.terminate();
    }
}
