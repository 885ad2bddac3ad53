//! Scheduler error types.

/// Errors returned by [`crate::Scheduler`] operations.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// `init` has not succeeded yet; callers should use the synchronous path.
    #[error("worker pool is not initialised")]
    NotReady,
    #[error("worker pool has been terminated")]
    Terminated,
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
    /// A worker's request channel closed unexpectedly.
    #[error("worker {0} disconnected")]
    Disconnected(usize),
}
