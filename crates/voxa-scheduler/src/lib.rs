//! Worker pool scheduling for chunk generation and meshing, and the chunk
//! pipeline that feeds finished buffers into the chunk table.

pub mod error;
pub mod pipeline;
pub mod protocol;
pub mod scheduler;
mod worker;

pub use error::SchedulerError;
pub use pipeline::{ChunkPipeline, MeshUpdate, PipelineConfig, TickReport};
pub use protocol::{TaskId, TaskKey, TaskKind, TaskOutput, TaskPayload};
pub use scheduler::{
    Completion, DEFAULT_IN_FLIGHT_MULTIPLIER, Scheduler, SchedulerConfig, SchedulerState,
    SchedulerStats, SubmitOutcome, default_pool_size,
};
