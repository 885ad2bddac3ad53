//! Messages exchanged between the coordinator and worker threads.
//!
//! Every message moves by value through a channel. Generated buffers and
//! mesh geometry are owned by exactly one side at a time: the worker builds
//! them, sends them, and never sees them again. Buffers sent *to* a worker
//! for meshing are shared read-only snapshots behind an [`Arc`].

use std::sync::Arc;

use voxa_mesh::{ChunkGeometry, Lod};
use voxa_voxel::{ChunkCoord, Dimension, VoxelBuffer};

/// Monotonic per-scheduler task id.
pub type TaskId = u64;

/// What a task produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Generate,
    Mesh(Lod),
}

/// Identity used for deduplication: one pending task per key.
///
/// The dimension is part of the key so that a request for the new dimension
/// is not swallowed by a still-running task of the old one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskKey {
    pub coord: ChunkCoord,
    pub dimension: Dimension,
    pub kind: TaskKind,
}

/// Work submitted to the scheduler. The active dimension is attached at
/// submission time.
#[derive(Clone, Debug)]
pub enum TaskPayload {
    Generate,
    Mesh {
        center: Arc<VoxelBuffer>,
        /// North, south, east, west.
        neighbors: [Option<Arc<VoxelBuffer>>; 4],
        lod: Lod,
    },
}

impl TaskPayload {
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Generate => TaskKind::Generate,
            Self::Mesh { lod, .. } => TaskKind::Mesh(*lod),
        }
    }
}

/// Coordinator → worker.
#[derive(Debug)]
pub enum WorkerRequest {
    /// Seeds the worker's generator context. Sent once per worker at startup.
    Init { seed: i32 },
    Generate {
        id: TaskId,
        coord: ChunkCoord,
        dimension: Dimension,
    },
    Mesh {
        id: TaskId,
        coord: ChunkCoord,
        dimension: Dimension,
        center: Arc<VoxelBuffer>,
        neighbors: [Option<Arc<VoxelBuffer>>; 4],
        lod: Lod,
    },
    Shutdown,
}

/// Worker → coordinator. Tagged with the dimension the task was issued for.
#[derive(Debug)]
pub struct WorkerResponse {
    pub id: TaskId,
    pub worker: usize,
    pub coord: ChunkCoord,
    pub dimension: Dimension,
    pub output: TaskOutput,
}

impl WorkerResponse {
    pub fn key(&self) -> TaskKey {
        TaskKey {
            coord: self.coord,
            dimension: self.dimension,
            kind: self.output.kind(),
        }
    }
}

/// Result of one task, owned by whoever holds it.
#[derive(Debug)]
pub enum TaskOutput {
    Generated(VoxelBuffer),
    Meshed { lod: Lod, geometry: ChunkGeometry },
}

impl TaskOutput {
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Generated(_) => TaskKind::Generate,
            Self::Meshed { lod, .. } => TaskKind::Mesh(*lod),
        }
    }
}
