//! Bounded free list of geometry buffers.
//!
//! Remeshing a chunk every time it or a neighbour changes would otherwise
//! allocate a fresh set of attribute arrays per pass. The [`GeometryPool`]
//! hands out previously released [`ChunkGeometry`] values with their
//! allocations intact; the mesher clears and refills them through
//! [`crate::mesh_chunk_into`]. Released buffers beyond the pool capacity are
//! dropped.

use crate::geometry::ChunkGeometry;

/// Pool counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Acquisitions served from the free list.
    pub reused: u64,
    /// Acquisitions that had to allocate.
    pub allocated: u64,
    /// Releases dropped because the free list was full.
    pub dropped: u64,
}

/// Free list of reusable geometry, owned by the rendering side.
pub struct GeometryPool {
    free: Vec<ChunkGeometry>,
    capacity: usize,
    outstanding: usize,
    stats: PoolStats,
}

impl GeometryPool {
    /// Creates a pool that keeps at most `capacity` released buffers.
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
            outstanding: 0,
            stats: PoolStats::default(),
        }
    }

    /// Takes an empty geometry buffer, reusing a released one if available.
    pub fn acquire(&mut self) -> ChunkGeometry {
        self.outstanding += 1;
        match self.free.pop() {
            Some(mut geometry) => {
                geometry.clear();
                self.stats.reused += 1;
                geometry
            }
            None => {
                self.stats.allocated += 1;
                ChunkGeometry::new()
            }
        }
    }

    /// Returns a buffer to the pool. The caller must not keep any view into it.
    pub fn release(&mut self, geometry: ChunkGeometry) {
        self.outstanding = self.outstanding.saturating_sub(1);
        if self.free.len() < self.capacity {
            self.free.push(geometry);
        } else {
            self.stats.dropped += 1;
        }
    }

    /// Number of released buffers waiting for reuse.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Buffers handed out and not yet released.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes reserved by the buffers sitting in the free list.
    pub fn pooled_bytes(&self) -> usize {
        self.free.iter().map(ChunkGeometry::capacity_bytes).sum()
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}
