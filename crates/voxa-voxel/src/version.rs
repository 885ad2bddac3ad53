//! Per-chunk version counters used to invalidate meshes.
//!
//! A chunk's mesh depends on its own cells and on the border cells of its
//! four face neighbours, so a change to any of those five buffers must bump
//! the chunk's version.

use rustc_hash::FxHashMap;

use crate::coords::{ChunkCoord, Side};

/// Monotonic version counter keyed by chunk coordinate.
///
/// Coordinates that were never bumped report version 0.
#[derive(Debug, Default, Clone)]
pub struct ChunkVersions {
    versions: FxHashMap<ChunkCoord, u64>,
}

impl ChunkVersions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current version of a chunk.
    pub fn get(&self, coord: ChunkCoord) -> u64 {
        self.versions.get(&coord).copied().unwrap_or(0)
    }

    /// Increments the version of `coord` and of its four neighbours.
    ///
    /// Returns the new version of `coord`.
    pub fn bump(&mut self, coord: ChunkCoord) -> u64 {
        for side in Side::ALL {
            self.bump_single(coord.neighbor(side));
        }
        self.bump_single(coord)
    }

    /// Increments only `coord`'s own version.
    pub fn bump_single(&mut self, coord: ChunkCoord) -> u64 {
        let v = self.versions.entry(coord).or_insert(0);
        *v += 1;
        *v
    }

    /// Number of tracked coordinates.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
