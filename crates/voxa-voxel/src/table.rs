//! Authoritative chunk table: owns every merged voxel buffer, keyed by
//! [`ChunkCoord`].
//!
//! Buffers are immutable once stored and shared behind an [`Arc`] so that
//! meshing requests can hold them without copying. Block edits go through
//! copy-on-write: if a mesher still holds the old buffer it keeps seeing the
//! old cells, and the edit bumps the version so the mesh is rebuilt.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::buffer::{CHUNK_HEIGHT, VoxelBuffer};
use crate::coords::{ChunkCoord, Side, split_world};
use crate::version::ChunkVersions;

/// Single-writer map from chunk coordinate to voxel buffer plus version
/// counters.
#[derive(Debug, Default)]
pub struct ChunkTable {
    chunks: FxHashMap<ChunkCoord, Arc<VoxelBuffer>>,
    versions: ChunkVersions,
}

impl ChunkTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a buffer at `coord`, replacing any previous buffer, and bumps
    /// the versions of the chunk and its neighbours.
    ///
    /// Returns the new version of `coord`.
    pub fn insert(&mut self, coord: ChunkCoord, buffer: VoxelBuffer) -> u64 {
        self.chunks.insert(coord, Arc::new(buffer));
        let version = self.versions.bump(coord);
        tracing::trace!(cx = coord.cx, cz = coord.cz, version, "chunk merged");
        version
    }

    /// Returns the shared buffer at `coord`, if loaded.
    pub fn get(&self, coord: ChunkCoord) -> Option<&Arc<VoxelBuffer>> {
        self.chunks.get(&coord)
    }

    /// Returns `true` if a buffer is stored at `coord`.
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Removes and returns the buffer at `coord`.
    ///
    /// Neighbour versions are bumped because their borders now face an
    /// unknown chunk. The removed chunk keeps its counter, so a later
    /// re-insert continues above every version handed out before.
    pub fn remove(&mut self, coord: ChunkCoord) -> Option<Arc<VoxelBuffer>> {
        let removed = self.chunks.remove(&coord)?;
        for side in Side::ALL {
            self.versions.bump_single(coord.neighbor(side));
        }
        Some(removed)
    }

    /// Returns the neighbour buffers of `coord` in north, south, east, west
    /// order; `None` where a neighbour is not loaded.
    pub fn neighbors(&self, coord: ChunkCoord) -> [Option<Arc<VoxelBuffer>>; 4] {
        Side::ALL.map(|side| self.chunks.get(&coord.neighbor(side)).cloned())
    }

    /// Current version of a chunk.
    pub fn version(&self, coord: ChunkCoord) -> u64 {
        self.versions.get(coord)
    }

    /// Bumps the version of `coord` and its neighbours without changing any
    /// cells.
    pub fn bump_version(&mut self, coord: ChunkCoord) -> u64 {
        self.versions.bump(coord)
    }

    /// Reads the raw cell at a world position.
    ///
    /// Returns `None` if the chunk is not loaded or `wy` is outside the
    /// column.
    pub fn get_block(&self, wx: i32, wy: i32, wz: i32) -> Option<u16> {
        if !(0..CHUNK_HEIGHT as i32).contains(&wy) {
            return None;
        }
        let (cx, lx) = split_world(wx);
        let (cz, lz) = split_world(wz);
        let buffer = self.chunks.get(&ChunkCoord::new(cx, cz))?;
        Some(buffer.get(lx, wy as usize, lz))
    }

    /// Writes the raw cell at a world position.
    ///
    /// Returns `false` without effect if the chunk is not loaded or `wy` is
    /// outside the column. A change bumps only the containing chunk's
    /// version; neighbours whose border it touches are the caller's to
    /// [`touch`](Self::touch).
    pub fn set_block(&mut self, wx: i32, wy: i32, wz: i32, raw: u16) -> bool {
        if !(0..CHUNK_HEIGHT as i32).contains(&wy) {
            return false;
        }
        let (cx, lx) = split_world(wx);
        let (cz, lz) = split_world(wz);
        let coord = ChunkCoord::new(cx, cz);
        let Some(buffer) = self.chunks.get_mut(&coord) else {
            return false;
        };
        if buffer.get(lx, wy as usize, lz) == raw {
            return true;
        }
        Arc::make_mut(buffer).set(lx, wy as usize, lz, raw);
        self.versions.bump_single(coord);
        true
    }

    /// Bumps only `coord`'s own version.
    pub fn touch(&mut self, coord: ChunkCoord) -> u64 {
        self.versions.bump_single(coord)
    }

    /// Number of loaded chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns `true` if no chunk is loaded.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterates over loaded coordinates in arbitrary order.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    /// Drops every chunk. Version counters survive.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{DIRT, STONE};

    #[test]
    fn test_insert_and_get() {
        let mut table = ChunkTable::new();
        let c = ChunkCoord::new(1, 2);
        table.insert(c, VoxelBuffer::filled(STONE));
        assert!(table.contains(c));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(c).map(|b| b.block_id(0, 0, 0)), Some(STONE));
    }

    #[test]
    fn test_insert_bumps_neighbor_versions() {
        let mut table = ChunkTable::new();
        let c = ChunkCoord::new(0, 0);
        table.insert(c, VoxelBuffer::new());
        let east = c.neighbor(Side::East);
        let before = table.version(c);
        table.insert(east, VoxelBuffer::new());
        assert!(table.version(c) > before, "neighbour insert must invalidate");
    }

    #[test]
    fn test_neighbors_in_side_order() {
        let mut table = ChunkTable::new();
        let c = ChunkCoord::new(0, 0);
        table.insert(c.neighbor(Side::South), VoxelBuffer::filled(DIRT));
        let n = table.neighbors(c);
        assert!(n[Side::North.index()].is_none());
        assert!(n[Side::South.index()].is_some());
        assert!(n[Side::East.index()].is_none());
        assert!(n[Side::West.index()].is_none());
    }

    #[test]
    fn test_get_block_world_coordinates() {
        let mut table = ChunkTable::new();
        let mut buf = VoxelBuffer::new();
        buf.set(15, 64, 0, DIRT);
        table.insert(ChunkCoord::new(-1, 0), buf);
        assert_eq!(table.get_block(-1, 64, 0), Some(DIRT));
        assert_eq!(table.get_block(-1, 65, 0), Some(0));
        assert_eq!(table.get_block(0, 64, 0), None, "unloaded chunk");
        assert_eq!(table.get_block(-1, -1, 0), None);
        assert_eq!(table.get_block(-1, 256, 0), None);
    }

    #[test]
    fn test_set_block_is_copy_on_write() {
        let mut table = ChunkTable::new();
        let c = ChunkCoord::new(0, 0);
        table.insert(c, VoxelBuffer::new());
        let held = table.get(c).cloned().unwrap();
        let v0 = table.version(c);

        assert!(table.set_block(3, 10, 4, STONE));
        assert_eq!(table.get_block(3, 10, 4), Some(STONE));
        assert_eq!(held.block_id(3, 10, 4), 0, "held snapshot is unchanged");
        assert!(table.version(c) > v0);
    }

    #[test]
    fn test_set_block_leaves_neighbor_versions() {
        let mut table = ChunkTable::new();
        let c = ChunkCoord::new(0, 0);
        let east = c.neighbor(Side::East);
        table.insert(c, VoxelBuffer::new());
        table.insert(east, VoxelBuffer::new());
        let before = table.version(east);
        assert!(table.set_block(15, 10, 4, STONE));
        assert_eq!(table.version(east), before);
        assert_eq!(table.touch(east), before + 1);
    }

    #[test]
    fn test_set_block_noop_keeps_version() {
        let mut table = ChunkTable::new();
        let c = ChunkCoord::new(0, 0);
        table.insert(c, VoxelBuffer::new());
        let v0 = table.version(c);
        assert!(table.set_block(0, 0, 0, 0));
        assert_eq!(table.version(c), v0);
    }

    #[test]
    fn test_set_block_outside_loaded_fails() {
        let mut table = ChunkTable::new();
        assert!(!table.set_block(0, 0, 0, STONE));
    }

    #[test]
    fn test_remove_invalidates_neighbors() {
        let mut table = ChunkTable::new();
        let c = ChunkCoord::new(0, 0);
        let n = c.neighbor(Side::North);
        table.insert(c, VoxelBuffer::new());
        table.insert(n, VoxelBuffer::new());
        let before = table.version(n);
        assert!(table.remove(c).is_some());
        assert!(table.version(n) > before);
        assert!(table.remove(c).is_none());
    }

    #[test]
    fn test_reinsert_after_remove_keeps_version_monotonic() {
        let mut table = ChunkTable::new();
        let c = ChunkCoord::new(0, 0);
        table.insert(c, VoxelBuffer::new());
        table.bump_version(c);
        table.bump_version(c);
        let before = table.version(c);
        table.remove(c);
        assert_eq!(table.version(c), before);
        let reinserted = table.insert(c, VoxelBuffer::filled(STONE));
        assert!(reinserted > before, "version went backwards: {before} -> {reinserted}");
    }

    #[test]
    fn test_clear_keeps_versions() {
        let mut table = ChunkTable::new();
        let c = ChunkCoord::new(4, -4);
        let before = table.insert(c, VoxelBuffer::new());
        table.clear();
        assert!(table.is_empty());
        assert!(table.insert(c, VoxelBuffer::new()) > before);
    }

    #[test]
    fn test_insert_at_coordinate_limits() {
        let mut table = ChunkTable::new();
        let corner = ChunkCoord::new(i32::MAX, i32::MIN);
        table.insert(corner, VoxelBuffer::filled(STONE));
        table.insert(ChunkCoord::new(i32::MIN, i32::MIN), VoxelBuffer::filled(DIRT));
        let n = table.neighbors(corner);
        assert!(n[Side::East.index()].is_some(), "east wraps to i32::MIN");
        assert!(n[Side::West.index()].is_none());
        assert!(n[Side::North.index()].is_none());
        assert!(table.version(corner.neighbor(Side::North)) > 0);
        assert!(table.remove(corner).is_some());
    }
}
