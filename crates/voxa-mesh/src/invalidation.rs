//! Mesh cache invalidation: tracks the data version each chunk mesh was built
//! from and determines which chunks need remeshing after a cell edit.

use voxa_voxel::{CHUNK_SIZE, ChunkCoord, Side};

use crate::mesher::Lod;

/// Mesh cache state for one chunk.
#[derive(Clone, Debug, Default)]
pub struct ChunkMeshState {
    /// Chunk version the current mesh was built from, `None` before the first mesh.
    pub meshed_version: Option<u64>,
    /// Detail tier of the current mesh.
    pub meshed_lod: Option<Lod>,
    /// Whether a remesh task is already in flight.
    pub remesh_pending: bool,
}

impl ChunkMeshState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the mesh was built from other data or at another tier.
    pub fn is_stale(&self, current_version: u64, lod: Lod) -> bool {
        self.meshed_version != Some(current_version) || self.meshed_lod != Some(lod)
    }

    /// Returns `true` if a remesh task should be submitted.
    pub fn needs_remesh(&self, current_version: u64, lod: Lod) -> bool {
        self.is_stale(current_version, lod) && !self.remesh_pending
    }

    /// Records a finished mesh.
    pub fn mark_meshed(&mut self, version: u64, lod: Lod) {
        self.meshed_version = Some(version);
        self.meshed_lod = Some(lod);
        self.remesh_pending = false;
    }
}

/// Determines which chunk meshes a cell edit invalidates.
pub struct MeshInvalidator;

impl MeshInvalidator {
    /// Chunks to remesh after editing local cell `(lx, lz)` of `edited`.
    ///
    /// The edited chunk is always included. Face neighbours are included when
    /// the edit lies on their shared border, since their face culling and AO
    /// read that cell.
    pub fn invalidate(edited: ChunkCoord, (lx, lz): (usize, usize)) -> Vec<ChunkCoord> {
        let last = CHUNK_SIZE - 1;
        let mut dirty = vec![edited];
        if lx == 0 {
            dirty.push(edited.neighbor(Side::West));
        }
        if lx == last {
            dirty.push(edited.neighbor(Side::East));
        }
        if lz == 0 {
            dirty.push(edited.neighbor(Side::North));
        }
        if lz == last {
            dirty.push(edited.neighbor(Side::South));
        }
        dirty
    }
}
