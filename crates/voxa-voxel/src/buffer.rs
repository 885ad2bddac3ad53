//! Dense voxel storage for a single 16×256×16 chunk column.
//!
//! Every cell is a raw `u16`: the low 12 bits hold the block id (0 = air) and
//! the high 4 bits an auxiliary value such as a signal power level. The flat
//! index layout `(y << 8) | (lz << 4) | lx` is a fixed contract shared by the
//! generator, the mesher and the block store.

use std::hash::Hasher;

use rustc_hash::FxHasher;
use static_assertions::const_assert;

/// Horizontal side length of a chunk column in cells.
pub const CHUNK_SIZE: usize = 16;

/// Vertical height of a chunk column in cells.
pub const CHUNK_HEIGHT: usize = 256;

/// Number of cells in one horizontal layer.
pub const LAYER_AREA: usize = CHUNK_SIZE * CHUNK_SIZE;

/// Number of cells in a chunk column.
pub const CHUNK_VOLUME: usize = CHUNK_HEIGHT * LAYER_AREA;

/// Mask selecting the block id bits of a raw cell.
pub const ID_MASK: u16 = 0x0FFF;

/// Mask selecting the auxiliary bits of a raw cell.
pub const AUX_MASK: u16 = 0xF000;

/// Bit offset of the auxiliary field.
pub const AUX_SHIFT: u16 = 12;

// The index packs lx and lz into 4 bits each and y into the next 8.
const_assert!(CHUNK_SIZE == 16);
const_assert!(CHUNK_HEIGHT <= 256);

/// Extracts the block id from a raw cell value.
#[inline]
pub const fn cell_id(raw: u16) -> u16 {
    raw & ID_MASK
}

/// Extracts the auxiliary value (0–15) from a raw cell value.
#[inline]
pub const fn cell_aux(raw: u16) -> u8 {
    ((raw & AUX_MASK) >> AUX_SHIFT) as u8
}

/// Packs a block id and an auxiliary value into a raw cell.
///
/// Out-of-range inputs are masked rather than rejected.
#[inline]
pub const fn pack_cell(id: u16, aux: u8) -> u16 {
    (id & ID_MASK) | (((aux as u16) << AUX_SHIFT) & AUX_MASK)
}

/// Returns the flat index of a chunk-local cell.
///
/// `lx` and `lz` must be in `0..16`, `y` in `0..256`.
#[inline]
pub const fn index(lx: usize, y: usize, lz: usize) -> usize {
    (y << 8) | (lz << 4) | lx
}

/// Inverse of [`index`]: returns `(lx, y, lz)`.
#[inline]
pub const fn decode_index(index: usize) -> (usize, usize, usize) {
    (index & 0xF, index >> 8, (index >> 4) & 0xF)
}

/// Fixed-size dense voxel array for one chunk column.
///
/// Buffers move by value between the coordinator and workers; once stored in
/// the chunk table they are shared read-only behind an `Arc`.
#[derive(Clone, PartialEq, Eq)]
pub struct VoxelBuffer {
    cells: Box<[u16]>,
}

impl VoxelBuffer {
    /// Creates a buffer with every cell set to air.
    pub fn new() -> Self {
        Self {
            cells: vec![0u16; CHUNK_VOLUME].into_boxed_slice(),
        }
    }

    /// Creates a buffer with every cell set to the given raw value.
    pub fn filled(raw: u16) -> Self {
        Self {
            cells: vec![raw; CHUNK_VOLUME].into_boxed_slice(),
        }
    }

    /// Wraps an existing cell vector.
    ///
    /// Returns `None` if the length is not exactly [`CHUNK_VOLUME`].
    pub fn from_cells(cells: Vec<u16>) -> Option<Self> {
        if cells.len() != CHUNK_VOLUME {
            return None;
        }
        Some(Self {
            cells: cells.into_boxed_slice(),
        })
    }

    /// Returns the raw cell at a chunk-local position.
    #[inline]
    pub fn get(&self, lx: usize, y: usize, lz: usize) -> u16 {
        self.cells[index(lx, y, lz)]
    }

    /// Overwrites the raw cell at a chunk-local position.
    #[inline]
    pub fn set(&mut self, lx: usize, y: usize, lz: usize, raw: u16) {
        self.cells[index(lx, y, lz)] = raw;
    }

    /// Returns the block id at a chunk-local position.
    #[inline]
    pub fn block_id(&self, lx: usize, y: usize, lz: usize) -> u16 {
        cell_id(self.get(lx, y, lz))
    }

    /// Returns the auxiliary value at a chunk-local position.
    #[inline]
    pub fn aux(&self, lx: usize, y: usize, lz: usize) -> u8 {
        cell_aux(self.get(lx, y, lz))
    }

    /// Returns `true` if the cell holds air (id 0, any aux).
    #[inline]
    pub fn is_empty_at(&self, lx: usize, y: usize, lz: usize) -> bool {
        self.block_id(lx, y, lz) == 0
    }

    /// Returns the raw cell slice in index order.
    pub fn cells(&self) -> &[u16] {
        &self.cells
    }

    /// Returns the raw cell slice mutably.
    pub fn cells_mut(&mut self) -> &mut [u16] {
        &mut self.cells
    }

    /// Returns the highest `y` holding a non-air cell, or `None` if the
    /// whole column is empty.
    pub fn highest_occupied_y(&self) -> Option<usize> {
        (0..CHUNK_HEIGHT).rev().find(|&y| {
            let start = y << 8;
            self.cells[start..start + LAYER_AREA]
                .iter()
                .any(|&raw| cell_id(raw) != 0)
        })
    }

    /// Counts non-air cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&raw| cell_id(raw) != 0).count()
    }

    /// Hashes every cell for determinism comparisons.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        for &raw in self.cells.iter() {
            hasher.write_u16(raw);
        }
        hasher.finish()
    }

    /// Resets every cell to air, keeping the allocation.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }
}

impl Default for VoxelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VoxelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoxelBuffer")
            .field("occupied", &self.occupied_count())
            .field("highest_y", &self.highest_occupied_y())
            .finish()
    }
}
