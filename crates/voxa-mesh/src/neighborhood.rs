//! Padded chunk snapshot for cross-chunk face and AO lookups.
//!
//! [`PaddedChunk`] copies the center buffer plus the one-cell border ring
//! sourced from the four face neighbours into a single `(S+2) × H × (S+2)`
//! array, so the mesher can look up any cell at local `x, z ∈ -1..=S`
//! without branching on which chunk owns it. Missing neighbours and the
//! four diagonal corner columns are left as air.

use voxa_voxel::{CHUNK_HEIGHT, CHUNK_SIZE, Side, VoxelBuffer, block};

/// Side length of the padded horizontal footprint.
pub const PADDED_SIZE: usize = CHUNK_SIZE + 2;

/// Cell reported for `y < 0`. Below the world counts as opaque so the bedrock
/// floor never emits a bottom face.
pub const BELOW_WORLD: u16 = block::BEDROCK;

/// A center chunk with a one-cell horizontal border.
#[derive(Clone)]
pub struct PaddedChunk {
    cells: Vec<u16>,
}

impl PaddedChunk {
    /// Builds the padded snapshot. `neighbors` follows [`Side`] order:
    /// north (−Z), south (+Z), east (+X), west (−X).
    pub fn build(center: &VoxelBuffer, neighbors: &[Option<&VoxelBuffer>; 4]) -> Self {
        let mut cells = vec![block::AIR; PADDED_SIZE * CHUNK_HEIGHT * PADDED_SIZE];
        let last = CHUNK_SIZE - 1;

        for y in 0..CHUNK_HEIGHT {
            for lz in 0..CHUNK_SIZE {
                for lx in 0..CHUNK_SIZE {
                    cells[padded_index(lx + 1, y, lz + 1)] = center.get(lx, y, lz);
                }
            }

            for i in 0..CHUNK_SIZE {
                if let Some(north) = neighbors[Side::North.index()] {
                    cells[padded_index(i + 1, y, 0)] = north.get(i, y, last);
                }
                if let Some(south) = neighbors[Side::South.index()] {
                    cells[padded_index(i + 1, y, PADDED_SIZE - 1)] = south.get(i, y, 0);
                }
                if let Some(east) = neighbors[Side::East.index()] {
                    cells[padded_index(PADDED_SIZE - 1, y, i + 1)] = east.get(0, y, i);
                }
                if let Some(west) = neighbors[Side::West.index()] {
                    cells[padded_index(0, y, i + 1)] = west.get(last, y, i);
                }
            }
        }

        Self { cells }
    }

    /// Builds a snapshot with no neighbours (all borders air).
    pub fn from_center_only(center: &VoxelBuffer) -> Self {
        Self::build(center, &[None, None, None, None])
    }

    /// Raw cell at chunk-local coordinates, `x, z ∈ -1..=CHUNK_SIZE`.
    ///
    /// Below the world returns [`BELOW_WORLD`]; above it and outside the
    /// padded footprint returns air.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> u16 {
        if y < 0 {
            return BELOW_WORLD;
        }
        let (px, pz) = (x + 1, z + 1);
        let limit = PADDED_SIZE as i32;
        if y >= CHUNK_HEIGHT as i32 || !(0..limit).contains(&px) || !(0..limit).contains(&pz) {
            return block::AIR;
        }
        self.cells[padded_index(px as usize, y as usize, pz as usize)]
    }
}

#[inline]
fn padded_index(px: usize, y: usize, pz: usize) -> usize {
    (y * PADDED_SIZE + pz) * PADDED_SIZE + px
}
