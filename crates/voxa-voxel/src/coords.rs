//! Chunk coordinates, neighbour sides and dimensions.

use serde::{Deserialize, Serialize};

use crate::buffer::CHUNK_SIZE;

/// Identifies a chunk column on the horizontal grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// Chunk-grid X coordinate.
    pub cx: i32,
    /// Chunk-grid Z coordinate.
    pub cz: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    /// Returns the chunk containing the given world column.
    pub fn from_world(wx: i32, wz: i32) -> Self {
        Self {
            cx: wx.div_euclid(CHUNK_SIZE as i32),
            cz: wz.div_euclid(CHUNK_SIZE as i32),
        }
    }

    /// World X/Z of the chunk's `(0, 0)` local column.
    ///
    /// Wraps instead of overflowing for coordinates near the `i32` limits.
    pub fn origin(self) -> (i32, i32) {
        (
            self.cx.wrapping_mul(CHUNK_SIZE as i32),
            self.cz.wrapping_mul(CHUNK_SIZE as i32),
        )
    }

    /// Returns the chunk offset by `(dx, dz)`, wrapping at the `i32` limits.
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx.wrapping_add(dx),
            cz: self.cz.wrapping_add(dz),
        }
    }

    /// Returns the face-adjacent chunk on the given side.
    pub fn neighbor(self, side: Side) -> Self {
        let (dx, dz) = side.delta();
        self.offset(dx, dz)
    }

    /// Chebyshev distance in chunks on the wrapping grid.
    pub fn chebyshev(self, other: Self) -> u32 {
        self.cx
            .wrapping_sub(other.cx)
            .unsigned_abs()
            .max(self.cz.wrapping_sub(other.cz).unsigned_abs())
    }
}

/// Splits a world column coordinate into `(chunk, local)` along one axis.
#[inline]
pub fn split_world(w: i32) -> (i32, usize) {
    let size = CHUNK_SIZE as i32;
    (w.div_euclid(size), w.rem_euclid(size) as usize)
}

/// One of the four horizontal neighbours of a chunk.
///
/// The discriminant is the slot index used by neighbour arrays in the
/// mesher and in meshing requests: north, south, east, west.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    /// −Z.
    North = 0,
    /// +Z.
    South = 1,
    /// +X.
    East = 2,
    /// −X.
    West = 3,
}

impl Side {
    /// All four sides in slot order.
    pub const ALL: [Side; 4] = [Side::North, Side::South, Side::East, Side::West];

    /// Chunk-grid delta `(dx, dz)` towards this side.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Side::North => (0, -1),
            Side::South => (0, 1),
            Side::East => (1, 0),
            Side::West => (-1, 0),
        }
    }

    /// The side facing back towards this one.
    pub const fn opposite(self) -> Self {
        match self {
            Side::North => Side::South,
            Side::South => Side::North,
            Side::East => Side::West,
            Side::West => Side::East,
        }
    }

    /// Slot index (0–3).
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// World dimension a chunk is generated for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// Surface world with biomes, caves, ores and trees.
    #[default]
    Overworld,
    /// Enclosed cavern world over a lava ocean.
    Nether,
    /// Floating end-stone islands.
    End,
}

impl Dimension {
    /// All dimensions.
    pub const ALL: [Dimension; 3] = [Dimension::Overworld, Dimension::Nether, Dimension::End];

    /// Lower-case name used in configuration and logs.
    pub fn name(self) -> &'static str {
        match self {
            Dimension::Overworld => "overworld",
            Dimension::Nether => "nether",
            Dimension::End => "end",
        }
    }

    /// Parses a lower-case name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
