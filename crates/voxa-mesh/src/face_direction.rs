//! The six axis-aligned face directions of a voxel.

/// One of the six cardinal directions a voxel face can point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum FaceDirection {
    /// +X direction (east).
    PosX = 0,
    /// −X direction (west).
    NegX = 1,
    /// +Y direction (top).
    PosY = 2,
    /// −Y direction (bottom).
    NegY = 3,
    /// +Z direction (south).
    PosZ = 4,
    /// −Z direction (north).
    NegZ = 5,
}

impl FaceDirection {
    /// All six directions in order.
    pub const ALL: [FaceDirection; 6] = [
        Self::PosX,
        Self::NegX,
        Self::PosY,
        Self::NegY,
        Self::PosZ,
        Self::NegZ,
    ];

    /// Returns `(layer_axis, u_axis, v_axis)` with each value 0=X, 1=Y, 2=Z.
    ///
    /// `u × v` always points along the positive normal, so a quad walked
    /// `(u0,v0) → (u1,v0) → (u1,v1) → (u0,v1)` is counter-clockwise when
    /// seen from the positive side.
    pub fn sweep_axes(self) -> (usize, usize, usize) {
        match self {
            Self::PosX | Self::NegX => (0, 1, 2), // layer=X, u=Y, v=Z
            Self::PosY | Self::NegY => (1, 2, 0), // layer=Y, u=Z, v=X
            Self::PosZ | Self::NegZ => (2, 0, 1), // layer=Z, u=X, v=Y
        }
    }

    /// Returns `true` for the three directions pointing along a positive axis.
    pub fn is_positive(self) -> bool {
        matches!(self, Self::PosX | Self::PosY | Self::PosZ)
    }

    /// Returns `true` for the four side faces.
    pub fn is_horizontal(self) -> bool {
        !matches!(self, Self::PosY | Self::NegY)
    }

    /// Returns the unit normal as `[f32; 3]`.
    pub fn normal(self) -> [f32; 3] {
        match self {
            Self::PosX => [1.0, 0.0, 0.0],
            Self::NegX => [-1.0, 0.0, 0.0],
            Self::PosY => [0.0, 1.0, 0.0],
            Self::NegY => [0.0, -1.0, 0.0],
            Self::PosZ => [0.0, 0.0, 1.0],
            Self::NegZ => [0.0, 0.0, -1.0],
        }
    }

    /// Returns the integer offset to the neighbouring cell.
    pub fn delta(self) -> [i32; 3] {
        match self {
            Self::PosX => [1, 0, 0],
            Self::NegX => [-1, 0, 0],
            Self::PosY => [0, 1, 0],
            Self::NegY => [0, -1, 0],
            Self::PosZ => [0, 0, 1],
            Self::NegZ => [0, 0, -1],
        }
    }

    /// Returns the neighbor coordinate for this direction.
    pub fn offset(self, x: i32, y: i32, z: i32) -> (i32, i32, i32) {
        let [dx, dy, dz] = self.delta();
        (x + dx, y + dy, z + dz)
    }

    /// Returns the opposite face direction.
    pub fn opposite(self) -> Self {
        match self {
            Self::PosX => Self::NegX,
            Self::NegX => Self::PosX,
            Self::PosY => Self::NegY,
            Self::NegY => Self::PosY,
            Self::PosZ => Self::NegZ,
            Self::NegZ => Self::PosZ,
        }
    }

    /// Directional shading applied on top of ambient occlusion.
    pub fn shade(self) -> f32 {
        match self {
            Self::PosY => 1.0,
            Self::NegY => 0.5,
            Self::PosZ | Self::NegZ => 0.8,
            Self::PosX | Self::NegX => 0.6,
        }
    }

    /// Face name used by the atlas table.
    pub fn name(self) -> &'static str {
        match self {
            Self::PosX => "east",
            Self::NegX => "west",
            Self::PosY => "top",
            Self::NegY => "bottom",
            Self::PosZ => "south",
            Self::NegZ => "north",
        }
    }

    /// Parses a face name produced by [`FaceDirection::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Returns the direction index (0–5).
    pub fn index(self) -> usize {
        self as usize
    }
}
