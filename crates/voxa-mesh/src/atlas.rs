//! Atlas UV table: `(block, face) → rectangle` in normalized atlas space.
//!
//! The table is supplied once at startup and read concurrently by every
//! mesher. Lookups never fail: unknown blocks or faces resolve to the
//! table's `missing` rectangle.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use voxa_voxel::{block, cell_id};

use crate::face_direction::FaceDirection;

/// A rectangle in normalized texture-atlas space.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct UvRect {
    pub u: f32,
    pub v: f32,
    pub width: f32,
    pub height: f32,
}

impl UvRect {
    pub const fn new(u: f32, v: f32, width: f32, height: f32) -> Self {
        Self { u, v, width, height }
    }

    /// Maps a face-local coordinate in `[0, 1]²` into this rectangle.
    #[inline]
    pub fn map(&self, s: f32, t: f32) -> [f32; 2] {
        [self.u + s * self.width, self.v + t * self.height]
    }
}

/// Errors raised while loading an atlas description.
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error("failed to parse atlas description: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("unknown block name '{0}'")]
    UnknownBlock(String),
    #[error("unknown face name '{0}' (expected top, bottom, north, south, east, west, side or all)")]
    UnknownFace(String),
}

#[derive(Deserialize)]
struct AtlasEntry {
    block: String,
    face: String,
    rect: UvRect,
}

/// Read-only UV lookup consumed by the mesher.
#[derive(Clone, Debug)]
pub struct AtlasTable {
    entries: FxHashMap<(u16, FaceDirection), UvRect>,
    missing: UvRect,
}

impl AtlasTable {
    /// Creates an empty table where every lookup yields `missing`.
    pub fn new(missing: UvRect) -> Self {
        Self {
            entries: FxHashMap::default(),
            missing,
        }
    }

    /// Assigns a rectangle to one face of a block.
    pub fn insert(&mut self, block_id: u16, face: FaceDirection, rect: UvRect) {
        self.entries.insert((cell_id(block_id), face), rect);
    }

    /// Assigns the same rectangle to all six faces of a block.
    pub fn insert_all(&mut self, block_id: u16, rect: UvRect) {
        for face in FaceDirection::ALL {
            self.insert(block_id, face, rect);
        }
    }

    /// Rectangle for one face of a block, or the missing marker.
    pub fn lookup(&self, block_id: u16, face: FaceDirection) -> UvRect {
        self.entries
            .get(&(cell_id(block_id), face))
            .copied()
            .unwrap_or(self.missing)
    }

    pub fn missing(&self) -> UvRect {
        self.missing
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a uniform grid atlas with `tiles_per_row` square tiles per row.
    ///
    /// Every described block except air gets its own tile in id order and
    /// the final tile is reserved for the missing marker.
    pub fn grid(tiles_per_row: u32) -> Self {
        let per_row = tiles_per_row.max(1);
        let tile = 1.0 / per_row as f32;
        let rect_for = |slot: u32| {
            let (col, row) = (slot % per_row, slot / per_row);
            UvRect::new(col as f32 * tile, row as f32 * tile, tile, tile)
        };

        let count = block::block_count() as u32;
        let mut table = Self::new(rect_for(count - 1));
        for id in 1..count {
            table.insert_all(id as u16, rect_for(id - 1));
        }
        table
    }

    /// Parses a RON list of `(block: "name", face: "top", rect: (u: .., v: ..,
    /// width: .., height: ..))` entries on top of `missing`.
    ///
    /// The face may also be `"side"` (the four horizontal faces) or `"all"`.
    pub fn from_ron_str(source: &str, missing: UvRect) -> Result<Self, AtlasError> {
        let entries: Vec<AtlasEntry> = ron::from_str(source)?;
        let mut table = Self::new(missing);
        for entry in entries {
            let id = block::lookup_by_name(&entry.block)
                .ok_or_else(|| AtlasError::UnknownBlock(entry.block.clone()))?;
            match entry.face.as_str() {
                "all" => table.insert_all(id, entry.rect),
                "side" => {
                    for face in FaceDirection::ALL.into_iter().filter(|f| f.is_horizontal()) {
                        table.insert(id, face, entry.rect);
                    }
                }
                name => {
                    let face = FaceDirection::from_name(name)
                        .ok_or_else(|| AtlasError::UnknownFace(name.to_string()))?;
                    table.insert(id, face, entry.rect);
                }
            }
        }
        tracing::debug!(entries = table.len(), "loaded atlas table");
        Ok(table)
    }
}

impl Default for AtlasTable {
    fn default() -> Self {
        Self::grid(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING_RECT: UvRect = UvRect::new(0.9, 0.9, 0.1, 0.1);

    #[test]
    fn test_lookup_falls_back_to_missing() {
        let mut table = AtlasTable::new(MISSING_RECT);
        let stone = UvRect::new(0.0, 0.0, 0.25, 0.25);
        table.insert(block::STONE, FaceDirection::PosY, stone);
        assert_eq!(table.lookup(block::STONE, FaceDirection::PosY), stone);
        assert_eq!(table.lookup(block::STONE, FaceDirection::NegY), MISSING_RECT);
        assert_eq!(table.lookup(4000, FaceDirection::PosY), MISSING_RECT);
    }

    #[test]
    fn test_lookup_ignores_aux_bits() {
        let mut table = AtlasTable::new(MISSING_RECT);
        let wire = UvRect::new(0.5, 0.5, 0.1, 0.1);
        table.insert_all(block::REDSTONE_WIRE, wire);
        let powered = voxa_voxel::pack_cell(block::REDSTONE_WIRE, 15);
        assert_eq!(table.lookup(powered, FaceDirection::PosY), wire);
    }

    #[test]
    fn test_grid_covers_every_block() {
        let table = AtlasTable::grid(8);
        let missing = table.missing();
        for id in 1..block::block_count() as u16 {
            for face in FaceDirection::ALL {
                let rect = table.lookup(id, face);
                assert_ne!(rect, missing, "block {id} face {face:?}");
                assert!(rect.u >= 0.0 && rect.u + rect.width <= 1.0 + 1e-6);
            }
        }
        assert_eq!(table.lookup(block::AIR, FaceDirection::PosY), missing);
    }

    #[test]
    fn test_from_ron_str() {
        let source = r#"[
            (block: "grass", face: "top", rect: (u: 0.0, v: 0.0, width: 0.0625, height: 0.0625)),
            (block: "grass", face: "side", rect: (u: 0.0625, v: 0.0, width: 0.0625, height: 0.0625)),
            (block: "stone", face: "all", rect: (u: 0.125, v: 0.0, width: 0.0625, height: 0.0625)),
        ]"#;
        let table = AtlasTable::from_ron_str(source, MISSING_RECT).expect("valid atlas");
        assert_eq!(table.len(), 1 + 4 + 6);
        assert_eq!(table.lookup(block::GRASS, FaceDirection::PosY).u, 0.0);
        assert_eq!(table.lookup(block::GRASS, FaceDirection::NegZ).u, 0.0625);
        assert_eq!(table.lookup(block::GRASS, FaceDirection::NegY), MISSING_RECT);
        assert_eq!(table.lookup(block::STONE, FaceDirection::NegY).u, 0.125);
    }

    #[test]
    fn test_from_ron_str_rejects_unknown_names() {
        let bad_block = r#"[(block: "unobtainium", face: "top", rect: (u: 0.0, v: 0.0, width: 1.0, height: 1.0))]"#;
        assert!(matches!(
            AtlasTable::from_ron_str(bad_block, MISSING_RECT),
            Err(AtlasError::UnknownBlock(_))
        ));
        let bad_face = r#"[(block: "stone", face: "up", rect: (u: 0.0, v: 0.0, width: 1.0, height: 1.0))]"#;
        assert!(matches!(
            AtlasTable::from_ron_str(bad_face, MISSING_RECT),
            Err(AtlasError::UnknownFace(_))
        ));
        assert!(matches!(
            AtlasTable::from_ron_str("not ron", MISSING_RECT),
            Err(AtlasError::Parse(_))
        ));
    }
}
