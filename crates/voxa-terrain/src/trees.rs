//! Two-pass tree placement.
//!
//! Pass one collects trunk positions from a biome-gated density noise,
//! restricted to chunk-interior columns so that foliage never leaves the
//! chunk. Pass two stamps trunks and foliage. Only the trunk's origin cell
//! may overwrite an existing block (a plant growing there); everything else
//! is placed into air only.

use noise::{NoiseFn, Simplex};
use voxa_voxel::{CHUNK_HEIGHT, CHUNK_SIZE, VoxelBuffer, block};

use crate::biome::TreeKind;
use crate::fbm::to_unit;
use crate::overworld::{ColumnInfo, SEA_LEVEL};
use crate::seed::{cell_unit, hash_cell, noise_seed, offset, salt};

const TREE_FREQUENCY: f64 = 1.0 / 32.0;
/// Per-column chance inside a dense enough patch.
const TREE_CHANCE: f64 = 0.12;
/// Foliage radius; candidates keep this margin from the chunk border.
const CANOPY_RADIUS: usize = 2;
const MIN_SPACING: usize = 3;

/// A trunk position selected in pass one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeCandidate {
    pub lx: usize,
    pub lz: usize,
    /// First trunk cell, one above the surface.
    pub base_y: usize,
    pub trunk_height: usize,
    pub kind: TreeKind,
}

impl TreeCandidate {
    /// Highest trunk cell.
    pub fn top_y(&self) -> usize {
        self.base_y + self.trunk_height - 1
    }
}

/// Selects and stamps trees.
pub struct TreePlacer {
    noise: Simplex,
    seed: i32,
}

impl TreePlacer {
    pub fn new(seed: i32) -> Self {
        Self {
            noise: Simplex::new(noise_seed(seed, offset::TREE)),
            seed,
        }
    }

    /// Pass one: collects trunk positions for a chunk whose `(0, 0)` column
    /// sits at world `origin`.
    ///
    /// `columns` is indexed `lz * CHUNK_SIZE + lx`.
    pub fn candidates(&self, origin: (i32, i32), columns: &[ColumnInfo]) -> Vec<TreeCandidate> {
        let mut out: Vec<TreeCandidate> = Vec::new();
        let interior = CANOPY_RADIUS..CHUNK_SIZE - CANOPY_RADIUS;
        for lz in interior.clone() {
            for lx in interior.clone() {
                let col = &columns[lz * CHUNK_SIZE + lx];
                let params = col.biome.params();
                let Some(threshold) = params.tree_threshold else {
                    continue;
                };
                if col.height < SEA_LEVEL || !(col.surface == block::GRASS || col.surface == block::SNOW) {
                    continue;
                }
                let wx = origin.0.wrapping_add(lx as i32);
                let wz = origin.1.wrapping_add(lz as i32);
                let density = to_unit(
                    self.noise
                        .get([wx as f64 * TREE_FREQUENCY, wz as f64 * TREE_FREQUENCY]),
                );
                if density <= threshold {
                    continue;
                }
                if cell_unit(self.seed, wx, col.height, wz, salt::TREE) >= TREE_CHANCE {
                    continue;
                }
                let crowded = out.iter().any(|t| {
                    t.lx.abs_diff(lx) < MIN_SPACING && t.lz.abs_diff(lz) < MIN_SPACING
                });
                if crowded {
                    continue;
                }

                let roll = (hash_cell(self.seed, wx, col.height, wz, salt::TRUNK) % 3) as usize;
                let trunk_height = match params.tree_kind {
                    TreeKind::Oak => 4 + roll,
                    TreeKind::Spruce => 6 + roll,
                };
                let base_y = col.height as usize + 1;
                if base_y + trunk_height + 2 >= CHUNK_HEIGHT {
                    continue;
                }
                out.push(TreeCandidate {
                    lx,
                    lz,
                    base_y,
                    trunk_height,
                    kind: params.tree_kind,
                });
            }
        }
        out
    }

    /// Pass two: stamps a tree into the buffer.
    pub fn stamp(&self, buffer: &mut VoxelBuffer, tree: &TreeCandidate) {
        buffer.set(tree.lx, tree.base_y, tree.lz, block::LOG);
        for y in tree.base_y + 1..=tree.top_y() {
            place_if_air(buffer, tree.lx, y, tree.lz, block::LOG);
        }
        match tree.kind {
            TreeKind::Oak => {
                let top = tree.top_y();
                canopy_layer(buffer, tree, top - 2, 2, true);
                canopy_layer(buffer, tree, top - 1, 2, true);
                canopy_layer(buffer, tree, top, 1, false);
                canopy_layer(buffer, tree, top + 1, 1, true);
            }
            TreeKind::Spruce => {
                let top = tree.top_y();
                canopy_layer(buffer, tree, top - 4, 2, true);
                canopy_layer(buffer, tree, top - 3, 1, false);
                canopy_layer(buffer, tree, top - 2, 2, true);
                canopy_layer(buffer, tree, top - 1, 1, false);
                canopy_layer(buffer, tree, top, 1, true);
                canopy_layer(buffer, tree, top + 1, 0, false);
            }
        }
    }
}

fn place_if_air(buffer: &mut VoxelBuffer, lx: usize, y: usize, lz: usize, id: u16) {
    if buffer.is_empty_at(lx, y, lz) {
        buffer.set(lx, y, lz, id);
    }
}

/// Fills a square of leaves around the trunk, optionally without corners.
fn canopy_layer(buffer: &mut VoxelBuffer, tree: &TreeCandidate, y: usize, radius: usize, cut_corners: bool) {
    let r = radius as isize;
    for dz in -r..=r {
        for dx in -r..=r {
            if cut_corners && r > 0 && dx.abs() == r && dz.abs() == r {
                continue;
            }
            let lx = tree.lx as isize + dx;
            let lz = tree.lz as isize + dz;
            place_if_air(buffer, lx as usize, y, lz as usize, block::LEAVES);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::Biome;
    use voxa_voxel::LAYER_AREA;

    fn flat_columns(biome: Biome, height: i32) -> Vec<ColumnInfo> {
        vec![
            ColumnInfo {
                biome,
                height,
                surface: biome.params().surface,
            };
            LAYER_AREA
        ]
    }

    fn any_trees(placer: &TreePlacer, biome: Biome) -> Vec<(i32, Vec<TreeCandidate>)> {
        (0..40)
            .map(|i| {
                let origin = (i * 16, -i * 16);
                (i, placer.candidates(origin, &flat_columns(biome, 70)))
            })
            .filter(|(_, c)| !c.is_empty())
            .collect()
    }

    #[test]
    fn test_candidates_stay_in_interior() {
        let placer = TreePlacer::new(42);
        let found = any_trees(&placer, Biome::Forest);
        assert!(!found.is_empty(), "forest should grow trees somewhere");
        for (_, trees) in found {
            for t in trees {
                assert!((2..=13).contains(&t.lx) && (2..=13).contains(&t.lz), "{t:?}");
                assert_eq!(t.base_y, 71);
            }
        }
    }

    #[test]
    fn test_desert_has_no_trees() {
        let placer = TreePlacer::new(42);
        assert!(any_trees(&placer, Biome::Desert).is_empty());
    }

    #[test]
    fn test_no_trees_under_water() {
        let placer = TreePlacer::new(42);
        for i in 0..40 {
            let cols = flat_columns(Biome::Forest, 50);
            assert!(placer.candidates((i * 16, 0), &cols).is_empty());
        }
    }

    #[test]
    fn test_candidates_are_spaced() {
        let placer = TreePlacer::new(42);
        for (_, trees) in any_trees(&placer, Biome::Forest) {
            for (i, a) in trees.iter().enumerate() {
                for b in &trees[i + 1..] {
                    assert!(
                        a.lx.abs_diff(b.lx) >= MIN_SPACING || a.lz.abs_diff(b.lz) >= MIN_SPACING,
                        "{a:?} and {b:?} too close"
                    );
                }
            }
        }
    }

    #[test]
    fn test_stamp_oak_shape() {
        let placer = TreePlacer::new(1);
        let mut buf = VoxelBuffer::new();
        buf.set(8, 71, 8, block::TALL_GRASS);
        let tree = TreeCandidate {
            lx: 8,
            lz: 8,
            base_y: 71,
            trunk_height: 5,
            kind: TreeKind::Oak,
        };
        placer.stamp(&mut buf, &tree);
        assert_eq!(buf.block_id(8, 71, 8), block::LOG, "origin overwrites plant");
        for y in 71..=75 {
            assert_eq!(buf.block_id(8, y, 8), block::LOG, "trunk at {y}");
        }
        assert_eq!(buf.block_id(10, 73, 8), block::LEAVES);
        assert_eq!(buf.block_id(10, 73, 10), 0, "corner cut");
        assert_eq!(buf.block_id(8, 76, 8), block::LEAVES);
    }

    #[test]
    fn test_foliage_never_overwrites_solid() {
        let placer = TreePlacer::new(1);
        let mut buf = VoxelBuffer::new();
        buf.set(9, 74, 8, block::STONE);
        let tree = TreeCandidate {
            lx: 8,
            lz: 8,
            base_y: 71,
            trunk_height: 5,
            kind: TreeKind::Spruce,
        };
        placer.stamp(&mut buf, &tree);
        assert_eq!(buf.block_id(9, 74, 8), block::STONE);
    }
}
