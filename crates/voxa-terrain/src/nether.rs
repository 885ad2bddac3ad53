//! Nether chunk generation: an enclosed netherrack cavern over a lava ocean.

use glam::DVec3;
use noise::{NoiseFn, Simplex};
use voxa_voxel::{CHUNK_SIZE, ChunkCoord, VoxelBuffer, block};

use crate::fbm::{fbm2, fbm3};
use crate::seed::{cell_unit, noise_seed, offset, salt};

/// Bedrock roof height.
pub const NETHER_ROOF: i32 = 127;
/// Air at or below this height fills with lava.
pub const NETHER_LAVA_LEVEL: i32 = 31;
const FLOOR_BASE: f64 = 32.0;
const FLOOR_AMPLITUDE: f64 = 10.0;
const CEILING_BASE: f64 = 100.0;
const CEILING_AMPLITUDE: f64 = 12.0;
/// Pockets are only carved this far above the lava level.
const POCKET_MARGIN: i32 = 4;
const POCKET_THRESHOLD: f64 = 0.55;
const SOUL_SAND_CHANCE: f64 = 0.15;
const GLOWSTONE_CHANCE: f64 = 0.04;
const FORTRESS_THRESHOLD: f64 = 0.55;
const FORTRESS_DENSITY: f64 = 0.2;
const FORTRESS_HEIGHT: i32 = 8;

/// Seeded noise fields for the nether.
pub struct NetherGenerator {
    floor: Simplex,
    ceiling: Simplex,
    pocket: Simplex,
    structure: Simplex,
    density: Simplex,
    seed: i32,
}

impl NetherGenerator {
    pub fn new(seed: i32) -> Self {
        Self {
            floor: Simplex::new(noise_seed(seed, offset::NETHER_FLOOR)),
            ceiling: Simplex::new(noise_seed(seed, offset::NETHER_CEILING)),
            pocket: Simplex::new(noise_seed(seed, offset::NETHER_POCKET)),
            structure: Simplex::new(noise_seed(seed, offset::NETHER_STRUCTURE)),
            density: Simplex::new(noise_seed(seed, offset::NETHER_DENSITY)),
            seed,
        }
    }

    /// Floor and ceiling heights of a world column.
    pub fn floor_ceiling(&self, wx: i32, wz: i32) -> (i32, i32) {
        let (x, z) = (wx as f64, wz as f64);
        let floor = FLOOR_BASE + FLOOR_AMPLITUDE * fbm2(&self.floor, x, z, 3, 1.0 / 48.0);
        let ceiling = CEILING_BASE + CEILING_AMPLITUDE * fbm2(&self.ceiling, x, z, 3, 1.0 / 56.0);
        (libm::floor(floor) as i32, libm::floor(ceiling) as i32)
    }

    fn is_pocket(&self, wx: i32, y: i32, wz: i32) -> bool {
        let pos = DVec3::new(wx as f64, y as f64, wz as f64);
        fbm3(&self.pocket, pos, 2, 1.0 / 20.0) > POCKET_THRESHOLD
    }

    fn is_fortress(&self, wx: i32, y: i32, wz: i32) -> bool {
        let (x, z) = (wx as f64, wz as f64);
        if fbm2(&self.structure, x, z, 2, 1.0 / 96.0) <= FORTRESS_THRESHOLD {
            return false;
        }
        self.density.get([x * 0.25, y as f64 * 0.25, z * 0.25]) > FORTRESS_DENSITY
    }

    /// Generates the nether chunk at `coord`.
    pub fn generate(&self, coord: ChunkCoord) -> VoxelBuffer {
        let (ox, oz) = coord.origin();
        let mut buffer = VoxelBuffer::new();
        for lz in 0..CHUNK_SIZE {
            for lx in 0..CHUNK_SIZE {
                let wx = ox.wrapping_add(lx as i32);
                let wz = oz.wrapping_add(lz as i32);
                self.fill_column(&mut buffer, lx, lz, wx, wz);
            }
        }
        buffer
    }

    fn fill_column(&self, buffer: &mut VoxelBuffer, lx: usize, lz: usize, wx: i32, wz: i32) {
        let (floor, ceiling) = self.floor_ceiling(wx, wz);

        for y in 0..=NETHER_ROOF {
            let mut id = if y == 0 || y == NETHER_ROOF {
                block::BEDROCK
            } else if y <= floor || y >= ceiling {
                block::NETHERRACK
            } else {
                block::AIR
            };
            if id == block::NETHERRACK
                && y > NETHER_LAVA_LEVEL + POCKET_MARGIN
                && y < NETHER_ROOF - 1
                && self.is_pocket(wx, y, wz)
            {
                id = block::AIR;
            }
            if id == block::AIR && y <= NETHER_LAVA_LEVEL {
                id = block::LAVA;
            }
            buffer.set(lx, y as usize, lz, id);
        }

        let floor_y = floor as usize;
        if floor > NETHER_LAVA_LEVEL
            && buffer.block_id(lx, floor_y, lz) == block::NETHERRACK
            && buffer.is_empty_at(lx, floor_y + 1, lz)
            && cell_unit(self.seed, wx, floor, wz, salt::SOUL_SAND) < SOUL_SAND_CHANCE
        {
            buffer.set(lx, floor_y, lz, block::SOUL_SAND);
        }

        let hang = ceiling - 1;
        if hang > floor
            && buffer.is_empty_at(lx, hang as usize, lz)
            && buffer.block_id(lx, ceiling as usize, lz) == block::NETHERRACK
            && cell_unit(self.seed, wx, hang, wz, salt::GLOWSTONE) < GLOWSTONE_CHANCE
        {
            buffer.set(lx, hang as usize, lz, block::GLOWSTONE);
        }

        for y in (floor + 1)..=(floor + FORTRESS_HEIGHT).min(ceiling - 1) {
            if buffer.is_empty_at(lx, y as usize, lz) && self.is_fortress(wx, y, wz) {
                buffer.set(lx, y as usize, lz, block::NETHER_BRICK);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxa_voxel::CHUNK_HEIGHT;

    #[test]
    fn test_bedrock_caps() {
        let nether = NetherGenerator::new(42);
        let buf = nether.generate(ChunkCoord::new(0, 0));
        for lz in 0..CHUNK_SIZE {
            for lx in 0..CHUNK_SIZE {
                assert_eq!(buf.block_id(lx, 0, lz), block::BEDROCK);
                assert_eq!(buf.block_id(lx, NETHER_ROOF as usize, lz), block::BEDROCK);
                for y in (NETHER_ROOF as usize + 1)..CHUNK_HEIGHT {
                    assert!(buf.is_empty_at(lx, y, lz));
                }
            }
        }
    }

    #[test]
    fn test_floor_ceiling_ranges() {
        let nether = NetherGenerator::new(42);
        for i in -300..300 {
            let (floor, ceiling) = nether.floor_ceiling(i * 7, i * -3);
            assert!((22..=42).contains(&floor), "floor {floor}");
            assert!((88..=112).contains(&ceiling), "ceiling {ceiling}");
            assert!(floor < ceiling);
        }
    }

    #[test]
    fn test_no_air_at_or_below_lava_level() {
        let nether = NetherGenerator::new(42);
        for c in 0..4 {
            let buf = nether.generate(ChunkCoord::new(c, -c));
            for lz in 0..CHUNK_SIZE {
                for lx in 0..CHUNK_SIZE {
                    for y in 1..=NETHER_LAVA_LEVEL as usize {
                        assert!(!buf.is_empty_at(lx, y, lz), "air at y={y}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_contains_open_cavern() {
        let nether = NetherGenerator::new(9);
        let buf = nether.generate(ChunkCoord::new(2, 5));
        let open = (0..CHUNK_SIZE).any(|lx| buf.is_empty_at(lx, 60, 0));
        assert!(open, "mid-height layer should be open cavern");
    }

    #[test]
    fn test_deterministic() {
        let a = NetherGenerator::new(3).generate(ChunkCoord::new(-4, 8));
        let b = NetherGenerator::new(3).generate(ChunkCoord::new(-4, 8));
        assert_eq!(a, b);
    }
}
