//! End chunk generation: a central end-stone island ringed by obsidian
//! pillars, with sparse floating islands further out.

use noise::Simplex;
use rand::Rng;
use voxa_voxel::{CHUNK_HEIGHT, CHUNK_SIZE, ChunkCoord, VoxelBuffer, block};

use crate::fbm::fbm2;
use crate::seed::{det_sqrt, grid_rng, noise_seed, offset, salt};

const ISLAND_RADIUS: f64 = 96.0;
const ISLAND_RADIUS_JITTER: f64 = 12.0;
const ISLAND_SURFACE: f64 = 60.0;
const ISLAND_DOME: f64 = 6.0;
const ISLAND_ROUGHNESS: f64 = 3.0;
const ISLAND_DEPTH: f64 = 36.0;
/// Side length of the pillar placement grid.
pub const PILLAR_GRID: i32 = 32;
const PILLAR_CHANCE: f64 = 0.3;
const PILLAR_RADIUS: i32 = 2;
/// Gap between the main island edge and the floating island belt.
const FLOATING_GAP: f64 = 48.0;
const FLOATING_THRESHOLD: f64 = 0.45;
const FLOATING_CENTER: f64 = 64.0;

/// Vertical extent of end stone in a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub bottom: i32,
    pub top: i32,
}

/// An obsidian pillar chosen for one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pillar {
    pub x: i32,
    pub z: i32,
    pub base: i32,
    pub top: i32,
}

/// Seeded noise fields for the end.
pub struct EndGenerator {
    island: Simplex,
    surface: Simplex,
    floating: Simplex,
    seed: i32,
}

impl EndGenerator {
    pub fn new(seed: i32) -> Self {
        Self {
            island: Simplex::new(noise_seed(seed, offset::END_ISLAND)),
            surface: Simplex::new(noise_seed(seed, offset::END_SURFACE)),
            floating: Simplex::new(noise_seed(seed, offset::END_FLOATING)),
            seed,
        }
    }

    /// Radius of the main island in the direction of a world column.
    fn island_radius(&self, x: f64, z: f64) -> f64 {
        ISLAND_RADIUS + ISLAND_RADIUS_JITTER * fbm2(&self.island, x, z, 2, 1.0 / 64.0)
    }

    /// End stone span of the main island at a world column, if inside it.
    pub fn main_island(&self, wx: i32, wz: i32) -> Option<Span> {
        let (x, z) = (wx as f64, wz as f64);
        let distance = det_sqrt(x * x + z * z);
        let radius = self.island_radius(x, z);
        if distance >= radius {
            return None;
        }
        let t = distance / radius;
        let edge = 1.0 - t * t;
        let top = ISLAND_SURFACE
            + ISLAND_DOME * edge
            + ISLAND_ROUGHNESS * fbm2(&self.surface, x, z, 3, 1.0 / 32.0);
        let underside =
            0.75 + 0.25 * fbm2(&self.surface, x + 5_000.0, z - 5_000.0, 2, 1.0 / 24.0);
        let bottom = ISLAND_SURFACE - ISLAND_DEPTH * edge * underside;
        let span = Span {
            bottom: (libm::floor(bottom) as i32).max(1),
            top: libm::floor(top) as i32,
        };
        (span.bottom <= span.top).then_some(span)
    }

    /// End stone span of a floating island at a world column, if any.
    pub fn floating_island(&self, wx: i32, wz: i32) -> Option<Span> {
        let (x, z) = (wx as f64, wz as f64);
        let distance = det_sqrt(x * x + z * z);
        if distance <= self.island_radius(x, z) + FLOATING_GAP {
            return None;
        }
        let n = fbm2(&self.floating, x, z, 3, 1.0 / 48.0);
        if n <= FLOATING_THRESHOLD {
            return None;
        }
        let strength = (n - FLOATING_THRESHOLD) / (1.0 - FLOATING_THRESHOLD);
        let thickness = 1 + libm::floor(10.0 * strength) as i32;
        let drift = fbm2(&self.floating, x + 9_000.0, z - 9_000.0, 2, 1.0 / 96.0);
        let center = libm::floor(FLOATING_CENTER + 8.0 * drift) as i32;
        Some(Span {
            bottom: center - thickness,
            top: center + thickness / 3,
        })
    }

    /// The pillar (if any) belonging to a pillar grid cell.
    ///
    /// Pillars only stand on the main island, well inside its edge.
    pub fn pillar(&self, gx: i32, gz: i32) -> Option<Pillar> {
        let mut rng = grid_rng(self.seed, gx, gz, salt::PILLAR);
        let roll: f64 = rng.random();
        let dx = rng.random_range(4..PILLAR_GRID - 4);
        let dz = rng.random_range(4..PILLAR_GRID - 4);
        let rise = rng.random_range(10..=40);
        if roll >= PILLAR_CHANCE {
            return None;
        }
        let x = gx.wrapping_mul(PILLAR_GRID).wrapping_add(dx);
        let z = gz.wrapping_mul(PILLAR_GRID).wrapping_add(dz);
        let (fx, fz) = (x as f64, z as f64);
        if det_sqrt(fx * fx + fz * fz) >= self.island_radius(fx, fz) - 8.0 {
            return None;
        }
        let ground = self.main_island(x, z)?;
        Some(Pillar {
            x,
            z,
            base: (ground.top - 2).max(1),
            top: (ground.top + rise).min(CHUNK_HEIGHT as i32 - 2),
        })
    }

    /// Generates the end chunk at `coord`.
    pub fn generate(&self, coord: ChunkCoord) -> VoxelBuffer {
        let (ox, oz) = coord.origin();
        let mut buffer = VoxelBuffer::new();
        for lz in 0..CHUNK_SIZE {
            for lx in 0..CHUNK_SIZE {
                let wx = ox.wrapping_add(lx as i32);
                let wz = oz.wrapping_add(lz as i32);
                buffer.set(lx, 0, lz, block::BEDROCK);
                let span = self
                    .main_island(wx, wz)
                    .or_else(|| self.floating_island(wx, wz));
                if let Some(span) = span {
                    for y in span.bottom.max(1)..=span.top.min(CHUNK_HEIGHT as i32 - 1) {
                        buffer.set(lx, y as usize, lz, block::END_STONE);
                    }
                }
            }
        }
        self.place_pillars(&mut buffer, (ox, oz));
        buffer
    }

    fn place_pillars(&self, buffer: &mut VoxelBuffer, (ox, oz): (i32, i32)) {
        let size = CHUNK_SIZE as i32;
        let grid_span = |o: i32| {
            let lo = o.saturating_sub(PILLAR_RADIUS).div_euclid(PILLAR_GRID);
            let hi = o.saturating_add(size + PILLAR_RADIUS).div_euclid(PILLAR_GRID);
            lo..=hi
        };
        let gx_range = grid_span(ox);
        let gz_range = grid_span(oz);
        for gz in gz_range {
            for gx in gx_range.clone() {
                let Some(pillar) = self.pillar(gx, gz) else {
                    continue;
                };
                for dz in -PILLAR_RADIUS..=PILLAR_RADIUS {
                    for dx in -PILLAR_RADIUS..=PILLAR_RADIUS {
                        if dx * dx + dz * dz > PILLAR_RADIUS * PILLAR_RADIUS + 1 {
                            continue;
                        }
                        let lx = pillar.x + dx - ox;
                        let lz = pillar.z + dz - oz;
                        if !(0..size).contains(&lx) || !(0..size).contains(&lz) {
                            continue;
                        }
                        for y in pillar.base..=pillar.top {
                            buffer.set(lx as usize, y as usize, lz as usize, block::OBSIDIAN);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bedrock_floor() {
        let end = EndGenerator::new(42);
        for coord in [ChunkCoord::new(0, 0), ChunkCoord::new(40, -40)] {
            let buf = end.generate(coord);
            for lz in 0..CHUNK_SIZE {
                for lx in 0..CHUNK_SIZE {
                    assert_eq!(buf.block_id(lx, 0, lz), block::BEDROCK);
                }
            }
        }
    }

    #[test]
    fn test_main_island_at_origin() {
        let end = EndGenerator::new(42);
        let span = end.main_island(0, 0).expect("origin is on the main island");
        assert!(span.top >= 60, "{span:?}");
        let buf = end.generate(ChunkCoord::new(0, 0));
        assert!(
            buf.cells().iter().any(|&c| c == block::END_STONE),
            "origin chunk has end stone"
        );
    }

    #[test]
    fn test_no_main_island_far_out() {
        let end = EndGenerator::new(42);
        assert!(end.main_island(200, 0).is_none());
        assert!(end.main_island(0, -500).is_none());
    }

    #[test]
    fn test_void_between_island_and_belt() {
        let end = EndGenerator::new(42);
        for i in 0..64 {
            let angle = i as f64 / 64.0 * std::f64::consts::TAU;
            let r = 125.0;
            let (wx, wz) = ((r * angle.cos()) as i32, (r * angle.sin()) as i32);
            assert!(end.main_island(wx, wz).is_none());
            assert!(end.floating_island(wx, wz).is_none());
        }
    }

    #[test]
    fn test_pillars_stand_on_main_island() {
        let end = EndGenerator::new(42);
        let mut found = 0;
        for gz in -4..4 {
            for gx in -4..4 {
                if let Some(p) = end.pillar(gx, gz) {
                    found += 1;
                    assert!(end.main_island(p.x, p.z).is_some());
                    assert!(p.top >= p.base + 10);
                }
            }
        }
        assert!(found <= 64);
    }

    #[test]
    fn test_pillar_identical_across_chunks() {
        let end = EndGenerator::new(11);
        for gz in -3..3 {
            for gx in -3..3 {
                let Some(p) = end.pillar(gx, gz) else { continue };
                let coord = ChunkCoord::from_world(p.x, p.z);
                let buf = end.generate(coord);
                let (ox, oz) = coord.origin();
                let (lx, lz) = ((p.x - ox) as usize, (p.z - oz) as usize);
                assert_eq!(buf.block_id(lx, p.top as usize, lz), block::OBSIDIAN);
                assert_eq!(end.pillar(gx, gz), Some(p), "pillar choice is stable");
            }
        }
    }

    #[test]
    fn test_floating_islands_exist_far_out() {
        let end = EndGenerator::new(42);
        let mut found = false;
        'search: for x in (400..1600).step_by(8) {
            for z in (400..1600).step_by(8) {
                if end.floating_island(x, z).is_some() {
                    found = true;
                    break 'search;
                }
            }
        }
        assert!(found, "expected floating islands beyond the main island");
    }
}
