//! Small surface plants: tall grass, flowers, pumpkins and cacti.
//!
//! A secondary noise field decides where patches grow and coordinate parity
//! thins them out so flowers and pumpkins do not carpet a whole patch.
//! Every plant occupies only its own column.

use noise::{NoiseFn, Simplex};
use voxa_voxel::block;

use crate::biome::FloraSet;
use crate::seed::{cell_unit, hash_cell, noise_seed, offset, salt};

const FLORA_FREQUENCY: f64 = 1.0 / 24.0;

/// A plant stack to place directly above the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloraPlacement {
    pub block: u16,
    /// Stack height in cells (cacti grow up to three).
    pub height: u8,
}

/// Chooses surface plants per column.
pub struct FloraPlacer {
    noise: Simplex,
    seed: i32,
}

impl FloraPlacer {
    pub fn new(seed: i32) -> Self {
        Self {
            noise: Simplex::new(noise_seed(seed, offset::FLORA)),
            seed,
        }
    }

    /// Returns the plant (if any) growing on a column's `surface` block at
    /// height `y`.
    pub fn flora_at(&self, set: FloraSet, wx: i32, y: i32, wz: i32, surface: u16) -> Option<FloraPlacement> {
        if set == FloraSet::None {
            return None;
        }
        let patch = self
            .noise
            .get([wx as f64 * FLORA_FREQUENCY, wz as f64 * FLORA_FREQUENCY]);
        let roll = cell_unit(self.seed, wx, y, wz, salt::FLORA);
        let even = wx.wrapping_add(wz).rem_euclid(2) == 0;
        let single = |id| Some(FloraPlacement { block: id, height: 1 });

        match set {
            FloraSet::None => None,
            FloraSet::Arid => {
                if surface != block::SAND {
                    return None;
                }
                let sparse = wx.rem_euclid(4) == 0 && wz.rem_euclid(4) == 0;
                if patch > 0.3 && sparse && roll < 0.35 {
                    let height = 1 + (hash_cell(self.seed, wx, y, wz, salt::CACTUS) % 3) as u8;
                    Some(FloraPlacement {
                        block: block::CACTUS,
                        height,
                    })
                } else {
                    None
                }
            }
            _ if surface != block::GRASS => None,
            FloraSet::Meadow => {
                if patch < -0.6 && wx.rem_euclid(7) == 0 && wz.rem_euclid(5) == 0 {
                    single(block::PUMPKIN)
                } else if patch > 0.45 && even && roll < 0.25 {
                    single(self.flower_kind(wx, y, wz))
                } else if roll < 0.12 {
                    single(block::TALL_GRASS)
                } else {
                    None
                }
            }
            FloraSet::Woodland => {
                if patch > 0.6 && even && roll < 0.2 {
                    single(self.flower_kind(wx, y, wz))
                } else if roll < 0.08 {
                    single(block::TALL_GRASS)
                } else {
                    None
                }
            }
            FloraSet::Marsh => {
                if roll < 0.15 {
                    single(block::TALL_GRASS)
                } else {
                    None
                }
            }
        }
    }

    fn flower_kind(&self, wx: i32, y: i32, wz: i32) -> u16 {
        if hash_cell(self.seed, wx, y, wz, salt::FLOWER_KIND) & 1 == 0 {
            block::RED_FLOWER
        } else {
            block::YELLOW_FLOWER
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flora_without_set() {
        let placer = FloraPlacer::new(42);
        for i in 0..500 {
            assert!(placer.flora_at(FloraSet::None, i, 70, i, block::GRASS).is_none());
        }
    }

    #[test]
    fn test_meadow_requires_grass() {
        let placer = FloraPlacer::new(42);
        for i in 0..500 {
            assert!(placer.flora_at(FloraSet::Meadow, i, 70, -i, block::SAND).is_none());
        }
    }

    #[test]
    fn test_meadow_grows_something() {
        let placer = FloraPlacer::new(42);
        let count = (0..64)
            .flat_map(|x| (0..64).map(move |z| (x, z)))
            .filter(|&(x, z)| placer.flora_at(FloraSet::Meadow, x, 70, z, block::GRASS).is_some())
            .count();
        assert!(count > 0);
        assert!(count < 64 * 64 / 2, "flora too dense: {count}");
    }

    #[test]
    fn test_cacti_on_sand_with_bounded_height() {
        let placer = FloraPlacer::new(42);
        for x in 0..128 {
            for z in 0..128 {
                if let Some(p) = placer.flora_at(FloraSet::Arid, x, 66, z, block::SAND) {
                    assert_eq!(p.block, block::CACTUS);
                    assert!((1..=3).contains(&p.height));
                    assert_eq!(x % 4, 0);
                    assert_eq!(z % 4, 0);
                }
                assert!(placer.flora_at(FloraSet::Arid, x, 66, z, block::GRASS).is_none());
            }
        }
    }

    #[test]
    fn test_flowers_respect_parity() {
        let placer = FloraPlacer::new(3);
        for x in 0..128 {
            for z in 0..128 {
                if let Some(p) = placer.flora_at(FloraSet::Woodland, x, 70, z, block::GRASS) {
                    if p.block == block::RED_FLOWER || p.block == block::YELLOW_FLOWER {
                        assert_eq!((x + z) % 2, 0);
                    }
                }
            }
        }
    }
}
