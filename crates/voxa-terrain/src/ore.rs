//! Ore distribution for underground stone.
//!
//! Each ore type owns a 3D noise field and a vertical range. Ores are checked
//! in priority order and the first match wins; a stone cell matching none
//! stays stone.

use noise::{NoiseFn, Simplex};
use voxa_voxel::block;

use crate::fbm::to_unit;
use crate::seed::{noise_seed, offset};

/// Configuration for one ore type.
#[derive(Clone, Debug)]
pub struct OreDistribution {
    /// Block placed when this ore matches.
    pub block: u16,
    /// Human-readable name for logging/debugging.
    pub name: &'static str,
    /// Lowest `y` (inclusive) where this ore can appear.
    pub min_y: i32,
    /// Highest `y` (inclusive) where this ore can appear.
    pub max_y: i32,
    /// Unit noise value above which a cell becomes ore. Higher is rarer.
    pub threshold: f64,
    /// Noise frequency; larger values give smaller veins.
    pub vein_scale: f64,
    /// Decorrelates this ore's field from the others.
    pub seed_offset: u32,
}

struct OreRuntime {
    config: OreDistribution,
    noise: Simplex,
}

/// Places ore veins in stone using per-ore noise fields.
pub struct OreDistributor {
    /// In priority order, highest first.
    ores: Vec<OreRuntime>,
}

impl OreDistributor {
    /// Create a distributor with the given world seed and ore configs.
    pub fn new(seed: i32, ore_configs: Vec<OreDistribution>) -> Self {
        let ores = ore_configs
            .into_iter()
            .map(|config| {
                let field = offset::ORE.wrapping_add(config.seed_offset);
                let noise = Simplex::new(noise_seed(seed, field));
                OreRuntime { config, noise }
            })
            .collect();
        Self { ores }
    }

    /// Returns the ore block (if any) that replaces stone at `(wx, y, wz)`.
    pub fn sample_ore(&self, wx: i32, y: i32, wz: i32) -> Option<u16> {
        for ore in &self.ores {
            let cfg = &ore.config;
            if y < cfg.min_y || y > cfg.max_y {
                continue;
            }
            let v = ore.noise.get([
                wx as f64 * cfg.vein_scale,
                y as f64 * cfg.vein_scale,
                wz as f64 * cfg.vein_scale,
            ]);
            if to_unit(v) > cfg.threshold {
                return Some(cfg.block);
            }
        }
        None
    }

    /// Number of configured ore types.
    pub fn ore_count(&self) -> usize {
        self.ores.len()
    }
}

/// The standard ore table in priority order:
/// diamond, emerald, gold, redstone, lapis, iron, coal.
pub fn default_ore_distributions() -> Vec<OreDistribution> {
    vec![
        OreDistribution {
            block: block::DIAMOND_ORE,
            name: "diamond",
            min_y: 1,
            max_y: 16,
            threshold: 0.87,
            vein_scale: 0.2,
            seed_offset: 0x01,
        },
        OreDistribution {
            block: block::EMERALD_ORE,
            name: "emerald",
            min_y: 4,
            max_y: 32,
            threshold: 0.90,
            vein_scale: 0.22,
            seed_offset: 0x02,
        },
        OreDistribution {
            block: block::GOLD_ORE,
            name: "gold",
            min_y: 1,
            max_y: 32,
            threshold: 0.86,
            vein_scale: 0.18,
            seed_offset: 0x03,
        },
        OreDistribution {
            block: block::REDSTONE_ORE,
            name: "redstone",
            min_y: 1,
            max_y: 16,
            threshold: 0.84,
            vein_scale: 0.16,
            seed_offset: 0x04,
        },
        OreDistribution {
            block: block::LAPIS_ORE,
            name: "lapis",
            min_y: 1,
            max_y: 30,
            threshold: 0.86,
            vein_scale: 0.18,
            seed_offset: 0x05,
        },
        OreDistribution {
            block: block::IRON_ORE,
            name: "iron",
            min_y: 1,
            max_y: 64,
            threshold: 0.80,
            vein_scale: 0.12,
            seed_offset: 0x06,
        },
        OreDistribution {
            block: block::COAL_ORE,
            name: "coal",
            min_y: 1,
            max_y: 128,
            threshold: 0.78,
            vein_scale: 0.1,
            seed_offset: 0x07,
        },
    ]
}
