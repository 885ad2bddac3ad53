//! 3D noise cave carving.
//!
//! Two kinds of voids are carved: "worm" tunnels where two independent noise
//! fields both exceed a threshold, and large "cheese" caverns from a lower
//! frequency field confined to a mid-depth band. Carving never touches the
//! bottom bedrock layers, the surface crust or anything above the cave ceiling.

use glam::DVec3;
use noise::{NoiseFn, Simplex};

use crate::fbm::fbm3;
use crate::seed::{noise_seed, offset};

/// Configuration for cave carving.
#[derive(Clone, Debug)]
pub struct CaveConfig {
    /// Both worm fields must exceed this value.
    pub worm_threshold: f64,
    /// Horizontal frequency of the worm fields.
    pub worm_frequency: f64,
    /// Vertical frequency of the worm fields; higher than horizontal so
    /// tunnels stay flat.
    pub worm_vertical_frequency: f64,
    /// Cheese field threshold.
    pub cheese_threshold: f64,
    pub cheese_frequency: f64,
    /// Lowest carvable `y`. Everything below stays solid.
    pub min_y: i32,
    /// Highest carvable `y`.
    pub max_y: i32,
    pub cheese_min_y: i32,
    pub cheese_max_y: i32,
    /// Cells within this many blocks below the surface are never carved.
    pub surface_crust: i32,
    /// Extra crust under water so oceans do not drain into caves.
    pub ocean_floor_buffer: i32,
    /// Carved cells at or below this `y` fill with lava.
    pub lava_level: i32,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            worm_threshold: 0.45,
            worm_frequency: 1.0 / 40.0,
            worm_vertical_frequency: 1.0 / 24.0,
            cheese_threshold: 0.6,
            cheese_frequency: 1.0 / 64.0,
            min_y: 2,
            max_y: 100,
            cheese_min_y: 16,
            cheese_max_y: 56,
            surface_crust: 4,
            ocean_floor_buffer: 8,
            lava_level: 10,
        }
    }
}

/// Decides which subsurface cells become cave voids.
pub struct CaveCarver {
    worm_a: Simplex,
    worm_b: Simplex,
    cheese: Simplex,
    config: CaveConfig,
}

impl CaveCarver {
    /// Create a carver for the given world seed.
    pub fn new(seed: i32, config: CaveConfig) -> Self {
        Self {
            worm_a: Simplex::new(noise_seed(seed, offset::WORM_A)),
            worm_b: Simplex::new(noise_seed(seed, offset::WORM_B)),
            cheese: Simplex::new(noise_seed(seed, offset::CHEESE)),
            config,
        }
    }

    /// Returns the cave configuration.
    pub fn config(&self) -> &CaveConfig {
        &self.config
    }

    /// Returns `true` if the cell at `(wx, y, wz)` should be carved.
    ///
    /// `surface_height` is the column's surface and `sea_level` the water
    /// line used for the ocean floor buffer.
    pub fn is_cave(&self, wx: i32, y: i32, wz: i32, surface_height: i32, sea_level: i32) -> bool {
        let cfg = &self.config;
        if y < cfg.min_y || y > cfg.max_y {
            return false;
        }
        let mut crust = cfg.surface_crust;
        if surface_height < sea_level {
            crust += cfg.ocean_floor_buffer;
        }
        if y > surface_height - crust {
            return false;
        }

        let (x, yf, z) = (wx as f64, y as f64, wz as f64);
        let a = self.worm_a.get([
            x * cfg.worm_frequency,
            yf * cfg.worm_vertical_frequency,
            z * cfg.worm_frequency,
        ]);
        if a > cfg.worm_threshold {
            let b = self.worm_b.get([
                x * cfg.worm_frequency,
                yf * cfg.worm_vertical_frequency,
                z * cfg.worm_frequency,
            ]);
            if b > cfg.worm_threshold {
                return true;
            }
        }

        if (cfg.cheese_min_y..=cfg.cheese_max_y).contains(&y) {
            let c = fbm3(&self.cheese, DVec3::new(x, yf, z), 2, cfg.cheese_frequency);
            if c > cfg.cheese_threshold {
                return true;
            }
        }
        false
    }

    /// Returns `true` if a carved cell at `y` fills with lava.
    pub fn is_lava(&self, y: i32) -> bool {
        y <= self.config.lava_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEA: i32 = 62;

    fn carver() -> CaveCarver {
        CaveCarver::new(42, CaveConfig::default())
    }

    #[test]
    fn test_never_carves_outside_band() {
        let c = carver();
        for i in 0..2000 {
            let (wx, wz) = (i * 3, i * 5);
            assert!(!c.is_cave(wx, 0, wz, 150, SEA));
            assert!(!c.is_cave(wx, 1, wz, 150, SEA));
            assert!(!c.is_cave(wx, 101, wz, 150, SEA));
            assert!(!c.is_cave(wx, 140, wz, 150, SEA));
        }
    }

    #[test]
    fn test_surface_crust_is_kept() {
        let c = carver();
        for i in 0..2000 {
            let h = 70;
            for y in (h - 3)..=h {
                assert!(!c.is_cave(i, y, -i, h, SEA), "crust carved at y={y}");
            }
        }
    }

    #[test]
    fn test_ocean_floor_buffer() {
        let c = carver();
        let h = 40;
        for i in 0..2000 {
            for y in (h - 11)..=h {
                assert!(!c.is_cave(i * 2, y, i, h, SEA), "ocean floor carved at y={y}");
            }
        }
    }

    #[test]
    fn test_some_caves_exist() {
        let c = carver();
        let mut carved = 0;
        for x in 0..64 {
            for z in 0..64 {
                for y in (2..60).step_by(3) {
                    if c.is_cave(x, y, z, 90, SEA) {
                        carved += 1;
                    }
                }
            }
        }
        assert!(carved > 0, "expected some carved cells");
    }

    #[test]
    fn test_deterministic() {
        let a = carver();
        let b = carver();
        for i in 0..1000 {
            assert_eq!(
                a.is_cave(i, 30 + i % 40, -i, 90, SEA),
                b.is_cave(i, 30 + i % 40, -i, 90, SEA)
            );
        }
    }

    #[test]
    fn test_lava_level() {
        let c = carver();
        assert!(c.is_lava(10));
        assert!(c.is_lava(3));
        assert!(!c.is_lava(11));
    }
}
