//! Biome assignment from temperature, moisture and continentalness.
//!
//! The three channels draw from one simplex field sampled at world positions
//! shifted by large distinct offsets, which decorrelates them without extra
//! permutation tables. Biomes are never stored; they are recomputed from the
//! world column whenever needed.

use noise::Simplex;
use voxa_voxel::block;

use crate::fbm::fbm2;
use crate::seed::{noise_seed, offset};

const CLIMATE_OCTAVES: u32 = 2;
const TEMPERATURE_FREQUENCY: f64 = 1.0 / 640.0;
const MOISTURE_FREQUENCY: f64 = 1.0 / 512.0;
const CONTINENTAL_FREQUENCY: f64 = 1.0 / 900.0;

const TEMPERATURE_OFFSET: (f64, f64) = (10_000.0, -10_000.0);
const MOISTURE_OFFSET: (f64, f64) = (-25_000.0, 31_000.0);
const CONTINENTAL_OFFSET: (f64, f64) = (47_000.0, 53_000.0);

/// Horizontal biome classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Biome {
    Ocean,
    Beach,
    Plains,
    Forest,
    Desert,
    Tundra,
    Mountains,
    Swamp,
}

/// Which small plants a biome grows on its surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloraSet {
    None,
    /// Tall grass, flowers and the occasional pumpkin.
    Meadow,
    /// Tall grass and sparse flowers.
    Woodland,
    /// Dense tall grass only.
    Marsh,
    /// Cacti on sand.
    Arid,
}

/// Tree shape stamped in a biome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeKind {
    Oak,
    Spruce,
}

/// Terrain shape and surface materials for a biome.
#[derive(Clone, Copy, Debug)]
pub struct BiomeParams {
    /// Height when both noise terms are zero.
    pub base_height: f64,
    /// Amplitude of the 5-octave continental term.
    pub continental_amplitude: f64,
    /// Amplitude of the 3-octave detail term.
    pub detail_amplitude: f64,
    pub surface: u16,
    /// Block used for the four layers under the surface.
    pub filler: u16,
    /// Tree density gate on the unit tree noise; `None` grows no trees.
    pub tree_threshold: Option<f64>,
    pub tree_kind: TreeKind,
    pub flora: FloraSet,
}

impl Biome {
    /// All biomes.
    pub const ALL: [Biome; 8] = [
        Biome::Ocean,
        Biome::Beach,
        Biome::Plains,
        Biome::Forest,
        Biome::Desert,
        Biome::Tundra,
        Biome::Mountains,
        Biome::Swamp,
    ];

    /// Returns the biome's shape and material row.
    pub fn params(self) -> &'static BiomeParams {
        match self {
            Biome::Ocean => &OCEAN,
            Biome::Beach => &BEACH,
            Biome::Plains => &PLAINS,
            Biome::Forest => &FOREST,
            Biome::Desert => &DESERT,
            Biome::Tundra => &TUNDRA,
            Biome::Mountains => &MOUNTAINS,
            Biome::Swamp => &SWAMP,
        }
    }

    /// Lower-case name for logs and debugging.
    pub fn name(self) -> &'static str {
        match self {
            Biome::Ocean => "ocean",
            Biome::Beach => "beach",
            Biome::Plains => "plains",
            Biome::Forest => "forest",
            Biome::Desert => "desert",
            Biome::Tundra => "tundra",
            Biome::Mountains => "mountains",
            Biome::Swamp => "swamp",
        }
    }
}

static OCEAN: BiomeParams = BiomeParams {
    base_height: 42.0,
    continental_amplitude: 12.0,
    detail_amplitude: 4.0,
    surface: block::SAND,
    filler: block::SAND,
    tree_threshold: None,
    tree_kind: TreeKind::Oak,
    flora: FloraSet::None,
};

static BEACH: BiomeParams = BiomeParams {
    base_height: 63.0,
    continental_amplitude: 3.0,
    detail_amplitude: 2.0,
    surface: block::SAND,
    filler: block::SAND,
    tree_threshold: None,
    tree_kind: TreeKind::Oak,
    flora: FloraSet::None,
};

static PLAINS: BiomeParams = BiomeParams {
    base_height: 68.0,
    continental_amplitude: 10.0,
    detail_amplitude: 4.0,
    surface: block::GRASS,
    filler: block::DIRT,
    tree_threshold: Some(0.82),
    tree_kind: TreeKind::Oak,
    flora: FloraSet::Meadow,
};

static FOREST: BiomeParams = BiomeParams {
    base_height: 70.0,
    continental_amplitude: 14.0,
    detail_amplitude: 5.0,
    surface: block::GRASS,
    filler: block::DIRT,
    tree_threshold: Some(0.55),
    tree_kind: TreeKind::Oak,
    flora: FloraSet::Woodland,
};

static DESERT: BiomeParams = BiomeParams {
    base_height: 66.0,
    continental_amplitude: 8.0,
    detail_amplitude: 3.0,
    surface: block::SAND,
    filler: block::SAND,
    tree_threshold: None,
    tree_kind: TreeKind::Oak,
    flora: FloraSet::Arid,
};

static TUNDRA: BiomeParams = BiomeParams {
    base_height: 70.0,
    continental_amplitude: 12.0,
    detail_amplitude: 4.0,
    surface: block::SNOW,
    filler: block::DIRT,
    tree_threshold: Some(0.7),
    tree_kind: TreeKind::Spruce,
    flora: FloraSet::None,
};

static MOUNTAINS: BiomeParams = BiomeParams {
    base_height: 92.0,
    continental_amplitude: 60.0,
    detail_amplitude: 12.0,
    surface: block::GRASS,
    filler: block::DIRT,
    tree_threshold: None,
    tree_kind: TreeKind::Spruce,
    flora: FloraSet::None,
};

static SWAMP: BiomeParams = BiomeParams {
    base_height: 62.0,
    continental_amplitude: 3.0,
    detail_amplitude: 2.0,
    surface: block::GRASS,
    filler: block::DIRT,
    tree_threshold: Some(0.75),
    tree_kind: TreeKind::Oak,
    flora: FloraSet::Marsh,
};

/// Raw climate channels at one world column, each in `[-1, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Climate {
    pub temperature: f64,
    pub moisture: f64,
    pub continentalness: f64,
}

/// Classifies climate channels into a biome.
///
/// Continentalness decides water and coast first, then temperature picks the
/// cold and hot extremes, and moisture splits the temperate band.
pub fn classify(climate: Climate) -> Biome {
    let Climate {
        temperature: t,
        moisture: m,
        continentalness: c,
    } = climate;
    if c < -0.35 {
        Biome::Ocean
    } else if c < -0.25 {
        Biome::Beach
    } else if t < -0.35 {
        Biome::Tundra
    } else if t > 0.35 && m < -0.1 {
        Biome::Desert
    } else if c > 0.45 {
        Biome::Mountains
    } else if m > 0.45 && t > 0.0 {
        Biome::Swamp
    } else if m > 0.2 {
        Biome::Forest
    } else {
        Biome::Plains
    }
}

/// Samples climate channels and biomes at world columns.
pub struct BiomeSampler {
    noise: Simplex,
}

impl BiomeSampler {
    /// Creates a sampler for the given world seed.
    pub fn new(seed: i32) -> Self {
        Self {
            noise: Simplex::new(noise_seed(seed, offset::BIOME)),
        }
    }

    /// Samples the three climate channels at a world column.
    pub fn climate(&self, wx: i32, wz: i32) -> Climate {
        let (x, z) = (wx as f64, wz as f64);
        let channel = |(ox, oz): (f64, f64), frequency: f64| {
            fbm2(&self.noise, x + ox, z + oz, CLIMATE_OCTAVES, frequency)
        };
        Climate {
            temperature: channel(TEMPERATURE_OFFSET, TEMPERATURE_FREQUENCY),
            moisture: channel(MOISTURE_OFFSET, MOISTURE_FREQUENCY),
            continentalness: channel(CONTINENTAL_OFFSET, CONTINENTAL_FREQUENCY),
        }
    }

    /// Returns the biome at a world column.
    pub fn biome_at(&self, wx: i32, wz: i32) -> Biome {
        classify(self.climate(wx, wz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn climate(t: f64, m: f64, c: f64) -> Climate {
        Climate {
            temperature: t,
            moisture: m,
            continentalness: c,
        }
    }

    #[test]
    fn test_classify_water_before_climate() {
        assert_eq!(classify(climate(0.9, -0.9, -0.8)), Biome::Ocean);
        assert_eq!(classify(climate(-0.9, 0.0, -0.3)), Biome::Beach);
    }

    #[test]
    fn test_classify_land_biomes() {
        assert_eq!(classify(climate(-0.5, 0.0, 0.0)), Biome::Tundra);
        assert_eq!(classify(climate(0.5, -0.3, 0.0)), Biome::Desert);
        assert_eq!(classify(climate(0.0, 0.0, 0.6)), Biome::Mountains);
        assert_eq!(classify(climate(0.2, 0.6, 0.0)), Biome::Swamp);
        assert_eq!(classify(climate(-0.2, 0.6, 0.0)), Biome::Forest);
        assert_eq!(classify(climate(0.0, 0.3, 0.0)), Biome::Forest);
        assert_eq!(classify(climate(0.0, 0.0, 0.0)), Biome::Plains);
    }

    #[test]
    fn test_biome_is_pure_function_of_world_column() {
        let a = BiomeSampler::new(42);
        let b = BiomeSampler::new(42);
        for i in -50..50 {
            let (wx, wz) = (i * 37, i * -53);
            assert_eq!(a.biome_at(wx, wz), b.biome_at(wx, wz));
            assert_eq!(a.climate(wx, wz), a.climate(wx, wz));
        }
    }

    #[test]
    fn test_channels_are_decorrelated() {
        let sampler = BiomeSampler::new(7);
        let mut identical = 0;
        for i in 0..200 {
            let c = sampler.climate(i * 97, i * 61);
            if c.temperature == c.moisture || c.moisture == c.continentalness {
                identical += 1;
            }
        }
        assert!(identical < 5, "channels should differ: {identical} identical samples");
    }

    #[test]
    fn test_many_biomes_appear_over_large_area() {
        let sampler = BiomeSampler::new(42);
        let mut seen = std::collections::HashSet::new();
        for x in 0..120 {
            for z in 0..120 {
                seen.insert(sampler.biome_at(x * 64, z * 64));
            }
        }
        assert!(seen.len() >= 4, "expected varied biomes, saw {seen:?}");
    }

    #[test]
    fn test_params_cover_every_biome() {
        for biome in Biome::ALL {
            let p = biome.params();
            assert!(p.base_height > 0.0, "{}", biome.name());
            assert!(p.surface != block::AIR);
        }
    }
}
