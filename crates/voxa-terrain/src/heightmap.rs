//! Column surface height.
//!
//! Height is a biome-specific affine combination of a broad 5-octave
//! continental fBm and a 3-octave detail fBm, clamped to the buildable range.

use noise::Simplex;

use crate::biome::BiomeParams;
use crate::fbm::fbm2;
use crate::seed::{noise_seed, offset};

/// Lowest surface height a column can have.
pub const MIN_HEIGHT: i32 = 1;
/// Highest surface height a column can have.
pub const MAX_HEIGHT: i32 = 200;

const CONTINENTAL_OCTAVES: u32 = 5;
const CONTINENTAL_FREQUENCY: f64 = 1.0 / 256.0;
const DETAIL_OCTAVES: u32 = 3;
const DETAIL_FREQUENCY: f64 = 1.0 / 48.0;

/// Samples surface heights from two independent noise fields.
pub struct HeightSampler {
    continental: Simplex,
    detail: Simplex,
}

impl HeightSampler {
    /// Create a new sampler for the given world seed.
    pub fn new(seed: i32) -> Self {
        Self {
            continental: Simplex::new(noise_seed(seed, offset::CONTINENTAL)),
            detail: Simplex::new(noise_seed(seed, offset::DETAIL)),
        }
    }

    /// Raw continental and detail terms at a world column.
    pub fn terms(&self, wx: i32, wz: i32) -> (f64, f64) {
        let (x, z) = (wx as f64, wz as f64);
        (
            fbm2(&self.continental, x, z, CONTINENTAL_OCTAVES, CONTINENTAL_FREQUENCY),
            fbm2(&self.detail, x, z, DETAIL_OCTAVES, DETAIL_FREQUENCY),
        )
    }

    /// Surface height of a world column under the given biome parameters.
    pub fn height(&self, wx: i32, wz: i32, params: &BiomeParams) -> i32 {
        let (continental, detail) = self.terms(wx, wz);
        let h = params.base_height
            + params.continental_amplitude * continental
            + params.detail_amplitude * detail;
        (libm::floor(h) as i32).clamp(MIN_HEIGHT, MAX_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::Biome;

    #[test]
    fn test_heights_clamped_for_every_biome() {
        let sampler = HeightSampler::new(42);
        for biome in Biome::ALL {
            for i in -200..200 {
                let h = sampler.height(i * 13, i * 7, biome.params());
                assert!(
                    (MIN_HEIGHT..=MAX_HEIGHT).contains(&h),
                    "{} height {h} out of range",
                    biome.name()
                );
            }
        }
    }

    #[test]
    fn test_same_seed_same_height() {
        let a = HeightSampler::new(5);
        let b = HeightSampler::new(5);
        let params = Biome::Plains.params();
        for i in 0..300 {
            assert_eq!(a.height(i, -i, params), b.height(i, -i, params));
        }
    }

    #[test]
    fn test_mountains_reach_higher_than_plains() {
        let sampler = HeightSampler::new(42);
        let max = |biome: Biome| {
            (0..400)
                .map(|i| sampler.height(i * 11, i * 17, biome.params()))
                .max()
                .unwrap_or(0)
        };
        assert!(max(Biome::Mountains) > max(Biome::Plains));
    }

    #[test]
    fn test_height_varies_across_columns() {
        let sampler = HeightSampler::new(42);
        let params = Biome::Forest.params();
        let first = sampler.height(0, 0, params);
        let varies = (1..500).any(|i| sampler.height(i * 3, 0, params) != first);
        assert!(varies, "terrain should not be flat");
    }
}
