//! Seeded generator state.
//!
//! A [`GeneratorContext`] owns every noise field for one world seed. It is
//! built once (per worker, or once for synchronous generation) and then only
//! read, so several independent worlds can coexist in one process.

use voxa_voxel::{ChunkCoord, Dimension, VoxelBuffer};

use crate::biome::{Biome, BiomeSampler};
use crate::cave::{CaveCarver, CaveConfig};
use crate::end::EndGenerator;
use crate::flora::FloraPlacer;
use crate::heightmap::HeightSampler;
use crate::nether::NetherGenerator;
use crate::ore::{OreDistributor, default_ore_distributions};
use crate::overworld::{self, ColumnInfo};
use crate::trees::TreePlacer;

/// All seeded noise for one world.
pub struct GeneratorContext {
    seed: i32,
    pub(crate) biomes: BiomeSampler,
    pub(crate) heights: HeightSampler,
    pub(crate) caves: CaveCarver,
    pub(crate) ores: OreDistributor,
    pub(crate) flora: FloraPlacer,
    pub(crate) trees: TreePlacer,
    pub(crate) nether: NetherGenerator,
    pub(crate) end: EndGenerator,
}

impl GeneratorContext {
    /// Seeds every noise field from the world seed.
    pub fn new(seed: i32) -> Self {
        tracing::debug!(seed, "seeding generator context");
        Self {
            seed,
            biomes: BiomeSampler::new(seed),
            heights: HeightSampler::new(seed),
            caves: CaveCarver::new(seed, CaveConfig::default()),
            ores: OreDistributor::new(seed, default_ore_distributions()),
            flora: FloraPlacer::new(seed),
            trees: TreePlacer::new(seed),
            nether: NetherGenerator::new(seed),
            end: EndGenerator::new(seed),
        }
    }

    /// The world seed this context was built from.
    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Overworld biome at a world column.
    pub fn biome_at(&self, wx: i32, wz: i32) -> Biome {
        self.biomes.biome_at(wx, wz)
    }

    /// Overworld surface height at a world column.
    pub fn height_at(&self, wx: i32, wz: i32) -> i32 {
        let biome = self.biome_at(wx, wz);
        self.heights.height(wx, wz, biome.params())
    }

    /// Surface block for a biome at a given height.
    pub fn surface_block(&self, biome: Biome, height: i32) -> u16 {
        overworld::surface_block(biome, height)
    }

    /// Biome, height and surface block of a world column.
    pub fn column(&self, wx: i32, wz: i32) -> ColumnInfo {
        let biome = self.biome_at(wx, wz);
        let height = self.heights.height(wx, wz, biome.params());
        ColumnInfo {
            biome,
            height,
            surface: overworld::surface_block(biome, height),
        }
    }

    /// Generates one chunk. Pure: the same inputs always yield an identical
    /// buffer.
    pub fn generate(&self, coord: ChunkCoord, dimension: Dimension) -> VoxelBuffer {
        match dimension {
            Dimension::Overworld => overworld::generate(self, coord),
            Dimension::Nether => self.nether.generate(coord),
            Dimension::End => self.end.generate(coord),
        }
    }

    pub fn nether(&self) -> &NetherGenerator {
        &self.nether
    }

    pub fn end(&self) -> &EndGenerator {
        &self.end
    }
}

impl std::fmt::Debug for GeneratorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorContext")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

/// Generates one chunk with the given context.
pub fn generate(ctx: &GeneratorContext, coord: ChunkCoord, dimension: Dimension) -> VoxelBuffer {
    ctx.generate(coord, dimension)
}
