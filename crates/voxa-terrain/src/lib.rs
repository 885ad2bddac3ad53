//! Deterministic procedural chunk generation for the overworld, nether and
//! end: layered noise biomes, heights, caves, ores, flora, trees and
//! dimension structures.

mod cave;
mod context;
mod fbm;
mod flora;
mod heightmap;
mod ore;
mod trees;

pub mod biome;
pub mod end;
pub mod nether;
pub mod overworld;
pub mod seed;

pub use biome::{Biome, BiomeParams, BiomeSampler, Climate, FloraSet, TreeKind, classify};
pub use cave::{CaveCarver, CaveConfig};
pub use context::{GeneratorContext, generate};
pub use end::EndGenerator;
pub use flora::{FloraPlacement, FloraPlacer};
pub use heightmap::{HeightSampler, MAX_HEIGHT, MIN_HEIGHT};
pub use nether::{NETHER_LAVA_LEVEL, NETHER_ROOF, NetherGenerator};
pub use ore::{OreDistribution, OreDistributor, default_ore_distributions};
pub use overworld::{ColumnInfo, SEA_LEVEL, surface_block};
pub use trees::{TreeCandidate, TreePlacer};
