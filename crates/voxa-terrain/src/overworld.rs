//! Overworld chunk generation.
//!
//! Per column: biome, height, layered fill with bedrock, surface, filler,
//! desert sandstone, stone and ores; caves carve into the fill and flood with
//! lava near the bottom; water fills up to sea level. Plants and trees are
//! placed afterwards. Every decision is a pure function of the world position
//! so chunks can be generated in any order.

use voxa_voxel::{CHUNK_SIZE, ChunkCoord, LAYER_AREA, VoxelBuffer, block};

use crate::GeneratorContext;
use crate::biome::Biome;
use crate::seed::{cell_unit, salt};

/// Water surface height.
pub const SEA_LEVEL: i32 = 62;
/// Highest `y` of the randomised bedrock layer above the solid floor.
pub const BEDROCK_LAYER_TOP: i32 = 4;
/// Number of filler blocks under the surface.
pub const FILLER_DEPTH: i32 = 4;
/// Thickness of the desert sandstone band under the filler.
pub const SANDSTONE_DEPTH: i32 = 3;
/// Mountain columns at or above this height get a snow cap.
pub const SNOW_LINE: i32 = 120;

/// Biome, height and surface block of one world column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnInfo {
    pub biome: Biome,
    pub height: i32,
    pub surface: u16,
}

/// Surface block for a biome at a given column height.
///
/// Grass and snow are replaced by dirt under water, and mountains get snow
/// above the snow line.
pub fn surface_block(biome: Biome, height: i32) -> u16 {
    let surface = biome.params().surface;
    if biome == Biome::Mountains && height >= SNOW_LINE {
        return block::SNOW;
    }
    if height < SEA_LEVEL && (surface == block::GRASS || surface == block::SNOW) {
        return block::DIRT;
    }
    surface
}

/// Generates the overworld chunk at `coord`.
pub fn generate(ctx: &GeneratorContext, coord: ChunkCoord) -> VoxelBuffer {
    let (ox, oz) = coord.origin();
    let mut buffer = VoxelBuffer::new();
    let mut columns = Vec::with_capacity(LAYER_AREA);

    for lz in 0..CHUNK_SIZE {
        for lx in 0..CHUNK_SIZE {
            let wx = ox.wrapping_add(lx as i32);
            let wz = oz.wrapping_add(lz as i32);
            let col = ctx.column(wx, wz);
            fill_column(ctx, &mut buffer, (lx, lz), (wx, wz), &col);
            columns.push(col);
        }
    }

    place_flora(ctx, &mut buffer, (ox, oz), &columns);

    let trees = ctx.trees.candidates((ox, oz), &columns);
    for tree in &trees {
        ctx.trees.stamp(&mut buffer, tree);
    }
    buffer
}

fn fill_column(
    ctx: &GeneratorContext,
    buffer: &mut VoxelBuffer,
    (lx, lz): (usize, usize),
    (wx, wz): (i32, i32),
    col: &ColumnInfo,
) {
    let seed = ctx.seed();
    let h = col.height;
    let filler = col.biome.params().filler;
    let desert = col.biome == Biome::Desert;

    for y in 0..=h {
        let mut id = if y == 0 {
            block::BEDROCK
        } else if y == h {
            col.surface
        } else if y <= BEDROCK_LAYER_TOP && is_bedrock_layer(seed, wx, y, wz) {
            block::BEDROCK
        } else if y >= h - FILLER_DEPTH {
            filler
        } else if desert && y >= h - FILLER_DEPTH - SANDSTONE_DEPTH {
            block::SANDSTONE
        } else {
            block::STONE
        };

        if id != block::BEDROCK && ctx.caves.is_cave(wx, y, wz, h, SEA_LEVEL) {
            id = if ctx.caves.is_lava(y) {
                block::LAVA
            } else {
                block::AIR
            };
        } else if id == block::STONE {
            if let Some(ore) = ctx.ores.sample_ore(wx, y, wz) {
                id = ore;
            }
        }
        buffer.set(lx, y as usize, lz, id);
    }

    for y in (h + 1)..=SEA_LEVEL {
        if buffer.is_empty_at(lx, y as usize, lz) {
            let id = if y == SEA_LEVEL && col.biome == Biome::Tundra {
                block::ICE
            } else {
                block::WATER
            };
            buffer.set(lx, y as usize, lz, id);
        }
    }
}

/// Bedrock probability falls off linearly from the floor.
fn is_bedrock_layer(seed: i32, wx: i32, y: i32, wz: i32) -> bool {
    let chance = (BEDROCK_LAYER_TOP + 1 - y) as f64 / (BEDROCK_LAYER_TOP + 1) as f64;
    cell_unit(seed, wx, y, wz, salt::BEDROCK) < chance
}

fn place_flora(ctx: &GeneratorContext, buffer: &mut VoxelBuffer, (ox, oz): (i32, i32), columns: &[ColumnInfo]) {
    for lz in 0..CHUNK_SIZE {
        for lx in 0..CHUNK_SIZE {
            let col = &columns[lz * CHUNK_SIZE + lx];
            if col.height < SEA_LEVEL {
                continue;
            }
            let wx = ox.wrapping_add(lx as i32);
            let wz = oz.wrapping_add(lz as i32);
            let set = col.biome.params().flora;
            let Some(plant) = ctx.flora.flora_at(set, wx, col.height, wz, col.surface) else {
                continue;
            };
            let base = col.height as usize + 1;
            for y in base..base + plant.height as usize {
                if y >= voxa_voxel::CHUNK_HEIGHT || !buffer.is_empty_at(lx, y, lz) {
                    break;
                }
                buffer.set(lx, y, lz, plant.block);
            }
        }
    }
}
