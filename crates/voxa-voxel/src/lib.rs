//! Voxel chunk buffers, chunk coordinates, the block descriptor table and
//! the authoritative chunk table.

pub mod block;
pub mod buffer;
pub mod coords;
pub mod table;
pub mod version;

pub use block::{
    BlockDescriptor, LiquidKind, MISSING, Opacity, SignalRender, Sway, ToolRequirement,
    descriptor,
};
pub use buffer::{
    CHUNK_HEIGHT, CHUNK_SIZE, CHUNK_VOLUME, LAYER_AREA, VoxelBuffer, cell_aux, cell_id,
    decode_index, index, pack_cell,
};
pub use coords::{ChunkCoord, Dimension, Side, split_world};
pub use table::ChunkTable;
pub use version::ChunkVersions;
