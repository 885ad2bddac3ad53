//! Chunk meshing: face culling, ambient occlusion, liquid surfaces, LOD,
//! atlas UV lookup and geometry buffer pooling.

pub mod ambient_occlusion;
pub mod atlas;
pub mod face_direction;
pub mod geometry;
pub mod invalidation;
pub mod mesher;
pub mod neighborhood;
pub mod pool;

pub use ambient_occlusion::{ao_brightness, compute_face_ao, should_flip_ao_diagonal, vertex_ao};
pub use atlas::{AtlasError, AtlasTable, UvRect};
pub use face_direction::FaceDirection;
pub use geometry::{ChunkGeometry, GeometryArrays, QuadVertices};
pub use invalidation::{ChunkMeshState, MeshInvalidator};
pub use mesher::{LIQUID_SURFACE_HEIGHT, Lod, mesh_chunk, mesh_chunk_into};
pub use neighborhood::PaddedChunk;
pub use pool::{GeometryPool, PoolStats};
