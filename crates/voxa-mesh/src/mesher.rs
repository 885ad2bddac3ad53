//! Face-culling chunk mesher.
//!
//! Emits one quad per visible cell face into either the solid or the liquid
//! geometry set. Faces against opaque neighbours are culled, as are faces
//! between identical blocks, except where a taller liquid cell exposes a step
//! over a lower one. Ambient occlusion and decorative geometry depend on the
//! requested [`Lod`].
//!
//! Meshing is pure: the same buffers, neighbours, LOD and atlas always
//! produce identical geometry, and the input buffers are never modified.

use voxa_voxel::{
    BlockDescriptor, CHUNK_SIZE, LiquidKind, SignalRender, Sway, VoxelBuffer, cell_aux, cell_id,
    descriptor,
};

use crate::ambient_occlusion::{CORNER_SIGNS, ao_brightness, compute_face_ao, should_flip_ao_diagonal};
use crate::atlas::AtlasTable;
use crate::face_direction::FaceDirection;
use crate::geometry::{ChunkGeometry, QuadVertices};
use crate::neighborhood::PaddedChunk;

/// Top surface height of a liquid cell that has no liquid of its kind above it.
pub const LIQUID_SURFACE_HEIGHT: f32 = 0.875;

/// Mesh detail tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Lod {
    /// Ambient occlusion and all decorative geometry.
    Full = 0,
    /// No ambient occlusion.
    Reduced = 1,
    /// No ambient occlusion and no decorative plants.
    Far = 2,
}

impl Lod {
    pub const ALL: [Lod; 3] = [Lod::Full, Lod::Reduced, Lod::Far];

    /// Numeric level 0–2.
    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::Full),
            1 => Some(Self::Reduced),
            2 => Some(Self::Far),
            _ => None,
        }
    }

    /// Picks a tier from a chunk distance and the two distance thresholds.
    pub fn for_distance(distance: u32, reduced_from: u32, far_from: u32) -> Self {
        if distance >= far_from {
            Self::Far
        } else if distance >= reduced_from {
            Self::Reduced
        } else {
            Self::Full
        }
    }

    fn computes_ao(self) -> bool {
        self == Self::Full
    }

    fn keeps_decorative(self) -> bool {
        self != Self::Far
    }
}

/// Meshes a chunk into freshly allocated geometry.
///
/// `neighbors` follows the north, south, east, west order; `None` borders
/// are treated as air so their faces stay visible until the neighbour
/// arrives and the chunk is re-meshed.
pub fn mesh_chunk(
    center: &VoxelBuffer,
    neighbors: &[Option<&VoxelBuffer>; 4],
    lod: Lod,
    atlas: &AtlasTable,
) -> ChunkGeometry {
    let mut out = ChunkGeometry::new();
    mesh_chunk_into(center, neighbors, lod, atlas, &mut out);
    out
}

/// Meshes a chunk into caller-owned geometry, clearing it first.
pub fn mesh_chunk_into(
    center: &VoxelBuffer,
    neighbors: &[Option<&VoxelBuffer>; 4],
    lod: Lod,
    atlas: &AtlasTable,
    out: &mut ChunkGeometry,
) {
    out.clear();
    let Some(top) = center.highest_occupied_y() else {
        return;
    };
    let padded = PaddedChunk::build(center, neighbors);
    let mesher = Mesher { padded: &padded, atlas, lod };

    for y in 0..=top {
        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                let raw = center.get(x, y, z);
                if cell_id(raw) == 0 {
                    continue;
                }
                let desc = descriptor(raw);
                let dropped = !lod.keeps_decorative() && desc.dropped_at_far(cell_aux(raw));
                if desc.is_invisible() || dropped {
                    continue;
                }
                let cell = Cell {
                    pos: [x as i32, y as i32, z as i32],
                    raw,
                    desc,
                };
                for face in FaceDirection::ALL {
                    mesher.emit_face(&cell, face, out);
                }
            }
        }
    }
}

struct Cell {
    pos: [i32; 3],
    raw: u16,
    desc: &'static BlockDescriptor,
}

struct Mesher<'a> {
    padded: &'a PaddedChunk,
    atlas: &'a AtlasTable,
    lod: Lod,
}

impl Mesher<'_> {
    /// Top surface height of a liquid cell, 1.0 when covered by the same liquid.
    fn liquid_height(&self, [x, y, z]: [i32; 3], kind: LiquidKind) -> f32 {
        let above = descriptor(self.padded.get(x, y + 1, z));
        if above.liquid == Some(kind) {
            1.0
        } else {
            LIQUID_SURFACE_HEIGHT
        }
    }

    fn emit_face(&self, cell: &Cell, face: FaceDirection, out: &mut ChunkGeometry) {
        let [x, y, z] = cell.pos;
        let (nx, ny, nz) = face.offset(x, y, z);
        let neighbor_raw = self.padded.get(nx, ny, nz);
        let neighbor = descriptor(neighbor_raw);
        if neighbor.is_opaque() {
            return;
        }

        let own_top = match cell.desc.liquid {
            Some(kind) => self.liquid_height(cell.pos, kind),
            None => 1.0,
        };
        let mut bottom = 0.0;
        if cell_id(neighbor_raw) == cell_id(cell.raw) {
            let Some(kind) = cell.desc.liquid else {
                return;
            };
            if !face.is_horizontal() {
                return;
            }
            let neighbor_top = self.liquid_height([nx, ny, nz], kind);
            if own_top <= neighbor_top {
                return;
            }
            bottom = neighbor_top;
        }

        let is_liquid = cell.desc.is_liquid();
        let (signal, lit) = signal_brightness(cell.desc, cell_aux(cell.raw));
        let use_ao = self.lod.computes_ao() && !is_liquid && !lit;
        let ao = if use_ao {
            compute_face_ao(self.padded, (x, y, z), face)
        } else {
            [0; 4]
        };
        let flip = use_ao && should_flip_ao_diagonal(ao);

        let (layer_axis, u_axis, v_axis) = face.sweep_axes();
        let layer = if face == FaceDirection::PosY {
            y as f32 + own_top
        } else if face.is_positive() {
            cell.pos[layer_axis] as f32 + 1.0
        } else {
            cell.pos[layer_axis] as f32
        };
        // Along Y the extent is the visible span of the face, elsewhere a full cell.
        let span = |axis: usize, positive: bool| {
            let base = cell.pos[axis] as f32;
            match (axis, positive) {
                (1, true) => base + own_top,
                (1, false) => base + bottom,
                (_, true) => base + 1.0,
                (_, false) => base,
            }
        };

        let uv_rect = self.atlas.lookup(cell.raw, face);
        let shade = if lit { 1.0 } else { face.shade() };
        let tint = cell.desc.tint;
        let lowered_top = is_liquid && face == FaceDirection::PosY && own_top < 1.0;

        let mut quad = QuadVertices {
            positions: [[0.0; 3]; 4],
            normal: face.normal(),
            uvs: [[0.0; 2]; 4],
            colors: [[0.0; 3]; 4],
            flora_sway: [0.0; 4],
            liquid_sway: if lowered_top { 1.0 } else { 0.0 },
        };
        for (i, &(su, sv)) in CORNER_SIGNS.iter().enumerate() {
            let mut p = [0.0f32; 3];
            p[layer_axis] = layer;
            p[u_axis] = span(u_axis, su > 0);
            p[v_axis] = span(v_axis, sv > 0);
            quad.positions[i] = p;

            let local = [p[0] - x as f32, p[1] - y as f32, p[2] - z as f32];
            let (s, t) = match face {
                FaceDirection::PosX | FaceDirection::NegX => (local[2], 1.0 - local[1]),
                FaceDirection::PosZ | FaceDirection::NegZ => (local[0], 1.0 - local[1]),
                FaceDirection::PosY | FaceDirection::NegY => (local[0], local[2]),
            };
            quad.uvs[i] = uv_rect.map(s, t);

            let light = if use_ao {
                ao_brightness(ao[i], cell.desc.ao_floor)
            } else {
                1.0
            };
            let k = shade * light * signal;
            quad.colors[i] = [tint[0] * k, tint[1] * k, tint[2] * k];

            quad.flora_sway[i] = match cell.desc.sway {
                Sway::None => 0.0,
                Sway::Rooted => local[1],
                Sway::Canopy => 0.5,
            };
        }

        let target = if is_liquid { &mut out.liquid } else { &mut out.solid };
        target.push_quad(&quad, face.is_positive(), flip);
    }
}

/// Brightness multiplier from the auxiliary power field, and whether the
/// block renders fully lit (ignoring AO and directional shading).
fn signal_brightness(desc: &BlockDescriptor, aux: u8) -> (f32, bool) {
    let power = aux.min(15) as f32 / 15.0;
    match desc.signal {
        SignalRender::None => (1.0, desc.emission > 0),
        SignalRender::Wire => (0.3 + 0.7 * power, false),
        SignalRender::Lamp if aux > 0 => (1.0, true),
        SignalRender::Lamp => (0.55, false),
        SignalRender::Emitter => (0.7 + 0.3 * power, true),
    }
}
