//! Per-vertex ambient occlusion for voxel faces.
//!
//! Each face vertex samples the three cells diagonally in front of it
//! (two edge-adjacent, one corner) and maps the occluder count to a level
//! from 0 (fully lit) to 3 (fully shadowed). The level is converted into a
//! brightness multiplier and clamped per block type.

use voxa_voxel::{cell_id, descriptor};

use crate::face_direction::FaceDirection;
use crate::neighborhood::PaddedChunk;

/// Brightness multiplier for AO levels 0–3.
pub const AO_CURVE: [f32; 4] = [1.0, 0.8, 0.62, 0.45];

/// `(u, v)` sign of each face corner, in quad vertex order
/// `(u0,v0) → (u1,v0) → (u1,v1) → (u0,v1)`.
pub const CORNER_SIGNS: [(i32, i32); 4] = [(-1, -1), (1, -1), (1, 1), (-1, 1)];

/// Compute the AO value for a single vertex.
///
/// When both edge-adjacent cells are solid the corner is fully occluded
/// regardless of the diagonal cell.
pub fn vertex_ao(side1: bool, side2: bool, corner: bool) -> u8 {
    if side1 && side2 {
        3
    } else {
        side1 as u8 + side2 as u8 + corner as u8
    }
}

/// Returns `true` if the quad should be split along the 1–3 diagonal instead
/// of the default 0–2 diagonal.
pub fn should_flip_ao_diagonal(ao: [u8; 4]) -> bool {
    ao[0] as u16 + ao[2] as u16 > ao[1] as u16 + ao[3] as u16
}

/// Maps an AO level to a brightness multiplier, never darker than `floor`.
pub fn ao_brightness(level: u8, floor: f32) -> f32 {
    AO_CURVE[level.min(3) as usize].max(floor)
}

/// Compute the 4 AO levels for the face of cell `(x, y, z)` pointing along
/// `direction`.
pub fn compute_face_ao(padded: &PaddedChunk, (x, y, z): (i32, i32, i32), direction: FaceDirection) -> [u8; 4] {
    let (_, u_axis, v_axis) = direction.sweep_axes();
    let d = direction.delta();
    let front = [x + d[0], y + d[1], z + d[2]];
    let occludes = |du: i32, dv: i32| {
        let mut p = front;
        p[u_axis] += du;
        p[v_axis] += dv;
        descriptor(cell_id(padded.get(p[0], p[1], p[2]))).is_opaque()
    };

    let mut ao = [0u8; 4];
    for (i, &(su, sv)) in CORNER_SIGNS.iter().enumerate() {
        ao[i] = vertex_ao(occludes(su, 0), occludes(0, sv), occludes(su, sv));
    }
    ao
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxa_voxel::{VoxelBuffer, block};

    #[test]
    fn test_exposed_vertex_has_ao_zero() {
        assert_eq!(vertex_ao(false, false, false), 0);
    }

    #[test]
    fn test_both_sides_solid_gives_ao_three_regardless_of_corner() {
        assert_eq!(vertex_ao(true, true, false), 3);
        assert_eq!(vertex_ao(true, true, true), 3);
    }

    #[test]
    fn test_one_side_and_corner_ao_two() {
        assert_eq!(vertex_ao(true, false, true), 2);
        assert_eq!(vertex_ao(false, true, true), 2);
    }

    #[test]
    fn test_ao_values_are_symmetric() {
        for s1 in [false, true] {
            for s2 in [false, true] {
                for c in [false, true] {
                    assert_eq!(
                        vertex_ao(s1, s2, c),
                        vertex_ao(s2, s1, c),
                        "AO not symmetric for side1={s1}, side2={s2}, corner={c}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_uniform_ao_no_flip() {
        assert!(!should_flip_ao_diagonal([0, 0, 0, 0]));
        assert!(!should_flip_ao_diagonal([2, 2, 2, 2]));
    }

    #[test]
    fn test_anisotropic_ao_triggers_flip() {
        assert!(should_flip_ao_diagonal([3, 0, 3, 0]));
        assert!(!should_flip_ao_diagonal([0, 3, 0, 3]));
    }

    #[test]
    fn test_brightness_curve_and_floor() {
        assert_eq!(ao_brightness(0, 0.0), 1.0);
        assert_eq!(ao_brightness(3, 0.0), 0.45);
        assert_eq!(ao_brightness(3, 0.55), 0.55);
        assert_eq!(ao_brightness(1, 0.55), 0.8);
        for level in 0..3 {
            assert!(ao_brightness(level, 0.0) > ao_brightness(level + 1, 0.0));
        }
    }

    #[test]
    fn test_face_ao_all_air_is_zero() {
        let mut chunk = VoxelBuffer::new();
        chunk.set(5, 5, 5, block::STONE);
        let padded = PaddedChunk::from_center_only(&chunk);
        for face in FaceDirection::ALL {
            assert_eq!(compute_face_ao(&padded, (5, 5, 5), face), [0, 0, 0, 0], "{face:?}");
        }
    }

    #[test]
    fn test_face_ao_wall_edge_higher_than_open() {
        let mut chunk = VoxelBuffer::new();
        chunk.set(5, 0, 5, block::STONE);
        chunk.set(5, 1, 6, block::STONE);
        let padded = PaddedChunk::from_center_only(&chunk);
        let ao = compute_face_ao(&padded, (5, 0, 5), FaceDirection::PosY);
        let max_ao = ao.iter().copied().max().unwrap_or(0);
        let min_ao = ao.iter().copied().min().unwrap_or(0);
        assert!(max_ao > min_ao, "wall-adjacent vertices should be darker, got {ao:?}");
    }

    #[test]
    fn test_face_ao_surrounded_corner() {
        let mut chunk = VoxelBuffer::new();
        chunk.set(5, 5, 5, block::STONE);
        // PosY: u = Z, v = X. Vertex 0 sits at (-u, -v) = (z-1, x-1).
        chunk.set(5, 6, 4, block::STONE);
        chunk.set(4, 6, 5, block::STONE);
        chunk.set(4, 6, 4, block::STONE);
        let padded = PaddedChunk::from_center_only(&chunk);
        let ao = compute_face_ao(&padded, (5, 5, 5), FaceDirection::PosY);
        assert_eq!(ao[0], 3, "vertex 0 should be fully occluded, got {ao:?}");
        assert_eq!(ao[2], 0, "opposite vertex stays lit, got {ao:?}");
    }

    #[test]
    fn test_transparent_neighbors_do_not_occlude() {
        let mut chunk = VoxelBuffer::new();
        chunk.set(5, 5, 5, block::STONE);
        chunk.set(5, 6, 4, block::GLASS);
        chunk.set(4, 6, 5, block::WATER);
        chunk.set(4, 6, 4, block::LEAVES);
        let padded = PaddedChunk::from_center_only(&chunk);
        assert_eq!(compute_face_ao(&padded, (5, 5, 5), FaceDirection::PosY), [0, 0, 0, 0]);
    }
}
