//! Flat, GPU-ready geometry arrays produced by the mesher.
//!
//! Every attribute lives in its own tightly packed `Vec` so the rendering
//! side can upload each one directly via the `bytemuck` byte views.

/// Per-vertex attribute arrays plus a triangle index list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryArrays {
    /// Chunk-local vertex positions.
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// Normalized atlas coordinates.
    pub uvs: Vec<[f32; 2]>,
    /// Linear vertex colour (tint × shading × AO × signal brightness).
    pub colors: Vec<[f32; 3]>,
    /// Foliage displacement weight, 0 for static geometry.
    pub flora_sway: Vec<f32>,
    /// Surface wave weight, nonzero only on lowered liquid tops.
    pub liquid_sway: Vec<f32>,
    /// Triangle list, three indices per triangle.
    pub indices: Vec<u32>,
}

static_assertions::assert_eq_size!([f32; 3], [u8; 12]);

impl GeometryArrays {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of indices.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of emitted quads (two triangles each).
    pub fn face_count(&self) -> usize {
        self.indices.len() / 6
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Empties every array while keeping the allocations.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.colors.clear();
        self.flora_sway.clear();
        self.liquid_sway.clear();
        self.indices.clear();
    }

    /// Total reserved capacity in bytes across all arrays.
    pub fn capacity_bytes(&self) -> usize {
        self.positions.capacity() * 12
            + self.normals.capacity() * 12
            + self.uvs.capacity() * 8
            + self.colors.capacity() * 12
            + self.flora_sway.capacity() * 4
            + self.liquid_sway.capacity() * 4
            + self.indices.capacity() * 4
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Appends one quad. `corners` are in `(u0,v0) → (u1,v0) → (u1,v1) →
    /// (u0,v1)` order; `positive` selects the winding for a face whose normal
    /// points along a positive axis, and `flip` splits along the 1–3
    /// diagonal instead of 0–2.
    pub fn push_quad(&mut self, quad: &QuadVertices, positive: bool, flip: bool) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&quad.positions);
        self.normals.extend_from_slice(&[quad.normal; 4]);
        self.uvs.extend_from_slice(&quad.uvs);
        self.colors.extend_from_slice(&quad.colors);
        self.flora_sway.extend_from_slice(&quad.flora_sway);
        self.liquid_sway.extend_from_slice(&[quad.liquid_sway; 4]);

        let tris: [u32; 6] = match (positive, flip) {
            (true, false) => [0, 1, 2, 0, 2, 3],
            (false, false) => [0, 2, 1, 0, 3, 2],
            (true, true) => [0, 1, 3, 1, 2, 3],
            (false, true) => [0, 3, 1, 1, 3, 2],
        };
        self.indices.extend(tris.iter().map(|i| base + i));
    }
}

/// The four vertices of one quad before they are appended to an array set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadVertices {
    pub positions: [[f32; 3]; 4],
    pub normal: [f32; 3],
    pub uvs: [[f32; 2]; 4],
    pub colors: [[f32; 3]; 4],
    pub flora_sway: [f32; 4],
    pub liquid_sway: f32,
}

/// Mesher output: opaque/cutout geometry and liquid geometry kept apart so
/// they can be drawn in separate passes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkGeometry {
    pub solid: GeometryArrays,
    pub liquid: GeometryArrays,
}

impl ChunkGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when neither set holds any geometry.
    pub fn is_empty(&self) -> bool {
        self.solid.is_empty() && self.liquid.is_empty()
    }

    pub fn clear(&mut self) {
        self.solid.clear();
        self.liquid.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.solid.vertex_count() + self.liquid.vertex_count()
    }

    pub fn capacity_bytes(&self) -> usize {
        self.solid.capacity_bytes() + self.liquid.capacity_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> QuadVertices {
        QuadVertices {
            positions: [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            normal: [0.0, 0.0, 1.0],
            uvs: [[0.0, 0.0]; 4],
            colors: [[1.0; 3]; 4],
            flora_sway: [0.0; 4],
            liquid_sway: 0.0,
        }
    }

    fn triangle_normal(g: &GeometryArrays, tri: usize) -> [f32; 3] {
        let p = |k: usize| g.positions[g.indices[tri * 3 + k] as usize];
        let (a, b, c) = (p(0), p(1), p(2));
        let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        [
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ]
    }

    #[test]
    fn test_empty_geometry() {
        let g = ChunkGeometry::new();
        assert!(g.is_empty());
        assert_eq!(g.vertex_count(), 0);
        assert_eq!(g.solid.face_count(), 0);
    }

    #[test]
    fn test_push_quad_counts_and_offsets() {
        let mut g = GeometryArrays::new();
        g.push_quad(&unit_quad(), true, false);
        g.push_quad(&unit_quad(), true, true);
        assert_eq!(g.vertex_count(), 8);
        assert_eq!(g.index_count(), 12);
        assert_eq!(g.face_count(), 2);
        assert!(g.indices[6..].iter().all(|&i| (4..8).contains(&i)));
        assert_eq!(g.flora_sway.len(), 8);
        assert_eq!(g.liquid_sway.len(), 8);
    }

    #[test]
    fn test_winding_follows_orientation_for_every_split() {
        for flip in [false, true] {
            let mut pos = GeometryArrays::new();
            pos.push_quad(&unit_quad(), true, flip);
            let mut neg = GeometryArrays::new();
            neg.push_quad(&unit_quad(), false, flip);
            for tri in 0..2 {
                assert!(triangle_normal(&pos, tri)[2] > 0.0, "flip={flip}");
                assert!(triangle_normal(&neg, tri)[2] < 0.0, "flip={flip}");
            }
        }
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut g = GeometryArrays::new();
        for _ in 0..32 {
            g.push_quad(&unit_quad(), true, false);
        }
        let cap = g.capacity_bytes();
        g.clear();
        assert!(g.is_empty());
        assert_eq!(g.capacity_bytes(), cap);
    }

    #[test]
    fn test_byte_views() {
        let mut g = GeometryArrays::new();
        g.push_quad(&unit_quad(), true, false);
        assert_eq!(g.position_bytes().len(), 4 * 12);
        assert_eq!(g.uv_bytes().len(), 4 * 8);
        assert_eq!(g.index_bytes().len(), 6 * 4);
        assert_eq!(g.normal_bytes().len(), g.color_bytes().len());
    }
}
