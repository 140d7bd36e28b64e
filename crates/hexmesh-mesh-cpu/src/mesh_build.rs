use hexmesh_geom::{Aabb, Vec3};

use crate::constants::{INDICES_PER_QUAD, VERTS_PER_QUAD};

/// Flat vertex/index arrays for one chunk: 3 floats per position and normal, 2 per UV,
/// 3 indices per triangle.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MeshBuffers {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub idx: Vec<u32>,
}

impl MeshBuffers {
    /// Clears all arrays but retains capacity for reuse.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.norm.clear();
        self.uv.clear();
        self.idx.clear();
    }

    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.pos.reserve(n_quads * VERTS_PER_QUAD * 3);
        self.norm.reserve(n_quads * VERTS_PER_QUAD * 3);
        self.uv.reserve(n_quads * VERTS_PER_QUAD * 2);
        self.idx.reserve(n_quads * INDICES_PER_QUAD);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    #[inline]
    fn push_vertex(&mut self, p: Vec3, n: Vec3, uv: (f32, f32)) {
        self.pos.extend_from_slice(&[p.x, p.y, p.z]);
        self.norm.extend_from_slice(&[n.x, n.y, n.z]);
        self.uv.extend_from_slice(&[uv.0, uv.1]);
    }

    /// Appends a quad `a b c d` (perimeter order) as two triangles.
    /// The order is flipped when it disagrees with `n`.
    pub fn add_quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3, n: Vec3, mut uvs: [(f32, f32); 4]) {
        let base = self.vertex_count() as u32;
        let mut vs = [a, b, c, d];
        let cross = (vs[1] - vs[0]).cross(vs[2] - vs[0]);
        if cross.dot(n) < 0.0 {
            vs.swap(1, 3);
            uvs.swap(1, 3);
        }
        for i in 0..4 {
            self.push_vertex(vs[i], n, uvs[i]);
        }
        self.idx
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Appends a triangulated polygon. `tris` index into `points`; UVs come from `uv_of`.
    pub fn add_polygon(
        &mut self,
        points: &[Vec3],
        tris: &[[u32; 3]],
        n: Vec3,
        uv_of: impl Fn(Vec3) -> (f32, f32),
    ) {
        let base = self.vertex_count() as u32;
        for &p in points {
            self.push_vertex(p, n, uv_of(p));
        }
        self.idx.reserve(tris.len() * 3);
        for t in tris {
            self.idx
                .extend_from_slice(&[base + t[0], base + t[1], base + t[2]]);
        }
    }

    #[inline]
    pub fn position(&self, i: u32) -> Vec3 {
        let o = i as usize * 3;
        Vec3::new(self.pos[o], self.pos[o + 1], self.pos[o + 2])
    }

    #[inline]
    pub fn normal(&self, i: u32) -> Vec3 {
        let o = i as usize * 3;
        Vec3::new(self.norm[o], self.norm[o + 1], self.norm[o + 2])
    }

    /// Iterates triangles as corner positions.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.idx
            .chunks_exact(3)
            .map(|t| [self.position(t[0]), self.position(t[1]), self.position(t[2])])
    }

    /// Sum of triangle areas.
    pub fn surface_area(&self) -> f64 {
        let mut total = 0.0f64;
        for [a, b, c] in self.triangles() {
            let ab = b - a;
            let ac = c - a;
            let cx = f64::from(ab.y) * f64::from(ac.z) - f64::from(ab.z) * f64::from(ac.y);
            let cy = f64::from(ab.z) * f64::from(ac.x) - f64::from(ab.x) * f64::from(ac.z);
            let cz = f64::from(ab.x) * f64::from(ac.y) - f64::from(ab.y) * f64::from(ac.x);
            total += 0.5 * (cx * cx + cy * cy + cz * cz).sqrt();
        }
        total
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.pos.chunks_exact(3).map(|p| Vec3::new(p[0], p[1], p[2])))
    }

    /// Returns a slice of interleaved vertex positions (x,y,z per vertex).
    pub fn positions(&self) -> &[f32] {
        &self.pos
    }
    /// Returns a slice of interleaved vertex normals (x,y,z per vertex).
    pub fn normals(&self) -> &[f32] {
        &self.norm
    }
    pub fn uvs(&self) -> &[f32] {
        &self.uv
    }
    pub fn indices(&self) -> &[u32] {
        &self.idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_is_flipped_to_match_normal() {
        let mut mb = MeshBuffers::default();
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(1.0, 1.0, 0.0);
        let d = Vec3::new(0.0, 1.0, 0.0);
        let uvs = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        mb.add_quad(a, b, c, d, Vec3::DOWN, uvs);
        for [p, q, r] in mb.triangles() {
            assert!((q - p).cross(r - p).z < 0.0);
        }
        assert_eq!(mb.triangle_count(), 2);
        assert_eq!(mb.vertex_count(), 4);
        assert!((mb.surface_area() - 1.0).abs() < 1e-9);
        // uv follows its vertex through the swap
        assert_eq!(&mb.uv[2..4], &[0.0, 1.0]);
    }

    #[test]
    fn polygon_indices_are_offset() {
        let mut mb = MeshBuffers::default();
        let tri = [Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)];
        mb.add_polygon(&tri, &[[0, 1, 2]], Vec3::UP, |p| (p.x, p.y));
        mb.add_polygon(&tri, &[[0, 1, 2]], Vec3::UP, |p| (p.x, p.y));
        assert_eq!(mb.indices(), &[0, 1, 2, 3, 4, 5]);
        let bb = mb.bounds();
        assert_eq!(bb.max, Vec3::new(1.0, 1.0, 0.0));
        mb.clear_keep_capacity();
        assert!(mb.is_empty());
        assert!(mb.pos.capacity() >= 18);
    }
}
