use hexmesh_hex::{Axial, HexDir, HexLayout, edge_corners};

use crate::boundary::SideRun;
use crate::constants::TOP_UV_CELL_DIAMETERS;
use crate::face::Face;
use crate::mesh_build::MeshBuffers;
use crate::triangulate::Triangulation;

/// Emits a triangulated top or bottom polygon with world-anchored UVs.
pub(crate) fn emit_polygon(mb: &mut MeshBuffers, layout: &HexLayout, face: Face, tri: &Triangulation) {
    let inv = 1.0 / (TOP_UV_CELL_DIAMETERS * layout.radius);
    mb.add_polygon(&tri.points, &tri.tris, face.normal(), |p| (p.x * inv, p.y * inv));
}

/// Emits one side quad covering a vertical run of a column's edge facing `dir`.
///
/// Corners come from the same corner keys as the horizontal loops, so shared edges match
/// exactly. U runs across the edge, V is height in layers.
pub(crate) fn emit_side_run(mb: &mut MeshBuffers, layout: &HexLayout, cell: Axial, dir: HexDir, run: SideRun) {
    let (start, end) = edge_corners(cell, dir);
    let a = start.position(layout, run.bottom);
    let b = end.position(layout, run.bottom);
    let c = end.position(layout, run.top);
    let d = start.position(layout, run.top);
    let (v0, v1) = (run.bottom as f32, run.top as f32);
    let uvs = [(0.0, v0), (1.0, v0), (1.0, v1), (0.0, v1)];
    mb.add_quad(a, b, c, d, dir.normal(), uvs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_quad_faces_outward() {
        let layout = HexLayout::default();
        for dir in HexDir::ALL {
            let mut mb = MeshBuffers::default();
            emit_side_run(&mut mb, &layout, Axial::new(1, 1), dir, SideRun { bottom: 0, top: 3 });
            assert_eq!(mb.triangle_count(), 2);
            let n = dir.normal();
            for [a, b, c] in mb.triangles() {
                assert!((b - a).cross(c - a).dot(n) > 0.0, "{dir:?}");
            }
            let expect = f64::from(layout.radius * layout.height * 3.0);
            assert!((mb.surface_area() - expect).abs() < 1e-2 * expect);
        }
    }
}
