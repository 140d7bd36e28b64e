use hexmesh_geom::Vec3;

use crate::coord::{Axial, HexDir};
use crate::layout::HexLayout;

/// Identity of a hexagon corner: the three cells that meet there, sorted.
///
/// Every cell sharing the corner produces the same key, so adjacent cells agree on it
/// without any floating-point comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CornerKey([Axial; 3]);

impl CornerKey {
    pub fn new(a: Axial, b: Axial, c: Axial) -> Self {
        let mut cells = [a, b, c];
        cells.sort_unstable();
        Self(cells)
    }

    #[inline]
    pub fn cells(&self) -> [Axial; 3] {
        self.0
    }

    /// World position at the given layer height.
    ///
    /// The average of the three cell centres is computed in key order, so every caller
    /// gets the same bits for the same key.
    pub fn position(&self, layout: &HexLayout, layer_height: i32) -> Vec3 {
        let r = f64::from(layout.radius);
        let (mut x, mut y) = (0.0f64, 0.0f64);
        for c in self.0 {
            let q = f64::from(c.q);
            x += r * 1.5 * q;
            y += r * (crate::layout::SQRT_3 * f64::from(c.r) + crate::layout::SQRT_3 / 2.0 * q);
        }
        Vec3::new(
            (x / 3.0) as f32,
            (y / 3.0) as f32,
            (f64::from(layout.height) * f64::from(layer_height)) as f32,
        )
    }
}

/// Counter-clockwise start and end corners of the edge of `cell` facing `dir`.
#[inline]
pub fn edge_corners(cell: Axial, dir: HexDir) -> (CornerKey, CornerKey) {
    let across = cell.neighbor(dir);
    let start = CornerKey::new(cell, across, cell.neighbor(dir.prev()));
    let end = CornerKey::new(cell, across, cell.neighbor(dir.next()));
    (start, end)
}

impl HexLayout {
    /// Corner of `cell` at `60·i` degrees from +X, lifted to `layer`.
    pub fn corner(&self, cell: Axial, i: usize, layer: i32) -> Vec3 {
        let (_, end) = edge_corners(cell, HexDir::from_index(i));
        end.position(self, layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_key_is_order_independent() {
        let a = Axial::new(0, 0);
        let b = Axial::new(1, 0);
        let c = Axial::new(0, 1);
        assert_eq!(CornerKey::new(a, b, c), CornerKey::new(c, a, b));
        assert_eq!(CornerKey::new(a, b, c), CornerKey::new(b, c, a));
    }

    #[test]
    fn edges_chain_around_cell() {
        let cell = Axial::new(3, -2);
        for d in HexDir::ALL {
            let (_, end) = edge_corners(cell, d);
            let (start_next, _) = edge_corners(cell, d.next());
            assert_eq!(end, start_next);
        }
    }

    #[test]
    fn corner_sits_at_radius_and_expected_angle() {
        let layout = HexLayout::new(50.0, 100.0);
        let cell = Axial::new(0, 0);
        for d in HexDir::ALL {
            let (start, end) = edge_corners(cell, d);
            for (key, deg) in [(start, 60.0 * d.index() as f32 - 60.0), (end, 60.0 * d.index() as f32)] {
                let p = key.position(&layout, 2);
                let a = deg.to_radians();
                assert!((p.x - 50.0 * a.cos()).abs() < 1e-3, "{d:?} {p:?}");
                assert!((p.y - 50.0 * a.sin()).abs() < 1e-3, "{d:?} {p:?}");
                assert_eq!(p.z, 200.0);
            }
        }
    }

    #[test]
    fn shared_edge_has_identical_corners_from_both_sides() {
        let layout = HexLayout::default();
        let a = Axial::new(2, 5);
        for d in HexDir::ALL {
            let b = a.neighbor(d);
            let (s, e) = edge_corners(a, d);
            let (s2, e2) = edge_corners(b, d.opposite());
            assert_eq!(s, e2);
            assert_eq!(e, s2);
            assert_eq!(s.position(&layout, 0), e2.position(&layout, 0));
        }
    }

    #[test]
    fn layout_corner_matches_edge_end() {
        let layout = HexLayout::default();
        let cell = Axial::new(-4, 1);
        let c = layout.center(cell, 0);
        for i in 0..6 {
            let p = layout.corner(cell, i, 0);
            assert!(((p - c).length() - layout.radius).abs() < 1e-3);
        }
    }
}
