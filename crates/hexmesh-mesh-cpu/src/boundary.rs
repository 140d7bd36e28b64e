use std::collections::BTreeMap;

use hexmesh_geom::{Vec3, signed_area2_xy};
use hexmesh_hex::{Axial, CornerKey, HexDir, HexLayout, edge_corners};

use crate::face::Face;
use crate::regions::Region;

/// Closed ring of corner points; the last point connects back to the first.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryLoop {
    pub points: Vec<Vec3>,
}

impl BoundaryLoop {
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Twice the signed XY area; positive when counter-clockwise from above.
    #[inline]
    pub fn signed_area2(&self) -> f32 {
        signed_area2_xy(&self.points)
    }

    #[inline]
    pub fn reverse(&mut self) {
        self.points.reverse();
    }
}

#[derive(Clone, Debug, Default)]
pub struct TraceOutput {
    pub loops: Vec<BoundaryLoop>,
    /// Chains that did not close; their edges are discarded.
    pub broken: usize,
}

/// Layer whose height the corners of a horizontal face sit at.
#[inline]
pub fn corner_layer(face: Face, height: i32) -> i32 {
    match face {
        Face::Top => height + 1,
        _ => height,
    }
}

/// Directed boundary edges of a region, counter-clockwise around its cells.
pub fn boundary_edges(region: &Region<Axial>) -> BTreeMap<CornerKey, CornerKey> {
    let mut edges = BTreeMap::new();
    for &cell in &region.cells {
        for dir in HexDir::ALL {
            if region.contains(&cell.neighbor(dir)) {
                continue;
            }
            let (from, to) = edge_corners(cell, dir);
            edges.insert(from, to);
        }
    }
    edges
}

/// Traces the closed boundary loops of a horizontal region.
///
/// Outer boundaries come out counter-clockwise and holes clockwise (seen from above).
pub fn trace_region(region: &Region<Axial>, face: Face, height: i32, layout: &HexLayout) -> TraceOutput {
    let layer = corner_layer(face, height);
    let mut edges = boundary_edges(region);
    let mut out = TraceOutput::default();
    while let Some((start, mut next)) = edges.pop_first() {
        let mut keys = vec![start];
        let mut closed = false;
        loop {
            if next == start {
                closed = true;
                break;
            }
            keys.push(next);
            match edges.remove(&next) {
                Some(to) => next = to,
                None => break,
            }
        }
        if closed && keys.len() >= 3 {
            let points = keys.iter().map(|k| k.position(layout, layer)).collect();
            out.loops.push(BoundaryLoop { points });
        } else {
            log::debug!(
                target: "mesh",
                "open boundary chain dropped len={} face={:?} height={} seed=({}, {})",
                keys.len(),
                face,
                height,
                region.seed.q,
                region.seed.r
            );
            out.broken += 1;
        }
    }
    out
}

/// Vertical extent of a lateral run, in layers: the face spans `bottom..top`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SideRun {
    pub bottom: i32,
    pub top: i32,
}

/// Bounds of a contiguous height run; `None` if the region is empty or has gaps.
pub fn side_run_bounds(region: &Region<i32>) -> Option<SideRun> {
    let lo = region.cells.iter().copied().min()?;
    let hi = region.cells.iter().copied().max()?;
    let below_open = !region.contains(&(lo - 1));
    let above_open = !region.contains(&(hi + 1));
    if below_open && above_open && (hi - lo + 1) as usize == region.len() {
        Some(SideRun { bottom: lo, top: hi + 1 })
    } else {
        None
    }
}
