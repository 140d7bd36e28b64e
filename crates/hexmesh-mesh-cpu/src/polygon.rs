//! Outer/hole classification and hole bridging for horizontal boundary loops.
//!
//! Loops are handled in the XY plane. Outer loops are made counter-clockwise and holes
//! clockwise, then each hole is spliced into its outer loop along a bridge segment:
//! `outer[..=i]`, the whole hole starting and ending at `hole[j]`, then `outer[i..]`.
//! The result is one weakly simple loop per outer boundary.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use hexmesh_geom::{Vec3, point_in_polygon_xy};

use crate::boundary::BoundaryLoop;
use crate::constants::REL_EPS;

/// How non-largest loops of one region are classified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolePolicy {
    /// The largest loop is the outer boundary and every other loop is a hole.
    LargestArea,
    /// A loop is a hole only if it lies inside an outer loop; otherwise it is an outer
    /// boundary of its own.
    #[default]
    Containment,
}

/// One outer loop with its holes bridged in.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub points: Vec<Vec3>,
    pub holes: usize,
}

#[derive(Clone, Debug, Default)]
pub struct ResolveOutput {
    pub polygons: Vec<Polygon>,
    pub holes_bridged: usize,
    /// Zero-area loops and holes with no valid bridge.
    pub dropped: usize,
}

struct Classified {
    outer: Vec<Vec3>,
    holes: Vec<Vec<Vec3>>,
}

pub fn resolve_polygons(loops: Vec<BoundaryLoop>, policy: HolePolicy) -> ResolveOutput {
    let mut out = ResolveOutput::default();
    let mut items: Vec<(Vec<Vec3>, f32)> = Vec::with_capacity(loops.len());
    for l in loops {
        let area = l.signed_area2();
        if l.len() < 3 || area == 0.0 || !area.is_finite() {
            log::debug!(target: "mesh", "zero-area loop dropped len={}", l.len());
            out.dropped += 1;
            continue;
        }
        items.push((l.points, area));
    }
    if items.is_empty() {
        return out;
    }

    let groups = match policy {
        HolePolicy::LargestArea => classify_largest(items),
        HolePolicy::Containment => classify_containment(items),
    };
    for g in groups {
        let (points, bridged, dropped) = bridge_holes(g.outer, g.holes);
        out.holes_bridged += bridged;
        out.dropped += dropped;
        out.polygons.push(Polygon {
            points,
            holes: bridged,
        });
    }
    out
}

fn oriented(mut points: Vec<Vec3>, area: f32, ccw: bool) -> Vec<Vec3> {
    if (area > 0.0) != ccw {
        points.reverse();
    }
    points
}

fn classify_largest(mut items: Vec<(Vec<Vec3>, f32)>) -> Vec<Classified> {
    let mut best = 0;
    for (i, (_, a)) in items.iter().enumerate() {
        if a.abs() > items[best].1.abs() {
            best = i;
        }
    }
    let (outer, area) = items.remove(best);
    let holes = items
        .into_iter()
        .map(|(p, a)| oriented(p, a, false))
        .collect();
    vec![Classified {
        outer: oriented(outer, area, true),
        holes,
    }]
}

fn classify_containment(mut items: Vec<(Vec<Vec3>, f32)>) -> Vec<Classified> {
    // Containers are always larger than what they contain.
    items.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    let mut groups: Vec<Classified> = Vec::new();
    // (loop, is_hole, owning group)
    let mut placed: Vec<(Vec<Vec3>, bool, usize)> = Vec::new();
    for (points, area) in items {
        let probe = points[0];
        let container = placed
            .iter()
            .rposition(|(ring, _, _)| point_in_polygon_xy(probe, ring));
        match container {
            Some(k) if !placed[k].1 => {
                let g = placed[k].2;
                let hole = oriented(points, area, false);
                placed.push((hole.clone(), true, g));
                groups[g].holes.push(hole);
            }
            _ => {
                if !groups.is_empty() {
                    log::debug!(
                        target: "mesh",
                        "separate outer boundary len={} area2={:.1}",
                        points.len(),
                        area.abs()
                    );
                }
                let outer = oriented(points, area, true);
                placed.push((outer.clone(), false, groups.len()));
                groups.push(Classified {
                    outer,
                    holes: Vec::new(),
                });
            }
        }
    }
    groups
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct P2 {
    x: f64,
    y: f64,
}

impl P2 {
    #[inline]
    fn of(p: Vec3) -> Self {
        Self {
            x: f64::from(p.x),
            y: f64::from(p.y),
        }
    }
}

#[inline]
fn orient(a: P2, b: P2, c: P2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

#[inline]
fn dist2(a: P2, b: P2) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

fn properly_crosses(a: P2, b: P2, c: P2, d: P2) -> bool {
    let d1 = orient(a, b, c);
    let d2 = orient(a, b, d);
    let d3 = orient(c, d, a);
    let d4 = orient(c, d, b);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

/// `v` lies on the open segment `a..b`.
fn on_open_segment(a: P2, b: P2, v: P2, eps: f64) -> bool {
    if v == a || v == b || orient(a, b, v).abs() > eps {
        return false;
    }
    let t = (v.x - a.x) * (b.x - a.x) + (v.y - a.y) * (b.y - a.y);
    t > 0.0 && t < dist2(a, b)
}

/// `t` lies strictly inside the interior wedge at `ring[i]` of a counter-clockwise ring.
fn in_cone(ring: &[P2], i: usize, t: P2) -> bool {
    let n = ring.len();
    let prev = ring[(i + n - 1) % n];
    let cur = ring[i];
    let next = ring[(i + 1) % n];
    let left_of_in = orient(prev, cur, t) > 0.0;
    let left_of_out = orient(cur, next, t) > 0.0;
    if orient(prev, cur, next) > 0.0 {
        left_of_in && left_of_out
    } else {
        left_of_in || left_of_out
    }
}

fn segment_is_clear(a: P2, b: P2, ring: &[P2], eps: f64) -> bool {
    let n = ring.len();
    for k in 0..n {
        let c = ring[k];
        let d = ring[(k + 1) % n];
        if properly_crosses(a, b, c, d) || on_open_segment(a, b, c, eps) {
            return false;
        }
    }
    true
}

fn find_bridge(outer: &[P2], hole: &[P2], pending: &[Vec<P2>], eps: f64) -> Option<(usize, usize)> {
    let mut pairs: Vec<(f64, usize, usize)> = Vec::with_capacity(outer.len() * hole.len());
    for (i, &o) in outer.iter().enumerate() {
        for (j, &h) in hole.iter().enumerate() {
            pairs.push((dist2(o, h), i, j));
        }
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));
    pairs.into_iter().find_map(|(_, i, j)| {
        let (o, h) = (outer[i], hole[j]);
        let clear = in_cone(outer, i, h)
            && segment_is_clear(o, h, outer, eps)
            && segment_is_clear(o, h, hole, eps)
            && pending.iter().all(|p| segment_is_clear(o, h, p, eps));
        clear.then_some((i, j))
    })
}

fn splice(outer: &[Vec3], i: usize, hole: &[Vec3], j: usize) -> Vec<Vec3> {
    let mut out = Vec::with_capacity(outer.len() + hole.len() + 2);
    out.extend_from_slice(&outer[..=i]);
    out.extend_from_slice(&hole[j..]);
    out.extend_from_slice(&hole[..=j]);
    out.extend_from_slice(&outer[i..]);
    out
}

/// Splices every hole into `outer`. Returns the loop, holes bridged and holes dropped.
fn bridge_holes(mut outer: Vec<Vec3>, holes: Vec<Vec<Vec3>>) -> (Vec<Vec3>, usize, usize) {
    if holes.is_empty() {
        return (outer, 0, 0);
    }
    let extent = outer
        .iter()
        .map(|p| f64::from(p.x).abs().max(f64::from(p.y).abs()))
        .fold(1.0f64, f64::max);
    let eps = REL_EPS * extent * extent;

    let mut queue: VecDeque<Vec<Vec3>> = holes.into();
    let mut bridged = 0;
    let mut stalled = 0;
    while let Some(hole) = queue.pop_front() {
        let outer2: Vec<P2> = outer.iter().copied().map(P2::of).collect();
        let hole2: Vec<P2> = hole.iter().copied().map(P2::of).collect();
        let pending: Vec<Vec<P2>> = queue
            .iter()
            .map(|h| h.iter().copied().map(P2::of).collect())
            .collect();
        match find_bridge(&outer2, &hole2, &pending, eps) {
            Some((i, j)) => {
                outer = splice(&outer, i, &hole, j);
                bridged += 1;
                stalled = 0;
            }
            None => {
                // Another hole may be in the way; retry once the rest are merged.
                queue.push_back(hole);
                stalled += 1;
                if stalled > queue.len() {
                    break;
                }
            }
        }
    }
    let dropped = queue.len();
    if dropped > 0 {
        log::warn!(
            target: "mesh",
            "holes without a valid bridge dropped count={} outer_len={}",
            dropped,
            outer.len()
        );
    }
    (outer, bridged, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexmesh_geom::signed_area2_xy;

    fn square(x0: f32, y0: f32, s: f32, ccw: bool) -> BoundaryLoop {
        let mut points = vec![
            Vec3::new(x0, y0, 0.0),
            Vec3::new(x0 + s, y0, 0.0),
            Vec3::new(x0 + s, y0 + s, 0.0),
            Vec3::new(x0, y0 + s, 0.0),
        ];
        if !ccw {
            points.reverse();
        }
        BoundaryLoop { points }
    }

    #[test]
    fn single_hole_is_bridged_with_two_repeats() {
        let loops = vec![square(4.0, 4.0, 2.0, true), square(0.0, 0.0, 10.0, false)];
        let out = resolve_polygons(loops, HolePolicy::Containment);
        assert_eq!(out.polygons.len(), 1);
        assert_eq!(out.holes_bridged, 1);
        let p = &out.polygons[0];
        assert_eq!(p.points.len(), 4 + 4 + 2);
        // net area is outer minus hole
        assert!((signed_area2_xy(&p.points) - 2.0 * (100.0 - 4.0)).abs() < 1e-3);
    }

    #[test]
    fn disjoint_loops_follow_policy() {
        let loops = || vec![square(0.0, 0.0, 4.0, true), square(10.0, 0.0, 2.0, true)];
        let contained = resolve_polygons(loops(), HolePolicy::Containment);
        assert_eq!(contained.polygons.len(), 2);
        assert_eq!(contained.dropped, 0);
        assert!(contained.polygons.iter().all(|p| signed_area2_xy(&p.points) > 0.0));

        // the smaller square is treated as a hole of the larger and cannot be bridged
        let largest = resolve_polygons(loops(), HolePolicy::LargestArea);
        assert_eq!(largest.polygons.len(), 1);
        assert_eq!(largest.dropped, 1);
        assert_eq!(largest.polygons[0].points.len(), 4);
    }

    #[test]
    fn two_holes_both_bridge() {
        let loops = vec![
            square(0.0, 0.0, 20.0, true),
            square(2.0, 2.0, 3.0, true),
            square(12.0, 12.0, 3.0, true),
        ];
        let out = resolve_polygons(loops, HolePolicy::Containment);
        assert_eq!(out.polygons.len(), 1);
        assert_eq!(out.holes_bridged, 2);
        assert_eq!(out.polygons[0].points.len(), 4 + 2 * (4 + 2));
        let area = signed_area2_xy(&out.polygons[0].points);
        assert!((area - 2.0 * (400.0 - 18.0)).abs() < 1e-2);
    }

    #[test]
    fn zero_area_loop_is_dropped() {
        let flat = BoundaryLoop {
            points: vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)],
        };
        let out = resolve_polygons(vec![flat], HolePolicy::default());
        assert!(out.polygons.is_empty());
        assert_eq!(out.dropped, 1);
    }

    #[test]
    fn policy_parses_from_snake_case() {
        #[derive(Deserialize)]
        struct W {
            p: HolePolicy,
        }
        let w: W = toml::from_str("p = \"largest_area\"").unwrap();
        assert_eq!(w.p, HolePolicy::LargestArea);
    }
}
