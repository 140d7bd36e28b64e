use std::f64::consts::TAU;

use hexmesh_geom::{Vec3, newell_normal};

use crate::constants::{REL_EPS, TURNING_EPS};
use crate::face::Face;

/// Index order applied to triangles after triangulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winding {
    Keep,
    /// Swap the second and third index of every triangle.
    Reverse,
}

impl Winding {
    /// Loops are traced counter-clockwise from outside the solid, except bottoms, which
    /// are seen from below.
    #[inline]
    pub fn for_face(face: Face) -> Self {
        match face {
            Face::Bottom => Winding::Reverse,
            _ => Winding::Keep,
        }
    }

    pub fn apply(self, tris: &mut [[u32; 3]]) {
        if self == Winding::Reverse {
            for t in tris {
                t.swap(1, 2);
            }
        }
    }
}

/// Triangles over `points`. `points` is the input loop, plus a centre vertex when the loop
/// was fanned.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Triangulation {
    pub points: Vec<Vec3>,
    pub tris: Vec<[u32; 3]>,
}

impl Triangulation {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tris.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct P2 {
    x: f64,
    y: f64,
}

#[inline]
fn orient(a: P2, b: P2, c: P2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Projects onto the plane that drops the dominant normal axis, flipped so the loop is
/// counter-clockwise. Returns `None` for zero-area loops.
fn project(points: &[Vec3]) -> Option<(Vec<P2>, f64)> {
    let n = newell_normal(points);
    let (ax, ay, az) = (n.x.abs(), n.y.abs(), n.z.abs());
    let pick: fn(Vec3) -> (f32, f32) = if az >= ax && az >= ay {
        |p| (p.x, p.y)
    } else if ax >= ay {
        |p| (p.y, p.z)
    } else {
        |p| (p.z, p.x)
    };
    let mut flat: Vec<P2> = points
        .iter()
        .map(|&p| {
            let (u, v) = pick(p);
            P2 {
                x: f64::from(u),
                y: f64::from(v),
            }
        })
        .collect();

    let (mut lo, mut hi) = (flat[0], flat[0]);
    let mut area2 = 0.0;
    for i in 0..flat.len() {
        let a = flat[i];
        let b = flat[(i + 1) % flat.len()];
        area2 += a.x * b.y - b.x * a.y;
        lo = P2 {
            x: lo.x.min(a.x),
            y: lo.y.min(a.y),
        };
        hi = P2 {
            x: hi.x.max(a.x),
            y: hi.y.max(a.y),
        };
    }
    let extent = (hi.x - lo.x).max(hi.y - lo.y);
    let eps = REL_EPS * extent * extent;
    if !area2.is_finite() || area2.abs() <= eps {
        return None;
    }
    if area2 < 0.0 {
        for p in &mut flat {
            p.y = -p.y;
        }
    }
    Some((flat, eps))
}

/// Every turn is strictly left and the loop winds exactly once.
fn is_strictly_convex(p: &[P2], eps: f64) -> bool {
    let n = p.len();
    let mut turning = 0.0f64;
    for i in 0..n {
        let a = p[(i + n - 1) % n];
        let b = p[i];
        let c = p[(i + 1) % n];
        if orient(a, b, c) <= eps {
            return false;
        }
        let (e1x, e1y) = (b.x - a.x, b.y - a.y);
        let (e2x, e2y) = (c.x - b.x, c.y - b.y);
        turning += (e1x * e2y - e1y * e2x).atan2(e1x * e2x + e1y * e2y);
    }
    (turning - TAU).abs() < TURNING_EPS
}

fn fan(points: &[Vec3]) -> Triangulation {
    let n = points.len();
    let (mut sx, mut sy, mut sz) = (0.0f64, 0.0f64, 0.0f64);
    for p in points {
        sx += f64::from(p.x);
        sy += f64::from(p.y);
        sz += f64::from(p.z);
    }
    let k = n as f64;
    let mut out = Vec::with_capacity(n + 1);
    out.extend_from_slice(points);
    out.push(Vec3::new((sx / k) as f32, (sy / k) as f32, (sz / k) as f32));
    let c = n as u32;
    let tris = (0..n as u32).map(|i| [i, (i + 1) % c, c]).collect();
    Triangulation { points: out, tris }
}

#[inline]
fn inside_or_on(a: P2, b: P2, c: P2, q: P2, eps: f64) -> bool {
    orient(a, b, q) >= -eps && orient(b, c, q) >= -eps && orient(c, a, q) >= -eps
}

#[inline]
fn strictly_inside(a: P2, b: P2, c: P2, q: P2, eps: f64) -> bool {
    orient(a, b, q) > eps && orient(b, c, q) > eps && orient(c, a, q) > eps
}

fn is_ear(p: &[P2], ring: &[usize], tri: [usize; 3], eps: f64, relaxed: bool) -> bool {
    let [a, b, c] = tri.map(|i| p[i]);
    if orient(a, b, c) <= eps {
        return false;
    }
    for &j in ring {
        if tri.contains(&j) {
            continue;
        }
        let q = p[j];
        // bridge duplicates of the ear's own corners never block it
        if q == a || q == b || q == c {
            continue;
        }
        let blocked = if relaxed {
            strictly_inside(a, b, c, q, eps)
        } else {
            inside_or_on(a, b, c, q, eps)
        };
        if blocked {
            return false;
        }
    }
    true
}

fn ear_clip(p: &[P2], eps: f64) -> Option<Vec<[u32; 3]>> {
    let mut ring: Vec<usize> = (0..p.len()).collect();
    let mut tris = Vec::with_capacity(p.len().saturating_sub(2));
    let mut cursor = 0usize;
    let mut relaxed = false;
    while ring.len() > 3 {
        let m = ring.len();
        let mut clipped = None;
        for step in 0..m {
            let k = (cursor + step) % m;
            let tri = [ring[(k + m - 1) % m], ring[k], ring[(k + 1) % m]];
            if is_ear(p, &ring, tri, eps, relaxed) {
                clipped = Some((k, tri));
                break;
            }
        }
        match clipped {
            Some((k, tri)) => {
                tris.push(tri.map(|i| i as u32));
                ring.remove(k);
                cursor = (k + ring.len() - 1) % ring.len();
                relaxed = false;
            }
            None if !relaxed => relaxed = true,
            None => {
                // Drop a vertex that spans no area, or give up.
                let flat = (0..m).find(|&k| {
                    let a = p[ring[(k + m - 1) % m]];
                    let b = p[ring[k]];
                    let c = p[ring[(k + 1) % m]];
                    orient(a, b, c).abs() <= eps
                })?;
                ring.remove(flat);
                cursor = flat % ring.len();
            }
        }
    }
    if let &[a, b, c] = ring.as_slice() {
        if orient(p[a], p[b], p[c]) > eps {
            tris.push([a as u32, b as u32, c as u32]);
        }
    }
    Some(tris)
}

/// Triangulates one planar loop. Triangles keep the loop's orientation.
///
/// Strictly convex loops of four or more corners are fanned around their centroid; other
/// loops are ear clipped. Degenerate or unresolvable loops yield no triangles.
pub fn triangulate(points: &[Vec3]) -> Triangulation {
    if points.len() < 3 {
        return Triangulation::default();
    }
    let Some((flat, eps)) = project(points) else {
        return Triangulation::default();
    };
    if points.len() >= 4 && is_strictly_convex(&flat, eps) {
        return fan(points);
    }
    match ear_clip(&flat, eps) {
        Some(tris) if !tris.is_empty() => Triangulation {
            points: points.to_vec(),
            tris,
        },
        _ => {
            log::debug!(target: "mesh", "ear clipping stuck len={}", points.len());
            Triangulation::default()
        }
    }
}
