use hexmesh_geom::{Aabb, Vec3, newell_normal, point_in_polygon_xy, signed_area2_xy};
use proptest::prelude::*;

fn approx_abs_rel(a: f32, b: f32, atol: f32, rtol: f32) -> bool {
    let diff = (a - b).abs();
    let scale = a.abs().max(b.abs());
    diff <= atol + rtol * scale
}

fn coord() -> impl Strategy<Value = f32> {
    -1_000.0f32..1_000.0
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn arb_loop() -> impl Strategy<Value = Vec<Vec3>> {
    prop::collection::vec(arb_vec3(), 3..16)
}

/// Regular n-gon in the plane z = h, counter-clockwise.
fn regular(n: usize, radius: f32, h: f32) -> Vec<Vec3> {
    (0..n)
        .map(|i| {
            let a = std::f32::consts::TAU * i as f32 / n as f32;
            Vec3::new(radius * a.cos(), radius * a.sin(), h)
        })
        .collect()
}

proptest! {
    // Reversing a loop negates its signed area
    #[test]
    fn reversed_loop_negates_area(points in arb_loop()) {
        let a = signed_area2_xy(&points);
        let mut rev = points.clone();
        rev.reverse();
        let b = signed_area2_xy(&rev);
        prop_assert!(approx_abs_rel(a, -b, 1e-1, 1e-4));
    }

    // Rotating the start vertex leaves the area unchanged
    #[test]
    fn rotated_start_keeps_area(points in arb_loop(), k in 0usize..16) {
        let a = signed_area2_xy(&points);
        let mut rot = points.clone();
        let len = rot.len();
        rot.rotate_left(k % len);
        prop_assert!(approx_abs_rel(a, signed_area2_xy(&rot), 1e-1, 1e-4));
    }

    // Newell normal z equals twice the XY signed area for planar loops
    #[test]
    fn newell_z_matches_area(n in 3usize..12, radius in 1.0f32..500.0, h in coord()) {
        let poly = regular(n, radius, h);
        let nz = newell_normal(&poly).z;
        prop_assert!(approx_abs_rel(nz, signed_area2_xy(&poly), 1e-2, 1e-3));
        prop_assert!(nz > 0.0);
    }

    // The centroid of a regular polygon is inside it; a far point is not
    #[test]
    fn regular_polygon_contains_center(n in 3usize..12, radius in 1.0f32..500.0) {
        let poly = regular(n, radius, 0.0);
        prop_assert!(point_in_polygon_xy(Vec3::ZERO, &poly));
        prop_assert!(!point_in_polygon_xy(Vec3::new(radius * 2.0, 0.0, 0.0), &poly));
    }

    // Every source point lies inside the box built from the points
    #[test]
    fn aabb_from_points_contains_all(points in arb_loop()) {
        let bb = Aabb::from_points(points.iter().copied());
        prop_assert!(!bb.is_empty());
        for p in points {
            prop_assert!(bb.contains(p));
        }
    }
}

#[test]
fn vec3_ops() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(-4.0, 5.0, -6.0);
    assert_eq!(a + b, Vec3::new(-3.0, 7.0, -3.0));
    assert_eq!((a + b) - a, b);
    assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
    assert_eq!(a.distance_sq(a), 0.0);
    assert_eq!(Vec3::new(1.0, 0.0, 0.0).cross(Vec3::new(0.0, 1.0, 0.0)), Vec3::UP);
    let mut c = a;
    c += b;
    c -= b;
    assert_eq!(c, a);
}
