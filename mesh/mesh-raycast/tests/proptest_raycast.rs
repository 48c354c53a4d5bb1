//! Property-based tests for the BVH raycaster.
//!
//! The tree must agree with a linear scan that casts the same ray at every
//! triangle on its own.
//!
//! Run with: cargo test -p mesh-raycast -- proptest

use mesh_raycast::{BvhOracle, IntersectionOracle, ProbeHit, RaycastParams};
use mesh_types::{Point3, Triangle, TriangleId, Vector3};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_point(extent: f64) -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-extent..extent).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// Up to 64 triangles scattered through a 10-unit cube, ids in order.
fn arb_soup() -> impl Strategy<Value = Vec<(TriangleId, Triangle)>> {
    prop::collection::vec((arb_point(5.0), arb_point(5.0), arb_point(5.0)), 1..64).prop_map(
        |corners| {
            corners
                .into_iter()
                .enumerate()
                .map(|(id, (a, b, c))| (id, Triangle::new(a, b, c)))
                .collect()
        },
    )
}

fn arb_ray() -> impl Strategy<Value = (Point3<f64>, Vector3<f64>)> {
    (arb_point(8.0), prop::array::uniform3(-1.0..1.0f64))
        .prop_map(|(origin, d)| (origin, Vector3::from(d)))
        .prop_filter("direction too short", |(_, d)| d.norm() > 0.1)
}

// =============================================================================
// Helpers
// =============================================================================

/// Nearest hit found by probing each triangle in isolation.
fn scan(
    soup: &[(TriangleId, Triangle)],
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
) -> Option<f64> {
    soup.iter()
        .filter_map(|&(id, tri)| {
            single(id, tri)
                .probe(origin, direction)
                .ok()
                .filter(ProbeHit::is_hit)
                .map(|hit| hit.distance())
        })
        .min_by(f64::total_cmp)
}

fn single(id: TriangleId, tri: Triangle) -> BvhOracle {
    BvhOracle::from_triangles(vec![(id, tri)], RaycastParams::default())
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn proptest_bvh_matches_linear_scan(soup in arb_soup(), (origin, direction) in arb_ray()) {
        let oracle = BvhOracle::from_triangles(soup.clone(), RaycastParams::default());
        let hit = oracle.probe(&origin, &direction).unwrap();

        match scan(&soup, &origin, &direction) {
            None => prop_assert_eq!(hit, ProbeHit::Miss),
            Some(expected) => {
                prop_assert!(hit.is_hit());
                prop_assert!((hit.distance() - expected).abs() <= 1e-9 * expected.max(1.0));

                // The reported triangle is really struck at that distance.
                let id = hit.triangle().unwrap();
                let own = single(id, soup[id].1).probe(&origin, &direction).unwrap();
                prop_assert!((own.distance() - hit.distance()).abs() <= 1e-9 * expected.max(1.0));
            }
        }
    }

    #[test]
    fn proptest_max_distance_only_drops_far_hits(
        soup in arb_soup(),
        (origin, direction) in arb_ray(),
        limit in 0.5..20.0f64,
    ) {
        let unlimited = BvhOracle::from_triangles(soup.clone(), RaycastParams::default())
            .probe(&origin, &direction)
            .unwrap();
        let limited = BvhOracle::from_triangles(soup, RaycastParams::default().max_distance(limit))
            .probe(&origin, &direction)
            .unwrap();

        if unlimited.is_hit() && unlimited.distance() <= limit {
            prop_assert!((limited.distance() - unlimited.distance()).abs() < 1e-12);
        } else {
            prop_assert_eq!(limited, ProbeHit::Miss);
        }
    }
}
