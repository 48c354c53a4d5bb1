//! BVH-accelerated intersection oracle over a mesh in world space.

use mesh_types::{Point3, SubmeshMesh, Triangle, TriangleId, Vector3};
use tracing::debug;

use crate::error::OracleResult;
use crate::oracle::{IntersectionOracle, ProbeHit, check_ray};
use crate::params::RaycastParams;

/// Triangles per leaf before a node is split.
const LEAF_SIZE: usize = 4;

/// Nearest-hit raycaster over the world-space triangles of a mesh.
///
/// Hit ids use the mesh-global numbering of [`SubmeshMesh`]. Geometry is
/// captured at build time; winding flips do not invalidate the oracle since
/// hits are two-sided by default.
///
/// # Example
///
/// ```
/// use mesh_raycast::{BvhOracle, IntersectionOracle, RaycastParams};
/// use mesh_types::{unit_cube, Point3, Vector3};
///
/// let cube = unit_cube();
/// let oracle = BvhOracle::build(&cube, RaycastParams::default());
///
/// // From inside the cube straight up: strikes the top side
/// let hit = oracle
///     .probe(&Point3::new(0.7, 0.2, 0.5), &Vector3::z())
///     .unwrap();
/// assert!((hit.distance() - 0.5).abs() < 1e-9);
/// assert!(matches!(hit.triangle(), Some(2 | 3)));
/// ```
#[derive(Debug, Clone)]
pub struct BvhOracle {
    triangles: Vec<(TriangleId, Triangle)>,
    nodes: Vec<Node>,
    params: RaycastParams,
}

impl BvhOracle {
    /// Build an oracle over every triangle of `mesh`, placed by its transform.
    ///
    /// Faces with out-of-range indices are left out.
    #[must_use]
    pub fn build(mesh: &SubmeshMesh, params: RaycastParams) -> Self {
        let triangles = mesh
            .faces()
            .enumerate()
            .filter_map(|(id, face)| mesh.world_triangle(face).map(|tri| (id, tri)))
            .collect();
        Self::from_triangles(triangles, params)
    }

    /// Build an oracle over explicit `(id, world-space triangle)` pairs.
    #[must_use]
    pub fn from_triangles(mut triangles: Vec<(TriangleId, Triangle)>, params: RaycastParams) -> Self {
        let mut nodes = Vec::new();
        if !triangles.is_empty() {
            let len = triangles.len();
            split(&mut triangles, 0, len, params.epsilon, &mut nodes);
        }
        debug!(
            triangles = triangles.len(),
            nodes = nodes.len(),
            "Built raycast BVH"
        );
        Self {
            triangles,
            nodes,
            params,
        }
    }

    /// Number of triangles the oracle can hit.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Parameters the oracle was built with.
    #[must_use]
    pub const fn params(&self) -> &RaycastParams {
        &self.params
    }

    fn nearest(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Option<(f64, TriangleId)> {
        let root = self.nodes.first()?;
        let dir_inv = direction.map(|d| if d.abs() > 0.0 { 1.0 / d } else { f64::MAX });
        let mut best: Option<(f64, TriangleId)> = None;
        let mut limit = self.params.distance_limit();
        let mut stack = vec![(0_usize, root.bounds.ray_entry(origin, &dir_inv))];

        while let Some((index, entry)) = stack.pop() {
            match entry {
                Some(t) if t <= limit => {}
                _ => continue,
            }
            match self.nodes[index].kind {
                NodeKind::Leaf { start, len } => {
                    for (id, tri) in &self.triangles[start..start + len] {
                        let Some(t) = intersect(origin, direction, tri, &self.params) else {
                            continue;
                        };
                        // Ties go to the lower id so results do not depend on layout.
                        let better = best.is_none_or(|(bt, bid)| t < bt || (t == bt && *id < bid));
                        if t <= limit && better {
                            best = Some((t, *id));
                            limit = t;
                        }
                    }
                }
                NodeKind::Branch { left, right } => {
                    let l = self.nodes[left].bounds.ray_entry(origin, &dir_inv);
                    let r = self.nodes[right].bounds.ray_entry(origin, &dir_inv);
                    // Push the farther child first so the nearer one is visited next.
                    if l.unwrap_or(f64::INFINITY) <= r.unwrap_or(f64::INFINITY) {
                        stack.push((right, r));
                        stack.push((left, l));
                    } else {
                        stack.push((left, l));
                        stack.push((right, r));
                    }
                }
            }
        }
        best
    }
}

impl IntersectionOracle for BvhOracle {
    fn probe(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> OracleResult<ProbeHit> {
        check_ray(origin, direction)?;
        let direction = direction.normalize();
        Ok(self
            .nearest(origin, &direction)
            .map_or(ProbeHit::Miss, |(distance, triangle)| ProbeHit::Hit {
                distance,
                triangle,
            }))
    }

    fn hits_backfaces(&self) -> bool {
        self.params.hit_backfaces
    }
}

// ============================================================================
// Internal: BVH nodes
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Bounds {
    min: Point3<f64>,
    max: Point3<f64>,
}

impl Bounds {
    fn of(triangles: &[(TriangleId, Triangle)], epsilon: f64) -> Self {
        let mut min = Point3::from(Vector3::repeat(f64::INFINITY));
        let mut max = Point3::from(Vector3::repeat(f64::NEG_INFINITY));
        for (_, tri) in triangles {
            for p in [tri.v0, tri.v1, tri.v2] {
                min = min.inf(&p);
                max = max.sup(&p);
            }
        }
        let pad = Vector3::repeat(epsilon);
        Self {
            min: min - pad,
            max: max + pad,
        }
    }

    /// Parametric distance at which the ray enters the box, if it does.
    fn ray_entry(&self, origin: &Point3<f64>, dir_inv: &Vector3<f64>) -> Option<f64> {
        let t1 = (self.min - origin).component_mul(dir_inv);
        let t2 = (self.max - origin).component_mul(dir_inv);
        let t_near = t1.inf(&t2).max();
        let t_far = t1.sup(&t2).min();
        (t_far >= t_near && t_far >= 0.0).then_some(t_near.max(0.0))
    }
}

#[derive(Debug, Clone, Copy)]
enum NodeKind {
    Leaf { start: usize, len: usize },
    Branch { left: usize, right: usize },
}

#[derive(Debug, Clone, Copy)]
struct Node {
    bounds: Bounds,
    kind: NodeKind,
}

/// Build the subtree over `triangles[start..end]`, returning its node index.
fn split(
    triangles: &mut [(TriangleId, Triangle)],
    start: usize,
    end: usize,
    epsilon: f64,
    nodes: &mut Vec<Node>,
) -> usize {
    let bounds = Bounds::of(&triangles[start..end], epsilon);
    let index = nodes.len();
    nodes.push(Node {
        bounds,
        kind: NodeKind::Leaf {
            start,
            len: end - start,
        },
    });
    if end - start <= LEAF_SIZE {
        return index;
    }

    // Median split along the longest extent.
    let extent = bounds.max - bounds.min;
    let axis = extent.imax();
    triangles[start..end].sort_by(|(_, a), (_, b)| a.centroid()[axis].total_cmp(&b.centroid()[axis]));
    let mid = start + (end - start) / 2;

    let left = split(triangles, start, mid, epsilon, nodes);
    let right = split(triangles, mid, end, epsilon, nodes);
    nodes[index].kind = NodeKind::Branch { left, right };
    index
}

/// Möller–Trumbore ray-triangle intersection.
///
/// `a > 0` means the ray meets the triangle's front side. `direction` must be
/// unit length; the parallel test is scaled by the edge lengths so it holds
/// for triangles of any size.
#[allow(clippy::many_single_char_names)]
fn intersect(
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    tri: &Triangle,
    params: &RaycastParams,
) -> Option<f64> {
    let edge1 = tri.v1 - tri.v0;
    let edge2 = tri.v2 - tri.v0;
    let h = direction.cross(&edge2);
    let a = edge1.dot(&h);

    let parallel = params.epsilon * edge1.norm() * edge2.norm();
    if a.abs() <= parallel || (!params.hit_backfaces && a < 0.0) {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - tri.v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > params.epsilon).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::unit_cube;

    fn floor_triangle() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        )
    }

    #[test]
    fn test_intersect_front_and_back() {
        let tri = floor_triangle();
        let params = RaycastParams::default();

        // Coming down onto the +Z side
        let t = intersect(&Point3::new(0.5, 0.5, 1.0), &-Vector3::z(), &tri, &params);
        assert_relative_eq!(t.unwrap(), 1.0, epsilon = 1e-12);

        // Coming up from underneath hits the back side
        let t = intersect(&Point3::new(0.5, 0.5, -2.0), &Vector3::z(), &tri, &params);
        assert_relative_eq!(t.unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_intersect_culls_backfaces_when_asked() {
        let tri = floor_triangle();
        let params = RaycastParams::default().hit_backfaces(false);
        assert!(intersect(&Point3::new(0.5, 0.5, -2.0), &Vector3::z(), &tri, &params).is_none());
        assert!(intersect(&Point3::new(0.5, 0.5, 1.0), &-Vector3::z(), &tri, &params).is_some());
    }

    #[test]
    fn test_intersect_miss_and_behind() {
        let tri = floor_triangle();
        let params = RaycastParams::default();
        assert!(intersect(&Point3::new(5.0, 5.0, 1.0), &-Vector3::z(), &tri, &params).is_none());
        // Triangle is behind the origin
        assert!(intersect(&Point3::new(0.5, 0.5, 1.0), &Vector3::z(), &tri, &params).is_none());
        // Parallel ray
        assert!(intersect(&Point3::new(0.0, 0.5, 0.0), &Vector3::x(), &tri, &params).is_none());
    }

    #[test]
    fn test_intersect_tiny_triangle() {
        let s = 1e-5;
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(s, 0.0, 0.0),
            Point3::new(0.5 * s, s, 0.0),
        );
        let params = RaycastParams::default();

        let t = intersect(&Point3::new(0.5 * s, 0.5 * s, s), &-Vector3::z(), &tri, &params);
        assert_relative_eq!(t.unwrap(), s, epsilon = 1e-15);

        let t = intersect(&Point3::new(0.5 * s, 0.5 * s, -2.0 * s), &Vector3::z(), &tri, &params);
        assert_relative_eq!(t.unwrap(), 2.0 * s, epsilon = 1e-15);

        // Still parallel at this size
        assert!(intersect(&Point3::new(0.0, 0.5 * s, 0.0), &Vector3::x(), &tri, &params).is_none());
    }

    #[test]
    fn test_bounds_entry() {
        let bounds = Bounds {
            min: Point3::new(0.0, 0.0, 0.0),
            max: Point3::new(1.0, 1.0, 1.0),
        };
        let dir_inv = Vector3::new(f64::MAX, f64::MAX, 1.0);
        let entry = bounds.ray_entry(&Point3::new(0.5, 0.5, -1.0), &dir_inv);
        assert_relative_eq!(entry.unwrap(), 1.0, epsilon = 1e-12);
        assert!(bounds.ray_entry(&Point3::new(5.0, 5.0, -1.0), &dir_inv).is_none());
    }

    #[test]
    fn test_empty_oracle_always_misses() {
        let oracle = BvhOracle::from_triangles(Vec::new(), RaycastParams::default());
        let hit = oracle.probe(&Point3::origin(), &Vector3::x()).unwrap();
        assert_eq!(hit, ProbeHit::Miss);
    }

    #[test]
    fn test_cube_probes_from_outside_and_inside() {
        let oracle = BvhOracle::build(&unit_cube(), RaycastParams::default());
        assert_eq!(oracle.triangle_count(), 12);

        // Outside, pointing away: nothing
        let miss = oracle.probe(&Point3::new(0.3, 0.6, 2.0), &Vector3::z()).unwrap();
        assert_eq!(miss, ProbeHit::Miss);

        // Outside, pointing at the right side (+X, ids 10/11)
        let hit = oracle.probe(&Point3::new(3.0, 0.3, 0.6), &-Vector3::x()).unwrap();
        assert_relative_eq!(hit.distance(), 2.0, epsilon = 1e-9);
        assert!(matches!(hit.triangle(), Some(10 | 11)));

        // Inside, pointing down at the bottom (ids 0/1): back-face hit
        let hit = oracle.probe(&Point3::new(0.6, 0.3, 0.5), &-Vector3::z()).unwrap();
        assert_relative_eq!(hit.distance(), 0.5, epsilon = 1e-9);
        assert!(matches!(hit.triangle(), Some(0 | 1)));
    }

    #[test]
    fn test_direction_need_not_be_unit() {
        let oracle = BvhOracle::build(&unit_cube(), RaycastParams::default());
        let hit = oracle
            .probe(&Point3::new(0.6, 0.3, 0.5), &Vector3::new(0.0, 0.0, -10.0))
            .unwrap();
        assert_relative_eq!(hit.distance(), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_max_distance_limits_hits() {
        let params = RaycastParams::default().max_distance(1.0);
        let oracle = BvhOracle::build(&unit_cube(), params);
        let far = oracle.probe(&Point3::new(3.0, 0.3, 0.6), &-Vector3::x()).unwrap();
        assert_eq!(far, ProbeHit::Miss);
    }
}
