//! Triangle mesh split into submeshes.

use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, MeshResult};
use crate::transform::Transform;
use crate::triangle::{Triangle, unit_or_none};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mesh-global triangle identifier.
///
/// Triangles are numbered submesh by submesh in declaration order: local
/// triangle `j` of submesh `m` has id `submesh_offset(m) + j`. Hit ids
/// reported by intersection oracles use the same numbering.
pub type TriangleId = usize;

/// A triangle mesh whose faces are grouped into disjoint submeshes.
///
/// Vertex positions are stored in local space and shared by all submeshes.
/// [`Transform`] places the mesh in world space.
///
/// # Winding Order
///
/// Faces use **counter-clockwise (CCW) winding** when viewed from outside, so
/// normals point outward by the right-hand rule.
///
/// # Example
///
/// ```
/// use mesh_types::{Point3, SubmeshMesh};
///
/// let mut mesh = SubmeshMesh::new(vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ]);
/// let sub = mesh.add_submesh(vec![[0, 1, 2]]);
///
/// assert_eq!(sub, 0);
/// assert_eq!(mesh.triangle_count(), 1);
/// assert!(mesh.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SubmeshMesh {
    /// Local-space vertex positions.
    pub positions: Vec<Point3<f64>>,

    /// Local-to-world placement.
    pub transform: Transform,

    submeshes: Vec<Vec<[u32; 3]>>,

    /// Per-vertex normals derived from the current winding (local space).
    normals: Vec<Vector3<f64>>,
}

impl SubmeshMesh {
    /// Create a mesh with the given vertices and no faces.
    #[must_use]
    pub fn new(positions: Vec<Point3<f64>>) -> Self {
        Self {
            positions,
            transform: Transform::identity(),
            submeshes: Vec::new(),
            normals: Vec::new(),
        }
    }

    /// Create a mesh from vertices and a list of submeshes.
    #[must_use]
    pub fn from_parts(positions: Vec<Point3<f64>>, submeshes: Vec<Vec<[u32; 3]>>) -> Self {
        Self {
            positions,
            transform: Transform::identity(),
            submeshes,
            normals: Vec::new(),
        }
    }

    /// Set the local-to-world placement.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Append a submesh and return its index.
    pub fn add_submesh(&mut self, faces: Vec<[u32; 3]>) -> usize {
        self.submeshes.push(faces);
        self.submeshes.len() - 1
    }

    /// Number of submeshes.
    #[inline]
    #[must_use]
    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    /// Faces of submesh `index`, or `None` if it does not exist.
    #[must_use]
    pub fn submesh(&self, index: usize) -> Option<&[[u32; 3]]> {
        self.submeshes.get(index).map(Vec::as_slice)
    }

    /// Iterate over all submeshes in declaration order.
    pub fn submeshes(&self) -> impl Iterator<Item = &[[u32; 3]]> {
        self.submeshes.iter().map(Vec::as_slice)
    }

    /// Replace the faces of an existing submesh.
    ///
    /// The triangle count must not change, so triangle ids stay stable.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NoSuchSubmesh`] or
    /// [`MeshError::TriangleCountMismatch`].
    pub fn set_submesh(&mut self, index: usize, faces: Vec<[u32; 3]>) -> MeshResult<()> {
        let submesh_count = self.submeshes.len();
        let slot = self
            .submeshes
            .get_mut(index)
            .ok_or(MeshError::NoSuchSubmesh {
                submesh: index,
                submesh_count,
            })?;
        if slot.len() != faces.len() {
            return Err(MeshError::TriangleCountMismatch {
                submesh: index,
                expected: slot.len(),
                actual: faces.len(),
            });
        }
        *slot = faces;
        Ok(())
    }

    /// Total number of triangles over all submeshes.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(Vec::len).sum()
    }

    /// Whether the mesh has no triangles to work on.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// Id of the first triangle of submesh `index`.
    ///
    /// For `index == submesh_count()` this is the total triangle count.
    #[must_use]
    pub fn submesh_offset(&self, index: usize) -> TriangleId {
        self.submeshes.iter().take(index).map(Vec::len).sum()
    }

    /// Split a triangle id into `(submesh, local index)`.
    #[must_use]
    pub fn locate(&self, id: TriangleId) -> Option<(usize, usize)> {
        let mut offset = 0;
        for (m, faces) in self.submeshes.iter().enumerate() {
            if id < offset + faces.len() {
                return Some((m, id - offset));
            }
            offset += faces.len();
        }
        None
    }

    /// Index triple of triangle `id`.
    #[must_use]
    pub fn face(&self, id: TriangleId) -> Option<[u32; 3]> {
        let (m, j) = self.locate(id)?;
        self.submeshes[m].get(j).copied()
    }

    /// All faces in triangle-id order.
    pub fn faces(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.submeshes.iter().flatten().copied()
    }

    /// Check that every face references an existing vertex.
    ///
    /// # Errors
    ///
    /// Returns the first [`MeshError::InvalidIndex`] found, in visiting order.
    pub fn validate(&self) -> MeshResult<()> {
        let vertex_count = self.positions.len();
        for (submesh, faces) in self.submeshes.iter().enumerate() {
            for (triangle, face) in faces.iter().enumerate() {
                if let Some(&index) = face.iter().find(|&&i| i as usize >= vertex_count) {
                    return Err(MeshError::InvalidIndex {
                        submesh,
                        triangle,
                        index,
                        vertex_count,
                    });
                }
            }
        }
        Ok(())
    }

    /// Resolve an index triple to local-space positions.
    #[must_use]
    pub fn local_triangle(&self, face: [u32; 3]) -> Option<Triangle> {
        let [a, b, c] = face.map(|i| self.positions.get(i as usize).copied());
        Some(Triangle::new(a?, b?, c?))
    }

    /// Resolve an index triple to world-space positions.
    #[must_use]
    pub fn world_triangle(&self, face: [u32; 3]) -> Option<Triangle> {
        let tri = self.local_triangle(face)?;
        Some(Triangle::new(
            self.transform.transform_point(&tri.v0),
            self.transform.transform_point(&tri.v1),
            self.transform.transform_point(&tri.v2),
        ))
    }

    /// World-space face normal of an index triple.
    ///
    /// Taken from the world-space corners, so non-uniform scale and mirroring
    /// are accounted for. Returns `None` for degenerate faces and out-of-range
    /// indices.
    #[must_use]
    pub fn face_normal(&self, face: [u32; 3]) -> Option<Vector3<f64>> {
        self.world_triangle(face)?.normal()
    }

    /// World-space probe points of a face: its centroid pushed `precision`
    /// along `+normal` (front) and `-normal` (back).
    #[must_use]
    pub fn probe_points(
        &self,
        face: [u32; 3],
        normal: &Vector3<f64>,
        precision: f64,
    ) -> Option<(Point3<f64>, Point3<f64>)> {
        let centroid = self
            .transform
            .transform_point(&self.local_triangle(face)?.centroid());
        let offset = normal * precision;
        Some((centroid + offset, centroid - offset))
    }

    /// Per-vertex normals from the last [`recompute_normals`](Self::recompute_normals).
    #[must_use]
    pub fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    /// Rebuild per-vertex normals from the current winding.
    ///
    /// Each vertex gets the normalized, area-weighted sum of the normals of
    /// the faces using it. Vertices with no usable face get a zero vector.
    pub fn recompute_normals(&mut self) {
        let mut normals = vec![Vector3::zeros(); self.positions.len()];
        for face in self.faces() {
            let Some(tri) = self.local_triangle(face) else {
                continue;
            };
            // Cross length is twice the area, which is the weight we want.
            let weighted = tri.edge_cross();
            for &v in &face {
                normals[v as usize] += weighted;
            }
        }
        for n in &mut normals {
            *n = unit_or_none(*n).unwrap_or_else(Vector3::zeros);
        }
        self.normals = normals;
    }

    /// Signed volume enclosed by the mesh in local space.
    ///
    /// Positive for a closed mesh whose faces all point outward, negative when
    /// it is inside-out. Meaningless for open meshes.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        self.faces()
            .filter_map(|face| self.local_triangle(face))
            .map(|t| t.v0.coords.dot(&t.v1.coords.cross(&t.v2.coords)))
            .sum::<f64>()
            / 6.0
    }

    /// Whether the signed volume is negative.
    #[must_use]
    pub fn is_inside_out(&self) -> bool {
        self.signed_volume() < 0.0
    }
}

/// Reverse the winding of an index triple by swapping its first two entries.
#[inline]
pub fn flip_winding(face: &mut [u32; 3]) {
    face.swap(0, 1);
}

/// Axis-aligned unit cube from `(0,0,0)` to `(1,1,1)` as a single submesh.
///
/// 12 triangles, two per side, all wound outward. Triangles `2k` and `2k+1`
/// form side `k` in the order bottom, top, front, back, left, right.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
///
/// let cube = unit_cube();
/// assert_eq!(cube.triangle_count(), 12);
/// assert!((cube.signed_volume() - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn unit_cube() -> SubmeshMesh {
    let positions = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(0.0, 1.0, 1.0),
    ];
    let faces = vec![
        [0, 2, 1],
        [0, 3, 2], // bottom, -Z
        [4, 5, 6],
        [4, 6, 7], // top, +Z
        [0, 1, 5],
        [0, 5, 4], // front, -Y
        [3, 7, 6],
        [3, 6, 2], // back, +Y
        [0, 4, 7],
        [0, 7, 3], // left, -X
        [1, 2, 6],
        [1, 6, 5], // right, +X
    ];
    SubmeshMesh::from_parts(positions, vec![faces])
}

/// Axis-aligned box from the origin to `size`, each side cut into a
/// `segments` x `segments` grid of quads, two triangles each.
///
/// One submesh, all faces wound outward. Sides do not share vertices.
/// `segments` below 1 is treated as 1.
///
/// # Example
///
/// ```
/// use mesh_types::{subdivided_box, Vector3};
///
/// let mesh = subdivided_box(Vector3::new(2.0, 1.0, 1.0), 3);
/// assert_eq!(mesh.triangle_count(), 6 * 3 * 3 * 2);
/// assert!((mesh.signed_volume() - 2.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn subdivided_box(size: Vector3<f64>, segments: u32) -> SubmeshMesh {
    let n = segments.max(1);
    let row = n + 1;
    let mut positions = Vec::new();
    let mut faces = Vec::new();
    let mut base = 0_u32;

    // Grid axes `(a, b)` and side axis `c`, cyclic so that a x b = +c.
    for (a, b, c) in [(0, 1, 2), (1, 2, 0), (2, 0, 1)] {
        for high in [false, true] {
            for j in 0..=n {
                for i in 0..=n {
                    let mut p = Point3::origin();
                    p[a] = size[a] * f64::from(i) / f64::from(n);
                    p[b] = size[b] * f64::from(j) / f64::from(n);
                    p[c] = if high { size[c] } else { 0.0 };
                    positions.push(p);
                }
            }
            let at = |i: u32, j: u32| base + j * row + i;
            for j in 0..n {
                for i in 0..n {
                    let (p00, p10, p11, p01) = (at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1));
                    if high {
                        faces.push([p00, p10, p11]);
                        faces.push([p00, p11, p01]);
                    } else {
                        faces.push([p00, p11, p10]);
                        faces.push([p00, p01, p11]);
                    }
                }
            }
            base += row * row;
        }
    }
    SubmeshMesh::from_parts(positions, vec![faces])
}
