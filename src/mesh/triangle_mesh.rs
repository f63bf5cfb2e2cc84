//! Indexed triangle mesh.
//!
//! This is the input representation of the unfolding pipeline: an ordered
//! list of points and a list of triangles referencing them by index. Meshes
//! are built from face-vertex lists (as found in mesh files) or from raw GPU
//! style vertex/index buffers.

use std::collections::VecDeque;

use nalgebra::{Point3, Vector3};
use tracing::warn;

use super::adjacency::EdgeAdjacency;
use super::edge::EdgeKey;
use super::index::{MeshIndex, PointId, TriangleId};
use crate::error::{MeshError, Result};

/// Cross products shorter than this are treated as zero-area triangles.
pub const DEGENERATE_EPSILON: f64 = 1e-12;

/// An indexed triangle mesh.
#[derive(Debug, Clone)]
pub struct TriangleMesh<I: MeshIndex = u32> {
    pub(crate) points: Vec<Point3<f64>>,
    pub(crate) triangles: Vec<[PointId<I>; 3]>,
}

impl<I: MeshIndex> Default for TriangleMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> TriangleMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            triangles: Vec::new(),
        }
    }

    /// Build a mesh from point positions and triangle index triples.
    ///
    /// Every index must refer to an existing point, and the point and
    /// triangle counts must fit the index type `I`. Triangles that repeat a
    /// point index are kept; they show up as degenerate faces downstream.
    ///
    /// # Example
    /// ```
    /// use netcraft::mesh::TriangleMesh;
    /// use nalgebra::Point3;
    ///
    /// let points = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.5, 1.0, 0.0),
    /// ];
    /// let mesh: TriangleMesh = TriangleMesh::from_triangles(points, &[[0, 1, 2]]).unwrap();
    /// assert_eq!(mesh.num_triangles(), 1);
    /// ```
    pub fn from_triangles(points: Vec<Point3<f64>>, triangles: &[[usize; 3]]) -> Result<Self> {
        for (element, count) in [("points", points.len()), ("triangles", triangles.len())] {
            if !I::fits(count) {
                return Err(MeshError::IndexOverflow {
                    element,
                    count,
                    max: I::MAX.to_usize(),
                });
            }
        }

        for (ti, tri) in triangles.iter().enumerate() {
            for &vi in tri {
                if vi >= points.len() {
                    return Err(MeshError::InvalidVertexIndex {
                        triangle: ti,
                        point: vi,
                    });
                }
            }
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                warn!("triangle {} repeats a point index: {:?}", ti, tri);
            }
        }

        let triangles = triangles
            .iter()
            .map(|&[a, b, c]| [PointId::new(a), PointId::new(b), PointId::new(c)])
            .collect();

        Ok(Self { points, triangles })
    }

    /// Build a mesh from a packed `xyz` position buffer and an optional index buffer.
    ///
    /// With an index buffer, every three consecutive indices form a triangle.
    /// Without one, every three consecutive vertices form a triangle.
    pub fn from_buffers(positions: &[f32], indices: Option<&[u32]>) -> Result<Self> {
        if positions.len() % 3 != 0 {
            return Err(MeshError::InvalidBuffer {
                buffer: "position",
                len: positions.len(),
            });
        }

        let points: Vec<Point3<f64>> = positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0] as f64, c[1] as f64, c[2] as f64))
            .collect();

        let triangles: Vec<[usize; 3]> = match indices {
            Some(indices) => {
                if indices.len() % 3 != 0 {
                    return Err(MeshError::InvalidBuffer {
                        buffer: "index",
                        len: indices.len(),
                    });
                }
                indices
                    .chunks_exact(3)
                    .map(|c| [c[0] as usize, c[1] as usize, c[2] as usize])
                    .collect()
            }
            None => (0..points.len() / 3)
                .map(|t| [3 * t, 3 * t + 1, 3 * t + 2])
                .collect(),
        };

        Self::from_triangles(points, &triangles)
    }

    // ==================== Accessors ====================

    /// Get the number of points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Get the number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Check if the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Get the position of a point.
    #[inline]
    pub fn position(&self, p: PointId<I>) -> &Point3<f64> {
        &self.points[p.index()]
    }

    /// All point positions, indexed by point id.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Get the point indices of a triangle.
    #[inline]
    pub fn triangle(&self, t: TriangleId<I>) -> [PointId<I>; 3] {
        self.triangles[t.index()]
    }

    /// Iterate over all triangle IDs.
    pub fn triangle_ids(&self) -> impl Iterator<Item = TriangleId<I>> + '_ {
        (0..self.triangles.len()).map(TriangleId::new)
    }

    /// Iterate over all triangles with their IDs.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleId<I>, [PointId<I>; 3])> + '_ {
        self.triangles
            .iter()
            .enumerate()
            .map(|(i, &tri)| (TriangleId::new(i), tri))
    }

    /// Get the positions of the three corners of a triangle.
    pub fn triangle_positions(&self, t: TriangleId<I>) -> [Point3<f64>; 3] {
        let [a, b, c] = self.triangle(t);
        [*self.position(a), *self.position(b), *self.position(c)]
    }

    /// The three directed edges of a triangle, `a→b`, `b→c`, `c→a`.
    pub fn triangle_edges(&self, t: TriangleId<I>) -> [(PointId<I>, PointId<I>); 3] {
        let [a, b, c] = self.triangle(t);
        [(a, b), (b, c), (c, a)]
    }

    // ==================== Geometry ====================

    /// Compute the unit normal of a triangle (right-hand rule).
    ///
    /// Returns `None` for zero-area triangles.
    pub fn triangle_normal(&self, t: TriangleId<I>) -> Option<Vector3<f64>> {
        let [p0, p1, p2] = self.triangle_positions(t);
        let n = (p1 - p0).cross(&(p2 - p0));
        let len = n.norm();
        if len > DEGENERATE_EPSILON && len.is_finite() {
            Some(n / len)
        } else {
            None
        }
    }

    /// Compute the area of a triangle.
    pub fn triangle_area(&self, t: TriangleId<I>) -> f64 {
        let [p0, p1, p2] = self.triangle_positions(t);
        0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
    }

    /// Compute the total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        self.triangle_ids().map(|t| self.triangle_area(t)).sum()
    }

    /// Compute the 3D length of an edge.
    pub fn edge_length(&self, edge: EdgeKey<I>) -> f64 {
        (self.position(edge.hi()) - self.position(edge.lo())).norm()
    }

    /// Compute the bounding box of the mesh points.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.points.first()?;
        let mut min = *first;
        let mut max = *first;

        for p in &self.points {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        Some((min, max))
    }

    // ==================== Topology ====================

    /// Build the edge → incident triangles table.
    ///
    /// Edges that collapse onto a single point are skipped.
    pub fn edge_adjacency(&self) -> EdgeAdjacency<I, TriangleId<I>> {
        let mut adjacency = EdgeAdjacency::new();
        for t in self.triangle_ids() {
            for (u, v) in self.triangle_edges(t) {
                let key = EdgeKey::new(u, v);
                if !key.is_loop() {
                    adjacency.insert(key, t);
                }
            }
        }
        adjacency
    }

    /// Group triangles into edge-connected components.
    ///
    /// Components are listed in order of their smallest triangle index.
    pub fn connected_components(&self) -> Vec<Vec<TriangleId<I>>> {
        let adjacency = self.edge_adjacency();
        let mut visited = vec![false; self.num_triangles()];
        let mut components = Vec::new();

        for start in self.triangle_ids() {
            if visited[start.index()] {
                continue;
            }
            visited[start.index()] = true;

            let mut component = Vec::new();
            let mut queue = VecDeque::from([start]);
            while let Some(t) = queue.pop_front() {
                component.push(t);
                for (u, v) in self.triangle_edges(t) {
                    for &other in adjacency.incident(EdgeKey::new(u, v)) {
                        if !visited[other.index()] {
                            visited[other.index()] = true;
                            queue.push_back(other);
                        }
                    }
                }
            }
            components.push(component);
        }

        components
    }

    /// Convert back to a face-vertex representation.
    pub fn to_face_vertex(&self) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let triangles = self
            .triangles
            .iter()
            .map(|[a, b, c]| [a.index(), b.index(), c.index()])
            .collect();
        (self.points.clone(), triangles)
    }
}
