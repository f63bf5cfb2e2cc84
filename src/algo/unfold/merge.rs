//! Coplanar face merging.
//!
//! Adjacent triangles whose normals differ by less than an angular tolerance
//! are flood-filled into clusters. Every cluster becomes one polygonal
//! [`Face`] whose boundary is the cycle of edges used by exactly one triangle
//! of the cluster.

use std::collections::VecDeque;

use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{MeshError, Result};
use crate::mesh::{cyclic_pairs, EdgeAdjacency, EdgeKey, MeshIndex, PointId, TriangleId, TriangleMesh};

/// Options for coplanar face merging.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Maximum angle (radians) between two triangle normals for the triangles
    /// to be merged into the same face. The comparison is strict.
    pub angle_tolerance: f64,

    /// Compute triangle normals in parallel.
    pub parallel: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            angle_tolerance: 0.001,
            parallel: true,
        }
    }
}

impl MergeOptions {
    /// Set the angular tolerance in radians.
    pub fn with_angle_tolerance(mut self, angle_tolerance: f64) -> Self {
        self.angle_tolerance = angle_tolerance;
        self
    }

    /// Enable or disable parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check the options for invalid values.
    pub fn validate(&self) -> Result<()> {
        if !self.angle_tolerance.is_finite() || self.angle_tolerance <= 0.0 {
            return Err(MeshError::invalid_param(
                "angle_tolerance",
                self.angle_tolerance,
                "must be a positive finite angle in radians",
            ));
        }
        Ok(())
    }
}

/// A flat polygonal face made of one or more coplanar triangles.
#[derive(Debug, Clone, PartialEq)]
pub struct Face<I: MeshIndex = u32> {
    /// Boundary cycle, oriented to agree with `normal`.
    pub points: Vec<PointId<I>>,

    /// The input triangles merged into this face.
    pub triangles: Vec<TriangleId<I>>,

    /// Unit normal of the first triangle of the cluster.
    /// `None` when that triangle has zero area.
    pub normal: Option<Vector3<f64>>,
}

impl<I: MeshIndex> Face<I> {
    /// Number of points in the boundary cycle.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the boundary cycle is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A face with fewer than three boundary points cannot be flattened.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3
    }

    /// Whether the face spans a plane: at least three points and a normal.
    /// Only such faces can carry hinges.
    #[inline]
    pub fn has_plane(&self) -> bool {
        !self.is_degenerate() && self.normal.is_some()
    }

    /// Position of a point within the boundary cycle.
    pub fn position_of(&self, p: PointId<I>) -> Option<usize> {
        self.points.iter().position(|&q| q == p)
    }

    /// The boundary edges of the face, in cycle order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeKey<I>> + '_ {
        cyclic_pairs(&self.points).map(|(a, b)| EdgeKey::new(a, b))
    }
}

/// Output of [`merge_faces`].
#[derive(Debug, Clone)]
pub struct MergedFaces<I: MeshIndex = u32> {
    /// The merged faces, in order of their first triangle.
    pub faces: Vec<Face<I>>,

    /// Triangle-level edge adjacency.
    pub triangle_adjacency: EdgeAdjacency<I, TriangleId<I>>,

    /// 3D length of every mesh edge.
    pub edge_lengths: HashMap<EdgeKey<I>, f64>,
}

impl<I: MeshIndex> MergedFaces<I> {
    /// 3D length of an edge; `None` if the edge is not part of the mesh.
    pub fn edge_length(&self, edge: EdgeKey<I>) -> Option<f64> {
        self.edge_lengths.get(&edge).copied()
    }
}

/// Merge adjacent near-coplanar triangles into polygonal faces.
///
/// # Errors
///
/// Returns an error if the options are invalid or if an edge is shared by
/// more than two triangles.
///
/// # Example
///
/// ```
/// use netcraft::algo::unfold::{merge_faces, MergeOptions};
/// use netcraft::mesh::TriangleMesh;
/// use nalgebra::Point3;
///
/// // A unit square split along its diagonal
/// let points = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh: TriangleMesh = TriangleMesh::from_triangles(points, &[[0, 1, 2], [0, 2, 3]]).unwrap();
///
/// let merged = merge_faces(&mesh, &MergeOptions::default()).unwrap();
/// assert_eq!(merged.faces.len(), 1);
/// assert_eq!(merged.faces[0].len(), 4);
/// ```
pub fn merge_faces<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
    options: &MergeOptions,
) -> Result<MergedFaces<I>> {
    options.validate()?;

    let triangle_adjacency = mesh.edge_adjacency();
    triangle_adjacency.check_manifold()?;

    let mut edge_lengths: HashMap<EdgeKey<I>, f64> =
        HashMap::with_capacity(triangle_adjacency.edge_count());
    for t in mesh.triangle_ids() {
        for (u, v) in mesh.triangle_edges(t) {
            let key = EdgeKey::new(u, v);
            if !key.is_loop() {
                edge_lengths
                    .entry(key)
                    .or_insert_with(|| mesh.edge_length(key));
            }
        }
    }

    let normals: Vec<Option<Vector3<f64>>> = if options.parallel {
        (0..mesh.num_triangles())
            .into_par_iter()
            .map(|i| mesh.triangle_normal(TriangleId::new(i)))
            .collect()
    } else {
        mesh.triangle_ids().map(|t| mesh.triangle_normal(t)).collect()
    };

    let mut visited = vec![false; mesh.num_triangles()];
    let mut faces = Vec::new();

    for start in mesh.triangle_ids() {
        if visited[start.index()] {
            continue;
        }
        visited[start.index()] = true;

        let cluster = grow_cluster(
            mesh,
            &triangle_adjacency,
            &normals,
            start,
            options.angle_tolerance,
            &mut visited,
        );
        let face = build_face(mesh, cluster, normals[start.index()]);
        if face.is_degenerate() {
            debug!(
                "face {} from triangle {:?} is degenerate ({} points)",
                faces.len(),
                start,
                face.len()
            );
        }
        faces.push(face);
    }

    debug!(
        "merged {} triangles into {} faces",
        mesh.num_triangles(),
        faces.len()
    );

    Ok(MergedFaces {
        faces,
        triangle_adjacency,
        edge_lengths,
    })
}

/// Breadth-first flood fill across edges between near-parallel triangles.
fn grow_cluster<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
    adjacency: &EdgeAdjacency<I, TriangleId<I>>,
    normals: &[Option<Vector3<f64>>],
    start: TriangleId<I>,
    angle_tolerance: f64,
    visited: &mut [bool],
) -> Vec<TriangleId<I>> {
    let mut cluster = Vec::new();
    let mut queue = VecDeque::from([start]);

    while let Some(t) = queue.pop_front() {
        cluster.push(t);
        let Some(normal) = normals[t.index()] else {
            continue;
        };

        for (u, v) in mesh.triangle_edges(t) {
            let Some(other) = adjacency.opposite(EdgeKey::new(u, v), t) else {
                continue;
            };
            if visited[other.index()] {
                continue;
            }
            let joins = normals[other.index()]
                .map_or(false, |other_normal| normal.angle(&other_normal) < angle_tolerance);
            if joins {
                visited[other.index()] = true;
                queue.push_back(other);
            }
        }
    }

    cluster
}

/// Extract the oriented boundary cycle of a triangle cluster.
fn build_face<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
    triangles: Vec<TriangleId<I>>,
    normal: Option<Vector3<f64>>,
) -> Face<I> {
    // Parity per edge, remembering the first directed occurrence so the walk
    // below starts in the winding direction of the triangles.
    let mut parity: HashMap<EdgeKey<I>, bool> = HashMap::new();
    let mut order: Vec<(EdgeKey<I>, (PointId<I>, PointId<I>))> = Vec::new();
    for &t in &triangles {
        for (u, v) in mesh.triangle_edges(t) {
            let key = EdgeKey::new(u, v);
            if key.is_loop() {
                continue;
            }
            let odd = parity.entry(key).or_insert_with(|| {
                order.push((key, (u, v)));
                false
            });
            *odd = !*odd;
        }
    }

    let boundary: Vec<(PointId<I>, PointId<I>)> = order
        .into_iter()
        .filter(|(key, _)| parity.get(key).copied().unwrap_or(false))
        .map(|(_, directed)| directed)
        .collect();

    let mut loops = trace_boundary_loops(&boundary);
    let points = if loops.len() > 1 {
        let areas: Vec<f64> = loops
            .iter()
            .map(|cycle| vector_area(cycle.iter().map(|&p| mesh.position(p))).norm())
            .collect();
        let best = areas
            .iter()
            .enumerate()
            .fold(0, |best, (i, &a)| if a > areas[best] { i } else { best });
        debug!(
            "cluster of {} triangles has {} boundary loops; keeping loop {} ({} points)",
            triangles.len(),
            loops.len(),
            best,
            loops[best].len()
        );
        loops.swap_remove(best)
    } else {
        loops.pop().unwrap_or_default()
    };

    let points = match normal {
        Some(n) if points.len() >= 3 => orient_cycle(mesh, points, &n),
        _ => points,
    };

    Face {
        points,
        triangles,
        normal,
    }
}

/// Walk undirected boundary edges into closed point cycles.
///
/// Each edge is used exactly once. At a vertex with more than two boundary
/// edges the first unused edge is taken.
fn trace_boundary_loops<I: MeshIndex>(edges: &[(PointId<I>, PointId<I>)]) -> Vec<Vec<PointId<I>>> {
    let mut incident: HashMap<PointId<I>, Vec<usize>> = HashMap::new();
    for (i, &(u, v)) in edges.iter().enumerate() {
        incident.entry(u).or_default().push(i);
        incident.entry(v).or_default().push(i);
    }

    let mut used = vec![false; edges.len()];
    let mut loops = Vec::new();

    for first in 0..edges.len() {
        if used[first] {
            continue;
        }
        used[first] = true;

        let (start, mut current) = edges[first];
        let mut cycle = vec![start];

        while current != start {
            cycle.push(current);
            let next = incident
                .get(&current)
                .and_then(|list| list.iter().copied().find(|&e| !used[e]));
            match next {
                Some(e) => {
                    used[e] = true;
                    let (u, v) = edges[e];
                    current = if u == current { v } else { u };
                }
                None => {
                    warn!("boundary walk from {:?} did not close", start);
                    break;
                }
            }
        }

        loops.push(cycle);
    }

    loops
}

/// Flip the winding of a cycle (keeping its first point) if its normal
/// opposes the reference normal.
fn orient_cycle<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
    mut points: Vec<PointId<I>>,
    reference: &Vector3<f64>,
) -> Vec<PointId<I>> {
    let area = vector_area(points.iter().map(|&p| mesh.position(p)));
    if area.dot(reference) < 0.0 {
        points[1..].reverse();
    }
    points
}

/// Vector area of a closed 3D polygon (Newell's method).
///
/// Its direction is the polygon normal, its length the polygon area. For a
/// triangle this is half the cross product of two of its edges.
pub(crate) fn vector_area<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Vector3<f64> {
    let points: Vec<&Point3<f64>> = points.collect();
    let Some(origin) = points.first() else {
        return Vector3::zeros();
    };

    let mut sum = Vector3::zeros();
    for (a, b) in cyclic_pairs(&points) {
        sum += (a - *origin).cross(&(b - *origin));
    }
    sum * 0.5
}
