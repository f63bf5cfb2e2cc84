//! Core mesh data structures.
//!
//! This module provides the indexed triangle mesh consumed by the unfolding
//! pipeline, together with the edge keys and adjacency tables shared by all
//! of its stages.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`PointId`] - Identifies a point (vertex position)
//! - [`TriangleId`] - Identifies an input triangle
//! - [`FaceId`] - Identifies a merged polygonal face
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! ```
//! use netcraft::mesh::TriangleMesh;
//! use nalgebra::Point3;
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let mesh: TriangleMesh = TriangleMesh::from_triangles(points, &[[0, 1, 2]]).unwrap();
//! assert_eq!(mesh.edge_adjacency().edge_count(), 3);
//! ```

mod adjacency;
mod edge;
mod index;
mod triangle_mesh;

pub use adjacency::EdgeAdjacency;
pub use edge::{cyclic_pairs, EdgeKey};
pub use index::{FaceId, MeshIndex, PointId, TriangleId};
pub use triangle_mesh::{TriangleMesh, DEGENERATE_EPSILON};
