//! # Netcraft
//!
//! Papercraft unfolding of triangle meshes.
//!
//! Netcraft turns a 3D triangle mesh into flat nets: polygons laid out in the
//! plane that can be printed, cut out and folded back into the original
//! shape. Near-coplanar triangles are merged into polygonal faces first, so a
//! cube unfolds into six squares rather than twelve triangles.
//!
//! ## Features
//!
//! - **Face merging**: flood fill of adjacent triangles within an angular tolerance
//! - **Spanning forests**: one unfold tree per connected component, short hinges first
//! - **Rigid flattening**: every face keeps its exact shape and size
//! - **Local failures**: faces that cannot be flattened are reported, not fatal
//! - **File formats**: STL, PLY and glTF in; SVG and JSON out
//! - **Flexible indexing**: 16-bit, 32-bit and 64-bit indices
//!
//! ## Quick Start
//!
//! ```no_run
//! use netcraft::prelude::*;
//!
//! let mesh: TriangleMesh = netcraft::io::load("model.stl").unwrap();
//! let mut unfolding = unfold(&mesh, &UnfoldOptions::default()).unwrap();
//! unfolding.unfolded.arrange(&ArrangeOptions::default()).unwrap();
//!
//! netcraft::io::save(&unfolding.unfolded, "net.svg", &SvgOptions::default()).unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use netcraft::prelude::*;
//! use nalgebra::Point3;
//!
//! // Two triangles folded along their shared edge
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//! ];
//! let mesh: TriangleMesh = TriangleMesh::from_triangles(points, &[[0, 1, 2], [1, 0, 3]]).unwrap();
//!
//! let unfolding = unfold(&mesh, &UnfoldOptions::default()).unwrap();
//! assert_eq!(unfolding.faces.faces.len(), 2);
//! assert_eq!(unfolding.unfolded.len(), 1);
//!
//! // Unfolding preserves area
//! let area: f64 = unfolding.unfolded.polygons().map(|p| p.area()).sum();
//! assert!((area - mesh.surface_area()).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use netcraft::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::unfold::{
        unfold, ArrangeOptions, Fragment, UnfoldOptions, Unfolded, UnfoldedPiece,
        UnfoldedPolygon, Unfolding,
    };
    pub use crate::algo::Progress;
    pub use crate::error::{GeometryError, MeshError, Result};
    pub use crate::io::svg::SvgOptions;
    pub use crate::mesh::{EdgeKey, FaceId, MeshIndex, PointId, TriangleId, TriangleMesh};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
