//! Papercraft unfolding.
//!
//! Turns a closed (or open) triangle mesh into flat nets that can be printed,
//! cut out and folded back into the original shape.
//!
//! # Pipeline
//!
//! 1. [`merge_faces`]: adjacent near-coplanar triangles are merged into
//!    polygonal faces.
//! 2. [`build_forest`]: a spanning tree is built over the face adjacency
//!    graph of every connected component, preferring short hinges.
//! 3. [`flatten`]: every tree is rigidly unfolded into the plane, one
//!    [`Fragment`] per tree.
//!
//! [`unfold`] runs the three stages in one call.
//!
//! # Example
//!
//! ```
//! use netcraft::algo::unfold::{unfold, UnfoldOptions};
//! use netcraft::mesh::TriangleMesh;
//! use nalgebra::Point3;
//!
//! // A tetrahedron
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//! ];
//! let triangles = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//! let mesh: TriangleMesh = TriangleMesh::from_triangles(points, &triangles).unwrap();
//!
//! let unfolding = unfold(&mesh, &UnfoldOptions::default()).unwrap();
//! assert_eq!(unfolding.unfolded.len(), 1);
//! assert_eq!(unfolding.unfolded.num_polygons(), 4);
//! ```

mod flatten;
mod forest;
mod layout;
mod merge;

#[cfg(test)]
mod test_meshes;

pub use flatten::{flatten, FlattenOptions};
pub use forest::{build_forest, face_adjacency, Forest, TreeNode, UnfoldTree};
pub use layout::{ArrangeOptions, Fragment, UnfoldedPiece, UnfoldedPolygon, Unfolded};
pub use merge::{merge_faces, Face, MergeOptions, MergedFaces};

use tracing::info;

use super::progress::Progress;
use crate::error::Result;
use crate::mesh::{MeshIndex, TriangleMesh};

/// Options for the full unfolding pipeline.
#[derive(Debug, Clone, Default)]
pub struct UnfoldOptions {
    /// Face merging options.
    pub merge: MergeOptions,

    /// Flattening options.
    pub flatten: FlattenOptions,
}

impl UnfoldOptions {
    /// Set the coplanarity tolerance in radians.
    pub fn with_angle_tolerance(mut self, angle_tolerance: f64) -> Self {
        self.merge.angle_tolerance = angle_tolerance;
        self
    }

    /// Set the zero threshold used while flattening.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.flatten.epsilon = epsilon;
        self
    }

    /// Enable or disable parallel execution in every stage.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.merge.parallel = parallel;
        self.flatten.parallel = parallel;
        self
    }
}

/// Every stage of an unfolding.
#[derive(Debug, Clone)]
pub struct Unfolding<I: MeshIndex = u32> {
    /// Merged faces with the triangle adjacency and edge lengths.
    pub faces: MergedFaces<I>,

    /// Spanning forest over the faces.
    pub forest: Forest<I>,

    /// The flattened nets.
    pub unfolded: Unfolded<I>,
}

/// Unfold a mesh into flat nets.
///
/// # Errors
///
/// Returns an error if the options are invalid or an edge of the mesh is
/// shared by more than two triangles. Faces that cannot be flattened do not
/// cause an error; they are reported inside [`Unfolded`].
pub fn unfold<I: MeshIndex>(mesh: &TriangleMesh<I>, options: &UnfoldOptions) -> Result<Unfolding<I>> {
    unfold_with_progress(mesh, options, &Progress::none())
}

/// Unfold a mesh into flat nets, reporting each stage.
pub fn unfold_with_progress<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
    options: &UnfoldOptions,
    progress: &Progress,
) -> Result<Unfolding<I>> {
    const STAGES: usize = 3;

    progress.report(0, STAGES, "Merging coplanar faces");
    let faces = merge_faces(mesh, &options.merge)?;

    progress.report(1, STAGES, "Building spanning forest");
    let forest = build_forest(&faces)?;

    progress.report(2, STAGES, "Flattening");
    let unfolded = flatten(mesh, &forest, &faces.faces, &options.flatten)?;

    progress.report(STAGES, STAGES, "Done");
    info!(
        "unfolded {} triangles into {} faces, {} fragments",
        mesh.num_triangles(),
        faces.faces.len(),
        unfolded.len()
    );

    Ok(Unfolding {
        faces,
        forest,
        unfolded,
    })
}
