//! Error types for netcraft.
//!
//! Two layers of errors are used throughout the library:
//!
//! - [`GeometryError`] describes a problem with the geometry of one element
//!   (an edge, a face). Most of them are recovered locally: the flattener
//!   stores them next to the face that could not be placed instead of
//!   aborting the whole net.
//! - [`MeshError`] is the error returned by fallible library calls. It wraps
//!   [`GeometryError`] for the structural problems that cannot be recovered
//!   from, such as non-manifold edges.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Geometric problems detected while merging, building the forest or flattening.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// An edge is shared by more than two triangles or faces.
    #[error("edge ({a}, {b}) is shared by {count} elements")]
    NonManifoldEdge {
        /// Smaller point index of the edge.
        a: usize,
        /// Larger point index of the edge.
        b: usize,
        /// Number of incident elements.
        count: usize,
    },

    /// A merged face has fewer than three boundary points.
    #[error("face {face} is degenerate ({points} boundary points)")]
    DegenerateFace {
        /// The face index.
        face: usize,
        /// Number of points in the face cycle.
        points: usize,
    },

    /// The hinge edge used to place a face has (near) zero length.
    #[error("face {face} has a zero-length edge ({a}, {b})")]
    ZeroLengthEdge {
        /// The face index.
        face: usize,
        /// First point of the edge.
        a: usize,
        /// Second point of the edge.
        b: usize,
    },

    /// No plane could be fitted to the face (all points collinear or coincident).
    #[error("face {face} has no well-defined plane")]
    DegenerateBasis {
        /// The face index.
        face: usize,
    },

    /// The hinge edge does not belong to the face being placed.
    #[error("edge ({a}, {b}) is not on the boundary of face {face}")]
    HingeNotOnFace {
        /// The face index.
        face: usize,
        /// First point of the edge.
        a: usize,
        /// Second point of the edge.
        b: usize,
    },

    /// The face could not be placed because its parent in the unfold tree failed.
    #[error("face {face} was not placed because its parent could not be flattened")]
    ParentNotPlaced {
        /// The face index.
        face: usize,
    },
}

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A triangle references an invalid point index.
    #[error("triangle {triangle} references invalid point index {point}")]
    InvalidVertexIndex {
        /// The triangle index.
        triangle: usize,
        /// The invalid point index.
        point: usize,
    },

    /// More elements than the mesh index type can address.
    #[error("{count} {element} exceed the capacity of the index type (max index {max})")]
    IndexOverflow {
        /// Which elements overflowed.
        element: &'static str,
        /// Number of elements.
        count: usize,
        /// Largest index the index type can hold.
        max: usize,
    },

    /// A vertex or index buffer does not have a valid length.
    #[error("invalid {buffer} buffer: length {len} is not a multiple of 3")]
    InvalidBuffer {
        /// Which buffer was rejected.
        buffer: &'static str,
        /// The buffer length.
        len: usize,
    },

    /// Structural geometry problem.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving to file.
    #[error("failed to save to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
