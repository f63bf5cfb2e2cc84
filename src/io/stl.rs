//! STL (stereolithography) input.
//!
//! STL stores every triangle with its own copy of its corners. The reader
//! welds corners with identical coordinates so that neighbouring triangles
//! share their edges, which the unfolder relies on.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use nalgebra::Point3;
use tracing::debug;

use crate::error::{MeshError, Result};
use crate::mesh::{MeshIndex, TriangleMesh};

/// Load a mesh from an STL file.
///
/// Automatically detects binary vs ASCII format.
///
/// # Example
///
/// ```no_run
/// use netcraft::io::stl;
/// use netcraft::mesh::TriangleMesh;
///
/// let mesh: TriangleMesh = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<TriangleMesh<I>> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    read(&mut reader, path)
}

/// Read an STL mesh from any seekable reader. `path` is only used in errors.
pub(crate) fn read<R: Read + Seek, I: MeshIndex>(reader: &mut R, path: &Path) -> Result<TriangleMesh<I>> {
    let load_error = |message: String| MeshError::LoadError {
        path: path.to_path_buf(),
        message,
    };

    // read_stl welds bitwise identical vertices
    let stl = stl_io::read_stl(reader).map_err(|e| load_error(e.to_string()))?;
    if stl.faces.is_empty() {
        return Err(load_error("STL file contains no triangles".to_string()));
    }

    let points: Vec<Point3<f64>> = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();
    let triangles: Vec<[usize; 3]> = stl.faces.iter().map(|f| f.vertices).collect();

    debug!(
        "read STL with {} triangles and {} distinct points",
        triangles.len(),
        points.len()
    );

    TriangleMesh::from_triangles(points, &triangles)
}
