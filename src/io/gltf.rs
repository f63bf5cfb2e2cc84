//! glTF and GLB input.
//!
//! All triangle primitives of all meshes in the document are concatenated
//! into one [`TriangleMesh`]. Node transforms are ignored.

use std::path::Path;

use ::gltf::mesh::Mode;
use nalgebra::Point3;
use tracing::debug;

use crate::error::{MeshError, Result};
use crate::mesh::{MeshIndex, TriangleMesh};

/// Load a mesh from a glTF or GLB file.
///
/// # Example
///
/// ```no_run
/// use netcraft::io::gltf;
/// use netcraft::mesh::TriangleMesh;
///
/// let mesh: TriangleMesh = gltf::load("model.glb").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<TriangleMesh<I>> {
    let path = path.as_ref();
    let imported = ::gltf::import(path).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    collect(imported, path)
}

/// Load a mesh from an in-memory glTF or GLB document. `path` is only used in errors.
pub(crate) fn read_slice<I: MeshIndex>(bytes: &[u8], path: &Path) -> Result<TriangleMesh<I>> {
    let imported = ::gltf::import_slice(bytes).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    collect(imported, path)
}

fn collect<I: MeshIndex>(
    (document, buffers, _images): (
        ::gltf::Document,
        Vec<::gltf::buffer::Data>,
        Vec<::gltf::image::Data>,
    ),
    path: &Path,
) -> Result<TriangleMesh<I>> {
    let mut points: Vec<Point3<f64>> = Vec::new();
    let mut triangles: Vec<[usize; 3]> = Vec::new();

    for mesh in document.meshes() {
        for primitive in mesh.primitives() {
            let mode = primitive.mode();
            if !matches!(mode, Mode::Triangles | Mode::TriangleStrip | Mode::TriangleFan) {
                debug!("skipping {:?} primitive of mesh {}", mode, mesh.index());
                continue;
            }

            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
            let Some(positions) = reader.read_positions() else {
                continue;
            };

            let offset = points.len();
            points.extend(positions.map(|p| Point3::new(p[0] as f64, p[1] as f64, p[2] as f64)));
            let count = points.len() - offset;

            // Non-indexed primitives use the vertices in order
            let indices: Vec<usize> = match reader.read_indices() {
                Some(indices) => indices.into_u32().map(|i| i as usize + offset).collect(),
                None => (offset..offset + count).collect(),
            };

            match mode {
                Mode::Triangles => {
                    triangles.extend(indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]));
                }
                Mode::TriangleStrip => {
                    for i in 0..indices.len().saturating_sub(2) {
                        // Odd triangles of a strip are wound the other way
                        if i % 2 == 0 {
                            triangles.push([indices[i], indices[i + 1], indices[i + 2]]);
                        } else {
                            triangles.push([indices[i], indices[i + 2], indices[i + 1]]);
                        }
                    }
                }
                _ => {
                    for i in 1..indices.len().saturating_sub(1) {
                        triangles.push([indices[0], indices[i], indices[i + 1]]);
                    }
                }
            }
        }
    }

    if triangles.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "glTF file contains no triangle meshes".to_string(),
        });
    }

    TriangleMesh::from_triangles(points, &triangles)
}
