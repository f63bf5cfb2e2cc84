//! PLY (Stanford polygon) input.
//!
//! Polygons with more than three corners are fan-triangulated; the unfolder
//! merges the resulting coplanar triangles back into one face.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};
use tracing::warn;

use crate::error::{MeshError, Result};
use crate::mesh::{MeshIndex, TriangleMesh};

/// Load a mesh from a PLY file (ASCII or binary).
///
/// # Example
///
/// ```no_run
/// use netcraft::io::ply;
/// use netcraft::mesh::TriangleMesh;
///
/// let mesh: TriangleMesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<TriangleMesh<I>> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    read(&mut reader, path)
}

/// Read a PLY mesh from any buffered reader. `path` is only used in errors.
pub(crate) fn read<R: BufRead, I: MeshIndex>(reader: &mut R, path: &Path) -> Result<TriangleMesh<I>> {
    let load_error = |message: &str| MeshError::LoadError {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(reader)
        .map_err(|e| load_error(&e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error("PLY file has no vertex element"))?;

    let mut points = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let coord = |name| {
            get_float_property(vertex, name).ok_or_else(|| load_error("vertex is missing a coordinate"))
        };
        points.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));
    }

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error("PLY file has no face element"))?;

    let mut triangles: Vec<[usize; 3]> = Vec::with_capacity(face_element.len());
    for (fi, face) in face_element.iter().enumerate() {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| load_error("face is missing the vertex_indices property"))?;

        if indices.len() < 3 {
            warn!("skipping PLY face {} with {} corners", fi, indices.len());
            continue;
        }
        triangles.extend((1..indices.len() - 1).map(|i| [indices[0], indices[i], indices[i + 1]]));
    }

    if triangles.is_empty() {
        return Err(load_error("PLY file contains no faces"));
    }

    TriangleMesh::from_triangles(points, &triangles)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}
