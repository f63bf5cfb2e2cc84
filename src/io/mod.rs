//! Mesh input and net output.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | STL | `.stl` | ✓ | ✗ | Binary and ASCII |
//! | PLY | `.ply` | ✓ | ✗ | Polygons are fan-triangulated |
//! | glTF | `.gltf`, `.glb` | ✓ | ✗ | All triangle primitives |
//! | SVG | `.svg` | ✗ | ✓ | Unfolded nets |
//! | JSON | `.json` | ✗ | ✓ | Unfolded nets |
//!
//! # Usage
//!
//! ```no_run
//! use netcraft::algo::unfold::{unfold, UnfoldOptions};
//! use netcraft::io::{load, save, svg::SvgOptions};
//! use netcraft::mesh::TriangleMesh;
//!
//! let mesh: TriangleMesh = load("model.stl").unwrap();
//! let unfolding = unfold(&mesh, &UnfoldOptions::default()).unwrap();
//! save(&unfolding.unfolded, "net.svg", &SvgOptions::default()).unwrap();
//! ```

pub mod gltf;
pub mod json;
pub mod ply;
pub mod stl;
pub mod svg;

use std::path::Path;

use crate::algo::unfold::Unfolded;
use crate::error::{MeshError, Result};
use crate::mesh::{MeshIndex, TriangleMesh};

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// STL (stereolithography) format.
    Stl,
    /// PLY (Stanford polygon) format.
    Ply,
    /// glTF format.
    Gltf,
    /// glTF binary format.
    Glb,
    /// SVG drawing of an unfolded net.
    Svg,
    /// JSON dump of an unfolded net.
    Json,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "stl" => Some(Format::Stl),
            "ply" => Some(Format::Ply),
            "gltf" => Some(Format::Gltf),
            "glb" => Some(Format::Glb),
            "svg" => Some(Format::Svg),
            "json" => Some(Format::Json),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }

    /// Check if meshes can be loaded from this format.
    pub fn is_mesh(self) -> bool {
        matches!(self, Format::Stl | Format::Ply | Format::Gltf | Format::Glb)
    }
}

fn unsupported(path: &Path) -> MeshError {
    MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    }
}

/// Load a mesh from a file with automatic format detection.
///
/// The format is determined by the file extension.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<TriangleMesh<I>> {
    let path = path.as_ref();
    match Format::from_path(path) {
        Some(Format::Stl) => stl::load(path),
        Some(Format::Ply) => ply::load(path),
        Some(Format::Gltf | Format::Glb) => gltf::load(path),
        Some(Format::Svg | Format::Json) | None => Err(unsupported(path)),
    }
}

/// Save an unfolded net with automatic format detection.
///
/// The format is determined by the file extension. `svg` is ignored for
/// JSON output.
pub fn save<P: AsRef<Path>, I: MeshIndex>(
    unfolded: &Unfolded<I>,
    path: P,
    svg: &svg::SvgOptions,
) -> Result<()> {
    let path = path.as_ref();
    match Format::from_path(path) {
        Some(Format::Svg) => svg::save(unfolded, path, svg),
        Some(Format::Json) => json::save(unfolded, path),
        Some(_) | None => Err(unsupported(path)),
    }
}
