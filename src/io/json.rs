//! JSON output for unfolded nets.
//!
//! ```json
//! { "fragments": [ { "root": 0, "pieces": [
//!     { "face": 0, "points": [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]] },
//!     { "face": 3, "error": "face 3 has no well-defined plane" }
//! ] } ] }
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algo::unfold::{Fragment, UnfoldedPiece, Unfolded};
use crate::error::{MeshError, Result};
use crate::mesh::MeshIndex;

/// Serialized form of an [`Unfolded`] net.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetDocument {
    /// One entry per fragment, in forest order.
    pub fragments: Vec<FragmentRecord>,
}

/// Serialized form of a [`Fragment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentRecord {
    /// Root face index.
    pub root: usize,
    /// Pieces in pre-order.
    pub pieces: Vec<PieceRecord>,
}

/// Serialized form of an [`UnfoldedPiece`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PieceRecord {
    /// A placed face.
    Placed {
        /// Face index.
        face: usize,
        /// Outline as `[x, y]` pairs.
        points: Vec<[f64; 2]>,
    },
    /// A face that could not be placed.
    Failed {
        /// Face index.
        face: usize,
        /// Why the face was not placed.
        error: String,
    },
}

impl<I: MeshIndex> From<&UnfoldedPiece<I>> for PieceRecord {
    fn from(piece: &UnfoldedPiece<I>) -> Self {
        let face = piece.face.index();
        match &piece.outline {
            Ok(polygon) => PieceRecord::Placed {
                face,
                points: polygon.points.iter().map(|p| [p.x, p.y]).collect(),
            },
            Err(e) => PieceRecord::Failed {
                face,
                error: e.to_string(),
            },
        }
    }
}

impl<I: MeshIndex> From<&Fragment<I>> for FragmentRecord {
    fn from(fragment: &Fragment<I>) -> Self {
        Self {
            root: fragment.root.index(),
            pieces: fragment.pieces.iter().map(PieceRecord::from).collect(),
        }
    }
}

impl<I: MeshIndex> From<&Unfolded<I>> for NetDocument {
    fn from(unfolded: &Unfolded<I>) -> Self {
        Self {
            fragments: unfolded.fragments.iter().map(FragmentRecord::from).collect(),
        }
    }
}

/// Render an unfolded net as pretty-printed JSON.
pub fn to_json_string<I: MeshIndex>(unfolded: &Unfolded<I>) -> Result<String> {
    serde_json::to_string_pretty(&NetDocument::from(unfolded))
        .map_err(|e| MeshError::Io(e.into()))
}

/// Write an unfolded net as JSON.
pub fn write_json<W: Write, I: MeshIndex>(writer: &mut W, unfolded: &Unfolded<I>) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &NetDocument::from(unfolded))
        .map_err(|e| MeshError::Io(e.into()))?;
    writeln!(writer)?;
    Ok(())
}

/// Save an unfolded net to a JSON file.
pub fn save<P: AsRef<Path>, I: MeshIndex>(unfolded: &Unfolded<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_json(&mut writer, unfolded)?;
    writer.flush().map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
