//! SVG output for unfolded nets.
//!
//! Every placed face outline becomes one `<polygon>`, grouped per fragment.
//! Faces that could not be placed are left out. Coordinates are written in
//! model units; the `viewBox` spans the bounding box of all outlines.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::algo::unfold::Unfolded;
use crate::error::{MeshError, Result};
use crate::mesh::MeshIndex;

/// Options for SVG output.
#[derive(Debug, Clone)]
pub struct SvgOptions {
    /// Outline stroke width, in model units.
    pub stroke_width: f64,

    /// Extra space around the bounding box, in model units.
    pub margin: f64,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            stroke_width: 0.02,
            margin: 0.0,
        }
    }
}

impl SvgOptions {
    /// Set the stroke width.
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    /// Set the margin around the drawing.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Check the options for invalid values.
    pub fn validate(&self) -> Result<()> {
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(MeshError::invalid_param(
                "stroke_width",
                self.stroke_width,
                "must be positive and finite",
            ));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(MeshError::invalid_param(
                "margin",
                self.margin,
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// Render an unfolded net as an SVG document.
///
/// Points are written in net coordinates without flipping Y. SVG's Y axis
/// points down, so the drawing is the net mirrored across the X axis.
/// Counter-clockwise outlines appear clockwise on the page.
///
/// # Example
///
/// ```
/// use netcraft::algo::unfold::Unfolded;
/// use netcraft::io::svg::{to_svg_string, SvgOptions};
///
/// let empty: Unfolded = Unfolded::default();
/// let svg = to_svg_string(&empty, &SvgOptions::default());
/// assert!(svg.contains(r#"viewBox="0 0 0 0""#));
/// ```
pub fn to_svg_string<I: MeshIndex>(unfolded: &Unfolded<I>, options: &SvgOptions) -> String {
    let mut svg = String::new();

    let (min_x, min_y, width, height) = match unfolded.bounding_box() {
        Some((min, max)) => (
            min.x - options.margin,
            min.y - options.margin,
            max.x - min.x + 2.0 * options.margin,
            max.y - min.y + 2.0 * options.margin,
        ),
        None => (0.0, 0.0, 0.0, 0.0),
    };

    // Writing into a String cannot fail
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
        min_x, min_y, width, height
    );

    for (fi, fragment) in unfolded.fragments.iter().enumerate() {
        if fragment.polygons().next().is_none() {
            continue;
        }
        let _ = writeln!(
            svg,
            r#"  <g id="fragment-{}" fill="none" stroke="black" stroke-width="{}">"#,
            fi, options.stroke_width
        );
        for piece in &fragment.pieces {
            let Some(polygon) = piece.polygon() else {
                continue;
            };
            let points: Vec<String> = polygon
                .points
                .iter()
                .map(|p| format!("{},{}", p.x, p.y))
                .collect();
            let _ = writeln!(
                svg,
                r#"    <polygon data-face="{}" points="{}"/>"#,
                piece.face.index(),
                points.join(" ")
            );
        }
        let _ = writeln!(svg, "  </g>");
    }

    svg.push_str("</svg>\n");
    svg
}

/// Write an unfolded net as SVG.
pub fn write_svg<W: Write, I: MeshIndex>(
    writer: &mut W,
    unfolded: &Unfolded<I>,
    options: &SvgOptions,
) -> Result<()> {
    options.validate()?;
    writer.write_all(to_svg_string(unfolded, options).as_bytes())?;
    Ok(())
}

/// Save an unfolded net to an SVG file.
pub fn save<P: AsRef<Path>, I: MeshIndex>(
    unfolded: &Unfolded<I>,
    path: P,
    options: &SvgOptions,
) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_svg(&mut writer, unfolded, options)?;
    writer.flush().map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
