//! Unfolded nets and their arrangement on a sheet.
//!
//! The flattener produces one [`Fragment`] per spanning tree. Every fragment
//! holds one [`UnfoldedPiece`] per face: either the placed 2D outline or the
//! reason the face could not be placed.

use nalgebra::{Point2, Vector2};
use tracing::debug;

use crate::error::{GeometryError, MeshError, Result};
use crate::mesh::{cyclic_pairs, FaceId, MeshIndex};

/// Bounding box of a set of 2D points as `(min, max)`.
fn bounds<'a>(points: impl IntoIterator<Item = &'a Point2<f64>>) -> Option<(Point2<f64>, Point2<f64>)> {
    let mut points = points.into_iter();
    let first = *points.next()?;
    let (min, max) = points.fold((first, first), |(mut min, mut max), p| {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
        (min, max)
    });
    Some((min, max))
}

fn merge_bounds(
    a: Option<(Point2<f64>, Point2<f64>)>,
    b: Option<(Point2<f64>, Point2<f64>)>,
) -> Option<(Point2<f64>, Point2<f64>)> {
    match (a, b) {
        (Some((amin, amax)), Some((bmin, bmax))) => Some((
            Point2::new(amin.x.min(bmin.x), amin.y.min(bmin.y)),
            Point2::new(amax.x.max(bmax.x), amax.y.max(bmax.y)),
        )),
        (a, None) => a,
        (None, b) => b,
    }
}

/// A face outline placed in the plane.
///
/// Points follow the face's boundary cycle, counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct UnfoldedPolygon {
    /// The 2D outline, one point per face boundary point.
    pub points: Vec<Point2<f64>>,
}

impl UnfoldedPolygon {
    /// Create a polygon from its outline.
    pub fn new(points: Vec<Point2<f64>>) -> Self {
        Self { points }
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the outline has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed area (shoelace formula). Positive for counter-clockwise outlines.
    pub fn signed_area(&self) -> f64 {
        0.5 * cyclic_pairs(&self.points)
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>()
    }

    /// Unsigned area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Length of the edge from point `i` to point `i + 1` (wrapping).
    pub fn edge_length(&self, i: usize) -> f64 {
        let n = self.points.len();
        (self.points[(i + 1) % n] - self.points[i % n]).norm()
    }

    /// Compute the bounding box of the outline.
    ///
    /// Returns `None` if the outline is empty.
    pub fn bounding_box(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        bounds(&self.points)
    }

    /// Move every point by `offset`.
    pub fn translate(&mut self, offset: &Vector2<f64>) {
        for p in &mut self.points {
            *p += offset;
        }
    }
}

/// The result of placing one face.
#[derive(Debug, Clone, PartialEq)]
pub struct UnfoldedPiece<I: MeshIndex = u32> {
    /// The face that was placed.
    pub face: FaceId<I>,

    /// The placed outline, or why the face could not be placed.
    pub outline: std::result::Result<UnfoldedPolygon, GeometryError>,
}

impl<I: MeshIndex> UnfoldedPiece<I> {
    /// The placed outline, if any.
    #[inline]
    pub fn polygon(&self) -> Option<&UnfoldedPolygon> {
        self.outline.as_ref().ok()
    }

    /// Check if the face was placed.
    #[inline]
    pub fn is_placed(&self) -> bool {
        self.outline.is_ok()
    }
}

/// The flattened net of one connected component.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment<I: MeshIndex = u32> {
    /// The root face of the spanning tree.
    pub root: FaceId<I>,

    /// One piece per face, root first, in pre-order.
    pub pieces: Vec<UnfoldedPiece<I>>,
}

impl<I: MeshIndex> Fragment<I> {
    /// Iterate over the successfully placed outlines.
    pub fn polygons(&self) -> impl Iterator<Item = &UnfoldedPolygon> + '_ {
        self.pieces.iter().filter_map(UnfoldedPiece::polygon)
    }

    /// Iterate over the faces that could not be placed.
    pub fn failures(&self) -> impl Iterator<Item = (FaceId<I>, &GeometryError)> + '_ {
        self.pieces
            .iter()
            .filter_map(|p| p.outline.as_ref().err().map(|e| (p.face, e)))
    }

    /// Total area of the placed outlines.
    pub fn area(&self) -> f64 {
        self.polygons().map(UnfoldedPolygon::area).sum()
    }

    /// Bounding box of the placed outlines.
    pub fn bounding_box(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        bounds(self.polygons().flat_map(|p| p.points.iter()))
    }

    /// Move every placed outline by `offset`.
    pub fn translate(&mut self, offset: &Vector2<f64>) {
        for piece in &mut self.pieces {
            if let Ok(polygon) = &mut piece.outline {
                polygon.translate(offset);
            }
        }
    }
}

/// Options for [`Unfolded::arrange`].
#[derive(Debug, Clone)]
pub struct ArrangeOptions {
    /// Gap between neighbouring fragments, in model units.
    pub spacing: f64,

    /// Width at which a row wraps. `None` picks a width that keeps the
    /// sheet roughly square.
    pub max_row_width: Option<f64>,
}

impl Default for ArrangeOptions {
    fn default() -> Self {
        Self {
            spacing: 0.1,
            max_row_width: None,
        }
    }
}

impl ArrangeOptions {
    /// Set the gap between fragments.
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the row width.
    pub fn with_max_row_width(mut self, width: f64) -> Self {
        self.max_row_width = Some(width);
        self
    }

    /// Check the options for invalid values.
    pub fn validate(&self) -> Result<()> {
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(MeshError::invalid_param(
                "spacing",
                self.spacing,
                "must be finite and non-negative",
            ));
        }
        if let Some(width) = self.max_row_width {
            if !width.is_finite() || width <= 0.0 {
                return Err(MeshError::invalid_param(
                    "max_row_width",
                    width,
                    "must be positive and finite",
                ));
            }
        }
        Ok(())
    }
}

/// The unfolded nets of a whole mesh, one fragment per spanning tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Unfolded<I: MeshIndex = u32> {
    /// The fragments, in forest order.
    pub fragments: Vec<Fragment<I>>,
}

impl<I: MeshIndex> Unfolded<I> {
    /// Number of fragments.
    #[inline]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Check if there are no fragments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Iterate over all placed outlines of all fragments.
    pub fn polygons(&self) -> impl Iterator<Item = &UnfoldedPolygon> + '_ {
        self.fragments.iter().flat_map(Fragment::polygons)
    }

    /// Number of placed outlines.
    pub fn num_polygons(&self) -> usize {
        self.polygons().count()
    }

    /// Number of faces that could not be placed.
    pub fn num_failures(&self) -> usize {
        self.fragments.iter().map(|f| f.failures().count()).sum()
    }

    /// Bounding box over every placed point.
    ///
    /// Returns `None` if nothing was placed.
    pub fn bounding_box(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        self.fragments
            .iter()
            .map(Fragment::bounding_box)
            .fold(None, merge_bounds)
    }

    /// Translate whole fragments so that they no longer overlap.
    ///
    /// Fragments are sorted by bounding box area, largest first, and laid
    /// out left to right in rows starting at the origin. A row wraps when the
    /// next fragment would cross `max_row_width`. Fragments with no placed
    /// outline are left untouched. Outlines are never rotated or scaled.
    pub fn arrange(&mut self, options: &ArrangeOptions) -> Result<()> {
        options.validate()?;

        let mut boxes: Vec<(usize, Point2<f64>, Vector2<f64>)> = self
            .fragments
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.bounding_box().map(|(min, max)| (i, min, max - min)))
            .collect();
        if boxes.is_empty() {
            return Ok(());
        }
        // Stable: equal areas keep forest order
        boxes.sort_by(|a, b| (b.2.x * b.2.y).total_cmp(&(a.2.x * a.2.y)));

        let row_width = options.max_row_width.unwrap_or_else(|| {
            let sheet: f64 = boxes
                .iter()
                .map(|(_, _, size)| (size.x + options.spacing) * (size.y + options.spacing))
                .sum();
            let widest = boxes.iter().map(|(_, _, size)| size.x).fold(0.0, f64::max);
            sheet.sqrt().max(widest)
        });

        let mut pos_x = 0.0;
        let mut pos_y = 0.0;
        let mut row_height: f64 = 0.0;
        let mut num_in_row = 0;
        let mut rows = 1;

        for (index, min, size) in boxes {
            if pos_x + size.x > row_width && num_in_row > 0 {
                pos_x = 0.0;
                pos_y += row_height + options.spacing;
                row_height = 0.0;
                num_in_row = 0;
                rows += 1;
            }

            let offset = Vector2::new(pos_x - min.x, pos_y - min.y);
            self.fragments[index].translate(&offset);

            pos_x += size.x + options.spacing;
            row_height = row_height.max(size.y);
            num_in_row += 1;
        }

        debug!(
            "arranged {} fragments in {} rows of width {:.3}",
            self.fragments.len(),
            rows,
            row_width
        );
        Ok(())
    }
}
