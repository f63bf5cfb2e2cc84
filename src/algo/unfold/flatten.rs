//! Rigid unfolding of spanning trees into the plane.
//!
//! Each face is projected into its own 2D frame and then moved with a
//! similarity transform so that its hinge edge lands exactly on the hinge
//! edge of its already placed parent. The root of every tree is anchored
//! with its first boundary edge on the positive X axis, starting at the
//! origin.

use nalgebra::{Point2, Point3, Similarity2, Vector2, Vector3};
use rayon::prelude::*;
use tracing::{debug, warn};

use super::forest::{Forest, UnfoldTree};
use super::layout::{Fragment, UnfoldedPiece, UnfoldedPolygon, Unfolded};
use super::merge::{vector_area, Face};
use crate::error::{GeometryError, MeshError, Result};
use crate::mesh::{MeshIndex, TriangleMesh};

/// Options for flattening.
#[derive(Debug, Clone)]
pub struct FlattenOptions {
    /// Lengths and sines below this are treated as zero.
    pub epsilon: f64,

    /// Flatten the trees of the forest in parallel.
    pub parallel: bool,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            epsilon: 1e-12,
            parallel: true,
        }
    }
}

impl FlattenOptions {
    /// Set the zero threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Enable or disable parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check the options for invalid values.
    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(MeshError::invalid_param(
                "epsilon",
                self.epsilon,
                "must be positive and finite",
            ));
        }
        Ok(())
    }
}

/// Where a face has to go.
enum Anchor {
    Root,
    Hinge(Point2<f64>, Point2<f64>),
    Failed(GeometryError),
}

/// Unfold every tree of the forest into a [`Fragment`].
///
/// `faces` must be the faces the forest was built from. Faces that cannot be
/// placed are reported as `Err` pieces; their descendants are reported as
/// [`GeometryError::ParentNotPlaced`]. The rest of the net is still produced.
///
/// # Errors
///
/// Returns an error only if the options are invalid.
pub fn flatten<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
    forest: &Forest<I>,
    faces: &[Face<I>],
    options: &FlattenOptions,
) -> Result<Unfolded<I>> {
    options.validate()?;
    let eps = options.epsilon;

    let fragments: Vec<Fragment<I>> = if options.parallel {
        forest
            .trees
            .par_iter()
            .map(|tree| flatten_tree(mesh, tree, faces, eps))
            .collect()
    } else {
        forest
            .trees
            .iter()
            .map(|tree| flatten_tree(mesh, tree, faces, eps))
            .collect()
    };

    let unfolded = Unfolded { fragments };
    let failures = unfolded.num_failures();
    if failures > 0 {
        warn!("{} faces could not be flattened", failures);
    }
    debug!(
        "flattened {} faces into {} fragments",
        unfolded.num_polygons(),
        unfolded.len()
    );

    Ok(unfolded)
}

fn flatten_tree<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
    tree: &UnfoldTree<I>,
    faces: &[Face<I>],
    eps: f64,
) -> Fragment<I> {
    let mut pieces = Vec::with_capacity(tree.len());
    let mut stack = vec![(0usize, Anchor::Root)];

    while let Some((id, anchor)) = stack.pop() {
        let node = tree.node(id);
        let fi = node.face.index();
        let face = &faces[fi];

        let outline = match (anchor, node.hinge) {
            (Anchor::Failed(err), _) => Err(err),
            (Anchor::Root, _) | (Anchor::Hinge(..), None) => place_root(mesh, face, fi, eps),
            (Anchor::Hinge(ta, tb), Some(hinge)) => {
                match (face.position_of(hinge.lo()), face.position_of(hinge.hi())) {
                    (Some(ai), Some(bi)) => place_face(mesh, face, fi, (ai, bi), (ta, tb), eps),
                    _ => Err(GeometryError::HingeNotOnFace {
                        face: fi,
                        a: hinge.lo().index(),
                        b: hinge.hi().index(),
                    }),
                }
            }
        };

        for &child in node.children.iter().rev() {
            let child_node = tree.node(child);
            let anchor = match (&outline, child_node.hinge) {
                (Err(_), _) => Anchor::Failed(GeometryError::ParentNotPlaced {
                    face: child_node.face.index(),
                }),
                (Ok(polygon), Some(hinge)) => {
                    match (face.position_of(hinge.lo()), face.position_of(hinge.hi())) {
                        (Some(pa), Some(pb)) => Anchor::Hinge(polygon.points[pa], polygon.points[pb]),
                        _ => Anchor::Failed(GeometryError::HingeNotOnFace {
                            face: fi,
                            a: hinge.lo().index(),
                            b: hinge.hi().index(),
                        }),
                    }
                }
                (Ok(_), None) => Anchor::Root,
            };
            stack.push((child, anchor));
        }

        pieces.push(UnfoldedPiece {
            face: node.face,
            outline,
        });
    }

    Fragment {
        root: tree.root().face,
        pieces,
    }
}

/// Place a root face: its first edge goes from the origin along +X.
fn place_root<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
    face: &Face<I>,
    fi: usize,
    eps: f64,
) -> std::result::Result<UnfoldedPolygon, GeometryError> {
    if face.is_degenerate() {
        return Err(GeometryError::DegenerateFace {
            face: fi,
            points: face.len(),
        });
    }
    let len = (mesh.position(face.points[1]) - mesh.position(face.points[0])).norm();
    place_face(
        mesh,
        face,
        fi,
        (0, 1),
        (Point2::origin(), Point2::new(len, 0.0)),
        eps,
    )
}

/// Place a face so that its points `ai`, `bi` land on `ta`, `tb`.
fn place_face<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
    face: &Face<I>,
    fi: usize,
    (ai, bi): (usize, usize),
    (ta, tb): (Point2<f64>, Point2<f64>),
    eps: f64,
) -> std::result::Result<UnfoldedPolygon, GeometryError> {
    if face.is_degenerate() {
        return Err(GeometryError::DegenerateFace {
            face: fi,
            points: face.len(),
        });
    }

    let positions: Vec<Point3<f64>> = face.points.iter().map(|&p| *mesh.position(p)).collect();
    let zero_edge = || GeometryError::ZeroLengthEdge {
        face: fi,
        a: face.points[ai].index(),
        b: face.points[bi].index(),
    };

    let mut local = project(&positions, ai, bi, eps)
        .map_err(|kind| match kind {
            Projection::ZeroEdge => zero_edge(),
            Projection::NoPlane => GeometryError::DegenerateBasis { face: fi },
        })?;

    if UnfoldedPolygon::new(local.clone()).signed_area() < 0.0 {
        for p in &mut local {
            p.y = -p.y;
        }
    }

    let source = (positions[bi] - positions[ai]).norm();
    let target: Vector2<f64> = tb - ta;
    let target_len = target.norm();
    if target_len <= eps {
        return Err(zero_edge());
    }

    let similarity = Similarity2::new(
        ta.coords,
        target.y.atan2(target.x),
        target_len / source,
    );
    let points: Vec<Point2<f64>> = local.iter().map(|p| similarity.transform_point(p)).collect();

    if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(GeometryError::DegenerateBasis { face: fi });
    }
    Ok(UnfoldedPolygon::new(points))
}

enum Projection {
    ZeroEdge,
    NoPlane,
}

/// Express the points in an orthonormal frame with `a` at the origin and
/// `b` on the positive X axis.
fn project(
    positions: &[Point3<f64>],
    ai: usize,
    bi: usize,
    eps: f64,
) -> std::result::Result<Vec<Point2<f64>>, Projection> {
    let n = positions.len();
    let a = positions[ai];
    let ab = positions[bi] - a;
    let len = ab.norm();
    if !(len > eps) {
        return Err(Projection::ZeroEdge);
    }
    let u = ab / len;

    // Reference edge next to a; its other neighbour if the next point is b
    let k = if (ai + 1) % n == bi {
        (ai + n - 1) % n
    } else {
        (ai + 1) % n
    };
    let ak = positions[k] - a;
    let cross = ab.cross(&ak);
    let normal: Vector3<f64> = if cross.norm() > eps * len * ak.norm() {
        cross
    } else {
        let area = vector_area(positions.iter());
        if !(area.norm() > eps * len * len) {
            return Err(Projection::NoPlane);
        }
        area
    };

    let w = normal.normalize().cross(&u);
    let w_len = w.norm();
    if !(w_len > eps) {
        return Err(Projection::NoPlane);
    }
    let w = w / w_len;

    Ok(positions
        .iter()
        .map(|p| {
            let d = p - a;
            Point2::new(d.dot(&u), d.dot(&w))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::unfold::forest::{build_forest, face_adjacency};
    use crate::algo::unfold::merge::{merge_faces, MergeOptions, MergedFaces};
    use crate::algo::unfold::test_meshes;
    use crate::mesh::{EdgeKey, FaceId, PointId};
    use approx::assert_relative_eq;

    fn run(mesh: &TriangleMesh, parallel: bool) -> (MergedFaces, Forest, Unfolded) {
        let merged = merge_faces(mesh, &MergeOptions::default()).unwrap();
        let forest = build_forest(&merged).unwrap();
        let options = FlattenOptions::default().with_parallel(parallel);
        let unfolded = flatten(mesh, &forest, &merged.faces, &options).unwrap();
        (merged, forest, unfolded)
    }

    fn placed(
        fragment: &Fragment,
        faces: &[Face],
        face: FaceId<u32>,
        point: PointId<u32>,
    ) -> Point2<f64> {
        let piece = fragment.pieces.iter().find(|p| p.face == face).unwrap();
        let i = faces[face.index()].position_of(point).unwrap();
        piece.polygon().unwrap().points[i]
    }

    #[test]
    fn test_cube_unfolds_into_six_unit_squares() {
        let mesh = test_meshes::cube(1.0);
        let (_, forest, unfolded) = run(&mesh, true);

        assert_eq!(forest.len(), 1);
        assert_eq!(unfolded.len(), 1);
        let fragment = &unfolded.fragments[0];
        assert_eq!(fragment.root, FaceId::new(0));
        assert_eq!(fragment.pieces.len(), 6);
        assert_eq!(unfolded.num_failures(), 0);

        for polygon in fragment.polygons() {
            assert_eq!(polygon.len(), 4);
            for i in 0..4 {
                assert_relative_eq!(polygon.edge_length(i), 1.0, epsilon = 1e-9);
            }
            assert_relative_eq!(polygon.signed_area(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_root_anchor() {
        let mesh = test_meshes::cube(2.0);
        let (_, _, unfolded) = run(&mesh, false);

        let root = unfolded.fragments[0].pieces[0].polygon().unwrap();
        assert_relative_eq!(root.points[0], Point2::new(0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(root.points[1], Point2::new(2.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_hinges_coincide() {
        let mesh = test_meshes::tetrahedron();
        let (merged, forest, unfolded) = run(&mesh, true);
        let fragment = &unfolded.fragments[0];

        for (parent, child, hinge) in forest.trees[0].hinges() {
            for p in [hinge.lo(), hinge.hi()] {
                let in_parent = placed(fragment, &merged.faces, parent, p);
                let in_child = placed(fragment, &merged.faces, child, p);
                assert_relative_eq!(in_parent, in_child, epsilon = 1e-9);
            }
            let (pa, pb) = (
                placed(fragment, &merged.faces, child, hinge.lo()),
                placed(fragment, &merged.faces, child, hinge.hi()),
            );
            assert_relative_eq!(
                (pb - pa).norm(),
                merged.edge_length(hinge).unwrap(),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_area_is_preserved() {
        for mesh in [test_meshes::tetrahedron(), test_meshes::cube(3.0)] {
            let (_, _, unfolded) = run(&mesh, true);
            let area: f64 = unfolded.fragments.iter().map(Fragment::area).sum();
            assert_relative_eq!(area, mesh.surface_area(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_faces_are_counter_clockwise() {
        let (_, _, unfolded) = run(&test_meshes::tetrahedron(), true);
        assert!(unfolded.polygons().all(|p| p.signed_area() > 0.0));
    }

    #[test]
    fn test_children_do_not_fold_back_onto_parent() {
        // Centroid of each child lies on the other side of the hinge
        let mesh = test_meshes::cube(1.0);
        let (merged, forest, unfolded) = run(&mesh, true);
        let fragment = &unfolded.fragments[0];

        let centroid = |face: FaceId<u32>| {
            let piece = fragment.pieces.iter().find(|p| p.face == face).unwrap();
            let pts = &piece.polygon().unwrap().points;
            let sum = pts.iter().fold(Vector2::zeros(), |acc, p| acc + p.coords);
            Point2::from(sum / pts.len() as f64)
        };

        for (parent, child, hinge) in forest.trees[0].hinges() {
            let a = placed(fragment, &merged.faces, parent, hinge.lo());
            let b = placed(fragment, &merged.faces, parent, hinge.hi());
            let side = |p: Point2<f64>| {
                let ab = b - a;
                let ap = p - a;
                ab.x * ap.y - ab.y * ap.x
            };
            assert!(side(centroid(parent)) * side(centroid(child)) < 0.0);
        }
    }

    #[test]
    fn test_disconnected_triangles() {
        let mesh = test_meshes::two_triangles();
        let (_, forest, unfolded) = run(&mesh, true);

        assert_eq!(forest.len(), 2);
        assert_eq!(unfolded.len(), 2);

        let mut sides: Vec<Vec<f64>> = unfolded
            .polygons()
            .map(|p| {
                let mut s: Vec<f64> = (0..3).map(|i| p.edge_length(i)).collect();
                s.sort_by(f64::total_cmp);
                s
            })
            .collect();
        sides.sort_by(|a, b| a[0].total_cmp(&b[0]));

        let expected = [vec![2.0, 2.0, 8f64.sqrt()], vec![3.0, 4.0, 5.0]];
        for (got, want) in sides.iter().zip(expected.iter()) {
            for (g, w) in got.iter().zip(want) {
                assert_relative_eq!(*g, *w, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_collapsed_triangle_is_flagged() {
        let mesh = test_meshes::square_with_collapsed_triangle();
        let (_, _, unfolded) = run(&mesh, true);

        assert_eq!(unfolded.len(), 2);
        assert_eq!(unfolded.num_polygons(), 1);
        assert_eq!(
            unfolded.fragments[1].pieces[0].outline,
            Err(GeometryError::ZeroLengthEdge { face: 1, a: 4, b: 5 })
        );
    }

    #[test]
    fn test_repeated_index_is_flagged() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = TriangleMesh::from_triangles(points, &[[0, 1, 2], [0, 0, 2]]).unwrap();
        let (_, _, unfolded) = run(&mesh, true);

        assert_eq!(
            unfolded.fragments[1].pieces[0].outline,
            Err(GeometryError::DegenerateFace { face: 1, points: 0 })
        );
    }

    #[test]
    fn test_failed_face_orphans_descendants() {
        // Unit square, a collinear sliver on edge 0-1, and a triangle on the sliver
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.5, -1.0, 0.0),
        ];
        let triangles = [[0, 1, 2], [0, 2, 3], [1, 0, 4], [4, 1, 5]];
        let mesh: TriangleMesh<u32> = TriangleMesh::from_triangles(points, &triangles).unwrap();
        let merged = merge_faces(&mesh, &MergeOptions::default()).unwrap();
        assert_eq!(merged.faces.len(), 3);

        // Chain the faces through the sliver by hand
        let edge = |a, b| EdgeKey::new(PointId::new(a), PointId::new(b));
        let mut tree = UnfoldTree::with_root(FaceId::new(0));
        let sliver = tree.attach(0, FaceId::new(1), edge(0, 1));
        tree.attach(sliver, FaceId::new(2), edge(1, 4));
        let forest = Forest {
            trees: vec![tree],
            face_adjacency: face_adjacency(&merged.faces),
        };

        let unfolded = flatten(&mesh, &forest, &merged.faces, &FlattenOptions::default()).unwrap();
        let pieces = &unfolded.fragments[0].pieces;
        assert_eq!(pieces.len(), 3);

        let square = pieces[0].polygon().unwrap();
        assert_relative_eq!(square.points[2], Point2::new(1.0, 1.0), epsilon = 1e-12);
        assert_eq!(pieces[1].outline, Err(GeometryError::DegenerateBasis { face: 1 }));
        assert_eq!(pieces[2].outline, Err(GeometryError::ParentNotPlaced { face: 2 }));
    }

    #[test]
    fn test_sliver_does_not_orphan_neighbours() {
        let mesh = test_meshes::sliver_detour();
        let (_, forest, unfolded) = run(&mesh, true);

        assert_eq!(forest.len(), 2);
        assert_eq!(unfolded.num_failures(), 1);
        assert_eq!(unfolded.fragments[0].polygons().count(), 3);
        assert_eq!(
            unfolded.fragments[1].pieces[0].outline,
            Err(GeometryError::DegenerateBasis { face: 1 })
        );
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let mesh = test_meshes::tetrahedron();
        let merged = merge_faces(&mesh, &MergeOptions::default()).unwrap();
        let forest = build_forest(&merged).unwrap();

        let first = flatten(&mesh, &forest, &merged.faces, &FlattenOptions::default()).unwrap();
        let second = flatten(&mesh, &forest, &merged.faces, &FlattenOptions::default()).unwrap();
        let sequential = flatten(
            &mesh,
            &forest,
            &merged.faces,
            &FlattenOptions::default().with_parallel(false),
        )
        .unwrap();

        assert_eq!(first, second);
        assert_eq!(first, sequential);
    }

    #[test]
    fn test_invalid_epsilon() {
        let mesh = test_meshes::cube(1.0);
        let merged = merge_faces(&mesh, &MergeOptions::default()).unwrap();
        let forest = build_forest(&merged).unwrap();

        let result = flatten(
            &mesh,
            &forest,
            &merged.faces,
            &FlattenOptions::default().with_epsilon(0.0),
        );
        assert!(matches!(result, Err(MeshError::InvalidParameter { .. })));
    }
}
