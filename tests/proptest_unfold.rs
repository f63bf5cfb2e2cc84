//! Property-based tests for the unfolding pipeline.
//!
//! Run with: cargo test --test proptest_unfold

use nalgebra::Point3;
use netcraft::algo::unfold::{unfold, Fragment, UnfoldOptions};
use netcraft::error::{GeometryError, MeshError};
use netcraft::mesh::TriangleMesh;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_position() -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-10.0..10.0f64).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// Random triangle soup with valid indices. Usually not manifold.
fn arb_soup() -> impl Strategy<Value = TriangleMesh> {
    prop::collection::vec(arb_position(), 3..20).prop_flat_map(|points| {
        let n = points.len();
        prop::collection::vec(prop::array::uniform3(0..n), 1..30).prop_map(move |triangles| {
            TriangleMesh::from_triangles(points.clone(), &triangles).unwrap()
        })
    })
}

/// Random height field over an `n` x `n` grid: an open manifold surface
/// with consistent winding.
fn arb_height_field() -> impl Strategy<Value = TriangleMesh> {
    (2usize..7).prop_flat_map(|n| {
        prop::collection::vec(-1.0..1.0f64, (n + 1) * (n + 1)).prop_map(move |heights| {
            let mut points = Vec::with_capacity(heights.len());
            for j in 0..=n {
                for i in 0..=n {
                    points.push(Point3::new(i as f64, j as f64, heights[j * (n + 1) + i]));
                }
            }
            let mut triangles = Vec::new();
            for j in 0..n {
                for i in 0..n {
                    let v00 = j * (n + 1) + i;
                    let v10 = v00 + 1;
                    let v01 = v00 + (n + 1);
                    let v11 = v01 + 1;
                    triangles.push([v00, v10, v11]);
                    triangles.push([v00, v11, v01]);
                }
            }
            TriangleMesh::from_triangles(points, &triangles).unwrap()
        })
    })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Unfolding never panics; it either fails on a non-manifold edge or
    /// accounts for every face.
    #[test]
    fn unfold_never_panics(mesh in arb_soup()) {
        match unfold(&mesh, &UnfoldOptions::default()) {
            Ok(unfolding) => {
                let faces = unfolding.faces.faces.len();
                prop_assert_eq!(unfolding.forest.num_faces(), faces);
                let pieces: usize = unfolding.unfolded.fragments.iter().map(|f| f.pieces.len()).sum();
                prop_assert_eq!(pieces, faces);
                for polygon in unfolding.unfolded.polygons() {
                    prop_assert!(polygon.points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
                }
            }
            Err(MeshError::Geometry(GeometryError::NonManifoldEdge { count, .. })) => {
                prop_assert!(count > 2);
            }
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }

    /// Every face of a height field is placed and the net keeps the surface area.
    #[test]
    fn height_field_area_is_preserved(mesh in arb_height_field()) {
        let unfolding = unfold(&mesh, &UnfoldOptions::default()).unwrap();

        prop_assert_eq!(unfolding.unfolded.len(), 1);
        prop_assert_eq!(unfolding.unfolded.num_failures(), 0);

        let area: f64 = unfolding.unfolded.fragments.iter().map(Fragment::area).sum();
        let expected = mesh.surface_area();
        prop_assert!((area - expected).abs() <= 1e-5 * expected, "{} vs {}", area, expected);
    }

    /// Placed outlines keep the edge lengths of their faces.
    #[test]
    fn height_field_edges_are_preserved(mesh in arb_height_field()) {
        let unfolding = unfold(&mesh, &UnfoldOptions::default()).unwrap();
        let faces = &unfolding.faces;

        for piece in &unfolding.unfolded.fragments[0].pieces {
            let polygon = piece.polygon().unwrap();
            let face = &faces.faces[piece.face.index()];
            for (i, edge) in face.edges().enumerate() {
                let expected = faces.edge_length(edge).unwrap();
                prop_assert!((polygon.edge_length(i) - expected).abs() < 1e-3 * expected.max(1.0));
            }
        }
    }

    /// Unfolding is deterministic, in parallel or not.
    #[test]
    fn unfold_is_deterministic(mesh in arb_height_field()) {
        let a = unfold(&mesh, &UnfoldOptions::default()).unwrap();
        let b = unfold(&mesh, &UnfoldOptions::default().with_parallel(false)).unwrap();
        prop_assert_eq!(a.unfolded, b.unfolded);
    }
}
