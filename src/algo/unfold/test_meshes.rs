//! Small meshes shared by the unfolding tests.

use nalgebra::Point3;

use crate::mesh::TriangleMesh;

/// Axis-aligned cube with side `size`, 8 points and 12 outward-wound triangles.
pub(crate) fn cube(size: f64) -> TriangleMesh {
    let s = size;
    let points = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(s, 0.0, 0.0),
        Point3::new(s, s, 0.0),
        Point3::new(0.0, s, 0.0),
        Point3::new(0.0, 0.0, s),
        Point3::new(s, 0.0, s),
        Point3::new(s, s, s),
        Point3::new(0.0, s, s),
    ];
    let triangles = [
        [0, 2, 1],
        [0, 3, 2], // bottom (-z)
        [4, 5, 6],
        [4, 6, 7], // top (+z)
        [0, 1, 5],
        [0, 5, 4], // front (-y)
        [1, 2, 6],
        [1, 6, 5], // right (+x)
        [2, 3, 7],
        [2, 7, 6], // back (+y)
        [3, 0, 4],
        [3, 4, 7], // left (-x)
    ];
    TriangleMesh::from_triangles(points, &triangles).unwrap()
}

/// Two triangles far apart that share no edge.
pub(crate) fn two_triangles() -> TriangleMesh {
    let points = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(3.0, 0.0, 0.0),
        Point3::new(0.0, 4.0, 0.0),
        Point3::new(10.0, 0.0, 1.0),
        Point3::new(10.0, 2.0, 1.0),
        Point3::new(10.0, 0.0, 3.0),
    ];
    TriangleMesh::from_triangles(points, &[[0, 1, 2], [3, 4, 5]]).unwrap()
}

/// Irregular tetrahedron with four distinct edge lengths around its base.
pub(crate) fn tetrahedron() -> TriangleMesh {
    let points = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(4.0, 0.0, 0.0),
        Point3::new(1.0, 2.0, 0.0),
        Point3::new(1.0, 1.0, 3.0),
    ];
    let triangles = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
    TriangleMesh::from_triangles(points, &triangles).unwrap()
}

/// Unit square (two triangles) plus a triangle with two coincident points.
pub(crate) fn square_with_collapsed_triangle() -> TriangleMesh {
    let points = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(5.0, 5.0, 5.0),
        Point3::new(5.0, 5.0, 5.0),
        Point3::new(6.0, 5.0, 5.0),
    ];
    TriangleMesh::from_triangles(points, &[[0, 1, 2], [0, 2, 3], [4, 5, 6]]).unwrap()
}

/// 2x1 rectangle (face 0), a collinear sliver on its edge 0-1 (face 1), a
/// vertical triangle on edge 1-2 (face 2) and a triangle touching both the
/// sliver (edge 1-4) and face 2 (edge 1-5) (face 3).
pub(crate) fn sliver_detour() -> TriangleMesh {
    let points = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(2.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(2.0, 0.5, 1.0),
    ];
    let triangles = [[0, 1, 2], [0, 2, 3], [1, 0, 4], [2, 1, 5], [1, 4, 5]];
    TriangleMesh::from_triangles(points, &triangles).unwrap()
}
