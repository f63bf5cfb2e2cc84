//! Benchmarks for the unfolding pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Point3;
use netcraft::algo::unfold::{build_forest, flatten, merge_faces, FlattenOptions, MergeOptions};
use netcraft::prelude::*;

/// Closed UV sphere with `rings` latitude bands and `segments` longitude bands.
fn create_sphere_mesh(rings: usize, segments: usize) -> TriangleMesh {
    let mut points = vec![Point3::new(0.0, 0.0, 1.0)];
    for r in 1..rings {
        let theta = std::f64::consts::PI * r as f64 / rings as f64;
        for s in 0..segments {
            let phi = std::f64::consts::TAU * s as f64 / segments as f64;
            points.push(Point3::new(
                theta.sin() * phi.cos(),
                theta.sin() * phi.sin(),
                theta.cos(),
            ));
        }
    }
    let south = points.len();
    points.push(Point3::new(0.0, 0.0, -1.0));

    let ring = |r: usize, s: usize| 1 + (r - 1) * segments + s % segments;
    let mut triangles = Vec::new();
    for s in 0..segments {
        triangles.push([0, ring(1, s), ring(1, s + 1)]);
        triangles.push([south, ring(rings - 1, s + 1), ring(rings - 1, s)]);
    }
    for r in 1..rings - 1 {
        for s in 0..segments {
            let (a, b) = (ring(r, s), ring(r, s + 1));
            let (c, d) = (ring(r + 1, s), ring(r + 1, s + 1));
            triangles.push([a, c, d]);
            triangles.push([a, d, b]);
        }
    }

    TriangleMesh::from_triangles(points, &triangles).unwrap()
}

/// Flat `n` x `n` grid, which merges into a single face.
fn create_grid_mesh(n: usize) -> TriangleMesh {
    let mut points = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            points.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }

    let mut triangles = Vec::with_capacity(n * n * 2);
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
}

fn bench_stages(c: &mut Criterion) {
    let sphere = create_sphere_mesh(32, 64);
    let merged = merge_faces(&sphere, &MergeOptions::default()).unwrap();
    let forest = build_forest(&merged).unwrap();

    c.bench_function("merge_faces_sphere_32x64", |b| {
        b.iter(|| merge_faces(black_box(&sphere), &MergeOptions::default()).unwrap())
    });

    c.bench_function("build_forest_sphere_32x64", |b| {
        b.iter(|| build_forest(black_box(&merged)).unwrap())
    });

    c.bench_function("flatten_sphere_32x64", |b| {
        b.iter(|| flatten(&sphere, &forest, &merged.faces, &FlattenOptions::default()).unwrap())
    });

    let grid = create_grid_mesh(50);
    c.bench_function("merge_faces_grid_50x50", |b| {
        b.iter(|| merge_faces(black_box(&grid), &MergeOptions::default()).unwrap())
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let sphere = create_sphere_mesh(32, 64);

    c.bench_function("unfold_sphere_parallel", |b| {
        b.iter(|| unfold(black_box(&sphere), &UnfoldOptions::default()).unwrap())
    });

    c.bench_function("unfold_sphere_sequential", |b| {
        let options = UnfoldOptions::default().with_parallel(false);
        b.iter(|| unfold(black_box(&sphere), &options).unwrap())
    });

    c.bench_function("unfold_and_arrange_sphere", |b| {
        b.iter(|| {
            let mut unfolding = unfold(black_box(&sphere), &UnfoldOptions::default()).unwrap();
            unfolding.unfolded.arrange(&ArrangeOptions::default()).unwrap();
            unfolding
        })
    });
}

criterion_group!(benches, bench_stages, bench_pipeline);
criterion_main!(benches);
