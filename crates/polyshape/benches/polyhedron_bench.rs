//! Criterion benchmarks for hull construction, facet merging and integrals.
//!
//! Point clouds come from the seeded random generator so runs are
//! comparable across machines.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use nalgebra::Vector3;
use polyshape::api::{
    convex_hull, special, ConvexPolyhedron, GeomCfg, Polyhedron, RandomConvexGenerator,
    RandomConvexParams,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_cloud(points: usize, seed: u64) -> Vec<Vector3<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..points)
        .map(|_| {
            Vector3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            )
        })
        .collect()
}

fn bench_hull(c: &mut Criterion) {
    let mut group = c.benchmark_group("convex_hull");
    for &n in &[16usize, 64, 256, 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &m| {
            b.iter_batched(
                || random_cloud(m, 7 + m as u64),
                |pts| {
                    let _ = black_box(convex_hull(&pts).unwrap());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_convex_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("convex_polyhedron_new");
    for &n in &[16usize, 64, 256] {
        let params = RandomConvexParams {
            points: n,
            ..RandomConvexParams::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(n), &params, |b, p| {
            b.iter(|| {
                let _ = black_box(RandomConvexGenerator::generate_single(p, 2024).unwrap());
            });
        });
    }
    group.finish();
}

fn bench_merge_triangulated_cube(c: &mut Criterion) {
    // Cube split into 12 triangles, merged back to 6 quads.
    let cube = special::cube().unwrap();
    let poly = cube.polyhedron();
    let vertices = poly.vertices().to_vec();
    let mut tris = Vec::new();
    for facet in poly.facets() {
        for i in 1..facet.len() - 1 {
            tris.push(vec![facet[0], facet[i], facet[i + 1]]);
        }
    }
    c.bench_function("merge_triangulated_cube", |b| {
        b.iter_batched(
            || Polyhedron::with_cfg(vertices.clone(), tris.clone(), GeomCfg::default()).unwrap(),
            |mut p| {
                p.merge_facets_default().unwrap();
                black_box(p.num_facets());
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_integrals(c: &mut Criterion) {
    let shapes: Vec<(&str, ConvexPolyhedron)> = vec![
        ("cube", special::cube().unwrap()),
        ("dodecahedron", special::dodecahedron().unwrap()),
        ("prism_32", special::prism(32).unwrap()),
    ];
    let mut group = c.benchmark_group("integrals");
    for (name, shape) in &shapes {
        // Rebuild per iteration; a clone would carry the cached tensor along.
        group.bench_with_input(BenchmarkId::new("inertia", name), shape, |b, s| {
            let p = s.polyhedron();
            b.iter_batched(
                || Polyhedron::new(p.vertices().to_vec(), p.facets().to_vec()).unwrap(),
                |p| {
                    let _ = black_box(p.inertia_tensor().unwrap());
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("mean_curvature", name), shape, |b, s| {
            b.iter(|| black_box(s.polyhedron().mean_curvature()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_hull,
    bench_convex_construction,
    bench_merge_triangulated_cube,
    bench_integrals
);
criterion_main!(benches);
