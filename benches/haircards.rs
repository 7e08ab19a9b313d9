//! Benchmarks for haircard generation.

use criterion::{criterion_group, criterion_main, Criterion};
use haircards::algo::simplify::rdp_mask;
use haircards::prelude::*;
use nalgebra::{Point3, Vector3};
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Flat `n`×`n` quad grid over `[-1, 1]²` with +z normals.
fn create_scalp(n: usize) -> ReferenceSurface {
    let mut positions = Vec::with_capacity((n + 1) * (n + 1));
    let mut quads = Vec::with_capacity(n * n);
    let step = 2.0 / n as f64;

    for j in 0..=n {
        for i in 0..=n {
            positions.push(Point3::new(-1.0 + i as f64 * step, -1.0 + j as f64 * step, 0.0));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;
            quads.push([v00, v10, v11, v01]);
        }
    }

    let normals = vec![Vector3::z(); positions.len()];
    let mesh = PolyMesh::from_quads(positions, &quads).unwrap();
    ReferenceSurface::new(mesh, normals).unwrap()
}

/// `count` wavy strands of `points` points with lengths cycling through the
/// short, medium and long buckets.
fn create_hair(count: usize, points: usize) -> HairMesh {
    let mut coords = Vec::with_capacity(count * points);
    let mut edges = Vec::with_capacity(count * (points - 1));

    for s in 0..count {
        let root = Point3::new(
            -0.9 + 1.8 * (s % 100) as f64 / 100.0,
            -0.9 + 1.8 * (s / 100) as f64 / (count / 100 + 1) as f64,
            0.01,
        );
        let length = [0.04, 0.08, 0.2][s % 3];
        let base = coords.len();
        for j in 0..points {
            let t = j as f64 / (points - 1) as f64;
            coords.push(root + Vector3::new(t * length, 0.0, 0.01 * (t * 12.0).sin()));
            if j > 0 {
                edges.push([base + j - 1, base + j]);
            }
        }
    }

    HairMesh::new(coords, edges).unwrap()
}

fn bench_spatial(c: &mut Criterion) {
    let scalp = create_scalp(100);
    let coords = scalp.world_coords();

    c.bench_function("kdtree_build_10k", |b| {
        b.iter(|| KdTree::build(&coords).unwrap());
    });

    let tree = KdTree::build(&coords).unwrap();
    c.bench_function("kdtree_find_1k", |b| {
        b.iter(|| {
            let mut sum = 0;
            for i in 0..1000 {
                let q = Point3::new(-1.0 + i as f64 * 0.002, 0.3, 0.01);
                sum += tree.find(&q).index;
            }
            sum
        });
    });
}

fn bench_simplify(c: &mut Criterion) {
    let points: Vec<Point3<f64>> = (0..1000)
        .map(|i| {
            let t = i as f64 / 999.0;
            Point3::new(t, (t * 40.0).sin() * 0.05, 0.0)
        })
        .collect();

    c.bench_function("rdp_1000_points", |b| {
        b.iter(|| rdp_mask(&points, 0.003));
    });
}

fn bench_generation(c: &mut Criterion) {
    let scalp = create_scalp(50);
    let atlas = UvZoneAtlas::from_json(
        r#"{
            "long":  { "a": { "wide": [[[0.0, 0.0], [0.1, 1.0]]], "narrow": [[[0.1, 0.0], [0.2, 1.0]]] } },
            "short": { "b": { "wide": [[[0.5, 0.0], [0.6, 0.5]]], "narrow": [[[0.6, 0.0], [0.7, 0.5]]] } }
        }"#,
    )
    .unwrap();

    for quality in [QualityTier::Ultra, QualityTier::Low] {
        c.bench_function(&format!("generate_3000_strands_{}", quality), |b| {
            b.iter(|| {
                let hair = create_hair(3000, 20);
                let mut collection = HairCollection::new(hair, &scalp).unwrap();
                collection.create_mesh(quality).unwrap();
                collection
                    .add_uvs(&atlas, &mut Pcg32::seed_from_u64(0))
                    .unwrap();
                collection.objects().len()
            });
        });
    }
}

criterion_group!(benches, bench_spatial, bench_simplify, bench_generation);
criterion_main!(benches);
