// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use umbra_kdtree::{KdTree, Ray, Sphere, SphereSet, Vec3, kernel};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f32(&mut self) -> f32 {
        let v = self.next_u64() >> 40;
        (v as f32) / ((1u64 << 24) as f32)
    }
}

/// Worst-case colinear workload: spheres of radius 2 along a diagonal line.
fn line_set(count: usize) -> SphereSet {
    let spheres: Vec<Sphere> = (0..count)
        .map(|j| {
            let c = (j + 10) as f32;
            Sphere::new(Vec3::new(c, c, c), 2.0)
        })
        .collect();
    SphereSet::from_spheres(&spheres).unwrap()
}

fn random_set(count: usize, extent: f32) -> SphereSet {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    let spheres: Vec<Sphere> = (0..count)
        .map(|_| {
            let center = Vec3::new(
                rng.next_f32() * extent,
                rng.next_f32() * extent,
                rng.next_f32() * extent,
            );
            Sphere::new(center, 0.5 + rng.next_f32() * 2.0)
        })
        .collect();
    SphereSet::from_spheres(&spheres).unwrap()
}

fn query_rays(count: usize, extent: f32) -> Vec<Ray> {
    let mut rng = Rng::new(0x51E9_D00D_0BAD_CAFE);
    (0..count)
        .filter_map(|_| {
            let origin = Vec3::new(
                rng.next_f32() * extent,
                rng.next_f32() * extent,
                rng.next_f32() * extent,
            );
            let dir = Vec3::new(
                rng.next_f32() * 2.0 - 1.0,
                rng.next_f32() * 2.0 - 1.0,
                rng.next_f32() * 2.0 - 1.0,
            );
            Ray::new(origin, dir).ok()
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[1_000_usize, 10_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("line/{n}"), |b| {
            let set = line_set(n);
            b.iter(|| KdTree::build(black_box(set.clone())));
        });
        group.bench_function(format!("random/{n}"), |b| {
            let set = random_set(n, 200.0);
            b.iter(|| KdTree::build(black_box(set.clone())));
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let rays = query_rays(256, 200.0);
    for &n in &[1_000_usize, 10_000] {
        let set = random_set(n, 200.0);
        let tree = KdTree::build(set.clone());
        group.throughput(Throughput::Elements(rays.len() as u64));
        group.bench_function(format!("kdtree/{n}"), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                for ray in &rays {
                    if tree.nearest_hit(black_box(ray)).is_some() {
                        hits += 1;
                    }
                }
                hits
            });
        });
        group.bench_function(format!("linear/{n}"), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                for ray in &rays {
                    if kernel::nearest_hit_all(black_box(ray), &set).is_some() {
                        hits += 1;
                    }
                }
                hits
            });
        });
    }
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    let rays = query_rays(4_096, 200.0);
    let tree = KdTree::build(random_set(10_000, 200.0));
    group.throughput(Throughput::Elements(rays.len() as u64));
    group.bench_function("nearest_hits/10000", |b| {
        b.iter(|| tree.nearest_hits(black_box(&rays)));
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_query, bench_batch);
criterion_main!(benches);
