// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Queries a randomly scattered scene with a large ray batch through
//! [`KdTree::nearest_hits`], which fans out across rayon workers when the
//! `parallel` feature is enabled (it is, for this demo).

use umbra_kdtree::{KdError, KdTree, Ray, Sphere, SphereSet, Vec3};

struct Rng(u64);

impl Rng {
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
        (v as f32) / ((1_u64 << 24) as f32)
    }
}

fn main() -> Result<(), KdError> {
    let mut rng = Rng(0x1D10_7C0FFEE);

    let spheres: Vec<Sphere> = (0..50_000)
        .map(|_| {
            let center = Vec3::new(
                rng.next_f32() * 1_000.0,
                rng.next_f32() * 1_000.0,
                rng.next_f32() * 1_000.0,
            );
            Sphere::new(center, 0.5 + rng.next_f32() * 3.0)
        })
        .collect();
    let tree = KdTree::build(SphereSet::from_spheres(&spheres)?);
    println!(
        "built index: {} spheres, {} nodes, {} leaves",
        tree.sphere_count(),
        tree.node_count(),
        tree.leaf_count(),
    );

    let mut rays = Vec::with_capacity(100_000);
    while rays.len() < 100_000 {
        let origin = Vec3::new(
            rng.next_f32() * 1_200.0 - 100.0,
            rng.next_f32() * 1_200.0 - 100.0,
            rng.next_f32() * 1_200.0 - 100.0,
        );
        let direction = Vec3::new(
            rng.next_f32() * 2.0 - 1.0,
            rng.next_f32() * 2.0 - 1.0,
            rng.next_f32() * 2.0 - 1.0,
        );
        if let Ok(ray) = Ray::new(origin, direction) {
            rays.push(ray);
        }
    }

    let hits = tree.nearest_hits(&rays);
    let hit_count = hits.iter().filter(|h| h.is_some()).count();
    let nearest = hits
        .iter()
        .flatten()
        .map(|h| h.distance)
        .fold(f32::INFINITY, f32::min);
    println!(
        "{hit_count} of {} rays hit; nearest hit at distance {nearest}",
        rays.len(),
    );
    Ok(())
}
