// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Builds an index over spheres strung along a diagonal line and fires a
//! few rays at it, printing tree statistics and the resulting distances.

use umbra_kdtree::{KdError, KdTree, Ray, Sphere, SphereSet, Vec3};

const SPHERE_COUNT: usize = 10_000;

fn main() -> Result<(), KdError> {
    let spheres: Vec<Sphere> = (0..SPHERE_COUNT)
        .map(|j| {
            let c = (j + 10) as f32;
            Sphere::new(Vec3::new(c, c, c), 2.0)
        })
        .collect();
    let set = SphereSet::from_spheres(&spheres)?;
    let tree = KdTree::build(set);

    println!(
        "built index: {} spheres, {} nodes, {} leaves, depth {}",
        tree.sphere_count(),
        tree.node_count(),
        tree.leaf_count(),
        tree.max_depth(),
    );

    // Down the line from beyond its far end, straight at the first sphere,
    // and parallel to the line but offset past every sphere's radius.
    let probes = [
        (Vec3::splat(20_000.0), Vec3::splat(-1.0)),
        (Vec3::ZERO, Vec3::splat(1.0)),
        (Vec3::new(0.0, 5.0, 0.0), Vec3::new(1.0, 1.0, 1.0)),
    ];
    for (origin, direction) in probes {
        let ray = Ray::new(origin, direction)?;
        match tree.nearest_hit(&ray) {
            Some(hit) => println!("ray from {origin}: hit at distance {}", hit.distance),
            None => println!("ray from {origin}: miss"),
        }
    }
    Ok(())
}
