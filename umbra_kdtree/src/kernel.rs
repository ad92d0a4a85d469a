// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batched ray/sphere intersection kernel.
//!
//! Candidates are evaluated four at a time with `wide::f32x4`, masking out
//! lanes with negative discriminants; a remainder shorter than four lanes
//! runs through the scalar formula. Both paths solve the same quadratic for
//! a unit-direction ray and keep the nearest strictly positive root, so the
//! sphere set's SoA layout is gathered per axis straight into lanes.

use wide::{CmpGe, f32x4};

use crate::types::{Axis, Hit, Ray, SphereSet};

#[cfg(all(not(feature = "std"), not(feature = "libm")))]
compile_error!("umbra_kdtree requires either the `std` or `libm` feature");

#[inline]
fn sqrt_f32(x: f32) -> f32 {
    #[cfg(feature = "std")]
    {
        x.sqrt()
    }
    #[cfg(all(not(feature = "std"), feature = "libm"))]
    {
        libm::sqrtf(x)
    }
}

/// Nearest positive hit distance for one sphere, or `None`.
///
/// With a unit direction the quadratic has `a = 1`: for
/// `b = 2·dir·(origin−center)` and `c = |origin−center|² − r²` the roots are
/// `(−b ∓ √(b²−4c)) / 2`. When the origin is inside the sphere the near root
/// is negative and the exit root is returned instead.
pub fn sphere_hit(ray: &Ray, center: glam::Vec3, radius: f32) -> Option<f32> {
    let delta = ray.origin() - center;
    let b = 2.0 * ray.direction().dot(delta);
    let c = delta.length_squared() - radius * radius;
    let disc = b * b - 4.0 * c;
    if disc < 0.0 {
        return None;
    }
    let root = sqrt_f32(disc);
    let t1 = (-b - root) * 0.5;
    if t1 > 0.0 {
        return Some(t1);
    }
    let t2 = (-b + root) * 0.5;
    (t2 > 0.0).then_some(t2)
}

/// Nearest hit among the candidate sphere indices of one leaf.
///
/// Whole groups of four go down the SIMD path; the remainder is scalar.
pub fn nearest_hit(ray: &Ray, indices: &[u32], spheres: &SphereSet) -> Option<Hit> {
    let mut best = f32::INFINITY;
    let batched = indices.len() - indices.len() % 4;
    for group in indices[..batched].chunks_exact(4) {
        best = best.min(group_min(ray, group, spheres));
    }
    for &i in &indices[batched..] {
        if let Some(t) = sphere_hit(ray, spheres.center(i as usize), spheres.radius(i as usize))
            && t < best
        {
            best = t;
        }
    }
    best.is_finite().then_some(Hit { distance: best })
}

/// Brute-force nearest hit over the whole set, scalar only.
///
/// The linear analogue of the tree query; tests and benches use it as the
/// reference answer.
pub fn nearest_hit_all(ray: &Ray, spheres: &SphereSet) -> Option<Hit> {
    let mut best = f32::INFINITY;
    for i in 0..spheres.len() {
        if let Some(t) = sphere_hit(ray, spheres.center(i), spheres.radius(i))
            && t < best
        {
            best = t;
        }
    }
    best.is_finite().then_some(Hit { distance: best })
}

/// Minimum positive hit distance across one group of four candidates,
/// `f32::INFINITY` when none of the lanes hits.
fn group_min(ray: &Ray, group: &[u32], spheres: &SphereSet) -> f32 {
    let gather = |f: &dyn Fn(usize) -> f32| {
        f32x4::from([
            f(group[0] as usize),
            f(group[1] as usize),
            f(group[2] as usize),
            f(group[3] as usize),
        ])
    };

    let mut b = f32x4::ZERO;
    let mut c = f32x4::ZERO;
    for axis in Axis::ALL {
        let centers = gather(&|i| spheres.center_coord(axis, i));
        let delta = f32x4::splat(ray.origin()[axis.index()]) - centers;
        b += f32x4::splat(2.0 * ray.direction()[axis.index()]) * delta;
        c += delta * delta;
    }
    let radii = gather(&|i| spheres.radius(i));
    let c = c - radii * radii;

    let disc = b * b - f32x4::splat(4.0) * c;
    let mask = disc.cmp_ge(f32x4::ZERO);
    let root = disc.sqrt();
    let half = f32x4::splat(0.5);
    let miss = f32x4::splat(f32::NEG_INFINITY);
    // Lanes that missed collapse to -inf and fail every `> 0` test below.
    let t1 = mask.blend((-b - root) * half, miss).to_array();
    let t2 = mask.blend((-b + root) * half, miss).to_array();

    let mut best = f32::INFINITY;
    for lane in 0..4 {
        let t = if t1[lane] > 0.0 { t1[lane] } else { t2[lane] };
        if t > 0.0 && t < best {
            best = t;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{Rng, absf};
    use crate::types::Sphere;
    use alloc::vec::Vec;
    use glam::Vec3;

    fn unit_sphere_at_origin() -> SphereSet {
        SphereSet::from_spheres(&[Sphere::new(Vec3::ZERO, 1.0)]).unwrap()
    }

    #[test]
    fn head_on_hit_at_distance_four() {
        let set = unit_sphere_at_origin();
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)).unwrap();
        let hit = nearest_hit_all(&ray, &set).unwrap();
        assert!(absf(hit.distance - 4.0) < 1e-4);
    }

    #[test]
    fn pointing_away_misses() {
        let set = unit_sphere_at_origin();
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        assert!(nearest_hit_all(&ray, &set).is_none());
    }

    #[test]
    fn origin_inside_sphere_returns_exit_distance() {
        let set = unit_sphere_at_origin();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let hit = nearest_hit_all(&ray, &set).unwrap();
        assert!(absf(hit.distance - 1.0) < 1e-4);
    }

    #[test]
    fn grazing_miss() {
        let set = unit_sphere_at_origin();
        let ray = Ray::new(Vec3::new(5.0, 2.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)).unwrap();
        assert!(nearest_hit_all(&ray, &set).is_none());
    }

    #[test]
    fn batched_and_scalar_paths_agree() {
        let mut rng = Rng::new(0x51E9_D00D);
        for _ in 0..50 {
            let count = 1 + (rng.next_u64() % 23) as usize;
            let mut spheres = Vec::with_capacity(count);
            for _ in 0..count {
                let center = Vec3::new(
                    rng.next_f32() * 20.0 - 10.0,
                    rng.next_f32() * 20.0 - 10.0,
                    rng.next_f32() * 20.0 - 10.0,
                );
                spheres.push(Sphere::new(center, rng.next_f32() * 3.0));
            }
            let set = SphereSet::from_spheres(&spheres).unwrap();
            let indices: Vec<u32> = (0..count as u32).collect();

            let origin = Vec3::new(
                rng.next_f32() * 30.0 - 15.0,
                rng.next_f32() * 30.0 - 15.0,
                rng.next_f32() * 30.0 - 15.0,
            );
            let dir = Vec3::new(
                rng.next_f32() * 2.0 - 1.0,
                rng.next_f32() * 2.0 - 1.0,
                rng.next_f32() * 2.0 - 1.0,
            );
            let Ok(ray) = Ray::new(origin, dir) else {
                continue;
            };

            let batched = nearest_hit(&ray, &indices, &set);
            let scalar = nearest_hit_all(&ray, &set);
            match (batched, scalar) {
                (None, None) => {}
                (Some(a), Some(b)) => {
                    let scale = absf(b.distance).max(1.0);
                    assert!(
                        absf(a.distance - b.distance) <= 1e-4 * scale,
                        "batched {a:?} vs scalar {b:?}"
                    );
                }
                (a, b) => panic!("hit/no-hit mismatch: batched {a:?} vs scalar {b:?}"),
            }
        }
    }

    #[test]
    fn kernel_reports_minimum_over_candidates() {
        let spheres: Vec<Sphere> = (0..9)
            .map(|i| Sphere::new(Vec3::new(2.0 + i as f32 * 3.0, 0.0, 0.0), 1.0))
            .collect();
        let set = SphereSet::from_spheres(&spheres).unwrap();
        // Reverse order: the nearest sphere sits last in the candidate list.
        let indices: Vec<u32> = (0..9_u32).rev().collect();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let hit = nearest_hit(&ray, &indices, &set).unwrap();
        assert!(absf(hit.distance - 1.0) < 1e-4);
    }
}
