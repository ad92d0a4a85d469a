// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounding boxes: enclosing volumes, splits, and slab tests.

use glam::Vec3;

use crate::fanout;
use crate::types::{Axis, Ray, SphereSet};

/// Axis-aligned box given by its min and max corners.
///
/// Every box that represents a real region satisfies `min[a] <= max[a]` on
/// each axis. Child boxes are produced only by [`Aabb3::split`], which clips
/// the parent at a plane and leaves the other axes untouched.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb3 {
    /// Create a box from corners.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// The smallest box containing the full extent (center ± radius per
    /// axis) of every sphere in the set. `None` for an empty set; callers
    /// treat that as "no index", never as a degenerate box.
    pub fn enclosing(spheres: &SphereSet) -> Option<Self> {
        if spheres.is_empty() {
            return None;
        }
        let extents = fanout::per_axis(|axis| Self::axis_extent(spheres, axis));
        Some(Self {
            min: Vec3::new(extents[0].0, extents[1].0, extents[2].0),
            max: Vec3::new(extents[0].1, extents[1].1, extents[2].1),
        })
    }

    fn axis_extent(spheres: &SphereSet, axis: Axis) -> (f32, f32) {
        let mut lo = spheres.center_coord(axis, 0) - spheres.radius(0);
        let mut hi = spheres.center_coord(axis, 0) + spheres.radius(0);
        for i in 1..spheres.len() {
            let c = spheres.center_coord(axis, i);
            let r = spheres.radius(i);
            lo = lo.min(c - r);
            hi = hi.max(c + r);
        }
        (lo, hi)
    }

    /// Proportional surface measure `dx·dy + dx·dz + dy·dz`.
    ///
    /// The conventional doubling is dropped; only cost ratios matter and the
    /// same measure is used on both sides of every SAH comparison.
    pub fn surface(&self) -> f32 {
        let d = self.max - self.min;
        d.x * d.y + d.x * d.z + d.y * d.z
    }

    /// Clip the box at `at` along `axis`, yielding (left, right).
    pub fn split(&self, axis: Axis, at: f32) -> (Self, Self) {
        let mut left = *self;
        let mut right = *self;
        left.max[axis.index()] = at;
        right.min[axis.index()] = at;
        (left, right)
    }

    /// Whether `coord` lies inside the box on `axis`, boundaries excluded.
    pub fn contains_coord(&self, axis: Axis, coord: f32) -> bool {
        self.min[axis.index()] < coord && coord < self.max[axis.index()]
    }

    /// Slab test: the parametric interval `[tnear, tfar]` over which the ray
    /// is inside the box. A miss is reported as `tnear > tfar`; the interval
    /// may extend behind the origin and is clamped by the caller.
    pub fn ray_interval(&self, ray: &Ray) -> (f32, f32) {
        let mut tnear = f32::NEG_INFINITY;
        let mut tfar = f32::INFINITY;
        for axis in Axis::ALL {
            let a = axis.index();
            let t1 = (self.min[a] - ray.origin()[a]) * ray.inv_direction()[a];
            let t2 = (self.max[a] - ray.origin()[a]) * ray.inv_direction()[a];
            // f32::min/max ignore a NaN operand, which drops the
            // 0 * inf slabs produced by axis-parallel rays on a boundary.
            tnear = tnear.max(t1.min(t2));
            tfar = tfar.min(t1.max(t2));
        }
        (tnear, tfar)
    }
}
