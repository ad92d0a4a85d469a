// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types: spheres, sphere sets, rays, axes, hits.

use alloc::vec::Vec;
use glam::Vec3;

use crate::error::KdError;

/// The three coordinate axes of a split plane.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// X axis.
    X = 0,
    /// Y axis.
    Y = 1,
    /// Z axis.
    Z = 2,
}

impl Axis {
    /// All axes in the canonical X, Y, Z order used for cost tie-breaks.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// The axis as a `Vec3` component index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Round-robin successor, used by the extent-midpoint split recovery.
    #[inline]
    pub const fn next(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::Z,
            Self::Z => Self::X,
        }
    }
}

/// A sphere: center position and non-negative radius.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    /// Center position.
    pub center: Vec3,
    /// Radius. Must be `>= 0`; enforced when building a [`SphereSet`].
    pub radius: f32,
}

impl Sphere {
    /// Create a sphere from center and radius.
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Immutable sphere collection in structure-of-arrays layout.
///
/// Coordinates are stored as one column per axis plus a radius column so the
/// batched intersection kernel can gather a lane's worth of values per axis.
/// Spheres are identified everywhere by their index into this set; nothing in
/// the tree copies sphere data.
#[derive(Clone, PartialEq)]
pub struct SphereSet {
    centers: [Vec<f32>; 3],
    radii: Vec<f32>,
}

impl SphereSet {
    /// Build a set from array-of-structs input, rejecting invalid radii.
    pub fn from_spheres(spheres: &[Sphere]) -> Result<Self, KdError> {
        let mut centers = [
            Vec::with_capacity(spheres.len()),
            Vec::with_capacity(spheres.len()),
            Vec::with_capacity(spheres.len()),
        ];
        let mut radii = Vec::with_capacity(spheres.len());
        for (index, s) in spheres.iter().enumerate() {
            if s.radius < 0.0 || s.radius.is_nan() {
                return Err(KdError::InvalidRadius {
                    index,
                    radius: s.radius,
                });
            }
            for axis in Axis::ALL {
                centers[axis.index()].push(s.center[axis.index()]);
            }
            radii.push(s.radius);
        }
        Ok(Self { centers, radii })
    }

    /// Build a set from parallel columns (`x`, `y`, `z`, radii).
    ///
    /// All four columns must have the same length and radii must be `>= 0`.
    pub fn from_columns(
        x: Vec<f32>,
        y: Vec<f32>,
        z: Vec<f32>,
        radii: Vec<f32>,
    ) -> Result<Self, KdError> {
        let n = radii.len();
        if x.len() != n || y.len() != n || z.len() != n {
            return Err(KdError::ColumnLengthMismatch {
                centers: x.len().max(y.len()).max(z.len()),
                radii: n,
            });
        }
        if let Some((index, &radius)) = radii
            .iter()
            .enumerate()
            .find(|(_, r)| **r < 0.0 || r.is_nan())
        {
            return Err(KdError::InvalidRadius { index, radius });
        }
        Ok(Self {
            centers: [x, y, z],
            radii,
        })
    }

    /// Number of spheres in the set.
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    /// One coordinate of a sphere's center.
    #[inline]
    pub fn center_coord(&self, axis: Axis, i: usize) -> f32 {
        self.centers[axis.index()][i]
    }

    /// A sphere's center as a point.
    #[inline]
    pub fn center(&self, i: usize) -> Vec3 {
        Vec3::new(self.centers[0][i], self.centers[1][i], self.centers[2][i])
    }

    /// A sphere's radius.
    #[inline]
    pub fn radius(&self, i: usize) -> f32 {
        self.radii[i]
    }

    /// Reassemble a sphere by index.
    pub fn sphere(&self, i: usize) -> Sphere {
        Sphere::new(self.center(i), self.radius(i))
    }
}

impl core::fmt::Debug for SphereSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SphereSet")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// A query ray with unit-length direction.
///
/// The constructor normalizes the supplied direction and precomputes the
/// per-axis inverse direction used by slab tests and plane crossings.
/// Components of the inverse may be infinite for axis-parallel rays.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    inv_direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    ///
    /// Returns [`KdError::DegenerateDirection`] for zero-length or
    /// non-finite directions instead of letting NaNs reach traversal.
    pub fn new(origin: Vec3, direction: Vec3) -> Result<Self, KdError> {
        let direction = direction
            .try_normalize()
            .ok_or(KdError::DegenerateDirection)?;
        Ok(Self {
            origin,
            direction,
            inv_direction: direction.recip(),
        })
    }

    /// Ray origin.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Unit-length ray direction.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Per-axis reciprocal of the direction.
    #[inline]
    pub fn inv_direction(&self) -> Vec3 {
        self.inv_direction
    }
}

/// The nearest valid intersection found for a ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hit {
    /// Distance along the ray to the nearest hit point. Always `> 0`.
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn from_spheres_rejects_negative_radius() {
        let err = SphereSet::from_spheres(&[
            Sphere::new(Vec3::ZERO, 1.0),
            Sphere::new(Vec3::ONE, -0.5),
        ])
        .unwrap_err();
        assert!(matches!(err, KdError::InvalidRadius { index: 1, .. }));
    }

    #[test]
    fn from_columns_rejects_length_mismatch() {
        let err = SphereSet::from_columns(vec![0.0, 1.0], vec![0.0], vec![0.0, 1.0], vec![1.0, 1.0])
            .unwrap_err();
        assert!(matches!(err, KdError::ColumnLengthMismatch { .. }));
    }

    #[test]
    fn soa_round_trips_spheres() {
        let input = [
            Sphere::new(Vec3::new(1.0, 2.0, 3.0), 0.5),
            Sphere::new(Vec3::new(-4.0, 0.0, 9.0), 2.0),
        ];
        let set = SphereSet::from_spheres(&input).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.sphere(0), input[0]);
        assert_eq!(set.sphere(1), input[1]);
        assert_eq!(set.center_coord(Axis::Z, 1), 9.0);
    }

    #[test]
    fn ray_normalizes_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0)).unwrap();
        assert_eq!(ray.direction(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn zero_direction_is_rejected() {
        let err = Ray::new(Vec3::ZERO, Vec3::ZERO).unwrap_err();
        assert!(matches!(err, KdError::DegenerateDirection));
    }
}
