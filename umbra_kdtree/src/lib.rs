// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Umbra KD-tree: a SAH-driven spatial index over spheres answering
//! nearest-hit ray queries.
//!
//! - Build once from a [`SphereSet`]; the index is immutable afterwards and
//!   any number of threads may query it concurrently.
//! - Splits are chosen by a surface-area heuristic over each sphere's extent
//!   boundaries, with an extent-midpoint fallback for degenerate regions.
//! - The tree is a flat node arena (no per-node allocation, no pointers);
//!   children of an inner node are adjacent and addressed by index.
//! - Queries walk the tree front to back with an explicit stack and hand
//!   leaf candidate lists to a 4-wide SIMD intersection kernel.
//!
//! # Example
//!
//! ```rust
//! use umbra_kdtree::{KdTree, Ray, Sphere, SphereSet, Vec3};
//!
//! let set = SphereSet::from_spheres(&[
//!     Sphere::new(Vec3::ZERO, 1.0),
//!     Sphere::new(Vec3::new(4.0, 0.0, 0.0), 1.0),
//! ])
//! .unwrap();
//! let tree = KdTree::build(set);
//!
//! // The direction need not be normalized; the ray constructor does it.
//! let ray = Ray::new(Vec3::new(6.0, 0.0, 0.0), Vec3::new(-2.0, 0.0, 0.0)).unwrap();
//! let hit = tree.nearest_hit(&ray).unwrap();
//! assert!((hit.distance - 1.0).abs() < 1e-4);
//!
//! // Malformed input is rejected at the boundary, not clamped.
//! assert!(SphereSet::from_spheres(&[Sphere::new(Vec3::ZERO, -1.0)]).is_err());
//! ```
//!
//! ## Feature flags
//!
//! - `std` (default): std builds; forwards `std` to glam and wide.
//! - `libm`: scalar math via libm for `no_std` targets.
//! - `parallel`: rayon-backed per-axis build evaluation and batch queries
//!   ([`KdTree::nearest_hits`]). Results are identical with or without it.
//!
//! ## Float semantics
//!
//! Coordinates are `f32` and assumed finite. Negative radii and degenerate
//! ray directions are rejected with [`KdError`]; everything else (empty
//! sets, coincident spheres, the node cap) degrades gracefully instead of
//! erroring.

#![no_std]

extern crate alloc;

pub mod bounds;
pub mod error;
pub mod kernel;
pub mod sah;
pub mod tree;
pub mod types;

mod fanout;
mod traverse;

pub use bounds::Aabb3;
pub use error::KdError;
pub use glam::Vec3;
pub use sah::SplitCandidate;
pub use tree::{BuildOptions, KdTree};
pub use types::{Axis, Hit, Ray, Sphere, SphereSet};
