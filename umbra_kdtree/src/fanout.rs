// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-axis fan-out helper.
//!
//! Bounding-extent and SAH evaluation are pure per axis and write disjoint
//! outputs, so the three axes may run on worker threads. With the `parallel`
//! feature the closures are handed to rayon's join; without it they run
//! sequentially. Both orderings produce the same `[X, Y, Z]` result array.

use crate::types::Axis;

#[cfg(feature = "parallel")]
pub(crate) fn per_axis<R, F>(f: F) -> [R; 3]
where
    R: Send,
    F: Fn(Axis) -> R + Sync,
{
    let f = &f;
    let ((x, y), z) = rayon::join(|| rayon::join(|| f(Axis::X), || f(Axis::Y)), || f(Axis::Z));
    [x, y, z]
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn per_axis<R, F>(f: F) -> [R; 3]
where
    F: Fn(Axis) -> R,
{
    [f(Axis::X), f(Axis::Y), f(Axis::Z)]
}
