// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface-area-heuristic split selection.
//!
//! Candidate planes are not sampled: each sphere contributes its two extent
//! boundaries (`center - radius`, `center + radius`) per axis, restricted to
//! planes strictly inside the current box. For a plane `p` the cost is
//!
//! `count_left · surface(left)/surface(box) + count_right · surface(right)/surface(box)`
//!
//! where a sphere counts as left only when its rightmost extent is `<= p`
//! and as right only when its leftmost extent is `>= p`; straddlers count
//! for neither side. The global minimum over all three axes is returned with
//! a deterministic tie-break so repeated builds produce identical trees.

use crate::bounds::Aabb3;
use crate::fanout;
use crate::types::{Axis, SphereSet};

/// A proposed split plane and its heuristic cost.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SplitCandidate {
    /// Axis the plane is perpendicular to.
    pub axis: Axis,
    /// Plane position along that axis.
    pub position: f32,
    /// Non-negative SAH cost.
    pub cost: f32,
}

impl SplitCandidate {
    /// Strict ordering used to pick the winner: lower cost first, ties
    /// broken by axis order X, Y, Z, then ascending position. Independent
    /// of evaluation order, so sequential and per-axis-parallel runs agree.
    fn better_than(&self, other: &Self) -> bool {
        if self.cost != other.cost {
            return self.cost < other.cost;
        }
        if self.axis != other.axis {
            return self.axis.index() < other.axis.index();
        }
        self.position < other.position
    }
}

/// Find the minimal-cost split for `items` within `bounds`.
///
/// Returns `None` when no admissible candidate exists (no extent boundary
/// falls strictly inside the box, or the box has no usable surface); the
/// builder then falls back to splitting at the items' extent midpoint.
pub fn choose_split(spheres: &SphereSet, items: &[u32], bounds: &Aabb3) -> Option<SplitCandidate> {
    let per_axis = fanout::per_axis(|axis| min_cost_on_axis(spheres, items, bounds, axis));
    per_axis
        .into_iter()
        .flatten()
        .reduce(|best, cand| if cand.better_than(&best) { cand } else { best })
}

fn min_cost_on_axis(
    spheres: &SphereSet,
    items: &[u32],
    bounds: &Aabb3,
    axis: Axis,
) -> Option<SplitCandidate> {
    let whole = bounds.surface();
    if whole <= 0.0 || whole.is_nan() {
        return None;
    }
    let mut best: Option<SplitCandidate> = None;
    for &i in items {
        let c = spheres.center_coord(axis, i as usize);
        let r = spheres.radius(i as usize);
        for position in [c - r, c + r] {
            if !bounds.contains_coord(axis, position) {
                continue;
            }
            let cand = evaluate(spheres, items, bounds, axis, position, whole);
            if best.is_none_or(|b| cand.better_than(&b)) {
                best = Some(cand);
            }
        }
    }
    best
}

fn evaluate(
    spheres: &SphereSet,
    items: &[u32],
    bounds: &Aabb3,
    axis: Axis,
    position: f32,
    whole: f32,
) -> SplitCandidate {
    let (left_box, right_box) = bounds.split(axis, position);
    let mut left = 0_usize;
    let mut right = 0_usize;
    for &i in items {
        let c = spheres.center_coord(axis, i as usize);
        let r = spheres.radius(i as usize);
        if c + r <= position {
            left += 1;
        } else if c - r >= position {
            right += 1;
        }
    }
    let cost =
        left as f32 * (left_box.surface() / whole) + right as f32 * (right_box.surface() / whole);
    SplitCandidate {
        axis,
        position,
        cost,
    }
}
