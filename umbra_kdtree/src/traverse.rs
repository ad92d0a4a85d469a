// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Front-to-back tree traversal with an explicit stack.

use alloc::vec::Vec;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::kernel;
use crate::tree::{KdTree, Node};
use crate::types::{Hit, Ray};

/// A suspended far-side subtree: node index plus its parametric interval.
#[derive(Copy, Clone, Debug)]
struct Frame {
    node: u32,
    tnear: f32,
    tfar: f32,
}

impl KdTree {
    /// Nearest hit of `ray` against the indexed spheres, or `None`.
    ///
    /// Walks the tree front to back, narrowing the parametric interval at
    /// every crossed split plane and deferring far children on a stack.
    /// The first leaf hit that lands inside the leaf's interval ends the
    /// query: leaves are visited in ray order and straddling spheres are
    /// listed in every leaf they overlap, so that hit is the global
    /// nearest. A hit past the interval is dropped; the same sphere
    /// reappears in the leaf that owns the farther interval.
    pub fn nearest_hit(&self, ray: &Ray) -> Option<Hit> {
        let bounds = self.bounds?;
        let (mut tnear, mut tfar) = bounds.ray_interval(ray);
        if tnear > tfar || tfar < 0.0 {
            return None;
        }
        tnear = tnear.max(0.0);

        let mut node = 0_u32;
        let mut stack: Vec<Frame> = Vec::new();
        loop {
            while let Node::Inner {
                axis,
                split,
                children,
            } = self.nodes[node as usize]
            {
                let a = axis.index();
                let origin = ray.origin()[a];
                let dir = ray.direction()[a];
                // For an in-plane direction the ray never crosses the
                // split, which reads as "crossing at +inf": near side only.
                let tsplit = if dir != 0.0 {
                    (split - origin) * ray.inv_direction()[a]
                } else {
                    f32::INFINITY
                };
                let near_is_left = origin < split || (origin == split && dir < 0.0);
                let (near, far) = if near_is_left {
                    (children, children + 1)
                } else {
                    (children + 1, children)
                };
                if tsplit <= 0.0 {
                    // Crossing behind the origin: for t >= 0 the ray stays
                    // on the origin side no matter the interval.
                    node = near;
                } else if tsplit <= tnear {
                    node = far;
                } else if tsplit >= tfar {
                    node = near;
                } else {
                    stack.push(Frame {
                        node: far,
                        tnear: tsplit,
                        tfar,
                    });
                    node = near;
                    tfar = tsplit;
                }
            }

            let Node::Leaf { items } = self.nodes[node as usize] else {
                unreachable!("inner loop exits only at a leaf");
            };
            let leaf = &self.leaf_items[items as usize];
            if let Some(hit) = kernel::nearest_hit(ray, leaf, &self.spheres)
                && hit.distance <= tfar
            {
                return Some(hit);
            }

            let Some(frame) = stack.pop() else {
                return None;
            };
            node = frame.node;
            tnear = frame.tnear;
            tfar = frame.tfar;
        }
    }

    /// Nearest hits for a batch of rays, one result per input ray in order.
    ///
    /// Equivalent to calling [`KdTree::nearest_hit`] per ray; with the
    /// `parallel` feature the batch fans out across rayon workers, which is
    /// safe because queries never mutate the index.
    pub fn nearest_hits(&self, rays: &[Ray]) -> Vec<Option<Hit>> {
        #[cfg(feature = "parallel")]
        {
            rays.par_iter().map(|ray| self.nearest_hit(ray)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            rays.iter().map(|ray| self.nearest_hit(ray)).collect()
        }
    }
}
