// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! KD-tree construction: worklist-driven partitioning into a flat node arena.

use alloc::vec;
use alloc::vec::Vec;

use crate::bounds::Aabb3;
use crate::sah::choose_split;
use crate::types::{Axis, SphereSet};

/// One node of the packed tree.
///
/// Children of an inner node are allocated adjacently; the stored index
/// addresses the left child and the right child sits at `children + 1`.
/// Leaves reference a row of the leaf-contents table instead of owning
/// their index list, keeping the arena a single relocatable block.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Node {
    /// Interior split node.
    Inner {
        /// Axis of the split plane.
        axis: Axis,
        /// Position of the split plane along `axis`.
        split: f32,
        /// Arena index of the left child; the right child is `children + 1`.
        children: u32,
    },
    /// Terminal node.
    Leaf {
        /// Row in the leaf-contents table.
        items: u32,
    },
}

/// Build-time tuning knobs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BuildOptions {
    /// Regions at or below this sphere count become leaves.
    pub leaf_threshold: usize,
    /// Hard ceiling on arena size; reaching it forces remaining regions
    /// into (possibly oversized) leaves instead of failing.
    pub max_nodes: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            leaf_threshold: 12,
            max_nodes: 6_000_000,
        }
    }
}

/// A pending region on the build worklist.
struct Pending {
    node: u32,
    bounds: Aabb3,
    items: Vec<u32>,
    /// First axis the extent-midpoint recovery tries for this region;
    /// children rotate it so repeated recoveries cycle X, Y, Z.
    fallback_axis: Axis,
}

/// Extent-based classification at a plane: a sphere goes left when its
/// rightmost extent is at or before the plane, right when its leftmost
/// extent is at or past it, and into *both* children when its radius
/// crosses the plane. Every leaf therefore lists every sphere overlapping
/// its region, which traversal relies on to stop at the first in-interval
/// hit.
fn partition(
    spheres: &SphereSet,
    items: &[u32],
    axis: Axis,
    position: f32,
) -> (Vec<u32>, Vec<u32>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for &i in items {
        let c = spheres.center_coord(axis, i as usize);
        let r = spheres.radius(i as usize);
        if c + r <= position {
            left.push(i);
        } else if c - r >= position {
            right.push(i);
        } else {
            left.push(i);
            right.push(i);
        }
    }
    (left, right)
}

/// Midpoint of the items' own extent on `axis`, provided the items have
/// spread there and the plane falls strictly inside the region's box.
///
/// Used when the heuristic's plane (or the previous axis) separates
/// nothing; the region's box can vastly exceed what its items occupy, so
/// the box midpoint is no use for recovery, but the items' extent midpoint
/// is.
fn extent_midpoint(spheres: &SphereSet, items: &[u32], axis: Axis, bounds: &Aabb3) -> Option<f32> {
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for &i in items {
        let c = spheres.center_coord(axis, i as usize);
        let r = spheres.radius(i as usize);
        lo = lo.min(c - r);
        hi = hi.max(c + r);
    }
    let position = 0.5 * (lo + hi);
    (lo < position && position < hi && bounds.contains_coord(axis, position)).then_some(position)
}

/// An immutable spatial index over a set of spheres.
///
/// Built once, then queried any number of times; concurrent read-only
/// queries are safe because nothing is mutated after [`KdTree::build`]
/// returns. Rebuilding means constructing a new tree.
#[derive(Clone, PartialEq)]
pub struct KdTree {
    pub(crate) spheres: SphereSet,
    pub(crate) nodes: Vec<Node>,
    pub(crate) leaf_items: Vec<Vec<u32>>,
    pub(crate) bounds: Option<Aabb3>,
    leaf_count: usize,
}

impl KdTree {
    /// Build an index with default [`BuildOptions`].
    ///
    /// An empty set is accepted and produces an index that misses every ray.
    pub fn build(spheres: SphereSet) -> Self {
        Self::build_with(spheres, &BuildOptions::default())
    }

    /// Build an index with explicit options.
    pub fn build_with(spheres: SphereSet, options: &BuildOptions) -> Self {
        let bounds = Aabb3::enclosing(&spheres);
        let mut tree = Self {
            spheres,
            nodes: Vec::new(),
            leaf_items: Vec::new(),
            bounds,
            leaf_count: 0,
        };
        let Some(root_bounds) = bounds else {
            return tree;
        };

        // Pushing a child pair past the cap by one is acceptable; indices
        // must still fit the packed u32 references.
        let max_nodes = options.max_nodes.min(u32::MAX as usize - 2);

        tree.nodes.push(Node::Leaf { items: 0 });
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Node and item counts are bounded by the u32-clamped node cap."
        )]
        let all: Vec<u32> = (0..tree.spheres.len() as u32).collect();
        let mut worklist = vec![Pending {
            node: 0,
            bounds: root_bounds,
            items: all,
            fallback_axis: Axis::X,
        }];

        while let Some(region) = worklist.pop() {
            if region.items.len() <= options.leaf_threshold || tree.nodes.len() >= max_nodes {
                tree.seal_leaf(region.node, region.items);
                continue;
            }

            // A split makes progress only when both children end up smaller
            // than the parent; a child inheriting the whole region (every
            // extent straddles the plane or sits on one side) would recurse
            // forever. The heuristic can favor exactly such a plane once
            // straddlers are duplicated, so a stalled pick falls through to
            // the extent-midpoint recovery before the region is given up on.
            let n = region.items.len();
            let mut chosen = None;
            if let Some(cand) = choose_split(&tree.spheres, &region.items, &region.bounds) {
                let (left, right) =
                    partition(&tree.spheres, &region.items, cand.axis, cand.position);
                if left.len() < n && right.len() < n {
                    chosen = Some((cand.axis, cand.position, left, right));
                }
            }
            if chosen.is_none() {
                let mut axis = region.fallback_axis;
                for _ in 0..3 {
                    if let Some(position) =
                        extent_midpoint(&tree.spheres, &region.items, axis, &region.bounds)
                    {
                        let (left, right) = partition(&tree.spheres, &region.items, axis, position);
                        if left.len() < n && right.len() < n {
                            chosen = Some((axis, position, left, right));
                            break;
                        }
                    }
                    axis = axis.next();
                }
            }
            let Some((axis, position, left_items, right_items)) = chosen else {
                tree.seal_leaf(region.node, region.items);
                continue;
            };

            #[allow(
                clippy::cast_possible_truncation,
                reason = "Arena length is capped at u32::MAX - 2 above."
            )]
            let first_child = tree.nodes.len() as u32;
            tree.nodes.push(Node::Leaf { items: 0 });
            tree.nodes.push(Node::Leaf { items: 0 });
            tree.nodes[region.node as usize] = Node::Inner {
                axis,
                split: position,
                children: first_child,
            };

            let (left_bounds, right_bounds) = region.bounds.split(axis, position);
            let child_fallback = region.fallback_axis.next();
            worklist.push(Pending {
                node: first_child + 1,
                bounds: right_bounds,
                items: right_items,
                fallback_axis: child_fallback,
            });
            worklist.push(Pending {
                node: first_child,
                bounds: left_bounds,
                items: left_items,
                fallback_axis: child_fallback,
            });
        }
        tree
    }

    fn seal_leaf(&mut self, node: u32, items: Vec<u32>) {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "At most one leaf row exists per arena node, and the arena is u32-capped."
        )]
        let row = self.leaf_items.len() as u32;
        self.leaf_items.push(items);
        self.nodes[node as usize] = Node::Leaf { items: row };
        self.leaf_count += 1;
    }

    /// The spheres this index was built over.
    pub fn spheres(&self) -> &SphereSet {
        &self.spheres
    }

    /// Bounding volume of the whole scene; `None` for an empty index.
    pub fn bounds(&self) -> Option<Aabb3> {
        self.bounds
    }

    /// Total node count (inner + leaf) of the arena.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of indexed spheres.
    pub fn sphere_count(&self) -> usize {
        self.spheres.len()
    }

    /// Depth of the deepest leaf (root counts as 1); 0 for an empty index.
    pub fn max_depth(&self) -> usize {
        let mut deepest = 0;
        if self.nodes.is_empty() {
            return deepest;
        }
        let mut stack = vec![(0_u32, 1_usize)];
        while let Some((node, depth)) = stack.pop() {
            match self.nodes[node as usize] {
                Node::Leaf { .. } => deepest = deepest.max(depth),
                Node::Inner { children, .. } => {
                    stack.push((children, depth + 1));
                    stack.push((children + 1, depth + 1));
                }
            }
        }
        deepest
    }
}

impl core::fmt::Debug for KdTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KdTree")
            .field("spheres", &self.spheres.len())
            .field("nodes", &self.nodes.len())
            .field("leaves", &self.leaf_count)
            .finish_non_exhaustive()
    }
}
