// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for build- and query-boundary validation.

/// Errors reported when malformed input is rejected at the crate boundary.
///
/// Everything past the boundary is handled internally (split recovery,
/// forced leaves, node cap) and never surfaces as an error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum KdError {
    /// A sphere was supplied with a negative (or NaN) radius.
    #[error("sphere {index} has invalid radius {radius}")]
    InvalidRadius {
        /// Position of the offending sphere in the input.
        index: usize,
        /// The rejected radius value.
        radius: f32,
    },

    /// Parallel-array input columns disagree on the sphere count.
    #[error("column length mismatch: {centers} center rows vs {radii} radii")]
    ColumnLengthMismatch {
        /// Number of entries in the center columns.
        centers: usize,
        /// Number of entries in the radius column.
        radii: usize,
    },

    /// A ray direction was zero-length or otherwise not normalizable.
    #[error("ray direction is zero-length or not normalizable")]
    DegenerateDirection,
}
