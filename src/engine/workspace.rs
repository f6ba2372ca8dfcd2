//! Workspace of reusable buffers for grid operations.
//!
//! This module provides a pre-allocated workspace to minimize dynamic
//! memory allocations during tile-by-tile processing. One workspace
//! serves one top-level call; parallel callers hold one each.

use crate::algorithms::interp::InterpScratch;
use crate::primitives::buffer::Slot;
use crate::primitives::grid::PointSet;

/// Reusable buffers threaded through the adaptive engine.
///
/// Reusing a workspace across tiles and recursion levels keeps the
/// per-tile cost down to the transform and the pixel arithmetic.
pub struct RegridWorkspace {
    /// Pixel-center positions of the current tile.
    pub grid_points: PointSet,
    /// Transformed images of `grid_points`.
    pub mapped_points: PointSet,
    /// Images of the linear-fit samples for the current section.
    pub fit_images: PointSet,
    /// Images of the fit test positions for the current section.
    pub test_images: PointSet,
    /// Linear buffer offsets of the current tile's pixels.
    pub offsets: Slot<usize>,
    /// Per-axis neighbor tables for interpolation and spreading.
    pub scratch: InterpScratch,
}

impl RegridWorkspace {
    /// Create an empty workspace; buffers grow to tile size on first use.
    pub fn new() -> Self {
        Self {
            grid_points: PointSet::new(0, 0),
            mapped_points: PointSet::new(0, 0),
            fit_images: PointSet::new(0, 0),
            test_images: PointSet::new(0, 0),
            offsets: Slot::default(),
            scratch: InterpScratch::default(),
        }
    }
}

impl Default for RegridWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
