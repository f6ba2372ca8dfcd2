//! Tiling of sections into cache-friendly pixel blocks.
//!
//! ## Purpose
//!
//! This module provides `BlockIter`, which cuts an accepted section into
//! tiles of roughly uniform extent so that coordinate transforms are
//! batched and scratch buffers stay bounded regardless of section size.
//!
//! ## Design notes
//!
//! * **Uniform cap**: the per-axis tile extent is the largest uniform cap
//!   whose clipped product stays within the pixel target, found by binary
//!   search; narrow axes are never padded, only clipped.
//! * **Extent floor**: tiles are never thinner than 2 pixels on an axis
//!   that allows it, even when that overshoots the pixel target, so
//!   neighboring-pixel kernels keep locality within a tile.
//! * **Order**: tiles are emitted row-major with the first axis fastest,
//!   matching buffer addressing.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// Internal dependencies
use crate::primitives::buffer::Slot;
use crate::primitives::grid::{GridBounds, PointSet};

/// Target number of pixels per tile.
pub const TILE_PIXELS: usize = 2048;

/// Smallest per-axis tile extent on axes wider than one pixel.
const MIN_TILE_EXTENT: usize = 2;

// ============================================================================
// Block Iterator
// ============================================================================

/// Iterator over the tiles of a section, row-major, first axis fastest.
#[derive(Debug, Clone)]
pub struct BlockIter {
    section: GridBounds,
    step: i64,
    pos: Vec<i64>,
    done: bool,
}

impl BlockIter {
    /// Tile a section with at most `tile_pixels` pixels per tile.
    pub fn new(section: GridBounds, tile_pixels: usize) -> Self {
        let step = uniform_cap(&section, tile_pixels) as i64;
        let pos = section.lower().to_vec();
        Self {
            section,
            step,
            pos,
            done: false,
        }
    }

    /// Per-axis tile extent chosen for this section.
    #[inline]
    pub fn step(&self) -> usize {
        self.step as usize
    }
}

impl Iterator for BlockIter {
    type Item = GridBounds;

    fn next(&mut self) -> Option<GridBounds> {
        if self.done {
            return None;
        }
        let ndim = self.section.naxes();
        let mut lower = Vec::with_capacity(ndim);
        let mut upper = Vec::with_capacity(ndim);
        for a in 0..ndim {
            lower.push(self.pos[a]);
            upper.push((self.pos[a] + self.step - 1).min(self.section.upper()[a]));
        }
        // Bounds are ordered by construction.
        let tile = GridBounds::new(lower, upper).ok()?;

        // Advance to the next tile origin, first axis fastest.
        let mut axis = 0;
        loop {
            if axis == ndim {
                self.done = true;
                break;
            }
            self.pos[axis] += self.step;
            if self.pos[axis] <= self.section.upper()[axis] {
                break;
            }
            self.pos[axis] = self.section.lower()[axis];
            axis += 1;
        }
        Some(tile)
    }
}

/// Largest uniform per-axis extent whose clipped product does not exceed
/// the pixel target, floored at the minimum extent.
fn uniform_cap(section: &GridBounds, tile_pixels: usize) -> usize {
    let max_extent = section.max_extent().max(1);
    if clipped_pixels(section, max_extent) <= tile_pixels {
        return max_extent;
    }

    let mut lo = MIN_TILE_EXTENT;
    let mut hi = max_extent;
    // Invariant: f(lo) may overshoot only at the floor; f(hi) overshoots.
    while lo + 1 < hi {
        let mid = lo + (hi - lo) / 2;
        if clipped_pixels(section, mid) <= tile_pixels {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

fn clipped_pixels(section: &GridBounds, cap: usize) -> usize {
    (0..section.naxes())
        .map(|a| section.len(a).min(cap))
        .product()
}

// ============================================================================
// Tile Pixel Enumeration
// ============================================================================

/// Fill `points` with the pixel-center coordinates of every pixel in a
/// tile (row-major, first axis fastest) and `offsets` with the matching
/// linear offsets into a buffer shaped by `array_bounds`.
pub fn fill_tile_points(
    tile: &GridBounds,
    array_bounds: &GridBounds,
    points: &mut PointSet,
    offsets: &mut Slot<usize>,
) {
    let ndim = tile.naxes();
    let npix = tile.npix();
    points.reshape(ndim, npix);
    offsets.clear();
    offsets.ensure_capacity(npix);

    let strides = array_bounds.strides();
    let mut index: Vec<i64> = tile.lower().to_vec();
    for pixel in 0..npix {
        let mut offset = 0usize;
        for a in 0..ndim {
            points.set(a, pixel, index[a] as f64);
            offset += (index[a] - array_bounds.lower()[a]) as usize * strides[a];
        }
        offsets.push(offset);

        let mut axis = 0;
        while axis < ndim {
            index[axis] += 1;
            if index[axis] <= tile.upper()[axis] {
                break;
            }
            index[axis] = tile.lower()[axis];
            axis += 1;
        }
    }
}
