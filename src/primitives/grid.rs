//! N-dimensional grids, integer bounds, and coordinate point sets.
//!
//! ## Purpose
//!
//! This module provides the core data containers moved around by the
//! engine: `GridBounds` (a rectangular box of integer pixel indices, also
//! used for sections), `Grid` (bounds + dense value buffer + optional
//! variance buffer), and `PointSet` (batched real coordinates consumed and
//! produced by a `Mapping`).
//!
//! ## Design notes
//!
//! * **Addressing**: buffers are dense and row-major with the FIRST axis
//!   fastest; pixel `i` on an axis is centered at real coordinate `i`.
//! * **Validated construction**: `GridBounds::new` rejects `lower > upper`;
//!   `Grid::new` rejects buffers whose length disagrees with the bounds.
//! * **Axis-major points**: `PointSet` stores one contiguous plane per
//!   coordinate axis so a whole tile can be handed to a transform in a
//!   single call.
//!
//! ## Invariants
//!
//! * `lower[i] <= upper[i]` for every axis of a constructed `GridBounds`.
//! * `Grid` buffers have exactly `bounds.npix()` elements.
//! * A non-finite `PointSet` value marks a bad coordinate.
//!
//! ## Non-goals
//!
//! * This module does not interpolate, spread, or transform anything;
//!   it only stores and addresses values.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// Internal dependencies
use crate::primitives::errors::RegridError;
use crate::primitives::pixel::Pixel;

// ============================================================================
// Grid Bounds
// ============================================================================

/// A rectangular box of integer pixel indices with inclusive per-axis
/// bounds. Serves both as the shape of a `Grid` and as a section (sub-box)
/// during adaptive subdivision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridBounds {
    lower: Vec<i64>,
    upper: Vec<i64>,
}

impl GridBounds {
    /// Create bounds, rejecting any axis with `lower > upper`.
    pub fn new(lower: Vec<i64>, upper: Vec<i64>) -> Result<Self, RegridError> {
        debug_assert_eq!(lower.len(), upper.len());
        for (axis, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
            if lo > hi {
                return Err(RegridError::InvalidBounds {
                    axis,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        Ok(Self { lower, upper })
    }

    /// Number of axes.
    #[inline]
    pub fn naxes(&self) -> usize {
        self.lower.len()
    }

    /// Lower bounds, one per axis.
    #[inline]
    pub fn lower(&self) -> &[i64] {
        &self.lower
    }

    /// Upper bounds, one per axis.
    #[inline]
    pub fn upper(&self) -> &[i64] {
        &self.upper
    }

    /// Pixel count along one axis.
    #[inline]
    pub fn len(&self, axis: usize) -> usize {
        (self.upper[axis] - self.lower[axis] + 1) as usize
    }

    /// True only for a zero-rank box.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Total pixel count of the box.
    pub fn npix(&self) -> usize {
        (0..self.naxes()).map(|a| self.len(a)).product()
    }

    /// Extent of the widest axis.
    pub fn max_extent(&self) -> usize {
        (0..self.naxes()).map(|a| self.len(a)).max().unwrap_or(0)
    }

    /// Index of the widest axis (first of equals).
    pub fn widest_axis(&self) -> usize {
        let mut best = 0;
        let mut best_len = 0;
        for a in 0..self.naxes() {
            let len = self.len(a);
            if len > best_len {
                best_len = len;
                best = a;
            }
        }
        best
    }

    /// Whether the integer index lies inside the box.
    pub fn contains_index(&self, index: &[i64]) -> bool {
        index
            .iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(&i, (&lo, &hi))| i >= lo && i <= hi)
    }

    /// Whether `section` lies entirely inside `self`; returns the first
    /// violating axis otherwise.
    pub fn encloses(&self, section: &GridBounds) -> Result<(), usize> {
        for a in 0..self.naxes() {
            if section.lower[a] < self.lower[a] || section.upper[a] > self.upper[a] {
                return Err(a);
            }
        }
        Ok(())
    }

    /// Linear buffer offset of an integer index (first axis fastest).
    #[inline]
    pub fn offset_of(&self, index: &[i64]) -> usize {
        debug_assert!(self.contains_index(index));
        let mut offset = 0usize;
        let mut stride = 1usize;
        for a in 0..self.naxes() {
            offset += (index[a] - self.lower[a]) as usize * stride;
            stride *= self.len(a);
        }
        offset
    }

    /// Per-axis buffer strides (first axis fastest, stride 1).
    pub fn strides(&self) -> Vec<usize> {
        let mut strides = Vec::with_capacity(self.naxes());
        let mut stride = 1usize;
        for a in 0..self.naxes() {
            strides.push(stride);
            stride *= self.len(a);
        }
        strides
    }

    /// Split the box at the floor-midpoint of `axis` into two contiguous
    /// halves. The second half is `None` when the axis has extent 1.
    pub fn bisect(&self, axis: usize) -> (GridBounds, Option<GridBounds>) {
        let lo = self.lower[axis];
        let hi = self.upper[axis];
        let mid = lo + (hi - lo) / 2;

        let mut first = self.clone();
        first.upper[axis] = mid;

        if mid >= hi {
            return (first, None);
        }

        let mut second = self.clone();
        second.lower[axis] = mid + 1;
        (first, Some(second))
    }
}

// ============================================================================
// Grid
// ============================================================================

/// A dense N-dimensional data grid with optional parallel variance plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<P: Pixel> {
    bounds: GridBounds,
    data: Vec<P>,
    variance: Option<Vec<P>>,
}

impl<P: Pixel> Grid<P> {
    /// Create a grid from bounds and a matching data buffer.
    pub fn new(bounds: GridBounds, data: Vec<P>) -> Result<Self, RegridError> {
        let expected = bounds.npix();
        if data.len() != expected {
            return Err(RegridError::BufferSizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            bounds,
            data,
            variance: None,
        })
    }

    /// Create a grid with a parallel variance buffer.
    pub fn with_variance(
        bounds: GridBounds,
        data: Vec<P>,
        variance: Vec<P>,
    ) -> Result<Self, RegridError> {
        let expected = bounds.npix();
        if data.len() != expected {
            return Err(RegridError::BufferSizeMismatch {
                expected,
                got: data.len(),
            });
        }
        if variance.len() != expected {
            return Err(RegridError::BufferSizeMismatch {
                expected,
                got: variance.len(),
            });
        }
        Ok(Self {
            bounds,
            data,
            variance: Some(variance),
        })
    }

    /// Create a grid filled with one value, optionally with a variance
    /// plane filled with the same value.
    pub fn filled(bounds: GridBounds, value: P, with_variance: bool) -> Self {
        let npix = bounds.npix();
        Self {
            data: vec![value; npix],
            variance: with_variance.then(|| vec![value; npix]),
            bounds,
        }
    }

    /// Bounds of the grid.
    #[inline]
    pub fn bounds(&self) -> &GridBounds {
        &self.bounds
    }

    /// Data buffer (first axis fastest).
    #[inline]
    pub fn data(&self) -> &[P] {
        &self.data
    }

    /// Mutable data buffer.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [P] {
        &mut self.data
    }

    /// Variance buffer, if present.
    #[inline]
    pub fn variance(&self) -> Option<&[P]> {
        self.variance.as_deref()
    }

    /// Mutable variance buffer, if present.
    #[inline]
    pub fn variance_mut(&mut self) -> Option<&mut [P]> {
        self.variance.as_deref_mut()
    }

    /// Mutable data and variance buffers together, for writers that fill
    /// both planes in one pass.
    #[inline]
    pub fn planes_mut(&mut self) -> (&mut [P], Option<&mut [P]>) {
        (&mut self.data, self.variance.as_deref_mut())
    }

    /// Value at an integer index.
    #[inline]
    pub fn value_at(&self, index: &[i64]) -> P {
        self.data[self.bounds.offset_of(index)]
    }
}

// ============================================================================
// Point Set
// ============================================================================

/// A batch of real N-dimensional coordinates stored axis-major: one
/// contiguous plane of `npoint` values per coordinate axis. A non-finite
/// value marks a bad coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    ncoord: usize,
    npoint: usize,
    values: Vec<f64>,
}

impl PointSet {
    /// Create a zero-filled point set.
    pub fn new(ncoord: usize, npoint: usize) -> Self {
        Self {
            ncoord,
            npoint,
            values: vec![0.0; ncoord * npoint],
        }
    }

    /// Resize in place, reusing the existing allocation where possible.
    /// Contents after a reshape are unspecified.
    pub fn reshape(&mut self, ncoord: usize, npoint: usize) {
        self.ncoord = ncoord;
        self.npoint = npoint;
        self.values.resize(ncoord * npoint, 0.0);
    }

    /// Number of coordinate axes.
    #[inline]
    pub fn ncoord(&self) -> usize {
        self.ncoord
    }

    /// Number of points.
    #[inline]
    pub fn npoint(&self) -> usize {
        self.npoint
    }

    /// Coordinate plane for one axis.
    #[inline]
    pub fn axis(&self, axis: usize) -> &[f64] {
        let start = axis * self.npoint;
        &self.values[start..start + self.npoint]
    }

    /// Mutable coordinate plane for one axis.
    #[inline]
    pub fn axis_mut(&mut self, axis: usize) -> &mut [f64] {
        let start = axis * self.npoint;
        &mut self.values[start..start + self.npoint]
    }

    /// One coordinate value.
    #[inline]
    pub fn get(&self, axis: usize, point: usize) -> f64 {
        self.values[axis * self.npoint + point]
    }

    /// Set one coordinate value.
    #[inline]
    pub fn set(&mut self, axis: usize, point: usize, value: f64) {
        self.values[axis * self.npoint + point] = value;
    }
}
