//! Local linear approximation of a coordinate transform.
//!
//! ## Purpose
//!
//! This module provides `LinearFit`, the affine stand-in `zero + gradient
//! * x` that the adaptive engine substitutes for the real transform over a
//! section once the substitution is provably accurate, plus the sample
//! geometry used to derive and to challenge a candidate fit.
//!
//! ## Design notes
//!
//! * **Face-center sampling**: the gradient comes from differences of
//!   transformed points at the centers of opposite section faces, at half
//!   a pixel outside the pixel centers so an extent-1 axis still yields a
//!   usable baseline.
//! * **Fresh test points**: a candidate is validated against positions
//!   not used to derive it (section center, vertices, and the midpoints
//!   between them).
//! * **Reject on non-finite**: any non-finite sample or coefficient
//!   disqualifies the fit; the caller falls back to subdivision or direct
//!   evaluation.
//!
//! ## Invariants
//!
//! * `gradient` is row-major with `ncoord_out` rows and `ncoord_in`
//!   columns.
//! * A constructed fit contains only finite coefficients.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use nalgebra::DMatrix;

// Internal dependencies
use crate::primitives::grid::{GridBounds, PointSet};

// ============================================================================
// Sample Geometry
// ============================================================================

/// Positions of the fitting samples for a section: for each axis, the
/// centers of its lower and upper faces, half a pixel outside the outermost
/// pixel centers. Point `2a` is the lower face of axis `a`, point `2a + 1`
/// the upper face.
pub fn face_centers(section: &GridBounds) -> PointSet {
    let ndim = section.naxes();
    let mut points = PointSet::new(ndim, 2 * ndim);
    for a in 0..ndim {
        let lo = section.lower()[a] as f64 - 0.5;
        let hi = section.upper()[a] as f64 + 0.5;
        let center = 0.5 * (lo + hi);
        for p in 0..2 * ndim {
            points.set(a, p, center);
        }
        points.set(a, 2 * a, lo);
        points.set(a, 2 * a + 1, hi);
    }
    points
}

/// Positions at which a candidate fit is challenged: the section center,
/// every vertex, and the midpoint between the center and every vertex.
/// One-dimensional sections instead use five evenly spaced interior
/// positions.
pub fn test_points(section: &GridBounds) -> PointSet {
    let ndim = section.naxes();
    if ndim == 1 {
        let lo = section.lower()[0] as f64 - 0.5;
        let hi = section.upper()[0] as f64 + 0.5;
        let span = hi - lo;
        let mut points = PointSet::new(1, 5);
        for p in 0..5 {
            points.set(0, p, lo + span * (p as f64 + 1.0) / 6.0);
        }
        return points;
    }

    let nvertex = 1usize << ndim;
    let mut points = PointSet::new(ndim, 1 + 2 * nvertex);
    for a in 0..ndim {
        let lo = section.lower()[a] as f64 - 0.5;
        let hi = section.upper()[a] as f64 + 0.5;
        let center = 0.5 * (lo + hi);
        points.set(a, 0, center);
        for v in 0..nvertex {
            let corner = if v >> a & 1 == 0 { lo } else { hi };
            points.set(a, 1 + v, corner);
            points.set(a, 1 + nvertex + v, 0.5 * (center + corner));
        }
    }
    points
}

// ============================================================================
// Linear Fit
// ============================================================================

/// An affine approximation `y = zero + gradient * x` of a transform over
/// one section.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    ncoord_in: usize,
    ncoord_out: usize,
    zero: Vec<f64>,
    gradient: Vec<f64>,
}

impl LinearFit {
    /// Derive a fit from the transformed images of `face_centers(section)`.
    /// `None` when any sample or derived coefficient is non-finite.
    pub fn from_face_samples(section: &GridBounds, images: &PointSet) -> Option<Self> {
        let ncoord_in = section.naxes();
        let ncoord_out = images.ncoord();
        debug_assert_eq!(images.npoint(), 2 * ncoord_in);

        let mut gradient = vec![0.0; ncoord_out * ncoord_in];
        for j in 0..ncoord_out {
            for a in 0..ncoord_in {
                let lo = images.get(j, 2 * a);
                let hi = images.get(j, 2 * a + 1);
                let span = (section.upper()[a] - section.lower()[a] + 1) as f64;
                let g = (hi - lo) / span;
                if !g.is_finite() {
                    return None;
                }
                gradient[j * ncoord_in + a] = g;
            }
        }

        // The sample positions average to the section center, so the mean
        // image anchors the zero point there.
        let nsample = images.npoint() as f64;
        let mut zero = vec![0.0; ncoord_out];
        for j in 0..ncoord_out {
            let mut mean = 0.0;
            for p in 0..images.npoint() {
                mean += images.get(j, p);
            }
            mean /= nsample;
            let mut z = mean;
            for a in 0..ncoord_in {
                let center =
                    0.5 * (section.lower()[a] as f64 + section.upper()[a] as f64);
                z -= gradient[j * ncoord_in + a] * center;
            }
            if !z.is_finite() {
                return None;
            }
            zero[j] = z;
        }

        Some(Self {
            ncoord_in,
            ncoord_out,
            zero,
            gradient,
        })
    }

    /// Input rank of the fit.
    #[inline]
    pub fn input_rank(&self) -> usize {
        self.ncoord_in
    }

    /// Output rank of the fit.
    #[inline]
    pub fn output_rank(&self) -> usize {
        self.ncoord_out
    }

    /// Zero point, one value per output axis.
    #[inline]
    pub fn zero(&self) -> &[f64] {
        &self.zero
    }

    /// Row-major gradient matrix.
    #[inline]
    pub fn gradient(&self) -> &[f64] {
        &self.gradient
    }

    /// Apply the fit to one point.
    #[inline]
    pub fn apply(&self, point: &[f64], out: &mut [f64]) {
        for j in 0..self.ncoord_out {
            let mut v = self.zero[j];
            for a in 0..self.ncoord_in {
                v += self.gradient[j * self.ncoord_in + a] * point[a];
            }
            out[j] = v;
        }
    }

    /// Apply the fit to a batch of points, reshaping `out` as needed.
    pub fn apply_batch(&self, points: &PointSet, out: &mut PointSet) {
        let npoint = points.npoint();
        out.reshape(self.ncoord_out, npoint);
        for j in 0..self.ncoord_out {
            for i in 0..npoint {
                let mut v = self.zero[j];
                for a in 0..self.ncoord_in {
                    v += self.gradient[j * self.ncoord_in + a] * points.get(a, i);
                }
                out.set(j, i, v);
            }
        }
    }

    /// Determinant of the gradient matrix; `None` unless square. The
    /// absolute value is the local output-per-input volume ratio used for
    /// flux conservation.
    pub fn det(&self) -> Option<f64> {
        if self.ncoord_in != self.ncoord_out {
            return None;
        }
        let n = self.ncoord_in;
        Some(DMatrix::from_row_slice(n, n, &self.gradient).determinant())
    }
}
