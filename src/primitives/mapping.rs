//! The coordinate-transform collaborator interface.
//!
//! ## Purpose
//!
//! This module defines the `Mapping` trait through which the engine
//! consumes an arbitrary coordinate transform, and `AffineMap`, a concrete
//! bidirectional affine implementation useful on its own and as the
//! simplest possible mapping for tests and examples.
//!
//! ## Design notes
//!
//! * **Opaque**: the engine requires only declared ranks, direction
//!   availability, and a batched `transform` call; what the transform
//!   computes is entirely the implementor's business.
//! * **Batched**: `transform` maps a whole `PointSet` at once so an
//!   expensive transform is paid per tile, not per pixel.
//! * **Bad coordinates**: an implementation marks an untransformable
//!   point by writing a non-finite value; it reserves errors for failures
//!   of the transform as a whole.
//!
//! ## Non-goals
//!
//! * No simplification, decomposition, or serialization of mappings.

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
use crate::primitives::errors::RegridError;
use crate::primitives::grid::PointSet;

// ============================================================================
// Mapping Trait
// ============================================================================

/// An opaque bidirectional coordinate transform between an input and an
/// output space.
pub trait Mapping {
    /// Number of input-space axes.
    fn input_rank(&self) -> usize;

    /// Number of output-space axes.
    fn output_rank(&self) -> usize;

    /// Whether the forward (input -> output) transform is defined.
    fn has_forward(&self) -> bool {
        true
    }

    /// Whether the inverse (output -> input) transform is defined.
    fn has_inverse(&self) -> bool {
        true
    }

    /// Transform a batch of points. `forward` selects the direction; the
    /// implementation must `reshape` `out` to the result rank and point
    /// count. Untransformable points are written as non-finite values.
    fn transform(
        &self,
        points: &PointSet,
        forward: bool,
        out: &mut PointSet,
    ) -> Result<(), RegridError>;
}

// ============================================================================
// Affine Mapping
// ============================================================================

/// An affine transform `y = zero + gradient * x` with an inverse when the
/// gradient is square and non-singular.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineMap {
    nin: usize,
    nout: usize,
    zero: Vec<f64>,
    gradient: Vec<f64>,
    inverse: Option<Vec<f64>>,
}

impl AffineMap {
    /// Create an affine map from a zero-point (length `nout`) and a
    /// row-major gradient matrix (`nout x nin`). The inverse direction is
    /// available iff the gradient is square and non-singular.
    pub fn new(
        nin: usize,
        nout: usize,
        zero: Vec<f64>,
        gradient: Vec<f64>,
    ) -> Result<Self, RegridError> {
        if zero.len() != nout || gradient.len() != nout * nin {
            return Err(RegridError::BufferSizeMismatch {
                expected: nout * nin,
                got: gradient.len(),
            });
        }
        let inverse = if nin == nout {
            invert(&gradient, nin)
        } else {
            None
        };
        Ok(Self {
            nin,
            nout,
            zero,
            gradient,
            inverse,
        })
    }

    /// An identity map of the given rank.
    pub fn identity(ndim: usize) -> Self {
        let mut gradient = vec![0.0; ndim * ndim];
        for a in 0..ndim {
            gradient[a * ndim + a] = 1.0;
        }
        Self {
            nin: ndim,
            nout: ndim,
            zero: vec![0.0; ndim],
            gradient: gradient.clone(),
            inverse: Some(gradient),
        }
    }

    /// A pure per-axis shift.
    pub fn shift(offsets: &[f64]) -> Self {
        let ndim = offsets.len();
        let mut map = Self::identity(ndim);
        map.zero.copy_from_slice(offsets);
        map
    }

    /// A pure per-axis scaling about the origin.
    pub fn zoom(factors: &[f64]) -> Self {
        let ndim = factors.len();
        let mut gradient = vec![0.0; ndim * ndim];
        for a in 0..ndim {
            gradient[a * ndim + a] = factors[a];
        }
        let inverse = invert(&gradient, ndim);
        Self {
            nin: ndim,
            nout: ndim,
            zero: vec![0.0; ndim],
            gradient,
            inverse,
        }
    }
}

impl Mapping for AffineMap {
    fn input_rank(&self) -> usize {
        self.nin
    }

    fn output_rank(&self) -> usize {
        self.nout
    }

    fn has_inverse(&self) -> bool {
        self.inverse.is_some()
    }

    fn transform(
        &self,
        points: &PointSet,
        forward: bool,
        out: &mut PointSet,
    ) -> Result<(), RegridError> {
        let npoint = points.npoint();
        if forward {
            out.reshape(self.nout, npoint);
            for j in 0..self.nout {
                for i in 0..npoint {
                    let mut v = self.zero[j];
                    for a in 0..self.nin {
                        v += self.gradient[j * self.nin + a] * points.get(a, i);
                    }
                    out.set(j, i, v);
                }
            }
            Ok(())
        } else {
            let inverse = self
                .inverse
                .as_ref()
                .ok_or(RegridError::MissingTransform {
                    direction: "inverse",
                })?;
            out.reshape(self.nin, npoint);
            for a in 0..self.nin {
                for i in 0..npoint {
                    let mut v = 0.0;
                    for j in 0..self.nout {
                        v += inverse[a * self.nout + j] * (points.get(j, i) - self.zero[j]);
                    }
                    out.set(a, i, v);
                }
            }
            Ok(())
        }
    }
}

/// Invert a small square matrix (row-major); `None` when singular or
/// non-finite.
fn invert(matrix: &[f64], n: usize) -> Option<Vec<f64>> {
    if matrix.iter().any(|v| !v.is_finite()) {
        return None;
    }
    DMatrix::from_row_slice(n, n, matrix)
        .try_inverse()
        .map(|inv| inv.transpose().as_slice().to_vec())
}
