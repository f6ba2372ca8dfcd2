//! Kernel functions for pixel-to-pixel weighting.
//!
//! ## Purpose
//!
//! This module provides the kernel catalogue shared by both directions of
//! the engine: pull-mode interpolation weights neighboring input pixels
//! around a transformed position, and push-mode spreading distributes an
//! input value over neighboring output pixels with the same shapes.
//!
//! ## Design notes
//!
//! * **Separable**: every 1-D shape extends to N dimensions as a product
//!   of per-axis weights, so evaluation cost grows with `radius * ndim`
//!   per axis pass, not with the full neighborhood volume.
//! * **Offsets in pixels**: a kernel is evaluated at the signed distance,
//!   in pixel units, between the sample position and a neighbor center.
//! * **Nearest and Linear** are kept out of the separable path; they have
//!   dedicated closed forms and different coordinate-validity rules.
//!
//! ## Key concepts
//!
//! * **KernelOp**: the resolved per-call weighting strategy.
//! * **SeparableKernel**: a 1-D shape plus its neighbor radius per side.
//! * **UserKernel**: a caller-supplied weight function with parameters;
//!   returning `None` aborts the whole operation.
//!
//! ## Invariants
//!
//! * `radius >= 1` for every separable kernel.
//! * Built-in shapes always produce finite weights at finite offsets.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::f64::consts::PI;
#[cfg(not(feature = "std"))]
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::RegridError;

/// Default neighbor radius for the sinc and somb families.
pub const DEFAULT_SINC_RADIUS: usize = 2;

/// Smallest accepted full width at half maximum for Gaussian shapes.
pub const MIN_FWHM: f64 = 0.1;

/// Weight below which a Gaussian tail is treated as zero when deriving
/// an automatic radius.
const GAUSS_CUTOFF: f64 = 1e-6;

// ============================================================================
// Schemes
// ============================================================================

/// The public catalogue of weighting schemes. A scheme is resolved into a
/// `KernelOp` when an operation starts; parameter validation happens at
/// that point.
///
/// Where a `radius` field is zero, a per-scheme default neighbor radius
/// is used.
#[derive(Debug, Clone)]
pub enum Scheme {
    /// Copy the single nearest pixel.
    Nearest,

    /// Linear weighting over the 2^N surrounding pixels.
    Linear,

    /// Plain sinc weighting.
    Sinc {
        /// Neighbors per side on each axis; 0 for the default.
        radius: usize,
    },

    /// Sinc tapered by a wider sinc envelope.
    SincSinc {
        /// Neighbors per side on each axis; 0 for the default.
        radius: usize,
        /// Envelope half-width in pixels; at least 1.
        width: f64,
    },

    /// Sinc tapered by a cosine envelope.
    SincCos {
        /// Neighbors per side on each axis; 0 for the default.
        radius: usize,
        /// Offset at which the envelope reaches zero, in pixels; at least 1.
        width: f64,
    },

    /// Sinc tapered by a Gaussian envelope.
    SincGauss {
        /// Neighbors per side on each axis; 0 for the automatic radius.
        radius: usize,
        /// Full width at half maximum of the envelope, in pixels.
        fwhm: f64,
    },

    /// Plain somb weighting (circular analogue of sinc).
    Somb {
        /// Neighbors per side on each axis; 0 for the default.
        radius: usize,
    },

    /// Somb tapered by a cosine envelope.
    SombCos {
        /// Neighbors per side on each axis; 0 for the default.
        radius: usize,
        /// Offset at which the envelope reaches zero, in pixels; at least 1.
        width: f64,
    },

    /// Pure Gaussian weighting (rebinning only).
    Gauss {
        /// Neighbors per side on each axis; 0 for the automatic radius.
        radius: usize,
        /// Full width at half maximum, in pixels.
        fwhm: f64,
    },

    /// Uniform average over a cube of pixels (resampling only).
    BlockAve {
        /// Half-width of the averaging cube, in pixels per side.
        radius: usize,
    },

    /// A caller-supplied 1-D kernel function.
    Kernel {
        /// The kernel and its parameters.
        kernel: UserKernel,
        /// Neighbors per side on each axis; at least 1.
        radius: usize,
    },
}

// ============================================================================
// Kernel Operations
// ============================================================================

/// The weighting strategy resolved from a scheme for one engine call.
#[derive(Debug, Clone)]
pub enum KernelOp {
    /// Copy the single nearest pixel.
    Nearest,

    /// Weight the 2^N surrounding pixels by linear fractions.
    Linear,

    /// Uniform average over a cube of half-width `radius` pixels
    /// (pull-mode only).
    BlockAve {
        /// Half-width of the averaging cube, in pixels per side.
        radius: usize,
    },

    /// Product of 1-D kernel evaluations per axis.
    Separable(SeparableKernel),
}

impl KernelOp {
    /// Neighbor radius per side on each axis.
    pub fn radius(&self) -> usize {
        match self {
            KernelOp::Nearest => 0,
            KernelOp::Linear => 1,
            KernelOp::BlockAve { radius } => *radius,
            KernelOp::Separable(kernel) => kernel.radius(),
        }
    }
}

/// A separable kernel: one 1-D shape evaluated independently per axis.
#[derive(Debug, Clone)]
pub struct SeparableKernel {
    shape: KernelShape,
    radius: usize,
}

impl SeparableKernel {
    /// Pair a shape with an explicit neighbor radius per side.
    pub fn new(shape: KernelShape, radius: usize) -> Self {
        debug_assert!(radius >= 1);
        Self { shape, radius }
    }

    /// Pair a Gaussian-tapered shape with the radius at which its tail
    /// falls below a fixed cutoff.
    pub fn with_auto_radius(shape: KernelShape) -> Self {
        let radius = match &shape {
            KernelShape::Gauss { k } | KernelShape::SincGauss { k } => {
                let r = (-(GAUSS_CUTOFF.ln()) / k).sqrt().ceil();
                (r as usize).max(1)
            }
            _ => DEFAULT_SINC_RADIUS,
        };
        Self { shape, radius }
    }

    /// Neighbor radius per side.
    #[inline]
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Shape being evaluated.
    #[inline]
    pub fn shape(&self) -> &KernelShape {
        &self.shape
    }

    /// Evaluate the 1-D weight at a signed pixel offset.
    #[inline]
    pub fn weight(&self, offset: f64) -> Result<f64, RegridError> {
        self.shape.evaluate(offset, self.radius)
    }
}

// ============================================================================
// Kernel Shapes
// ============================================================================

/// The 1-D shapes available to `SeparableKernel`.
#[derive(Debug, Clone)]
pub enum KernelShape {
    /// `sinc(x)`.
    Sinc,

    /// `sinc(x) * sinc(x / width)`.
    SincSinc {
        /// Half-width of the tapering sinc envelope, in pixels.
        width: f64,
    },

    /// `sinc(x) * cos(pi x / (2 width))`, zero beyond `width`.
    SincCos {
        /// Offset at which the cosine envelope reaches zero, in pixels.
        width: f64,
    },

    /// `sinc(x) * exp(-k x^2)`.
    SincGauss {
        /// Exponential coefficient derived from the FWHM.
        k: f64,
    },

    /// `somb(x)`, the circular analogue of sinc.
    Somb,

    /// `somb(x) * cos(pi x / (2 width))`, zero beyond `width`.
    SombCos {
        /// Offset at which the cosine envelope reaches zero, in pixels.
        width: f64,
    },

    /// `exp(-k x^2)` (push-mode only).
    Gauss {
        /// Exponential coefficient derived from the FWHM.
        k: f64,
    },

    /// A caller-supplied weight function.
    User(UserKernel),
}

impl KernelShape {
    /// Exponential coefficient for a Gaussian of the given FWHM.
    #[inline]
    pub fn gauss_k(fwhm: f64) -> f64 {
        4.0 * core::f64::consts::LN_2 / (fwhm * fwhm)
    }

    fn evaluate(&self, offset: f64, radius: usize) -> Result<f64, RegridError> {
        let w = match self {
            KernelShape::Sinc => sinc(offset),
            KernelShape::SincSinc { width } => sinc(offset) * sinc(offset / width),
            KernelShape::SincCos { width } => cos_envelope(offset, *width, sinc(offset)),
            KernelShape::SincGauss { k } => sinc(offset) * (-k * offset * offset).exp(),
            KernelShape::Somb => somb(offset),
            KernelShape::SombCos { width } => cos_envelope(offset, *width, somb(offset)),
            KernelShape::Gauss { k } => (-k * offset * offset).exp(),
            KernelShape::User(user) => {
                let _ = radius;
                return (user.func)(offset, &user.params)
                    .ok_or(RegridError::UserKernelFailed { offset });
            }
        };
        Ok(w)
    }
}

/// A caller-supplied 1-D kernel: `func(offset, params)` yields the weight
/// or `None` to abort the operation.
#[derive(Debug, Clone)]
pub struct UserKernel {
    /// Weight function evaluated at a signed pixel offset.
    pub func: fn(f64, &[f64]) -> Option<f64>,
    /// Parameters forwarded unchanged to every evaluation.
    pub params: Vec<f64>,
}

// ============================================================================
// Shape Primitives
// ============================================================================

/// Normalized sinc: `sin(pi x) / (pi x)`, 1 at the origin.
#[inline]
pub fn sinc(x: f64) -> f64 {
    let px = PI * x;
    if px.abs() < 1e-10 {
        1.0
    } else {
        px.sin() / px
    }
}

/// Sombrero: `2 J1(pi x) / (pi x)`, 1 at the origin.
#[inline]
pub fn somb(x: f64) -> f64 {
    let px = PI * x;
    if px.abs() < 1e-10 {
        1.0
    } else {
        2.0 * bessel_j1(px) / px
    }
}

#[inline]
fn cos_envelope(offset: f64, width: f64, base: f64) -> f64 {
    if offset.abs() > width {
        0.0
    } else {
        base * (0.5 * PI * offset / width).cos()
    }
}

/// Bessel function of the first kind, order one, by the Abramowitz and
/// Stegun rational approximations.
fn bessel_j1(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 8.0 {
        let y = x * x;
        let p1 = x
            * (72362614232.0
                + y * (-7895059235.0
                    + y * (242396853.1 + y * (-2972611.439 + y * (15704.48260 + y * (-30.16036606))))));
        let p2 = 144725228442.0
            + y * (2300535178.0
                + y * (18583304.74 + y * (99447.43394 + y * (376.9991397 + y))));
        p1 / p2
    } else {
        let z = 8.0 / ax;
        let y = z * z;
        let xx = ax - 2.356194491;
        let p1 = 1.0 + y * (0.183105e-2 + y * (-0.3516396496e-4 + y * (0.2457520174e-5 + y * (-0.240337019e-6))));
        let p2 = 0.04687499995
            + y * (-0.2002690873e-3 + y * (0.8449199096e-5 + y * (-0.88228987e-6 + y * 0.105787412e-6)));
        let result = (0.636619772 / ax).sqrt() * (xx.cos() * p1 - z * xx.sin() * p2);
        if x < 0.0 {
            -result
        } else {
            result
        }
    }
}
