//! Input validation for grid operations.
//!
//! ## Purpose
//!
//! This module provides validation for operation parameters, grid and
//! mapping ranks, flags, and schemes, plus the resolution of a public
//! `Scheme` into the internal `KernelOp` an operation runs with.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: validation stops at the first error encountered.
//! * **Efficiency**: checks are ordered from cheap to expensive.
//! * **Soft conditions excluded**: per-pixel conditions (bad values,
//!   out-of-bounds positions) are engine results, never validation
//!   errors.
//!
//! ## Invariants
//!
//! * A resolved `KernelOp` has a radius of at least 1 unless it is
//!   `Nearest`.
//! * Validation is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not transform, clip, or repair inputs.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::format;
#[cfg(not(feature = "std"))]
use num_traits::Float;

// Internal dependencies
use crate::math::kernel::{
    KernelOp, KernelShape, Scheme, SeparableKernel, DEFAULT_SINC_RADIUS, MIN_FWHM,
};
use crate::primitives::errors::RegridError;
use crate::primitives::flags::Flags;
use crate::primitives::grid::GridBounds;
use crate::primitives::mapping::Mapping;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for operation configuration and operands.
///
/// Provides static methods returning `Result<(), RegridError>` that fail
/// fast upon the first violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Rank and Bounds Validation
    // ========================================================================

    /// Validate mapping ranks and direction for a resampling call: the
    /// inverse transform carries output positions into the input space.
    pub fn validate_resample_ranks(
        mapping: &dyn Mapping,
        input: &GridBounds,
        output: &GridBounds,
    ) -> Result<(), RegridError> {
        if !mapping.has_inverse() {
            return Err(RegridError::MissingTransform {
                direction: "inverse",
            });
        }
        Self::check_rank(mapping.input_rank(), input.naxes(), "input grid")?;
        Self::check_rank(mapping.output_rank(), output.naxes(), "output bounds")
    }

    /// Validate mapping ranks and direction for a rebinning call: the
    /// forward transform carries input positions into the output space.
    pub fn validate_rebin_ranks(
        mapping: &dyn Mapping,
        input: &GridBounds,
        output: &GridBounds,
    ) -> Result<(), RegridError> {
        if !mapping.has_forward() {
            return Err(RegridError::MissingTransform {
                direction: "forward",
            });
        }
        Self::check_rank(mapping.input_rank(), input.naxes(), "input grid")?;
        Self::check_rank(mapping.output_rank(), output.naxes(), "output bounds")
    }

    fn check_rank(expected: usize, got: usize, role: &'static str) -> Result<(), RegridError> {
        if expected != got {
            return Err(RegridError::RankMismatch {
                expected,
                got,
                role,
            });
        }
        Ok(())
    }

    /// Validate that a section lies entirely within its grid.
    pub fn validate_section(
        grid: &GridBounds,
        section: &GridBounds,
    ) -> Result<(), RegridError> {
        Self::check_rank(grid.naxes(), section.naxes(), "section")?;
        if let Err(axis) = grid.encloses(section) {
            return Err(RegridError::SectionOutOfGrid {
                axis,
                lower: section.lower()[axis],
                upper: section.upper()[axis],
                grid_lower: grid.lower()[axis],
                grid_upper: grid.upper()[axis],
            });
        }
        Ok(())
    }

    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Validate the error tolerance, in pixels.
    pub fn validate_tolerance(tol: f64) -> Result<(), RegridError> {
        if !tol.is_finite() || tol < 0.0 {
            return Err(RegridError::InvalidTolerance(tol));
        }
        Ok(())
    }

    /// Validate the maximum section extent.
    pub fn validate_max_block(max_block: usize) -> Result<(), RegridError> {
        if max_block == 0 {
            return Err(RegridError::InvalidMaxBlock(max_block));
        }
        Ok(())
    }

    /// Validate the rebinning weight limit.
    pub fn validate_weight_limit(weight_limit: f64) -> Result<(), RegridError> {
        if !weight_limit.is_finite() || weight_limit < 0.0 {
            return Err(RegridError::InvalidWeightLimit(weight_limit));
        }
        Ok(())
    }

    /// Validate flag and operand consistency for resampling.
    pub fn validate_resample_flags(
        flags: Flags,
        has_variance: bool,
    ) -> Result<(), RegridError> {
        if flags.contains(Flags::USEVAR) && !has_variance {
            return Err(RegridError::MissingVariance { flag: "USEVAR" });
        }
        Ok(())
    }

    /// Validate flag and operand consistency for rebinning.
    pub fn validate_rebin_flags(flags: Flags, has_variance: bool) -> Result<(), RegridError> {
        if flags.contains(Flags::USEVAR) && !has_variance {
            return Err(RegridError::MissingVariance { flag: "USEVAR" });
        }
        if flags.contains(Flags::VARWGT) && !has_variance {
            return Err(RegridError::MissingVariance { flag: "VARWGT" });
        }
        Ok(())
    }

    /// Validate the preconditions of flux conservation: a usable linear
    /// fit (nonzero tolerance) and equal mapping ranks.
    pub fn validate_conserve_flux(
        flags: Flags,
        tol: f64,
        mapping: &dyn Mapping,
    ) -> Result<(), RegridError> {
        if !flags.contains(Flags::CONSERVEFLUX) {
            return Ok(());
        }
        if tol == 0.0 {
            return Err(RegridError::FluxZeroTolerance);
        }
        if mapping.input_rank() != mapping.output_rank() {
            return Err(RegridError::FluxRankMismatch {
                input: mapping.input_rank(),
                output: mapping.output_rank(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Scheme Resolution
    // ========================================================================

    /// Resolve a scheme into the kernel an operation runs with,
    /// validating parameters and operation support. `operation` is
    /// "resample" or "rebin".
    pub fn resolve_scheme(
        scheme: &Scheme,
        operation: &'static str,
    ) -> Result<KernelOp, RegridError> {
        let rebin = operation == "rebin";
        match scheme {
            Scheme::Nearest => Ok(KernelOp::Nearest),
            Scheme::Linear => Ok(KernelOp::Linear),

            Scheme::Sinc { radius } => Ok(KernelOp::Separable(SeparableKernel::new(
                KernelShape::Sinc,
                default_radius(*radius, DEFAULT_SINC_RADIUS),
            ))),

            Scheme::SincSinc { radius, width } => {
                Self::validate_envelope_width("SincSinc", *width)?;
                Ok(KernelOp::Separable(SeparableKernel::new(
                    KernelShape::SincSinc { width: *width },
                    default_radius(*radius, envelope_radius(*width)),
                )))
            }

            Scheme::SincCos { radius, width } => {
                Self::validate_envelope_width("SincCos", *width)?;
                Ok(KernelOp::Separable(SeparableKernel::new(
                    KernelShape::SincCos { width: *width },
                    default_radius(*radius, envelope_radius(*width)),
                )))
            }

            Scheme::SincGauss { radius, fwhm } => {
                Self::validate_fwhm("SincGauss", *fwhm)?;
                let shape = KernelShape::SincGauss {
                    k: KernelShape::gauss_k(*fwhm),
                };
                Ok(KernelOp::Separable(if *radius == 0 {
                    SeparableKernel::with_auto_radius(shape)
                } else {
                    SeparableKernel::new(shape, *radius)
                }))
            }

            Scheme::Somb { radius } => Ok(KernelOp::Separable(SeparableKernel::new(
                KernelShape::Somb,
                default_radius(*radius, DEFAULT_SINC_RADIUS),
            ))),

            Scheme::SombCos { radius, width } => {
                Self::validate_envelope_width("SombCos", *width)?;
                Ok(KernelOp::Separable(SeparableKernel::new(
                    KernelShape::SombCos { width: *width },
                    default_radius(*radius, envelope_radius(*width)),
                )))
            }

            Scheme::Gauss { radius, fwhm } => {
                if !rebin {
                    return Err(RegridError::SchemeNotSupported {
                        scheme: "Gauss",
                        operation,
                    });
                }
                Self::validate_fwhm("Gauss", *fwhm)?;
                let shape = KernelShape::Gauss {
                    k: KernelShape::gauss_k(*fwhm),
                };
                Ok(KernelOp::Separable(if *radius == 0 {
                    SeparableKernel::with_auto_radius(shape)
                } else {
                    SeparableKernel::new(shape, *radius)
                }))
            }

            Scheme::BlockAve { radius } => {
                if rebin {
                    return Err(RegridError::SchemeNotSupported {
                        scheme: "BlockAve",
                        operation,
                    });
                }
                if *radius == 0 {
                    return Err(RegridError::InvalidSchemeParameter {
                        scheme: "BlockAve",
                        detail: format!("radius {} (must be at least 1)", radius),
                    });
                }
                Ok(KernelOp::BlockAve { radius: *radius })
            }

            Scheme::Kernel { kernel, radius } => {
                if *radius == 0 {
                    return Err(RegridError::InvalidSchemeParameter {
                        scheme: "Kernel",
                        detail: format!("radius {} (must be at least 1)", radius),
                    });
                }
                Ok(KernelOp::Separable(SeparableKernel::new(
                    KernelShape::User(kernel.clone()),
                    *radius,
                )))
            }
        }
    }

    fn validate_envelope_width(scheme: &'static str, width: f64) -> Result<(), RegridError> {
        if !width.is_finite() || width < 1.0 {
            return Err(RegridError::InvalidSchemeParameter {
                scheme,
                detail: format!("width {} (must be >= 1 pixel)", width),
            });
        }
        Ok(())
    }

    fn validate_fwhm(scheme: &'static str, fwhm: f64) -> Result<(), RegridError> {
        if !fwhm.is_finite() || fwhm < MIN_FWHM {
            return Err(RegridError::InvalidSchemeParameter {
                scheme,
                detail: format!("fwhm {} (must be >= {})", fwhm, MIN_FWHM),
            });
        }
        Ok(())
    }
}

#[inline]
fn default_radius(requested: usize, default: usize) -> usize {
    if requested == 0 {
        default
    } else {
        requested
    }
}

/// Default radius for cosine-enveloped kernels: the envelope's reach,
/// rounded up, but never below the sinc default.
#[inline]
fn envelope_radius(width: f64) -> usize {
    let r = width.ceil() as usize;
    r.max(DEFAULT_SINC_RADIUS)
}
