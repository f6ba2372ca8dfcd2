#![cfg(feature = "dev")]
//! Tests for parameter validation and scheme resolution.
//!
//! ## Test Organization
//!
//! 1. **Scheme Resolution** - Kernels, default radii, operation support
//! 2. **Parameter Validation** - Tolerance, block size, weight limit
//! 3. **Flag Validation** - Variance requirements, flux preconditions
//! 4. **Rank and Section Validation** - Mapping ranks, section bounds

use regrid_rs::internals::engine::validator::Validator;
use regrid_rs::internals::math::kernel::KernelOp;
use regrid_rs::prelude::*;

// ============================================================================
// Scheme Resolution
// ============================================================================

#[test]
fn test_resolve_simple_schemes() {
    let kernel = Validator::resolve_scheme(&Scheme::Linear, "resample").unwrap();
    assert!(matches!(kernel, KernelOp::Linear));
    let kernel = Validator::resolve_scheme(&Scheme::Nearest, "rebin").unwrap();
    assert!(matches!(kernel, KernelOp::Nearest));
}

/// A zero radius asks for the scheme's default.
#[test]
fn test_sinc_default_radius() {
    let kernel = Validator::resolve_scheme(&Scheme::Sinc { radius: 0 }, "resample").unwrap();
    assert_eq!(kernel.radius(), 2);
    let kernel = Validator::resolve_scheme(&Scheme::Sinc { radius: 7 }, "resample").unwrap();
    assert_eq!(kernel.radius(), 7);
}

/// Cosine envelopes default to a radius covering the envelope width.
#[test]
fn test_envelope_default_radius() {
    let scheme = Scheme::SincCos {
        radius: 0,
        width: 3.5,
    };
    let kernel = Validator::resolve_scheme(&scheme, "resample").unwrap();
    assert_eq!(kernel.radius(), 4);
}

#[test]
fn test_envelope_width_below_one_rejected() {
    let scheme = Scheme::SincCos {
        radius: 0,
        width: 0.5,
    };
    let err = Validator::resolve_scheme(&scheme, "resample").unwrap_err();
    assert!(matches!(
        err,
        RegridError::InvalidSchemeParameter {
            scheme: "SincCos",
            ..
        }
    ));
}

#[test]
fn test_fwhm_below_minimum_rejected() {
    let scheme = Scheme::SincGauss {
        radius: 0,
        fwhm: 0.05,
    };
    let err = Validator::resolve_scheme(&scheme, "resample").unwrap_err();
    assert!(matches!(
        err,
        RegridError::InvalidSchemeParameter {
            scheme: "SincGauss",
            ..
        }
    ));
}

/// Gauss spreads flux without interpolating back, so it only rebins.
#[test]
fn test_gauss_is_rebin_only() {
    let scheme = Scheme::Gauss {
        radius: 0,
        fwhm: 1.0,
    };
    let err = Validator::resolve_scheme(&scheme, "resample").unwrap_err();
    assert_eq!(
        err,
        RegridError::SchemeNotSupported {
            scheme: "Gauss",
            operation: "resample",
        }
    );

    let kernel = Validator::resolve_scheme(&scheme, "rebin").unwrap();
    assert_eq!(kernel.radius(), 3);
}

/// Block averaging has no push-mode counterpart.
#[test]
fn test_block_ave_is_resample_only() {
    let scheme = Scheme::BlockAve { radius: 2 };
    let kernel = Validator::resolve_scheme(&scheme, "resample").unwrap();
    assert!(matches!(kernel, KernelOp::BlockAve { radius: 2 }));

    let err = Validator::resolve_scheme(&scheme, "rebin").unwrap_err();
    assert_eq!(
        err,
        RegridError::SchemeNotSupported {
            scheme: "BlockAve",
            operation: "rebin",
        }
    );
}

#[test]
fn test_explicit_radius_schemes_reject_zero() {
    let err = Validator::resolve_scheme(&Scheme::BlockAve { radius: 0 }, "resample").unwrap_err();
    assert!(matches!(
        err,
        RegridError::InvalidSchemeParameter {
            scheme: "BlockAve",
            ..
        }
    ));

    fn flat(_offset: f64, _params: &[f64]) -> Option<f64> {
        Some(1.0)
    }
    let scheme = Scheme::Kernel {
        kernel: UserKernel {
            func: flat,
            params: vec![],
        },
        radius: 0,
    };
    let err = Validator::resolve_scheme(&scheme, "rebin").unwrap_err();
    assert!(matches!(
        err,
        RegridError::InvalidSchemeParameter {
            scheme: "Kernel",
            ..
        }
    ));
}

// ============================================================================
// Parameter Validation
// ============================================================================

#[test]
fn test_tolerance_validation() {
    assert!(Validator::validate_tolerance(0.0).is_ok());
    assert!(Validator::validate_tolerance(0.5).is_ok());
    assert_eq!(
        Validator::validate_tolerance(-1.0).unwrap_err(),
        RegridError::InvalidTolerance(-1.0)
    );
    assert!(Validator::validate_tolerance(f64::NAN).is_err());
    assert!(Validator::validate_tolerance(f64::INFINITY).is_err());
}

#[test]
fn test_max_block_validation() {
    assert!(Validator::validate_max_block(1).is_ok());
    assert_eq!(
        Validator::validate_max_block(0).unwrap_err(),
        RegridError::InvalidMaxBlock(0)
    );
}

#[test]
fn test_weight_limit_validation() {
    assert!(Validator::validate_weight_limit(0.0).is_ok());
    assert!(Validator::validate_weight_limit(1e-10).is_ok());
    assert_eq!(
        Validator::validate_weight_limit(-1.0).unwrap_err(),
        RegridError::InvalidWeightLimit(-1.0)
    );
    assert!(Validator::validate_weight_limit(f64::NAN).is_err());
}

// ============================================================================
// Flag Validation
// ============================================================================

#[test]
fn test_variance_flags_need_a_variance_plane() {
    assert!(Validator::validate_resample_flags(Flags::USEVAR, true).is_ok());
    assert_eq!(
        Validator::validate_resample_flags(Flags::USEVAR, false).unwrap_err(),
        RegridError::MissingVariance { flag: "USEVAR" }
    );
    assert_eq!(
        Validator::validate_rebin_flags(Flags::VARWGT, false).unwrap_err(),
        RegridError::MissingVariance { flag: "VARWGT" }
    );
    assert!(Validator::validate_rebin_flags(Flags::GENVAR, false).is_ok());
}

#[test]
fn test_conserve_flux_needs_nonzero_tolerance() {
    let map = AffineMap::identity(2);
    assert!(Validator::validate_conserve_flux(Flags::NONE, 0.0, &map).is_ok());
    assert_eq!(
        Validator::validate_conserve_flux(Flags::CONSERVEFLUX, 0.0, &map).unwrap_err(),
        RegridError::FluxZeroTolerance
    );
    assert!(Validator::validate_conserve_flux(Flags::CONSERVEFLUX, 0.1, &map).is_ok());
}

#[test]
fn test_conserve_flux_needs_equal_ranks() {
    let map = AffineMap::new(2, 1, vec![0.0], vec![1.0, 1.0]).unwrap();
    assert_eq!(
        Validator::validate_conserve_flux(Flags::CONSERVEFLUX, 0.1, &map).unwrap_err(),
        RegridError::FluxRankMismatch {
            input: 2,
            output: 1,
        }
    );
}

// ============================================================================
// Rank and Section Validation
// ============================================================================

#[test]
fn test_resample_needs_an_inverse() {
    let bounds = GridBounds::new(vec![0, 0], vec![9, 9]).unwrap();
    let singular = AffineMap::new(2, 2, vec![0.0, 0.0], vec![1.0, 2.0, 2.0, 4.0]).unwrap();
    assert_eq!(
        Validator::validate_resample_ranks(&singular, &bounds, &bounds).unwrap_err(),
        RegridError::MissingTransform {
            direction: "inverse",
        }
    );
    let map = AffineMap::identity(2);
    assert!(Validator::validate_resample_ranks(&map, &bounds, &bounds).is_ok());
}

#[test]
fn test_rank_mismatch_names_the_operand() {
    let map = AffineMap::identity(2);
    let grid2 = GridBounds::new(vec![0, 0], vec![9, 9]).unwrap();
    let grid3 = GridBounds::new(vec![0, 0, 0], vec![4, 4, 4]).unwrap();

    assert_eq!(
        Validator::validate_resample_ranks(&map, &grid3, &grid2).unwrap_err(),
        RegridError::RankMismatch {
            expected: 2,
            got: 3,
            role: "input grid",
        }
    );
    assert_eq!(
        Validator::validate_rebin_ranks(&map, &grid2, &grid3).unwrap_err(),
        RegridError::RankMismatch {
            expected: 2,
            got: 3,
            role: "output bounds",
        }
    );
}

#[test]
fn test_section_must_lie_within_grid() {
    let grid = GridBounds::new(vec![0, 0], vec![9, 9]).unwrap();
    let inside = GridBounds::new(vec![2, 3], vec![5, 9]).unwrap();
    assert!(Validator::validate_section(&grid, &inside).is_ok());

    let outside = GridBounds::new(vec![2, -3], vec![5, 12]).unwrap();
    assert_eq!(
        Validator::validate_section(&grid, &outside).unwrap_err(),
        RegridError::SectionOutOfGrid {
            axis: 1,
            lower: -3,
            upper: 12,
            grid_lower: 0,
            grid_upper: 9,
        }
    );
}
