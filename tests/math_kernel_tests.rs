#![cfg(feature = "dev")]
//! Tests for kernel shapes and their evaluation.
//!
//! ## Test Organization
//!
//! 1. **Shape Primitives** - sinc and somb closed forms
//! 2. **Tapered Shapes** - Envelope behavior and cutoffs
//! 3. **Radii** - Defaults and automatic Gaussian radii
//! 4. **User Kernels** - Delegation and failure propagation

use approx::assert_relative_eq;
use core::f64::consts::PI;
use regrid_rs::internals::math::kernel::{
    sinc, somb, KernelOp, KernelShape, SeparableKernel, UserKernel,
};
use regrid_rs::prelude::*;

// ============================================================================
// Shape Primitives
// ============================================================================

#[test]
fn test_sinc_closed_form() {
    assert_relative_eq!(sinc(0.0), 1.0);
    assert_relative_eq!(sinc(1.0), 0.0, epsilon = 1e-12);
    assert_relative_eq!(sinc(2.0), 0.0, epsilon = 1e-12);
    assert_relative_eq!(sinc(0.5), 2.0 / PI, epsilon = 1e-12);
    assert_relative_eq!(sinc(-0.5), sinc(0.5));
}

#[test]
fn test_somb_closed_form() {
    assert_relative_eq!(somb(0.0), 1.0);
    // First zero of J1 is at pi * x = 3.8317.
    assert!(somb(3.8317 / PI).abs() < 1e-3);
    assert_relative_eq!(somb(-0.7), somb(0.7), epsilon = 1e-12);
}

// ============================================================================
// Tapered Shapes
// ============================================================================

#[test]
fn test_sinc_cos_envelope() {
    let kernel = SeparableKernel::new(KernelShape::SincCos { width: 2.0 }, 2);
    assert_relative_eq!(kernel.weight(0.0).unwrap(), 1.0);

    let expected = sinc(0.5) * (0.5 * PI * 0.5 / 2.0).cos();
    assert_relative_eq!(kernel.weight(0.5).unwrap(), expected, epsilon = 1e-12);

    // Zero beyond the envelope width.
    assert_eq!(kernel.weight(2.5).unwrap(), 0.0);
}

#[test]
fn test_gauss_half_maximum_at_half_fwhm() {
    let k = KernelShape::gauss_k(2.0);
    let kernel = SeparableKernel::new(KernelShape::Gauss { k }, 3);
    assert_relative_eq!(kernel.weight(1.0).unwrap(), 0.5, epsilon = 1e-12);
    assert_relative_eq!(kernel.weight(-1.0).unwrap(), 0.5, epsilon = 1e-12);
    assert_relative_eq!(kernel.weight(0.0).unwrap(), 1.0);
}

#[test]
fn test_sinc_sinc_product() {
    let kernel = SeparableKernel::new(KernelShape::SincSinc { width: 2.0 }, 2);
    let expected = sinc(0.7) * sinc(0.7 / 2.0);
    assert_relative_eq!(kernel.weight(0.7).unwrap(), expected, epsilon = 1e-12);
}

// ============================================================================
// Radii
// ============================================================================

#[test]
fn test_kernel_op_radii() {
    assert_eq!(KernelOp::Nearest.radius(), 0);
    assert_eq!(KernelOp::Linear.radius(), 1);
    assert_eq!(KernelOp::BlockAve { radius: 3 }.radius(), 3);
    let sep = SeparableKernel::new(KernelShape::Sinc, 4);
    assert_eq!(KernelOp::Separable(sep).radius(), 4);
}

/// The automatic Gaussian radius reaches to where the tail falls below
/// the internal cutoff.
#[test]
fn test_gauss_auto_radius() {
    let k = KernelShape::gauss_k(1.0);
    let kernel = SeparableKernel::with_auto_radius(KernelShape::Gauss { k });
    assert_eq!(kernel.radius(), 3);

    // Wider Gaussians need wider radii.
    let k_wide = KernelShape::gauss_k(4.0);
    let wide = SeparableKernel::with_auto_radius(KernelShape::Gauss { k: k_wide });
    assert!(wide.radius() > kernel.radius());
}

// ============================================================================
// User Kernels
// ============================================================================

fn triangle(offset: f64, params: &[f64]) -> Option<f64> {
    let half_width = params[0];
    Some((1.0 - offset.abs() / half_width).max(0.0))
}

fn refusing(_offset: f64, _params: &[f64]) -> Option<f64> {
    None
}

#[test]
fn test_user_kernel_delegates() {
    let kernel = SeparableKernel::new(
        KernelShape::User(UserKernel {
            func: triangle,
            params: vec![2.0],
        }),
        2,
    );
    assert_relative_eq!(kernel.weight(0.0).unwrap(), 1.0);
    assert_relative_eq!(kernel.weight(1.0).unwrap(), 0.5);
    assert_relative_eq!(kernel.weight(-3.0).unwrap(), 0.0);
}

#[test]
fn test_user_kernel_failure_is_an_error() {
    let kernel = SeparableKernel::new(
        KernelShape::User(UserKernel {
            func: refusing,
            params: vec![],
        }),
        1,
    );
    let err = kernel.weight(0.5).unwrap_err();
    assert_eq!(err, RegridError::UserKernelFailed { offset: 0.5 });
}
