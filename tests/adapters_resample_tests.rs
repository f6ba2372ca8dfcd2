#![cfg(feature = "dev")]
//! Tests for pull-mode resampling through the public builder.
//!
//! ## Test Organization
//!
//! 1. **Basic Interpolation** - Linear, nearest, wide kernels
//! 2. **Bad Values and Variance** - USEBAD, USEVAR behavior
//! 3. **Flux Conservation** - Scaling and saturation
//! 4. **Sections and Tolerance** - Partial outputs, fit equivalence

use approx::assert_relative_eq;
use regrid_rs::prelude::*;

fn ramp(bounds: &GridBounds) -> Grid<f64> {
    let data = (0..bounds.npix()).map(|i| i as f64).collect();
    Grid::new(bounds.clone(), data).unwrap()
}

fn resampler(scheme: Scheme) -> ResampleProcessor {
    Regrid::new()
        .scheme(scheme)
        .adapter(Resample)
        .build()
        .unwrap()
}

// ============================================================================
// Basic Interpolation
// ============================================================================

/// Linear interpolation of a ramp shifted by a quarter pixel: interior
/// pixels land between their neighbors; the first pixel maps outside the
/// input and goes bad.
#[test]
fn test_linear_shift_quarter_pixel() {
    let bounds = GridBounds::new(vec![0], vec![9]).unwrap();
    let input = ramp(&bounds);
    let map = AffineMap::shift(&[0.25]);

    let proc = resampler(Scheme::Linear);
    let result = proc.run(&map, &input, f64::NAN, &bounds, None).unwrap();

    assert_eq!(result.nbad, 1);
    assert!(result.grid.value_at(&[0]).is_nan());
    for j in 1..10 {
        assert_relative_eq!(result.grid.value_at(&[j]), j as f64 - 0.25, epsilon = 1e-12);
    }
}

/// Nearest-neighbor rounding snaps a sub-half-pixel shift away.
#[test]
fn test_nearest_snaps_small_shift() {
    let bounds = GridBounds::new(vec![0], vec![9]).unwrap();
    let input = ramp(&bounds);
    let map = AffineMap::shift(&[0.25]);

    let proc = resampler(Scheme::Nearest);
    let result = proc.run(&map, &input, f64::NAN, &bounds, None).unwrap();

    assert_eq!(result.nbad, 0);
    for j in 0..10 {
        assert_relative_eq!(result.grid.value_at(&[j]), j as f64);
    }
}

/// The nearest-neighbor window is half-open: a position exactly half a
/// pixel above the last center is outside.
#[test]
fn test_nearest_upper_edge_is_exclusive() {
    let bounds = GridBounds::new(vec![0], vec![9]).unwrap();
    let input = ramp(&bounds);
    // Output pixel j samples the input at j + 0.5.
    let map = AffineMap::shift(&[-0.5]);

    let proc = resampler(Scheme::Nearest);
    let result = proc.run(&map, &input, f64::NAN, &bounds, None).unwrap();

    assert_eq!(result.nbad, 1);
    assert!(result.grid.value_at(&[9]).is_nan());
    for j in 0..9 {
        assert_relative_eq!(result.grid.value_at(&[j]), (j + 1) as f64);
    }
}

/// The general N-dimensional path interpolates a separable ramp.
#[test]
fn test_linear_shift_three_dims() {
    let bounds = GridBounds::new(vec![0, 0, 0], vec![3, 3, 3]).unwrap();
    let input = ramp(&bounds);
    let map = AffineMap::shift(&[0.25, 0.0, 0.0]);

    let proc = resampler(Scheme::Linear);
    let result = proc.run(&map, &input, f64::NAN, &bounds, None).unwrap();

    // The first plane of the fastest axis maps outside the input.
    assert_eq!(result.nbad, 16);
    for k in 0..4 {
        for j in 0..4 {
            assert!(result.grid.value_at(&[0, j, k]).is_nan());
            for i in 1..4 {
                let expected = (i as f64 - 0.25) + 4.0 * j as f64 + 16.0 * k as f64;
                assert_relative_eq!(
                    result.grid.value_at(&[i, j, k]),
                    expected,
                    epsilon = 1e-12
                );
            }
        }
    }
}

/// A sinc kernel at exact pixel positions reproduces the input.
#[test]
fn test_sinc_identity_reproduces_input() {
    let bounds = GridBounds::new(vec![0], vec![9]).unwrap();
    let input = ramp(&bounds);
    let map = AffineMap::identity(1);

    let proc = resampler(Scheme::Sinc { radius: 2 });
    let result = proc.run(&map, &input, f64::NAN, &bounds, None).unwrap();

    assert_eq!(result.nbad, 0);
    for j in 0..10 {
        assert_relative_eq!(result.grid.value_at(&[j]), j as f64, epsilon = 1e-10);
    }
}

// ============================================================================
// Bad Values and Variance
// ============================================================================

/// With USEBAD, a bad input pixel poisons outputs that depend on it with
/// full weight, while zero-weight neighbors stay unaffected.
#[test]
fn test_usebad_excludes_bad_neighbors() {
    let bounds = GridBounds::new(vec![0], vec![9]).unwrap();
    let mut input = ramp(&bounds);
    input.data_mut()[5] = -999.0;
    let map = AffineMap::identity(1);

    let proc = Regrid::new()
        .scheme(Scheme::Linear)
        .flags(Flags::USEBAD)
        .adapter(Resample)
        .build()
        .unwrap();
    let result = proc.run(&map, &input, -999.0, &bounds, None).unwrap();

    assert_eq!(result.nbad, 1);
    assert_relative_eq!(result.grid.value_at(&[5]), -999.0);
    assert_relative_eq!(result.grid.value_at(&[4]), 4.0);
    assert_relative_eq!(result.grid.value_at(&[6]), 6.0);
}

/// Half-pixel linear interpolation halves a constant variance.
#[test]
fn test_usevar_propagates_variance() {
    let bounds = GridBounds::new(vec![0], vec![9]).unwrap();
    let data = (0..10).map(|i| i as f64).collect();
    let variance = vec![2.0; 10];
    let input = Grid::with_variance(bounds.clone(), data, variance).unwrap();
    let map = AffineMap::shift(&[0.5]);

    let proc = Regrid::new()
        .scheme(Scheme::Linear)
        .flags(Flags::USEVAR)
        .adapter(Resample)
        .build()
        .unwrap();
    let result = proc.run(&map, &input, f64::NAN, &bounds, None).unwrap();

    assert_eq!(result.nbad, 1);
    let var = result.grid.variance().unwrap();
    for j in 1..10 {
        assert_relative_eq!(result.grid.value_at(&[j]), j as f64 - 0.5, epsilon = 1e-12);
        assert_relative_eq!(var[j as usize], 1.0, epsilon = 1e-12);
    }
}

/// Block averaging weights neighbors by reciprocal variance when a
/// variance plane is supplied.
#[test]
fn test_block_ave_weights_by_reciprocal_variance() {
    let bounds = GridBounds::new(vec![0], vec![2]).unwrap();
    let input =
        Grid::with_variance(bounds.clone(), vec![2.0, 4.0, 8.0], vec![1.0, 2.0, 4.0]).unwrap();

    let proc = Regrid::new()
        .scheme(Scheme::BlockAve { radius: 1 })
        .flags(Flags::USEVAR)
        .adapter(Resample)
        .build()
        .unwrap();
    let result = proc
        .run(&AffineMap::identity(1), &input, f64::NAN, &bounds, None)
        .unwrap();

    assert_eq!(result.nbad, 0);
    let var = result.grid.variance().unwrap();
    // Center pixel: weights 1, 1/2, 1/4 over values 2, 4, 8.
    assert_relative_eq!(result.grid.value_at(&[1]), 24.0 / 7.0, epsilon = 1e-12);
    assert_relative_eq!(var[1], 4.0 / 7.0, epsilon = 1e-12);
    // Edge pixels lose the clipped neighbor.
    assert_relative_eq!(result.grid.value_at(&[0]), 8.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(var[0], 2.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(result.grid.value_at(&[2]), 16.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(var[2], 4.0 / 3.0, epsilon = 1e-12);
}

#[test]
fn test_usevar_without_variance_plane_is_an_error() {
    let bounds = GridBounds::new(vec![0], vec![9]).unwrap();
    let input = ramp(&bounds);
    let proc = Regrid::new()
        .flags(Flags::USEVAR)
        .adapter(Resample)
        .build()
        .unwrap();
    let err = proc
        .run(&AffineMap::identity(1), &input, f64::NAN, &bounds, None)
        .unwrap_err();
    assert_eq!(err, RegridError::MissingVariance { flag: "USEVAR" });
}

// ============================================================================
// Flux Conservation
// ============================================================================

/// A 2x magnification halves pixel values when flux is conserved.
#[test]
fn test_conserve_flux_scales_by_volume_ratio() {
    let bounds = GridBounds::new(vec![0], vec![9]).unwrap();
    let input = Grid::new(bounds.clone(), vec![1.0; 10]).unwrap();
    let map = AffineMap::zoom(&[2.0]);

    let proc = Regrid::new()
        .scheme(Scheme::Linear)
        .flags(Flags::CONSERVEFLUX)
        .tolerance(0.05)
        .adapter(Resample)
        .build()
        .unwrap();
    let result = proc.run(&map, &input, f64::NAN, &bounds, None).unwrap();

    assert_eq!(result.nbad, 0);
    for j in 0..10 {
        assert_relative_eq!(result.grid.value_at(&[j]), 0.5, epsilon = 1e-10);
    }
}

/// Scaled values that overflow the integer element type go bad instead
/// of wrapping.
#[test]
fn test_conserve_flux_overflow_goes_bad() {
    let bounds = GridBounds::new(vec![0], vec![9]).unwrap();
    let input = Grid::new(bounds.clone(), vec![200u8; 10]).unwrap();
    let out_bounds = GridBounds::new(vec![0], vec![4]).unwrap();
    let map = AffineMap::zoom(&[0.5]);

    let proc = Regrid::new()
        .scheme(Scheme::Linear)
        .flags(Flags::CONSERVEFLUX)
        .tolerance(0.1)
        .adapter(Resample)
        .build()
        .unwrap();
    let result = proc.run(&map, &input, 0u8, &out_bounds, None).unwrap();

    // Demagnification doubles every value past u8::MAX.
    assert_eq!(result.nbad, 5);
    assert_eq!(result.grid.data(), &[0u8; 5]);
}

// ============================================================================
// Sections and Tolerance
// ============================================================================

/// A section restricts computation; everything outside keeps the bad
/// value without being counted.
#[test]
fn test_section_limits_computed_pixels() {
    let bounds = GridBounds::new(vec![0], vec![9]).unwrap();
    let input = ramp(&bounds);
    let section = GridBounds::new(vec![2], vec![4]).unwrap();

    let proc = resampler(Scheme::Linear);
    let result = proc
        .run(&AffineMap::identity(1), &input, -1.0, &bounds, Some(&section))
        .unwrap();

    assert_eq!(result.nbad, 0);
    for j in 0..10 {
        let expected = if (2..=4).contains(&j) { j as f64 } else { -1.0 };
        assert_relative_eq!(result.grid.value_at(&[j]), expected);
    }
}

#[test]
fn test_section_outside_output_is_rejected() {
    let bounds = GridBounds::new(vec![0], vec![9]).unwrap();
    let input = ramp(&bounds);
    let section = GridBounds::new(vec![5], vec![15]).unwrap();
    let proc = resampler(Scheme::Linear);
    let err = proc
        .run(&AffineMap::identity(1), &input, -1.0, &bounds, Some(&section))
        .unwrap_err();
    assert!(matches!(err, RegridError::SectionOutOfGrid { axis: 0, .. }));
}

/// On an exactly affine mapping the approximated path agrees with the
/// direct path.
#[test]
fn test_fit_path_matches_direct_path() {
    let bounds = GridBounds::new(vec![0, 0], vec![39, 39]).unwrap();
    let data = (0..bounds.npix()).map(|i| (i % 17) as f64).collect();
    let input = Grid::new(bounds.clone(), data).unwrap();
    let map = AffineMap::new(
        2,
        2,
        vec![0.3, -0.2],
        vec![1.0, 0.1, -0.05, 1.0],
    )
    .unwrap();

    let direct = resampler(Scheme::Linear)
        .run(&map, &input, f64::NAN, &bounds, None)
        .unwrap();
    let fitted = Regrid::new()
        .scheme(Scheme::Linear)
        .tolerance(0.01)
        .adapter(Resample)
        .build()
        .unwrap()
        .run(&map, &input, f64::NAN, &bounds, None)
        .unwrap();

    assert_eq!(direct.nbad, fitted.nbad);
    for (a, b) in direct.grid.data().iter().zip(fitted.grid.data()) {
        if a.is_nan() {
            assert!(b.is_nan());
        } else {
            assert_relative_eq!(a, b, epsilon = 1e-10);
        }
    }
}

/// Mapping whose inverse bends gently: output pixel y samples the input
/// at y + y^2 / 500.
struct WarpMap;

impl Mapping for WarpMap {
    fn input_rank(&self) -> usize {
        1
    }

    fn output_rank(&self) -> usize {
        1
    }

    fn has_forward(&self) -> bool {
        false
    }

    fn has_inverse(&self) -> bool {
        true
    }

    fn transform(
        &self,
        points: &PointSet,
        forward: bool,
        out: &mut PointSet,
    ) -> Result<(), RegridError> {
        if forward {
            return Err(RegridError::MissingTransform {
                direction: "forward",
            });
        }
        out.reshape(1, points.npoint());
        for p in 0..points.npoint() {
            let y = points.get(0, p);
            out.set(0, p, y + y * y / 500.0);
        }
        Ok(())
    }
}

/// Tightening the tolerance toward zero never worsens the agreement with
/// the unapproximated output.
#[test]
fn test_tolerance_ladder_never_degrades() {
    let in_bounds = GridBounds::new(vec![0], vec![299]).unwrap();
    let out_bounds = GridBounds::new(vec![0], vec![199]).unwrap();
    let input = ramp(&in_bounds);

    let run = |tol: f64| {
        Regrid::new()
            .scheme(Scheme::Linear)
            .tolerance(tol)
            .adapter(Resample)
            .build()
            .unwrap()
            .run(&WarpMap, &input, f64::NAN, &out_bounds, None)
            .unwrap()
    };

    let exact = run(0.0);
    assert_eq!(exact.nbad, 0);

    let ladder = [2.0, 1.0, 0.25];
    let discrepancies: Vec<f64> = ladder
        .iter()
        .map(|&tol| {
            run(tol)
                .grid
                .data()
                .iter()
                .zip(exact.grid.data())
                .map(|(a, b)| (a - b).abs())
                .fold(0.0_f64, f64::max)
        })
        .collect();

    // The loosest rung actually exercises the fit path.
    assert!(discrepancies[0] > 0.0);
    for (disc, tol) in discrepancies.iter().zip(ladder) {
        assert!(*disc <= tol + 1e-9);
    }
    for pair in discrepancies.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-9);
    }
}

/// A singular mapping cannot be resampled.
#[test]
fn test_singular_mapping_is_rejected() {
    let bounds = GridBounds::new(vec![0, 0], vec![9, 9]).unwrap();
    let data = vec![0.0; 100];
    let input = Grid::new(bounds.clone(), data).unwrap();
    let map = AffineMap::new(2, 2, vec![0.0, 0.0], vec![1.0, 1.0, 1.0, 1.0]).unwrap();
    let err = resampler(Scheme::Linear)
        .run(&map, &input, f64::NAN, &bounds, None)
        .unwrap_err();
    assert_eq!(
        err,
        RegridError::MissingTransform {
            direction: "inverse",
        }
    );
}
