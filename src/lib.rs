//! # regrid — adaptive N-dimensional grid resampling and rebinning
//!
//! A high-performance engine for moving pixel data between N-dimensional
//! grids related by an arbitrary coordinate transformation, with adaptive
//! linear approximation of the transform, a family of interpolation and
//! spreading kernels, bad-pixel propagation, variance handling, and flux
//! conservation.
//!
//! ## Two directions, one engine
//!
//! The crate offers the same operation in two complementary directions:
//!
//! * **Resampling (pull mode)**: every pixel of the output grid is
//!   transformed back into the input grid and filled by interpolating the
//!   input values around that position. Every output pixel receives
//!   exactly one value. This is the right mode when the output sampling
//!   matters: regridding an image onto a new projection, extracting an
//!   aligned cutout, or building a display resolution.
//!
//! * **Rebinning (push mode)**: every pixel of the input grid is
//!   transformed forward into the output grid and its value spread over
//!   the neighboring output pixels, accumulating weighted sums that are
//!   normalized at the end. Input values are never read twice, which is
//!   the right mode when the input must be fully accounted for: combining
//!   exposures into a mosaic, binning spectra, or conserving flux.
//!
//! Both modes share the adaptive engine: where the transformation is
//! nearly linear across a region of the grid, it is replaced by a
//! validated linear fit, and only where it bends does the engine fall
//! back to transforming every pixel.
//!
//! ## Quick Start
//!
//! ```rust
//! use regrid_rs::prelude::*;
//!
//! // A 1-D ramp sampled on pixels 0..=9.
//! let bounds = GridBounds::new(vec![0], vec![9])?;
//! let data: Vec<f64> = (0..10).map(|i| i as f64).collect();
//! let input = Grid::new(bounds.clone(), data)?;
//!
//! // The forward direction carries input positions to output positions,
//! // so output pixel x samples the input at x - 0.25.
//! let mapping = AffineMap::shift(&[0.25]);
//!
//! // Build the processor
//! let proc = Regrid::new()
//!     .scheme(Scheme::Linear)   // Linear interpolation
//!     .tolerance(0.05)          // Allow 0.05 px of approximation error
//!     .adapter(Resample)        // Pull mode
//!     .build()?;
//!
//! let result = proc.run(&mapping, &input, f64::NAN, &bounds, None)?;
//!
//! // Interior pixels interpolate the ramp; the first pixel maps outside
//! // the input and becomes bad.
//! assert_eq!(result.nbad, 1);
//! assert!((result.grid.value_at(&[5]) - 4.75).abs() < 1e-10);
//! # Result::<(), RegridError>::Ok(())
//! ```
//!
//! ### Sequential rebinning
//!
//! Push mode can accumulate any number of input grids into one output
//! before normalizing, each with its own mapping and section:
//!
//! ```rust
//! use regrid_rs::prelude::*;
//!
//! let bounds = GridBounds::new(vec![0], vec![9])?;
//! let exposure = Grid::new(bounds.clone(), vec![1.0; 10])?;
//!
//! let proc = Regrid::new()
//!     .scheme(Scheme::Nearest)
//!     .adapter(Rebin)
//!     .build()?;
//!
//! let mut seq = proc.begin_sequence(bounds.clone(), f64::NAN);
//!
//! // First call zeroes the accumulator; intermediate calls yield None.
//! let mapping = AffineMap::identity(1);
//! assert!(seq.process(&mapping, &exposure, None, Flags::REBININIT)?.is_none());
//!
//! // Last call normalizes and yields the combined output.
//! let combined = seq
//!     .process(&mapping, &exposure, None, Flags::REBINEND)?
//!     .expect("REBINEND yields the output");
//! assert_eq!(combined.nused, 20);
//! assert!((combined.grid.value_at(&[3]) - 1.0).abs() < 1e-10);
//! # Result::<(), RegridError>::Ok(())
//! ```
//!
//! For the common single-grid case, `RebinProcessor::run` performs the
//! whole lifecycle in one call.
//!
//! ## Schemes
//!
//! The `scheme` parameter selects how values move between grids. A radius
//! of 0 requests the scheme's default radius.
//!
//! | Scheme         | Kind                       | Resample | Rebin |
//! |----------------|----------------------------|----------|-------|
//! | `Nearest`      | Copy the nearest pixel     | yes      | yes   |
//! | `Linear`       | Linear interpolation       | yes      | yes   |
//! | `Sinc`         | `sinc(x)`                  | yes      | yes   |
//! | `SincSinc`     | `sinc(x) sinc(x/width)`    | yes      | yes   |
//! | `SincCos`      | `sinc(x) cos(...)` taper   | yes      | yes   |
//! | `SincGauss`    | `sinc(x) exp(-k x^2)`      | yes      | yes   |
//! | `Somb`         | `somb(x)` (Airy profile)   | yes      | yes   |
//! | `SombCos`      | `somb(x) cos(...)` taper   | yes      | yes   |
//! | `Gauss`        | `exp(-k x^2)`              | no       | yes   |
//! | `BlockAve`     | Boxcar average             | yes      | no    |
//! | `Kernel`       | Caller-supplied kernel     | yes      | yes   |
//!
//! **Choosing a scheme:**
//! - **`Linear`** (default): fast, bounded, and free of ringing. The
//!   right choice for most work.
//! - **`Nearest`**: preserves exact input values; use for masks and
//!   categorical data.
//! - **`SincSinc`** and friends: better frequency response for
//!   well-sampled data, at the cost of wider footprints and ringing near
//!   sharp edges.
//! - **`Gauss`**: rebinning with intentional smoothing.
//! - **`BlockAve`**: downsampling by plain averaging.
//!
//! ## Flags
//!
//! Optional behavior is selected by a bitset combined with `|`:
//!
//! | Flag           | Modes    | Effect                                          |
//! |----------------|----------|-------------------------------------------------|
//! | `USEBAD`       | both     | Recognize the bad-value sentinel in the input   |
//! | `USEVAR`       | both     | Propagate variances through the operation       |
//! | `CONSERVEFLUX` | both     | Scale values by the local area ratio            |
//! | `GENVAR`       | rebin    | Generate output variance from the value spread  |
//! | `VARWGT`       | rebin    | Weight inputs by reciprocal variance            |
//! | `REBININIT`    | rebin    | Zero the accumulator (sequence lifecycle)       |
//! | `REBINEND`     | rebin    | Normalize and finalize (sequence lifecycle)     |
//!
//! Bad pixels, positions falling outside the grids, and values that do
//! not fit the output type are soft conditions: they produce bad output
//! pixels (or skipped input pixels) and a count, never an error.
//!
//! ## Adaptive approximation
//!
//! Transforming every pixel through an expensive mapping dominates the
//! cost of regridding. With a nonzero `tolerance`, the engine recursively
//! subdivides the requested section, fits a linear approximation to the
//! mapping over each piece, and validates the fit at fresh test
//! positions. Pieces where the fit is provably accurate to within the
//! tolerance use the fit; pieces where it is not are bisected until they
//! are either fit or small enough to transform directly.
//!
//! - `tolerance(0.0)` (default) disables approximation entirely.
//! - `max_block(n)` bounds the extent a single fit may cover, guarding
//!   against transforms whose nonlinearity cancels at the test positions.
//! - `tuning(AdaptiveTuning { .. })` exposes the engine's performance
//!   knobs; the defaults are correctness-neutral.
//!
//! ## Minimal usage (no_std)
//!
//! The crate supports `no_std` environments with an allocator. Disable
//! default features to remove the standard library dependency:
//!
//! ```toml
//! [dependencies]
//! regrid_rs = { version = "0.1", default-features = false }
//! ```
//!
//! ## References
//!
//! - Berry, D. S., Warren-Smith, R. F. & Jenness, T. (2016). "AST: A
//!   library for modelling and manipulating coordinate systems"

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

// ============================================================================
// Internal Modules
// ============================================================================

// Layer 1: Primitives - data structures and basic utilities.
//
// Contains the fundamental data structures (`Grid`, `GridBounds`,
// `PointSet`, `Flags`, `errors`), the `Pixel` element trait, and the
// `Mapping` transform abstraction.
mod primitives;

// Layer 2: Math - pure mathematical functions.
//
// Contains the interpolation/spreading kernel shapes and the linear
// approximation fitted to a mapping over a section.
mod math;

// Layer 3: Algorithms - per-pixel kernel application.
//
// Contains pull-mode interpolation, push-mode spreading, and the
// weighted accumulation state rebinning normalizes from.
mod algorithms;

// Layer 4: Engine - orchestration and execution control.
//
// Contains adaptive subdivision, tile iteration, operation validation,
// and reusable workspaces.
mod engine;

// Layer 5: Adapters - execution mode adapters.
//
// Contains the execution modes: resample (pull), rebin (push), and
// sequential rebin accumulation.
mod adapters;

// High-level fluent API.
//
// Provides the `Regrid` builder for configuring and running operations.
mod api;

// ============================================================================
// Prelude
// ============================================================================

/// Standard prelude.
///
/// This module is intended to be wildcard-imported for convenient access
/// to the most commonly used types:
///
/// ```
/// use regrid_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        Adapter::{Rebin, Resample},
        AdaptiveTuning, AffineMap, Flags, Grid, GridBounds, Mapping, Pixel, PointSet,
        RebinOutput, RebinProcessor, RebinSequence, RegridBuilder as Regrid, RegridError,
        ResampleOutput, ResampleProcessor, Scheme, UserKernel,
    };
}

// ============================================================================
// Testing re-exports
// ============================================================================

/// Internal modules for development and testing.
///
/// This module re-exports internal modules for development and testing purposes.
/// It is only available with the `dev` feature enabled.
///
/// **Warning**: These are internal implementation details and may change without notice.
/// Do not use in production code.
#[cfg(feature = "dev")]
pub mod internals {
    /// Internal primitive types and utilities.
    pub mod primitives {
        pub use crate::primitives::*;
    }
    /// Internal math functions.
    pub mod math {
        pub use crate::math::*;
    }
    /// Internal core algorithms.
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    /// Internal execution engine.
    pub mod engine {
        pub use crate::engine::*;
    }
    /// Internal adapters.
    pub mod adapters {
        pub use crate::adapters::*;
    }
    /// Internal API.
    pub mod api {
        pub use crate::api::*;
    }
}
