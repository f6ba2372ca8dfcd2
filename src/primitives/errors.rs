//! Error types for grid resampling and rebinning.
//!
//! ## Purpose
//!
//! This module defines `RegridError`, the single error enum returned by
//! every fallible operation in the crate. Fatal conditions abort a whole
//! top-level call and carry enough context (axis, bound, rank) to report
//! precisely what was violated.
//!
//! ## Design notes
//!
//! * **Fatal only**: soft per-pixel conditions (out-of-bounds coordinate,
//!   bad neighbor, insufficient weight, integer overflow on conversion)
//!   never appear here; they resolve to the bad-value sentinel and a
//!   returned counter.
//! * **No retries**: none of these errors are retried internally; they
//!   propagate to the caller via `?`.
//! * **Comparable**: implements `Clone` and `PartialEq` so tests can
//!   assert on exact error values.
//!
//! ## Non-goals
//!
//! * This module does not classify or wrap errors from outside the crate
//!   beyond the `TransformFailed` message produced by a `Mapping`.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(feature = "std")]
use std::string::String;

use core::fmt;

// ============================================================================
// Error Enum
// ============================================================================

/// Errors raised by resampling and rebinning operations.
#[derive(Debug, Clone, PartialEq)]
pub enum RegridError {
    /// A grid or bounds array does not match the mapping's declared rank.
    RankMismatch {
        /// Rank required by the mapping.
        expected: usize,
        /// Rank actually supplied.
        got: usize,
        /// Which operand was inconsistent ("input grid", "output bounds", ...).
        role: &'static str,
    },

    /// A lower bound exceeds its upper bound on some axis.
    InvalidBounds {
        /// Zero-based axis index.
        axis: usize,
        /// Supplied lower bound.
        lower: i64,
        /// Supplied upper bound.
        upper: i64,
    },

    /// A section is not contained in its parent grid.
    SectionOutOfGrid {
        /// Zero-based axis index of the first violation.
        axis: usize,
        /// Section bounds on that axis.
        lower: i64,
        /// Section bounds on that axis.
        upper: i64,
        /// Parent grid bounds on that axis.
        grid_lower: i64,
        /// Parent grid bounds on that axis.
        grid_upper: i64,
    },

    /// The mapping does not define the transform direction the operation needs.
    MissingTransform {
        /// "forward" or "inverse".
        direction: &'static str,
    },

    /// Tolerance is negative or non-finite.
    InvalidTolerance(f64),

    /// Maximum block size is zero.
    InvalidMaxBlock(usize),

    /// Weight limit is negative or non-finite.
    InvalidWeightLimit(f64),

    /// A scheme parameter is out of range or missing.
    InvalidSchemeParameter {
        /// Scheme name.
        scheme: &'static str,
        /// Human-readable description of the violation.
        detail: String,
    },

    /// The scheme is not available for the requested operation.
    SchemeNotSupported {
        /// Scheme name.
        scheme: &'static str,
        /// "resample" or "rebin".
        operation: &'static str,
    },

    /// Flux conservation was requested with a zero tolerance.
    FluxZeroTolerance,

    /// Flux conservation was requested with unequal input/output ranks.
    FluxRankMismatch {
        /// Mapping input rank.
        input: usize,
        /// Mapping output rank.
        output: usize,
    },

    /// A flag requires a variance plane that was not supplied.
    MissingVariance {
        /// Flag that required the plane ("USEVAR", "VARWGT").
        flag: &'static str,
    },

    /// A data buffer length does not match its bounds.
    BufferSizeMismatch {
        /// Pixel count implied by the bounds.
        expected: usize,
        /// Buffer length actually supplied.
        got: usize,
    },

    /// The mapping collaborator reported a failure.
    TransformFailed(String),

    /// A user-supplied kernel declined to produce a weight.
    UserKernelFailed {
        /// Pixel offset at which the kernel failed.
        offset: f64,
    },

    /// A builder parameter was configured more than once.
    DuplicateParameter {
        /// Parameter name.
        parameter: &'static str,
    },
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for RegridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegridError::RankMismatch {
                expected,
                got,
                role,
            } => write!(
                f,
                "Rank mismatch: {} has {} axes, mapping requires {}",
                role, got, expected
            ),
            RegridError::InvalidBounds { axis, lower, upper } => write!(
                f,
                "Invalid bounds on axis {}: [{}, {}] (lower must be <= upper)",
                axis, lower, upper
            ),
            RegridError::SectionOutOfGrid {
                axis,
                lower,
                upper,
                grid_lower,
                grid_upper,
            } => write!(
                f,
                "Section [{}, {}] on axis {} is not contained in grid [{}, {}]",
                lower, upper, axis, grid_lower, grid_upper
            ),
            RegridError::MissingTransform { direction } => write!(
                f,
                "Mapping does not define the {} transform required by this operation",
                direction
            ),
            RegridError::InvalidTolerance(tol) => write!(
                f,
                "Invalid tolerance: {} (must be >= 0 and finite)",
                tol
            ),
            RegridError::InvalidMaxBlock(max_block) => write!(
                f,
                "Invalid max_block: {} (must be at least 1)",
                max_block
            ),
            RegridError::InvalidWeightLimit(wlim) => write!(
                f,
                "Invalid weight_limit: {} (must be >= 0 and finite)",
                wlim
            ),
            RegridError::InvalidSchemeParameter { scheme, detail } => {
                write!(f, "Invalid parameter for scheme {}: {}", scheme, detail)
            }
            RegridError::SchemeNotSupported { scheme, operation } => write!(
                f,
                "Scheme {} is not supported by the {} operation",
                scheme, operation
            ),
            RegridError::FluxZeroTolerance => write!(
                f,
                "Flux conservation requires a nonzero tolerance (no linear fit is possible with tol = 0)"
            ),
            RegridError::FluxRankMismatch { input, output } => write!(
                f,
                "Flux conservation requires equal ranks: mapping has {} input and {} output axes",
                input, output
            ),
            RegridError::MissingVariance { flag } => write!(
                f,
                "Flag {} requires an input variance plane, but none was supplied",
                flag
            ),
            RegridError::BufferSizeMismatch { expected, got } => write!(
                f,
                "Buffer length mismatch: bounds imply {} pixels, buffer has {}",
                expected, got
            ),
            RegridError::TransformFailed(msg) => {
                write!(f, "Coordinate transform failed: {}", msg)
            }
            RegridError::UserKernelFailed { offset } => write!(
                f,
                "User kernel failed to produce a weight at offset {}",
                offset
            ),
            RegridError::DuplicateParameter { parameter } => write!(
                f,
                "Parameter '{}' was set multiple times. Each parameter can only be configured once.",
                parameter
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RegridError {}
