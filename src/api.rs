//! High-level API for grid resampling and rebinning.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point. It implements
//! a fluent builder pattern for configuring an operation and choosing an
//! execution adapter (Resample or Rebin).
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder with sensible defaults for all parameters.
//! * **Polymorphic**: Uses marker types to transition to specialized adapter builders.
//! * **Validated**: Parameters are validated during adapter construction.
//!
//! ## Key concepts
//!
//! * **Execution Adapters**: Resample (pull mode) and Rebin (push mode).
//! * **Configuration Flow**: Builder pattern ending in `.adapter(...)`.
//! * **Validation**: Parameters are validated when `.build()` is called on
//!   the adapter builder.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`RegridBuilder`] via `Regrid::new()`.
//! 2. Chain configuration methods (`.scheme()`, `.tolerance()`, etc.).
//! 3. Select an adapter via `.adapter(Resample)` to get an execution builder.
//! 4. Call `.build()` to obtain a validated processor.

// Publicly re-exported types
pub use crate::adapters::rebin::{RebinBuilder, RebinProcessor};
pub use crate::adapters::resample::{ResampleBuilder, ResampleOutput, ResampleProcessor};
pub use crate::engine::subdivide::AdaptiveTuning;
pub use crate::adapters::sequence::{RebinOutput, RebinSequence};
pub use crate::math::kernel::{Scheme, UserKernel};
pub use crate::primitives::errors::RegridError;
pub use crate::primitives::flags::Flags;
pub use crate::primitives::grid::{Grid, GridBounds, PointSet};
pub use crate::primitives::mapping::{AffineMap, Mapping};
pub use crate::primitives::pixel::Pixel;

/// Marker types for selecting execution adapters.
#[allow(non_snake_case)]
pub mod Adapter {
    pub use super::{Rebin, Resample};
}

/// Fluent builder for configuring a grid operation.
#[derive(Debug, Clone, Default)]
pub struct RegridBuilder {
    /// Interpolation or spreading scheme.
    pub scheme: Option<Scheme>,

    /// Behavior flags.
    pub flags: Option<Flags>,

    /// Maximum approximation error, in pixels.
    pub tolerance: Option<f64>,

    /// Maximum section extent before unconditional bisection.
    pub max_block: Option<usize>,

    /// Minimum accumulated weight for a valid output pixel (Rebin only).
    pub weight_limit: Option<f64>,

    /// Adaptive engine tuning knobs.
    pub tuning: Option<AdaptiveTuning>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl RegridBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an execution adapter to transition to an execution builder.
    pub fn adapter<A>(self, _adapter: A) -> A::Output
    where
        A: RegridAdapter,
    {
        A::convert(self)
    }

    /// Set the interpolation or spreading scheme.
    pub fn scheme(mut self, scheme: Scheme) -> Self {
        if self.scheme.is_some() {
            self.duplicate_param = Some("scheme");
        }
        self.scheme = Some(scheme);
        self
    }

    /// Set the behavior flags.
    pub fn flags(mut self, flags: Flags) -> Self {
        if self.flags.is_some() {
            self.duplicate_param = Some("flags");
        }
        self.flags = Some(flags);
        self
    }

    /// Set the maximum approximation error, in pixels. Zero disables the
    /// adaptive linear approximation entirely.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        if self.tolerance.is_some() {
            self.duplicate_param = Some("tolerance");
        }
        self.tolerance = Some(tolerance);
        self
    }

    /// Set the maximum section extent before unconditional bisection.
    pub fn max_block(mut self, max_block: usize) -> Self {
        if self.max_block.is_some() {
            self.duplicate_param = Some("max_block");
        }
        self.max_block = Some(max_block);
        self
    }

    /// Set the minimum accumulated weight for a valid output pixel
    /// (Rebin only).
    pub fn weight_limit(mut self, weight_limit: f64) -> Self {
        if self.weight_limit.is_some() {
            self.duplicate_param = Some("weight_limit");
        }
        self.weight_limit = Some(weight_limit);
        self
    }

    /// Set the adaptive engine tuning knobs.
    pub fn tuning(mut self, tuning: AdaptiveTuning) -> Self {
        if self.tuning.is_some() {
            self.duplicate_param = Some("tuning");
        }
        self.tuning = Some(tuning);
        self
    }
}

/// Trait for transitioning from a generic builder to an execution builder.
pub trait RegridAdapter {
    /// The output execution builder.
    type Output;

    /// Convert a generic [`RegridBuilder`] into a specialized execution builder.
    fn convert(builder: RegridBuilder) -> Self::Output;
}

/// Marker for pull-mode resampling.
#[derive(Debug, Clone, Copy)]
pub struct Resample;

impl RegridAdapter for Resample {
    type Output = ResampleBuilder;

    fn convert(builder: RegridBuilder) -> Self::Output {
        let mut result = ResampleBuilder::default();

        if let Some(scheme) = builder.scheme {
            result.scheme = scheme;
        }
        if let Some(flags) = builder.flags {
            result.flags = flags;
        }
        if let Some(tolerance) = builder.tolerance {
            result.tolerance = tolerance;
        }
        if let Some(max_block) = builder.max_block {
            result.max_block = max_block;
        }
        if let Some(tuning) = builder.tuning {
            result.tuning = tuning;
        }

        result.duplicate_param = builder.duplicate_param;

        result
    }
}

/// Marker for push-mode rebinning.
#[derive(Debug, Clone, Copy)]
pub struct Rebin;

impl RegridAdapter for Rebin {
    type Output = RebinBuilder;

    fn convert(builder: RegridBuilder) -> Self::Output {
        let mut result = RebinBuilder::default();

        if let Some(scheme) = builder.scheme {
            result.scheme = scheme;
        }
        if let Some(flags) = builder.flags {
            result.flags = flags;
        }
        if let Some(tolerance) = builder.tolerance {
            result.tolerance = tolerance;
        }
        if let Some(max_block) = builder.max_block {
            result.max_block = max_block;
        }
        if let Some(weight_limit) = builder.weight_limit {
            result.weight_limit = weight_limit;
        }
        if let Some(tuning) = builder.tuning {
            result.tuning = tuning;
        }

        result.duplicate_param = builder.duplicate_param;

        result
    }
}
