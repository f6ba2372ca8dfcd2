//! Single-shot push-mode execution adapter.
//!
//! This module provides `RebinProcessor`, the one-call execution mode for
//! push-mode rebinning: one input grid is spread into a fresh output grid
//! and normalized immediately. It is the degenerate sequence of exactly
//! one accumulation.

// Internal dependencies
use crate::adapters::sequence::{RebinOutput, RebinSequence};
use crate::engine::subdivide::AdaptiveTuning;
use crate::engine::validator::Validator;
use crate::math::kernel::{KernelOp, Scheme};
use crate::primitives::errors::RegridError;
use crate::primitives::flags::Flags;
use crate::primitives::grid::{Grid, GridBounds};
use crate::primitives::mapping::Mapping;
use crate::primitives::pixel::Pixel;

// ============================================================================
// Builder
// ============================================================================

/// Execution builder for push-mode rebinning. Obtained from the generic
/// `Regrid` builder via `.adapter(Rebin)`.
#[derive(Debug, Clone)]
pub struct RebinBuilder {
    /// Spreading scheme.
    pub scheme: Scheme,

    /// Behavior flags.
    pub flags: Flags,

    /// Maximum approximation error, in pixels.
    pub tolerance: f64,

    /// Maximum section extent before unconditional bisection.
    pub max_block: usize,

    /// Minimum accumulated weight for a valid output pixel.
    pub weight_limit: f64,

    /// Adaptive engine tuning.
    pub tuning: AdaptiveTuning,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl Default for RebinBuilder {
    fn default() -> Self {
        Self {
            scheme: Scheme::Linear,
            flags: Flags::NONE,
            tolerance: 0.0,
            max_block: 4096,
            weight_limit: 1e-10,
            tuning: AdaptiveTuning::default(),
            duplicate_param: None,
        }
    }
}

impl RebinBuilder {
    /// Validate the configuration and build the processor.
    pub fn build(self) -> Result<RebinProcessor, RegridError> {
        if let Some(parameter) = self.duplicate_param {
            return Err(RegridError::DuplicateParameter { parameter });
        }
        Validator::validate_tolerance(self.tolerance)?;
        Validator::validate_max_block(self.max_block)?;
        Validator::validate_weight_limit(self.weight_limit)?;
        let kernel = Validator::resolve_scheme(&self.scheme, "rebin")?;
        Ok(RebinProcessor::new(
            kernel,
            self.flags,
            self.tolerance,
            self.max_block,
            self.weight_limit,
            self.tuning,
        ))
    }
}

// ============================================================================
// Processor
// ============================================================================

/// Configured push-mode processor. Built through the `Regrid` builder;
/// one processor may run any number of times over any element type.
#[derive(Debug, Clone)]
pub struct RebinProcessor {
    kernel: KernelOp,
    flags: Flags,
    tol: f64,
    max_block: usize,
    weight_limit: f64,
    tuning: AdaptiveTuning,
}

impl RebinProcessor {
    pub(crate) fn new(
        kernel: KernelOp,
        flags: Flags,
        tol: f64,
        max_block: usize,
        weight_limit: f64,
        tuning: AdaptiveTuning,
    ) -> Self {
        Self {
            kernel,
            flags,
            tol,
            max_block,
            weight_limit,
            tuning,
        }
    }

    /// Rebin `input` into a new output grid shaped by `out_bounds`.
    /// `section` restricts which input pixels are spread; `None` spreads
    /// the whole grid. The mapping's forward transform carries input
    /// positions into the output space.
    pub fn run<P: Pixel>(
        &self,
        mapping: &dyn Mapping,
        input: &Grid<P>,
        badval: P,
        out_bounds: &GridBounds,
        section: Option<&GridBounds>,
    ) -> Result<RebinOutput<P>, RegridError> {
        let mut seq = self.begin_sequence(out_bounds.clone(), badval);
        seq.accumulate(mapping, input, section)?;
        Ok(seq.finalize())
    }

    /// Start a sequential accumulation into `out_bounds`. Behavior flags
    /// are taken from this processor; per-call lifecycle flags go to
    /// `RebinSequence::process`.
    pub fn begin_sequence<P: Pixel>(
        &self,
        out_bounds: GridBounds,
        badval: P,
    ) -> RebinSequence<P> {
        RebinSequence::new(
            self.kernel.clone(),
            self.flags,
            self.tol,
            self.max_block,
            self.weight_limit,
            self.tuning.clone(),
            out_bounds,
            badval,
        )
    }
}
