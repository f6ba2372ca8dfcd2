//! Sequential push-mode execution adapter.
//!
//! ## Purpose
//!
//! This module provides `RebinSequence`, the incremental execution mode
//! for push-mode rebinning: a sequence of input grids, each with its own
//! mapping and section, accumulates into one set of output planes that is
//! normalized exactly once at the end. This is how separate observations
//! of the same sky region combine into one mosaic.
//!
//! ## Key concepts
//!
//! * **Lifecycle flags**: `REBININIT` zeroes the accumulator before a
//!   call's deposits; `REBINEND` normalizes after them and yields the
//!   output. A lone call carrying both flags is a single-shot rebin.
//! * **Persistent behavior**: bad-value handling, variance modes, and
//!   flux conservation are fixed when the sequence is created; per-call
//!   flags only steer the lifecycle.
//!
//! ## Invariants
//!
//! * The accumulator configuration never changes between `REBININIT` and
//!   `REBINEND`.
//! * `process` without `REBINEND` returns `None` and keeps accumulating.

// Internal dependencies
use crate::algorithms::accumulate::AccumulatorState;
use crate::algorithms::interp::GridInput;
use crate::engine::section::RebinOp;
use crate::engine::subdivide::{process_adaptively, AdaptiveTuning};
use crate::engine::validator::Validator;
use crate::engine::workspace::RegridWorkspace;
use crate::math::kernel::KernelOp;
use crate::primitives::errors::RegridError;
use crate::primitives::flags::Flags;
use crate::primitives::grid::{Grid, GridBounds};
use crate::primitives::mapping::Mapping;
use crate::primitives::pixel::Pixel;

// ============================================================================
// Output
// ============================================================================

/// Result of a finished rebinning accumulation.
#[derive(Debug, Clone)]
pub struct RebinOutput<P: Pixel> {
    /// The normalized output grid.
    pub grid: Grid<P>,
    /// Number of input pixels that contributed to the accumulation.
    pub nused: u64,
    /// Number of input pixels skipped (bad, unusable variance, or
    /// landing outside the output).
    pub nskip: usize,
    /// Number of bad output pixels after normalization.
    pub nbad: usize,
}

// ============================================================================
// Sequence
// ============================================================================

/// An in-progress rebinning accumulation over one output box.
pub struct RebinSequence<P: Pixel> {
    kernel: KernelOp,
    flags: Flags,
    tol: f64,
    max_block: usize,
    weight_limit: f64,
    tuning: AdaptiveTuning,
    out_bounds: GridBounds,
    badval: P,
    acc: AccumulatorState,
    nskip: usize,
    ws: RegridWorkspace,
}

impl<P: Pixel> RebinSequence<P> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        kernel: KernelOp,
        flags: Flags,
        tol: f64,
        max_block: usize,
        weight_limit: f64,
        tuning: AdaptiveTuning,
        out_bounds: GridBounds,
        badval: P,
    ) -> Self {
        let acc = AccumulatorState::new(
            out_bounds.clone(),
            flags.contains(Flags::USEVAR),
            flags.contains(Flags::GENVAR),
        );
        Self {
            kernel,
            flags,
            tol,
            max_block,
            weight_limit,
            tuning,
            out_bounds,
            badval,
            acc,
            nskip: 0,
            ws: RegridWorkspace::new(),
        }
    }

    /// Output box the sequence accumulates into.
    #[inline]
    pub fn out_bounds(&self) -> &GridBounds {
        &self.out_bounds
    }

    /// The accumulation planes, for inspection between calls.
    #[inline]
    pub fn accumulator(&self) -> &AccumulatorState {
        &self.acc
    }

    /// Deposit one input grid. `section` restricts which input pixels are
    /// spread; `None` spreads the whole grid. Of `step`, only the
    /// lifecycle flags are honored: `REBININIT` zeroes the accumulator
    /// first, `REBINEND` normalizes afterwards and yields the output.
    pub fn process(
        &mut self,
        mapping: &dyn Mapping,
        input: &Grid<P>,
        section: Option<&GridBounds>,
        step: Flags,
    ) -> Result<Option<RebinOutput<P>>, RegridError> {
        if step.contains(Flags::REBININIT) {
            self.acc.clear();
            self.nskip = 0;
        }
        self.accumulate(mapping, input, section)?;
        if step.contains(Flags::REBINEND) {
            Ok(Some(self.finalize()))
        } else {
            Ok(None)
        }
    }

    /// Deposit one input grid without touching the lifecycle.
    pub(crate) fn accumulate(
        &mut self,
        mapping: &dyn Mapping,
        input: &Grid<P>,
        section: Option<&GridBounds>,
    ) -> Result<(), RegridError> {
        Validator::validate_rebin_ranks(mapping, input.bounds(), &self.out_bounds)?;
        let section = section.unwrap_or_else(|| input.bounds());
        Validator::validate_section(input.bounds(), section)?;
        Validator::validate_rebin_flags(self.flags, input.variance().is_some())?;
        Validator::validate_conserve_flux(self.flags, self.tol, mapping)?;

        let usevar = self.flags.contains(Flags::USEVAR);
        let varwgt = self.flags.contains(Flags::VARWGT);
        let ginput = GridInput {
            bounds: input.bounds(),
            data: input.data(),
            variance: if usevar || varwgt {
                input.variance()
            } else {
                None
            },
            badval: self.badval,
            usebad: self.flags.contains(Flags::USEBAD),
        };

        let mut op = RebinOp::new(
            mapping,
            &self.kernel,
            ginput,
            &mut self.acc,
            varwgt,
            self.flags.contains(Flags::CONSERVEFLUX),
            self.tuning.tile_pixels,
        );
        process_adaptively(
            &mut op,
            section,
            self.tol,
            self.max_block,
            &self.tuning,
            &mut self.ws,
        )?;
        self.nskip += op.nskip();
        Ok(())
    }

    /// Normalize the accumulation into an output grid.
    pub(crate) fn finalize(&self) -> RebinOutput<P> {
        let with_variance = self.acc.propagates_variance() || self.acc.generates_variance();
        let mut grid = Grid::filled(self.out_bounds.clone(), self.badval, with_variance);
        let (out_data, out_var) = grid.planes_mut();
        let nbad = self
            .acc
            .finalize(self.weight_limit, self.badval, out_data, out_var);
        RebinOutput {
            grid,
            nused: self.acc.nused(),
            nskip: self.nskip,
            nbad,
        }
    }
}
