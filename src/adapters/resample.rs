//! Pull-mode execution adapter.
//!
//! ## Purpose
//!
//! This module provides `ResampleProcessor`, the single-call execution
//! mode for pull-mode resampling: every pixel of a requested output
//! section is filled by interpolating the input grid at its
//! inverse-transformed position.
//!
//! ## Key concepts
//!
//! * **Section**: the caller may restrict the call to a sub-box of the
//!   output; pixels outside it are left at the bad value.
//! * **Bad-pixel count**: soft per-pixel failures (unmappable positions,
//!   bad neighborhoods, unrepresentable results) produce bad pixels and
//!   a count, never errors.

// Internal dependencies
use crate::algorithms::interp::GridInput;
use crate::engine::section::ResampleOp;
use crate::engine::subdivide::{process_adaptively, AdaptiveTuning};
use crate::engine::validator::Validator;
use crate::engine::workspace::RegridWorkspace;
use crate::math::kernel::{KernelOp, Scheme};
use crate::primitives::errors::RegridError;
use crate::primitives::flags::Flags;
use crate::primitives::grid::{Grid, GridBounds};
use crate::primitives::mapping::Mapping;
use crate::primitives::pixel::Pixel;

// ============================================================================
// Builder
// ============================================================================

/// Execution builder for pull-mode resampling. Obtained from the generic
/// `Regrid` builder via `.adapter(Resample)`.
#[derive(Debug, Clone)]
pub struct ResampleBuilder {
    /// Interpolation scheme.
    pub scheme: Scheme,

    /// Behavior flags.
    pub flags: Flags,

    /// Maximum approximation error, in pixels.
    pub tolerance: f64,

    /// Maximum section extent before unconditional bisection.
    pub max_block: usize,

    /// Adaptive engine tuning.
    pub tuning: AdaptiveTuning,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl Default for ResampleBuilder {
    fn default() -> Self {
        Self {
            scheme: Scheme::Linear,
            flags: Flags::NONE,
            tolerance: 0.0,
            max_block: 4096,
            tuning: AdaptiveTuning::default(),
            duplicate_param: None,
        }
    }
}

impl ResampleBuilder {
    /// Validate the configuration and build the processor.
    pub fn build(self) -> Result<ResampleProcessor, RegridError> {
        if let Some(parameter) = self.duplicate_param {
            return Err(RegridError::DuplicateParameter { parameter });
        }
        Validator::validate_tolerance(self.tolerance)?;
        Validator::validate_max_block(self.max_block)?;
        let kernel = Validator::resolve_scheme(&self.scheme, "resample")?;
        Ok(ResampleProcessor::new(
            kernel,
            self.flags,
            self.tolerance,
            self.max_block,
            self.tuning,
        ))
    }
}

// ============================================================================
// Output
// ============================================================================

/// Result of one resampling call.
#[derive(Debug, Clone)]
pub struct ResampleOutput<P: Pixel> {
    /// The output grid; pixels outside the requested section hold the
    /// bad value.
    pub grid: Grid<P>,
    /// Number of bad pixels written within the requested section.
    pub nbad: usize,
}

// ============================================================================
// Processor
// ============================================================================

/// Configured pull-mode processor. Built through the `Regrid` builder;
/// one processor may run any number of times over any element type.
#[derive(Debug, Clone)]
pub struct ResampleProcessor {
    kernel: KernelOp,
    flags: Flags,
    tol: f64,
    max_block: usize,
    tuning: AdaptiveTuning,
}

impl ResampleProcessor {
    pub(crate) fn new(
        kernel: KernelOp,
        flags: Flags,
        tol: f64,
        max_block: usize,
        tuning: AdaptiveTuning,
    ) -> Self {
        Self {
            kernel,
            flags,
            tol,
            max_block,
            tuning,
        }
    }

    /// Resample `input` onto a new output grid shaped by `out_bounds`.
    /// `section` restricts the pixels actually computed; `None` computes
    /// the whole output. The mapping's inverse transform carries output
    /// positions into the input space.
    pub fn run<P: Pixel>(
        &self,
        mapping: &dyn Mapping,
        input: &Grid<P>,
        badval: P,
        out_bounds: &GridBounds,
        section: Option<&GridBounds>,
    ) -> Result<ResampleOutput<P>, RegridError> {
        Validator::validate_resample_ranks(mapping, input.bounds(), out_bounds)?;
        let section = section.unwrap_or(out_bounds);
        Validator::validate_section(out_bounds, section)?;
        Validator::validate_resample_flags(self.flags, input.variance().is_some())?;
        Validator::validate_conserve_flux(self.flags, self.tol, mapping)?;

        let usevar = self.flags.contains(Flags::USEVAR);
        let mut grid = Grid::filled(out_bounds.clone(), badval, usevar);
        let (out_data, out_var) = grid.planes_mut();

        let ginput = GridInput {
            bounds: input.bounds(),
            data: input.data(),
            variance: if usevar { input.variance() } else { None },
            badval,
            usebad: self.flags.contains(Flags::USEBAD),
        };

        let mut op = ResampleOp::new(
            mapping,
            &self.kernel,
            ginput,
            out_bounds,
            out_data,
            out_var,
            self.flags.contains(Flags::CONSERVEFLUX),
            self.tuning.tile_pixels,
        );
        let mut ws = RegridWorkspace::new();
        process_adaptively(&mut op, section, self.tol, self.max_block, &self.tuning, &mut ws)?;
        let nbad = op.nbad();

        Ok(ResampleOutput { grid, nbad })
    }
}
