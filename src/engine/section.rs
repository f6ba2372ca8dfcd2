//! Direction drivers applying one section of work.
//!
//! ## Purpose
//!
//! This module defines `SectionOp`, the seam between the adaptive
//! subdivision logic and the two data-movement directions, and its
//! implementations: `ResampleOp` (pull-mode, output sections iterated and
//! inverse-transformed) and `RebinOp` (push-mode, input sections iterated
//! and forward-transformed).
//!
//! ## Design notes
//!
//! * **Tiling inside**: a driver receives whole accepted sections and
//!   cuts them into tiles itself, so the subdivision logic never sees
//!   buffers or batch sizes.
//! * **One fit, one scale**: flux conservation derives a single scale
//!   factor per section from the accepted fit's gradient determinant; the
//!   direct path derives it from a local unvalidated fit.
//!
//! ## Invariants
//!
//! * `ResampleOp` writes every pixel of every section it is given.
//! * `RebinOp` deposits only into the accumulator, never into grids.

// Internal dependencies
use crate::algorithms::accumulate::AccumulatorState;
use crate::algorithms::interp::{resample_batch, GridInput};
use crate::algorithms::spread::rebin_batch;
use crate::engine::blocks::{fill_tile_points, BlockIter};
use crate::engine::workspace::RegridWorkspace;
use crate::math::kernel::KernelOp;
use crate::math::linfit::{face_centers, LinearFit};
use crate::primitives::errors::RegridError;
use crate::primitives::grid::{GridBounds, PointSet};
use crate::primitives::mapping::Mapping;
use crate::primitives::pixel::Pixel;

// ============================================================================
// Section Operation Trait
// ============================================================================

/// One direction of the engine, as seen by the subdivision logic.
pub trait SectionOp {
    /// Rank of the transformed coordinate space.
    fn coord_rank(&self) -> usize;

    /// Transform a batch of iterated-space positions through the real
    /// mapping, in this direction.
    fn transform_batch(&self, points: &PointSet, out: &mut PointSet)
        -> Result<(), RegridError>;

    /// Apply the operation over a section using the real mapping.
    fn apply_direct(
        &mut self,
        section: &GridBounds,
        ws: &mut RegridWorkspace,
    ) -> Result<(), RegridError>;

    /// Apply the operation over a section using an accepted linear fit in
    /// place of the mapping.
    fn apply_fit(
        &mut self,
        section: &GridBounds,
        fit: &LinearFit,
        ws: &mut RegridWorkspace,
    ) -> Result<(), RegridError>;
}

// ============================================================================
// Resample Driver
// ============================================================================

/// Pull-mode driver: iterates output sections, inverse-transforms pixel
/// positions into the input space, and interpolates.
pub struct ResampleOp<'a, P: Pixel> {
    mapping: &'a dyn Mapping,
    kernel: &'a KernelOp,
    input: GridInput<'a, P>,
    out_bounds: &'a GridBounds,
    out_data: &'a mut [P],
    out_var: Option<&'a mut [P]>,
    conserve: bool,
    tile_pixels: usize,
    nbad: usize,
}

impl<'a, P: Pixel> ResampleOp<'a, P> {
    /// Assemble a driver over borrowed input and output buffers.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mapping: &'a dyn Mapping,
        kernel: &'a KernelOp,
        input: GridInput<'a, P>,
        out_bounds: &'a GridBounds,
        out_data: &'a mut [P],
        out_var: Option<&'a mut [P]>,
        conserve: bool,
        tile_pixels: usize,
    ) -> Self {
        Self {
            mapping,
            kernel,
            input,
            out_bounds,
            out_data,
            out_var,
            conserve,
            tile_pixels,
            nbad: 0,
        }
    }

    /// Bad output pixels written so far.
    #[inline]
    pub fn nbad(&self) -> usize {
        self.nbad
    }

    fn flux_scale(&self, fit: Option<&LinearFit>) -> f64 {
        if !self.conserve {
            return 1.0;
        }
        match fit.and_then(LinearFit::det) {
            Some(det) if det.is_finite() => det.abs(),
            _ => 1.0,
        }
    }

    fn run_tiles(
        &mut self,
        section: &GridBounds,
        fit: Option<&LinearFit>,
        scale: f64,
        ws: &mut RegridWorkspace,
    ) -> Result<(), RegridError> {
        for tile in BlockIter::new(section.clone(), self.tile_pixels) {
            fill_tile_points(&tile, self.out_bounds, &mut ws.grid_points, &mut ws.offsets);
            match fit {
                Some(fit) => fit.apply_batch(&ws.grid_points, &mut ws.mapped_points),
                None => {
                    self.mapping
                        .transform(&ws.grid_points, false, &mut ws.mapped_points)?
                }
            }
            self.nbad += resample_batch(
                self.kernel,
                &self.input,
                &ws.mapped_points,
                &ws.offsets,
                scale,
                self.out_data,
                self.out_var.as_deref_mut(),
                &mut ws.scratch,
            )?;
        }
        Ok(())
    }
}

impl<P: Pixel> SectionOp for ResampleOp<'_, P> {
    fn coord_rank(&self) -> usize {
        self.mapping.input_rank()
    }

    fn transform_batch(
        &self,
        points: &PointSet,
        out: &mut PointSet,
    ) -> Result<(), RegridError> {
        self.mapping.transform(points, false, out)
    }

    fn apply_direct(
        &mut self,
        section: &GridBounds,
        ws: &mut RegridWorkspace,
    ) -> Result<(), RegridError> {
        let scale = if self.conserve {
            let samples = face_centers(section);
            self.mapping
                .transform(&samples, false, &mut ws.fit_images)?;
            self.flux_scale(LinearFit::from_face_samples(section, &ws.fit_images).as_ref())
        } else {
            1.0
        };
        self.run_tiles(section, None, scale, ws)
    }

    fn apply_fit(
        &mut self,
        section: &GridBounds,
        fit: &LinearFit,
        ws: &mut RegridWorkspace,
    ) -> Result<(), RegridError> {
        let scale = self.flux_scale(Some(fit));
        self.run_tiles(section, Some(fit), scale, ws)
    }
}

// ============================================================================
// Rebin Driver
// ============================================================================

/// Push-mode driver: iterates input sections, forward-transforms pixel
/// positions into the output space, and spreads into the accumulator.
pub struct RebinOp<'a, P: Pixel> {
    mapping: &'a dyn Mapping,
    kernel: &'a KernelOp,
    input: GridInput<'a, P>,
    acc: &'a mut AccumulatorState,
    varwgt: bool,
    conserve: bool,
    tile_pixels: usize,
    nskip: usize,
}

impl<'a, P: Pixel> RebinOp<'a, P> {
    /// Assemble a driver over a borrowed input grid and accumulator.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mapping: &'a dyn Mapping,
        kernel: &'a KernelOp,
        input: GridInput<'a, P>,
        acc: &'a mut AccumulatorState,
        varwgt: bool,
        conserve: bool,
        tile_pixels: usize,
    ) -> Self {
        Self {
            mapping,
            kernel,
            input,
            acc,
            varwgt,
            conserve,
            tile_pixels,
            nskip: 0,
        }
    }

    /// Input pixels skipped so far.
    #[inline]
    pub fn nskip(&self) -> usize {
        self.nskip
    }

    /// Reciprocal volume-ratio scale for a section; `None` means the
    /// local transform is degenerate and the section deposits nothing.
    fn flux_scale(&self, fit: Option<&LinearFit>) -> Option<f64> {
        if !self.conserve {
            return Some(1.0);
        }
        match fit.and_then(LinearFit::det) {
            Some(det) if det.is_finite() && det.abs() > 0.0 => Some(1.0 / det.abs()),
            Some(_) => None,
            None => Some(1.0),
        }
    }

    fn run_tiles(
        &mut self,
        section: &GridBounds,
        fit: Option<&LinearFit>,
        scale: f64,
        ws: &mut RegridWorkspace,
    ) -> Result<(), RegridError> {
        let in_bounds = self.input.bounds;
        for tile in BlockIter::new(section.clone(), self.tile_pixels) {
            fill_tile_points(&tile, in_bounds, &mut ws.grid_points, &mut ws.offsets);
            match fit {
                Some(fit) => fit.apply_batch(&ws.grid_points, &mut ws.mapped_points),
                None => {
                    self.mapping
                        .transform(&ws.grid_points, true, &mut ws.mapped_points)?
                }
            }
            self.nskip += rebin_batch(
                self.kernel,
                &self.input,
                self.varwgt,
                &ws.offsets,
                &ws.mapped_points,
                scale,
                self.acc,
                &mut ws.scratch,
            )?;
        }
        Ok(())
    }
}

impl<P: Pixel> SectionOp for RebinOp<'_, P> {
    fn coord_rank(&self) -> usize {
        self.mapping.output_rank()
    }

    fn transform_batch(
        &self,
        points: &PointSet,
        out: &mut PointSet,
    ) -> Result<(), RegridError> {
        self.mapping.transform(points, true, out)
    }

    fn apply_direct(
        &mut self,
        section: &GridBounds,
        ws: &mut RegridWorkspace,
    ) -> Result<(), RegridError> {
        let scale = if self.conserve {
            let samples = face_centers(section);
            self.mapping
                .transform(&samples, true, &mut ws.fit_images)?;
            self.flux_scale(LinearFit::from_face_samples(section, &ws.fit_images).as_ref())
        } else {
            Some(1.0)
        };
        match scale {
            Some(scale) => self.run_tiles(section, None, scale, ws),
            None => {
                self.nskip += section.npix();
                Ok(())
            }
        }
    }

    fn apply_fit(
        &mut self,
        section: &GridBounds,
        fit: &LinearFit,
        ws: &mut RegridWorkspace,
    ) -> Result<(), RegridError> {
        match self.flux_scale(Some(fit)) {
            Some(scale) => self.run_tiles(section, Some(fit), scale, ws),
            None => {
                self.nskip += section.npix();
                Ok(())
            }
        }
    }
}
