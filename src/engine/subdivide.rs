//! Adaptive recursive subdivision of the iterated grid.
//!
//! ## Purpose
//!
//! This module decides, section by section, whether the real coordinate
//! transform can be replaced by a linear approximation within the error
//! tolerance. Sections that pass validation are processed through the
//! cheap fit; sections that fail are bisected along their widest axis and
//! the halves reconsidered; sections too small to be worth fitting are
//! processed directly through the real transform.
//!
//! ## Design notes
//!
//! * **Validation before trust**: a candidate fit is accepted only when
//!   every test position agrees with the real transform to within the
//!   tolerance, measured as Euclidean distance in the transformed space.
//! * **Non-finite rejects**: a transform producing non-finite values
//!   anywhere in the sample or test set fails validation; subdivision
//!   narrows in until the affected pixels are handled directly.
//! * **Extent cap**: sections wider than `max_block` on any axis are
//!   bisected unconditionally, bounding the region any one fit covers.
//!
//! ## Invariants
//!
//! * Every pixel of the root section is processed exactly once.
//! * A zero tolerance never applies a fit.

// Internal dependencies
use crate::engine::blocks::TILE_PIXELS;
use crate::engine::section::SectionOp;
use crate::engine::workspace::RegridWorkspace;
use crate::math::linfit::{face_centers, test_points, LinearFit};
use crate::primitives::errors::RegridError;
use crate::primitives::grid::GridBounds;

// ============================================================================
// Tuning
// ============================================================================

/// Performance knobs of the adaptive engine. The defaults are
/// correctness-neutral; tuning trades fit overhead against transform
/// calls.
#[derive(Debug, Clone)]
pub struct AdaptiveTuning {
    /// Target number of pixels per tile.
    pub tile_pixels: usize,
    /// Sections smaller than this multiple of the fit's own sample count
    /// go straight to direct evaluation.
    pub fit_factor: usize,
}

impl Default for AdaptiveTuning {
    fn default() -> Self {
        Self {
            tile_pixels: TILE_PIXELS,
            fit_factor: 4,
        }
    }
}

impl AdaptiveTuning {
    /// Smallest section worth attempting a fit on.
    fn min_fit_pixels(&self, ndim: usize) -> usize {
        self.fit_factor * (1 + 4 * ndim + (2 << ndim))
    }
}

// ============================================================================
// Adaptive Processing
// ============================================================================

/// Process a root section adaptively: linear fits where provably accurate
/// within `tol`, direct transformation elsewhere.
pub fn process_adaptively(
    op: &mut dyn SectionOp,
    section: &GridBounds,
    tol: f64,
    max_block: usize,
    tuning: &AdaptiveTuning,
    ws: &mut RegridWorkspace,
) -> Result<(), RegridError> {
    if tol == 0.0 {
        return op.apply_direct(section, ws);
    }
    subdivide(op, section, tol, max_block, tuning, ws)
}

fn subdivide(
    op: &mut dyn SectionOp,
    section: &GridBounds,
    tol: f64,
    max_block: usize,
    tuning: &AdaptiveTuning,
    ws: &mut RegridWorkspace,
) -> Result<(), RegridError> {
    let ndim = section.naxes();
    if section.npix() < tuning.min_fit_pixels(ndim) {
        return op.apply_direct(section, ws);
    }

    let widest = section.widest_axis();
    let can_bisect = section.len(widest) > 1;

    if section.max_extent() > max_block && can_bisect {
        return bisect_into(op, section, widest, tol, max_block, tuning, ws);
    }

    if let Some(fit) = try_fit(op, section, tol, ws)? {
        return op.apply_fit(section, &fit, ws);
    }

    if can_bisect {
        bisect_into(op, section, widest, tol, max_block, tuning, ws)
    } else {
        op.apply_direct(section, ws)
    }
}

#[allow(clippy::too_many_arguments)]
fn bisect_into(
    op: &mut dyn SectionOp,
    section: &GridBounds,
    axis: usize,
    tol: f64,
    max_block: usize,
    tuning: &AdaptiveTuning,
    ws: &mut RegridWorkspace,
) -> Result<(), RegridError> {
    let (first, second) = section.bisect(axis);
    subdivide(op, &first, tol, max_block, tuning, ws)?;
    if let Some(second) = second {
        subdivide(op, &second, tol, max_block, tuning, ws)?;
    }
    Ok(())
}

/// Derive and validate a linear fit over a section. `None` when the fit
/// cannot be derived or any test position misses by more than `tol`.
fn try_fit(
    op: &dyn SectionOp,
    section: &GridBounds,
    tol: f64,
    ws: &mut RegridWorkspace,
) -> Result<Option<LinearFit>, RegridError> {
    let samples = face_centers(section);
    op.transform_batch(&samples, &mut ws.fit_images)?;

    let fit = match LinearFit::from_face_samples(section, &ws.fit_images) {
        Some(fit) => fit,
        None => return Ok(None),
    };

    let tests = test_points(section);
    op.transform_batch(&tests, &mut ws.test_images)?;
    fit.apply_batch(&tests, &mut ws.mapped_points);

    let ncoord = op.coord_rank();
    let tol2 = tol * tol;
    for point in 0..tests.npoint() {
        let mut dist2 = 0.0;
        for j in 0..ncoord {
            let actual = ws.test_images.get(j, point);
            let approx = ws.mapped_points.get(j, point);
            if !actual.is_finite() || !approx.is_finite() {
                return Ok(None);
            }
            let delta = actual - approx;
            dist2 += delta * delta;
        }
        if dist2 > tol2 {
            return Ok(None);
        }
    }
    Ok(Some(fit))
}
