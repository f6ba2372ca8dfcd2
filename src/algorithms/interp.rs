//! Pull-mode interpolation of input pixels at transformed positions.
//!
//! ## Purpose
//!
//! This module evaluates, for each output pixel of a resampling call, the
//! input grid at one real-valued position: it gathers the neighborhood
//! selected by the kernel, folds bad values and clipped neighbors out of
//! the weight sum, and narrows the result back to the grid element type.
//!
//! ## Design notes
//!
//! * **Renormalization**: weights are always normalized over the
//!   neighbors actually included, so a clipped or bad neighbor dilutes
//!   nothing; a neighborhood with zero total weight yields a bad pixel.
//! * **Validity windows**: `Linear` requires the position to lie within
//!   the span of pixel centers; `Nearest` accepts the half-open window
//!   `[lower - 0.5, upper + 0.5)`; wider kernels accept positions up to
//!   half a pixel outside the outermost centers.
//! * **Dimension specialization**: 1-D and 2-D neighborhoods are gathered
//!   with direct loops; higher ranks fall back to an odometer walk over
//!   per-axis offset and weight tables.
//! * **Block averaging**: neighbors carry unit weight, or reciprocal
//!   variance when an input variance plane is present.
//!
//! ## Invariants
//!
//! * Output pixels are written exactly once per call, bad or not.
//! * Variance outputs are bad wherever the data output is bad.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use num_traits::Float;

// Internal dependencies
use crate::math::kernel::KernelOp;
use crate::primitives::buffer::Slot;
use crate::primitives::errors::RegridError;
use crate::primitives::grid::{GridBounds, PointSet};
use crate::primitives::pixel::Pixel;

// ============================================================================
// Input View
// ============================================================================

/// Borrowed view of the input grid for one interpolation pass.
pub struct GridInput<'a, P: Pixel> {
    /// Bounds of the input grid.
    pub bounds: &'a GridBounds,
    /// Input data, first axis fastest.
    pub data: &'a [P],
    /// Input variances, when propagation is on.
    pub variance: Option<&'a [P]>,
    /// Bad-value sentinel.
    pub badval: P,
    /// Whether input values equal to the sentinel are recognized.
    pub usebad: bool,
}

impl<P: Pixel> GridInput<'_, P> {
    #[inline]
    fn is_bad(&self, value: P) -> bool {
        self.usebad && value.same(self.badval)
    }
}

// ============================================================================
// Scratch
// ============================================================================

/// Reusable per-axis neighbor tables for interpolation and spreading.
#[derive(Debug, Default)]
pub struct InterpScratch {
    pub(crate) offsets: Slot<usize>,
    pub(crate) weights: Slot<f64>,
    pub(crate) counts: Slot<usize>,
    pub(crate) digits: Slot<usize>,
    pub(crate) strides: Slot<usize>,
}

impl InterpScratch {
    pub(crate) fn prepare(&mut self, bounds: &GridBounds, max_nb: usize) {
        let ndim = bounds.naxes();
        self.offsets.fill_with(ndim * max_nb, 0);
        self.weights.fill_with(ndim * max_nb, 0.0);
        self.counts.fill_with(ndim, 0);
        self.digits.fill_with(ndim, 0);
        self.strides.clear();
        let mut stride = 1usize;
        for a in 0..ndim {
            self.strides.push(stride);
            stride *= bounds.len(a);
        }
    }
}

// ============================================================================
// Batch Interpolation
// ============================================================================

/// Interpolate the input grid at every position of `coords`, writing one
/// output pixel (and variance, when requested) per point at the matching
/// linear offset of `out_offsets`. `scale` multiplies each result for
/// flux conservation. Returns the bad-output count.
#[allow(clippy::too_many_arguments)]
pub fn resample_batch<P: Pixel>(
    kernel: &KernelOp,
    input: &GridInput<'_, P>,
    coords: &PointSet,
    out_offsets: &[usize],
    scale: f64,
    out_data: &mut [P],
    mut out_var: Option<&mut [P]>,
    scratch: &mut InterpScratch,
) -> Result<usize, RegridError> {
    let npoint = coords.npoint();
    debug_assert_eq!(out_offsets.len(), npoint);

    let max_nb = match kernel {
        KernelOp::Nearest => 1,
        KernelOp::Linear => 2,
        KernelOp::BlockAve { radius } => 2 * radius + 1,
        KernelOp::Separable(k) => 2 * k.radius(),
    };
    scratch.prepare(input.bounds, max_nb);
    let recip_var = matches!(kernel, KernelOp::BlockAve { .. }) && input.variance.is_some();

    let mut nbad = 0usize;
    for point in 0..npoint {
        let sample = interpolate_one(kernel, input, coords, point, max_nb, recip_var, scratch)?;

        let (data_out, var_out) = match sample {
            Some((value, variance)) => {
                let data = P::from_f64(value * scale);
                let var = variance.and_then(|v| P::from_f64(v * scale * scale));
                (data, var)
            }
            None => (None, None),
        };

        let slot = out_offsets[point];
        match data_out {
            Some(v) => out_data[slot] = v,
            None => {
                out_data[slot] = input.badval;
                nbad += 1;
            }
        }
        if let Some(var_plane) = out_var.as_deref_mut() {
            var_plane[slot] = match (data_out, var_out) {
                (Some(_), Some(v)) => v,
                _ => input.badval,
            };
        }
    }
    Ok(nbad)
}

/// Interpolate at one position. `None` marks a bad output pixel.
#[allow(clippy::too_many_arguments)]
fn interpolate_one<P: Pixel>(
    kernel: &KernelOp,
    input: &GridInput<'_, P>,
    coords: &PointSet,
    point: usize,
    max_nb: usize,
    recip_var: bool,
    scratch: &mut InterpScratch,
) -> Result<Option<(f64, Option<f64>)>, RegridError> {
    let ndim = input.bounds.naxes();

    // Per-axis neighbor tables. An axis with zero usable neighbors makes
    // the whole pixel bad.
    for a in 0..ndim {
        let x = coords.get(a, point);
        if !x.is_finite() {
            return Ok(None);
        }
        let lo = input.bounds.lower()[a];
        let hi = input.bounds.upper()[a];
        let stride = scratch.strides[a];

        let count = match kernel {
            KernelOp::Nearest => {
                if x < lo as f64 - 0.5 || x >= hi as f64 + 0.5 {
                    0
                } else {
                    let j = (x + 0.5).floor() as i64;
                    let j = j.clamp(lo, hi);
                    scratch.offsets[a * max_nb] = (j - lo) as usize * stride;
                    scratch.weights[a * max_nb] = 1.0;
                    1
                }
            }
            KernelOp::Linear => {
                if x < lo as f64 || x > hi as f64 {
                    0
                } else {
                    let base = (x.floor() as i64).min(hi);
                    let frac = x - base as f64;
                    let mut n = 0;
                    if 1.0 - frac > 0.0 {
                        scratch.offsets[a * max_nb] = (base - lo) as usize * stride;
                        scratch.weights[a * max_nb] = 1.0 - frac;
                        n += 1;
                    }
                    if frac > 0.0 && base + 1 <= hi {
                        scratch.offsets[a * max_nb + n] = (base + 1 - lo) as usize * stride;
                        scratch.weights[a * max_nb + n] = frac;
                        n += 1;
                    }
                    n
                }
            }
            KernelOp::BlockAve { radius } => {
                if x < lo as f64 - 0.5 || x > hi as f64 + 0.5 {
                    0
                } else {
                    let center = ((x + 0.5).floor() as i64).clamp(lo, hi);
                    let r = *radius as i64;
                    let mut n = 0;
                    for j in (center - r).max(lo)..=(center + r).min(hi) {
                        scratch.offsets[a * max_nb + n] = (j - lo) as usize * stride;
                        scratch.weights[a * max_nb + n] = 1.0;
                        n += 1;
                    }
                    n
                }
            }
            KernelOp::Separable(sep) => {
                if x < lo as f64 - 0.5 || x > hi as f64 + 0.5 {
                    0
                } else {
                    let radius = sep.radius() as i64;
                    let first = x.floor() as i64 - radius + 1;
                    let mut n = 0;
                    for j in first..first + 2 * radius {
                        if j < lo || j > hi {
                            continue;
                        }
                        let w = sep.weight(x - j as f64)?;
                        scratch.offsets[a * max_nb + n] = (j - lo) as usize * stride;
                        scratch.weights[a * max_nb + n] = w;
                        n += 1;
                    }
                    n
                }
            }
        };
        if count == 0 {
            return Ok(None);
        }
        scratch.counts[a] = count;
        scratch.digits[a] = 0;
    }

    let sums = match ndim {
        1 => gather_1d(input, recip_var, scratch),
        2 => gather_2d(input, recip_var, max_nb, scratch),
        _ => gather_nd(input, recip_var, max_nb, ndim, scratch),
    };

    if sums.w == 0.0 || !sums.w.is_finite() {
        return Ok(None);
    }
    let value = sums.wd / sums.w;
    let variance = input.variance.map(|_| sums.w2v / (sums.w * sums.w));
    Ok(Some((value, variance)))
}

// ============================================================================
// Neighborhood Gathering
// ============================================================================

/// Running sums over the usable neighbors of one position.
#[derive(Default)]
struct NeighborSums {
    w: f64,
    wd: f64,
    w2v: f64,
}

impl NeighborSums {
    /// Fold one neighbor in. Bad values, unusable variances, and (under
    /// reciprocal-variance weighting) nonpositive variances contribute
    /// nothing.
    #[inline]
    fn add<P: Pixel>(
        &mut self,
        input: &GridInput<'_, P>,
        offset: usize,
        weight: f64,
        recip_var: bool,
    ) {
        let value = input.data[offset];
        if input.is_bad(value) {
            return;
        }
        let mut var = 0.0;
        if let Some(variance) = input.variance {
            let v = variance[offset];
            if input.is_bad(v) {
                return;
            }
            var = v.to_f64();
            if !(var >= 0.0) {
                return;
            }
        }
        let weight = if recip_var {
            if var > 0.0 {
                weight / var
            } else {
                return;
            }
        } else {
            weight
        };
        self.w += weight;
        self.wd += weight * value.to_f64();
        self.w2v += weight * weight * var;
    }
}

fn gather_1d<P: Pixel>(
    input: &GridInput<'_, P>,
    recip_var: bool,
    scratch: &InterpScratch,
) -> NeighborSums {
    let mut sums = NeighborSums::default();
    for i in 0..scratch.counts[0] {
        sums.add(input, scratch.offsets[i], scratch.weights[i], recip_var);
    }
    sums
}

fn gather_2d<P: Pixel>(
    input: &GridInput<'_, P>,
    recip_var: bool,
    max_nb: usize,
    scratch: &InterpScratch,
) -> NeighborSums {
    let mut sums = NeighborSums::default();
    for j in 0..scratch.counts[1] {
        let row_offset = scratch.offsets[max_nb + j];
        let row_weight = scratch.weights[max_nb + j];
        for i in 0..scratch.counts[0] {
            sums.add(
                input,
                row_offset + scratch.offsets[i],
                row_weight * scratch.weights[i],
                recip_var,
            );
        }
    }
    sums
}

fn gather_nd<P: Pixel>(
    input: &GridInput<'_, P>,
    recip_var: bool,
    max_nb: usize,
    ndim: usize,
    scratch: &mut InterpScratch,
) -> NeighborSums {
    let mut sums = NeighborSums::default();
    loop {
        let mut offset = 0usize;
        let mut weight = 1.0;
        for a in 0..ndim {
            let slot = a * max_nb + scratch.digits[a];
            offset += scratch.offsets[slot];
            weight *= scratch.weights[slot];
        }
        sums.add(input, offset, weight, recip_var);

        // Advance the odometer, first axis fastest.
        let mut axis = 0;
        loop {
            if axis == ndim {
                break;
            }
            scratch.digits[axis] += 1;
            if scratch.digits[axis] < scratch.counts[axis] {
                break;
            }
            scratch.digits[axis] = 0;
            axis += 1;
        }
        if axis == ndim {
            break;
        }
    }
    sums
}
