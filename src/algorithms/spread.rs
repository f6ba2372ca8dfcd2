//! Push-mode spreading of input pixels into accumulation planes.
//!
//! ## Purpose
//!
//! This module implements the rebinning direction of the engine: each
//! input pixel is carried to its transformed position in the output space
//! and its value is divided over the neighboring output pixels according
//! to the kernel, accumulating weighted sums for later normalization.
//!
//! ## Design notes
//!
//! * **Unclipped normalization**: per-axis weights are normalized by the
//!   kernel sum over the full footprint before clipping, so a pixel whose
//!   footprint crosses the output edge deposits only the surviving part
//!   of its flux rather than inflating the interior neighbors.
//! * **Soft skips**: an input pixel that is bad, carries an unusable
//!   variance under reciprocal-variance weighting, or lands outside the
//!   output box is skipped and counted, never an error.
//! * **Dimension specialization**: 1-D and 2-D footprints are deposited
//!   with direct loops; higher ranks fall back to an odometer walk over
//!   per-axis offset and weight tables.
//!
//! ## Invariants
//!
//! * Every deposit lands inside the accumulator bounds.
//! * A skipped input pixel deposits nothing at all.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use num_traits::Float;

// Internal dependencies
use crate::algorithms::accumulate::AccumulatorState;
use crate::algorithms::interp::{GridInput, InterpScratch};
use crate::math::kernel::KernelOp;
use crate::primitives::errors::RegridError;
use crate::primitives::grid::PointSet;
use crate::primitives::pixel::Pixel;

// ============================================================================
// Batch Spreading
// ============================================================================

/// Spread a batch of input pixels into the accumulator. `in_offsets`
/// gives the linear offset of each point's pixel in the input buffers,
/// parallel to `coords` (positions in output-space). `scale` multiplies
/// each value for flux conservation. Returns the number of input pixels
/// skipped.
#[allow(clippy::too_many_arguments)]
pub fn rebin_batch<P: Pixel>(
    kernel: &KernelOp,
    input: &GridInput<'_, P>,
    varwgt: bool,
    in_offsets: &[usize],
    coords: &PointSet,
    scale: f64,
    acc: &mut AccumulatorState,
    scratch: &mut InterpScratch,
) -> Result<usize, RegridError> {
    let out_bounds = acc.bounds().clone();
    let ndim = out_bounds.naxes();
    let npoint = coords.npoint();
    debug_assert_eq!(in_offsets.len(), npoint);

    let max_nb = match kernel {
        KernelOp::Nearest => 1,
        KernelOp::Linear => 2,
        KernelOp::BlockAve { .. } => {
            return Err(RegridError::SchemeNotSupported {
                scheme: "BlockAve",
                operation: "rebin",
            })
        }
        KernelOp::Separable(k) => 2 * k.radius(),
    };
    scratch.prepare(&out_bounds, max_nb);

    let mut nskip = 0usize;
    'points: for point in 0..npoint {
        // Input pixel usability.
        let value = input.data[in_offsets[point]];
        if input.usebad && value.same(input.badval) {
            nskip += 1;
            continue;
        }
        let mut variance = None;
        if let Some(var_plane) = input.variance {
            let v = var_plane[in_offsets[point]];
            if input.usebad && v.same(input.badval) {
                nskip += 1;
                continue;
            }
            let v = v.to_f64();
            if !(v >= 0.0) || !v.is_finite() {
                nskip += 1;
                continue;
            }
            variance = Some(v);
        }
        let mut pixel_weight = 1.0;
        if varwgt {
            match variance {
                Some(v) if v > 0.0 => pixel_weight = 1.0 / v,
                _ => {
                    nskip += 1;
                    continue;
                }
            }
        }

        // Per-axis neighbor tables in the output space, normalized by the
        // unclipped footprint sum.
        for a in 0..ndim {
            let x = coords.get(a, point);
            if !x.is_finite() {
                nskip += 1;
                continue 'points;
            }
            let lo = out_bounds.lower()[a];
            let hi = out_bounds.upper()[a];
            let stride = scratch.strides[a];

            let count = match kernel {
                KernelOp::Nearest => {
                    if x < lo as f64 - 0.5 || x >= hi as f64 + 0.5 {
                        0
                    } else {
                        let j = ((x + 0.5).floor() as i64).clamp(lo, hi);
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
                            scratch.offsets[a * max_nb + n] =
                                (base + 1 - lo) as usize * stride;
                            scratch.weights[a * max_nb + n] = frac;
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
                        let mut full_sum = 0.0;
                        let mut n = 0;
                        for j in first..first + 2 * radius {
                            let w = sep.weight(x - j as f64)?;
                            full_sum += w;
                            if j < lo || j > hi {
                                continue;
                            }
                            scratch.offsets[a * max_nb + n] = (j - lo) as usize * stride;
                            scratch.weights[a * max_nb + n] = w;
                            n += 1;
                        }
                        if full_sum == 0.0 || !full_sum.is_finite() {
                            0
                        } else {
                            for k in 0..n {
                                scratch.weights[a * max_nb + k] /= full_sum;
                            }
                            n
                        }
                    }
                }
                KernelOp::BlockAve { .. } => unreachable!(),
            };
            if count == 0 {
                nskip += 1;
                continue 'points;
            }
            scratch.counts[a] = count;
            scratch.digits[a] = 0;
        }

        let value = value.to_f64() * scale;
        let variance = variance.map(|v| v * scale * scale);
        match ndim {
            1 => deposit_1d(acc, scratch, pixel_weight, value, variance),
            2 => deposit_2d(acc, scratch, max_nb, pixel_weight, value, variance),
            _ => deposit_nd(acc, scratch, max_nb, ndim, pixel_weight, value, variance),
        }
        acc.count_used();
    }
    Ok(nskip)
}

// ============================================================================
// Footprint Deposits
// ============================================================================

fn deposit_1d(
    acc: &mut AccumulatorState,
    scratch: &InterpScratch,
    pixel_weight: f64,
    value: f64,
    variance: Option<f64>,
) {
    for i in 0..scratch.counts[0] {
        acc.deposit(
            scratch.offsets[i],
            pixel_weight * scratch.weights[i],
            value,
            variance,
        );
    }
}

fn deposit_2d(
    acc: &mut AccumulatorState,
    scratch: &InterpScratch,
    max_nb: usize,
    pixel_weight: f64,
    value: f64,
    variance: Option<f64>,
) {
    for j in 0..scratch.counts[1] {
        let row_offset = scratch.offsets[max_nb + j];
        let row_weight = pixel_weight * scratch.weights[max_nb + j];
        for i in 0..scratch.counts[0] {
            acc.deposit(
                row_offset + scratch.offsets[i],
                row_weight * scratch.weights[i],
                value,
                variance,
            );
        }
    }
}

fn deposit_nd(
    acc: &mut AccumulatorState,
    scratch: &mut InterpScratch,
    max_nb: usize,
    ndim: usize,
    pixel_weight: f64,
    value: f64,
    variance: Option<f64>,
) {
    loop {
        let mut offset = 0usize;
        let mut weight = pixel_weight;
        for a in 0..ndim {
            let slot = a * max_nb + scratch.digits[a];
            offset += scratch.offsets[slot];
            weight *= scratch.weights[slot];
        }
        acc.deposit(offset, weight, value, variance);

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
}
