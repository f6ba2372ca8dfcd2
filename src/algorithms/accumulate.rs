//! Weighted accumulation planes for push-mode rebinning.
//!
//! ## Purpose
//!
//! This module provides `AccumulatorState`, the running sums that
//! push-mode spreading deposits into and that finalization normalizes
//! into an output grid. The state is an explicit value so a sequence of
//! rebin calls can accumulate across inputs before normalizing once.
//!
//! ## Key concepts
//!
//! * **dsum / wsum**: weighted data sum and weight sum per output pixel.
//! * **vsum**: propagated variance sum `Σ w² var` (variance propagation).
//! * **d2sum / w2sum**: weighted square sums for generated variance.
//! * **Finalization**: `out = dsum / wsum` wherever the accumulated
//!   weight reaches the weight limit; everything else is bad.
//!
//! ## Invariants
//!
//! * All planes share the length `bounds.npix()`.
//! * `clear` preserves plane configuration; only values reset.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use wide::f64x2;

// Internal dependencies
use crate::primitives::errors::RegridError;
use crate::primitives::grid::GridBounds;
use crate::primitives::pixel::Pixel;

// ============================================================================
// Accumulator State
// ============================================================================

/// Per-output-pixel accumulation planes for rebinning. All accumulation
/// is in `f64` regardless of the grid element type.
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulatorState {
    bounds: GridBounds,
    dsum: Vec<f64>,
    wsum: Vec<f64>,
    vsum: Option<Vec<f64>>,
    d2sum: Option<Vec<f64>>,
    w2sum: Option<Vec<f64>>,
    nused: u64,
}

impl AccumulatorState {
    /// Create zeroed planes for an output box. `propagate_var` allocates
    /// the propagated-variance plane, `generate_var` the square-sum
    /// planes.
    pub fn new(bounds: GridBounds, propagate_var: bool, generate_var: bool) -> Self {
        let npix = bounds.npix();
        Self {
            bounds,
            dsum: vec![0.0; npix],
            wsum: vec![0.0; npix],
            vsum: propagate_var.then(|| vec![0.0; npix]),
            d2sum: generate_var.then(|| vec![0.0; npix]),
            w2sum: generate_var.then(|| vec![0.0; npix]),
            nused: 0,
        }
    }

    /// Output box the planes cover.
    #[inline]
    pub fn bounds(&self) -> &GridBounds {
        &self.bounds
    }

    /// Number of input pixels deposited so far.
    #[inline]
    pub fn nused(&self) -> u64 {
        self.nused
    }

    /// Whether a propagated-variance plane is allocated.
    #[inline]
    pub fn propagates_variance(&self) -> bool {
        self.vsum.is_some()
    }

    /// Whether generated-variance planes are allocated.
    #[inline]
    pub fn generates_variance(&self) -> bool {
        self.d2sum.is_some()
    }

    /// Accumulated weight sums, one per output pixel.
    #[inline]
    pub fn weight_sums(&self) -> &[f64] {
        &self.wsum
    }

    /// Accumulated weighted data sums, one per output pixel.
    #[inline]
    pub fn data_sums(&self) -> &[f64] {
        &self.dsum
    }

    /// Reset every plane to zero, keeping the configuration.
    pub fn clear(&mut self) {
        self.dsum.iter_mut().for_each(|v| *v = 0.0);
        self.wsum.iter_mut().for_each(|v| *v = 0.0);
        if let Some(vsum) = &mut self.vsum {
            vsum.iter_mut().for_each(|v| *v = 0.0);
        }
        if let Some(d2sum) = &mut self.d2sum {
            d2sum.iter_mut().for_each(|v| *v = 0.0);
        }
        if let Some(w2sum) = &mut self.w2sum {
            w2sum.iter_mut().for_each(|v| *v = 0.0);
        }
        self.nused = 0;
    }

    /// Deposit one weighted contribution at a linear output offset.
    /// `variance` feeds the propagated plane when allocated.
    #[inline]
    pub fn deposit(&mut self, offset: usize, weight: f64, value: f64, variance: Option<f64>) {
        self.dsum[offset] += weight * value;
        self.wsum[offset] += weight;
        if let Some(vsum) = &mut self.vsum {
            if let Some(var) = variance {
                vsum[offset] += weight * weight * var;
            }
        }
        if let (Some(d2sum), Some(w2sum)) = (&mut self.d2sum, &mut self.w2sum) {
            d2sum[offset] += weight * value * value;
            w2sum[offset] += weight * weight;
        }
    }

    /// Count one input pixel as used.
    #[inline]
    pub fn count_used(&mut self) {
        self.nused += 1;
    }

    /// Fold another state's planes into this one. The configurations and
    /// bounds must match.
    pub fn merge(&mut self, other: &AccumulatorState) -> Result<(), RegridError> {
        if other.bounds != self.bounds
            || other.vsum.is_some() != self.vsum.is_some()
            || other.d2sum.is_some() != self.d2sum.is_some()
        {
            return Err(RegridError::BufferSizeMismatch {
                expected: self.dsum.len(),
                got: other.dsum.len(),
            });
        }
        sum_into(&mut self.dsum, &other.dsum);
        sum_into(&mut self.wsum, &other.wsum);
        if let (Some(a), Some(b)) = (&mut self.vsum, &other.vsum) {
            sum_into(a, b);
        }
        if let (Some(a), Some(b)) = (&mut self.d2sum, &other.d2sum) {
            sum_into(a, b);
        }
        if let (Some(a), Some(b)) = (&mut self.w2sum, &other.w2sum) {
            sum_into(a, b);
        }
        self.nused += other.nused;
        Ok(())
    }

    /// Normalize the planes into an output grid. Pixels whose accumulated
    /// weight is below `weight_limit`, zero, or non-finite, or whose
    /// normalized value cannot be represented, become `badval`. Returns
    /// the bad-pixel count.
    pub fn finalize<P: Pixel>(
        &self,
        weight_limit: f64,
        badval: P,
        out_data: &mut [P],
        mut out_var: Option<&mut [P]>,
    ) -> usize {
        debug_assert_eq!(out_data.len(), self.dsum.len());
        let mut nbad = 0usize;

        for offset in 0..self.dsum.len() {
            let wsum = self.wsum[offset];
            if wsum < weight_limit || wsum == 0.0 || !wsum.is_finite() {
                out_data[offset] = badval;
                if let Some(var) = out_var.as_deref_mut() {
                    var[offset] = badval;
                }
                nbad += 1;
                continue;
            }

            let mean = self.dsum[offset] / wsum;
            let value = match P::from_f64(mean) {
                Some(v) => v,
                None => {
                    out_data[offset] = badval;
                    if let Some(var) = out_var.as_deref_mut() {
                        var[offset] = badval;
                    }
                    nbad += 1;
                    continue;
                }
            };
            out_data[offset] = value;

            if let Some(var_plane) = out_var.as_deref_mut() {
                let var = self.variance_at(offset, wsum, mean);
                var_plane[offset] = match var.and_then(P::from_f64) {
                    Some(v) => v,
                    None => badval,
                };
            }
        }
        nbad
    }

    /// Normalized output variance for one pixel, from whichever variance
    /// planes are allocated.
    fn variance_at(&self, offset: usize, wsum: f64, mean: f64) -> Option<f64> {
        if let (Some(d2sum), Some(w2sum)) = (&self.d2sum, &self.w2sum) {
            // Sample variance of the contributions, corrected for the
            // effective number of independent inputs.
            let w2 = w2sum[offset];
            if w2 <= 0.0 {
                return None;
            }
            let neff = wsum * wsum / w2;
            if neff <= 1.0 {
                return None;
            }
            let spread = d2sum[offset] / wsum - mean * mean;
            let var = spread * neff / (neff - 1.0) / neff;
            return var.is_finite().then_some(var.max(0.0));
        }
        if let Some(vsum) = &self.vsum {
            let var = vsum[offset] / (wsum * wsum);
            return var.is_finite().then_some(var);
        }
        None
    }
}

/// Element-wise `dst += src` over two lanes at a time.
fn sum_into(dst: &mut [f64], src: &[f64]) {
    debug_assert_eq!(dst.len(), src.len());
    let pairs = dst.len() / 2;
    for i in 0..pairs {
        let j = 2 * i;
        let sum = f64x2::new([dst[j], dst[j + 1]]) + f64x2::new([src[j], src[j + 1]]);
        let lanes = sum.to_array();
        dst[j] = lanes[0];
        dst[j + 1] = lanes[1];
    }
    if dst.len() % 2 == 1 {
        let last = dst.len() - 1;
        dst[last] += src[last];
    }
}
