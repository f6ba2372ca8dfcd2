//! Processing flags for resampling and rebinning.
//!
//! ## Purpose
//!
//! This module defines the `Flags` bitset controlling optional behavior of
//! the entry operations: bad-value checking, variance handling, flux
//! conservation, and the sequential-rebin lifecycle.
//!
//! ## Key concepts
//!
//! * **USEBAD / USEVAR**: opt in to bad-value recognition and variance
//!   propagation.
//! * **CONSERVEFLUX**: scale values by the local area (or volume) ratio
//!   of the fitted transform; resample multiplies by it, rebin divides.
//! * **GENVAR / VARWGT**: rebin only; generate output variance from the
//!   spread of contributions, or weight inputs by reciprocal variance.
//! * **REBININIT / REBINEND**: bracket a sequential-rebin accumulation.
//! * **Reserved bits**: four pass-through bits ignored by the engine.

// External dependencies
use core::ops::{BitAnd, BitOr, BitOrAssign};

/// Bitset of processing flags. Combine with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags(u32);

impl Flags {
    /// No flags set.
    pub const NONE: Flags = Flags(0);

    /// Recognize the bad-value sentinel in input data.
    pub const USEBAD: Flags = Flags(1 << 0);

    /// Propagate variances from the input variance plane.
    pub const USEVAR: Flags = Flags(1 << 1);

    /// Scale values by the local input/output area ratio of the fitted
    /// transform (resample multiplies, rebin divides).
    pub const CONSERVEFLUX: Flags = Flags(1 << 2);

    /// Generate output variances from the spread of contributing values
    /// (rebin; input variances are ignored).
    pub const GENVAR: Flags = Flags(1 << 3);

    /// Weight each input value by its reciprocal variance (rebin).
    pub const VARWGT: Flags = Flags(1 << 4);

    /// First call of a sequential rebin: zero the accumulators.
    pub const REBININIT: Flags = Flags(1 << 5);

    /// Last call of a sequential rebin: normalize and finalize.
    pub const REBINEND: Flags = Flags(1 << 6);

    /// Pass-through bit, ignored by the engine.
    pub const RESERVED1: Flags = Flags(1 << 7);
    /// Pass-through bit, ignored by the engine.
    pub const RESERVED2: Flags = Flags(1 << 8);
    /// Pass-through bit, ignored by the engine.
    pub const RESERVED3: Flags = Flags(1 << 9);
    /// Pass-through bit, ignored by the engine.
    pub const RESERVED4: Flags = Flags(1 << 10);

    /// Whether every bit of `other` is set in `self`.
    #[inline]
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no bits are set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bit pattern.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for Flags {
    type Output = Flags;

    #[inline]
    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Flags {
    type Output = Flags;

    #[inline]
    fn bitand(self, rhs: Flags) -> Flags {
        Flags(self.0 & rhs.0)
    }
}
