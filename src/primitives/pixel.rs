//! Element-type dispatch for grid values.
//!
//! ## Purpose
//!
//! This module defines the `Pixel` trait, which replaces per-type
//! replication of every algorithm with one generic implementation. A
//! `Pixel` supplies exactly what the engine needs of an element type:
//! conversion to and from the `f64` accumulation domain, a zero value,
//! and bad-value comparison.
//!
//! ## Design notes
//!
//! * **Integer policy**: integer conversions round to nearest and range
//!   check; an unrepresentable result yields `None` (flagged bad by the
//!   caller), never wrapped or saturated.
//! * **Float policy**: float conversions never range-flag.
//! * **NaN sentinels**: `same` treats NaN as equal to NaN so a NaN bad
//!   value behaves like any other sentinel.
//!
//! ## Non-goals
//!
//! * This trait carries no arithmetic; all accumulation happens in `f64`.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use num_traits::Float;

// External dependencies
use core::fmt::Debug;

/// A grid element type: one of the supported signed/unsigned integers or
/// floats.
pub trait Pixel: Copy + PartialEq + PartialOrd + Debug + Send + Sync + 'static {
    /// Whether the type is floating point (floats skip range checks).
    const FLOATING: bool;

    /// The additive identity.
    fn zero() -> Self;

    /// Widen to the `f64` accumulation domain.
    fn to_f64(self) -> f64;

    /// Narrow from the accumulation domain. Integer types round to
    /// nearest and return `None` when the rounded value is outside the
    /// representable range.
    fn from_f64(value: f64) -> Option<Self>;

    /// Sentinel-aware equality: identical to `==` except that NaN
    /// compares equal to NaN.
    #[inline]
    fn same(self, other: Self) -> bool {
        self == other || (self != self && other != other)
    }
}

macro_rules! impl_pixel_int {
    ($($ty:ty),*) => {$(
        impl Pixel for $ty {
            const FLOATING: bool = false;

            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(value: f64) -> Option<Self> {
                if !value.is_finite() {
                    return None;
                }
                let rounded = value.round();
                // MAX as f64 rounds up for the 64-bit types, so the upper
                // bound must be exclusive against MAX + 1 (exact in f64).
                if rounded < <$ty>::MIN as f64 || rounded >= (<$ty>::MAX as f64) + 1.0 {
                    return None;
                }
                Some(rounded as $ty)
            }
        }
    )*};
}

macro_rules! impl_pixel_float {
    ($($ty:ty),*) => {$(
        impl Pixel for $ty {
            const FLOATING: bool = true;

            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(value: f64) -> Option<Self> {
                Some(value as $ty)
            }
        }
    )*};
}

impl_pixel_int!(i8, i16, i32, i64, u8, u16, u32, u64);
impl_pixel_float!(f32, f64);
