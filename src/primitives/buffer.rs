//! Buffer recycling for repeated grid operations.
//!
//! ## Purpose
//!
//! This module provides `Slot`, a reusable vector with explicit capacity
//! management. Tile-by-tile processing touches the same scratch arrays
//! thousands of times per call; allocating them once and recycling them
//! keeps allocator pressure off the hot path.
//!
//! ## Design notes
//!
//! * **Lazy expansion**: slots grow on demand via `ensure_capacity` but
//!   never shrink, stabilizing at the largest tile processed.
//! * **Explicit ownership**: slots live in a workspace that is passed down
//!   the pipeline, so parallel callers can hold one workspace per thread.
//!
//! ## Invariants
//!
//! * `clear` resets length only; capacity is monotonically increasing.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::ops::{Deref, DerefMut};

// ============================================================================
// Slot - Unified Vector Abstraction
// ============================================================================

/// A reusable vector slot with automatic capacity management.
#[derive(Debug, Clone)]
pub struct Slot<T>(Vec<T>);

impl<T> Slot<T> {
    /// Create a new slot with the given initial capacity.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Ensure the slot has at least the given capacity.
    /// Grows the underlying vector if needed; never shrinks.
    #[inline]
    pub fn ensure_capacity(&mut self, capacity: usize) {
        if self.0.capacity() < capacity {
            self.0.reserve(capacity - self.0.capacity());
        }
    }

    /// Clear the slot (sets length to 0, preserves capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Clear and refill with `len` copies of `value`.
    #[inline]
    pub fn fill_with(&mut self, len: usize, value: T)
    where
        T: Clone,
    {
        self.0.clear();
        self.0.resize(len, value);
    }

    /// Get a reference to the underlying vector.
    #[inline]
    pub fn as_vec(&self) -> &Vec<T> {
        &self.0
    }

    /// Get a mutable reference to the underlying vector.
    #[inline]
    pub fn as_vec_mut(&mut self) -> &mut Vec<T> {
        &mut self.0
    }

    /// Consume the slot and return the underlying vector.
    #[inline]
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Deref for Slot<T> {
    type Target = Vec<T>;
    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Slot<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> From<Vec<T>> for Slot<T> {
    fn from(v: Vec<T>) -> Self {
        Self(v)
    }
}
