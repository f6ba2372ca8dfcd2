//! Layer 3: Algorithms
//!
//! # Purpose
//!
//! This layer implements the two data-movement directions of the engine:
//! - Pull-mode interpolation of input pixels at transformed positions
//! - Push-mode spreading of input pixels into accumulation planes
//!
//! plus the accumulator state that push-mode deposits into.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Adapters
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Algorithms ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Weighted accumulation planes for push-mode rebinning.
pub mod accumulate;

/// Pull-mode interpolation at transformed positions.
pub mod interp;

/// Push-mode spreading into accumulation planes.
pub mod spread;
