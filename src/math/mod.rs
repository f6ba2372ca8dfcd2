//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides pure mathematical functions used throughout the
//! engine:
//! - Kernel functions for pixel-to-pixel weighting
//! - Local linear approximation of coordinate transforms
//!
//! These are reusable mathematical building blocks with no
//! algorithm-specific logic.
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
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Kernel (weight) functions for pixel-to-pixel weighting.
pub mod kernel;

/// Local linear approximation of a coordinate transform.
pub mod linfit;
