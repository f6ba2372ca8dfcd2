//! Layer 4: Engine
//!
//! # Purpose
//!
//! This layer orchestrates a grid operation: validation of operands and
//! parameters, adaptive subdivision of the iterated grid, tiling of
//! accepted sections, and the direction drivers that move pixel data.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Adapters
//!   ↓
//! Layer 4: Engine ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Tiling of sections into cache-friendly pixel blocks.
pub mod blocks;

/// Direction drivers applying one section of work.
pub mod section;

/// Adaptive recursive subdivision of the iterated grid.
pub mod subdivide;

/// Input validation and scheme resolution.
pub mod validator;

/// Reusable buffer workspace.
pub mod workspace;
