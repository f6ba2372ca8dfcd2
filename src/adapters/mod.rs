//! Layer 5: Adapters
//!
//! # Purpose
//!
//! This layer provides the execution modes built on the engine:
//! - `ResampleProcessor`: single-call pull-mode resampling
//! - `RebinProcessor`: single-call push-mode rebinning
//! - `RebinSequence`: sequential push-mode accumulation
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Adapters ← You are here
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Single-shot push-mode rebinning.
pub mod rebin;

/// Single-call pull-mode resampling.
pub mod resample;

/// Sequential push-mode accumulation.
pub mod sequence;
