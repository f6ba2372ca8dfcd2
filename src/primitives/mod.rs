//! Layer 1: Primitives - data structures and basic utilities.
//!
//! Contains the fundamental data structures (`GridBounds`, `Grid`,
//! `PointSet`, `Flags`), the `Mapping` collaborator trait, the `Pixel`
//! element-type trait, error types, and buffer recycling.

pub mod buffer;
pub mod errors;
pub mod flags;
pub mod grid;
pub mod mapping;
pub mod pixel;

pub use buffer::Slot;
pub use errors::RegridError;
pub use flags::Flags;
pub use grid::{Grid, GridBounds, PointSet};
pub use mapping::{AffineMap, Mapping};
pub use pixel::Pixel;
