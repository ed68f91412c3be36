//! # Furrow Common
//!
//! Common types and shared abstractions for the Furrow farm simulation.
//!
//! This crate provides foundational types used across all Furrow crates:
//! - Coordinate types (grid, world)
//! - ID types (ItemTypeId, CropTypeId)
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;
