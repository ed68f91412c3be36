//! Error types for Furrow.

use thiserror::Error;

use crate::CropTypeId;

/// Top-level error type for Furrow operations.
#[derive(Debug, Error)]
pub enum FurrowError {
    /// Crop definition errors
    #[error("Crop error: {0}")]
    Crop(#[from] CropError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Crop definition errors.
#[derive(Debug, Error, PartialEq)]
pub enum CropError {
    /// A crop needs at least one growth stage
    #[error("Crop {0:?} has no growth stages")]
    NoStages(CropTypeId),

    /// Stage or total durations must be positive
    #[error("Crop {id:?} has invalid duration {value}")]
    InvalidDuration {
        /// Crop type
        id: CropTypeId,
        /// Offending value
        value: f32,
    },

    /// Light threshold outside 0..=1
    #[error("Crop {id:?} has light threshold {value} outside 0..=1")]
    InvalidLight {
        /// Crop type
        id: CropTypeId,
        /// Offending value
        value: f32,
    },

    /// Two definitions share an id
    #[error("Duplicate crop definition {0:?}")]
    Duplicate(CropTypeId),

    /// Unknown crop requested
    #[error("Unknown crop {0:?}")]
    Unknown(CropTypeId),
}

/// Result type alias for Furrow operations.
pub type FurrowResult<T> = Result<T, FurrowError>;
