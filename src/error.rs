use thiserror::Error;

use crate::math::Position;
use crate::raster::Dims;

/// Top-level error type for the Geodesis propagation engine.
#[derive(Debug, Error)]
pub enum GeodesisError {
    #[error(transparent)]
    Mask(#[from] MaskError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Measure(#[from] MeasureError),

    #[error(transparent)]
    Calibration(#[from] CalibrationError),
}

/// Errors related to chamfer mask construction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MaskError {
    #[error("invalid chamfer weight specification: {0}")]
    InvalidWeightSpec(String),
}

/// Errors related to raster construction and addressing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: String, found: String },

    #[error("position {0} is outside the raster")]
    OutOfBounds(Position),

    #[error("raster has a zero-sized dimension")]
    EmptyRaster,

    #[error("raster of {0} exceeds the addressable size")]
    TooLarge(Dims),
}

/// Per-label conditions raised while measuring regions.
///
/// These are recovered locally: the estimator records them as warnings and
/// keeps processing the remaining labels.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeasureError {
    #[error("region with label {label} not found")]
    RegionNotFound { label: u32 },

    #[error("no descending neighbor for label {label} at {position}")]
    NoDescendingNeighbor { label: u32, position: Position },

    #[error("{phase}: propagation did not converge within {iterations} iterations")]
    MaxIterationsExceeded { phase: String, iterations: usize },

    #[error("{phase}: distances for label {label} exceed the range of the weight type")]
    DistanceRangeExceeded { label: u32, phase: String },
}

/// Errors related to physical calibration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("invalid pixel spacing: {0}")]
    InvalidSpacing(f64),
}

/// Convenience type alias for results using [`GeodesisError`].
pub type Result<T> = std::result::Result<T, GeodesisError>;
