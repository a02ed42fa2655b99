mod calibration;
mod diameter;
mod extrema;
mod path;

pub use calibration::{CalibratedResult, Calibration};
pub use diameter::{DiameterParams, GeodesicDiameter, GeodesicDiameterOutput, GeodesicResult};
pub use extrema::{max_per_label, min_per_label, PositionValuePair};
pub use path::PathExtractor;
