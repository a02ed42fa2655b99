//! Chamfer and geodesic distance propagation on labeled rasters.
//!
//! The crate computes chamfer distance maps, label-constrained geodesic
//! distance maps, and, built on them, the geodesic diameter, inscribed
//! circle and longest geodesic path of every region of a label image.

pub mod error;
pub mod mask;
pub mod math;
pub mod measure;
pub mod progress;
pub mod raster;
pub mod transform;

pub use error::{GeodesisError, Result};
