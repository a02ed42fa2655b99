mod value;

pub use value::DistanceValue;

/// Integer raster coordinate. 2D rasters use `z = 0`.
pub type Position = nalgebra::Point3<i32>;

/// Relative integer displacement between two raster coordinates.
pub type Offset = nalgebra::Vector3<i32>;

/// Physical (calibrated) point.
pub type Point3 = nalgebra::Point3<f64>;

/// Physical spacing vector.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Position reported for results that could not be located.
pub const UNDEFINED_POSITION: Position = Position::new(-1, -1, -1);
