//! Point traits the kernels are written against.

mod cartesian_point;
mod geo_point;

pub use cartesian_point::{CartesianPoint2d, CartesianPoint2dFloat};
pub use geo_point::GeoPoint;
