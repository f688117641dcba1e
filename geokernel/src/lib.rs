//! Geometry kernel for a spherical earth.
//!
//! Coordinates are tagged with their projection (geographic EPSG:4326, spherical Web Mercator EPSG:3857, or no SRID at
//! all) and are reconciled automatically when they meet in one operation. On top of that the crate provides
//! great-circle and rhumb line measurements, unit conversion, nearest-point queries on segments and lines, an R-tree,
//! clipping of lines and polygons by a box, and detection of overlapping segments of two lines.
//!
//! ```
//! use geokernel::{Coordinate, Unit};
//!
//! let philadelphia = Coordinate::latlon(39.984, -75.343);
//! let dover = Coordinate::latlon(39.123, -75.534);
//!
//! let km = philadelphia.distance_in(&dover, Unit::Kilometers);
//! assert!((km - 97.13).abs() < 0.01);
//! ```

pub mod consts;
pub mod error;
pub mod traits;

mod coordinate;
pub use coordinate::Coordinate;

pub mod projection;
pub use projection::{Projection, WebMercator};

pub mod units;
pub use units::{AreaUnit, Unit};

mod bounding_box;
pub use bounding_box::{BoundingBox, BoundingBoxRepresentable};

pub mod measure;
pub use measure::{GreatCircle, Rhumb, SphericalMetric};

pub mod segment;
pub use segment::{LineSegment, Orientation, SegmentComparison};

pub mod line;
pub use line::{
    distance_from_line, line_length, line_segments, nearest_coordinate_on_line, rhumb_line_length,
    NearestCoordinate,
};

pub mod rtree;
pub use rtree::RTree;

pub mod clip;
pub use clip::{clip_line, clip_lines, clip_polygon, clip_ring};

pub mod overlap;
pub use overlap::{lines_overlap, overlapping_line_segments, overlapping_segments, SegmentOverlap};

pub use error::GeoKernelError;
