//! Distance, bearing and destination on the spherical earth.
//!
//! Two families of formulas are available, both implementing [`SphericalMetric`]:
//! * [`GreatCircle`] - shortest paths on the sphere (haversine formula),
//! * [`Rhumb`] - paths of constant bearing (loxodromes).
//!
//! All operations accept coordinates in EPSG:4326 or EPSG:3857 and compute in degrees of EPSG:4326. Coordinates without
//! SRID have no earth model: distances and bearings involving them are `f64::INFINITY`, and operations producing
//! coordinates return `None`.

mod great_circle;
mod rhumb;

pub use great_circle::GreatCircle;
pub use rhumb::Rhumb;

use crate::coordinate::Coordinate;
use crate::projection::Projection;
use crate::units::{normalize_bearing, radians_to_length, Unit};

/// A family of distance/bearing formulas on the earth sphere.
pub trait SphericalMetric {
    /// Distance between two coordinates in meters.
    fn distance(&self, from: &Coordinate, to: &Coordinate) -> f64;

    /// Initial bearing from `from` to `to` in degrees, in the `[0, 360)` range.
    fn bearing(&self, from: &Coordinate, to: &Coordinate) -> f64;

    /// Bearing at which the path arrives at `to`, in the `[0, 360)` range.
    fn final_bearing(&self, from: &Coordinate, to: &Coordinate) -> f64 {
        let reversed = self.bearing(to, from);
        if reversed.is_finite() {
            normalize_bearing(reversed + 180.0)
        } else {
            f64::INFINITY
        }
    }

    /// Coordinate reached by travelling `distance` meters from `from` with the initial `bearing` (degrees).
    ///
    /// The result is in EPSG:4326 with longitude in `(-180, 180]` and keeps the altitude of `from`.
    fn destination(&self, from: &Coordinate, distance: f64, bearing: f64) -> Option<Coordinate>;

    /// Point half way along the path between two coordinates, in EPSG:4326.
    ///
    /// Altitude is averaged if both coordinates have one.
    fn midpoint(&self, from: &Coordinate, to: &Coordinate) -> Option<Coordinate> {
        let distance = self.distance(from, to);
        if !distance.is_finite() {
            return None;
        }

        let bearing = self.bearing(from, to);
        let midpoint = self.destination(from, distance / 2.0, bearing)?;
        let z = match (from.z(), to.z()) {
            (Some(z1), Some(z2)) => Some((z1 + z2) / 2.0),
            _ => None,
        };

        Some(midpoint.with_z(z))
    }
}

/// Reprojects both coordinates into EPSG:4326, or returns `None` if any of them has no SRID.
pub(crate) fn geographic_pair(a: &Coordinate, b: &Coordinate) -> Option<(Coordinate, Coordinate)> {
    Some((
        a.projected(Projection::Epsg4326)?,
        b.projected(Projection::Epsg4326)?,
    ))
}

impl Coordinate {
    /// Great-circle distance in meters. See [`GreatCircle`].
    pub fn distance(&self, other: &Coordinate) -> f64 {
        GreatCircle.distance(self, other)
    }

    /// Great-circle distance in the given unit.
    pub fn distance_in(&self, other: &Coordinate, unit: Unit) -> f64 {
        let meters = self.distance(other);
        radians_to_length(meters / Unit::Meters.factor(), unit)
    }

    /// Initial great-circle bearing in degrees.
    pub fn bearing(&self, other: &Coordinate) -> f64 {
        GreatCircle.bearing(self, other)
    }

    /// Final great-circle bearing in degrees.
    pub fn final_bearing(&self, other: &Coordinate) -> f64 {
        GreatCircle.final_bearing(self, other)
    }

    /// Great-circle destination given distance in meters and bearing in degrees.
    pub fn destination(&self, distance: f64, bearing: f64) -> Option<Coordinate> {
        GreatCircle.destination(self, distance, bearing)
    }

    /// Great-circle midpoint.
    pub fn midpoint(&self, other: &Coordinate) -> Option<Coordinate> {
        GreatCircle.midpoint(self, other)
    }

    /// Rhumb line distance in meters. See [`Rhumb`].
    pub fn rhumb_distance(&self, other: &Coordinate) -> f64 {
        Rhumb.distance(self, other)
    }

    /// Rhumb line bearing in degrees.
    pub fn rhumb_bearing(&self, other: &Coordinate) -> f64 {
        Rhumb.bearing(self, other)
    }

    /// Final rhumb line bearing in degrees. Equals to the initial one, as the bearing of a rhumb line is constant.
    pub fn rhumb_final_bearing(&self, other: &Coordinate) -> f64 {
        Rhumb.final_bearing(self, other)
    }

    /// Rhumb line destination given distance in meters and bearing in degrees.
    pub fn rhumb_destination(&self, distance: f64, bearing: f64) -> Option<Coordinate> {
        Rhumb.destination(self, distance, bearing)
    }

    /// Rhumb line midpoint.
    pub fn rhumb_midpoint(&self, other: &Coordinate) -> Option<Coordinate> {
        Rhumb.midpoint(self, other)
    }
}
