use std::fmt;

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use crate::consts::EQUALITY_DELTA;
use crate::projection::{Projection, WebMercator};
use crate::traits::{CartesianPoint2d, GeoPoint};
use crate::units::normalize_longitude;

/// A position with optional altitude and measure, tagged with its projection.
///
/// The meaning of `x` and `y` depends on the projection:
/// * [`Projection::Epsg4326`] - longitude and latitude in degrees,
/// * [`Projection::Epsg3857`] - easting and northing in meters,
/// * no projection - arbitrary planar units. Such coordinates can be clipped and compared, but have no earth model, so
///   distances and bearings involving them are undefined (`f64::INFINITY`).
///
/// ```
/// use geokernel::{Coordinate, Projection};
///
/// let c = Coordinate::latlon(52.5, 13.4);
/// assert_eq!(c.x(), 13.4);
/// assert_eq!(c.projection(), Some(Projection::Epsg4326));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    x: f64,
    y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    m: Option<f64>,
    projection: Option<Projection>,
}

impl Coordinate {
    /// Creates a coordinate in the given projection. `None` means a planar coordinate without SRID.
    pub const fn new(x: f64, y: f64, projection: Option<Projection>) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
            projection,
        }
    }

    /// Geographic coordinate from latitude and longitude in degrees.
    pub const fn latlon(lat: f64, lon: f64) -> Self {
        Self::new(lon, lat, Some(Projection::Epsg4326))
    }

    /// Geographic coordinate from longitude and latitude in degrees.
    pub const fn lonlat(lon: f64, lat: f64) -> Self {
        Self::latlon(lat, lon)
    }

    /// Web Mercator coordinate in meters.
    pub const fn web_mercator(x: f64, y: f64) -> Self {
        Self::new(x, y, Some(Projection::Epsg3857))
    }

    /// Planar coordinate without SRID.
    pub const fn planar(x: f64, y: f64) -> Self {
        Self::new(x, y, None)
    }

    /// Sets the altitude (meters).
    pub fn with_altitude(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    /// Sets the measure value.
    pub fn with_measure(mut self, m: f64) -> Self {
        self.m = Some(m);
        self
    }

    /// Replaces position and projection, keeping altitude and measure.
    pub(crate) fn with_xy(&self, x: f64, y: f64, projection: Option<Projection>) -> Self {
        Self {
            x,
            y,
            projection,
            ..*self
        }
    }

    /// Replaces the altitude.
    pub(crate) fn with_z(mut self, z: Option<f64>) -> Self {
        self.z = z;
        self
    }

    /// Longitude, easting or planar x.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Latitude, northing or planar y.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Altitude in meters, if set.
    pub fn z(&self) -> Option<f64> {
        self.z
    }

    /// Measure value, if set.
    pub fn m(&self) -> Option<f64> {
        self.m
    }

    /// Projection of the coordinate. `None` for planar coordinates without SRID.
    pub fn projection(&self) -> Option<Projection> {
        self.projection
    }

    /// Latitude in degrees, converting from Web Mercator if needed. `None` for planar coordinates.
    pub fn latitude(&self) -> Option<f64> {
        self.projected(Projection::Epsg4326).map(|c| c.y)
    }

    /// Longitude in degrees, converting from Web Mercator if needed. `None` for planar coordinates.
    pub fn longitude(&self) -> Option<f64> {
        self.projected(Projection::Epsg4326).map(|c| c.x)
    }

    /// Converts the coordinate into the `target` projection.
    ///
    /// This is a no-op if the coordinate is already in `target`. Planar coordinates cannot be converted and return
    /// `None`.
    pub fn projected(&self, target: Projection) -> Option<Self> {
        match (self.projection?, target) {
            (from, to) if from == to => Some(*self),
            (Projection::Epsg4326, Projection::Epsg3857) => {
                Some(WebMercator::default().project_coordinate(self))
            }
            (Projection::Epsg3857, Projection::Epsg4326) => {
                Some(WebMercator::default().unproject_coordinate(self))
            }
            _ => None,
        }
    }

    /// Converts the coordinate into `target`, where `None` stands for "no SRID".
    ///
    /// Reconciliation between a projected and a planar coordinate is impossible and returns `None`.
    pub fn matched_to(&self, target: Option<Projection>) -> Option<Self> {
        match target {
            Some(target) => self.projected(target),
            None if self.projection.is_none() => Some(*self),
            None => None,
        }
    }

    /// Returns the coordinate with longitude wrapped into `(-180, 180]`.
    ///
    /// Web Mercator coordinates are wrapped by the equivalent easting range. Planar coordinates are returned unchanged.
    pub fn normalized(&self) -> Self {
        match self.projection {
            Some(Projection::Epsg4326) => Self {
                x: normalize_longitude(self.x),
                ..*self
            },
            Some(Projection::Epsg3857) => match self.projected(Projection::Epsg4326) {
                Some(geographic) => geographic.normalized().projected(Projection::Epsg3857).unwrap_or(*self),
                None => *self,
            },
            None => *self,
        }
    }

    /// Compares `x` and `y` of two coordinates within [`EQUALITY_DELTA`], after reconciling projections.
    pub fn equals_2d(&self, other: &Self) -> bool {
        match other.matched_to(self.projection) {
            Some(other) => {
                (self.x - other.x).abs() <= EQUALITY_DELTA && (self.y - other.y).abs() <= EQUALITY_DELTA
            }
            None => false,
        }
    }
}

impl GeoPoint for Coordinate {
    type Num = f64;

    /// Raw `y` value. Only meaningful for EPSG:4326 coordinates.
    fn lat(&self) -> f64 {
        self.y
    }

    /// Raw `x` value. Only meaningful for EPSG:4326 coordinates.
    fn lon(&self) -> f64 {
        self.x
    }
}

impl CartesianPoint2d for Coordinate {
    type Num = f64;

    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

impl AbsDiffEq for Coordinate {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.projection == other.projection
            && self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
    }
}

impl RelativeEq for Coordinate {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.projection == other.projection
            && self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}", self.x, self.y)?;
        if let Some(z) = self.z {
            write!(f, ", {z}")?;
        }
        if let Some(m) = self.m {
            write!(f, ", m={m}")?;
        }
        match self.projection {
            Some(projection) => write!(f, ") {projection}"),
            None => write!(f, ")"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAX_MERCATOR_LATITUDE, ORIGIN_SHIFT};
    use approx::assert_abs_diff_eq;

    #[test]
    fn constructors() {
        let c = Coordinate::latlon(10.0, 20.0);
        assert_eq!((c.x(), c.y()), (20.0, 10.0));
        assert_eq!(c, Coordinate::lonlat(20.0, 10.0));
        assert_eq!(c.z(), None);
        assert_eq!(c.m(), None);

        let c = Coordinate::planar(1.0, 2.0).with_altitude(3.0).with_measure(4.0);
        assert_eq!(c.projection(), None);
        assert_eq!(c.z(), Some(3.0));
        assert_eq!(c.m(), Some(4.0));
    }

    #[test]
    fn projection_is_noop_for_same_target() {
        let c = Coordinate::latlon(10.0, 20.0).with_altitude(5.0);
        assert_eq!(c.projected(Projection::Epsg4326), Some(c));
    }

    #[test]
    fn project_to_web_mercator_and_back() {
        let c = Coordinate::latlon(0.0, 180.0);
        let projected = c.projected(Projection::Epsg3857).unwrap();
        assert_abs_diff_eq!(projected, Coordinate::web_mercator(ORIGIN_SHIFT, 0.0), epsilon = 1e-6);

        let c = Coordinate::latlon(39.984, -75.343);
        let round_trip = c
            .projected(Projection::Epsg3857)
            .and_then(|p| p.projected(Projection::Epsg4326))
            .unwrap();
        assert_abs_diff_eq!(round_trip, c, epsilon = 1e-6);
    }

    #[test]
    fn latitude_is_clamped_before_projection() {
        let c = Coordinate::latlon(89.9, 0.0).projected(Projection::Epsg3857).unwrap();
        let back = c.projected(Projection::Epsg4326).unwrap();
        assert_abs_diff_eq!(back.y(), MAX_MERCATOR_LATITUDE, epsilon = 1e-9);
    }

    #[test]
    fn planar_coordinates_cannot_be_projected() {
        let c = Coordinate::planar(1.0, 2.0);
        assert_eq!(c.projected(Projection::Epsg4326), None);
        assert_eq!(c.matched_to(None), Some(c));
        assert_eq!(Coordinate::latlon(1.0, 2.0).matched_to(None), None);
        assert_eq!(c.latitude(), None);
    }

    #[test]
    fn normalization() {
        assert_abs_diff_eq!(
            Coordinate::latlon(10.0, 190.0).normalized(),
            Coordinate::latlon(10.0, -170.0),
            epsilon = 1e-12
        );
        assert_eq!(
            Coordinate::latlon(10.0, -180.0).normalized(),
            Coordinate::latlon(10.0, 180.0)
        );
        assert_eq!(
            Coordinate::planar(500.0, 0.0).normalized(),
            Coordinate::planar(500.0, 0.0)
        );

        let wrapped = Coordinate::web_mercator(ORIGIN_SHIFT * 1.5, 0.0).normalized();
        assert_abs_diff_eq!(wrapped.x(), -ORIGIN_SHIFT / 2.0, epsilon = 1e-6);
    }

    #[test]
    fn equality_across_projections() {
        let a = Coordinate::latlon(0.0, 0.0);
        let b = Coordinate::web_mercator(0.0, 0.0);
        assert!(a.equals_2d(&b));
        assert!(!a.equals_2d(&Coordinate::latlon(0.0, 1e-6)));
        assert!(!a.equals_2d(&Coordinate::planar(0.0, 0.0)));
    }

    #[test]
    fn approximate_equality() {
        let a = Coordinate::web_mercator(1_000_000.0, 2_000_000.0);
        let b = Coordinate::web_mercator(1_000_000.000_1, 2_000_000.0);
        approx::assert_relative_eq!(a, b, max_relative = 1e-9);
        approx::assert_relative_ne!(a, Coordinate::planar(1_000_000.0, 2_000_000.0));
    }

    #[test]
    fn display() {
        assert_eq!(Coordinate::latlon(1.5, 2.0).to_string(), "(2, 1.5) EPSG:4326");
        assert_eq!(
            Coordinate::planar(1.0, 2.0).with_altitude(3.0).to_string(),
            "(1, 2, 3)"
        );
    }

    #[test]
    fn serialization() {
        let c = Coordinate::latlon(1.0, 2.0);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"x":2.0,"y":1.0,"projection":"Epsg4326"}"#);
        assert_eq!(serde_json::from_str::<Coordinate>(&json).unwrap(), c);
    }
}
