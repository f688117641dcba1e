use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::consts::{MAX_MERCATOR_LATITUDE, WGS84_SEMIMAJOR};
use crate::coordinate::Coordinate;
use crate::projection::Projection;
use crate::traits::{CartesianPoint2d, GeoPoint};

/// Spherical Web Mercator projection (EPSG:3857).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WebMercator {
    radius: f64,
}

impl WebMercator {
    /// Creates a projection over a sphere of the given radius.
    pub const fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// Radius of the sphere, in meters.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Projects geographic coordinates into Web Mercator meters.
    ///
    /// Latitude is clamped to `±MAX_MERCATOR_LATITUDE`, since the projection is not defined at the poles.
    pub fn project(&self, input: &impl GeoPoint<Num = f64>) -> (f64, f64) {
        let lat = input
            .lat()
            .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
            .to_radians();
        let x = self.radius * input.lon_rad();
        let y = self.radius * (FRAC_PI_4 + lat / 2.0).tan().ln();

        (x, y)
    }

    /// Converts Web Mercator meters back into `(lat, lon)` degrees.
    pub fn unproject(&self, input: &impl CartesianPoint2d<Num = f64>) -> (f64, f64) {
        let lon = (input.x() / self.radius).to_degrees();
        let lat = (2.0 * (input.y() / self.radius).exp().atan() - FRAC_PI_2).to_degrees();

        (lat, lon)
    }

    /// Projects a geographic coordinate, carrying over altitude and measure. Coordinates that are not in EPSG:4326 are
    /// returned as is.
    pub fn project_coordinate(&self, input: &Coordinate) -> Coordinate {
        if input.projection() != Some(Projection::Epsg4326) {
            return *input;
        }

        let (x, y) = self.project(input);
        input.with_xy(x, y, Some(Projection::Epsg3857))
    }

    /// Unprojects a Web Mercator coordinate. Coordinates that are not in EPSG:3857 are returned as is.
    pub fn unproject_coordinate(&self, input: &Coordinate) -> Coordinate {
        if input.projection() != Some(Projection::Epsg3857) {
            return *input;
        }

        let (lat, lon) = self.unproject(input);
        input.with_xy(lon, lat, Some(Projection::Epsg4326))
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self::new(WGS84_SEMIMAJOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::ORIGIN_SHIFT;
    use approx::assert_abs_diff_eq;

    #[test]
    fn project_known_points() {
        let projection = WebMercator::default();

        let (x, y) = projection.project(&Coordinate::latlon(0.0, 0.0));
        assert_abs_diff_eq!(x, 0.0);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-9);

        let (x, y) = projection.project(&Coordinate::latlon(MAX_MERCATOR_LATITUDE, 180.0));
        assert_abs_diff_eq!(x, ORIGIN_SHIFT, epsilon = 1e-6);
        assert_abs_diff_eq!(y, ORIGIN_SHIFT, epsilon = 1e-6);
    }

    #[test]
    fn project_clamps_latitude() {
        let projection = WebMercator::default();

        let (_, at_pole) = projection.project(&Coordinate::latlon(90.0, 10.0));
        let (_, at_limit) = projection.project(&Coordinate::latlon(MAX_MERCATOR_LATITUDE, 10.0));
        assert!(at_pole.is_finite());
        assert_abs_diff_eq!(at_pole, at_limit);
    }

    #[test]
    fn round_trip() {
        let projection = WebMercator::default();
        for (lat, lon) in [(0.0, 0.0), (47.5, 8.25), (-33.9, 151.2), (85.0, -179.9)] {
            let c = Coordinate::latlon(lat, lon);
            let projected = projection.project_coordinate(&c);
            assert_eq!(projected.projection(), Some(Projection::Epsg3857));

            let back = projection.unproject_coordinate(&projected);
            assert_abs_diff_eq!(back, c, epsilon = 1e-6);
        }
    }

    #[test]
    fn keeps_altitude() {
        let projection = WebMercator::default();
        let c = Coordinate::latlon(10.0, 10.0).with_altitude(120.0);
        assert_eq!(projection.project_coordinate(&c).z(), Some(120.0));
    }
}
