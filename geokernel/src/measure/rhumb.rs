use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::consts::{EARTH_RADIUS, RHUMB_STRETCH_EPSILON};
use crate::coordinate::Coordinate;
use crate::measure::{geographic_pair, SphericalMetric};
use crate::projection::Projection;
use crate::traits::GeoPoint;
use crate::units::{normalize_bearing, normalize_longitude};

/// Rhumb line (loxodrome) formulas: paths crossing all meridians at the same angle.
///
/// A rhumb line between two points is generally longer than the great circle, but it can be followed with a constant
/// compass bearing. Longitudes more than 180° apart are shifted by 360° first, so the shorter rhumb line is used.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Rhumb;

/// Difference of the mercator-projected latitudes (radians in, radians out).
fn projected_latitude_difference(lat1: f64, lat2: f64) -> f64 {
    ((lat2 / 2.0 + FRAC_PI_4).tan() / (lat1 / 2.0 + FRAC_PI_4).tan()).ln()
}

/// Ratio between the latitude difference and its mercator projection. On east-west lines the ratio degenerates to
/// `0/0` and `cos(lat)` is used instead.
fn stretch_factor(d_lat: f64, d_psi: f64, lat1: f64) -> f64 {
    if d_psi.abs() > RHUMB_STRETCH_EPSILON {
        d_lat / d_psi
    } else {
        lat1.cos()
    }
}

/// Longitude of `to` shifted by 360° if needed so that it is within 180° from `from`.
fn unwrapped_longitude(from: f64, to: f64) -> f64 {
    if to - from > 180.0 {
        to - 360.0
    } else if from - to > 180.0 {
        to + 360.0
    } else {
        to
    }
}

impl SphericalMetric for Rhumb {
    fn distance(&self, from: &Coordinate, to: &Coordinate) -> f64 {
        let Some((from, to)) = geographic_pair(from, to) else {
            return f64::INFINITY;
        };

        let lat1 = from.lat_rad();
        let lat2 = to.lat_rad();
        let d_lat = lat2 - lat1;
        let d_lon = (unwrapped_longitude(from.lon(), to.lon()) - from.lon())
            .to_radians()
            .abs();

        let d_psi = projected_latitude_difference(lat1, lat2);
        let q = stretch_factor(d_lat, d_psi, lat1);

        let angular = (d_lat * d_lat + q * q * d_lon * d_lon).sqrt();
        angular * EARTH_RADIUS
    }

    fn bearing(&self, from: &Coordinate, to: &Coordinate) -> f64 {
        let Some((from, to)) = geographic_pair(from, to) else {
            return f64::INFINITY;
        };

        let d_lon = (unwrapped_longitude(from.lon(), to.lon()) - from.lon()).to_radians();
        let d_psi = projected_latitude_difference(from.lat_rad(), to.lat_rad());

        normalize_bearing(d_lon.atan2(d_psi).to_degrees())
    }

    fn destination(&self, from: &Coordinate, distance: f64, bearing: f64) -> Option<Coordinate> {
        let from = from.projected(Projection::Epsg4326)?;

        let angular = distance / EARTH_RADIUS;
        let lat1 = from.lat_rad();
        let lon1 = from.lon_rad();
        let bearing = bearing.to_radians();

        let d_lat = angular * bearing.cos();
        let mut lat2 = lat1 + d_lat;
        // passed over a pole: come back on the other side
        if lat2.abs() > FRAC_PI_2 {
            lat2 = if lat2 > 0.0 { PI - lat2 } else { -PI - lat2 };
        }

        let d_psi = projected_latitude_difference(lat1, lat2);
        let q = stretch_factor(d_lat, d_psi, lat1);
        let d_lon = angular * bearing.sin() / q;
        let lon2 = lon1 + d_lon;

        Some(
            Coordinate::latlon(lat2.to_degrees(), normalize_longitude(lon2.to_degrees()))
                .with_z(from.z()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn philadelphia() -> (Coordinate, Coordinate) {
        (
            Coordinate::latlon(39.984, -75.343),
            Coordinate::latlon(39.123, -75.534),
        )
    }

    #[test]
    fn distance() {
        let (a, b) = philadelphia();
        assert_abs_diff_eq!(Rhumb.distance(&a, &b), 97_129.239_427_721_64, epsilon = 1e-6);
        assert_abs_diff_eq!(Rhumb.distance(&a, &b), Rhumb.distance(&b, &a), epsilon = 1e-6);
        assert_eq!(Rhumb.distance(&a, &a), 0.0);
    }

    #[test]
    fn east_west_line_uses_cosine() {
        let a = Coordinate::latlon(10.0, 0.0);
        let b = Coordinate::latlon(10.0, 1.0);
        let expected = EARTH_RADIUS * 1.0f64.to_radians() * 10.0f64.to_radians().cos();
        assert_abs_diff_eq!(Rhumb.distance(&a, &b), expected, epsilon = 1e-6);
    }

    #[test]
    fn shorter_path_across_antimeridian() {
        let a = Coordinate::latlon(0.0, 179.0);
        let b = Coordinate::latlon(0.0, -179.0);
        assert_abs_diff_eq!(Rhumb.distance(&a, &b), 222_390.160_467_065_8, epsilon = 1e-6);
        assert_abs_diff_eq!(Rhumb.bearing(&a, &b), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(Rhumb.bearing(&b, &a), 270.0, epsilon = 1e-9);
    }

    #[test]
    fn bearing_is_constant() {
        let (a, b) = philadelphia();
        assert_abs_diff_eq!(Rhumb.bearing(&a, &b), 189.705_824_644_274_5, epsilon = 1e-9);
        assert_abs_diff_eq!(Rhumb.final_bearing(&a, &b), Rhumb.bearing(&a, &b), epsilon = 1e-9);
    }

    #[test]
    fn destination_north() {
        let origin = Coordinate::latlon(38.0, -75.0);
        let reached = Rhumb.destination(&origin, 100_000.0, 0.0).unwrap();
        assert_abs_diff_eq!(reached, Coordinate::latlon(38.8993, -75.0), epsilon = 1e-4);
        assert_abs_diff_eq!(reached.y(), 38.899_320_363_724_54, epsilon = 1e-9);
    }

    #[test]
    fn destination_inverts_distance_and_bearing() {
        let (a, b) = philadelphia();
        let reached = Rhumb
            .destination(&a, Rhumb.distance(&a, &b), Rhumb.bearing(&a, &b))
            .unwrap();
        assert!(Rhumb.distance(&reached, &b) < 1.0);
    }

    #[test]
    fn destination_over_the_pole() {
        let origin = Coordinate::latlon(89.0, 0.0);
        let reached = Rhumb.destination(&origin, 222_390.160_467_065_8, 0.0).unwrap();
        assert_abs_diff_eq!(reached.y(), 89.0, epsilon = 1e-9);
    }

    #[test]
    fn planar_coordinates_are_undefined() {
        let a = Coordinate::planar(0.0, 0.0);
        assert_eq!(Rhumb.distance(&a, &a), f64::INFINITY);
        assert_eq!(Rhumb.bearing(&a, &a), f64::INFINITY);
        assert_eq!(Rhumb.destination(&a, 1.0, 0.0), None);
    }
}
