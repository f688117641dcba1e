use crate::consts::EARTH_RADIUS;
use crate::coordinate::Coordinate;
use crate::measure::{geographic_pair, SphericalMetric};
use crate::projection::Projection;
use crate::traits::GeoPoint;
use crate::units::{normalize_bearing, normalize_longitude};

/// Great-circle (haversine) formulas on a sphere of radius [`EARTH_RADIUS`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct GreatCircle;

impl SphericalMetric for GreatCircle {
    fn distance(&self, from: &Coordinate, to: &Coordinate) -> f64 {
        let Some((from, to)) = geographic_pair(from, to) else {
            return f64::INFINITY;
        };

        let d_lat = (to.lat() - from.lat()).to_radians();
        let d_lon = (to.lon() - from.lon()).to_radians();

        let h = (d_lat / 2.0).sin().powi(2)
            + from.lat_rad().cos() * to.lat_rad().cos() * (d_lon / 2.0).sin().powi(2);

        2.0 * EARTH_RADIUS * h.sqrt().atan2((1.0 - h).sqrt())
    }

    fn bearing(&self, from: &Coordinate, to: &Coordinate) -> f64 {
        let Some((from, to)) = geographic_pair(from, to) else {
            return f64::INFINITY;
        };

        let lat1 = from.lat_rad();
        let lat2 = to.lat_rad();
        let d_lon = (to.lon() - from.lon()).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

        normalize_bearing(y.atan2(x).to_degrees())
    }

    fn destination(&self, from: &Coordinate, distance: f64, bearing: f64) -> Option<Coordinate> {
        let from = from.projected(Projection::Epsg4326)?;

        let lat1 = from.lat_rad();
        let lon1 = from.lon_rad();
        let bearing = bearing.to_radians();
        let angular = distance / EARTH_RADIUS;

        let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
        let lon2 = lon1
            + (bearing.sin() * angular.sin() * lat1.cos())
                .atan2(angular.cos() - lat1.sin() * lat2.sin());

        Some(
            Coordinate::latlon(lat2.to_degrees(), normalize_longitude(lon2.to_degrees()))
                .with_z(from.z()),
        )
    }
}
