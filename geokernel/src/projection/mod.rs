//! Supported projections and conversions between them.
//!
//! Only two earth models are supported: geographic coordinates in degrees ([`Projection::Epsg4326`]) and spherical
//! Web Mercator in meters ([`Projection::Epsg3857`]). Planar coordinates without a reference system are represented by
//! a [`Coordinate`](crate::Coordinate) with no projection at all.

mod web_mercator;

pub use web_mercator::WebMercator;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GeoKernelError;

/// Coordinate reference system of a [`Coordinate`](crate::Coordinate).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Projection {
    /// Geographic coordinates: `x` is longitude and `y` is latitude, both in degrees.
    Epsg4326,
    /// Spherical Web Mercator: `x` is easting and `y` is northing, in meters.
    Epsg3857,
}

impl Projection {
    /// Canonical SRID of the projection.
    pub const fn srid(&self) -> i32 {
        match self {
            Self::Epsg4326 => 4326,
            Self::Epsg3857 => 3857,
        }
    }

    /// Looks up a projection by SRID. Besides the canonical codes, the legacy aliases of Web Mercator found in the wild
    /// (900913, 3587, 3785, 102100, 102113, 54004, 41001) are accepted.
    pub fn from_srid(srid: i32) -> Option<Self> {
        match srid {
            4326 => Some(Self::Epsg4326),
            3857 | 900913 | 3587 | 3785 | 102100 | 102113 | 54004 | 41001 => Some(Self::Epsg3857),
            _ => None,
        }
    }
}

impl TryFrom<i32> for Projection {
    type Error = GeoKernelError;

    fn try_from(srid: i32) -> Result<Self, Self::Error> {
        Self::from_srid(srid).ok_or(GeoKernelError::UnknownSrid(srid))
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.srid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn srid_aliases() {
        assert_eq!(Projection::from_srid(4326), Some(Projection::Epsg4326));
        assert_eq!(Projection::from_srid(3857), Some(Projection::Epsg3857));
        assert_eq!(Projection::from_srid(900913), Some(Projection::Epsg3857));
        assert_eq!(Projection::from_srid(3587), Some(Projection::Epsg3857));
        assert_eq!(Projection::from_srid(0), None);

        assert_eq!(Projection::Epsg3857.srid(), 3857);
        assert_eq!(Projection::Epsg4326.to_string(), "EPSG:4326");
    }

    #[test]
    fn unknown_srid_is_an_error() {
        assert_matches!(
            Projection::try_from(2154),
            Err(GeoKernelError::UnknownSrid(2154))
        );
    }
}
