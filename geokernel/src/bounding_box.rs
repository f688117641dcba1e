use serde::{Deserialize, Serialize};

use crate::consts::{EARTH_RADIUS, MAX_MERCATOR_LATITUDE, WGS84_SEMIMAJOR};
use crate::coordinate::Coordinate;
use crate::projection::{Projection, WebMercator};

/// Below this `cos(lat)` a geographic box grown by meters spans all longitudes.
const POLAR_COS_LIMIT: f64 = 1e-6;

/// Axis-aligned rectangle in a single projection.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
    projection: Option<Projection>,
}

/// Anything that can be enclosed into a [`BoundingBox`].
pub trait BoundingBoxRepresentable {
    /// The smallest box containing the object.
    fn bounding_box(&self) -> BoundingBox;
}

impl BoundingBox {
    /// Creates a new box. The corner values are sorted, so the arguments may come in any order.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64, projection: Option<Projection>) -> Self {
        Self {
            x_min: x_min.min(x_max),
            y_min: y_min.min(y_max),
            x_max: x_min.max(x_max),
            y_max: y_min.max(y_max),
            projection,
        }
    }

    /// Creates a box from its south-west and north-east corners. The north-east corner is reprojected into the
    /// projection of the south-west one; `None` if that is not possible.
    pub fn from_corners(south_west: Coordinate, north_east: Coordinate) -> Option<Self> {
        let north_east = north_east.matched_to(south_west.projection())?;
        Some(Self::new(
            south_west.x(),
            south_west.y(),
            north_east.x(),
            north_east.y(),
            south_west.projection(),
        ))
    }

    /// Smallest box containing all the coordinates, in the projection of the first one. Coordinates that cannot be
    /// reconciled with the first one are skipped. Returns `None` for an empty input.
    pub fn from_coordinates<'a>(coordinates: impl IntoIterator<Item = &'a Coordinate>) -> Option<Self> {
        let mut coordinates = coordinates.into_iter();
        let first = coordinates.next()?;
        let projection = first.projection();
        let mut bbox = Self::new(first.x(), first.y(), first.x(), first.y(), projection);

        for c in coordinates.filter_map(|c| c.matched_to(projection)) {
            bbox.x_min = bbox.x_min.min(c.x());
            bbox.y_min = bbox.y_min.min(c.y());
            bbox.x_max = bbox.x_max.max(c.x());
            bbox.y_max = bbox.y_max.max(c.y());
        }

        Some(bbox)
    }

    /// Minimum x.
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Minimum y.
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    /// Maximum x.
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Maximum y.
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Projection of the box.
    pub fn projection(&self) -> Option<Projection> {
        self.projection
    }

    /// Width of the box.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height of the box.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Area of the box, in squared coordinate units.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// The corner with minimum `x` and `y`.
    pub fn south_west(&self) -> Coordinate {
        Coordinate::new(self.x_min, self.y_min, self.projection)
    }

    /// The corner with maximum `x` and `y`.
    pub fn north_east(&self) -> Coordinate {
        Coordinate::new(self.x_max, self.y_max, self.projection)
    }

    /// Center of the box.
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
            self.projection,
        )
    }

    /// Smallest box containing both boxes. Uses the projection of `self`.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
            projection: self.projection,
        }
    }

    /// How much the area of the box grows if it is merged with `other`.
    pub fn enlargement(&self, other: &Self) -> f64 {
        self.merge(other).area() - self.area()
    }

    /// Whether the coordinate lies inside the box or on its boundary. The coordinate is reconciled with the box
    /// projection first.
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        match coordinate.matched_to(self.projection) {
            Some(c) => {
                self.x_min <= c.x() && self.x_max >= c.x() && self.y_min <= c.y() && self.y_max >= c.y()
            }
            None => false,
        }
    }

    /// Whether the boxes share at least one point. Touching boxes intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        self.x_min <= other.x_max
            && self.x_max >= other.x_min
            && self.y_min <= other.y_max
            && self.y_max >= other.y_min
    }

    /// Grows the box by `amount` coordinate units in every direction.
    pub fn expanded_by(&self, amount: f64) -> Self {
        Self {
            x_min: self.x_min - amount,
            y_min: self.y_min - amount,
            x_max: self.x_max + amount,
            y_max: self.y_max + amount,
            projection: self.projection,
        }
    }

    /// Grows the box by a distance in meters, so that it covers every point within `meters` of the original box.
    ///
    /// For geographic boxes the distance is converted into degrees of arc. A degree of longitude shrinks with
    /// `cos(lat)`, so the x growth is taken at the latitude farthest from the equator; boxes reaching the poles grow
    /// over the whole longitude range. Web Mercator boxes are grown by the distance scaled by the Mercator stretch
    /// `1 / cos(lat)` at the edge farthest from the equator and by the ratio of the projection sphere to the earth
    /// sphere. Planar boxes are grown by the value as is.
    pub fn expanded_by_meters(&self, meters: f64) -> Self {
        match self.projection {
            Some(Projection::Epsg4326) => {
                let dy = (meters / EARTH_RADIUS).to_degrees();
                let far_lat = (self.y_min.abs().max(self.y_max.abs()) + dy).min(90.0);
                let cos = far_lat.to_radians().cos();
                let dx = if cos > POLAR_COS_LIMIT {
                    (dy / cos).min(360.0)
                } else {
                    360.0
                };

                Self {
                    x_min: self.x_min - dx,
                    y_min: self.y_min - dy,
                    x_max: self.x_max + dx,
                    y_max: self.y_max + dy,
                    projection: self.projection,
                }
            }
            Some(Projection::Epsg3857) => {
                let far_y = self.y_min.abs().max(self.y_max.abs());
                let (edge_lat, _) = WebMercator::default().unproject(&Coordinate::web_mercator(0.0, far_y));
                let far_lat = (edge_lat + (meters / EARTH_RADIUS).to_degrees()).min(MAX_MERCATOR_LATITUDE);
                self.expanded_by(meters * WGS84_SEMIMAJOR / EARTH_RADIUS / far_lat.to_radians().cos())
            }
            None => self.expanded_by(meters),
        }
    }

    /// Converts the box into another projection by projecting its corners. Returns `None` for planar boxes.
    pub fn projected(&self, target: Projection) -> Option<Self> {
        if self.projection == Some(target) {
            return Some(*self);
        }

        let south_west = self.south_west().projected(target)?;
        let north_east = self.north_east().projected(target)?;
        Self::from_corners(south_west, north_east)
    }

    /// Converts the box into `target`, where `None` means "no SRID". Returns `None` if this is impossible.
    pub fn matched_to(&self, target: Option<Projection>) -> Option<Self> {
        match target {
            Some(target) => self.projected(target),
            None if self.projection.is_none() => Some(*self),
            None => None,
        }
    }
}

impl BoundingBoxRepresentable for BoundingBox {
    fn bounding_box(&self) -> BoundingBox {
        *self
    }
}

impl BoundingBoxRepresentable for Coordinate {
    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.x(), self.y(), self.x(), self.y(), self.projection())
    }
}
