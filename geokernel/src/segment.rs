//! Straight line segment between two coordinates.
//!
//! Projections onto a segment are computed in the plane of the segment's own coordinates (degrees for EPSG:4326),
//! which is a good approximation for short segments, while the reported distances are great-circle ones.

use serde::{Deserialize, Serialize};

use crate::bounding_box::{BoundingBox, BoundingBoxRepresentable};
use crate::consts::{EQUALITY_DELTA, MIN_SEGMENT_LENGTH};
use crate::coordinate::Coordinate;
use crate::measure::{GreatCircle, Rhumb, SphericalMetric};
use crate::projection::Projection;
use crate::traits::{CartesianPoint2d, CartesianPoint2dFloat};

/// Orientation of a triplet of points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Clockwise
    Clockwise,
    /// Counterclockwise
    Counterclockwise,
    /// Collinear
    Collinear,
}

impl Orientation {
    /// Determines orientation of a triplet of points in the plane.
    pub fn triplet(
        p: &impl CartesianPoint2d<Num = f64>,
        q: &impl CartesianPoint2d<Num = f64>,
        r: &impl CartesianPoint2d<Num = f64>,
    ) -> Self {
        let v = (q.y() - p.y()) * (r.x() - q.x()) - (q.x() - p.x()) * (r.y() - q.y());
        if v > 0.0 {
            Self::Clockwise
        } else if v < 0.0 {
            Self::Counterclockwise
        } else {
            Self::Collinear
        }
    }
}

/// Result of comparing one segment with another, see [`LineSegment::compare`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentComparison {
    /// Both segments have the same endpoints, in any order.
    Equal,
    /// The segments do not overlap.
    NotEqual,
    /// This segment lies on the other one.
    ThisOnOther,
    /// The other segment lies on this one.
    OtherOnThis,
}

/// A segment of a line, with its position in the coordinate sequence it was taken from.
///
/// Both endpoints are always in the same projection. Equality compares endpoints and is orientation-sensitive.
#[derive(Debug, Copy, Clone)]
pub struct LineSegment {
    first: Coordinate,
    second: Coordinate,
    index: Option<usize>,
    bbox: BoundingBox,
}

impl LineSegment {
    /// Creates a segment. `second` is reprojected into the projection of `first`; if that is impossible (a planar and a
    /// projected coordinate) it is kept as is and earth-model operations on the segment yield undefined results.
    pub fn new(first: Coordinate, second: Coordinate) -> Self {
        let second = second.matched_to(first.projection()).unwrap_or(second);
        let bbox = BoundingBox::new(
            first.x(),
            first.y(),
            second.x(),
            second.y(),
            first.projection(),
        );

        Self {
            first,
            second,
            index: None,
            bbox,
        }
    }

    /// Sets the index of the segment in its parent line.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Start of the segment.
    pub fn first(&self) -> Coordinate {
        self.first
    }

    /// End of the segment.
    pub fn second(&self) -> Coordinate {
        self.second
    }

    /// Both endpoints.
    pub fn coordinates(&self) -> [Coordinate; 2] {
        [self.first, self.second]
    }

    /// Index of the segment in its parent line, if known.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Projection of the segment.
    pub fn projection(&self) -> Option<Projection> {
        self.first.projection()
    }

    /// Same segment in the opposite direction.
    pub fn reversed(&self) -> Self {
        let mut reversed = Self::new(self.second, self.first);
        reversed.index = self.index;
        reversed
    }

    /// Converts the segment into `target` (`None` meaning no SRID).
    pub fn matched_to(&self, target: Option<Projection>) -> Option<Self> {
        if self.projection() == target {
            return Some(*self);
        }

        let mut segment = Self::new(self.first.matched_to(target)?, self.second.matched_to(target)?);
        segment.index = self.index;
        Some(segment)
    }

    /// Great-circle length in meters.
    pub fn length(&self) -> f64 {
        GreatCircle.distance(&self.first, &self.second)
    }

    /// Rhumb line length in meters.
    pub fn rhumb_length(&self) -> f64 {
        Rhumb.distance(&self.first, &self.second)
    }

    /// Great-circle midpoint.
    pub fn midpoint(&self) -> Option<Coordinate> {
        GreatCircle.midpoint(&self.first, &self.second)
    }

    /// Projects `coordinate` onto the line through the segment.
    ///
    /// The position of the foot is computed as a weight along the segment with the planar dot product. If the foot
    /// falls before `first` or after `second`, `None` is returned, unless `clamp_to_ends` is set, in which case the
    /// nearest endpoint is returned instead. Segments shorter than a meter are treated as a point and always return
    /// `first`. Altitude is interpolated if both endpoints have one.
    ///
    /// Returns `None` if `coordinate` cannot be reconciled with the segment projection.
    pub fn perpendicular_foot(&self, coordinate: &Coordinate, clamp_to_ends: bool) -> Option<Coordinate> {
        let direction = self.second.sub(&self.first);
        let length_sq = direction.norm_squared();
        if length_sq == 0.0 || self.length() < MIN_SEGMENT_LENGTH {
            return Some(self.first);
        }

        let coordinate = coordinate.matched_to(self.projection())?;
        let weight = coordinate.sub(&self.first).dot(&direction) / length_sq;

        if weight < 0.0 {
            return clamp_to_ends.then_some(self.first);
        }
        if weight > 1.0 {
            return clamp_to_ends.then_some(self.second);
        }

        let z = match (self.first.z(), self.second.z()) {
            (Some(z1), Some(z2)) => Some(z1 + (z2 - z1) * weight),
            _ => None,
        };

        Some(
            Coordinate::new(
                self.first.x() + direction.x * weight,
                self.first.y() + direction.y * weight,
                self.projection(),
            )
            .with_z(z),
        )
    }

    /// Nearest coordinate of the segment to `from`, and the great-circle distance to it in meters.
    pub fn nearest_coordinate(&self, from: &Coordinate) -> Option<(Coordinate, f64)> {
        let foot = self.perpendicular_foot(from, true)?;
        let distance = GreatCircle.distance(&foot, from);
        Some((foot, distance))
    }

    /// Distance from the coordinate to the segment in meters, `f64::INFINITY` if it is undefined.
    pub fn distance_from(&self, coordinate: &Coordinate) -> f64 {
        self.nearest_coordinate(coordinate)
            .map_or(f64::INFINITY, |(_, distance)| distance)
    }

    /// Whether the coordinate lies on the segment.
    ///
    /// Uses the triangle inequality in the plane of the segment coordinates: the point is on the segment if the path
    /// through it is as long as the segment itself, within [`EQUALITY_DELTA`].
    pub fn check_is_on_segment(&self, coordinate: &Coordinate) -> bool {
        let Some(coordinate) = coordinate.matched_to(self.projection()) else {
            return false;
        };

        let detour = self.first.planar_distance(&coordinate) + coordinate.planar_distance(&self.second)
            - self.first.planar_distance(&self.second);
        detour.abs() < EQUALITY_DELTA
    }

    /// Returns true, if the segment has at least one common point with the `other` segment (in the plane).
    pub fn intersects(&self, other: &LineSegment) -> bool {
        fn on_segment(p: &Coordinate, q: &Coordinate, r: &Coordinate) -> bool {
            q.x() <= p.x().max(r.x())
                && q.x() >= p.x().min(r.x())
                && q.y() <= p.y().max(r.y())
                && q.y() >= p.y().min(r.y())
        }

        let Some(other) = other.matched_to(self.projection()) else {
            return false;
        };
        let (p1, q1, p2, q2) = (&self.first, &self.second, &other.first, &other.second);

        let o1 = Orientation::triplet(p1, q1, p2);
        let o2 = Orientation::triplet(p1, q1, q2);
        let o3 = Orientation::triplet(p2, q2, p1);
        let o4 = Orientation::triplet(p2, q2, q1);

        if o1 != o2 && o3 != o4 {
            return true;
        }

        (o1 == Orientation::Collinear && on_segment(p1, p2, q1))
            || (o2 == Orientation::Collinear && on_segment(p1, q2, q1))
            || (o3 == Orientation::Collinear && on_segment(p2, p1, q2))
            || (o4 == Orientation::Collinear && on_segment(p2, q1, q2))
    }

    /// The single point where two segments cross, computed in the plane.
    ///
    /// Returns `None` for parallel or collinear segments and for segments that do not reach each other.
    pub fn intersection(&self, other: &LineSegment) -> Option<Coordinate> {
        let other = other.matched_to(self.projection())?;

        let d1 = self.second.sub(&self.first);
        let d2 = other.second.sub(&other.first);
        let denominator = d1.perp(&d2);
        if denominator.abs() < EQUALITY_DELTA * EQUALITY_DELTA {
            return None;
        }

        let offset = other.first.sub(&self.first);
        let t = offset.perp(&d2) / denominator;
        let u = offset.perp(&d1) / denominator;
        if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
            return None;
        }

        Some(Coordinate::new(
            self.first.x() + d1.x * t,
            self.first.y() + d1.y * t,
            self.projection(),
        ))
    }

    /// Classifies how this segment relates to `other`.
    ///
    /// With `tolerance == 0` endpoints must match exactly and "lies on" uses [`LineSegment::check_is_on_segment`]. A
    /// positive `tolerance` (meters) also accepts endpoints within that distance of the other segment.
    pub fn compare(&self, other: &LineSegment, tolerance: f64) -> SegmentComparison {
        let Some(other) = other.matched_to(self.projection()) else {
            return SegmentComparison::NotEqual;
        };

        let coincide = |a: &Coordinate, b: &Coordinate| {
            a.equals_2d(b) || (tolerance > 0.0 && GreatCircle.distance(a, b) <= tolerance)
        };
        let lies_on = |segment: &LineSegment, c: &Coordinate| {
            segment.check_is_on_segment(c) || (tolerance > 0.0 && segment.distance_from(c) <= tolerance)
        };

        if (coincide(&self.first, &other.first) && coincide(&self.second, &other.second))
            || (coincide(&self.first, &other.second) && coincide(&self.second, &other.first))
        {
            SegmentComparison::Equal
        } else if lies_on(&other, &self.first) && lies_on(&other, &self.second) {
            SegmentComparison::ThisOnOther
        } else if lies_on(self, &other.first) && lies_on(self, &other.second) {
            SegmentComparison::OtherOnThis
        } else {
            SegmentComparison::NotEqual
        }
    }
}

impl PartialEq for LineSegment {
    fn eq(&self, other: &Self) -> bool {
        self.first == other.first && self.second == other.second
    }
}

impl BoundingBoxRepresentable for LineSegment {
    fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }
}
