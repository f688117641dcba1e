//! Operations on lines given as coordinate sequences.

use serde::{Deserialize, Serialize};

use crate::consts::MIN_SEGMENT_LENGTH;
use crate::coordinate::Coordinate;
use crate::measure::{GreatCircle, Rhumb, SphericalMetric};
use crate::segment::LineSegment;

/// Splits a line into consecutive segments. Segment `i` goes from coordinate `i` to coordinate `i + 1` and carries
/// `i` as its index.
pub fn line_segments(coordinates: &[Coordinate]) -> Vec<LineSegment> {
    coordinates
        .windows(2)
        .enumerate()
        .map(|(index, pair)| LineSegment::new(pair[0], pair[1]).with_index(index))
        .collect()
}

/// Result of [`nearest_coordinate_on_line`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestCoordinate {
    /// The coordinate on the line.
    pub coordinate: Coordinate,
    /// Great-circle distance from the query coordinate, meters.
    pub distance: f64,
    /// Index of the segment the coordinate lies on.
    pub segment_index: usize,
}

/// Finds the coordinate of the line nearest to `from`.
///
/// Segments are scanned in order, and the scan stops as soon as a candidate closer than a meter is found. The last
/// coordinate of the line is always a candidate too and wins ties. A single-coordinate line returns that coordinate.
///
/// Returns `None` for an empty line, or if `from` cannot be reconciled with the projection of the line.
pub fn nearest_coordinate_on_line(coordinates: &[Coordinate], from: &Coordinate) -> Option<NearestCoordinate> {
    let last = coordinates.last()?;
    from.matched_to(last.projection())?;

    let mut nearest: Option<NearestCoordinate> = None;
    for segment in line_segments(coordinates) {
        let Some((coordinate, distance)) = segment.nearest_coordinate(from) else {
            continue;
        };

        if nearest.map_or(true, |n| distance < n.distance) {
            nearest = Some(NearestCoordinate {
                coordinate,
                distance,
                segment_index: segment.index().unwrap_or_default(),
            });
        }

        if distance < MIN_SEGMENT_LENGTH {
            break;
        }
    }

    let last_distance = GreatCircle.distance(last, from);
    match nearest {
        Some(nearest) if nearest.distance < last_distance => Some(nearest),
        _ => Some(NearestCoordinate {
            coordinate: *last,
            distance: last_distance,
            segment_index: coordinates.len().saturating_sub(2),
        }),
    }
}

/// Distance from the coordinate to the nearest point of the line, in meters.
///
/// Returns `f64::INFINITY` for an empty line or when the distance is undefined.
pub fn distance_from_line(coordinates: &[Coordinate], from: &Coordinate) -> f64 {
    match coordinates {
        [] => f64::INFINITY,
        [single] => GreatCircle.distance(single, from),
        _ => line_segments(coordinates)
            .iter()
            .map(|segment| segment.distance_from(from))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Great-circle length of the line in meters.
pub fn line_length(coordinates: &[Coordinate]) -> f64 {
    length_with(&GreatCircle, coordinates)
}

/// Rhumb line length of the line in meters.
pub fn rhumb_line_length(coordinates: &[Coordinate]) -> f64 {
    length_with(&Rhumb, coordinates)
}

fn length_with(metric: &impl SphericalMetric, coordinates: &[Coordinate]) -> f64 {
    coordinates
        .windows(2)
        .map(|pair| metric.distance(&pair[0], &pair[1]))
        .sum()
}
