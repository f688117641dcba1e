//! Clipping of lines and polygons by a [`BoundingBox`].
//!
//! Lines are clipped with the Cohen-Sutherland algorithm and may split into several parts. Polygon rings are clipped
//! with the Sutherland-Hodgman algorithm, one box edge at a time. All computations are done in the plane of the
//! coordinates: the box is converted into the projection of the geometry first.

use std::mem;

use log::debug;

use crate::bounding_box::BoundingBox;
use crate::coordinate::Coordinate;

/// Outcode of a coordinate inside the box.
pub const INSIDE: u8 = 0;
/// Outcode bit: to the left of the box.
pub const LEFT: u8 = 1;
/// Outcode bit: to the right of the box.
pub const RIGHT: u8 = 2;
/// Outcode bit: below the box.
pub const BOTTOM: u8 = 4;
/// Outcode bit: above the box.
pub const TOP: u8 = 8;

/// Cohen-Sutherland outcode of the coordinate relative to the box. Coordinates on the boundary are inside.
pub fn outcode(coordinate: &Coordinate, bbox: &BoundingBox) -> u8 {
    let mut code = INSIDE;

    if coordinate.x() < bbox.x_min() {
        code |= LEFT;
    } else if coordinate.x() > bbox.x_max() {
        code |= RIGHT;
    }

    if coordinate.y() < bbox.y_min() {
        code |= BOTTOM;
    } else if coordinate.y() > bbox.y_max() {
        code |= TOP;
    }

    code
}

/// Point where the segment `a -> b` crosses the line of the box edge given by the outcode bits. Top and bottom edges
/// take precedence over the side ones.
fn intersect_edge(a: &Coordinate, b: &Coordinate, edge: u8, bbox: &BoundingBox) -> Coordinate {
    let (x, y, t) = if edge & TOP != 0 {
        let t = (bbox.y_max() - a.y()) / (b.y() - a.y());
        (a.x() + (b.x() - a.x()) * t, bbox.y_max(), t)
    } else if edge & BOTTOM != 0 {
        let t = (bbox.y_min() - a.y()) / (b.y() - a.y());
        (a.x() + (b.x() - a.x()) * t, bbox.y_min(), t)
    } else if edge & RIGHT != 0 {
        let t = (bbox.x_max() - a.x()) / (b.x() - a.x());
        (bbox.x_max(), a.y() + (b.y() - a.y()) * t, t)
    } else {
        let t = (bbox.x_min() - a.x()) / (b.x() - a.x());
        (bbox.x_min(), a.y() + (b.y() - a.y()) * t, t)
    };

    let z = match (a.z(), b.z()) {
        (Some(z1), Some(z2)) => Some(z1 + (z2 - z1) * t),
        _ => None,
    };

    a.with_xy(x, y, a.projection()).with_z(z)
}

/// Brings the coordinates and the box into the projection of the first coordinate.
fn reconcile(coordinates: &[Coordinate], bbox: &BoundingBox) -> Option<(Vec<Coordinate>, BoundingBox)> {
    let projection = coordinates.first()?.projection();

    let Some(bbox) = bbox.matched_to(projection) else {
        debug!(
            "Clipping box in {:?} cannot be converted into {:?}",
            bbox.projection(),
            projection
        );
        return None;
    };

    let Some(coordinates) = coordinates
        .iter()
        .map(|c| c.matched_to(projection))
        .collect::<Option<Vec<_>>>()
    else {
        debug!("Geometry mixes planar and projected coordinates, skipping clipping");
        return None;
    };

    Some((coordinates, bbox))
}

/// Clips a line by the box.
///
/// Every run of the line inside the box becomes a separate part. Parts start and end on the box boundary unless the
/// line itself starts or ends inside the box. A line fully inside the box is returned unchanged as a single part.
pub fn clip_line(coordinates: &[Coordinate], bbox: &BoundingBox) -> Vec<Vec<Coordinate>> {
    let Some((coordinates, bbox)) = reconcile(coordinates, bbox) else {
        return Vec::new();
    };
    let Some(first) = coordinates.first() else {
        return Vec::new();
    };

    let last_index = coordinates.len() - 1;
    let mut parts = Vec::new();
    let mut part = Vec::new();
    let mut code_a = outcode(first, &bbox);

    for i in 1..coordinates.len() {
        let mut a = coordinates[i - 1];
        let mut b = coordinates[i];
        let last_code = outcode(&b, &bbox);
        let mut code_b = last_code;

        loop {
            if code_a | code_b == INSIDE {
                part.push(a);

                if code_b != last_code {
                    // the segment leaves the box
                    part.push(b);
                    if i < last_index {
                        parts.push(mem::take(&mut part));
                    }
                } else if i == last_index {
                    part.push(b);
                }
                break;
            } else if code_a & code_b != 0 {
                break;
            } else if code_a != INSIDE {
                a = intersect_edge(&a, &b, code_a, &bbox);
                code_a = outcode(&a, &bbox);
            } else {
                b = intersect_edge(&a, &b, code_b, &bbox);
                code_b = outcode(&b, &bbox);
            }
        }

        code_a = last_code;
    }

    if !part.is_empty() {
        parts.push(part);
    }

    parts.retain(|part| part.len() >= 2);
    parts
}

/// Clips every line by the box and collects all the resulting parts.
pub fn clip_lines(lines: &[Vec<Coordinate>], bbox: &BoundingBox) -> Vec<Vec<Coordinate>> {
    lines.iter().flat_map(|line| clip_line(line, bbox)).collect()
}

/// Clips a polygon ring by the box.
///
/// The ring may be given closed or open; the result is always closed. Returns `None` if nothing of the ring is left
/// inside the box, or if fewer than three distinct coordinates remain.
pub fn clip_ring(ring: &[Coordinate], bbox: &BoundingBox) -> Option<Vec<Coordinate>> {
    let (mut ring, bbox) = reconcile(ring, bbox)?;

    for edge in [LEFT, RIGHT, BOTTOM, TOP] {
        let Some(&last) = ring.last() else {
            break;
        };

        let mut clipped = Vec::with_capacity(ring.len() + 1);
        let mut prev = last;
        let mut prev_inside = outcode(&prev, &bbox) & edge == 0;

        for &current in &ring {
            let inside = outcode(&current, &bbox) & edge == 0;
            if inside != prev_inside {
                clipped.push(intersect_edge(&prev, &current, edge, &bbox));
            }
            if inside {
                clipped.push(current);
            }

            prev = current;
            prev_inside = inside;
        }

        ring = clipped;
    }

    // crossing points of edges touching the ring are emitted twice
    ring.dedup_by(|a, b| a.equals_2d(b));
    if ring.len() > 1 && ring[0].equals_2d(&ring[ring.len() - 1]) {
        ring.pop();
    }

    if ring.len() < 3 {
        debug!("Ring degenerated to {} distinct coordinates after clipping", ring.len());
        return None;
    }

    ring.push(ring[0]);
    Some(ring)
}

/// Clips a polygon given as its exterior ring followed by holes.
///
/// Returns `None` if the exterior ring is clipped away. Holes that are clipped away are omitted from the result.
pub fn clip_polygon(rings: &[Vec<Coordinate>], bbox: &BoundingBox) -> Option<Vec<Vec<Coordinate>>> {
    let (exterior, holes) = rings.split_first()?;
    let exterior = clip_ring(exterior, bbox)?;

    let mut clipped = vec![exterior];
    clipped.extend(holes.iter().filter_map(|hole| clip_ring(hole, bbox)));

    Some(clipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Projection;

    fn square_box() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 10.0, 10.0, None)
    }

    fn planar(coordinates: &[(f64, f64)]) -> Vec<Coordinate> {
        coordinates.iter().map(|&(x, y)| Coordinate::planar(x, y)).collect()
    }

    #[test]
    fn outcodes() {
        let bbox = square_box();
        assert_eq!(outcode(&Coordinate::planar(5.0, 5.0), &bbox), INSIDE);
        assert_eq!(outcode(&Coordinate::planar(0.0, 10.0), &bbox), INSIDE);
        assert_eq!(outcode(&Coordinate::planar(-1.0, 5.0), &bbox), LEFT);
        assert_eq!(outcode(&Coordinate::planar(11.0, 5.0), &bbox), RIGHT);
        assert_eq!(outcode(&Coordinate::planar(5.0, -1.0), &bbox), BOTTOM);
        assert_eq!(outcode(&Coordinate::planar(11.0, 11.0), &bbox), RIGHT | TOP);
        assert_eq!(outcode(&Coordinate::planar(-1.0, -1.0), &bbox), LEFT | BOTTOM);
    }

    #[test]
    fn line_inside_is_unchanged() {
        let line = planar(&[(1.0, 1.0), (2.0, 5.0), (9.0, 9.0)]);
        assert_eq!(clip_line(&line, &square_box()), vec![line]);
    }

    #[test]
    fn line_outside_is_removed() {
        let line = planar(&[(-1.0, -1.0), (-5.0, 20.0), (20.0, 20.0)]);
        assert!(clip_line(&line, &square_box()).is_empty());
    }

    #[test]
    fn line_crossing_the_box() {
        let line = planar(&[(-5.0, 5.0), (15.0, 5.0)]);
        assert_eq!(
            clip_line(&line, &square_box()),
            vec![planar(&[(0.0, 5.0), (10.0, 5.0)])]
        );
    }

    #[test]
    fn line_leaving_and_entering() {
        let line = planar(&[(5.0, 5.0), (15.0, 5.0), (15.0, 8.0), (5.0, 8.0)]);
        assert_eq!(
            clip_line(&line, &square_box()),
            vec![
                planar(&[(5.0, 5.0), (10.0, 5.0)]),
                planar(&[(10.0, 8.0), (5.0, 8.0)]),
            ]
        );
    }

    #[test]
    fn geographic_line_crossing_the_box() {
        let bbox = BoundingBox::from_corners(
            Coordinate::latlon(39.0959, -77.7255),
            Coordinate::latlon(39.5972, -77.0361),
        )
        .unwrap();
        let line = [Coordinate::latlon(39.3, -78.0), Coordinate::latlon(39.4, -76.8)];

        let parts = clip_line(&line, &bbox);
        assert_eq!(parts.len(), 1);
        let part = &parts[0];
        assert_eq!(part.len(), 2);
        assert_eq!(part[0].x(), -77.7255);
        assert_eq!(part[1].x(), -77.0361);
        assert!(part.iter().all(|c| bbox.contains(c)));
    }

    #[test]
    fn box_is_reprojected() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0, Some(Projection::Epsg4326))
            .projected(Projection::Epsg3857)
            .unwrap();
        let line = [Coordinate::latlon(5.0, -5.0), Coordinate::latlon(5.0, 5.0)];

        let parts = clip_line(&line, &bbox);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0][0].projection(), Some(Projection::Epsg4326));
        approx::assert_abs_diff_eq!(parts[0][0].x(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn incompatible_projections() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0, Some(Projection::Epsg4326));
        let line = planar(&[(1.0, 1.0), (2.0, 2.0)]);
        assert!(clip_line(&line, &bbox).is_empty());
        assert_eq!(clip_ring(&line, &bbox), None);
    }

    #[test]
    fn altitude_is_interpolated() {
        let line = [
            Coordinate::planar(-10.0, 5.0).with_altitude(0.0),
            Coordinate::planar(10.0, 5.0).with_altitude(100.0),
        ];
        let parts = clip_line(&line, &square_box());
        assert_eq!(parts[0][0].z(), Some(50.0));
        assert_eq!(parts[0][1].z(), Some(100.0));
    }

    #[test]
    fn multiple_lines() {
        let lines = vec![
            planar(&[(-5.0, 5.0), (15.0, 5.0)]),
            planar(&[(20.0, 20.0), (30.0, 30.0)]),
            planar(&[(1.0, 1.0), (2.0, 2.0)]),
        ];
        assert_eq!(clip_lines(&lines, &square_box()).len(), 2);
    }

    #[test]
    fn ring_partially_inside() {
        let ring = planar(&[(-5.0, -5.0), (5.0, -5.0), (5.0, 5.0), (-5.0, 5.0), (-5.0, -5.0)]);
        assert_eq!(
            clip_ring(&ring, &square_box()),
            Some(planar(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 5.0), (0.0, 0.0)]))
        );
    }

    #[test]
    fn ring_inside_is_unchanged() {
        let ring = planar(&[(1.0, 1.0), (9.0, 1.0), (9.0, 9.0), (1.0, 1.0)]);
        assert_eq!(clip_ring(&ring, &square_box()), Some(ring.clone()));

        // open rings are closed
        assert_eq!(clip_ring(&ring[..3], &square_box()), Some(ring));
    }

    #[test]
    fn ring_outside_is_removed() {
        let ring = planar(&[(20.0, 20.0), (30.0, 20.0), (30.0, 30.0), (20.0, 20.0)]);
        assert_eq!(clip_ring(&ring, &square_box()), None);
    }

    #[test]
    fn ring_touching_the_box_edge_is_removed() {
        let ring = planar(&[(-5.0, 0.0), (0.0, 0.0), (0.0, 5.0), (-5.0, 0.0)]);
        assert_eq!(clip_ring(&ring, &square_box()), None);
        assert_eq!(clip_polygon(&[ring], &square_box()), None);
    }

    #[test]
    fn repeated_coordinates_are_merged() {
        let ring = planar(&[(1.0, 1.0), (1.0, 1.0), (9.0, 1.0), (9.0, 9.0), (9.0, 9.0), (1.0, 1.0)]);
        assert_eq!(
            clip_ring(&ring, &square_box()),
            Some(planar(&[(1.0, 1.0), (9.0, 1.0), (9.0, 9.0), (1.0, 1.0)]))
        );
    }

    #[test]
    fn degenerate_ring_is_removed() {
        let ring = planar(&[(1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(clip_ring(&ring, &square_box()), None);
        assert_eq!(clip_ring(&[], &square_box()), None);
    }

    #[test]
    fn polygons() {
        let exterior = planar(&[(-5.0, -5.0), (5.0, -5.0), (5.0, 5.0), (-5.0, 5.0), (-5.0, -5.0)]);
        let inner_hole = planar(&[(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 1.0)]);
        let outer_hole = planar(&[(-4.0, -4.0), (-3.0, -4.0), (-3.0, -3.0), (-4.0, -4.0)]);

        let clipped = clip_polygon(
            &[exterior.clone(), inner_hole.clone(), outer_hole],
            &square_box(),
        )
        .unwrap();
        assert_eq!(clipped.len(), 2);
        assert_eq!(clipped[1], inner_hole);

        let far = BoundingBox::new(100.0, 100.0, 110.0, 110.0, None);
        assert_eq!(clip_polygon(&[exterior, inner_hole], &far), None);
        assert_eq!(clip_polygon(&[], &far), None);
    }
}
