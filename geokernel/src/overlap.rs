//! Detection of overlapping parts of two lines.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::bounding_box::BoundingBoxRepresentable;
use crate::coordinate::Coordinate;
use crate::line::line_segments;
use crate::rtree::RTree;
use crate::segment::{LineSegment, SegmentComparison};

/// A segment of the second line that overlaps a segment of the first one.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentOverlap {
    /// Segment of the second line, as given.
    #[serde(with = "segment_serde")]
    pub segment: LineSegment,
    /// How `segment` relates to `matched`.
    pub kind: SegmentComparison,
    /// Segment of the first line.
    #[serde(with = "segment_serde")]
    pub matched: LineSegment,
}

/// Finds the segments of `b` that overlap segments of `a`.
///
/// The segments of `a` are indexed with an [`RTree`]. For every segment of `b` the candidates whose boxes intersect
/// its box (grown by `tolerance` meters) are compared with [`LineSegment::compare`], in the order of their indices. An
/// `Equal` or `ThisOnOther` match is recorded and ends the search for that segment; `OtherOnThis` matches are recorded
/// and the search goes on.
///
/// Segments of `b` that cannot be brought into the projection of `a` are skipped.
pub fn overlapping_segments(a: &[LineSegment], b: &[LineSegment], tolerance: f64) -> Vec<SegmentOverlap> {
    let Some(projection) = a.first().map(LineSegment::projection) else {
        return Vec::new();
    };
    let tolerance = tolerance.max(0.0);
    let tree: RTree<LineSegment> = a.iter().filter_map(|s| s.matched_to(projection)).collect();

    let mut overlaps = Vec::new();
    for original in b {
        let Some(segment) = original.matched_to(projection) else {
            trace!("Segment {:?} cannot be compared in {:?}", original.index(), projection);
            continue;
        };

        let query = segment.bounding_box().expanded_by_meters(tolerance);
        let mut candidates = tree.search(&query);
        candidates.sort_by_key(|candidate| candidate.index());

        for candidate in candidates {
            let kind = segment.compare(candidate, tolerance);
            if kind == SegmentComparison::NotEqual {
                continue;
            }

            trace!(
                "Segment {:?} is {:?} to segment {:?}",
                original.index(),
                kind,
                candidate.index()
            );
            overlaps.push(SegmentOverlap {
                segment: *original,
                kind,
                matched: *candidate,
            });

            if matches!(kind, SegmentComparison::Equal | SegmentComparison::ThisOnOther) {
                break;
            }
        }
    }

    trace!(
        "Found {} overlaps of {} segments against {} indexed segments",
        overlaps.len(),
        b.len(),
        tree.len()
    );
    overlaps
}

/// Same as [`overlapping_segments`] for lines given as coordinate sequences.
pub fn overlapping_line_segments(a: &[Coordinate], b: &[Coordinate], tolerance: f64) -> Vec<SegmentOverlap> {
    overlapping_segments(&line_segments(a), &line_segments(b), tolerance)
}

/// Whether any segment of `b` overlaps a segment of `a`.
pub fn lines_overlap(a: &[Coordinate], b: &[Coordinate], tolerance: f64) -> bool {
    !overlapping_line_segments(a, b, tolerance).is_empty()
}

mod segment_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::coordinate::Coordinate;
    use crate::segment::LineSegment;

    #[derive(Serialize, Deserialize)]
    struct SegmentRepr {
        first: Coordinate,
        second: Coordinate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    }

    pub fn serialize<S: Serializer>(segment: &LineSegment, serializer: S) -> Result<S::Ok, S::Error> {
        SegmentRepr {
            first: segment.first(),
            second: segment.second(),
            index: segment.index(),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<LineSegment, D::Error> {
        let repr = SegmentRepr::deserialize(deserializer)?;
        let segment = LineSegment::new(repr.first, repr.second);
        Ok(match repr.index {
            Some(index) => segment.with_index(index),
            None => segment,
        })
    }
}
