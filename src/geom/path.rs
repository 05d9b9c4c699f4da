//! Arc-length queries over polylines.

use super::{Point2, Tolerance};

/// A position on a path together with the unit direction of travel there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathRay {
    pub origin: Point2,
    pub direction: Point2,
}

/// Sum of consecutive segment lengths. Zero for fewer than two points.
#[must_use]
pub fn total_length(points: &[Point2]) -> f64 {
    points
        .windows(2)
        .map(|pair| pair[0].distance_to(pair[1]))
        .filter(|len| len.is_finite())
        .sum()
}

/// Cumulative arc length at every vertex (first entry is 0).
#[must_use]
pub fn arc_lengths(points: &[Point2]) -> Vec<f64> {
    let mut lengths = Vec::with_capacity(points.len());
    let mut cumulative = 0.0;
    if !points.is_empty() {
        lengths.push(cumulative);
    }
    for pair in points.windows(2) {
        let segment_length = pair[0].distance_to(pair[1]);
        if segment_length.is_finite() {
            cumulative += segment_length;
        }
        lengths.push(cumulative);
    }
    lengths
}

/// Position and travel direction at arc length `distance` along `points`.
///
/// Distances past either end clamp to the first/last non-degenerate segment:
/// a negative distance yields the start of the path, a distance beyond the
/// total length yields the end of the final segment with that segment's
/// direction. Zero-length segments never supply a direction.
///
/// Returns `None` when the path has no segment of non-zero length.
#[must_use]
pub fn point_and_tangent_at_length(points: &[Point2], distance: f64) -> Option<PathRay> {
    point_and_tangent_at_length_with_tolerance(points, distance, Tolerance::ZERO_LENGTH)
}

#[must_use]
pub fn point_and_tangent_at_length_with_tolerance(
    points: &[Point2],
    distance: f64,
    tol: Tolerance,
) -> Option<PathRay> {
    if points.len() < 2 || !distance.is_finite() {
        return None;
    }

    let mut accumulated = 0.0;
    let mut last_valid: Option<(Point2, Point2)> = None;

    for pair in points.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let seg_len = start.distance_to(end);
        if !seg_len.is_finite() || tol.is_zero_length(seg_len) {
            continue;
        }
        let direction = (end - start) / seg_len;

        if distance <= accumulated + seg_len {
            let t = ((distance - accumulated) / seg_len).clamp(0.0, 1.0);
            return Some(PathRay {
                origin: start.lerp(end, t),
                direction,
            });
        }

        accumulated += seg_len;
        last_valid = Some((end, direction));
    }

    last_valid.map(|(end, direction)| PathRay { origin: end, direction })
}
