//! Polyline resampling and morphing.
//!
//! Drawn curves arrive with whatever spacing the pointer produced. Everything
//! downstream (ring placement, trace steps, per-index correspondence between
//! two curves) wants either a fixed spacing or a fixed count, so both flavours
//! live here.

use super::path::total_length;
use super::{Point2, Tolerance};

/// Walks `points` by arc length and emits a point at every multiple of
/// `sample_length`, starting with the first input point.
///
/// The trailing remainder shorter than `sample_length` is dropped, so the
/// final input point is only included when the total length is an exact
/// multiple. Consecutive output points are never farther apart than
/// `sample_length`.
///
/// Returns an empty polyline for fewer than two input points or a
/// non-positive/non-finite `sample_length`.
#[must_use]
pub fn resample_by_length(points: &[Point2], sample_length: f64) -> Vec<Point2> {
    if points.len() < 2 {
        return Vec::new();
    }
    if !sample_length.is_finite() || sample_length <= 0.0 {
        log::debug!("resample_by_length: ignoring sample length {sample_length}");
        return Vec::new();
    }

    let segments = measured_segments(points);
    let total = segments.iter().map(|(_, _, len)| len).sum::<f64>();

    // Truncation, not rounding: the remainder past the last whole step is dropped.
    let steps = (total / sample_length).floor() as usize;

    let mut samples = Vec::with_capacity(steps + 1);
    samples.push(points[0]);

    let mut accumulated = 0.0;
    let mut seg_idx = 0;

    for step in 1..=steps {
        let target = step as f64 * sample_length;

        while seg_idx < segments.len() && accumulated + segments[seg_idx].2 < target {
            accumulated += segments[seg_idx].2;
            seg_idx += 1;
        }

        let Some(&(start, end, seg_len)) = segments.get(seg_idx) else {
            // Accumulated rounding pushed the target past the end.
            samples.push(points[points.len() - 1]);
            continue;
        };

        let t = if Tolerance::ZERO_LENGTH.is_zero_length(seg_len) {
            0.0
        } else {
            ((target - accumulated) / seg_len).clamp(0.0, 1.0)
        };
        samples.push(start.lerp(end, t));
    }

    samples
}

/// Resamples `points` to exactly `count` points placed at uniform arc-length
/// fractions `i / (count - 1)`, keeping the first and last input points
/// exactly.
///
/// A single input point is repeated `count` times; an empty input stays
/// empty.
#[must_use]
pub fn resample_to_count(points: &[Point2], count: usize) -> Vec<Point2> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![first];
    }

    let last = points[points.len() - 1];
    let segments = measured_segments(points);
    let total = segments.iter().map(|(_, _, len)| len).sum::<f64>();

    if points.len() < 2 || total <= Tolerance::ZERO_LENGTH.eps {
        return vec![first; count];
    }

    let mut samples = Vec::with_capacity(count);
    samples.push(first);

    let mut accumulated = 0.0;
    let mut seg_idx = 0;

    for step in 1..count - 1 {
        let target = (step as f64 / (count - 1) as f64) * total;

        while seg_idx < segments.len() && accumulated + segments[seg_idx].2 < target {
            accumulated += segments[seg_idx].2;
            seg_idx += 1;
        }

        let Some(&(start, end, seg_len)) = segments.get(seg_idx) else {
            samples.push(last);
            continue;
        };

        let t = if Tolerance::ZERO_LENGTH.is_zero_length(seg_len) {
            0.0
        } else {
            ((target - accumulated) / seg_len).clamp(0.0, 1.0)
        };
        samples.push(start.lerp(end, t));
    }

    samples.push(last);
    samples
}

/// Vertex-wise interpolation between two polylines over their common length.
#[must_use]
pub fn lerp_polylines(a: &[Point2], b: &[Point2], t: f64) -> Vec<Point2> {
    a.iter().zip(b).map(|(pa, pb)| pa.lerp(*pb, t)).collect()
}

/// Resamples both polylines to `count` points, then interpolates at `t`.
///
/// `t = 0` reproduces `a`, `t = 1` reproduces `b`, `t = 0.5` is the curve
/// halfway between them.
#[must_use]
pub fn morph_polylines(a: &[Point2], b: &[Point2], t: f64, count: usize) -> Vec<Point2> {
    lerp_polylines(&resample_to_count(a, count), &resample_to_count(b, count), t)
}

fn measured_segments(points: &[Point2]) -> Vec<(Point2, Point2, f64)> {
    points
        .windows(2)
        .filter_map(|pair| {
            let len = pair[0].distance_to(pair[1]);
            len.is_finite().then_some((pair[0], pair[1], len))
        })
        .collect()
}

/// Average spacing of a resampled polyline; handy for sanity checks.
#[must_use]
pub fn mean_spacing(points: &[Point2]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    total_length(points) / (points.len() - 1) as f64
}
