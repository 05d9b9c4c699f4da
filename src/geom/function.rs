//! Treats a polyline as `y = f(x)`.
//!
//! Graph curves (the lean/offset graphs of a lathe) are drawn left to right,
//! so their x values increase monotonically. Every query here locates the
//! bracketing segment with an upper-bound search: the first vertex whose x is
//! strictly greater than the query. Queries left of the first vertex or at/after
//! the last vertex are out of domain and fall back to neutral values (0 for
//! values and angles, a horizontal unit tangent for directions).

use super::Point2;

/// Index of the segment `[points[i], points[i + 1]]` bracketing `x`, if any.
fn bracket(points: &[Point2], x: f64) -> Option<usize> {
    if points.len() < 2 || !x.is_finite() {
        return None;
    }
    let upper = points.partition_point(|p| p.x <= x);
    if upper == 0 || upper == points.len() {
        return None;
    }
    Some(upper - 1)
}

/// Linearly interpolated `y` at `x`; 0 when `x` lies outside the curve.
#[must_use]
pub fn value_at(points: &[Point2], x: f64) -> f64 {
    let Some(seg) = bracket(points, x) else {
        return 0.0;
    };
    let (a, b) = (points[seg], points[seg + 1]);
    let span = b.x - a.x;
    if span <= 0.0 {
        return a.y;
    }
    let value = a.y + (b.y - a.y) * ((x - a.x) / span);
    if value.is_finite() { value } else { 0.0 }
}

/// `dy/dx` of the bracketing segment; 0 when `x` lies outside the curve.
#[must_use]
pub fn slope_at(points: &[Point2], x: f64) -> f64 {
    let Some(seg) = bracket(points, x) else {
        return 0.0;
    };
    let delta = points[seg + 1] - points[seg];
    if delta.x <= 0.0 {
        return 0.0;
    }
    let slope = delta.y / delta.x;
    if slope.is_finite() { slope } else { 0.0 }
}

/// Unit direction of the bracketing segment.
///
/// Out of domain (or on a zero-length segment) this is `(1, 0)`.
#[must_use]
pub fn tangent_at(points: &[Point2], x: f64) -> Point2 {
    bracket(points, x)
        .and_then(|seg| (points[seg + 1] - points[seg]).normalized())
        .unwrap_or(Point2::new(1.0, 0.0))
}

/// Angle in radians of [`tangent_at`].
#[must_use]
pub fn tangent_angle_at(points: &[Point2], x: f64) -> f64 {
    tangent_at(points, x).angle()
}

/// Smoothed tangent angle at `x`.
///
/// Sums the unit directions of the bracketing segment and up to
/// `neighbor_count` segments either side of it (clamped at the ends of the
/// curve) and returns the angle of that sum. Zero-length segments contribute
/// nothing. Returns 0 out of domain.
#[must_use]
pub fn average_tangent_angle_at(points: &[Point2], x: f64, neighbor_count: usize) -> f64 {
    let Some(seg) = bracket(points, x) else {
        return 0.0;
    };
    let last_segment = points.len() - 2;
    let first = seg.saturating_sub(neighbor_count);
    let last = seg.saturating_add(neighbor_count).min(last_segment);

    let sum = (first..=last)
        .filter_map(|i| (points[i + 1] - points[i]).normalized())
        .fold(Point2::ZERO, |acc, dir| acc + dir);

    if sum.length_squared() <= f64::EPSILON {
        log::trace!("average_tangent_angle_at: directions cancel at x = {x}");
        return 0.0;
    }
    sum.angle()
}

/// Drops every point whose x does not strictly exceed the last kept x.
///
/// This is the rule graph curves are recorded with, so the result always
/// satisfies the monotonic precondition of the queries above.
#[must_use]
pub fn retain_monotonic(points: &[Point2]) -> Vec<Point2> {
    let mut kept: Vec<Point2> = Vec::with_capacity(points.len());
    for &p in points {
        if !p.is_finite() {
            continue;
        }
        match kept.last() {
            Some(last) if p.x <= last.x => {}
            _ => kept.push(p),
        }
    }
    kept
}
