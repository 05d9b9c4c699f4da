//! Ray/segment and segment/segment predicates used by the cross-section tracer.

use super::{Point2, Tolerance};

/// Relative threshold below which a ray and a segment are treated as parallel.
const PARALLEL_EPS: f64 = 1e-12;

/// Intersects the ray `origin + t * direction` (`t >= 0`) with segment `a..b`.
///
/// `direction` does not need to be normalized. Parallel (or collinear) pairs
/// and zero-length inputs produce `None`, as do hits behind the origin or
/// outside the segment.
#[must_use]
pub fn ray_segment(origin: Point2, direction: Point2, a: Point2, b: Point2) -> Option<Point2> {
    ray_segment_with_tolerance(origin, direction, a, b, Tolerance::DEFAULT)
}

/// [`ray_segment`] with an explicit tolerance for the parameter bounds.
///
/// The segment parameter is accepted on `[-eps, 1 + eps]` and the ray
/// parameter on `[-eps, inf)`, so hits exactly on a shared boundary vertex
/// are not lost to rounding.
#[must_use]
pub fn ray_segment_with_tolerance(
    origin: Point2,
    direction: Point2,
    a: Point2,
    b: Point2,
    tol: Tolerance,
) -> Option<Point2> {
    let edge = b - a;
    let det = direction.cross(edge);
    let scale = direction.length() * edge.length();
    if !det.is_finite() || !scale.is_finite() || scale <= 0.0 || det.abs() <= PARALLEL_EPS * scale {
        return None;
    }

    let w = a - origin;
    let t = w.cross(edge) / det;
    let s = w.cross(direction) / det;

    if t < -tol.eps || s < -tol.eps || s > 1.0 + tol.eps {
        return None;
    }

    let hit = a + edge * s.clamp(0.0, 1.0);
    hit.is_finite().then_some(hit)
}

/// Signed doubled area of triangle `a, b, c`; positive when counter-clockwise.
#[must_use]
pub fn orient2d(a: Point2, b: Point2, c: Point2) -> f64 {
    (b - a).cross(c - a)
}

/// True when segments `p1..p2` and `p3..p4` share at least one point.
///
/// Touching at an endpoint and collinear overlap both count.
#[must_use]
pub fn segments_intersect(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> bool {
    segments_intersect_with_tolerance(p1, p2, p3, p4, Tolerance::DEFAULT)
}

#[must_use]
pub fn segments_intersect_with_tolerance(
    p1: Point2,
    p2: Point2,
    p3: Point2,
    p4: Point2,
    tol: Tolerance,
) -> bool {
    let o1 = orient2d(p1, p2, p3);
    let o2 = orient2d(p1, p2, p4);
    let o3 = orient2d(p3, p4, p1);
    let o4 = orient2d(p3, p4, p2);

    if o1.abs() <= tol.eps && within_bounds(p1, p3, p2, tol) {
        return true;
    }
    if o2.abs() <= tol.eps && within_bounds(p1, p4, p2, tol) {
        return true;
    }
    if o3.abs() <= tol.eps && within_bounds(p3, p1, p4, tol) {
        return true;
    }
    if o4.abs() <= tol.eps && within_bounds(p3, p2, p4, tol) {
        return true;
    }

    let straddles_first = (o1 > tol.eps && o2 < -tol.eps) || (o1 < -tol.eps && o2 > tol.eps);
    let straddles_second = (o3 > tol.eps && o4 < -tol.eps) || (o3 < -tol.eps && o4 > tol.eps);
    straddles_first && straddles_second
}

/// `p` lies inside the axis-aligned box spanned by `a` and `b`.
fn within_bounds(a: Point2, p: Point2, b: Point2, tol: Tolerance) -> bool {
    p.x >= a.x.min(b.x) - tol.eps
        && p.x <= a.x.max(b.x) + tol.eps
        && p.y >= a.y.min(b.y) - tol.eps
        && p.y <= a.y.max(b.y) + tol.eps
}

/// Nearest hit of a ray against every edge of an open polyline.
///
/// Returns the intersection closest to `origin`, or `None` if no edge is hit.
#[must_use]
pub fn nearest_ray_hit(origin: Point2, direction: Point2, boundary: &[Point2]) -> Option<Point2> {
    nearest_ray_hit_with_tolerance(origin, direction, boundary, Tolerance::DEFAULT)
}

#[must_use]
pub fn nearest_ray_hit_with_tolerance(
    origin: Point2,
    direction: Point2,
    boundary: &[Point2],
    tol: Tolerance,
) -> Option<Point2> {
    boundary
        .windows(2)
        .filter_map(|edge| ray_segment_with_tolerance(origin, direction, edge[0], edge[1], tol))
        .map(|hit| (origin.distance_to(hit), hit))
        .min_by(|(da, _), (db, _)| da.total_cmp(db))
        .map(|(_, hit)| hit)
}
