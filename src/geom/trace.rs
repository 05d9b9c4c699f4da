//! Tubes traced along a spine inside a drawn silhouette.
//!
//! The spine is walked in fixed arc-length steps. At each step a ray is cast
//! to the left and to the right of the spine direction; the nearest boundary
//! hits on each side form one transverse [`Segment`]. Every segment is then
//! inflated into a ring whose diameter is the segment itself, and rings are
//! stitched exactly like lathe rings.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use super::intersect::{nearest_ray_hit_with_tolerance, segments_intersect, segments_intersect_with_tolerance};
use super::mesh::{GeomContext, GeomMesh, finalize_mesh};
use super::metrics::TimingBucket;
use super::path::{point_and_tangent_at_length_with_tolerance, total_length};
use super::ring::{
    ConfigError, RingMeshBuilder, RingShape, TopologyCounts, check_count_per_ring, check_sample_length,
};
use super::sampler::morph_polylines;
use super::{Point2, Point3, Tolerance, Transform};

/// One transverse slice of the boundary, `p1` on the left of the spine and
/// `p2` on the right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub p1: Point2,
    pub p2: Point2,
}

impl Segment {
    #[must_use]
    pub const fn new(p1: Point2, p2: Point2) -> Self {
        Self { p1, p2 }
    }

    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        self.p1.midpoint(self.p2)
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.p1.distance_to(self.p2)
    }

    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.length() * 0.5
    }

    /// Rotation about Z that turns a ring's local Y axis onto the segment.
    #[must_use]
    pub fn lean_angle(&self) -> f64 {
        (self.p2 - self.p1).angle() + FRAC_PI_2
    }

    #[must_use]
    pub fn crosses(&self, other: &Segment) -> bool {
        segments_intersect(self.p1, self.p2, other.p1, other.p2)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.p1.is_finite() && self.p2.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossSectionTraceConfig {
    pub count_per_ring: usize,
    pub wrap_start: bool,
    pub wrap_end: bool,
    /// Spine step between consecutive slices.
    pub sample_length: f64,
    pub cross_section: Option<Vec<Point2>>,
}

impl Default for CrossSectionTraceConfig {
    fn default() -> Self {
        Self {
            count_per_ring: 10,
            wrap_start: false,
            wrap_end: false,
            sample_length: 0.1,
            cross_section: None,
        }
    }
}

impl CrossSectionTraceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_count_per_ring(self.count_per_ring)?;
        check_sample_length(self.sample_length)
    }
}

/// Casts rays along `spine` against `boundary` and collects the slices.
///
/// Steps where either side misses the boundary produce nothing. A slice that
/// crosses the previously emitted slice is dropped, so no two consecutive
/// results intersect.
#[must_use]
pub fn trace_segments(boundary: &[Point2], spine: &[Point2], config: &CrossSectionTraceConfig) -> Vec<Segment> {
    let mut ctx = GeomContext::new();
    trace_segments_with_context(boundary, spine, config, &mut ctx)
}

#[must_use]
pub fn trace_segments_with_context(
    boundary: &[Point2],
    spine: &[Point2],
    config: &CrossSectionTraceConfig,
    ctx: &mut GeomContext,
) -> Vec<Segment> {
    if boundary.len() < 2 || spine.len() < 2 {
        return Vec::new();
    }
    if check_sample_length(config.sample_length).is_err() {
        log::debug!("trace_segments: invalid sample length {}", config.sample_length);
        return Vec::new();
    }

    let tol = ctx.tolerance;
    ctx.metrics
        .time(TimingBucket::Tracing, || walk_spine(boundary, spine, config.sample_length, tol))
}

fn walk_spine(boundary: &[Point2], spine: &[Point2], sample_length: f64, tol: Tolerance) -> Vec<Segment> {
    let total = total_length(spine);
    if !total.is_finite() {
        log::debug!("trace_segments: spine length overflows, nothing to trace");
        return Vec::new();
    }
    let mut segments: Vec<Segment> = Vec::new();
    let mut missed = 0usize;
    let mut crossed = 0usize;

    let mut step = 0usize;
    loop {
        let distance = step as f64 * sample_length;
        if distance >= total {
            break;
        }
        step += 1;

        let Some(frame) = point_and_tangent_at_length_with_tolerance(spine, distance, tol) else {
            break;
        };
        let normal = frame.direction.perpendicular();

        let left = nearest_ray_hit_with_tolerance(frame.origin, normal, boundary, tol);
        let right = nearest_ray_hit_with_tolerance(frame.origin, -normal, boundary, tol);
        let (Some(p1), Some(p2)) = (left, right) else {
            missed += 1;
            continue;
        };

        let segment = Segment::new(p1, p2);
        if segments
            .last()
            .is_some_and(|previous| segments_intersect_with_tolerance(previous.p1, previous.p2, p1, p2, tol))
        {
            log::trace!("trace_segments: step {} crosses previous slice", step - 1);
            crossed += 1;
            continue;
        }
        segments.push(segment);
    }

    if missed > 0 || crossed > 0 {
        log::debug!(
            "trace_segments: {} slices from {step} steps ({missed} missed the boundary, {crossed} crossed)",
            segments.len()
        );
    }
    segments
}

/// Turns slices into a ring mesh, one ring per slice.
///
/// Non-finite slices are skipped. Fewer than one usable slice, or a
/// `count_per_ring` below 3, gives an empty mesh with zero counts.
#[must_use]
pub fn inflate(segments: &[Segment], config: &CrossSectionTraceConfig) -> (GeomMesh, TopologyCounts) {
    let mut ctx = GeomContext::new();
    inflate_with_context(segments, config, &mut ctx)
}

#[must_use]
pub fn inflate_with_context(
    segments: &[Segment],
    config: &CrossSectionTraceConfig,
    ctx: &mut GeomContext,
) -> (GeomMesh, TopologyCounts) {
    let n = config.count_per_ring;
    let usable: Vec<&Segment> = segments.iter().filter(|s| s.is_finite()).collect();
    if usable.len() != segments.len() {
        log::debug!("inflate: skipped {} non-finite segments", segments.len() - usable.len());
    }
    if usable.is_empty() {
        return (GeomMesh::default(), TopologyCounts::default());
    }

    let Some(mut builder) = RingMeshBuilder::new(usable.len(), n) else {
        log::debug!("inflate: count_per_ring {n} cannot form a ring");
        return (GeomMesh::default(), TopologyCounts::default());
    };
    let shape = RingShape::from_cross_section(config.cross_section.as_deref(), n);

    ctx.metrics.time(TimingBucket::Inflate, || {
        for segment in &usable {
            builder.push_ring(segment_ring(segment, &shape, n));
        }
    });

    let (positions, indices, counts) = ctx
        .metrics
        .time(TimingBucket::Triangulation, || builder.finish(config.wrap_start, config.wrap_end));

    (finalize_mesh(positions, indices, &mut ctx.metrics), counts)
}

fn segment_ring(segment: &Segment, shape: &RingShape, n: usize) -> impl Iterator<Item = Point3> {
    let mid = segment.midpoint();
    let radius = segment.half_width();
    let orient = Transform::rotate_z(segment.lean_angle());
    (0..n).map(move |i| {
        let v = orient.apply_point(shape.local_point(i, n, radius));
        Point3::new(v.x + mid.x, v.y + mid.y, v.z)
    })
}

/// `inflate(trace_segments(boundary, spine, config), config)`.
#[must_use]
pub fn trace(boundary: &[Point2], spine: &[Point2], config: &CrossSectionTraceConfig) -> (GeomMesh, TopologyCounts) {
    let mut ctx = GeomContext::new();
    trace_with_context(boundary, spine, config, &mut ctx)
}

#[must_use]
pub fn trace_with_context(
    boundary: &[Point2],
    spine: &[Point2],
    config: &CrossSectionTraceConfig,
    ctx: &mut GeomContext,
) -> (GeomMesh, TopologyCounts) {
    let segments = trace_segments_with_context(boundary, spine, config, ctx);
    inflate_with_context(&segments, config, ctx)
}

/// Derives a spine for a closed outline with no explicit spine.
///
/// The outline is split at the first vertex reaching half its arc length; the
/// two halves (the second one reversed so both run the same way) are
/// resampled to `ceil(length / sample_length)` points and averaged. Returns
/// an empty polyline when the outline is too short or the split lands on its
/// last point.
#[must_use]
pub fn auto_generate_chordal_axis(boundary: &[Point2], sample_length: f64) -> Vec<Point2> {
    if boundary.len() < 2 || check_sample_length(sample_length).is_err() {
        return Vec::new();
    }

    let total = total_length(boundary);
    if Tolerance::ZERO_LENGTH.is_zero_length(total) {
        return Vec::new();
    }

    // Symmetric outlines put a vertex exactly at half the length; summation
    // order must not push it to the next vertex.
    let halfway = total * 0.5 - Tolerance::DEFAULT.eps * total;
    let mut walked = 0.0;
    let mut split = None;
    for (i, edge) in boundary.windows(2).enumerate() {
        let len = edge[0].distance_to(edge[1]);
        if len.is_finite() {
            walked += len;
        }
        if walked >= halfway {
            split = Some(i + 1);
            break;
        }
    }

    let Some(split) = split.filter(|&s| s < boundary.len() - 1) else {
        log::debug!("auto_generate_chordal_axis: degenerate split for {} points", boundary.len());
        return Vec::new();
    };

    let first = &boundary[..split];
    let second: Vec<Point2> = boundary[split + 1..].iter().rev().copied().collect();
    let count = ((total / sample_length).ceil() as usize).max(2);

    morph_polylines(first, &second, 0.5, count)
}
