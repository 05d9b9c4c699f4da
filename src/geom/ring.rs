//! Ring placement and ring-to-ring triangulation shared by the lathe and the
//! cross-section tracer.
//!
//! Both generators emit a sequence of rings of `count_per_ring` vertices each.
//! Rings are appended in order, then stitched with two triangles per angular
//! slot, and optionally closed with triangle fans at either end. Triangles are
//! always emitted in the same order: side quads, start cap, end cap.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::sampler::resample_to_count;
use super::{Point2, Point3};

/// Smallest ring that still encloses area.
pub const MIN_COUNT_PER_RING: usize = 3;

/// Rejected generator configuration.
///
/// Generators themselves never fail; callers run `validate` on their config
/// before generating.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("count_per_ring must be at least 3 (got {count})")]
    CountPerRingTooSmall { count: usize },
    #[error("sample length must be finite and positive (got {0})")]
    InvalidSampleLength(f64),
    #[error("{name} must be finite")]
    NonFiniteScale { name: &'static str },
}

pub(crate) fn check_count_per_ring(count: usize) -> Result<(), ConfigError> {
    if count < MIN_COUNT_PER_RING {
        return Err(ConfigError::CountPerRingTooSmall { count });
    }
    Ok(())
}

pub(crate) fn check_sample_length(sample_length: f64) -> Result<(), ConfigError> {
    if !sample_length.is_finite() || sample_length <= 0.0 {
        return Err(ConfigError::InvalidSampleLength(sample_length));
    }
    Ok(())
}

/// Cross-section used to place the vertices of one ring.
///
/// Chosen once per generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RingShape {
    /// Vertex `i` at angle `2πi / count_per_ring` on a circle.
    Circular,
    /// Vertex `i` is the `i`-th point of a closed outline already resampled to
    /// `count_per_ring` points; outline x maps to ring z, outline y to ring y.
    CustomCurve(Vec<Point2>),
}

impl RingShape {
    /// Custom shape when `cross_section` has at least three points, circular
    /// otherwise.
    #[must_use]
    pub fn from_cross_section(cross_section: Option<&[Point2]>, count_per_ring: usize) -> Self {
        match cross_section {
            Some(outline) if outline.len() >= MIN_COUNT_PER_RING => {
                Self::CustomCurve(resample_to_count(outline, count_per_ring))
            }
            Some(outline) => {
                log::debug!(
                    "cross-section with {} points ignored, using circular rings",
                    outline.len()
                );
                Self::Circular
            }
            None => Self::Circular,
        }
    }

    /// Ring vertex `i` in the ring's local frame: the ring lies in the YZ
    /// plane around the origin and is scaled by `radius`.
    #[must_use]
    pub fn local_point(&self, i: usize, count_per_ring: usize, radius: f64) -> Point3 {
        match self {
            Self::Circular => {
                let theta = std::f64::consts::TAU * i as f64 / count_per_ring as f64;
                Point3::new(0.0, radius * theta.cos(), radius * theta.sin())
            }
            Self::CustomCurve(points) => {
                let c = points.get(i).copied().unwrap_or_default();
                Point3::new(0.0, c.y * radius, c.x * radius)
            }
        }
    }
}

/// Sizes of the semantic regions of a generated mesh.
///
/// Triangles are laid out side quads first, then the start cap, then the end
/// cap, so each region maps to a contiguous range of `GeomMesh::indices`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TopologyCounts {
    pub side_quad_triangle_count: usize,
    pub start_cap_point_count: usize,
    pub end_cap_point_count: usize,
}

impl TopologyCounts {
    #[must_use]
    pub fn start_cap_triangle_count(&self) -> usize {
        self.start_cap_point_count.saturating_sub(2)
    }

    #[must_use]
    pub fn end_cap_triangle_count(&self) -> usize {
        self.end_cap_point_count.saturating_sub(2)
    }

    #[must_use]
    pub fn total_triangle_count(&self) -> usize {
        self.side_quad_triangle_count + self.start_cap_triangle_count() + self.end_cap_triangle_count()
    }

    #[must_use]
    pub fn side_index_range(&self) -> Range<usize> {
        0..self.side_quad_triangle_count * 3
    }

    #[must_use]
    pub fn start_cap_index_range(&self) -> Range<usize> {
        let start = self.side_index_range().end;
        start..start + self.start_cap_triangle_count() * 3
    }

    #[must_use]
    pub fn end_cap_index_range(&self) -> Range<usize> {
        let start = self.start_cap_index_range().end;
        start..start + self.end_cap_triangle_count() * 3
    }
}

/// Flat vertex/index arena that rings are appended to.
#[derive(Debug)]
pub(crate) struct RingMeshBuilder {
    count_per_ring: usize,
    positions: Vec<[f64; 3]>,
    indices: Vec<u32>,
}

impl RingMeshBuilder {
    /// Reserves space for `ring_count` rings.
    ///
    /// `None` when `count_per_ring` is below [`MIN_COUNT_PER_RING`] or the
    /// vertices would not be addressable by `u32` indices.
    pub(crate) fn new(ring_count: usize, count_per_ring: usize) -> Option<Self> {
        if count_per_ring < MIN_COUNT_PER_RING {
            return None;
        }
        let vertex_count = ring_count.checked_mul(count_per_ring)?;
        if u32::try_from(vertex_count).is_err() {
            log::debug!("ring mesh with {vertex_count} vertices exceeds u32 indexing");
            return None;
        }
        Some(Self {
            count_per_ring,
            positions: Vec::with_capacity(vertex_count),
            indices: Vec::new(),
        })
    }

    pub(crate) fn ring_count(&self) -> usize {
        self.positions.len() / self.count_per_ring
    }

    /// Appends one ring; `ring` must yield exactly `count_per_ring` points.
    pub(crate) fn push_ring(&mut self, ring: impl IntoIterator<Item = Point3>) {
        let before = self.positions.len();
        self.positions.extend(ring.into_iter().map(Point3::to_array));
        debug_assert_eq!(self.positions.len() - before, self.count_per_ring);
    }

    /// Stitches all rings and adds the requested caps.
    pub(crate) fn finish(mut self, wrap_start: bool, wrap_end: bool) -> (Vec<[f64; 3]>, Vec<u32>, TopologyCounts) {
        let rings = self.ring_count();
        let n = self.count_per_ring;

        let side_quad_triangle_count = rings.saturating_sub(1) * n * 2;
        let start_cap_point_count = if wrap_start && rings > 0 { n } else { 0 };
        let end_cap_point_count = if wrap_end && rings > 0 { n } else { 0 };

        let counts = TopologyCounts {
            side_quad_triangle_count,
            start_cap_point_count,
            end_cap_point_count,
        };
        self.indices.reserve(counts.total_triangle_count() * 3);

        for ring in 0..rings.saturating_sub(1) {
            self.stitch(ring);
        }
        if start_cap_point_count > 0 {
            self.start_fan(0);
        }
        if end_cap_point_count > 0 {
            self.end_fan((rings - 1) * n);
        }

        debug_assert_eq!(self.indices.len(), counts.total_triangle_count() * 3);
        (self.positions, self.indices, counts)
    }

    // Vertex counts were bounded by u32::MAX in `new`, so these casts are lossless.

    fn stitch(&mut self, ring: usize) {
        let n = self.count_per_ring;
        let base = ring * n;
        for i in 0..n {
            let p1 = (base + i) as u32;
            let p2 = (base + (i + 1) % n) as u32;
            let p3 = p1 + n as u32;
            let p4 = p2 + n as u32;
            self.indices.extend_from_slice(&[p1, p3, p2, p2, p3, p4]);
        }
    }

    fn start_fan(&mut self, start: usize) {
        let s = start as u32;
        for i in 0..(self.count_per_ring - 2) as u32 {
            self.indices.extend_from_slice(&[s, s + 1 + i, s + 2 + i]);
        }
    }

    fn end_fan(&mut self, start: usize) {
        let s = start as u32;
        for i in 0..(self.count_per_ring - 2) as u32 {
            self.indices.extend_from_slice(&[s + 2 + i, s + 1 + i, s]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_ring(shape: &RingShape, n: usize, x: f64) -> Vec<Point3> {
        (0..n)
            .map(|i| {
                let p = shape.local_point(i, n, 1.0);
                Point3::new(p.x + x, p.y, p.z)
            })
            .collect()
    }

    #[test]
    fn test_circular_local_points() {
        let shape = RingShape::Circular;
        let p0 = shape.local_point(0, 4, 2.0);
        let p1 = shape.local_point(1, 4, 2.0);
        assert!((p0.y - 2.0).abs() < 1e-12 && p0.z.abs() < 1e-12);
        assert!(p1.y.abs() < 1e-12 && (p1.z - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_short_cross_section_falls_back_to_circle() {
        let outline = [Point2::new(0.0, 1.0), Point2::new(1.0, 0.0)];
        assert_eq!(RingShape::from_cross_section(Some(&outline), 6), RingShape::Circular);
        assert_eq!(RingShape::from_cross_section(None, 6), RingShape::Circular);
    }

    #[test]
    fn test_custom_cross_section_maps_axes() {
        let outline = [
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(-1.0, 0.0),
            Point2::new(0.0, -1.0),
        ];
        let shape = RingShape::from_cross_section(Some(&outline), 4);
        let RingShape::CustomCurve(points) = &shape else {
            panic!("expected custom shape");
        };
        assert_eq!(points.len(), 4);
        let p = shape.local_point(0, 4, 3.0);
        assert_eq!(p, Point3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn test_builder_rejects_small_rings() {
        assert!(RingMeshBuilder::new(2, 2).is_none());
        assert!(RingMeshBuilder::new(2, 3).is_some());
    }

    #[test]
    fn test_two_rings_with_caps() {
        let shape = RingShape::Circular;
        let mut builder = RingMeshBuilder::new(2, 4).unwrap();
        builder.push_ring(unit_ring(&shape, 4, 0.0));
        builder.push_ring(unit_ring(&shape, 4, 1.0));
        let (positions, indices, counts) = builder.finish(true, true);

        assert_eq!(positions.len(), 8);
        assert_eq!(indices.len(), 36);
        assert_eq!(counts.side_quad_triangle_count, 8);
        assert_eq!(counts.start_cap_triangle_count(), 2);
        assert_eq!(counts.side_index_range(), 0..24);
        assert_eq!(counts.start_cap_index_range(), 24..30);
        assert_eq!(counts.end_cap_index_range(), 30..36);
        assert_eq!(&indices[0..6], &[0, 4, 1, 1, 4, 5]);
        assert_eq!(&indices[24..27], &[0, 1, 2]);
        assert_eq!(&indices[30..33], &[6, 5, 4]);
    }

    #[test]
    fn test_single_ring_has_no_sides() {
        let mut builder = RingMeshBuilder::new(1, 5).unwrap();
        builder.push_ring(unit_ring(&RingShape::Circular, 5, 0.0));
        let (_, indices, counts) = builder.finish(false, true);
        assert_eq!(counts.side_quad_triangle_count, 0);
        assert_eq!(counts.end_cap_point_count, 5);
        assert_eq!(indices.len(), 9);
    }

    #[test]
    fn test_empty_builder_has_no_caps() {
        let builder = RingMeshBuilder::new(0, 4).unwrap();
        let (positions, indices, counts) = builder.finish(true, true);
        assert!(positions.is_empty());
        assert!(indices.is_empty());
        assert_eq!(counts, TopologyCounts::default());
    }
}
