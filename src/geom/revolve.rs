//! Lathe generation: one ring per profile point, revolved around the X axis.
//!
//! A profile point `(x, radius)` produces a ring in the plane `X = x`. Optional
//! graph curves bend the lathe: `graph_y` offsets each ring along Y by the
//! graph's value at `x` and leans it about Z by the graph's smoothed slope;
//! `graph_z` does the same along Z, leaning about Y.

use serde::{Deserialize, Serialize};

use super::function::{average_tangent_angle_at, value_at};
use super::mesh::{GeomContext, GeomMesh, finalize_mesh};
use super::metrics::TimingBucket;
use super::ring::{ConfigError, RingMeshBuilder, RingShape, TopologyCounts, check_count_per_ring};
use super::{Point2, Point3, Transform};

/// Segments either side of `x` averaged when deriving the lean angle.
pub const LEAN_NEIGHBOR_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevolveConfig {
    pub count_per_ring: usize,
    /// Multiplies every profile radius.
    pub scale_radius: f64,
    /// Scales ring Y before the `graph_y` offset is added.
    pub scale_y: f64,
    /// Scales ring Z before the `graph_z` offset is added.
    pub scale_z: f64,
    /// Fraction of the graph's tangent angle applied as ring lean.
    pub lean_scalar: f64,
    pub wrap_start: bool,
    pub wrap_end: bool,
    pub graph_y: Option<Vec<Point2>>,
    pub graph_z: Option<Vec<Point2>>,
    pub cross_section: Option<Vec<Point2>>,
}

impl Default for RevolveConfig {
    fn default() -> Self {
        Self {
            count_per_ring: 10,
            scale_radius: 1.0,
            scale_y: 1.0,
            scale_z: 1.0,
            lean_scalar: 0.25,
            wrap_start: false,
            wrap_end: false,
            graph_y: None,
            graph_z: None,
            cross_section: None,
        }
    }
}

impl RevolveConfig {
    #[must_use]
    pub fn with_count_per_ring(mut self, count_per_ring: usize) -> Self {
        self.count_per_ring = count_per_ring;
        self
    }

    #[must_use]
    pub fn with_caps(mut self, wrap_start: bool, wrap_end: bool) -> Self {
        self.wrap_start = wrap_start;
        self.wrap_end = wrap_end;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_count_per_ring(self.count_per_ring)?;
        for (name, value) in [
            ("scale_radius", self.scale_radius),
            ("scale_y", self.scale_y),
            ("scale_z", self.scale_z),
            ("lean_scalar", self.lean_scalar),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteScale { name });
            }
        }
        Ok(())
    }
}

/// Revolves `profile` into a lathe mesh.
///
/// Profiles with fewer than two points, or a `count_per_ring` below 3, give
/// an empty mesh.
#[must_use]
pub fn revolve(profile: &[Point2], config: &RevolveConfig) -> GeomMesh {
    let mut ctx = GeomContext::new();
    revolve_with_context(profile, config, &mut ctx)
}

#[must_use]
pub fn revolve_with_context(profile: &[Point2], config: &RevolveConfig, ctx: &mut GeomContext) -> GeomMesh {
    revolve_with_topology(profile, config, ctx).0
}

/// [`revolve`] that also reports where the side and cap triangles live.
#[must_use]
pub fn revolve_with_topology(
    profile: &[Point2],
    config: &RevolveConfig,
    ctx: &mut GeomContext,
) -> (GeomMesh, TopologyCounts) {
    let n = config.count_per_ring;
    let rings: Vec<Point2> = profile.iter().copied().filter(|p| p.is_finite()).collect();
    if rings.len() != profile.len() {
        log::debug!("revolve: skipped {} non-finite profile points", profile.len() - rings.len());
    }
    if rings.len() < 2 {
        log::debug!("revolve: profile has {} usable points, nothing to revolve", rings.len());
        return (GeomMesh::default(), TopologyCounts::default());
    }

    let Some(mut builder) = RingMeshBuilder::new(rings.len(), n) else {
        log::debug!("revolve: count_per_ring {n} cannot form a ring");
        return (GeomMesh::default(), TopologyCounts::default());
    };

    let shape = RingShape::from_cross_section(config.cross_section.as_deref(), n);

    ctx.metrics.time(TimingBucket::Revolve, || {
        for p in &rings {
            builder.push_ring(lathe_ring(*p, &shape, n, config));
        }
    });

    let (positions, indices, counts) = ctx
        .metrics
        .time(TimingBucket::Triangulation, || builder.finish(config.wrap_start, config.wrap_end));

    log::trace!(
        "revolve: {} rings x {n}, {} triangles",
        rings.len(),
        counts.total_triangle_count()
    );

    (finalize_mesh(positions, indices, &mut ctx.metrics), counts)
}

/// World-space ring for profile point `p`.
fn lathe_ring(p: Point2, shape: &RingShape, n: usize, config: &RevolveConfig) -> impl Iterator<Item = Point3> {
    let radius = p.y * config.scale_radius;
    let mut lean = Transform::identity();
    let mut offset_y = 0.0;
    let mut offset_z = 0.0;

    if let Some(graph) = config.graph_y.as_deref() {
        offset_y = value_at(graph, p.x);
        let angle = average_tangent_angle_at(graph, p.x, LEAN_NEIGHBOR_COUNT) * config.lean_scalar;
        lean = Transform::rotate_z(angle) * lean;
    }
    if let Some(graph) = config.graph_z.as_deref() {
        offset_z = value_at(graph, p.x);
        let angle = -average_tangent_angle_at(graph, p.x, LEAN_NEIGHBOR_COUNT) * config.lean_scalar;
        lean = Transform::rotate_y(angle) * lean;
    }

    let (scale_y, scale_z) = (config.scale_y, config.scale_z);
    (0..n).map(move |i| {
        let v = lean.apply_point(shape.local_point(i, n, radius));
        Point3::new(v.x + p.x, v.y * scale_y + offset_y, v.z * scale_z + offset_z)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn straight_profile() -> Vec<Point2> {
        vec![Point2::new(0.0, 1.0), Point2::new(1.0, 1.0)]
    }

    #[test]
    fn test_defaults() {
        let config = RevolveConfig::default();
        assert_eq!(config.count_per_ring, 10);
        assert!(approx_eq(config.lean_scalar, 0.25));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = RevolveConfig::default().with_count_per_ring(2);
        assert_eq!(config.validate(), Err(ConfigError::CountPerRingTooSmall { count: 2 }));

        let config = RevolveConfig { scale_z: f64::INFINITY, ..RevolveConfig::default() };
        assert_eq!(config.validate(), Err(ConfigError::NonFiniteScale { name: "scale_z" }));
    }

    #[test]
    fn test_short_profile_is_empty() {
        let config = RevolveConfig::default();
        assert!(revolve(&[], &config).is_empty());
        assert!(revolve(&[Point2::new(0.0, 1.0)], &config).is_empty());
    }

    #[test]
    fn test_profile_short_after_dropping_non_finite_is_empty() {
        let config = RevolveConfig::default().with_count_per_ring(4).with_caps(true, true);
        let profile = [Point2::new(0.0, 1.0), Point2::new(f64::NAN, 1.0)];
        let (mesh, counts) = revolve_with_topology(&profile, &config, &mut GeomContext::new());
        assert!(mesh.is_empty());
        assert_eq!(counts, TopologyCounts::default());

        let profile = [Point2::new(0.0, 1.0), Point2::new(f64::INFINITY, 1.0), Point2::new(1.0, 1.0)];
        assert_eq!(revolve(&profile, &config).vertex_count(), 8);
    }

    #[test]
    fn test_small_ring_count_is_empty() {
        let config = RevolveConfig::default().with_count_per_ring(2);
        assert!(revolve(&straight_profile(), &config).is_empty());
        let config = RevolveConfig::default().with_count_per_ring(0);
        assert!(revolve(&straight_profile(), &config).is_empty());
    }

    #[test]
    fn test_rings_lie_on_radius() {
        let config = RevolveConfig { scale_radius: 2.0, ..RevolveConfig::default() };
        let mesh = revolve(&straight_profile(), &config);
        assert_eq!(mesh.vertex_count(), 20);
        for (k, pos) in mesh.positions.iter().enumerate() {
            let expected_x = if k < 10 { 0.0 } else { 1.0 };
            assert!(approx_eq(pos[0], expected_x));
            assert!(approx_eq(pos[1].hypot(pos[2]), 2.0));
        }
    }

    #[test]
    fn test_graph_offsets_rings() {
        let config = RevolveConfig {
            count_per_ring: 4,
            graph_y: Some(vec![Point2::new(-1.0, 3.0), Point2::new(2.0, 3.0)]),
            ..RevolveConfig::default()
        };
        let mesh = revolve(&straight_profile(), &config);
        // A flat graph offsets without leaning.
        let p = mesh.positions[0];
        assert!(approx_eq(p[0], 0.0));
        assert!(approx_eq(p[1], 4.0));
        assert!(approx_eq(p[2], 0.0));
    }

    #[test]
    fn test_graph_lean_tilts_ring() {
        let config = RevolveConfig {
            count_per_ring: 4,
            lean_scalar: 1.0,
            graph_y: Some(vec![Point2::new(-1.0, -1.0), Point2::new(2.0, 2.0)]),
            ..RevolveConfig::default()
        };
        let mesh = revolve(&straight_profile(), &config);
        // Vertex 0 of ring 0 starts at (0, 1, 0); a 45 degree lean about Z moves it to -x.
        let p = mesh.positions[0];
        let half = std::f64::consts::FRAC_1_SQRT_2;
        assert!(approx_eq(p[0], -half));
        assert!(approx_eq(p[1], half));
    }

    #[test]
    fn test_scale_applies_before_graph_offset() {
        let config = RevolveConfig {
            count_per_ring: 4,
            scale_z: 3.0,
            graph_z: Some(vec![Point2::new(-1.0, 0.5), Point2::new(2.0, 0.5)]),
            ..RevolveConfig::default()
        };
        let mesh = revolve(&straight_profile(), &config);
        // Vertex 1 of ring 0 sits at z = 1 before scaling.
        assert!(approx_eq(mesh.positions[1][2], 3.5));
    }

    #[test]
    fn test_topology_reports_caps() {
        let config = RevolveConfig::default().with_count_per_ring(6).with_caps(true, false);
        let mut ctx = GeomContext::new();
        let (mesh, counts) = revolve_with_topology(&straight_profile(), &config, &mut ctx);
        assert_eq!(counts.side_quad_triangle_count, 12);
        assert_eq!(counts.start_cap_point_count, 6);
        assert_eq!(counts.end_cap_point_count, 0);
        assert_eq!(mesh.indices.len(), counts.total_triangle_count() * 3);
    }
}
