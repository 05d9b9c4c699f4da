mod core;
mod diagnostics;
mod function;
mod intersect;
mod mesh;
mod metrics;
mod model;
mod path;
mod revolve;
mod ring;
mod sampler;
mod trace;

pub use core::{Point2, Point3, Polyline, Tolerance, Transform, Vec3, lerp, slope_to_radians};
pub use diagnostics::GeomMeshDiagnostics;
pub use function::{
    average_tangent_angle_at, retain_monotonic, slope_at, tangent_angle_at, tangent_at, value_at,
};
pub use intersect::{
    nearest_ray_hit, nearest_ray_hit_with_tolerance, orient2d, ray_segment, ray_segment_with_tolerance,
    segments_intersect, segments_intersect_with_tolerance,
};
pub use mesh::{GeomContext, GeomMesh, MeshError};
pub use metrics::{GeomMetrics, GeomTimingReport, TimingBucket};
pub use model::{CrossSectionalModel, LatheModel, MeshModel, TraceOutput, generate_frames};
pub use path::{
    PathRay, arc_lengths, point_and_tangent_at_length, point_and_tangent_at_length_with_tolerance,
    total_length,
};
pub use revolve::{
    LEAN_NEIGHBOR_COUNT, RevolveConfig, revolve, revolve_with_context, revolve_with_topology,
};
pub use ring::{ConfigError, MIN_COUNT_PER_RING, RingShape, TopologyCounts};
pub use sampler::{lerp_polylines, mean_spacing, morph_polylines, resample_by_length, resample_to_count};
pub use trace::{
    CrossSectionTraceConfig, Segment, auto_generate_chordal_axis, inflate, inflate_with_context,
    trace, trace_segments, trace_segments_with_context, trace_with_context,
};

#[cfg(test)]
mod tests;
