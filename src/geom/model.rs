//! End-to-end generation from raw drawn curves.
//!
//! Models hold the curves as the editor recorded them plus the generator
//! configuration; `generate` resamples and builds the mesh in one call. Every
//! call starts from scratch, so the same model always produces the same mesh.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::diagnostics::GeomMeshDiagnostics;
use super::mesh::{GeomContext, GeomMesh};
use super::metrics::TimingBucket;
use super::revolve::{RevolveConfig, revolve_with_context};
use super::ring::TopologyCounts;
use super::sampler::resample_by_length;
use super::trace::{
    CrossSectionTraceConfig, Segment, auto_generate_chordal_axis, inflate_with_context, trace_segments_with_context,
};
use super::Point2;

/// Something that can be turned into a mesh on its own.
pub trait MeshModel: Sync {
    type Output: Send;

    fn generate_with_context(&self, ctx: &mut GeomContext) -> Self::Output;

    /// Mesh carried by `output`, for diagnostics.
    fn mesh_of(output: &Self::Output) -> &GeomMesh;

    fn generate(&self) -> Self::Output {
        let mut ctx = GeomContext::new();
        self.generate_with_context(&mut ctx)
    }

    /// Generates and inspects the result; timing is attached when the
    /// `mesh_engine_metrics` feature is enabled.
    fn generate_with_diagnostics(&self) -> (Self::Output, GeomMeshDiagnostics) {
        let mut ctx = GeomContext::new();
        ctx.metrics.begin();
        let output = self.generate_with_context(&mut ctx);
        let tolerance = ctx.tolerance;
        let mut diagnostics = ctx
            .metrics
            .time(TimingBucket::Diagnostics, || GeomMeshDiagnostics::from_mesh(Self::mesh_of(&output), tolerance));
        diagnostics.timing = ctx.metrics.end();
        log::debug!("generated {}", diagnostics.summary());
        (output, diagnostics)
    }
}

/// A drawn profile revolved into a lathe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatheModel {
    /// `(x, radius)` points as drawn.
    pub profile: Vec<Point2>,
    /// Ring spacing along the profile.
    pub sample_length: f64,
    pub config: RevolveConfig,
}

impl Default for LatheModel {
    fn default() -> Self {
        Self {
            profile: Vec::new(),
            sample_length: 0.1,
            config: RevolveConfig::default(),
        }
    }
}

impl LatheModel {
    #[must_use]
    pub fn new(profile: Vec<Point2>, config: RevolveConfig) -> Self {
        Self {
            profile,
            config,
            ..Self::default()
        }
    }
}

impl MeshModel for LatheModel {
    type Output = GeomMesh;

    fn generate_with_context(&self, ctx: &mut GeomContext) -> GeomMesh {
        if self.profile.is_empty() {
            return GeomMesh::default();
        }
        let sampled = ctx
            .metrics
            .time(TimingBucket::Sampling, || resample_by_length(&self.profile, self.sample_length));
        revolve_with_context(&sampled, &self.config, ctx)
    }

    fn mesh_of(output: &GeomMesh) -> &GeomMesh {
        output
    }
}

/// Everything produced by a cross-sectional trace.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TraceOutput {
    pub mesh: GeomMesh,
    pub topology: TopologyCounts,
    /// Slices the rings were built from, in ring order.
    pub segments: Vec<Segment>,
    /// The resampled spine that was traced (derived if none was drawn).
    pub spine: Vec<Point2>,
}

/// A drawn silhouette filled with a tube along a spine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossSectionalModel {
    pub boundary: Vec<Point2>,
    /// Explicit spine; with fewer than two points one is derived from the
    /// boundary.
    pub spine: Vec<Point2>,
    /// `sample_length` here also sets boundary and spine resampling.
    pub config: CrossSectionTraceConfig,
}

impl CrossSectionalModel {
    #[must_use]
    pub fn new(boundary: Vec<Point2>, spine: Vec<Point2>, config: CrossSectionTraceConfig) -> Self {
        Self {
            boundary,
            spine,
            config,
        }
    }
}

impl MeshModel for CrossSectionalModel {
    type Output = TraceOutput;

    fn generate_with_context(&self, ctx: &mut GeomContext) -> TraceOutput {
        let sample_length = self.config.sample_length;

        let spine = if self.spine.len() >= 2 {
            self.spine.clone()
        } else {
            ctx.metrics
                .time(TimingBucket::Sampling, || auto_generate_chordal_axis(&self.boundary, sample_length))
        };

        if self.boundary.len() < 2 || spine.len() < 2 {
            log::debug!(
                "cross-sectional model: boundary {} points, spine {} points, nothing to trace",
                self.boundary.len(),
                spine.len()
            );
            return TraceOutput::default();
        }

        let (boundary, spine) = ctx.metrics.time(TimingBucket::Sampling, || {
            (
                resample_by_length(&self.boundary, sample_length),
                resample_by_length(&spine, sample_length),
            )
        });

        let segments = trace_segments_with_context(&boundary, &spine, &self.config, ctx);
        let (mesh, topology) = inflate_with_context(&segments, &self.config, ctx);

        TraceOutput {
            mesh,
            topology,
            segments,
            spine,
        }
    }

    fn mesh_of(output: &TraceOutput) -> &GeomMesh {
        &output.mesh
    }
}

/// Generates every model independently, in input order.
///
/// With the `parallel` feature the models are spread over the rayon pool;
/// each individual generation stays single-threaded.
#[cfg(feature = "parallel")]
pub fn generate_frames<M: MeshModel>(models: &[M]) -> Vec<M::Output> {
    models.par_iter().map(M::generate).collect()
}

#[cfg(not(feature = "parallel"))]
pub fn generate_frames<M: MeshModel>(models: &[M]) -> Vec<M::Output> {
    models.iter().map(M::generate).collect()
}
