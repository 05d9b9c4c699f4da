//! Opt-in timing hooks for mesh generation.
//!
//! Timing is collected only with the `mesh_engine_metrics` feature on
//! non-wasm targets (`std::time::Instant` is unavailable on `wasm32`).
//! Otherwise every call is a pass-through and [`GeomMetrics::end`] returns
//! `None`.
//!
//! ```ignore
//! use lathe_engine::geom::{GeomMetrics, TimingBucket};
//!
//! let mut metrics = GeomMetrics::default();
//! metrics.begin();
//! let samples = metrics.time(TimingBucket::Sampling, || resample_by_length(&profile, 0.1));
//! if let Some(report) = metrics.end() {
//!     log::debug!("sampling took {} ns", report.sampling_ns);
//! }
//! ```

/// Phase of a generation call that time is charged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Arc-length resampling and morphing of input curves.
    Sampling,
    /// Ray casting the spine against the boundary.
    Tracing,
    /// Ring placement for lathe profiles.
    Revolve,
    /// Ring placement for traced segments.
    Inflate,
    /// Side quads and cap fans.
    Triangulation,
    /// Smooth vertex normals.
    Normals,
    /// Edge topology and degenerate checks.
    Diagnostics,
}

/// Cumulative nanoseconds per [`TimingBucket`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GeomTimingReport {
    pub sampling_ns: u64,
    pub tracing_ns: u64,
    pub revolve_ns: u64,
    pub inflate_ns: u64,
    pub triangulation_ns: u64,
    pub normals_ns: u64,
    pub diagnostics_ns: u64,
}

impl GeomTimingReport {
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.sampling_ns
            .saturating_add(self.tracing_ns)
            .saturating_add(self.revolve_ns)
            .saturating_add(self.inflate_ns)
            .saturating_add(self.triangulation_ns)
            .saturating_add(self.normals_ns)
            .saturating_add(self.diagnostics_ns)
    }

    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }

    fn slot_mut(&mut self, bucket: TimingBucket) -> &mut u64 {
        match bucket {
            TimingBucket::Sampling => &mut self.sampling_ns,
            TimingBucket::Tracing => &mut self.tracing_ns,
            TimingBucket::Revolve => &mut self.revolve_ns,
            TimingBucket::Inflate => &mut self.inflate_ns,
            TimingBucket::Triangulation => &mut self.triangulation_ns,
            TimingBucket::Normals => &mut self.normals_ns,
            TimingBucket::Diagnostics => &mut self.diagnostics_ns,
        }
    }

    /// Adds `nanos` to `bucket`, saturating at `u64::MAX`.
    pub fn record(&mut self, bucket: TimingBucket, nanos: u64) {
        let slot = self.slot_mut(bucket);
        *slot = slot.saturating_add(nanos);
    }
}

/// Accumulator threaded through a generation call via `GeomContext`.
///
/// Call [`begin`](Self::begin) to reset, wrap work in [`time`](Self::time),
/// and read the totals with [`end`](Self::end).
#[derive(Debug, Default)]
pub struct GeomMetrics {
    #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
    report: GeomTimingReport,
}

impl GeomMetrics {
    /// Resets all counters.
    pub fn begin(&mut self) {
        #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
        {
            self.report = GeomTimingReport::default();
        }
    }

    /// The accumulated report, or `None` when timing is compiled out.
    #[must_use]
    pub fn end(&self) -> Option<GeomTimingReport> {
        #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Runs `f`, charging its wall time to `bucket` when timing is enabled.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            self.report.record(bucket, nanos);
            result
        }

        #[cfg(not(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }
}
