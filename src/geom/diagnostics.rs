//! Topology and quality report for generated meshes.
//!
//! Generators never repair their output (vertex and index order must stay
//! exactly as emitted), so diagnostics only describe what was produced.
//! A lathe without caps is expected to report open edges around both ends;
//! a capped tube with a non-zero radius everywhere should be watertight.

use std::fmt;

use super::mesh::{GeomMesh, count_degenerate_triangles, count_edge_topology};
use super::metrics::GeomTimingReport;
use super::Tolerance;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct GeomMeshDiagnostics {
    pub vertex_count: usize,
    pub triangle_count: usize,

    /// Triangles whose area is zero within tolerance, e.g. the ring of a
    /// zero-radius profile point collapsing onto the axis.
    pub degenerate_triangle_count: usize,

    /// Edges used by exactly one triangle.
    pub open_edge_count: usize,

    /// Edges used by more than two triangles.
    pub non_manifold_edge_count: usize,

    /// Filled only when the `mesh_engine_metrics` feature is enabled.
    pub timing: Option<GeomTimingReport>,

    pub warnings: Vec<String>,
}

impl GeomMeshDiagnostics {
    /// Inspects `mesh` without modifying it.
    #[must_use]
    pub fn from_mesh(mesh: &GeomMesh, tol: Tolerance) -> Self {
        let (open_edge_count, non_manifold_edge_count) = count_edge_topology(&mesh.indices);
        let degenerate_triangle_count = count_degenerate_triangles(&mesh.positions, &mesh.indices, tol);

        let mut diagnostics = Self {
            vertex_count: mesh.vertex_count(),
            triangle_count: mesh.triangle_count(),
            degenerate_triangle_count,
            open_edge_count,
            non_manifold_edge_count,
            timing: None,
            warnings: Vec::new(),
        };

        if let Err(err) = mesh.validate() {
            diagnostics.add_warning(format!("invalid mesh: {err}"));
        }
        if open_edge_count > 0 {
            diagnostics.add_warning("mesh has open edges");
        }
        if non_manifold_edge_count > 0 {
            diagnostics.add_warning("mesh has non-manifold edges");
        }
        if degenerate_triangle_count > 0 {
            diagnostics.add_warning("mesh has degenerate triangles");
        }

        diagnostics
    }

    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.open_edge_count == 0
    }

    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count == 0
    }

    /// Watertight and manifold.
    #[must_use]
    pub fn is_valid_solid(&self) -> bool {
        self.is_watertight() && self.is_manifold()
    }

    /// No topology issues, no degenerate triangles and no warnings.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.is_valid_solid() && self.degenerate_triangle_count == 0 && self.warnings.is_empty()
    }

    #[must_use]
    pub fn topology_issue_count(&self) -> usize {
        self.open_edge_count + self.non_manifold_edge_count
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Sums counts and appends warnings; `timing` is left untouched.
    pub fn merge(&mut self, other: &GeomMeshDiagnostics) {
        self.vertex_count += other.vertex_count;
        self.triangle_count += other.triangle_count;
        self.degenerate_triangle_count += other.degenerate_triangle_count;
        self.open_edge_count += other.open_edge_count;
        self.non_manifold_edge_count += other.non_manifold_edge_count;
        self.warnings.extend(other.warnings.iter().cloned());
    }

    /// One-line form for log output: `"V:{vertices} T:{triangles} [issues...]"`.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("V:{} T:{}", self.vertex_count, self.triangle_count)];
        if self.degenerate_triangle_count > 0 {
            parts.push(format!("degenerate:{}", self.degenerate_triangle_count));
        }
        if self.open_edge_count > 0 {
            parts.push(format!("open:{}", self.open_edge_count));
        }
        if self.non_manifold_edge_count > 0 {
            parts.push(format!("non-manifold:{}", self.non_manifold_edge_count));
        }
        parts.join(" ")
    }
}

impl fmt::Display for GeomMeshDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mesh Diagnostics:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Triangles: {}", self.triangle_count)?;

        if self.topology_issue_count() > 0 || self.degenerate_triangle_count > 0 {
            writeln!(f, "  Issues:")?;
            if self.open_edge_count > 0 {
                writeln!(f, "    - Open edges: {}", self.open_edge_count)?;
            }
            if self.non_manifold_edge_count > 0 {
                writeln!(f, "    - Non-manifold edges: {}", self.non_manifold_edge_count)?;
            }
            if self.degenerate_triangle_count > 0 {
                writeln!(f, "    - Degenerate triangles: {}", self.degenerate_triangle_count)?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f, "  Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "    - {warning}")?;
            }
        }

        if let Some(timing) = &self.timing {
            writeln!(f, "  Timing: {} ms total", timing.total_ms())?;
        }

        let status = if self.is_clean() {
            "CLEAN"
        } else if self.is_valid_solid() {
            "VALID (with warnings)"
        } else {
            "OPEN"
        };
        writeln!(f, "  Status: {status}")
    }
}
