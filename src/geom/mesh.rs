use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::metrics::{GeomMetrics, TimingBucket};
use super::{Tolerance, Vec3};

/// Indexed triangle mesh produced by the generators.
///
/// Triangles use clockwise front-face winding (viewed from outside the
/// surface), and `normals`, when present, point outward for that winding.
/// Vertex and index order is exactly the emission order of the generator;
/// nothing is welded or re-indexed afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeomMesh {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
    pub normals: Option<Vec<[f64; 3]>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    #[error("mesh indices are not a triangle list (len {len} is not a multiple of 3)")]
    NotTriangleList { len: usize },
    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteVertex { index: usize },
    #[error("index {index} is out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { index: u32, vertex_count: usize },
    #[error("normal buffer length does not match vertex count")]
    AttributeLengthMismatch,
}

impl GeomMesh {
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            normals: None,
        }
    }

    #[must_use]
    pub fn with_normals(positions: Vec<[f64; 3]>, indices: Vec<u32>, normals: Vec<[f64; 3]>) -> Self {
        Self {
            positions,
            indices,
            normals: Some(normals),
        }
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.indices.is_empty()
    }

    /// Returns true if all vertex indices are within bounds.
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len();
        self.indices.iter().all(|&i| (i as usize) < n)
    }

    #[must_use]
    pub fn has_triangle_indices(&self) -> bool {
        self.indices.len() % 3 == 0
    }

    #[must_use]
    pub fn has_valid_attribute_lengths(&self) -> bool {
        self.normals
            .as_ref()
            .is_none_or(|normals| normals.len() == self.positions.len())
    }

    /// Checks the structural mesh invariants, reporting the first violation.
    pub fn validate(&self) -> Result<(), MeshError> {
        if !self.has_triangle_indices() {
            return Err(MeshError::NotTriangleList { len: self.indices.len() });
        }
        if let Some(index) = self
            .positions
            .iter()
            .position(|p| p.iter().any(|c| !c.is_finite()))
        {
            return Err(MeshError::NonFiniteVertex { index });
        }
        let vertex_count = self.positions.len();
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshError::IndexOutOfBounds { index, vertex_count });
        }
        if !self.has_valid_attribute_lengths() {
            return Err(MeshError::AttributeLengthMismatch);
        }
        Ok(())
    }

    /// Position buffer as `[x0, y0, z0, x1, ...]`, ready for upload.
    #[must_use]
    pub fn positions_flat(&self) -> &[f64] {
        self.positions.as_flattened()
    }

    #[must_use]
    pub fn normals_flat(&self) -> Option<&[f64]> {
        self.normals.as_deref().map(<[[f64; 3]]>::as_flattened)
    }
}

/// Per-call state shared by the generators.
#[derive(Debug)]
pub struct GeomContext {
    pub tolerance: Tolerance,
    pub metrics: GeomMetrics,
}

impl GeomContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tolerance: Tolerance::default_geom(),
            metrics: GeomMetrics::default(),
        }
    }

    #[must_use]
    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            metrics: GeomMetrics::default(),
        }
    }
}

impl Default for GeomContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Attaches smooth normals to freshly emitted geometry.
pub(crate) fn finalize_mesh(positions: Vec<[f64; 3]>, indices: Vec<u32>, metrics: &mut GeomMetrics) -> GeomMesh {
    if positions.is_empty() {
        return GeomMesh::new(positions, indices);
    }
    let normals = metrics.time(TimingBucket::Normals, || compute_smooth_normals(&positions, &indices));
    GeomMesh::with_normals(positions, indices, normals)
}

/// Area-weighted vertex normals for clockwise-front triangles.
///
/// Vertices touched by no (or only degenerate) triangles get `[0, 0, 1]`.
pub(crate) fn compute_smooth_normals(positions: &[[f64; 3]], indices: &[u32]) -> Vec<[f64; 3]> {
    let mut sums = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let (Some(a), Some(b), Some(c)) = (positions.get(i0), positions.get(i1), positions.get(i2)) else {
            continue;
        };
        let a = Vec3::new(a[0], a[1], a[2]);
        let ab = Vec3::new(b[0], b[1], b[2]) - a;
        let ac = Vec3::new(c[0], c[1], c[2]) - a;
        let face = ac.cross(ab);

        sums[i0] = sums[i0] + face;
        sums[i1] = sums[i1] + face;
        sums[i2] = sums[i2] + face;
    }

    sums.into_iter()
        .map(|n| match n.normalized() {
            Some(unit) if unit.x.is_finite() && unit.y.is_finite() && unit.z.is_finite() => unit.to_array(),
            _ => [0.0, 0.0, 1.0],
        })
        .collect()
}

/// Counts open (one incident triangle) and non-manifold (three or more)
/// undirected edges. Triangles with repeated indices are ignored.
pub(crate) fn count_edge_topology(indices: &[u32]) -> (usize, usize) {
    use std::collections::HashMap;

    let mut edge_counts: HashMap<(u32, u32), u32> = HashMap::new();

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0], tri[1], tri[2]);
        if i0 == i1 || i1 == i2 || i0 == i2 {
            continue;
        }
        for (ea, eb) in [(i0, i1), (i1, i2), (i2, i0)] {
            let key = if ea <= eb { (ea, eb) } else { (eb, ea) };
            *edge_counts.entry(key).or_insert(0) += 1;
        }
    }

    edge_counts.values().fold((0, 0), |(open, non_manifold), &count| match count {
        1 => (open + 1, non_manifold),
        c if c > 2 => (open, non_manifold + 1),
        _ => (open, non_manifold),
    })
}

/// Triangles whose doubled area is below `tol.eps` (or that reference
/// missing vertices).
pub(crate) fn count_degenerate_triangles(positions: &[[f64; 3]], indices: &[u32], tol: Tolerance) -> usize {
    indices
        .chunks_exact(3)
        .filter(|tri| {
            let (Some(a), Some(b), Some(c)) = (
                positions.get(tri[0] as usize),
                positions.get(tri[1] as usize),
                positions.get(tri[2] as usize),
            ) else {
                return true;
            };
            let a = Vec3::new(a[0], a[1], a[2]);
            let ab = Vec3::new(b[0], b[1], b[2]) - a;
            let ac = Vec3::new(c[0], c[1], c[2]) - a;
            let area2 = ab.cross(ac).length();
            !area2.is_finite() || area2 <= tol.eps
        })
        .count()
}
