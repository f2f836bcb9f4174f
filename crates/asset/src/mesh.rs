//! CPU-side mesh representation handed to the renderer.

use std::collections::HashSet;

/// Color used when no material supplies one.
pub const FALLBACK_COLOR: [f32; 3] = [0.0, 0.0, 1.0];

/// Flat, GPU-ready mesh: positions plus triangle and line index lists.
///
/// Every index in `triangle_indices` and `edge_indices` is smaller than
/// `vertex_count()`. `edge_indices` holds each undirected edge once, smaller
/// index first, in ascending order.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    /// Positions, stride 3 (x, y, z), in file order.
    pub vertices: Vec<f32>,
    /// Triangles, stride 3.
    pub triangle_indices: Vec<u32>,
    /// Undirected edges, stride 2.
    pub edge_indices: Vec<u32>,
    /// RGB in [0, 1].
    pub color: [f32; 3],
}

impl Default for Mesh {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            triangle_indices: Vec::new(),
            edge_indices: Vec::new(),
            color: FALLBACK_COLOR,
        }
    }
}

/// Why [`Mesh::validate`] rejected a mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshDefect {
    VertexStride,
    TriangleStride,
    EdgeStride,
    TriangleIndexOutOfRange(u32),
    EdgeIndexOutOfRange(u32),
    DuplicateEdge(u32, u32),
}

impl Mesh {
    pub fn new(
        vertices: Vec<f32>,
        triangle_indices: Vec<u32>,
        edge_indices: Vec<u32>,
        color: [f32; 3],
    ) -> Self {
        Self {
            vertices,
            triangle_indices,
            edge_indices,
            color,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangle_indices.len() / 3
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_indices.len() / 2
    }

    /// Returns `true` if there is anything to draw.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.triangle_indices.is_empty()
    }

    /// Iterate positions as `[x, y, z]`.
    pub fn positions(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.vertices.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
    }

    /// Axis-aligned bounds `(min, max)`, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let mut iter = self.positions();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(mut lo, mut hi), p| {
            for i in 0..3 {
                lo[i] = lo[i].min(p[i]);
                hi[i] = hi[i].max(p[i]);
            }
            (lo, hi)
        }))
    }

    /// Re-check the structural invariants.
    pub fn validate(&self) -> Result<(), MeshDefect> {
        if self.vertices.len() % 3 != 0 {
            return Err(MeshDefect::VertexStride);
        }
        if self.triangle_indices.len() % 3 != 0 {
            return Err(MeshDefect::TriangleStride);
        }
        if self.edge_indices.len() % 2 != 0 {
            return Err(MeshDefect::EdgeStride);
        }

        let count = self.vertex_count();
        if let Some(&i) = self
            .triangle_indices
            .iter()
            .find(|&&i| i as usize >= count)
        {
            return Err(MeshDefect::TriangleIndexOutOfRange(i));
        }
        if let Some(&i) = self.edge_indices.iter().find(|&&i| i as usize >= count) {
            return Err(MeshDefect::EdgeIndexOutOfRange(i));
        }

        let mut seen = HashSet::with_capacity(self.edge_count());
        for pair in self.edge_indices.chunks_exact(2) {
            let key = (pair[0].min(pair[1]), pair[0].max(pair[1]));
            if !seen.insert(key) {
                return Err(MeshDefect::DuplicateEdge(key.0, key.1));
            }
        }
        Ok(())
    }
}
