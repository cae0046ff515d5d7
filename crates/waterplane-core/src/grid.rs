//! Uniform grid mesh for the flat water surface.

use std::collections::HashSet;

use glam::Vec3;

use crate::error::{Result, WaterError};
use crate::vertex::Vertex;

/// A triangulated square grid in the local XZ plane at Y = 0.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMesh {
    /// Vertices, row-major: row `i` runs along +Z, column `j` along +X.
    pub vertices: Vec<Vertex>,
    /// Triangle list indices, six per grid cell.
    pub indices: Vec<u32>,
    resolution: u32,
    size: f32,
}

/// Largest vertex count a surface grid may have (a 1024 x 1024 grid).
pub const MAX_GRID_VERTICES: u32 = 1 << 20;

impl GridMesh {
    /// Number of vertices a grid of `resolution` per side has, if it is buildable.
    pub fn vertex_count_for(resolution: u32) -> Result<u32> {
        if resolution < 2 {
            return Err(WaterError::InvalidResolution(resolution));
        }
        resolution
            .checked_mul(resolution)
            .filter(|&count| count <= MAX_GRID_VERTICES)
            .ok_or(WaterError::MeshTooLarge(resolution))
    }

    /// Builds a grid of `resolution` x `resolution` vertices spanning `[0, size]` on X and Z.
    ///
    /// Each cell contributes the triangles `(top_left, bottom_left, top_right)` and
    /// `(top_right, bottom_left, bottom_right)`, which face +Y.
    pub fn build(resolution: u32, size: f32) -> Result<Self> {
        let vertex_count = Self::vertex_count_for(resolution)?;
        if !size.is_finite() || size <= 0.0 {
            return Err(WaterError::InvalidSurfaceSize(size));
        }

        let n = resolution;
        let last = (n - 1) as f32;

        let mut vertices = Vec::with_capacity(vertex_count as usize);
        for i in 0..n {
            for j in 0..n {
                let u = j as f32 / last;
                let v = i as f32 / last;
                vertices.push(Vertex::flat(Vec3::new(u * size, 0.0, v * size), [u, v]));
            }
        }

        let cells = (n - 1) as usize;
        let mut indices = Vec::with_capacity(cells * cells * 6);
        for i in 0..n - 1 {
            for j in 0..n - 1 {
                let top_left = i * n + j;
                let top_right = top_left + 1;
                let bottom_left = (i + 1) * n + j;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[top_left, bottom_left, top_right]);
                indices.extend_from_slice(&[top_right, bottom_left, bottom_right]);
            }
        }

        log::debug!(
            "built water grid: {} vertices, {} triangles",
            vertices.len(),
            indices.len() / 3
        );

        Ok(Self {
            vertices,
            indices,
            resolution,
            size,
        })
    }

    /// Vertices per side.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Edge length of the surface in local units.
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Line-list indices covering every distinct triangle edge once.
    ///
    /// Used to draw the surface as a wireframe without a line polygon mode.
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::with_capacity(self.indices.len());
        let mut lines = Vec::with_capacity(self.indices.len() * 2);

        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    lines.push(a);
                    lines.push(b);
                }
            }
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_grid_is_single_quad() {
        let mesh = GridMesh::build(2, 10.0).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices, vec![0, 2, 1, 1, 2, 3]);
    }

    #[test]
    fn test_corners() {
        let size = 60.0;
        let n = 5;
        let mesh = GridMesh::build(n, size).unwrap();
        let n = n as usize;
        let corner = |idx: usize| {
            let p = mesh.vertices[idx].position;
            (p[0], p[2])
        };
        assert_eq!(corner(0), (0.0, 0.0));
        assert_eq!(corner(n - 1), (size, 0.0));
        assert_eq!(corner(n * (n - 1)), (0.0, size));
        assert_eq!(corner(n * n - 1), (size, size));
    }

    #[test]
    fn test_triangles_face_up() {
        let mesh = GridMesh::build(4, 1.0).unwrap();
        for tri in mesh.indices.chunks_exact(3) {
            let p = |i: u32| Vec3::from(mesh.vertices[i as usize].position);
            let normal = (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]));
            assert!(normal.y > 0.0, "triangle {tri:?} faces down");
        }
    }

    #[test]
    fn test_rejects_bad_resolution() {
        assert!(matches!(
            GridMesh::build(1, 1.0),
            Err(WaterError::InvalidResolution(1))
        ));
        assert!(matches!(
            GridMesh::build(0, 1.0),
            Err(WaterError::InvalidResolution(0))
        ));
    }

    #[test]
    fn test_rejects_bad_size() {
        assert!(GridMesh::build(2, 0.0).is_err());
        assert!(GridMesh::build(2, -1.0).is_err());
        assert!(GridMesh::build(2, f32::NAN).is_err());
        assert!(GridMesh::build(2, f32::INFINITY).is_err());
    }

    #[test]
    fn test_rejects_oversized_grid() {
        assert!(matches!(
            GridMesh::build(u32::MAX, 1.0),
            Err(WaterError::MeshTooLarge(_))
        ));
        assert!(matches!(
            GridMesh::build(60_000, 1.0),
            Err(WaterError::MeshTooLarge(60_000))
        ));
    }

    #[test]
    fn test_vertex_budget_boundary() {
        assert_eq!(GridMesh::vertex_count_for(1024).unwrap(), MAX_GRID_VERTICES);
        assert!(matches!(
            GridMesh::vertex_count_for(1025),
            Err(WaterError::MeshTooLarge(1025))
        ));
    }

    #[test]
    fn test_wireframe_single_quad() {
        let mesh = GridMesh::build(2, 1.0).unwrap();
        let lines = mesh.wireframe_indices();
        // Four border edges plus the shared diagonal.
        assert_eq!(lines.len(), 5 * 2);
    }

    #[test]
    fn test_wireframe_edge_count() {
        // Horizontal + vertical + one diagonal per cell.
        let n = 4usize;
        let mesh = GridMesh::build(n as u32, 1.0).unwrap();
        let expected = 2 * n * (n - 1) + (n - 1) * (n - 1);
        assert_eq!(mesh.wireframe_indices().len(), expected * 2);
    }

    proptest! {
        #[test]
        fn prop_counts_and_index_range(n in 2u32..40, size in 0.1f32..500.0) {
            let mesh = GridMesh::build(n, size).unwrap();
            let n = n as usize;
            prop_assert_eq!(mesh.vertex_count(), n * n);
            prop_assert_eq!(mesh.indices.len(), 6 * (n - 1) * (n - 1));
            prop_assert!(mesh.indices.iter().all(|&i| (i as usize) < n * n));
        }

        #[test]
        fn prop_normals_up(n in 2u32..40) {
            let mesh = GridMesh::build(n, 1.0).unwrap();
            prop_assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
        }

        #[test]
        fn prop_tex_coords_match_grid(n in 2u32..40, size in 0.1f32..500.0) {
            let mesh = GridMesh::build(n, size).unwrap();
            let last = (n - 1) as f32;
            for i in 0..n {
                for j in 0..n {
                    let v = mesh.vertices[(i * n + j) as usize];
                    prop_assert_eq!(v.tex_coord, [j as f32 / last, i as f32 / last]);
                    prop_assert!((v.position[0] - v.tex_coord[0] * size).abs() < 1e-3);
                    prop_assert!((v.position[2] - v.tex_coord[1] * size).abs() < 1e-3);
                    prop_assert_eq!(v.position[1], 0.0);
                }
            }
        }

        #[test]
        fn prop_build_is_deterministic(n in 2u32..20, size in 0.1f32..100.0) {
            prop_assert_eq!(GridMesh::build(n, size).unwrap(), GridMesh::build(n, size).unwrap());
        }
    }
}
