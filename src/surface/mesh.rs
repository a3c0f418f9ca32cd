//! Flat surface grid: base vertex positions, normalized coordinates and triangle indices.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::params::SurfaceConfig;

/// Vertex data uploaded to the GPU (position + normal + colour)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

/// Undisplaced grid vertex
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridPoint {
    /// Base position in the surface's local XZ plane (y = 0)
    pub position: Vec3,

    /// Normalized coordinate in [0, 1]²
    pub uv: Vec2,
}

/// Tessellated plane spanning [-width/2, width/2] × [-depth/2, depth/2]
///
/// Points are stored row-major: one row per Z step, `columns()` points per row.
/// `u` grows with X; `v` is 1 on the far edge (z = -depth/2) and 0 on the near edge.
#[derive(Debug, Clone)]
pub struct SurfaceGrid {
    points: Vec<GridPoint>,
    indices: Vec<u32>,
    columns: usize,
    rows: usize,
}

impl SurfaceGrid {
    /// Build the grid for an already-validated config
    pub fn new(config: &SurfaceConfig) -> Self {
        let columns = config.resolution_x + 1;
        let rows = config.resolution_z + 1;
        let half_width = config.width / 2.0;
        let half_depth = config.depth / 2.0;

        let mut points = Vec::with_capacity(config.vertex_count());

        // Generate flat XZ plane grid
        for z in 0..rows {
            let t = z as f32 / config.resolution_z as f32;
            for x in 0..columns {
                let u = x as f32 / config.resolution_x as f32;
                points.push(GridPoint {
                    position: Vec3::new(
                        u * config.width - half_width,
                        0.0,
                        t * config.depth - half_depth,
                    ),
                    uv: Vec2::new(u, 1.0 - t),
                });
            }
        }

        // Generate triangle indices (counter-clockwise winding seen from +Y)
        let mut indices = Vec::with_capacity(config.resolution_x * config.resolution_z * 6);
        for z in 0..config.resolution_z {
            for x in 0..config.resolution_x {
                let top_left = (z * columns + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * columns + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Self {
            points,
            indices,
            columns,
            rows,
        }
    }

    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Points per row (resolution_x + 1)
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Row count (resolution_z + 1)
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at column `x`, row `z`
    pub fn point(&self, x: usize, z: usize) -> Option<&GridPoint> {
        if x >= self.columns || z >= self.rows {
            return None;
        }
        self.points.get(z * self.columns + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SurfaceConfig {
        SurfaceConfig {
            width: 200.0,
            depth: 100.0,
            resolution_x: 4,
            resolution_z: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_grid_creation() {
        let config = small_config();
        let grid = SurfaceGrid::new(&config);

        // Check vertex count: (rx + 1) * (rz + 1)
        assert_eq!(grid.len(), 5 * 3);

        // Check triangle count: rx * rz * 2 triangles * 3 indices
        assert_eq!(grid.indices().len(), 4 * 2 * 6);
        assert!(grid.indices().iter().all(|&i| (i as usize) < grid.len()));
    }

    #[test]
    fn test_grid_extent() {
        let grid = SurfaceGrid::new(&small_config());
        let first = grid.point(0, 0).unwrap().position;
        let last = grid.point(4, 2).unwrap().position;
        assert_eq!(first, Vec3::new(-100.0, 0.0, -50.0));
        assert_eq!(last, Vec3::new(100.0, 0.0, 50.0));
        assert!(grid.point(5, 0).is_none());
    }

    #[test]
    fn test_corner_uvs_exact() {
        let grid = SurfaceGrid::new(&small_config());
        let uv = |x, z| grid.point(x, z).unwrap().uv;
        assert_eq!(uv(0, 2), Vec2::new(0.0, 0.0));
        assert_eq!(uv(4, 2), Vec2::new(1.0, 0.0));
        assert_eq!(uv(0, 0), Vec2::new(0.0, 1.0));
        assert_eq!(uv(4, 0), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_uv_linear_in_between() {
        let grid = SurfaceGrid::new(&small_config());
        let mid = grid.point(2, 1).unwrap();
        assert_eq!(mid.uv, Vec2::new(0.5, 0.5));
        assert_eq!(mid.position, Vec3::ZERO);
    }
}
