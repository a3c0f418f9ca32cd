//! Animated surface: time state plus pure per-vertex displacement and colour.

use std::thread;

use glam::Vec3;

use super::mesh::{GridPoint, SurfaceGrid, Vertex};
use crate::error::SurfaceError;
use crate::params::{wrap_angle, Axis, SurfaceConfig};

/// Tessellated plane whose heights and colours vary with elapsed time
///
/// `advance` is the only mutation. Evaluators borrow `&self`, so a per-vertex
/// pass can never overlap the next `advance` call.
#[derive(Debug, Clone)]
pub struct AnimatedSurface {
    config: SurfaceConfig,
    grid: SurfaceGrid,
    /// Seconds since creation
    elapsed_time: f64,
}

impl AnimatedSurface {
    /// Validate the config and build the grid
    pub fn create(config: SurfaceConfig) -> Result<Self, SurfaceError> {
        config.validate().map_err(SurfaceError::InvalidConfig)?;
        let grid = SurfaceGrid::new(&config);

        log::debug!(
            "Surface grid {}x{} segments ({} vertices, {} wave terms)",
            config.resolution_x,
            config.resolution_z,
            grid.len(),
            config.wave_terms.len()
        );

        Ok(Self {
            config,
            grid,
            elapsed_time: 0.0,
        })
    }

    /// Add one tick's delta to the elapsed time
    ///
    /// Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, delta_seconds: f64) {
        if !(delta_seconds >= 0.0 && delta_seconds.is_finite()) {
            log::warn!("Ignoring invalid surface time step: {}", delta_seconds);
            return;
        }
        self.elapsed_time += delta_seconds;
    }

    /// Vertical displacement of `base_position` at `elapsed_time`
    ///
    /// Sum over wave terms of `amplitude * trig(coord * frequency + elapsed_time * phase_speed)`.
    /// The temporal phase is reduced modulo 2π in f64 so the output stays smooth for
    /// arbitrarily long sessions.
    pub fn displacement_at(&self, base_position: Vec3, elapsed_time: f64) -> f32 {
        self.config
            .wave_terms
            .iter()
            .map(|w| {
                let coord = match w.axis {
                    Axis::X => base_position.x,
                    Axis::Z => base_position.z,
                };
                let phase = coord * w.frequency + wrap_angle(elapsed_time * w.phase_speed as f64);
                w.amplitude * w.trig.eval(phase)
            })
            .sum()
    }

    /// Gradient colour at normalized height `v` (clamped to [0, 1])
    pub fn color_at(&self, normalized_v: f32) -> Vec3 {
        let v = if normalized_v.is_nan() {
            0.0
        } else {
            normalized_v.clamp(0.0, 1.0)
        };
        // Weighted form keeps both endpoints exact
        self.config.color_bottom * (1.0 - v) + self.config.color_top * v
    }

    /// Evaluate every grid vertex at the current elapsed time into `out`
    ///
    /// `out` should hold `vertex_count()` entries; extra entries are left untouched.
    pub fn write_vertices(&self, out: &mut [Vertex]) {
        debug_assert_eq!(out.len(), self.grid.len());
        self.write_span(self.grid.points(), out);
    }

    /// Same as `write_vertices`, split by rows across `workers` scoped threads
    pub fn write_vertices_parallel(&self, out: &mut [Vertex], workers: usize) {
        debug_assert_eq!(out.len(), self.grid.len());
        if workers <= 1 {
            self.write_vertices(out);
            return;
        }

        let rows_per_worker = self.grid.rows().div_ceil(workers);
        let chunk_len = rows_per_worker * self.grid.columns();
        let points = self.grid.points();

        thread::scope(|scope| {
            for (points, out) in points.chunks(chunk_len).zip(out.chunks_mut(chunk_len)) {
                scope.spawn(move || self.write_span(points, out));
            }
        });
    }

    fn write_span(&self, points: &[GridPoint], out: &mut [Vertex]) {
        let t = self.elapsed_time;
        for (point, vertex) in points.iter().zip(out.iter_mut()) {
            let height = self.displacement_at(point.position, t);
            *vertex = Vertex {
                position: (point.position + Vec3::Y * height).to_array(),
                normal: Vec3::Y.to_array(),
                color: self.color_at(point.uv.y).to_array(),
            };
        }
    }

    /// Fresh vertex buffer for the current elapsed time
    pub fn vertices(&self) -> Vec<Vertex> {
        let mut out = vec![Vertex::default(); self.grid.len()];
        self.write_vertices(&mut out);
        out
    }

    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn grid(&self) -> &SurfaceGrid {
        &self.grid
    }

    pub fn vertex_count(&self) -> usize {
        self.grid.len()
    }

    pub fn indices(&self) -> &[u32] {
        self.grid.indices()
    }
}
