//! Animated surface parameters: grid extent, resolution, colour gradient and wave terms.

use glam::Vec3;

use super::color_from_hex;

/// Grid axis a wave term travels along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Z,
}

/// Trigonometric variant of a wave term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrigPhase {
    Sine,
    Cosine,
}

impl TrigPhase {
    #[inline]
    pub fn eval(self, phase: f32) -> f32 {
        match self {
            Self::Sine => phase.sin(),
            Self::Cosine => phase.cos(),
        }
    }
}

/// One sinusoidal contribution to vertical displacement
///
/// Formula: `amplitude * trig(coord * frequency + t * phase_speed)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveTerm {
    /// Axis whose base coordinate drives the phase
    pub axis: Axis,

    /// Peak height contribution (meters)
    pub amplitude: f32,

    /// Spatial frequency (radians per meter)
    pub frequency: f32,

    /// Temporal phase speed (radians per second)
    pub phase_speed: f32,

    pub trig: TrigPhase,
}

impl WaveTerm {
    pub fn sine(axis: Axis, amplitude: f32, frequency: f32, phase_speed: f32) -> Self {
        Self {
            axis,
            amplitude,
            frequency,
            phase_speed,
            trig: TrigPhase::Sine,
        }
    }

    pub fn cosine(axis: Axis, amplitude: f32, frequency: f32, phase_speed: f32) -> Self {
        Self {
            axis,
            amplitude,
            frequency,
            phase_speed,
            trig: TrigPhase::Cosine,
        }
    }

    fn is_finite(&self) -> bool {
        self.amplitude.is_finite() && self.frequency.is_finite() && self.phase_speed.is_finite()
    }
}

/// Construction-time surface configuration (never mutated after `AnimatedSurface::create`)
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    /// Extent along X (meters)
    pub width: f32,

    /// Extent along Z (meters)
    pub depth: f32,

    /// Segments along X (vertices per row = resolution_x + 1)
    pub resolution_x: usize,

    /// Segments along Z (vertex rows = resolution_z + 1)
    pub resolution_z: usize,

    /// Gradient colour at v = 1 (linear RGB)
    pub color_top: Vec3,

    /// Gradient colour at v = 0 (linear RGB)
    pub color_bottom: Vec3,

    /// Ordered wave terms summed into the displacement
    pub wave_terms: Vec<WaveTerm>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 200.0,
            depth: 200.0,
            resolution_x: 512, // 263,169 vertices
            resolution_z: 512,
            color_top: color_from_hex(0xfaf2da),    // Pale sand
            color_bottom: color_from_hex(0xf7eccb), // Warm sand
            wave_terms: vec![
                WaveTerm::sine(Axis::X, 0.3, 0.3, 1.0),
                WaveTerm::cosine(Axis::Z, 0.2, 0.2, 0.5),
            ],
        }
    }
}

impl SurfaceConfig {
    /// Number of grid vertices: (resolution_x + 1) * (resolution_z + 1)
    pub fn vertex_count(&self) -> usize {
        (self.resolution_x + 1) * (self.resolution_z + 1)
    }

    /// Vertex count, or None when it does not fit a `u32` index buffer
    fn checked_vertex_count(&self) -> Option<usize> {
        let columns = self.resolution_x.checked_add(1)?;
        let rows = self.resolution_z.checked_add(1)?;
        columns
            .checked_mul(rows)
            .filter(|&count| count <= u32::MAX as usize)
    }

    /// Upper bound on |displacement| for any input: sum of |amplitude|
    pub fn max_displacement(&self) -> f32 {
        self.wave_terms.iter().map(|w| w.amplitude.abs()).sum()
    }

    /// Validate configuration (extents positive, at least one segment per axis,
    /// every vertex addressable by a `u32` index)
    pub fn validate(&self) -> Result<(), String> {
        if self.resolution_x < 1 || self.resolution_z < 1 {
            return Err(format!(
                "resolution must be at least 1 on both axes, got {}x{}",
                self.resolution_x, self.resolution_z
            ));
        }
        if self.checked_vertex_count().is_none() {
            return Err(format!(
                "resolution {}x{} exceeds the u32 index range",
                self.resolution_x, self.resolution_z
            ));
        }
        // Written as negations so NaN is rejected too
        if !(self.width > 0.0 && self.width.is_finite()) {
            return Err(format!("width must be positive and finite, got {}", self.width));
        }
        if !(self.depth > 0.0 && self.depth.is_finite()) {
            return Err(format!("depth must be positive and finite, got {}", self.depth));
        }
        if let Some(i) = self.wave_terms.iter().position(|w| !w.is_finite()) {
            return Err(format!("wave term {} has non-finite parameters", i));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SurfaceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.vertex_count(), 513 * 513);
    }

    #[test]
    fn test_rejects_degenerate_grid() {
        let mut config = SurfaceConfig::default();
        config.resolution_z = 0;
        assert!(config.validate().is_err());

        let mut config = SurfaceConfig::default();
        config.depth = 0.0;
        assert!(config.validate().is_err());

        let mut config = SurfaceConfig::default();
        config.width = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_wave() {
        let mut config = SurfaceConfig::default();
        config.wave_terms.push(WaveTerm::sine(Axis::X, f32::INFINITY, 1.0, 1.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_displacement_uses_magnitudes() {
        let mut config = SurfaceConfig::default();
        config.wave_terms = vec![
            WaveTerm::sine(Axis::X, -0.5, 1.0, 1.0),
            WaveTerm::cosine(Axis::Z, 0.25, 1.0, 1.0),
        ];
        assert_eq!(config.max_displacement(), 0.75);
    }

    #[test]
    fn test_rejects_oversized_grid() {
        let mut config = SurfaceConfig::default();
        config.resolution_x = usize::MAX;
        config.resolution_z = 1;
        assert!(config.validate().is_err());

        // 70001^2 vertices overflow a u32 index
        let mut config = SurfaceConfig::default();
        config.resolution_x = 70_000;
        config.resolution_z = 70_000;
        assert!(config.validate().is_err());

        // Largest square grid that still fits
        let mut config = SurfaceConfig::default();
        config.resolution_x = 65_534;
        config.resolution_z = 65_534;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_trig_eval() {
        assert_eq!(TrigPhase::Sine.eval(0.0), 0.0);
        assert_eq!(TrigPhase::Cosine.eval(0.0), 1.0);
    }
}
