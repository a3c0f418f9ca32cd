//! Rendering configuration: window, projection, background and fog.

use glam::Vec3;

use super::color_from_hex;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (meters)
    pub near_plane_m: f32,

    /// Far clipping plane (meters)
    pub far_plane_m: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 75.0,
            near_plane_m: 0.1,
            far_plane_m: 1000.0, // Well past the 200m surface diagonal
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }
}

/// Exponential-squared distance fog
///
/// Formula: fog_factor = 1 - exp(-(density * depth)^2)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogParams {
    /// Fog colour (linear RGB)
    pub color: Vec3,

    /// Density (per meter)
    pub density: f32,
}

impl Default for FogParams {
    fn default() -> Self {
        Self {
            color: color_from_hex(0x87ceeb), // Sky blue
            density: 0.005,
        }
    }
}

impl FogParams {
    /// Blend factor toward the fog colour at `depth` meters from the eye
    ///
    /// CPU copy of the fog term in `fs_main` (shader.wgsl); the shader is what
    /// renders, keep the two in step.
    pub fn factor(&self, depth: f32) -> f32 {
        let d = self.density * depth;
        (1.0 - (-d * d).exp()).clamp(0.0, 1.0)
    }
}
