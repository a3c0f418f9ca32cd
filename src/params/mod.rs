//! Parameter definitions with physical units and documented semantics.
//!
//! All scene constants are extracted here with:
//! - Physical units (meters, seconds, radians)
//! - Documented ranges and meanings
//! - Named presets for complete scenes

mod camera;
mod render;
mod scene;
mod surface;

use glam::Vec3;

// Re-export all types
pub use camera::OrbitCameraParams;
pub use render::{FogParams, RenderConfig};
pub use scene::{ModelAnimation, ModelPlacement, ScenePreset, SunOrbit};
pub(crate) use scene::wrap_angle;
pub use surface::{Axis, SurfaceConfig, TrigPhase, WaveTerm};

/// Convert a 0xRRGGBB sRGB hex colour to linear RGB in [0, 1]
pub fn color_from_hex(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
