//! Scene presets: light orbit, model placement/animation and per-scene constants.

use glam::{Quat, Vec3};

use super::{color_from_hex, FogParams, OrbitCameraParams, SurfaceConfig, WaveTerm};
use crate::params::Axis;

/// Point light circling the scene at constant height
///
/// Position at time t: (radius * sin(t * speed), height, radius * cos(t * speed))
#[derive(Debug, Clone)]
pub struct SunOrbit {
    /// Horizontal orbit radius (meters)
    pub radius_m: f32,

    /// Constant light height (meters)
    pub height_m: f32,

    /// Angular speed (radians per second)
    pub angular_speed: f32,

    /// Light colour (linear RGB)
    pub color: Vec3,

    /// Intensity multiplier
    pub intensity: f32,

    /// Distance at which the light's contribution reaches zero (meters)
    pub range_m: f32,

    /// Flat ambient term so unlit faces stay readable
    pub ambient: f32,
}

impl Default for SunOrbit {
    fn default() -> Self {
        Self {
            radius_m: 50.0,
            height_m: 50.0,
            angular_speed: 0.2,
            color: Vec3::ONE,
            intensity: 1.5,
            range_m: 200.0,
            ambient: 0.05,
        }
    }
}

impl SunOrbit {
    pub fn position_at(&self, time_s: f64) -> Vec3 {
        let angle = wrap_angle(time_s * self.angular_speed as f64);
        Vec3::new(
            self.radius_m * angle.sin(),
            self.height_m,
            self.radius_m * angle.cos(),
        )
    }
}

/// Where a loaded model sits in the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPlacement {
    /// Translation (meters)
    pub translation: Vec3,

    /// Uniform scale factor
    pub scale: f32,
}

impl Default for ModelPlacement {
    fn default() -> Self {
        Self {
            translation: Vec3::new(0.0, 2.0, 0.0),
            scale: 2.0,
        }
    }
}

/// Per-frame rotation applied to a loaded model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelAnimation {
    Still,

    /// Oscillating tilt: angle = sin(t * frequency) * amplitude_rad
    Sway {
        axis: Vec3,
        amplitude_rad: f32,
        frequency: f32,
    },

    /// Continuous rotation: angle = t * rate_rad_per_s
    Spin { axis: Vec3, rate_rad_per_s: f32 },
}

impl Default for ModelAnimation {
    fn default() -> Self {
        Self::Sway {
            axis: Vec3::Z,
            amplitude_rad: 0.1,
            frequency: 0.01,
        }
    }
}

impl ModelAnimation {
    /// Rotation angle (radians) about the animation axis at time t
    pub fn angle_at(&self, time_s: f64) -> f32 {
        match *self {
            Self::Still => 0.0,
            Self::Sway {
                amplitude_rad,
                frequency,
                ..
            } => wrap_angle(time_s * frequency as f64).sin() * amplitude_rad,
            Self::Spin { rate_rad_per_s, .. } => wrap_angle(time_s * rate_rad_per_s as f64),
        }
    }

    pub fn rotation_at(&self, time_s: f64) -> Quat {
        match *self {
            Self::Still => Quat::IDENTITY,
            Self::Sway { axis, .. } | Self::Spin { axis, .. } => {
                Quat::from_axis_angle(axis.normalize_or_zero(), self.angle_at(time_s))
            }
        }
    }
}

/// Named bundle of construction-time scene parameters
#[derive(Debug, Clone)]
pub struct ScenePreset {
    pub name: &'static str,
    pub surface: SurfaceConfig,
    pub sun: SunOrbit,
    pub placement: ModelPlacement,
    pub animation: ModelAnimation,
    pub camera: OrbitCameraParams,
    pub fog: FogParams,

    /// Clear colour (linear RGB)
    pub background: Vec3,
}

impl Default for ScenePreset {
    fn default() -> Self {
        Self::cromlech()
    }
}

impl ScenePreset {
    pub const NAMES: [&'static str; 2] = ["cromlech", "lagoon"];

    /// Sand-coloured rippling plane with a gently swaying stone circle
    pub fn cromlech() -> Self {
        Self {
            name: "cromlech",
            surface: SurfaceConfig::default(),
            sun: SunOrbit::default(),
            placement: ModelPlacement::default(),
            animation: ModelAnimation::default(),
            camera: OrbitCameraParams::default(),
            fog: FogParams::default(),
            background: color_from_hex(0x3c3c3c),
        }
    }

    /// Deep-water variant: faster, broader swell and a model turning about Y
    pub fn lagoon() -> Self {
        Self {
            name: "lagoon",
            surface: SurfaceConfig {
                color_top: color_from_hex(0x4fb4d8),
                color_bottom: color_from_hex(0x0a3d62),
                wave_terms: vec![
                    WaveTerm::sine(Axis::X, 0.5, 0.15, 0.8),
                    WaveTerm::cosine(Axis::Z, 0.25, 0.4, 1.2),
                ],
                ..SurfaceConfig::default()
            },
            sun: SunOrbit {
                angular_speed: 0.1,
                ..SunOrbit::default()
            },
            placement: ModelPlacement::default(),
            animation: ModelAnimation::Spin {
                axis: Vec3::Y,
                rate_rad_per_s: 0.2,
            },
            camera: OrbitCameraParams::default(),
            fog: FogParams {
                color: color_from_hex(0x0b1d2a),
                density: 0.004,
            },
            background: color_from_hex(0x0b1d2a),
        }
    }

    /// Look up a preset by name (case-insensitive)
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "cromlech" => Some(Self::cromlech()),
            "lagoon" => Some(Self::lagoon()),
            _ => None,
        }
    }
}

/// Reduce an angle to [0, 2π) in f64 before narrowing, keeping f32 trig accurate at large t
pub(crate) fn wrap_angle(angle: f64) -> f32 {
    angle.rem_euclid(std::f64::consts::TAU) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sun_orbit_start_and_quarter_turn() {
        let sun = SunOrbit::default();
        let p0 = sun.position_at(0.0);
        assert_eq!(p0, Vec3::new(0.0, 50.0, 50.0));

        // Quarter turn at speed 0.2 rad/s
        let quarter = std::f64::consts::FRAC_PI_2 / 0.2f32 as f64;
        let p1 = sun.position_at(quarter);
        assert!((p1.x - 50.0).abs() < 1e-3);
        assert!(p1.z.abs() < 1e-3);
        assert_eq!(p1.y, 50.0);
    }

    #[test]
    fn test_sway_is_bounded() {
        let anim = ModelAnimation::default();
        for t in 0..1000 {
            let angle = anim.angle_at(t as f64 * 3.7);
            assert!(angle.abs() <= 0.1 + 1e-6);
        }
        assert_eq!(anim.angle_at(0.0), 0.0);
    }

    #[test]
    fn test_spin_accumulates() {
        let anim = ModelAnimation::Spin {
            axis: Vec3::Y,
            rate_rad_per_s: 0.5,
        };
        assert!((anim.angle_at(2.0) - 1.0).abs() < 1e-6);
        assert_eq!(ModelAnimation::Still.rotation_at(42.0), Quat::IDENTITY);
    }

    #[test]
    fn test_presets_by_name() {
        for name in ScenePreset::NAMES {
            let preset = ScenePreset::by_name(name).unwrap();
            assert_eq!(preset.name, name);
            assert!(preset.surface.validate().is_ok());
        }
        assert!(ScenePreset::by_name("LAGOON").is_some());
        assert!(ScenePreset::by_name("atlantis").is_none());
    }

    #[test]
    fn test_presets_differ_in_waves() {
        let a = ScenePreset::cromlech();
        let b = ScenePreset::lagoon();
        assert_ne!(a.surface.wave_terms, b.surface.wave_terms);
        assert_eq!(a.surface.vertex_count(), b.surface.vertex_count());
    }

    #[test]
    fn test_wrap_angle_large_time() {
        let wrapped = wrap_angle(1.0e9);
        assert!((0.0..std::f32::consts::TAU).contains(&wrapped));
    }
}
