//! Orbit camera: drag to circle the target, scroll to zoom, resize to reproject.

use glam::{Mat4, Vec3};

use crate::params::{OrbitCameraParams, RenderConfig};

/// Keeps the camera just short of the poles so `look_at` never degenerates
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Camera orbiting a fixed target on a sphere
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    params: OrbitCameraParams,
    target: Vec3,
    radius: f32,
    /// Rotation about +Y, zero looking down -Z
    yaw: f32,
    /// Elevation above the target's horizontal plane
    pitch: f32,
    fov_degrees: f32,
    near: f32,
    far: f32,
    aspect: f32,
}

impl OrbitCamera {
    /// Create camera at `params.eye` looking at `params.target`
    pub fn new(params: OrbitCameraParams, render_config: &RenderConfig) -> Self {
        let target = Vec3::from_array(params.target);
        let offset = Vec3::from_array(params.eye) - target;
        let radius = offset
            .length()
            .clamp(params.min_radius_m, params.max_radius_m);
        let (yaw, pitch) = if offset.length_squared() > 0.0 {
            let dir = offset.normalize();
            (dir.x.atan2(dir.z), dir.y.asin().clamp(-MAX_PITCH, MAX_PITCH))
        } else {
            (0.0, 0.0)
        };

        Self {
            params,
            target,
            radius,
            yaw,
            pitch,
            fov_degrees: render_config.fov_degrees,
            near: render_config.near_plane_m,
            far: render_config.far_plane_m,
            aspect: render_config.aspect_ratio(),
        }
    }

    /// Current eye position
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + self.radius * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Orbit by a mouse drag of (dx, dy) pixels
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.params.rotate_sensitivity;
        self.pitch =
            (self.pitch + dy * self.params.rotate_sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Zoom by scroll lines (positive moves closer)
    pub fn zoom(&mut self, lines: f32) {
        let factor = (1.0 - self.params.zoom_step).powf(lines);
        self.radius =
            (self.radius * factor).clamp(self.params.min_radius_m, self.params.max_radius_m);
    }

    /// Recompute the projection aspect after a viewport resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// View-projection matrix for rendering
    pub fn view_proj(&self) -> Mat4 {
        // Always keep Y as up vector (camera never rolls)
        let view = Mat4::look_at_rh(self.eye(), self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
        proj * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(OrbitCameraParams::default(), &RenderConfig::default())
    }

    #[test]
    fn test_initial_eye_matches_params() {
        let cam = camera();
        let expected = Vec3::new(-35.0, 30.0, 70.0);
        assert!((cam.eye() - expected).length() < 1e-3);
        assert_eq!(cam.target(), Vec3::ZERO);
    }

    #[test]
    fn test_rotate_keeps_radius_and_clamps_pitch() {
        let mut cam = camera();
        let radius = cam.radius();

        cam.rotate(120.0, 0.0);
        assert!((cam.eye().length() - radius).abs() < 1e-3);

        cam.rotate(0.0, 1.0e6);
        let eye = cam.eye();
        assert!(eye.y < radius);
        assert!(eye.y > 0.99 * radius);
        assert!(cam.view_proj().is_finite());
    }

    #[test]
    fn test_zoom_clamped() {
        let mut cam = camera();
        let start = cam.radius();

        cam.zoom(1.0);
        assert!(cam.radius() < start);

        cam.zoom(1000.0);
        assert_eq!(cam.radius(), OrbitCameraParams::default().min_radius_m);

        cam.zoom(-1000.0);
        assert_eq!(cam.radius(), OrbitCameraParams::default().max_radius_m);
    }

    #[test]
    fn test_resize_changes_aspect_only() {
        let mut cam = camera();
        let eye = cam.eye();
        let before = cam.view_proj();

        cam.resize(800, 800);
        assert_eq!(cam.aspect(), 1.0);
        assert_eq!(cam.eye(), eye);
        assert_ne!(cam.view_proj(), before);

        cam.resize(800, 0);
        assert!(cam.aspect().is_finite());
    }

    #[test]
    fn test_view_proj_matrix_generation() {
        let view_proj = camera().view_proj();

        // Matrix should not be identity or zero
        assert_ne!(view_proj, Mat4::IDENTITY);
        assert_ne!(view_proj, Mat4::ZERO);
        assert!(view_proj.is_finite());
    }
}
