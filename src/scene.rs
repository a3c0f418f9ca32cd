//! Scene composition: one animated surface, an orbiting point light and an optional model.

use glam::{Mat4, Vec3};

use crate::assets::LoadedModel;
use crate::error::{AssetLoadFailure, SurfaceError};
use crate::params::{FogParams, ModelAnimation, ModelPlacement, ScenePreset, SunOrbit};
use crate::surface::AnimatedSurface;

/// Everything animated in one view, owned explicitly by the render loop
pub struct Scene {
    name: &'static str,
    surface: AnimatedSurface,
    sun: SunOrbit,
    placement: ModelPlacement,
    animation: ModelAnimation,
    fog: FogParams,
    background: Vec3,
    model: Option<LoadedModel>,
    // Derived from the surface's elapsed time on every tick
    sun_position: Vec3,
    model_transform: Mat4,
}

impl Scene {
    /// Build the scene from a preset (camera parameters are not used here)
    pub fn new(preset: ScenePreset) -> Result<Self, SurfaceError> {
        let surface = AnimatedSurface::create(preset.surface)?;
        let mut scene = Self {
            name: preset.name,
            surface,
            sun: preset.sun,
            placement: preset.placement,
            animation: preset.animation,
            fog: preset.fog,
            background: preset.background,
            model: None,
            sun_position: Vec3::ZERO,
            model_transform: Mat4::IDENTITY,
        };
        scene.update_derived();
        Ok(scene)
    }

    /// Advance one tick: surface time first, then everything derived from it
    pub fn tick(&mut self, delta_seconds: f64) {
        self.surface.advance(delta_seconds);
        self.update_derived();
    }

    fn update_derived(&mut self) {
        let t = self.surface.elapsed_time();
        self.sun_position = self.sun.position_at(t);
        self.model_transform = Mat4::from_scale_rotation_translation(
            Vec3::splat(self.placement.scale),
            self.animation.rotation_at(t),
            self.placement.translation,
        );
    }

    pub fn attach_model(&mut self, model: LoadedModel) {
        log::info!(
            "Placed model {:?} at {} (scale {})",
            model.path,
            self.placement.translation,
            self.placement.scale
        );
        self.model = Some(model);
    }

    /// Apply a loader completion signal; failures are logged and the scene carries on
    ///
    /// Returns true when a model was attached.
    pub fn handle_model_load(&mut self, result: Result<LoadedModel, AssetLoadFailure>) -> bool {
        match result {
            Ok(model) => {
                self.attach_model(model);
                true
            }
            Err(e) => {
                log::error!("Error loading model: {}", error_chain(&e));
                false
            }
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn surface(&self) -> &AnimatedSurface {
        &self.surface
    }

    pub fn elapsed_time(&self) -> f64 {
        self.surface.elapsed_time()
    }

    pub fn model(&self) -> Option<&LoadedModel> {
        self.model.as_ref()
    }

    pub fn model_transform(&self) -> Mat4 {
        self.model_transform
    }

    pub fn sun(&self) -> &SunOrbit {
        &self.sun
    }

    pub fn sun_position(&self) -> Vec3 {
        self.sun_position
    }

    pub fn fog(&self) -> &FogParams {
        &self.fog
    }

    pub fn background(&self) -> Vec3 {
        self.background
    }
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::surface::Vertex;

    fn small_preset() -> ScenePreset {
        let mut preset = ScenePreset::cromlech();
        preset.surface.resolution_x = 8;
        preset.surface.resolution_z = 8;
        preset
    }

    fn dummy_model() -> LoadedModel {
        LoadedModel {
            path: PathBuf::from("rocks.glb"),
            vertices: vec![Vertex::default(); 3],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_tick_advances_surface_once() {
        let mut scene = Scene::new(small_preset()).unwrap();
        scene.tick(0.25);
        scene.tick(0.5);
        assert_eq!(scene.elapsed_time(), 0.75);
        assert_eq!(scene.surface().elapsed_time(), 0.75);
    }

    #[test]
    fn test_sun_follows_elapsed_time() {
        let mut scene = Scene::new(small_preset()).unwrap();
        assert_eq!(scene.sun_position(), scene.sun().position_at(0.0));

        scene.tick(3.0);
        assert_eq!(scene.sun_position(), scene.sun().position_at(3.0));
    }

    #[test]
    fn test_model_transform_at_start() {
        let scene = Scene::new(small_preset()).unwrap();
        let origin = scene.model_transform().transform_point3(Vec3::ZERO);
        let unit_x = scene.model_transform().transform_point3(Vec3::X);

        assert!((origin - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-6);
        assert!((unit_x - Vec3::new(2.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_failed_load_leaves_scene_animating() {
        let mut scene = Scene::new(small_preset()).unwrap();
        let attached = scene.handle_model_load(Err(AssetLoadFailure::Disconnected));

        assert!(!attached);
        assert!(scene.model().is_none());

        scene.tick(1.0);
        assert_eq!(scene.elapsed_time(), 1.0);
    }

    #[test]
    fn test_successful_load_attaches_model() {
        let mut scene = Scene::new(small_preset()).unwrap();
        assert!(scene.handle_model_load(Ok(dummy_model())));
        assert_eq!(scene.model().map(|m| m.triangle_count()), Some(1));
    }

    #[test]
    fn test_invalid_surface_rejected() {
        let mut preset = small_preset();
        preset.surface.width = 0.0;
        assert!(matches!(
            Scene::new(preset),
            Err(SurfaceError::InvalidConfig(_))
        ));
    }
}
