//! Orbit camera configuration.

/// Orbit camera placement and control sensitivity
#[derive(Debug, Clone)]
pub struct OrbitCameraParams {
    /// Initial eye position (meters)
    pub eye: [f32; 3],

    /// Point the camera orbits and looks at (meters)
    pub target: [f32; 3],

    /// Orbit speed (radians per pixel of mouse drag)
    pub rotate_sensitivity: f32,

    /// Fractional radius change per scroll line
    pub zoom_step: f32,

    /// Closest allowed orbit radius (meters)
    pub min_radius_m: f32,

    /// Farthest allowed orbit radius (meters)
    pub max_radius_m: f32,
}

impl Default for OrbitCameraParams {
    fn default() -> Self {
        Self {
            eye: [-35.0, 30.0, 70.0],
            target: [0.0, 0.0, 0.0],
            rotate_sensitivity: 0.005,
            zoom_step: 0.1,
            min_radius_m: 5.0,
            max_radius_m: 400.0,
        }
    }
}
