//! Oceanscape library - animated procedural ocean surface and scene plumbing

pub mod assets;
pub mod camera;
pub mod cli;
pub mod clock;
pub mod error;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod surface;
