//! Animated procedural surface: a flat grid displaced by a sum of travelling waves
//! and shaded with a vertical colour gradient.

mod mesh;
mod system;

// Re-export public types
pub use mesh::{GridPoint, SurfaceGrid, Vertex};
pub use system::AnimatedSurface;
