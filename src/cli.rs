//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::{RenderConfig, ScenePreset};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Oceanscape")]
#[command(about = "Animated procedural ocean with a loaded model", long_about = None)]
pub struct Args {
    /// Scene preset: cromlech (default), lagoon
    #[arg(long, value_name = "PRESET", default_value = "cromlech")]
    pub preset: String,

    /// glTF/GLB model to place in the scene (loaded in the background)
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Surface segments per axis (overrides the preset)
    #[arg(long, value_name = "SEGMENTS")]
    pub resolution: Option<usize>,

    /// Worker threads for per-vertex evaluation (default: available cores)
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Initial window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "1280")]
    pub width: u32,

    /// Initial window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "720")]
    pub height: u32,
}

impl Args {
    /// Resolve the scene preset, applying command-line overrides
    pub fn scene_preset(&self) -> ScenePreset {
        let mut preset = ScenePreset::by_name(&self.preset).unwrap_or_else(|| {
            log::warn!(
                "Unknown scene preset '{}', using cromlech (available: {})",
                self.preset,
                ScenePreset::NAMES.join(", ")
            );
            ScenePreset::cromlech()
        });
        log::info!("Scene: {}", preset.name);

        if let Some(segments) = self.resolution {
            preset.surface.resolution_x = segments;
            preset.surface.resolution_z = segments;
        }
        preset
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width,
            window_height: self.height,
            ..RenderConfig::default()
        }
    }

    /// Number of threads for the per-vertex pass (at least 1)
    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["oceanscape"]);
        assert_eq!(args.preset, "cromlech");
        assert!(args.model.is_none());
        assert_eq!(args.render_config().window_width, 1280);
        assert!(args.worker_count() >= 1);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "oceanscape",
            "--preset",
            "lagoon",
            "--resolution",
            "64",
            "--workers",
            "0",
            "--model",
            "rocks.glb",
        ]);
        let preset = args.scene_preset();
        assert_eq!(preset.name, "lagoon");
        assert_eq!(preset.surface.resolution_x, 64);
        assert_eq!(preset.surface.resolution_z, 64);
        assert_eq!(args.worker_count(), 1);
        assert_eq!(args.model, Some(PathBuf::from("rocks.glb")));
    }

    #[test]
    fn test_unknown_preset_falls_back() {
        let args = Args::parse_from(["oceanscape", "--preset", "atlantis"]);
        assert_eq!(args.scene_preset().name, "cromlech");
    }

    #[test]
    fn test_zero_resolution_reaches_validation() {
        let args = Args::parse_from(["oceanscape", "--resolution", "0"]);
        assert!(args.scene_preset().surface.validate().is_err());
    }
}
