use std::path::Path;

use anyhow::Context;
use pixelswarm_image::SetupOptions;
use pixelswarm_input::InteractionMode;
use pixelswarm_kernel::WorldConfig;
use serde::{Deserialize, Serialize};

/// Everything needed to build and run an image scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub world: WorldConfig,
    pub setup: SetupOptions,
    /// Magnitude of the random jitter force on every particle.
    pub entropy: f64,
    pub interaction: InteractionMode,
    /// Color particles with their pixel instead of white.
    pub pixel_colors: bool,
    pub background: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            setup: SetupOptions::default(),
            entropy: 10.0,
            interaction: InteractionMode::default(),
            pixel_colors: true,
            background: "#222".to_string(),
        }
    }
}

impl SceneConfig {
    /// Load from YAML (`.yaml`/`.yml`) or JSON (anything else).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scene config {}", path.display()))?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );
        let config: SceneConfig = if is_yaml {
            serde_yaml::from_str(&text).context("parsing YAML scene config")?
        } else {
            serde_json::from_str(&text).context("parsing JSON scene config")?
        };
        config.world.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use pixelswarm_kernel::TimingCurve;

    use super::*;

    fn write(name: &str, body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        (dir, path)
    }

    #[test]
    fn yaml_config_overrides_defaults() {
        let (_dir, path) = write(
            "scene.yaml",
            "world:\n  frame_rate: 60\n  death_curve: linear\nsetup:\n  max_particles: 300\nentropy: 2.5\n",
        );
        let config = SceneConfig::load(&path).unwrap();
        assert_eq!(config.world.frame_rate, 60.0);
        assert!(matches!(config.world.death_curve, TimingCurve::Linear));
        assert_eq!(config.setup.max_particles, 300);
        assert_eq!(config.setup.scale, 1.0);
        assert_eq!(config.entropy, 2.5);
        assert_eq!(config.background, "#222");
    }

    #[test]
    fn json_config_is_the_fallback() {
        let (_dir, path) = write(
            "scene.json",
            r#"{ "pixel_colors": false, "interaction": { "attract": { "strength": 0.1 } } }"#,
        );
        let config = SceneConfig::load(&path).unwrap();
        assert!(!config.pixel_colors);
        assert_eq!(config.interaction, InteractionMode::Attract { strength: 0.1 });
        assert_eq!(config.entropy, 10.0);
    }

    #[test]
    fn invalid_world_config_is_rejected() {
        let (_dir, path) = write("scene.json", r#"{ "world": { "frame_rate": 0 } }"#);
        assert!(SceneConfig::load(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SceneConfig::load(&dir.path().join("nope.json")).is_err());
    }
}
