//! Demo settings with persistence
//!
//! Settings are read from `~/.config/rigcam/settings.toml`. Missing sections
//! and fields fall back to defaults.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use rigcam_control::{RigConfig, SelectorConfig};
use rigcam_core::TimeConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rig: RigConfig,
    pub selector: SelectorConfig,
    pub time: TimeConfig,
    pub demo: DemoSettings,
}

impl Settings {
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rigcam"))
    }

    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Parse and validate settings text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let settings: Self = toml::from_str(content).context("failed to parse settings")?;
        settings.rig.validate().context("invalid rig settings")?;
        Ok(settings)
    }

    /// Load settings from disk, or return defaults if missing or invalid
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        let loaded = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))
            .and_then(|content| Self::from_toml_str(&content));
        match loaded {
            Ok(settings) => {
                info!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("{:#}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }

        let path = dir.join("settings.toml");
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(path)
    }
}

/// Scripted demo scene
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    /// Frames to simulate
    pub frames: u32,
    /// Raw delta time fed to the clock each frame
    pub frame_time: f32,
    /// Viewport size in pixels
    pub viewport: (u32, u32),
    /// Half the side length of the square play area
    pub world_half_size: f32,
    pub fixed_objects: u32,
    pub wanderers: u32,
    /// Wanderer speed in units per second
    pub wander_speed: f32,
    /// Seed for object placement; random when absent
    pub seed: Option<u64>,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            frames: 420,
            frame_time: 1.0 / 60.0,
            viewport: (1920, 1080),
            world_half_size: 50.0,
            fixed_objects: 6,
            wanderers: 3,
            wander_speed: 3.0,
            seed: Some(7),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip() {
        let text = toml::to_string_pretty(&Settings::default()).unwrap();
        let parsed = Settings::from_toml_str(&text).unwrap();
        assert_eq!(parsed.rig, RigConfig::default());
        assert_eq!(parsed.demo.frames, 420);
    }

    #[test]
    fn test_partial_file() {
        let parsed = Settings::from_toml_str(
            r#"
            [rig]
            zoom_max = 60.0

            [demo]
            wanderers = 1
            "#,
        )
        .unwrap();
        assert_eq!(parsed.rig.zoom_max, 60.0);
        assert_eq!(parsed.rig.zoom_min, 5.0);
        assert_eq!(parsed.demo.wanderers, 1);
        assert_eq!(parsed.selector, SelectorConfig::default());
    }

    #[test]
    fn test_invalid_rig_rejected() {
        let err = Settings::from_toml_str("[rig]\ntilt_max = 95.0\n").unwrap_err();
        assert!(format!("{:#}", err).contains("tilt range"));
    }
}
