// ABOUTME: Loads TOML configuration for the HUD toggle and its demo scene.
// ABOUTME: Provides defaults for the preference shell, UI timings, window size, and cube rendering.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use hudtoggle_demo::{DemoSettings, TextureSource};

type DynError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_shell")]
    pub shell: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_banner_secs")]
    pub banner_secs: u64,
    #[serde(default = "default_reassert_delay_ms")]
    pub reassert_delay_ms: u64,
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_path: Option<String>,
    #[serde(default = "default_rotation_step")]
    pub rotation_step: f32,
    #[serde(default = "default_fov_degrees")]
    pub fov_degrees: f32,
    #[serde(default = "default_eye_distance")]
    pub eye_distance: f32,
}

fn default_shell() -> String {
    hudtoggle_defaults::DEFAULT_SHELL.to_string()
}

fn default_banner_secs() -> u64 {
    3
}

fn default_reassert_delay_ms() -> u64 {
    300
}

fn default_window_width() -> u32 {
    300
}

fn default_window_height() -> u32 {
    300
}

fn default_rotation_step() -> f32 {
    0.005
}

fn default_fov_degrees() -> f32 {
    60.0
}

fn default_eye_distance() -> f32 {
    2.5
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            shell: default_shell(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            banner_secs: default_banner_secs(),
            reassert_delay_ms: default_reassert_delay_ms(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            texture_path: None,
            rotation_step: default_rotation_step(),
            fov_degrees: default_fov_degrees(),
            eye_distance: default_eye_distance(),
        }
    }
}

impl UiConfig {
    pub fn banner_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.banner_secs)
    }

    pub fn reassert_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.reassert_delay_ms)
    }
}

impl DemoConfig {
    /// Renderer settings. A configured texture path must load at startup.
    pub fn settings(&self) -> DemoSettings {
        DemoSettings {
            rotation_step: self.rotation_step,
            fov_degrees: self.fov_degrees,
            eye_distance: self.eye_distance,
            texture: match &self.texture_path {
                Some(path) => TextureSource::File(PathBuf::from(path)),
                None => TextureSource::Builtin,
            },
        }
    }
}

impl Config {
    /// Load configuration from the standard config file location.
    /// Falls back to defaults if the file doesn't exist, and writes them out
    /// so there is a file to edit.
    pub fn load() -> Result<Self, DynError> {
        let path = Self::config_file_path();
        let config = Self::load_from_path(&path)?;
        if !path.exists() {
            if let Err(e) = config.save() {
                tracing::warn!("Could not write default config to {}: {e}", path.display());
            }
        }
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, DynError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config = Self::load_from_str(&contents)?;
        tracing::info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    fn load_from_str(contents: &str) -> Result<Self, DynError> {
        Ok(toml::from_str(contents)?)
    }

    /// Resolve the config path, respecting the HUDTOGGLE_CONFIG env var override.
    pub fn config_file_path() -> PathBuf {
        if let Ok(override_path) = std::env::var("HUDTOGGLE_CONFIG") {
            return PathBuf::from(override_path);
        }
        let xdg_config = std::env::var("XDG_CONFIG_HOME")
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
                format!("{home}/.config")
            });
        Path::new(&xdg_config).join("hudtoggle").join("config.toml")
    }

    /// Save the current configuration to the standard config file location.
    pub fn save(&self) -> Result<(), DynError> {
        self.save_to(&Self::config_file_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), DynError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_empty_toml_gives_defaults() {
        let config = Config::load_from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.defaults.shell, "/bin/zsh");
        assert_eq!(config.ui.banner_secs, 3);
        assert_eq!(config.ui.reassert_delay_ms, 300);
        assert_eq!((config.ui.window_width, config.ui.window_height), (300, 300));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let toml = r#"
[ui]
banner_secs = 5

[demo]
rotation_step = 0.01
"#;
        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.ui.banner_secs, 5);
        assert_eq!(config.ui.reassert_delay_ms, 300);
        assert_eq!(config.demo.rotation_step, 0.01);
        assert_eq!(config.demo.fov_degrees, 60.0);
        assert_eq!(config.defaults.shell, "/bin/zsh");
    }

    #[test]
    fn texture_path_selects_file_source() {
        let toml = r#"
[demo]
texture_path = "/opt/hudtoggle/sppico.png"
"#;
        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(
            config.demo.settings().texture,
            TextureSource::File(PathBuf::from("/opt/hudtoggle/sppico.png"))
        );
        assert_eq!(Config::default().demo.settings().texture, TextureSource::Builtin);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(Config::load_from_str("[ui]\nbanner_secs = \"soon\"").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_path(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hudtoggle").join("config.toml");
        let mut config = Config::default();
        config.defaults.shell = "/bin/bash".to_string();
        config.demo.texture_path = Some("/tmp/cube.png".to_string());

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from_path(&path).unwrap(), config);
    }

    // The only test that touches HUDTOGGLE_CONFIG, so no other test races it.
    #[test]
    fn load_seeds_default_file_and_save_uses_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        unsafe { std::env::set_var("HUDTOGGLE_CONFIG", &path) };
        assert_eq!(Config::config_file_path(), path);

        let config = Config::load().unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let mut changed = config.clone();
        changed.ui.banner_secs = 7;
        changed.save().unwrap();
        assert_eq!(Config::load().unwrap().ui.banner_secs, 7);

        unsafe { std::env::remove_var("HUDTOGGLE_CONFIG") };
    }

    #[test]
    fn durations_follow_config() {
        let ui = UiConfig::default();
        assert_eq!(ui.banner_duration(), std::time::Duration::from_secs(3));
        assert_eq!(ui.reassert_delay(), std::time::Duration::from_millis(300));
    }
}
