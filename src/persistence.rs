// ABOUTME: Stores the app-local copy of MetalForceHudEnabled in a small TOML state file.
// ABOUTME: The flag only decides whether to re-assert the global default when the demo opens.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

type DynError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Default, Serialize, Deserialize)]
struct LocalState {
    #[serde(rename = "MetalForceHudEnabled", default)]
    metal_force_hud_enabled: bool,
}

/// Default location: `$XDG_STATE_HOME/hudtoggle/state.toml`.
pub fn state_file_path() -> PathBuf {
    let state_dir = std::env::var("XDG_STATE_HOME")
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
            format!("{home}/.local/state")
        });
    PathBuf::from(state_dir).join("hudtoggle").join("state.toml")
}

/// Load the local flag, returning false if missing or unreadable.
pub fn load_local_flag(path: &Path) -> bool {
    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str::<LocalState>(&content) {
            Ok(state) => state.metal_force_hud_enabled,
            Err(e) => {
                tracing::warn!("Ignoring corrupt state file {}: {e}", path.display());
                false
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::warn!("Failed to read state file (treating flag as off): {e}");
            false
        }
    }
}

pub fn save_local_flag(path: &Path, enabled: bool) -> Result<(), DynError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string(&LocalState {
        metal_force_hud_enabled: enabled,
    })?;
    fs::write(path, contents)?;
    tracing::debug!("Saved local flag ({enabled}) to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_false() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!load_local_flag(&dir.path().join("state.toml")));
    }

    #[test]
    fn saved_flag_reads_back_and_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hudtoggle").join("state.toml");
        save_local_flag(&path, true).unwrap();
        assert!(load_local_flag(&path));
        save_local_flag(&path, false).unwrap();
        assert!(!load_local_flag(&path));
    }

    #[test]
    fn file_uses_preference_key_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        save_local_flag(&path, true).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("MetalForceHudEnabled = true"), "{raw}");
    }

    #[test]
    fn corrupt_file_reads_false() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "MetalForceHudEnabled = \"maybe\"").unwrap();
        assert!(!load_local_flag(&path));
    }

    #[test]
    fn state_path_ends_with_app_dir() {
        assert!(state_file_path().ends_with("hudtoggle/state.toml"));
    }
}
