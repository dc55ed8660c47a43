use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Socket the real-time channel adapter connects to.
    pub channel_socket: String,
    /// Base URL of the snapshot/summary collaborator.
    pub api_base_url: String,
    /// Vertical gap between a hovered element and its annotation popover.
    pub popover_margin_px: f32,
    /// Default for the audible add-confirmation toggle.
    pub emit_sound: bool,
    /// Color applied to nodes replayed from a persisted snapshot; live
    /// colors are not persisted.
    pub replay_node_color: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            channel_socket: default_socket_path(),
            api_base_url: "http://localhost:8080/".to_string(),
            popover_margin_px: 65.0,
            emit_sound: true,
            replay_node_color: "#5A5A5A".to_string(),
        }
    }
}

fn default_socket_path() -> String {
    static CACHED: OnceLock<String> = OnceLock::new();
    CACHED
        .get_or_init(|| {
            if let Ok(dir) = std::env::var("XDG_RUNTIME_DIR") {
                format!("{dir}/meetgraph.sock")
            } else {
                "/tmp/meetgraph.sock".to_string()
            }
        })
        .clone()
}

fn config_file_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "meetgraph")?;
    Some(proj.config_dir().join("session.toml"))
}

pub fn load_or_default() -> SessionConfig {
    let Some(path) = config_file_path() else {
        return SessionConfig::default();
    };
    load_or_default_from_path(&path)
}

fn load_or_default_from_path(path: &Path) -> SessionConfig {
    let Ok(contents) = fs::read_to_string(path) else {
        return SessionConfig::default();
    };
    toml::from_str(&contents).unwrap_or_else(|_| SessionConfig::default())
}

pub fn save(cfg: &SessionConfig) -> anyhow::Result<()> {
    let Some(path) = config_file_path() else {
        return Err(anyhow::anyhow!("no config directory available"));
    };
    save_to_path(cfg, &path)
}

fn save_to_path(cfg: &SessionConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let data = toml::to_string_pretty(cfg).context("failed to serialize session config")?;
    fs::write(path, data)
        .with_context(|| format!("failed to write session config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn session_config_roundtrip_save_load() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("session.toml");
        let cfg = SessionConfig::default();

        save_to_path(&cfg, &path).expect("save config");
        let loaded = load_or_default_from_path(&path);

        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempdir().expect("tempdir");
        let loaded = load_or_default_from_path(&dir.path().join("absent.toml"));
        assert_eq!(loaded, SessionConfig::default());
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("session.toml");
        fs::write(&path, "popover_margin_px = \"not a number\"").expect("write");

        let loaded = load_or_default_from_path(&path);
        assert_eq!(loaded, SessionConfig::default());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("session.toml");
        fs::write(&path, "popover_margin_px = 20.0").expect("write");

        let loaded = load_or_default_from_path(&path);
        assert_eq!(loaded.popover_margin_px, 20.0);
        assert_eq!(loaded.emit_sound, SessionConfig::default().emit_sound);
    }
}
