//! Game configuration (window, graphics, input, world). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which presentation the frame loop draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    /// Flat map: terrain bands, features, player and horse as rectangles.
    TopDown,
    /// Lit terrain mesh seen from the player's eyes.
    #[default]
    FirstPerson,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::TopDown => ViewMode::FirstPerson,
            ViewMode::FirstPerson => ViewMode::TopDown,
        }
    }
}

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Enable vsync (recommended to avoid tearing).
    #[serde(default = "default_true")]
    pub vsync: bool,
    /// Mouse sensitivity multiplier (1.0 = default).
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Fixed world seed for reproducible terrain. `None` seeds from entropy.
    #[serde(default)]
    pub world_seed: Option<u64>,
    /// View shown on startup; Tab toggles.
    #[serde(default)]
    pub start_view: ViewMode,
    /// Root of `models/` and `icons/`.
    #[serde(default = "default_asset_dir")]
    pub asset_dir: PathBuf,
}

fn default_window_width() -> u32 {
    800
}
fn default_window_height() -> u32 {
    600
}
fn default_true() -> bool {
    true
}
fn default_sensitivity() -> f32 {
    1.0
}
fn default_asset_dir() -> PathBuf {
    PathBuf::from("assets")
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            vsync: default_true(),
            sensitivity: default_sensitivity(),
            world_seed: None,
            start_view: ViewMode::default(),
            asset_dir: default_asset_dir(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(data) => match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            },
            Err(_) => log::info!("No config at {:?}, using defaults", path),
        }
        Self::default()
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}
