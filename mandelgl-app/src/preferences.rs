use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use mandelgl_core::ViewSettings;

/// Application preferences persisted between sessions.
///
/// The view itself (center, zoom, Julia constant) is never saved; every
/// session starts at the configured initial view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    /// Side length of the Julia panel, in points.
    #[serde(default = "default_julia_panel_size")]
    pub julia_panel_size: f32,
    #[serde(default = "default_true")]
    pub show_hud: bool,
    #[serde(default = "default_hud_panel_opacity")]
    pub hud_panel_opacity: f32,
    #[serde(default)]
    pub view: ViewSettings,
}

fn default_window_width() -> f32 {
    1280.0
}
fn default_window_height() -> f32 {
    720.0
}
fn default_julia_panel_size() -> f32 {
    320.0
}
fn default_true() -> bool {
    true
}
fn default_hud_panel_opacity() -> f32 {
    0.65
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            julia_panel_size: default_julia_panel_size(),
            show_hud: true,
            hud_panel_opacity: default_hud_panel_opacity(),
            view: ViewSettings::default(),
        }
    }
}

impl AppPreferences {
    /// Load preferences from the OS config directory, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No preferences file at {}", path.display());
            return Self::default();
        }
        let mut prefs = match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                Ok(prefs) => {
                    info!("Loaded preferences from {}", path.display());
                    prefs
                }
                Err(e) => {
                    error!("Failed to parse preferences: {e}");
                    return Self::default();
                }
            },
            Err(e) => {
                error!("Failed to read preferences file: {e}");
                return Self::default();
            }
        };
        if let Err(e) = prefs.view.validate() {
            warn!("Ignoring view settings from {}: {e}", path.display());
            prefs.view = ViewSettings::default();
        }
        prefs
    }

    /// Persist preferences to disk.
    pub fn save(&self) {
        self.save_to(&config_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }
}

fn config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "MandelGL")
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .join("preferences.json")
}
