//! Game settings and preferences
//!
//! Persisted separately from level data as a small JSON file. A missing or
//! broken file is never fatal: the game falls back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for the run RNG
    pub seed: u64,

    // === Debug ===
    /// Draw entity hitboxes
    pub show_hitboxes: bool,

    // === HUD ===
    /// Speech bubbles over the player and buddy
    pub speech_bubbles: bool,
    /// Show the `m:ss` play clock
    pub show_clock: bool,

    // === Accessibility ===
    /// Reduced motion (no boss flicker, static sleep bubble)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 1,
            show_hitboxes: false,
            speech_bubbles: true,
            show_clock: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from `path`, falling back to defaults on any failure
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Bad settings file {}: {}; using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Boss fury flicker and sleep bubble animation
    pub fn effective_animation(&self) -> bool {
        !self.reduced_motion
    }
}
