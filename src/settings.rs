//! Player preferences
//!
//! Persisted separately from the leaderboard: a JSON file on native, a
//! LocalStorage key in the browser.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_PLAYER_NAME;

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Hit-burst particles
    pub particles: bool,
    /// Drifting background particles
    pub background: bool,
    /// Health bar in the left gutter
    pub health_bar: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    /// Name pre-filled in the name prompt
    pub player_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            particles: true,
            background: true,
            health_bar: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            muted: false,

            player_name: DEFAULT_PLAYER_NAME.to_string(),
        }
    }
}

impl Settings {
    /// Effective sound-effect gain
    pub fn sfx_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Effective music gain
    pub fn music_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    /// Clamp volumes into range
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "turret_blitz_settings";

    /// Load settings from LocalStorage, falling back to defaults
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        match crate::persistence::read_item::<Settings>(Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from LocalStorage");
                settings.sanitized()
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(err) => {
                log::warn!("Could not load settings, using defaults: {err}");
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        match crate::persistence::write_item(Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(err) => log::warn!("Could not save settings: {err}"),
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match crate::persistence::read_json::<Settings>(path) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Ok(None) => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                log::warn!("Could not load settings, using defaults: {err}");
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> bool {
        match crate::persistence::write_json(path, self) {
            Ok(()) => {
                log::info!("Settings saved to {}", path.display());
                true
            }
            Err(err) => {
                log::warn!("Could not save settings: {err}");
                false
            }
        }
    }
}
