//! Player settings document (audio volumes).

use crate::{
    error::SimResult,
    file_store::FileStore,
};
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_music_volume")]
    pub music_volume: f64,
    #[serde(default = "default_sfx_volume")]
    pub sfx_volume:   f64,
}

fn default_music_volume() -> f64 { 0.5 }
fn default_sfx_volume() -> f64 { 0.7 }

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: default_music_volume(),
            sfx_volume:   default_sfx_volume(),
        }
    }
}

impl Settings {
    /// Read settings from `store`. A missing or unreadable document
    /// yields the defaults.
    pub fn load(store: &dyn FileStore) -> Self {
        match store.read_file(SETTINGS_FILE) {
            Ok(Some(bytes)) => match serde_json::from_slice::<Settings>(&bytes) {
                Ok(settings) => settings.clamped(),
                Err(e) => {
                    log::warn!("Could not parse {SETTINGS_FILE}, using defaults: {e}");
                    Self::default()
                }
            },
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Could not read {SETTINGS_FILE}, using defaults: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &dyn FileStore) -> SimResult<()> {
        let bytes = serde_json::to_vec_pretty(&self.clamped())?;
        store.write_file(SETTINGS_FILE, &bytes)
    }

    pub fn set_music_volume(&mut self, volume: f64) {
        self.music_volume = clamp_volume(volume, default_music_volume());
    }

    pub fn set_sfx_volume(&mut self, volume: f64) {
        self.sfx_volume = clamp_volume(volume, default_sfx_volume());
    }

    fn clamped(self) -> Self {
        Self {
            music_volume: clamp_volume(self.music_volume, default_music_volume()),
            sfx_volume:   clamp_volume(self.sfx_volume, default_sfx_volume()),
        }
    }
}

fn clamp_volume(volume: f64, fallback: f64) -> f64 {
    if volume.is_finite() { volume.clamp(0.0, 1.0) } else { fallback }
}
