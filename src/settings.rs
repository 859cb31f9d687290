//! Game settings and preferences
//!
//! Persisted as JSON next to the player save.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::persistence::StoreError;
use crate::sim::SimConfig;

/// Product variants sharing the same simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameVariant {
    /// Straight-falling enemies that never shoot back
    #[default]
    ChickenGalaxy,
    /// Drifting enemies with return fire
    EggMagnet,
}

impl GameVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameVariant::ChickenGalaxy => "chicken-galaxy",
            GameVariant::EggMagnet => "egg-magnet",
        }
    }

    /// Simulation switches for this variant
    pub fn sim_config(&self) -> SimConfig {
        match self {
            GameVariant::ChickenGalaxy => SimConfig::default(),
            GameVariant::EggMagnet => SimConfig {
                enemy_fire_enabled: true,
                enemy_horizontal_drift: true,
                ..SimConfig::default()
            },
        }
    }
}

impl FromStr for GameVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', ' '], "-").as_str() {
            "chicken-galaxy" | "chicken" => Ok(GameVariant::ChickenGalaxy),
            "egg-magnet" | "eggmagnet" | "egg" => Ok(GameVariant::EggMagnet),
            other => Err(format!(
                "unknown variant '{other}' (expected chicken-galaxy or egg-magnet)"
            )),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Music volume (0 - 100 percent)
    pub music_volume: u8,
    /// Sound effects volume (0 - 100 percent)
    pub sound_volume: u8,
    /// Mute everything
    pub muted: bool,
    /// Which game to run
    pub variant: GameVariant,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: 70,
            sound_volume: 100,
            muted: false,
            variant: GameVariant::default(),
        }
    }
}

impl Settings {
    /// Simulation config for the selected variant
    pub fn sim_config(&self) -> SimConfig {
        self.variant.sim_config()
    }

    /// Clamp volumes into range
    pub fn normalized(mut self) -> Self {
        self.music_volume = self.music_volume.min(100);
        self.sound_volume = self.sound_volume.min(100);
        self
    }

    /// Load settings, falling back to defaults when missing or unreadable
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        Ok(settings.normalized())
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| StoreError::Encode(e.to_string()))?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
