//! Audio cue interface
//!
//! The game core never plays sound itself. It names cues; an [`AudioCues`]
//! implementation decides how (or whether) to play them.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound cues the game can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Menu background loop
    MenuMusic,
    /// Gameplay background loop
    GameMusic,
    /// Music paused with the game
    PauseMusic,
    /// Music resumed with the game
    ResumeMusic,
    /// Player fired
    Shot,
    /// Enemy or enemy bullet destroyed
    Explosion,
    /// Player lost a life
    BombHit,
    /// Egg collected
    EggPickup,
    /// Run finished, result screen
    GameWin,
    /// Run finished without scoring
    GameLose,
    /// Ship purchase succeeded
    ShipPurchase,
    /// Purchase refused
    NotEnoughMoney,
}

impl SoundEffect {
    /// Music cues go to the music channel, everything else to SFX
    pub fn is_music(&self) -> bool {
        matches!(
            self,
            SoundEffect::MenuMusic
                | SoundEffect::GameMusic
                | SoundEffect::PauseMusic
                | SoundEffect::ResumeMusic
        )
    }

    /// The cue a gameplay event triggers, if any
    pub fn for_event(event: &GameEvent) -> Option<SoundEffect> {
        match event {
            GameEvent::RunStarted => Some(SoundEffect::GameMusic),
            GameEvent::Paused => Some(SoundEffect::PauseMusic),
            GameEvent::Resumed => Some(SoundEffect::ResumeMusic),
            GameEvent::ExitedToMenu => Some(SoundEffect::MenuMusic),
            GameEvent::PlayerShot => Some(SoundEffect::Shot),
            GameEvent::EnemyDestroyed | GameEvent::EnemyBulletDestroyed => {
                Some(SoundEffect::Explosion)
            }
            GameEvent::PlayerHit => Some(SoundEffect::BombHit),
            GameEvent::EggCollected => Some(SoundEffect::EggPickup),
            GameEvent::GameOver(result) if result.score == 0 => Some(SoundEffect::GameLose),
            GameEvent::GameOver(_) => Some(SoundEffect::GameWin),
        }
    }
}

/// Fire-and-forget cue playback
pub trait AudioCues: Send {
    fn play(&mut self, effect: SoundEffect);
}

/// Audio manager for the game
///
/// Applies the user's volume settings and hands audible cues to a backend
/// callback. Without a backend, cues are only logged.
pub struct AudioManager {
    music_volume: f32,
    sfx_volume: f32,
    muted: bool,
    backend: Option<Box<dyn FnMut(SoundEffect, f32) + Send>>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            music_volume: 0.7,
            sfx_volume: 1.0,
            muted: false,
            backend: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.set_music_volume(settings.music_volume);
        audio.set_sound_volume(settings.sound_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Route audible cues to a playback backend
    pub fn with_backend(mut self, backend: impl FnMut(SoundEffect, f32) + Send + 'static) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    /// Set music volume (0 - 100 percent)
    pub fn set_music_volume(&mut self, percent: u8) {
        self.music_volume = f32::from(percent.min(100)) / 100.0;
    }

    /// Set sound effect volume (0 - 100 percent)
    pub fn set_sound_volume(&mut self, percent: u8) {
        self.sfx_volume = f32::from(percent.min(100)) / 100.0;
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume for a cue
    pub fn effective_volume(&self, effect: SoundEffect) -> f32 {
        if self.muted {
            0.0
        } else if effect.is_music() {
            self.music_volume
        } else {
            self.sfx_volume
        }
    }
}

impl AudioCues for AudioManager {
    fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(effect);
        if vol <= 0.0 {
            return;
        }
        log::debug!("Audio cue {:?} at {:.2}", effect, vol);
        if let Some(backend) = self.backend.as_mut() {
            backend(effect, vol);
        }
    }
}
