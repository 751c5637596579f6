//! Player preferences for the current session
//!
//! Kept in memory only; a new page load starts from defaults.

use serde::{Deserialize, Serialize};

use crate::highscores::DEFAULT_PLAYER_NAME;

/// Longest name accepted for score submission
pub const MAX_NAME_LEN: usize = 16;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Pause when the window loses focus
    pub pause_on_blur: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    /// Name sent with score submissions
    pub player_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            pause_on_blur: true,
            show_fps: false,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
        }
    }
}

impl Settings {
    /// Volume passed to the sound sink
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Non-finite values are ignored
    pub fn set_master_volume(&mut self, vol: f32) {
        if vol.is_finite() {
            self.master_volume = vol.clamp(0.0, 1.0);
        }
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        if vol.is_finite() {
            self.sfx_volume = vol.clamp(0.0, 1.0);
        }
    }

    /// Trimmed, length-limited name; falls back to the default when blank
    pub fn set_player_name(&mut self, name: &str) {
        let trimmed: String = name.trim().chars().take(MAX_NAME_LEN).collect();
        self.player_name = if trimmed.is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            trimmed
        };
    }

    /// Apply preferences handed over by the host page
    ///
    /// Volumes are parsed as floats; unparsable values are logged and skipped.
    pub fn apply_overrides(
        &mut self,
        player_name: Option<&str>,
        master_volume: Option<&str>,
        sfx_volume: Option<&str>,
    ) {
        if let Some(name) = player_name {
            self.set_player_name(name);
        }
        if let Some(vol) = master_volume.and_then(|v| parse_volume("master", v)) {
            self.set_master_volume(vol);
        }
        if let Some(vol) = sfx_volume.and_then(|v| parse_volume("sfx", v)) {
            self.set_sfx_volume(vol);
        }
    }
}

fn parse_volume(which: &str, value: &str) -> Option<f32> {
    match value.trim().parse::<f32>() {
        Ok(vol) => Some(vol),
        Err(e) => {
            log::warn!("Ignoring {} volume {:?}: {}", which, value, e);
            None
        }
    }
}
