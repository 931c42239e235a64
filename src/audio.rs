//! Sound cues
//!
//! The simulation only names the clip to play; playback belongs to whatever
//! implements [`AudioSink`] on the host side. Cues are fire-and-forget.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    /// Player rocket launched
    Shoot,
    /// Rocket detonation / comet destroyed
    HazardDestroyed,
    /// Late stage of the player's death sequence
    PlayerDestroyed,
    /// Pickup collected
    Pickup,
    /// Boss weak point hit or final boss blast
    BossBlast,
}

impl SoundCue {
    pub const ALL: [SoundCue; 5] = [
        SoundCue::Shoot,
        SoundCue::HazardDestroyed,
        SoundCue::PlayerDestroyed,
        SoundCue::Pickup,
        SoundCue::BossBlast,
    ];

    /// Clip name the host maps to an audio file
    pub fn clip_name(&self) -> &'static str {
        match self {
            SoundCue::Shoot => "fire",
            SoundCue::HazardDestroyed => "explosion",
            SoundCue::PlayerDestroyed => "spaceship_explosion",
            SoundCue::Pickup => "item",
            SoundCue::BossBlast => "boss_blast",
        }
    }
}

/// Audio collaborator
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Sink that logs cues and counts them; used by the headless host
#[derive(Debug, Default)]
pub struct LogAudio {
    played: [u32; SoundCue::ALL.len()],
    muted: bool,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute/unmute (muted cues are still counted)
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// How many times `cue` has been requested
    pub fn count(&self, cue: SoundCue) -> u32 {
        self.played[cue as usize]
    }

    pub fn total(&self) -> u32 {
        self.played.iter().sum()
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: SoundCue) {
        self.played[cue as usize] += 1;
        if !self.muted {
            log::debug!("play clip '{}'", cue.clip_name());
        }
    }
}
