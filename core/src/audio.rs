//! Audio side channel. The engine names the cue; playback, mixing and
//! volume belong to whoever implements `AudioNotifier`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Start,
    Hover,
    Select,
    Back,
    Error,
}

impl SoundCue {
    pub fn name(self) -> &'static str {
        match self {
            Self::Start  => "start",
            Self::Hover  => "hover",
            Self::Select => "select",
            Self::Back   => "back",
            Self::Error  => "error",
        }
    }
}

pub trait AudioNotifier {
    fn play_sound(&self, cue: SoundCue);
}

/// Drops every cue. For headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioNotifier for NullAudio {
    fn play_sound(&self, cue: SoundCue) {
        log::trace!("sound: {}", cue.name());
    }
}
