//! Game events (messages).

use bevy::prelude::*;

use crate::sim::{PlaybackMode, SoundCue};

/// Message asking the audio plugin to play or silence sounds, handled in order.
#[derive(Message, Clone, Copy, Debug)]
pub enum AudioCommand {
    Play { cue: SoundCue, mode: PlaybackMode },
    StopAll,
}

/// Message triggered when the running session is lost.
#[derive(Message, Clone, Copy, Debug)]
pub struct SessionEnded {
    pub show_screen: bool,
    pub score: u32,
}
