//! Requests the simulation makes of its host, and the events it consumes.

use super::BodyId;

/// Sound cues the simulation can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Jump,
    Crash,
    Score,
    GameOver,
    Music,
}

/// How the host should schedule a sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Play to completion before the next effect is acted on.
    UntilDone,
    LoopingInBackground,
    InBackground,
}

/// Side effects emitted by a tick, drained by the host afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEffect {
    PlaySound { cue: SoundCue, mode: PlaybackMode },
    ScoreChanged(u32),
    GameOver { show_screen: bool },
}

/// Edge of a button transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Pressed,
    Released,
}

/// Work queued for the next tick, processed in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Jump(ButtonEvent),
    Overlap { player: BodyId, other: BodyId },
}
