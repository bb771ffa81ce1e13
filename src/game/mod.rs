//! Core game module containing shared components, resources, events, and constants.

mod components;
mod constants;
mod events;
mod resources;

pub use components::*;
pub use constants::*;
pub use events::*;
pub use resources::*;

use bevy::prelude::*;

/// Frame ordering shared by the plugins.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    /// Read player input.
    Input,
    /// Step the session and forward its effects.
    Simulate,
    /// Screens, rendering, and sound.
    Present,
}
