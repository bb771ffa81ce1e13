//! Engine-independent core of the game: bodies, obstacle spawning, and the session loop.
//!
//! Coordinates are screen units with the origin at the top-left and y growing
//! downward. The host renders [`Session::bodies`] and acts on the
//! [`HostEffect`]s drained after every [`Session::tick`].

mod body;
mod config;
mod effects;
mod session;
mod spawner;

pub use body::*;
pub use config::*;
pub use effects::*;
pub use session::*;
pub use spawner::*;
