//! Game resources (singleton state).

use bevy::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use std::collections::HashMap;

use super::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::preferences::{JsonFileStore, MemoryStore, PreferenceStore};
use crate::sim::{BodyId, Session, SessionConfig};

/// Game phase enum to track which screen is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// First run: waiting for the yes/no sound answer.
    #[default]
    SoundPrompt,
    Splash,
    Playing,
    GameOver,
}

/// Main game state resource.
#[derive(Resource, Default)]
pub struct GameState {
    pub phase: GamePhase,
    pub session: Option<Session>,
    /// Bumped every time a new session replaces the old one.
    pub generation: u32,
}

impl GameState {
    /// Replaces any previous session with a fresh one and enters `Playing`.
    pub fn begin_session(&mut self) {
        let config = SessionConfig {
            screen: Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            ..SessionConfig::default()
        };
        match Session::new(config, StdRng::from_os_rng()) {
            Ok(session) => {
                self.session = Some(session);
                self.generation += 1;
                self.phase = GamePhase::Playing;
            }
            Err(err) => error!("Cannot start a session: {err}"),
        }
    }

    pub fn score(&self) -> u32 {
        self.session.as_ref().map_or(0, Session::score)
    }
}

/// The persisted preference store.
#[derive(Resource)]
pub struct Preferences {
    pub store: Box<dyn PreferenceStore>,
}

impl Preferences {
    /// Opens the on-disk store, falling back to memory when it is unavailable.
    pub fn open() -> Self {
        let store: Box<dyn PreferenceStore> = match JsonFileStore::in_config_dir() {
            Ok(store) => {
                info!("Preferences stored in {}", store.path().display());
                Box::new(store)
            }
            Err(err) => {
                warn!("Preferences will not be saved: {err}");
                Box::new(MemoryStore::default())
            }
        };
        Preferences { store }
    }
}

/// Rendered entity for each visible simulation body.
#[derive(Resource, Default)]
pub struct BodyEntities {
    pub generation: u32,
    pub entities: HashMap<BodyId, Entity>,
}

/// Resource for camera shake effect.
#[derive(Resource)]
pub struct CameraShake {
    pub timer: Timer,
    pub intensity: f32,
}

impl Default for CameraShake {
    fn default() -> Self {
        CameraShake {
            timer: Timer::from_seconds(0.0, TimerMode::Once),
            intensity: 0.0,
        }
    }
}
