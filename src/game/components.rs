//! ECS components for the duck game.

use bevy::prelude::*;

use crate::sim::BodyId;

/// Links a rendered entity to the simulation body it mirrors.
#[derive(Component, Clone, Copy, PartialEq, Eq, Debug)]
pub struct BodyLink(pub BodyId);

/// Component to mark the duck's root entity.
#[derive(Component)]
pub struct Duck;

/// Component to mark the duck's wing (child of the duck).
#[derive(Component)]
pub struct DuckWing;

/// Red overlay shown while the duck is hurt (child of the duck).
#[derive(Component)]
pub struct DuckHurt;

/// Component to mark log entities.
#[derive(Component)]
pub struct LogSprite;

/// A background building that wraps around as the skyline scrolls.
#[derive(Component)]
pub struct SkylineBlock {
    /// Left edge in screen units before scrolling.
    pub base_x: f32,
    pub width: f32,
    /// Fraction of the session scroll applied to this layer.
    pub parallax: f32,
}

/// Component to mark the score display UI element.
#[derive(Component)]
pub struct ScoreText;

/// Component to mark the game over overlay UI.
#[derive(Component)]
pub struct GameOverUI;

/// Component to mark the sound question overlay UI.
#[derive(Component)]
pub struct SoundPromptUI;

/// Component to mark the splash / instructions overlay UI.
#[derive(Component)]
pub struct SplashUI;

/// Component to mark every playing sound.
#[derive(Component)]
pub struct SoundPlayer;
