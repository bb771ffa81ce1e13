//! Game constants for screen size, colors, key bindings, text, and rendering layers.

use bevy::prelude::*;

// Playfield dimensions in screen units
pub const SCREEN_WIDTH: f32 = 160.0;
pub const SCREEN_HEIGHT: f32 = 120.0;

// Window pixels per screen unit
pub const PIXEL_SCALE: f32 = 4.0;

// Input
pub const JUMP_KEYS: [KeyCode; 3] = [KeyCode::Space, KeyCode::ArrowUp, KeyCode::KeyZ];
pub const YES_KEYS: [KeyCode; 3] = [KeyCode::KeyY, KeyCode::Space, KeyCode::KeyZ];
pub const NO_KEYS: [KeyCode; 3] = [KeyCode::KeyN, KeyCode::Escape, KeyCode::KeyX];

// Text
pub const GAME_TITLE: &str = "Frapi Duck";
pub const SPLASH_HINT: &str = "Press A to fly";
pub const SOUND_QUESTION: &str = "Do you want sound?";
pub const GAME_OVER_MESSAGE: &str = "Game over";

// Colors
pub const SKY_COLOR: Color = Color::srgba(0.42, 0.72, 0.93, 1.0);
pub const SKYLINE_FAR_COLOR: Color = Color::srgba(0.55, 0.65, 0.82, 1.0);
pub const SKYLINE_NEAR_COLOR: Color = Color::srgba(0.36, 0.45, 0.62, 1.0);
pub const LOG_COLOR: Color = Color::srgba(0.45, 0.27, 0.13, 1.0);
pub const DUCK_BODY_COLOR: Color = Color::srgba(1.0, 0.85, 0.2, 1.0);
pub const DUCK_WING_COLOR: Color = Color::srgba(0.9, 0.68, 0.1, 1.0);
pub const DUCK_BEAK_COLOR: Color = Color::srgba(1.0, 0.5, 0.1, 1.0);
pub const DUCK_HURT_COLOR: Color = Color::srgba(0.9, 0.2, 0.2, 1.0);

// Duck wing angle (radians) for each flap frame, 1-based
pub const WING_ANGLES: [f32; 6] = [0.0, 0.35, 0.7, 0.35, -0.35, -0.7];

// Z-index constants for rendering layers
pub const Z_SKYLINE_FAR: f32 = 0.0;
pub const Z_SKYLINE_NEAR: f32 = 0.5;
pub const Z_LOG: f32 = 1.0;
pub const Z_DUCK: f32 = 2.0;
