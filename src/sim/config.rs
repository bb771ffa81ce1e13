//! Gameplay tuning carried into a session, with validation.

use bevy::math::Vec2;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Errors raised when a [`SessionConfig`] cannot produce a consistent game.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("screen size must be positive, got {width}x{height}")]
    EmptyScreen { width: f32, height: f32 },

    #[error("{name} range {start}..={end} is empty")]
    EmptyRange {
        name: &'static str,
        start: u64,
        end: u64,
    },

    /// The tallest top log plus the tallest gap would leave a negative bottom log.
    #[error("obstacles up to {needed} units tall do not fit a screen {height} units high")]
    ObstaclesExceedScreen { needed: u32, height: u32 },
}

/// Random bounds for one obstacle triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnBounds {
    pub top_log_height: RangeInclusive<u32>,
    pub gap_height: RangeInclusive<u32>,
    /// Milliseconds between two spawns.
    pub delay_ms: RangeInclusive<u64>,
}

impl Default for SpawnBounds {
    fn default() -> Self {
        SpawnBounds {
            top_log_height: 5..=50,
            gap_height: 35..=70,
            delay_ms: 750..=3000,
        }
    }
}

/// Everything a [`crate::sim::Session`] needs to know about the playfield.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Screen size in abstract units (y grows downward).
    pub screen: Vec2,
    pub spawn: SpawnBounds,
    pub log_width: f32,
    /// Distance past the right edge where obstacles appear.
    pub spawn_margin: f32,
    /// Leftward speed of logs and gaps, units per second.
    pub obstacle_speed: f32,
    pub player_size: Vec2,
    /// Constant downward speed of the player, units per second.
    pub fall_speed: f32,
    pub jump_height: f32,
    pub flap_frame_interval: Duration,
    /// Background scroll speed, units per second.
    pub scroll_speed: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            screen: Vec2::new(160.0, 120.0),
            spawn: SpawnBounds::default(),
            log_width: 10.0,
            spawn_margin: 10.0,
            obstacle_speed: 50.0,
            player_size: Vec2::new(16.0, 16.0),
            fall_speed: 50.0,
            jump_height: 20.0,
            flap_frame_interval: Duration::from_millis(60),
            scroll_speed: 20.0,
        }
    }
}

impl SessionConfig {
    /// Screen height as a whole number of units.
    pub fn screen_height(&self) -> u32 {
        self.screen.y as u32
    }

    /// Checks that every spawn cycle can tile the screen height.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen.x <= 0.0 || self.screen.y <= 0.0 {
            return Err(ConfigError::EmptyScreen {
                width: self.screen.x,
                height: self.screen.y,
            });
        }

        check_range("top log height", &self.spawn.top_log_height)?;
        check_range("gap height", &self.spawn.gap_height)?;
        if self.spawn.delay_ms.is_empty() {
            return Err(ConfigError::EmptyRange {
                name: "spawn delay",
                start: *self.spawn.delay_ms.start(),
                end: *self.spawn.delay_ms.end(),
            });
        }

        let needed = self.spawn.top_log_height.end() + self.spawn.gap_height.end();
        let height = self.screen_height();
        if needed > height {
            return Err(ConfigError::ObstaclesExceedScreen { needed, height });
        }
        Ok(())
    }
}

fn check_range(name: &'static str, range: &RangeInclusive<u32>) -> Result<(), ConfigError> {
    if range.is_empty() {
        return Err(ConfigError::EmptyRange {
            name,
            start: u64::from(*range.start()),
            end: u64::from(*range.end()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SessionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_obstacles_taller_than_screen() {
        let config = SessionConfig {
            screen: Vec2::new(160.0, 100.0),
            ..SessionConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ObstaclesExceedScreen {
                needed: 120,
                height: 100
            })
        );
    }

    #[test]
    fn test_rejects_empty_gap_range() {
        let mut config = SessionConfig::default();
        config.spawn.gap_height = 40..=30;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyRange {
                name: "gap height",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_empty_screen() {
        let config = SessionConfig {
            screen: Vec2::ZERO,
            ..SessionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyScreen { .. })
        ));
    }
}
