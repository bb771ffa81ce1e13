//! Obstacle placement and spawn cadence.

use rand::Rng;
use std::time::Duration;

use super::SpawnBounds;

/// Heights of one log / gap / log triple, stacked from the top of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleLayout {
    pub top_log: u32,
    pub gap: u32,
    pub bottom_log: u32,
}

impl ObstacleLayout {
    /// Builds the triple for a screen, or `None` if `top + gap` overflows it.
    pub fn new(top_log: u32, gap: u32, screen_height: u32) -> Option<Self> {
        let bottom_log = screen_height.checked_sub(top_log + gap)?;
        Some(ObstacleLayout {
            top_log,
            gap,
            bottom_log,
        })
    }

    /// Draws a random layout within `bounds`.
    ///
    /// `bounds` must already be validated against `screen_height`, see
    /// [`crate::sim::SessionConfig::validate`].
    pub fn roll<R: Rng>(rng: &mut R, bounds: &SpawnBounds, screen_height: u32) -> Self {
        let top_log = rng.random_range(bounds.top_log_height.clone());
        let gap = rng.random_range(bounds.gap_height.clone());
        let bottom_log = screen_height.saturating_sub(top_log + gap);
        ObstacleLayout {
            top_log,
            gap,
            bottom_log,
        }
    }

    pub fn gap_top(&self) -> u32 {
        self.top_log
    }

    pub fn bottom_log_top(&self) -> u32 {
        self.top_log + self.gap
    }

    /// Vertical spans `[start, end)` of top log, gap and bottom log.
    pub fn spans(&self) -> [(u32, u32); 3] {
        [
            (0, self.top_log),
            (self.gap_top(), self.bottom_log_top()),
            (self.bottom_log_top(), self.bottom_log_top() + self.bottom_log),
        ]
    }
}

/// Draws the pause before the next spawn.
pub fn roll_delay<R: Rng>(rng: &mut R, bounds: &SpawnBounds) -> Duration {
    Duration::from_millis(rng.random_range(bounds.delay_ms.clone()))
}

/// Countdown standing in for the spawn loop's pause.
#[derive(Debug, Clone, Default)]
pub struct ObstacleSpawner {
    until_next: Duration,
    spawned: u64,
}

impl ObstacleSpawner {
    /// Advances the countdown; returns true when a triple is due, drawing the next pause.
    pub fn tick<R: Rng>(
        &mut self,
        delta: Duration,
        rng: &mut R,
        bounds: &SpawnBounds,
    ) -> bool {
        self.until_next = self.until_next.saturating_sub(delta);
        if !self.until_next.is_zero() {
            return false;
        }
        self.until_next = roll_delay(rng, bounds);
        self.spawned += 1;
        true
    }

    pub fn until_next(&self) -> Duration {
        self.until_next
    }

    pub fn spawned(&self) -> u64 {
        self.spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    const SCREEN_HEIGHT: u32 = 120;

    #[test]
    fn test_layouts_tile_the_screen() {
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = SpawnBounds::default();

        for _ in 0..2_000 {
            let layout = ObstacleLayout::roll(&mut rng, &bounds, SCREEN_HEIGHT);
            assert!((5..=50).contains(&layout.top_log));
            assert!((35..=70).contains(&layout.gap));
            assert_eq!(layout.top_log + layout.gap + layout.bottom_log, SCREEN_HEIGHT);

            let spans = layout.spans();
            assert_eq!(spans[0].0, 0);
            assert_eq!(spans[0].1, spans[1].0);
            assert_eq!(spans[1].1, spans[2].0);
            assert_eq!(spans[2].1, SCREEN_HEIGHT);
        }
    }

    #[test]
    fn test_delays_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let bounds = SpawnBounds::default();

        for _ in 0..2_000 {
            let delay = roll_delay(&mut rng, &bounds);
            assert!(delay >= Duration::from_millis(750));
            assert!(delay <= Duration::from_millis(3000));
        }
    }

    #[test]
    fn test_layout_rejects_overflow() {
        assert_eq!(
            ObstacleLayout::new(50, 70, 120),
            Some(ObstacleLayout {
                top_log: 50,
                gap: 70,
                bottom_log: 0
            })
        );
        assert_eq!(ObstacleLayout::new(50, 71, 120), None);
    }

    #[test]
    fn test_spawner_fires_immediately_then_waits() {
        let mut rng = StdRng::seed_from_u64(3);
        let bounds = SpawnBounds::default();
        let mut spawner = ObstacleSpawner::default();

        assert!(spawner.tick(Duration::ZERO, &mut rng, &bounds));
        let pause = spawner.until_next();
        assert!(pause >= Duration::from_millis(750));

        assert!(!spawner.tick(pause - Duration::from_millis(1), &mut rng, &bounds));
        assert!(spawner.tick(Duration::from_millis(1), &mut rng, &bounds));
        assert_eq!(spawner.spawned(), 2);
    }
}
