//! Entity records stepped by the simulation.

use bevy::math::{Rect, Vec2};
use bevy::time::{Timer, TimerMode};
use std::time::Duration;

/// Frames of the flap flipbook, played once per jump.
pub const FLAP_FRAMES: [u8; 7] = [1, 2, 3, 4, 5, 6, 1];

/// Stable identifier of a body within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

/// Category tag used for overlap dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Player,
    Log,
    Gap,
}

/// What the renderer should draw for a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visual {
    /// Plain filled rectangle.
    Solid,
    /// Present for collisions only.
    Hidden,
    /// Duck sprite at the given flap frame (1 is the resting pose).
    Duck(u8),
    Hurt,
}

/// A one-shot sequence of frames advanced on a fixed interval.
#[derive(Debug, Clone)]
pub struct Flipbook {
    frames: &'static [u8],
    index: usize,
    timer: Timer,
}

impl Flipbook {
    pub fn new(frames: &'static [u8], interval: Duration) -> Self {
        Flipbook {
            frames,
            index: 0,
            timer: Timer::new(interval, TimerMode::Repeating),
        }
    }

    /// Current frame, or `None` for an empty flipbook.
    pub fn frame(&self) -> Option<u8> {
        self.frames.get(self.index).copied()
    }

    pub fn is_finished(&self) -> bool {
        self.index + 1 >= self.frames.len()
    }

    /// Advances by `delta` and returns the frame now showing.
    pub fn tick(&mut self, delta: Duration) -> Option<u8> {
        if !self.is_finished() {
            self.timer.tick(delta);
            let steps = self.timer.times_finished_this_tick() as usize;
            self.index = (self.index + steps).min(self.frames.len().saturating_sub(1));
        }
        self.frame()
    }
}

/// A moving rectangle owned by a session.
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub kind: BodyKind,
    /// Centre of the body.
    pub position: Vec2,
    pub size: Vec2,
    /// Units per second.
    pub velocity: Vec2,
    pub visual: Visual,
    pub flipbook: Option<Flipbook>,
}

impl Body {
    /// Builds a body from the top-left corner of its rectangle.
    pub fn from_top_left(
        id: BodyId,
        kind: BodyKind,
        top_left: Vec2,
        size: Vec2,
        velocity: Vec2,
        visual: Visual,
    ) -> Self {
        Body {
            id,
            kind,
            position: top_left + size / 2.0,
            size,
            velocity,
            visual,
            flipbook: None,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.position, self.size)
    }

    /// True when the two rectangles share a non-empty area.
    pub fn overlaps(&self, other: &Body) -> bool {
        !self.bounds().intersect(other.bounds()).is_empty()
    }

    pub fn integrate(&mut self, delta: Duration) {
        self.position += self.velocity * delta.as_secs_f32();

        if let Some(flipbook) = self.flipbook.as_mut() {
            if let Some(frame) = flipbook.tick(delta)
                && self.visual != Visual::Hurt
            {
                self.visual = Visual::Duck(frame);
            }
            if flipbook.is_finished() {
                self.flipbook = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_at(top_left: Vec2, size: Vec2) -> Body {
        Body::from_top_left(
            BodyId(1),
            BodyKind::Log,
            top_left,
            size,
            Vec2::ZERO,
            Visual::Solid,
        )
    }

    #[test]
    fn test_top_left_is_converted_to_centre() {
        let body = log_at(Vec2::new(170.0, 0.0), Vec2::new(10.0, 30.0));
        assert_eq!(body.position, Vec2::new(175.0, 15.0));
        assert_eq!(body.bounds().min, Vec2::new(170.0, 0.0));
        assert_eq!(body.bounds().max, Vec2::new(180.0, 30.0));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = log_at(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = log_at(Vec2::new(0.0, 10.0), Vec2::new(10.0, 10.0));
        let c = log_at(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_zero_height_body_never_overlaps() {
        let flat = log_at(Vec2::new(0.0, 5.0), Vec2::new(10.0, 0.0));
        let block = log_at(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(!flat.overlaps(&block));
    }

    #[test]
    fn test_integrate_moves_by_velocity() {
        let mut body = log_at(Vec2::new(100.0, 0.0), Vec2::new(10.0, 10.0));
        body.velocity = Vec2::new(-50.0, 0.0);
        body.integrate(Duration::from_millis(200));
        assert_eq!(body.position, Vec2::new(95.0, 5.0));
    }

    #[test]
    fn test_flipbook_plays_once_and_stops_on_last_frame() {
        let mut flipbook = Flipbook::new(&FLAP_FRAMES, Duration::from_millis(60));
        assert_eq!(flipbook.frame(), Some(1));
        assert_eq!(flipbook.tick(Duration::from_millis(60)), Some(2));
        assert_eq!(flipbook.tick(Duration::from_millis(130)), Some(4));
        assert!(!flipbook.is_finished());
        assert_eq!(flipbook.tick(Duration::from_secs(1)), Some(1));
        assert!(flipbook.is_finished());
    }
}
