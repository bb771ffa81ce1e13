//! One play-through: the player, the scrolling obstacles, and the score.

use bevy::log::{debug, info};
use bevy::math::Vec2;
use rand::rngs::StdRng;
use std::collections::VecDeque;
use std::mem;
use std::time::Duration;

use super::{
    Body, BodyId, BodyKind, ButtonEvent, ConfigError, FLAP_FRAMES, Flipbook, HostEffect,
    ObstacleLayout, ObstacleSpawner, PlaybackMode, SessionConfig, SessionEvent, SoundCue, Visual,
};

/// True once the player's leading edge is past the gap's centre line.
pub fn has_passed_gap(player_x: f32, player_width: f32, gap_x: f32) -> bool {
    player_x > gap_x + player_width / 2.0
}

/// Owns every piece of mutable game state; the host feeds it events and time.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    rng: StdRng,
    bodies: Vec<Body>,
    player: BodyId,
    next_id: u64,
    spawner: ObstacleSpawner,
    score: u32,
    over: bool,
    background_offset: f32,
    queue: VecDeque<SessionEvent>,
    effects: Vec<HostEffect>,
}

impl Session {
    /// Creates the player at the screen centre, falling at the configured speed.
    pub fn new(config: SessionConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;

        let player_id = BodyId(0);
        let player = Body {
            id: player_id,
            kind: BodyKind::Player,
            position: config.screen / 2.0,
            size: config.player_size,
            velocity: Vec2::new(0.0, config.fall_speed),
            visual: Visual::Duck(FLAP_FRAMES[0]),
            flipbook: None,
        };

        info!(
            "Session started on a {}x{} screen",
            config.screen.x, config.screen.y
        );

        Ok(Session {
            config,
            rng,
            bodies: vec![player],
            player: player_id,
            next_id: 1,
            spawner: ObstacleSpawner::default(),
            score: 0,
            over: false,
            background_offset: 0.0,
            queue: VecDeque::new(),
            effects: Vec::new(),
        })
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Horizontal distance the background has scrolled so far.
    pub fn background_offset(&self) -> f32 {
        self.background_offset
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|body| body.id == id)
    }

    pub fn player(&self) -> &Body {
        &self.bodies[self.player_index()]
    }

    /// Queues a button transition for the next tick.
    pub fn push_jump(&mut self, event: ButtonEvent) {
        self.queue.push_back(SessionEvent::Jump(event));
    }

    /// Takes every effect emitted since the last call.
    pub fn drain_effects(&mut self) -> Vec<HostEffect> {
        mem::take(&mut self.effects)
    }

    /// Runs one frame: queued input, spawning, movement, overlaps, then the update check.
    pub fn tick(&mut self, delta: Duration) {
        if self.over {
            self.queue.clear();
            return;
        }

        self.drain_queue();

        if self
            .spawner
            .tick(delta, &mut self.rng, &self.config.spawn)
        {
            let layout = ObstacleLayout::roll(
                &mut self.rng,
                &self.config.spawn,
                self.config.screen_height(),
            );
            self.spawn_obstacles(layout);
            debug!("Spawned obstacle {}", self.spawner.spawned());
        }

        for body in &mut self.bodies {
            body.integrate(delta);
        }
        self.background_offset += self.config.scroll_speed * delta.as_secs_f32();
        self.bodies
            .retain(|body| body.kind == BodyKind::Player || body.bounds().max.x >= 0.0);

        self.queue_overlaps();
        self.drain_queue();

        self.update_player();
    }

    /// Adds a log / gap / log triple just past the right edge of the screen.
    pub fn spawn_obstacles(&mut self, layout: ObstacleLayout) {
        let x = self.config.screen.x + self.config.spawn_margin;
        let width = self.config.log_width;
        let velocity = Vec2::new(-self.config.obstacle_speed, 0.0);

        let pieces = [
            (BodyKind::Log, 0, layout.top_log, Visual::Solid),
            (BodyKind::Gap, layout.gap_top(), layout.gap, Visual::Hidden),
            (
                BodyKind::Log,
                layout.bottom_log_top(),
                layout.bottom_log,
                Visual::Solid,
            ),
        ];
        for (kind, top, height, visual) in pieces {
            let id = self.allocate_id();
            self.bodies.push(Body::from_top_left(
                id,
                kind,
                Vec2::new(x, top as f32),
                Vec2::new(width, height as f32),
                velocity,
                visual,
            ));
        }
    }

    fn allocate_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    fn player_index(&self) -> usize {
        // The player is created first and never removed.
        0
    }

    fn queue_overlaps(&mut self) {
        let player = self.player();
        let hits: Vec<BodyId> = self
            .bodies
            .iter()
            .filter(|body| body.kind != BodyKind::Player && player.overlaps(body))
            .map(|body| body.id)
            .collect();

        for other in hits {
            self.queue.push_back(SessionEvent::Overlap {
                player: self.player,
                other,
            });
        }
    }

    fn drain_queue(&mut self) {
        while let Some(event) = self.queue.pop_front() {
            if self.over {
                self.queue.clear();
                return;
            }
            match event {
                SessionEvent::Jump(ButtonEvent::Pressed) => self.jump(),
                SessionEvent::Jump(ButtonEvent::Released) => {}
                SessionEvent::Overlap { player, other } => {
                    debug_assert_eq!(player, self.player);
                    self.resolve_overlap(other);
                }
            }
        }
    }

    fn jump(&mut self) {
        let jump_height = self.config.jump_height;
        let interval = self.config.flap_frame_interval;
        let index = self.player_index();
        let player = &mut self.bodies[index];

        player.position.y -= jump_height;
        let flipbook = Flipbook::new(&FLAP_FRAMES, interval);
        if let Some(frame) = flipbook.frame()
            && player.visual != Visual::Hurt
        {
            player.visual = Visual::Duck(frame);
        }
        player.flipbook = Some(flipbook);

        self.effects.push(HostEffect::PlaySound {
            cue: SoundCue::Jump,
            mode: PlaybackMode::InBackground,
        });
    }

    fn resolve_overlap(&mut self, other: BodyId) {
        let Some(kind) = self.body(other).map(|body| body.kind) else {
            // Already removed earlier in this tick.
            return;
        };

        match kind {
            BodyKind::Log => self.crash(),
            BodyKind::Gap => self.try_score(other),
            BodyKind::Player => {}
        }
    }

    fn crash(&mut self) {
        let index = self.player_index();
        let player = &mut self.bodies[index];
        player.visual = Visual::Hurt;
        player.flipbook = None;

        self.effects.push(HostEffect::PlaySound {
            cue: SoundCue::Crash,
            mode: PlaybackMode::UntilDone,
        });
        self.end(true);
    }

    fn try_score(&mut self, gap: BodyId) {
        let player = self.player();
        let Some(gap_x) = self.body(gap).map(|body| body.position.x) else {
            return;
        };
        if !has_passed_gap(player.position.x, player.size.x, gap_x) {
            return;
        }

        self.score += 1;
        self.bodies.retain(|body| body.id != gap);
        debug!("Passed gap {:?}, score is now {}", gap, self.score);

        self.effects.push(HostEffect::ScoreChanged(self.score));
        self.effects.push(HostEffect::PlaySound {
            cue: SoundCue::Score,
            mode: PlaybackMode::InBackground,
        });
    }

    fn update_player(&mut self) {
        let height = self.config.screen.y;
        let index = self.player_index();
        let player = &mut self.bodies[index];

        if player.position.y < 0.0 {
            player.position.y = 0.0;
        }
        if player.position.y > height {
            self.end(true);
        }
    }

    fn end(&mut self, show_screen: bool) {
        if self.over {
            return;
        }
        self.over = true;
        self.queue.clear();
        info!("Game over! Final score: {}", self.score);
        self.effects.push(HostEffect::GameOver { show_screen });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const FRAME: Duration = Duration::from_millis(16);

    fn session() -> Session {
        Session::new(SessionConfig::default(), StdRng::seed_from_u64(42)).unwrap()
    }

    fn ids_of(session: &Session, kind: BodyKind) -> Vec<BodyId> {
        session
            .bodies()
            .iter()
            .filter(|body| body.kind == kind)
            .map(|body| body.id)
            .collect()
    }

    /// Moves a freshly spawned triple so its centre line sits at `x`.
    fn place_triple(session: &mut Session, layout: ObstacleLayout, x: f32) -> [BodyId; 3] {
        let before = session.bodies.len();
        session.spawn_obstacles(layout);
        let mut ids = [BodyId(0); 3];
        for (slot, body) in session.bodies[before..].iter_mut().enumerate() {
            body.position.x = x;
            body.velocity = Vec2::ZERO;
            ids[slot] = body.id;
        }
        ids
    }

    #[test]
    fn test_gap_pass_condition() {
        assert!(has_passed_gap(100.0, 20.0, 85.0));
        assert!(!has_passed_gap(90.0, 20.0, 85.0));
        assert!(!has_passed_gap(95.0, 20.0, 85.0));
    }

    #[test]
    fn test_new_session_rejects_bad_config() {
        let config = SessionConfig {
            screen: Vec2::new(160.0, 90.0),
            ..SessionConfig::default()
        };
        assert!(matches!(
            Session::new(config, StdRng::seed_from_u64(1)),
            Err(ConfigError::ObstaclesExceedScreen { .. })
        ));
    }

    #[test]
    fn test_player_starts_centred_and_falling() {
        let session = session();
        let player = session.player();
        assert_eq!(player.kind, BodyKind::Player);
        assert_eq!(player.position, Vec2::new(80.0, 60.0));
        assert_eq!(player.velocity, Vec2::new(0.0, 50.0));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_first_tick_spawns_a_triple_off_screen() {
        let mut session = session();
        session.tick(Duration::ZERO);

        let obstacles: Vec<&Body> = session
            .bodies()
            .iter()
            .filter(|body| body.kind != BodyKind::Player)
            .collect();
        assert_eq!(obstacles.len(), 3);
        assert_eq!(obstacles[0].kind, BodyKind::Log);
        assert_eq!(obstacles[1].kind, BodyKind::Gap);
        assert_eq!(obstacles[1].visual, Visual::Hidden);
        assert_eq!(obstacles[2].kind, BodyKind::Log);

        let total: f32 = obstacles.iter().map(|body| body.size.y).sum();
        assert_eq!(total, 120.0);
        assert_eq!(obstacles[0].bounds().min.y, 0.0);
        assert_eq!(obstacles[0].bounds().max.y, obstacles[1].bounds().min.y);
        assert_eq!(obstacles[1].bounds().max.y, obstacles[2].bounds().min.y);
        assert_eq!(obstacles[2].bounds().max.y, 120.0);
        for body in obstacles {
            assert_eq!(body.bounds().min.x, 170.0);
            assert_eq!(body.velocity, Vec2::new(-50.0, 0.0));
        }
    }

    #[test]
    fn test_obstacles_scroll_left_and_are_removed_off_screen() {
        let mut session = session();
        session.tick(Duration::ZERO);
        session.tick(Duration::from_millis(200));
        let log = session
            .bodies()
            .iter()
            .find(|body| body.kind == BodyKind::Log)
            .unwrap();
        assert_eq!(log.bounds().min.x, 160.0);

        let mut fresh = self::session();
        fresh.spawn_obstacles(ObstacleLayout::new(5, 35, 120).unwrap());
        for body in fresh.bodies.iter_mut().skip(1) {
            body.position.x = -5.5;
        }
        fresh.tick(Duration::from_millis(1));
        assert!(ids_of(&fresh, BodyKind::Log).len() <= 2);
        assert!(
            fresh
                .bodies()
                .iter()
                .filter(|body| body.kind != BodyKind::Player)
                .all(|body| body.bounds().max.x >= 0.0)
        );
    }

    #[test]
    fn test_jump_lifts_player_and_plays_sound() {
        let mut session = session();
        session.push_jump(ButtonEvent::Pressed);
        session.tick(Duration::ZERO);

        assert_eq!(session.player().position.y, 40.0);
        assert!(session.player().flipbook.is_some());
        assert!(session.drain_effects().contains(&HostEffect::PlaySound {
            cue: SoundCue::Jump,
            mode: PlaybackMode::InBackground,
        }));
    }

    #[test]
    fn test_release_is_ignored() {
        let mut session = session();
        session.push_jump(ButtonEvent::Released);
        session.tick(Duration::ZERO);
        assert_eq!(session.player().position.y, 60.0);
        assert!(session.drain_effects().is_empty());
    }

    #[test]
    fn test_flap_animation_runs_through_frames() {
        let mut session = session();
        session.push_jump(ButtonEvent::Pressed);
        session.tick(Duration::ZERO);
        session.tick(Duration::from_millis(60));
        assert_eq!(session.player().visual, Visual::Duck(2));
        session.tick(Duration::from_millis(500));
        assert_eq!(session.player().visual, Visual::Duck(1));
        assert!(session.player().flipbook.is_none());
    }

    #[test]
    fn test_player_is_clamped_to_top() {
        let mut session = session();
        session.bodies[0].position.y = 5.0;
        session.push_jump(ButtonEvent::Pressed);
        session.push_jump(ButtonEvent::Pressed);
        session.tick(FRAME);

        assert_eq!(session.player().position.y, 0.0);
        assert!(!session.is_over());

        for _ in 0..20 {
            session.push_jump(ButtonEvent::Pressed);
            session.tick(FRAME);
            assert!(session.player().position.y >= 0.0);
        }
    }

    #[test]
    fn test_falling_off_the_bottom_ends_the_session() {
        let mut session = session();
        session.bodies[0].position.y = 119.0;
        session.tick(Duration::from_millis(100));

        assert!(session.is_over());
        assert!(
            session
                .drain_effects()
                .contains(&HostEffect::GameOver { show_screen: true })
        );
    }

    #[test]
    fn test_scoring_through_a_gap() {
        let mut session = session();
        // Player spans x 72..88 and y 52..68; the gap spans y 40..75.
        let layout = ObstacleLayout::new(40, 35, 120).unwrap();
        let [_, gap, _] = place_triple(&mut session, layout, 70.0);

        session.tick(Duration::ZERO);

        assert_eq!(session.score(), 1);
        assert!(session.body(gap).is_none());
        let effects = session.drain_effects();
        assert!(effects.contains(&HostEffect::ScoreChanged(1)));
        assert!(effects.contains(&HostEffect::PlaySound {
            cue: SoundCue::Score,
            mode: PlaybackMode::InBackground,
        }));

        session.tick(Duration::ZERO);
        assert_eq!(session.score(), 1);
        assert!(!session.is_over());
    }

    #[test]
    fn test_gap_entered_but_not_passed_does_not_score() {
        let mut session = session();
        let layout = ObstacleLayout::new(40, 35, 120).unwrap();
        let [_, gap, _] = place_triple(&mut session, layout, 85.0);

        session.tick(Duration::ZERO);

        assert_eq!(session.score(), 0);
        assert!(session.body(gap).is_some());
    }

    #[test]
    fn test_each_gap_scores_once() {
        let mut session = session();
        let layout = ObstacleLayout::new(40, 35, 120).unwrap();
        place_triple(&mut session, layout, 70.0);
        place_triple(&mut session, layout, 68.0);

        session.tick(Duration::ZERO);
        session.tick(Duration::ZERO);
        assert_eq!(session.score(), 2);
        assert!(ids_of(&session, BodyKind::Gap).iter().all(|id| {
            let gap = session.body(*id).unwrap();
            gap.position.x > 100.0
        }));
    }

    #[test]
    fn test_hitting_a_log_ends_the_session_regardless_of_score() {
        let mut session = session();
        session.score = 17;
        // Top log spans y 0..55 and overlaps the player's 52..68.
        let layout = ObstacleLayout::new(55, 35, 120).unwrap();
        place_triple(&mut session, layout, 80.0);

        session.tick(Duration::ZERO);

        assert!(session.is_over());
        assert_eq!(session.player().visual, Visual::Hurt);
        let effects = session.drain_effects();
        assert_eq!(
            effects,
            vec![
                HostEffect::PlaySound {
                    cue: SoundCue::Crash,
                    mode: PlaybackMode::UntilDone,
                },
                HostEffect::GameOver { show_screen: true },
            ]
        );
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut session = session();
        let layout = ObstacleLayout::new(55, 35, 120).unwrap();
        place_triple(&mut session, layout, 80.0);
        session.tick(Duration::ZERO);
        session.drain_effects();

        let frozen = session.player().position;
        session.push_jump(ButtonEvent::Pressed);
        session.tick(Duration::from_secs(1));

        assert_eq!(session.player().position, frozen);
        assert!(session.drain_effects().is_empty());
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_background_scrolls_at_configured_speed() {
        let mut session = session();
        session.tick(Duration::from_millis(500));
        assert_eq!(session.background_offset(), 10.0);
    }
}
