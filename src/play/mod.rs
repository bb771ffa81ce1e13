//! Play plugin - feeds input into the running session, steps it, and forwards its effects.

use bevy::prelude::*;

use crate::game::{AudioCommand, GamePhase, GameSet, GameState, JUMP_KEYS, SessionEnded};
use crate::sim::{ButtonEvent, HostEffect, PlaybackMode, SoundCue};

/// Plugin for the in-game loop.
pub struct PlayPlugin;

impl Plugin for PlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, flap_input.in_set(GameSet::Input))
            .add_systems(Update, advance_session.in_set(GameSet::Simulate));
    }
}

/// System to queue jump button transitions on the session.
fn flap_input(keyboard_input: Res<ButtonInput<KeyCode>>, mut game_state: ResMut<GameState>) {
    if game_state.phase != GamePhase::Playing {
        return;
    }

    if let Some(session) = game_state.session.as_mut() {
        if keyboard_input.any_just_pressed(JUMP_KEYS) {
            session.push_jump(ButtonEvent::Pressed);
        }
        if keyboard_input.any_just_released(JUMP_KEYS) {
            session.push_jump(ButtonEvent::Released);
        }
    }
}

/// System to tick the session once per frame and turn its effects into messages.
fn advance_session(
    time: Res<Time>,
    mut game_state: ResMut<GameState>,
    mut audio_writer: MessageWriter<AudioCommand>,
    mut ended_writer: MessageWriter<SessionEnded>,
) {
    if game_state.phase != GamePhase::Playing {
        return;
    }
    let Some(session) = game_state.session.as_mut() else {
        return;
    };

    session.tick(time.delta());

    let mut ended = None;
    for effect in session.drain_effects() {
        match effect {
            HostEffect::PlaySound { cue, mode } => {
                audio_writer.write(AudioCommand::Play { cue, mode });
            }
            // The score text reads the session every frame.
            HostEffect::ScoreChanged(_) => {}
            HostEffect::GameOver { show_screen } => {
                audio_writer.write(AudioCommand::Play {
                    cue: SoundCue::GameOver,
                    mode: PlaybackMode::InBackground,
                });
                ended = Some(SessionEnded {
                    show_screen,
                    score: session.score(),
                });
            }
        }
    }

    if let Some(ended) = ended {
        game_state.phase = GamePhase::GameOver;
        ended_writer.write(ended);
    }
}
