//! UI plugin - handles the sound question, splash, score display, game over screen, and game flow.

use bevy::prelude::*;

use crate::audio::apply_volume;
use crate::game::{
    AudioCommand, GAME_OVER_MESSAGE, GAME_TITLE, GamePhase, GameOverUI, GameSet, GameState,
    JUMP_KEYS, NO_KEYS, Preferences, SOUND_QUESTION, SPLASH_HINT, ScoreText, SessionEnded,
    SoundPromptUI, SplashUI, YES_KEYS,
};
use crate::preferences::{SoundSetting, choose_sound_setting, load_sound_setting};
use crate::sim::{PlaybackMode, SoundCue};

/// Plugin for UI and game flow systems.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_system).add_systems(
            Update,
            (
                start_game_from_splash,
                answer_sound_prompt,
                restart_game,
                update_score_text,
                spawn_game_over_screen_system,
            )
                .chain()
                .in_set(GameSet::Present),
        );
    }
}

/// Initial setup system - camera, score text, then the sound question or the splash.
fn setup_system(
    mut commands: Commands,
    mut game_state: ResMut<GameState>,
    preferences: Res<Preferences>,
    mut global_volume: ResMut<GlobalVolume>,
    mut audio_writer: MessageWriter<AudioCommand>,
) {
    commands.spawn(Camera2d);

    // Score text (stays at zero until a session starts)
    commands.spawn((
        Text::from("Score: 0"),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        ScoreText,
    ));

    audio_writer.write(AudioCommand::StopAll);

    match load_sound_setting(&*preferences.store) {
        Some(setting) => {
            enter_splash(
                &mut commands,
                &mut game_state,
                &mut global_volume,
                &mut audio_writer,
                setting,
            );
        }
        None => {
            game_state.phase = GamePhase::SoundPrompt;
            spawn_sound_prompt(&mut commands);
        }
    }
}

/// Applies the sound setting, starts the music, and shows the splash.
fn enter_splash(
    commands: &mut Commands,
    game_state: &mut GameState,
    global_volume: &mut GlobalVolume,
    audio_writer: &mut MessageWriter<AudioCommand>,
    setting: SoundSetting,
) {
    apply_volume(global_volume, setting);
    game_state.phase = GamePhase::Splash;

    audio_writer.write(AudioCommand::Play {
        cue: SoundCue::Music,
        mode: PlaybackMode::LoopingInBackground,
    });
    spawn_splash(commands);
}

/// Spawns a full-screen overlay with one line of text per entry.
fn spawn_overlay<M: Component>(
    commands: &mut Commands,
    marker: M,
    background: Color,
    lines: &[(&str, f32, Color)],
) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(background),
            marker,
        ))
        .with_children(|parent| {
            for &(text, font_size, color) in lines {
                parent.spawn((
                    Text::from(text),
                    TextFont {
                        font_size,
                        ..default()
                    },
                    TextColor(color),
                    Node {
                        margin: UiRect::bottom(Val::Px(font_size * 0.6)),
                        ..default()
                    },
                ));
            }
        });
}

/// Spawns the first-run sound question.
fn spawn_sound_prompt(commands: &mut Commands) {
    spawn_overlay(
        commands,
        SoundPromptUI,
        Color::srgba(0.0, 0.0, 0.0, 0.85),
        &[
            (SOUND_QUESTION, 40.0, Color::WHITE),
            (
                "Y / A: yes      N / B: no",
                20.0,
                Color::srgba(0.8, 0.8, 0.8, 1.0),
            ),
        ],
    );
}

/// Spawns the title and instructions screen.
fn spawn_splash(commands: &mut Commands) {
    spawn_overlay(
        commands,
        SplashUI,
        Color::srgba(0.0, 0.0, 0.0, 0.6),
        &[
            (GAME_TITLE, 72.0, Color::srgba(1.0, 0.85, 0.2, 1.0)),
            (SPLASH_HINT, 24.0, Color::srgba(1.0, 1.0, 0.3, 1.0)),
            (
                "Space, Up or Z to flap",
                18.0,
                Color::srgba(0.8, 0.8, 0.8, 1.0),
            ),
        ],
    );
}

/// Spawns the game over screen UI.
fn spawn_game_over_screen(commands: &mut Commands, score: u32) {
    let final_score = format!("Final Score: {}", score);
    spawn_overlay(
        commands,
        GameOverUI,
        Color::srgba(0.0, 0.0, 0.0, 0.7),
        &[
            (GAME_OVER_MESSAGE, 60.0, Color::srgba(1.0, 0.3, 0.3, 1.0)),
            (final_score.as_str(), 30.0, Color::WHITE),
            (
                "Press SPACE to restart",
                20.0,
                Color::srgba(0.8, 0.8, 0.8, 1.0),
            ),
        ],
    );
}

fn despawn_all(commands: &mut Commands, entities: impl Iterator<Item = Entity>) {
    for entity in entities {
        commands.entity(entity).despawn_children();
        commands.entity(entity).despawn();
    }
}

/// System to record the answer to the sound question.
fn answer_sound_prompt(
    mut commands: Commands,
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut game_state: ResMut<GameState>,
    mut preferences: ResMut<Preferences>,
    mut global_volume: ResMut<GlobalVolume>,
    mut audio_writer: MessageWriter<AudioCommand>,
    prompt_ui: Query<Entity, With<SoundPromptUI>>,
) {
    if game_state.phase != GamePhase::SoundPrompt {
        return;
    }

    let wants_sound = if keyboard_input.any_just_pressed(YES_KEYS) {
        true
    } else if keyboard_input.any_just_pressed(NO_KEYS) {
        false
    } else {
        return;
    };

    despawn_all(&mut commands, prompt_ui.iter());
    let setting = choose_sound_setting(&mut *preferences.store, wants_sound);
    enter_splash(
        &mut commands,
        &mut game_state,
        &mut global_volume,
        &mut audio_writer,
        setting,
    );
}

/// System to leave the splash and start playing.
fn start_game_from_splash(
    mut commands: Commands,
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut game_state: ResMut<GameState>,
    mut audio_writer: MessageWriter<AudioCommand>,
    splash_ui: Query<Entity, With<SplashUI>>,
) {
    if game_state.phase != GamePhase::Splash || !keyboard_input.any_just_pressed(JUMP_KEYS) {
        return;
    }

    despawn_all(&mut commands, splash_ui.iter());
    audio_writer.write(AudioCommand::StopAll);
    game_state.begin_session();
}

/// System to restart the game from the game over screen.
fn restart_game(
    mut commands: Commands,
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut game_state: ResMut<GameState>,
    game_over_ui: Query<Entity, With<GameOverUI>>,
) {
    // The overlay only exists from the frame after the crash, so the jump that
    // ended the session cannot also restart it.
    if game_state.phase == GamePhase::GameOver
        && !game_over_ui.is_empty()
        && keyboard_input.just_pressed(KeyCode::Space)
    {
        despawn_all(&mut commands, game_over_ui.iter());
        game_state.begin_session();
    }
}

/// System to update the score display.
fn update_score_text(game_state: Res<GameState>, mut query: Query<&mut Text, With<ScoreText>>) {
    if let Ok(mut text) = query.single_mut() {
        *text = Text::from(format!("Score: {}", game_state.score()));
    }
}

/// System to show the game over screen when the session ends.
fn spawn_game_over_screen_system(
    mut commands: Commands,
    mut ended_reader: MessageReader<SessionEnded>,
    game_over_ui: Query<Entity, With<GameOverUI>>,
) {
    if let Some(ended) = ended_reader.read().last()
        && ended.show_screen
        && game_over_ui.is_empty()
    {
        spawn_game_over_screen(&mut commands, ended.score);
    }
}
