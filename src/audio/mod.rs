//! Sound plugin - synthesizes every cue at startup and plays them on request.

pub mod synth;

use bevy::audio::{AudioPlayer, AudioSource, GlobalVolume, PlaybackSettings, Volume};
use bevy::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use crate::game::{AudioCommand, GameSet, SoundPlayer};
use crate::preferences::SoundSetting;
use crate::sim::{PlaybackMode, SoundCue};

/// Plugin for sound synthesis and playback.
pub struct SoundPlugin;

impl Plugin for SoundPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DelayedSounds>()
            .add_systems(PreStartup, build_sound_bank)
            .add_systems(
                Update,
                (run_audio_commands, play_delayed_sounds)
                    .chain()
                    .in_set(GameSet::Present),
            );
    }
}

/// Synthesized clip and length for each cue.
#[derive(Resource, Default)]
pub struct SoundBank {
    clips: HashMap<SoundCue, (Handle<AudioSource>, Duration)>,
}

impl SoundBank {
    pub fn get(&self, cue: SoundCue) -> Option<(Handle<AudioSource>, Duration)> {
        self.clips.get(&cue).cloned()
    }
}

/// Sounds waiting for an until-done sound ahead of them to finish.
#[derive(Resource, Default)]
pub struct DelayedSounds {
    /// Remaining length of the latest until-done sound.
    busy: Option<Timer>,
    queue: Vec<(SoundCue, PlaybackMode)>,
}

/// Applies a sound setting as the global volume (0-255 scale).
pub fn apply_volume(global_volume: &mut GlobalVolume, setting: SoundSetting) {
    *global_volume = GlobalVolume::new(Volume::Linear(setting.volume() as f32 / 255.0));
}

/// Startup system rendering each cue to a WAV asset.
fn build_sound_bank(mut commands: Commands, mut audio_assets: ResMut<Assets<AudioSource>>) {
    let mut bank = SoundBank::default();
    for cue in [
        SoundCue::Jump,
        SoundCue::Crash,
        SoundCue::Score,
        SoundCue::GameOver,
        SoundCue::Music,
    ] {
        let tones = synth::tones_for(cue);
        let length = Duration::from_millis(tones.iter().map(|t| t.duration_ms as u64).sum());
        let handle = audio_assets.add(AudioSource {
            bytes: synth::cue_to_wav(cue).into(),
        });
        bank.clips.insert(cue, (handle, length));
    }
    commands.insert_resource(bank);
}

fn spawn_sound(
    commands: &mut Commands,
    bank: &SoundBank,
    cue: SoundCue,
    mode: PlaybackMode,
) -> Duration {
    let Some((handle, length)) = bank.get(cue) else {
        warn!("No clip for {cue:?}");
        return Duration::ZERO;
    };

    let settings = match mode {
        PlaybackMode::LoopingInBackground => PlaybackSettings::LOOP,
        PlaybackMode::UntilDone | PlaybackMode::InBackground => PlaybackSettings::DESPAWN,
    };
    commands.spawn((AudioPlayer::new(handle), settings, SoundPlayer));
    length
}

/// System to play or stop sounds in the order they were requested.
fn run_audio_commands(
    mut commands: Commands,
    mut audio_reader: MessageReader<AudioCommand>,
    bank: Res<SoundBank>,
    mut delayed: ResMut<DelayedSounds>,
    players: Query<Entity, With<SoundPlayer>>,
) {
    for command in audio_reader.read() {
        match *command {
            AudioCommand::StopAll => {
                for entity in players.iter() {
                    commands.entity(entity).despawn();
                }
                delayed.queue.clear();
                delayed.busy = None;
            }
            AudioCommand::Play { cue, mode } => {
                if delayed.busy.is_some() {
                    delayed.queue.push((cue, mode));
                    continue;
                }
                let length = spawn_sound(&mut commands, &bank, cue, mode);
                if mode == PlaybackMode::UntilDone {
                    delayed.busy = Some(Timer::new(length, TimerMode::Once));
                }
            }
        }
    }
}

/// System to release queued sounds once the blocking sound has finished.
fn play_delayed_sounds(
    mut commands: Commands,
    time: Res<Time>,
    bank: Res<SoundBank>,
    mut delayed: ResMut<DelayedSounds>,
) {
    let Some(busy) = delayed.busy.as_mut() else {
        return;
    };
    busy.tick(time.delta());
    if !busy.is_finished() {
        return;
    }
    delayed.busy = None;

    let queue = std::mem::take(&mut delayed.queue);
    let mut remaining = queue.into_iter();
    for (cue, mode) in remaining.by_ref() {
        let length = spawn_sound(&mut commands, &bank, cue, mode);
        if mode == PlaybackMode::UntilDone {
            delayed.busy = Some(Timer::new(length, TimerMode::Once));
            break;
        }
    }
    delayed.queue.extend(remaining);
}
