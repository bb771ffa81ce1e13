//! Procedural sound effects rendered to in-memory WAV clips.

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::f32::consts::TAU;

use crate::sim::SoundCue;

pub const SAMPLE_RATE: u32 = 22_050;

/// Peak amplitude of a full-volume tone, leaving headroom when sounds overlap.
const HEADROOM: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
    Noise,
}

/// Modulation applied on top of the base tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Vibrato,
    Tremolo,
    Warble,
}

/// Shape of the sweep from start to end values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    Curve,
    Logarithmic,
}

impl Interpolation {
    fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Interpolation::Linear => t,
            Interpolation::Curve => t * t * (3.0 - 2.0 * t),
            Interpolation::Logarithmic => (1.0 + 9.0 * t).log10(),
        }
    }
}

/// A single swept tone; volumes use the 0-255 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    pub start_volume: u8,
    pub end_volume: u8,
    pub duration_ms: u32,
    pub effect: Effect,
    pub interpolation: Interpolation,
}

impl Tone {
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        waveform: Waveform,
        start_hz: f32,
        end_hz: f32,
        start_volume: u8,
        end_volume: u8,
        duration_ms: u32,
        effect: Effect,
        interpolation: Interpolation,
    ) -> Self {
        Tone {
            waveform,
            start_hz,
            end_hz,
            start_volume,
            end_volume,
            duration_ms,
            effect,
            interpolation,
        }
    }

    /// A flat note for melodies.
    pub const fn note(waveform: Waveform, hz: f32, volume: u8, duration_ms: u32) -> Self {
        Tone::new(
            waveform,
            hz,
            hz,
            volume,
            volume / 2,
            duration_ms,
            Effect::None,
            Interpolation::Linear,
        )
    }

    pub fn sample_count(&self, sample_rate: u32) -> usize {
        (sample_rate as u64 * self.duration_ms as u64 / 1000) as usize
    }

    fn render_into(&self, samples: &mut Vec<f32>, sample_rate: u32, rng: &mut StdRng) {
        let count = self.sample_count(sample_rate);
        let mut phase = 0.0f32;

        for i in 0..count {
            let time = i as f32 / sample_rate as f32;
            let progress = self.interpolation.apply(i as f32 / count as f32);

            let mut hz = self.start_hz + (self.end_hz - self.start_hz) * progress;
            let mut amplitude = (self.start_volume as f32
                + (self.end_volume as f32 - self.start_volume as f32) * progress)
                / 255.0;

            match self.effect {
                Effect::None => {}
                Effect::Vibrato => hz *= 1.0 + 0.02 * (TAU * 8.0 * time).sin(),
                Effect::Tremolo => amplitude *= 0.75 + 0.25 * (TAU * 10.0 * time).sin(),
                Effect::Warble => hz *= 1.0 + 0.1 * (TAU * 4.0 * time).sin(),
            }

            phase = (phase + hz / sample_rate as f32).fract();
            let value = match self.waveform {
                Waveform::Sine => (TAU * phase).sin(),
                Waveform::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
                Waveform::Square => {
                    if phase < 0.5 {
                        1.0
                    } else {
                        -1.0
                    }
                }
                Waveform::Sawtooth => 2.0 * phase - 1.0,
                Waveform::Noise => rng.random_range(-1.0..=1.0),
            };

            samples.push(value * amplitude * HEADROOM);
        }
    }
}

const C5: f32 = 523.25;
const D5: f32 = 587.33;
const E5: f32 = 659.25;
const F5: f32 = 698.46;
const G5: f32 = 783.99;
const A5: f32 = 880.0;
const C6: f32 = 1046.5;

const CHEERY_SONG: [f32; 16] = [
    C5, E5, G5, E5, F5, A5, C6, A5, G5, E5, C5, E5, D5, F5, E5, C5,
];

/// Tones played back to back for a cue.
pub fn tones_for(cue: SoundCue) -> Vec<Tone> {
    match cue {
        SoundCue::Jump => vec![Tone::new(
            Waveform::Triangle,
            400.0,
            600.0,
            255,
            0,
            100,
            Effect::None,
            Interpolation::Linear,
        )],
        SoundCue::Crash => vec![Tone::new(
            Waveform::Noise,
            800.0,
            200.0,
            255,
            0,
            300,
            Effect::None,
            Interpolation::Logarithmic,
        )],
        SoundCue::Score => vec![
            Tone::note(Waveform::Square, 987.77, 160, 80),
            Tone::new(
                Waveform::Square,
                1318.51,
                1318.51,
                160,
                0,
                220,
                Effect::None,
                Interpolation::Curve,
            ),
        ],
        SoundCue::GameOver => vec![Tone::new(
            Waveform::Square,
            1200.0,
            200.0,
            200,
            0,
            250,
            Effect::Warble,
            Interpolation::Curve,
        )],
        SoundCue::Music => CHEERY_SONG
            .iter()
            .map(|&hz| Tone::note(Waveform::Triangle, hz, 90, 180))
            .collect(),
    }
}

/// Renders tones one after another as mono samples in `[-1, 1]`.
pub fn render(tones: &[Tone], sample_rate: u32) -> Vec<f32> {
    let total = tones.iter().map(|tone| tone.sample_count(sample_rate)).sum();
    let mut samples = Vec::with_capacity(total);
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for tone in tones {
        tone.render_into(&mut samples, sample_rate, &mut rng);
    }
    samples
}

/// Wraps mono samples in a 16-bit PCM WAV container.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    const CHANNELS: u16 = 1;
    const BITS: u16 = 16;
    let block_align = CHANNELS * BITS / 8;
    let data_len = (samples.len() * block_align as usize) as u32;

    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");

    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&CHANNELS.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&BITS.to_le_bytes());

    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    for sample in samples {
        let pcm = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        bytes.extend_from_slice(&pcm.to_le_bytes());
    }
    bytes
}

/// Renders a cue straight to WAV bytes.
pub fn cue_to_wav(cue: SoundCue) -> Vec<u8> {
    encode_wav(&render(&tones_for(cue), SAMPLE_RATE), SAMPLE_RATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_tone_matches_its_parameters() {
        let tones = tones_for(SoundCue::Jump);
        assert_eq!(tones.len(), 1);
        let jump = tones[0];
        assert_eq!(jump.waveform, Waveform::Triangle);
        assert_eq!((jump.start_hz, jump.end_hz), (400.0, 600.0));
        assert_eq!((jump.start_volume, jump.end_volume), (255, 0));
        assert_eq!(jump.duration_ms, 100);
    }

    #[test]
    fn test_render_length_and_range() {
        for cue in [
            SoundCue::Jump,
            SoundCue::Crash,
            SoundCue::Score,
            SoundCue::GameOver,
            SoundCue::Music,
        ] {
            let tones = tones_for(cue);
            let samples = render(&tones, SAMPLE_RATE);
            let expected: usize = tones.iter().map(|t| t.sample_count(SAMPLE_RATE)).sum();
            assert_eq!(samples.len(), expected, "{cue:?}");
            assert!(samples.iter().all(|s| s.abs() <= HEADROOM + f32::EPSILON));
        }
    }

    #[test]
    fn test_volume_envelope_fades_out() {
        let samples = render(&tones_for(SoundCue::Jump), SAMPLE_RATE);
        let head = samples[..200].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let tail = samples[samples.len() - 200..]
            .iter()
            .fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(head > tail * 4.0);
    }

    #[test]
    fn test_wav_header() {
        let samples = vec![0.0, 1.0, -1.0];
        let wav = encode_wav(&samples, SAMPLE_RATE);
        assert_eq!(wav.len(), 44 + 6);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(u32::from_le_bytes(wav[24..28].try_into().unwrap()), SAMPLE_RATE);
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 6);
        assert_eq!(i16::from_le_bytes([wav[46], wav[47]]), i16::MAX);
    }

    #[test]
    fn test_interpolation_endpoints() {
        for curve in [
            Interpolation::Linear,
            Interpolation::Curve,
            Interpolation::Logarithmic,
        ] {
            assert_eq!(curve.apply(0.0), 0.0);
            assert!((curve.apply(1.0) - 1.0).abs() < 1e-6);
        }
    }
}
