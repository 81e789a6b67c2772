use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::warn;

const TEMPO_BPM: f32 = 70.0;

const C4: f32 = 261.63;
const D4: f32 = 293.66;
const E4: f32 = 329.63;
const F4: f32 = 349.23;
const G4: f32 = 392.00;

/// Jingle Bells chorus as (frequency, beats); loops forever
const MELODY: &[(f32, f32)] = &[
    (E4, 0.5),
    (E4, 0.5),
    (E4, 1.0),
    (E4, 0.5),
    (E4, 0.5),
    (E4, 1.0),
    (E4, 0.5),
    (G4, 0.5),
    (C4, 0.75),
    (D4, 0.25),
    (E4, 2.0),
    (F4, 0.5),
    (F4, 0.5),
    (F4, 0.75),
    (F4, 0.25),
    (F4, 0.5),
    (E4, 0.5),
    (E4, 0.5),
    (E4, 0.25),
    (E4, 0.25),
    (E4, 0.5),
    (D4, 0.5),
    (D4, 0.5),
    (E4, 0.5),
    (D4, 1.0),
    (G4, 1.0),
];

/// Fixed-tempo square-wave sequencer state, owned by the stream callback
struct Sequencer {
    sample_rate: f32,
    note_index: usize,
    samples_into_note: u32,
    phase: f32,
}

impl Sequencer {
    fn new(sample_rate: f32) -> Self {
        Sequencer {
            sample_rate,
            note_index: 0,
            samples_into_note: 0,
            phase: 0.0,
        }
    }

    fn note_duration(&self) -> f32 {
        MELODY[self.note_index].1 * 60.0 / TEMPO_BPM
    }

    fn next_sample(&mut self) -> f32 {
        let duration = self.note_duration();
        let t = self.samples_into_note as f32 / self.sample_rate;
        if t >= duration {
            self.note_index = (self.note_index + 1) % MELODY.len();
            self.samples_into_note = 0;
            self.phase = 0.0;
        }

        let (freq, _) = MELODY[self.note_index];
        let duration = self.note_duration();
        let t = self.samples_into_note as f32 / self.sample_rate;
        self.samples_into_note += 1;

        self.phase = (self.phase + freq / self.sample_rate).fract();
        let square = if self.phase < 0.5 { 1.0 } else { -1.0 };

        // Punchy 8-bit envelope: start at 0.1, decay exponentially to 0.01
        // just before the note ends
        let ramp = (duration - 0.05).max(0.01);
        let gain = 0.1 * 0.1_f32.powf((t / ramp).min(1.0));

        square * gain
    }
}

/// Plays the looping melody on the default output device.
///
/// `start` fails silently: when no device or stream is available the engine
/// stays stopped and only logs a warning, matching the rest of the app where
/// audio is strictly optional.
pub struct AudioEngine {
    stream: Option<cpal::Stream>,
}

impl AudioEngine {
    pub fn new() -> Self {
        AudioEngine { stream: None }
    }

    pub fn is_playing(&self) -> bool {
        self.stream.is_some()
    }

    pub fn start(&mut self) {
        if self.stream.is_some() {
            return;
        }
        match build_stream() {
            Ok(stream) => self.stream = Some(stream),
            Err(err) => warn!("audio unavailable: {err:#}"),
        }
    }

    pub fn stop(&mut self) {
        // Dropping the stream cancels playback
        self.stream = None;
    }

    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.stop();
        } else {
            self.start();
        }
    }
}

fn build_stream() -> Result<cpal::Stream> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .context("no default output device")?;
    let config = device.default_output_config()?;
    if config.sample_format() != cpal::SampleFormat::F32 {
        return Err(anyhow!(
            "unsupported sample format {:?}",
            config.sample_format()
        ));
    }
    let channels = config.channels() as usize;
    let mut sequencer = Sequencer::new(config.sample_rate().0 as f32);

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            for frame in data.chunks_mut(channels) {
                let sample = sequencer.next_sample();
                for out in frame {
                    *out = sample;
                }
            }
        },
        |err| warn!("audio stream error: {err}"),
        None,
    )?;
    stream.play()?;
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn melody_is_the_full_chorus() {
        assert_eq!(MELODY.len(), 26);
        let beats: f32 = MELODY.iter().map(|&(_, b)| b).sum();
        assert!((beats - 16.0).abs() < 1e-6);
    }

    #[test]
    fn sequencer_advances_and_loops() {
        let rate = 1000.0;
        let mut seq = Sequencer::new(rate);
        let total_beats: f32 = MELODY.iter().map(|&(_, b)| b).sum();
        let samples_per_loop = (total_beats * 60.0 / TEMPO_BPM * rate) as usize;
        for _ in 0..samples_per_loop + 100 {
            seq.next_sample();
        }
        // Wrapped back to the start of the melody
        assert_eq!(seq.note_index, 0);
    }

    #[test]
    fn envelope_decays_within_a_note() {
        let mut seq = Sequencer::new(8000.0);
        let early: f32 = seq.next_sample().abs();
        // Jump near the end of the first note
        let duration = seq.note_duration();
        seq.samples_into_note = (duration * 8000.0) as u32 - 2;
        let late = seq.next_sample().abs();
        assert!(late < early);
        assert!(early <= 0.1 + 1e-6);
    }

    #[test]
    fn samples_stay_within_unit_range() {
        let mut seq = Sequencer::new(4000.0);
        for _ in 0..40_000 {
            let s = seq.next_sample();
            assert!(s.abs() <= 0.1 + 1e-6);
        }
    }
}
