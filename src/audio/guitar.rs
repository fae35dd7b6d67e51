//! The guitar sampler: four recordings of E, bent to whatever pitch a chord
//! asks for.

use std::sync::Arc;

use crate::audio_api::{AudioCommand, NoteTrigger};
use crate::error::EngineError;
use crate::loader::registry::{SampleDef, SampleName, GUITAR_SAMPLES};
use crate::loader::sample_loader::{self, SampleSource};
use crate::music::theory::{chord_to_pitch_triad, Chord};

use super::output::{OutputContext, OutputDevice};
use super::sample_buffer::SampleBuffer;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineSettings {
    /// Added to every start time to absorb scheduling jitter.
    pub lookahead: f64,
    /// Octave chords are voiced in by `play_chord`.
    pub reference_octave: i32,
    pub voice_gain: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            lookahead: 0.02,
            reference_octave: 3,
            voice_gain: 0.3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoadedSample {
    pub def: SampleDef,
    pub buffer: Arc<SampleBuffer>,
}

/// Anything tagged with the pitch it was recorded at.
pub trait Fundamental {
    fn fundamental(&self) -> i32;
}

impl Fundamental for SampleDef {
    fn fundamental(&self) -> i32 {
        self.midi
    }
}

impl Fundamental for LoadedSample {
    fn fundamental(&self) -> i32 {
        self.def.midi
    }
}

/// The sample whose fundamental is nearest to `target`. On a tie the one
/// listed first wins. `None` only for an empty list.
pub fn closest_sample<T: Fundamental>(target: i32, samples: &[T]) -> Option<&T> {
    let (first, rest) = samples.split_first()?;
    Some(rest.iter().fold(first, |best, s| {
        if (target - s.fundamental()).abs() < (target - best.fundamental()).abs() {
            s
        } else {
            best
        }
    }))
}

/// Resampling ratio that moves a recording at `source` up or down to
/// `target`, in equal temperament.
pub fn playback_rate(target: i32, source: i32) -> f64 {
    ((target - source) as f64 / 12.0).exp2()
}

/// Synchronous single-note scheduling, the one call the scheduler needs.
pub trait PitchSink {
    fn play_midi(&self, pitch: i32, offset: f64);
}

pub struct GuitarEngine {
    device: Box<dyn OutputDevice>,
    source: Box<dyn SampleSource>,
    settings: EngineSettings,
    ctx: Option<Box<dyn OutputContext>>,
    samples: Vec<LoadedSample>,
    loaded: bool,
}

impl GuitarEngine {
    pub fn new(
        device: impl OutputDevice + 'static,
        source: impl SampleSource + 'static,
        settings: EngineSettings,
    ) -> Self {
        Self {
            device: Box::new(device),
            source: Box::new(source),
            settings,
            ctx: None,
            samples: Vec::new(),
            loaded: false,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Seconds on the current context's clock, if there is one.
    pub fn current_time(&self) -> Option<f64> {
        self.ctx.as_deref().map(|ctx| ctx.current_time())
    }

    /// Opens the output on first use and wakes it if it's suspended.
    pub fn ensure_context(&mut self) -> Result<(), EngineError> {
        let ctx = match self.ctx.take() {
            Some(ctx) => ctx,
            None => {
                log::debug!("opening audio output");
                self.device.open()?
            }
        };
        let ctx = self.ctx.insert(ctx);
        if !ctx.is_running() {
            ctx.resume()?;
        }
        Ok(())
    }

    /// Fetches and decodes all four recordings. Either every sample ends up
    /// loaded or none does, so a failed load can simply be retried.
    pub fn load(&mut self) -> Result<(), EngineError> {
        self.ensure_context()?;
        if self.loaded {
            return Ok(());
        }
        let rate = self.context()?.sample_rate();

        let mut samples = Vec::with_capacity(GUITAR_SAMPLES.len());
        for def in GUITAR_SAMPLES.iter() {
            let buffer = sample_loader::load(self.source.as_ref(), def, rate)?;
            log::debug!(
                "decoded {} ({} frames, fundamental {})",
                def.location,
                buffer.data.len(),
                def.midi
            );
            samples.push(LoadedSample { def: *def, buffer: Arc::new(buffer) });
        }

        self.samples = samples;
        self.loaded = true;
        log::info!("guitar samples loaded at {rate} Hz");
        Ok(())
    }

    /// Auditions a chord. Loads on demand; with `stop_after` every note is
    /// cut that many seconds after it starts, otherwise it rings out.
    pub fn play_chord(
        &mut self,
        chord: &Chord,
        offset: f64,
        stop_after: Option<f64>,
    ) -> Result<(), EngineError> {
        self.load()?;
        let ctx = self.context()?;
        let start = ctx.current_time() + self.settings.lookahead + offset;
        let stop = stop_after.map(|d| start + d);

        for pitch in chord_to_pitch_triad(chord, self.settings.reference_octave) {
            let trigger = self.trigger_for(pitch, start, stop).ok_or(EngineError::NotLoaded)?;
            ctx.submit(AudioCommand::Play(trigger));
        }
        Ok(())
    }

    /// Plays one of the recordings untouched.
    pub fn play_sample(&mut self, name: SampleName) -> Result<(), EngineError> {
        self.load()?;
        let ctx = self.context()?;
        let Some(sample) = self.samples.iter().find(|s| s.def.name == name) else {
            return Err(EngineError::NotLoaded);
        };
        ctx.submit(AudioCommand::Play(NoteTrigger {
            sample: sample.buffer.clone(),
            pitch: sample.def.midi,
            source_pitch: sample.def.midi,
            rate: 1.0,
            gain: self.settings.voice_gain,
            start: ctx.current_time() + self.settings.lookahead,
            stop: None,
        }));
        Ok(())
    }

    /// Schedules a single pitch without loading anything. Before `load()`
    /// this only logs, so a long schedule loses a note instead of failing.
    pub fn play_midi(&self, pitch: i32, offset: f64) {
        let ctx = match self.ctx.as_deref() {
            Some(ctx) if self.loaded => ctx,
            _ => {
                log::warn!("audio not loaded, skipping note {pitch}");
                return;
            }
        };
        let start = ctx.current_time() + self.settings.lookahead + offset;
        match self.trigger_for(pitch, start, None) {
            Some(trigger) => ctx.submit(AudioCommand::Play(trigger)),
            None => log::warn!("no sample for note {pitch}, skipping"),
        }
    }

    /// Silences everything by throwing the output away, samples included.
    /// The next call opens a new output and has to load again.
    pub fn stop(&mut self) {
        if let Some(mut ctx) = self.ctx.take() {
            if let Err(e) = ctx.suspend() {
                log::warn!("suspending audio output failed: {e}");
            }
        }
        self.samples.clear();
        self.loaded = false;
    }

    fn context(&self) -> Result<&dyn OutputContext, EngineError> {
        self.ctx
            .as_deref()
            .ok_or_else(|| EngineError::Output("no output context".to_string()))
    }

    fn trigger_for(&self, pitch: i32, start: f64, stop: Option<f64>) -> Option<NoteTrigger> {
        let sample = closest_sample(pitch, &self.samples)?;
        Some(NoteTrigger {
            sample: sample.buffer.clone(),
            pitch,
            source_pitch: sample.def.midi,
            rate: playback_rate(pitch, sample.def.midi),
            gain: self.settings.voice_gain,
            start,
            stop,
        })
    }
}

impl PitchSink for GuitarEngine {
    fn play_midi(&self, pitch: i32, offset: f64) {
        GuitarEngine::play_midi(self, pitch, offset);
    }
}
