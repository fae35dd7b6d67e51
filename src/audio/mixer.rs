use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::audio_api::{AudioCommand, NoteTrigger};

use super::frame::StereoFrame;
use super::voice::Voice;

// reserved up front so a dense arrangement doesn't allocate in the callback
const VOICE_CAPACITY: usize = 512;

// Lives on the audio thread. Turns scheduled notes into voices and sums them
// into each block, advancing the shared frame clock as it goes.
pub struct Mixer {
    sample_rate: f64,
    voices: Vec<Voice>,
    frames_rendered: u64,
    clock: Arc<AtomicU64>,
}

impl Mixer {
    pub fn new(sample_rate: u32, clock: Arc<AtomicU64>) -> Self {
        Self {
            sample_rate: sample_rate as f64,
            voices: Vec::with_capacity(VOICE_CAPACITY),
            frames_rendered: 0,
            clock,
        }
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Play(t) => self.schedule(t),
        }
    }

    fn schedule(&mut self, t: NoteTrigger) {
        let start_frame = self.seconds_to_frame(t.start);
        let stop_frame = t.stop.map(|s| self.seconds_to_frame(s));
        self.voices.push(Voice::new(t.sample, t.rate, t.gain, start_frame, stop_frame));
    }

    fn seconds_to_frame(&self, secs: f64) -> u64 {
        (secs.max(0.0) * self.sample_rate).round() as u64
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn render_block(&mut self, out: &mut [StereoFrame]) {
        out.fill(StereoFrame::zero());
        let block_start = self.frames_rendered;
        for voice in &mut self.voices {
            voice.render_into(out, block_start);
        }
        self.voices.retain(Voice::is_active);

        self.frames_rendered += out.len() as u64;
        self.clock.store(self.frames_rendered, Ordering::Release);
    }
}
