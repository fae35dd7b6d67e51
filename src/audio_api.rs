use std::sync::Arc;

pub use crate::audio::SampleBuffer;

// One scheduled note: a sample played back at a rate, on the output timeline
#[derive(Clone, Debug)]
pub struct NoteTrigger {
    pub sample: Arc<SampleBuffer>,
    pub pitch: i32,        // what we wanted to hear
    pub source_pitch: i32, // fundamental of the recording we're bending
    pub rate: f64,
    pub gain: f32,
    pub start: f64,        // seconds on the context clock
    pub stop: Option<f64>, // None = let the sample ring out
}

#[derive(Clone, Debug)]
pub enum AudioCommand {
    // Samples are decoded on the control side and travel with the note, so
    // the audio thread never touches the disk
    Play(NoteTrigger),
}
