use crate::audio_api::AudioCommand;
use crate::error::EngineError;

/// A running audio timeline that scheduled notes are submitted to. Plays the
/// part a browser audio context would: it owns the clock and the mixer, and
/// it can be suspended and resumed.
pub trait OutputContext {
    fn sample_rate(&self) -> u32;

    /// Seconds of audio rendered since the context was opened.
    fn current_time(&self) -> f64;

    fn is_running(&self) -> bool;

    fn resume(&mut self) -> Result<(), EngineError>;

    fn suspend(&mut self) -> Result<(), EngineError>;

    /// Hand a command to the timeline. Never blocks and never drops a note
    /// while the context is open.
    fn submit(&self, cmd: AudioCommand);
}

/// Opens fresh output contexts. The engine opens one lazily and opens a new
/// one after every `stop()`.
pub trait OutputDevice {
    fn open(&self) -> Result<Box<dyn OutputContext>, EngineError>;
}
