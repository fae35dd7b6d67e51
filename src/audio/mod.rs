use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender};

use crate::audio_api::AudioCommand;
use crate::error::EngineError;

mod frame;
pub mod guitar;
mod mixer;
pub mod offline;
pub mod output;
mod sample_buffer;
mod voice;

pub use frame::StereoFrame;
pub use guitar::{
    closest_sample, playback_rate, EngineSettings, GuitarEngine, LoadedSample, PitchSink,
};
pub use mixer::Mixer;
pub use offline::{OfflineDevice, OfflineHandle};
pub use output::{OutputContext, OutputDevice};
pub use sample_buffer::SampleBuffer;

// The default output device through cpal
#[derive(Clone, Copy, Debug, Default)]
pub struct CpalDevice;

impl OutputDevice for CpalDevice {
    fn open(&self) -> Result<Box<dyn OutputContext>, EngineError> {
        let ctx = start_audio().map_err(|e| EngineError::Output(format!("{e:#}")))?;
        Ok(Box::new(ctx))
    }
}

pub struct CpalContext {
    tx: Sender<AudioCommand>,
    clock: Arc<AtomicU64>,
    sample_rate: u32,
    running: bool,
    stream: cpal::Stream,
}

impl OutputContext for CpalContext {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn current_time(&self) -> f64 {
        self.clock.load(Ordering::Acquire) as f64 / self.sample_rate as f64
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        self.stream
            .play()
            .map_err(|e| EngineError::Output(format!("failed to play output stream: {e}")))?;
        self.running = true;
        Ok(())
    }

    fn suspend(&mut self) -> Result<(), EngineError> {
        self.stream
            .pause()
            .map_err(|e| EngineError::Output(format!("failed to pause output stream: {e}")))?;
        self.running = false;
        Ok(())
    }

    fn submit(&self, cmd: AudioCommand) {
        send_command(&self.tx, cmd);
    }
}

// ── Command queue ─────────────────────────────────────────────────

// Unbounded: a whole arrangement is submitted in one burst, long before the
// callback gets to drain it
fn command_queue() -> (Sender<AudioCommand>, Receiver<AudioCommand>) {
    crossbeam_channel::unbounded()
}

fn send_command(tx: &Sender<AudioCommand>, cmd: AudioCommand) {
    if tx.send(cmd).is_err() {
        log::warn!("audio output is gone, dropping note");
    }
}

fn drain_commands(rx: &Receiver<AudioCommand>, mixer: &mut Mixer) {
    while let Ok(cmd) = rx.try_recv() {
        mixer.handle_cmd(cmd);
    }
}

// Opens the default output device. The stream is built but not played;
// whoever needs sound first resumes it
pub fn start_audio() -> anyhow::Result<CpalContext> {
    let (tx, rx) = command_queue();

    let host = cpal::default_host();
    let device = host.default_output_device().context("no default output device")?;
    let config = device.default_output_config().context("no default output config")?;

    let sample_rate = config.sample_rate();
    let channels = config.channels() as usize;
    let clock = Arc::new(AtomicU64::new(0));

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => build_output_stream_f32(
            &device,
            &config.into(),
            rx,
            clock.clone(),
            sample_rate,
            channels,
        )?,
        other => anyhow::bail!("unsupported sample format {other:?} (only f32 supported for now)"),
    };

    log::info!("audio output opened: {channels} channels @ {sample_rate} Hz");

    Ok(CpalContext {
        tx,
        clock,
        sample_rate,
        running: false,
        stream,
    })
}

// ── Output stream ─────────────────────────────────────────────────

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    rx: Receiver<AudioCommand>,
    clock: Arc<AtomicU64>,
    sample_rate: u32,
    channels: usize,
) -> anyhow::Result<cpal::Stream> {
    let mut mixer = Mixer::new(sample_rate, clock);
    let mut scratch: Vec<StereoFrame> = Vec::with_capacity(4096);

    let err_fn = |err| log::error!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
            drain_commands(&rx, &mut mixer);

            let n_frames = data.len() / channels.max(1);
            scratch.resize(n_frames, StereoFrame::zero());
            mixer.render_block(&mut scratch);

            // spread the stereo mix over however many channels the device has
            for (out, frame) in data.chunks_mut(channels.max(1)).zip(scratch.iter()) {
                match out.len() {
                    1 => out[0] = frame.mono(),
                    _ => {
                        out[0] = frame.left;
                        out[1] = frame.right;
                        out[2..].fill(0.0);
                    }
                }
            }
        },
        err_fn,
        None,
    )?;

    // not started until the engine resumes it
    Ok(stream)
}
