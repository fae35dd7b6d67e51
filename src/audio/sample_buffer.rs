use std::io::Cursor;

use super::frame::StereoFrame;

#[derive(Clone, Debug)]
pub struct SampleBuffer {
    pub data: Vec<StereoFrame>, // already at the output rate
    pub sample_rate: u32,
}

impl SampleBuffer {
    // Decode WAV bytes and bring them to the output context's rate
    pub fn decode_wav(bytes: &[u8], target_rate: u32) -> Result<Self, hound::Error> {
        let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader // float, just pass it through
                .samples::<f32>()
                .collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => { // int, scale into -1..1
                let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|x| x as f32 / max))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        let frames: Vec<StereoFrame> = if channels == 1 {
            samples
                .into_iter()
                .map(|x| StereoFrame { left: x, right: x }) // mono, duplicate
                .collect()
        } else {
            // anything wider than stereo keeps its first two channels
            samples
                .chunks_exact(channels)
                .map(|c| StereoFrame { left: c[0], right: c[1] })
                .collect()
        };

        let data = if spec.sample_rate != target_rate {
            resample_linear(&frames, spec.sample_rate, target_rate)
        } else {
            frames
        };

        Ok(Self { data, sample_rate: target_rate })
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.data.len() as f64 / self.sample_rate as f64
    }
}

fn resample_linear(frames: &[StereoFrame], source_rate: u32, target_rate: u32) -> Vec<StereoFrame> {
    if source_rate == target_rate || source_rate == 0 {
        return frames.to_vec();
    }
    let ratio = target_rate as f64 / source_rate as f64;
    let out_len = (frames.len() as f64 * ratio).ceil() as usize;
    let mut out = Vec::with_capacity(out_len);

    for i in 0..out_len {
        // fractional position in the source buffer
        let src_pos = i as f64 / ratio; // ex. 3.7
        let idx = src_pos.floor() as usize; // ex. 3
        let frac = (src_pos - idx as f64) as f32; // ex. 0.7
        if idx >= frames.len().saturating_sub(1) { // edge case
            out.push(*frames.last().unwrap_or(&StereoFrame::zero()));
        } else {
            let a = frames[idx];
            let b = frames[idx + 1];
            out.push(StereoFrame {
                left: a.left * (1.0 - frac) + b.left * frac,
                right: a.right * (1.0 - frac) + b.right * frac,
            });
        }
    }
    out
}
