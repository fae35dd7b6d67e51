// WAV fixtures synthesised in memory so tests never touch real recordings.

use std::io::Cursor;

use crate::loader::{MemorySource, GUITAR_SAMPLES};

/// A quarter second of sine at `freq`, 16-bit mono.
pub fn wav_bytes(freq: f32, sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        let len = sample_rate / 4;
        for i in 0..len {
            let t = i as f32 / sample_rate as f32;
            let s = (t * freq * std::f32::consts::TAU).sin() * 0.5;
            writer.write_sample((s * i16::MAX as f32) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// All four guitar samples, each a sine at its own fundamental.
pub fn guitar_source() -> MemorySource {
    GUITAR_SAMPLES.iter().fold(MemorySource::new(), |source, def| {
        let freq = 440.0 * ((def.midi - 69) as f32 / 12.0).exp2();
        source.with(def.location, wav_bytes(freq, 44100))
    })
}
