use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::audio::SampleBuffer;
use crate::error::EngineError;

use super::registry::SampleDef;

/// Where sample bytes come from. The engine only ever asks for a location
/// string out of the registry.
pub trait SampleSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, EngineError>;
}

// Reads samples out of a directory on disk
#[derive(Clone, Debug)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SampleSource for DirSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, EngineError> {
        let path = self.root.join(location);
        std::fs::read(&path).map_err(|e| EngineError::Fetch {
            location: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

// Samples held in memory, keyed by location. Handy for bundled assets and tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(location.into(), bytes);
    }

    pub fn with(mut self, location: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(location, bytes);
        self
    }
}

impl SampleSource for MemorySource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, EngineError> {
        self.files.get(location).cloned().ok_or_else(|| EngineError::Fetch {
            location: location.to_string(),
            reason: "not found".to_string(),
        })
    }
}

// Fetch + decode one registry entry at the output context's rate
pub fn load(
    source: &dyn SampleSource,
    def: &SampleDef,
    target_rate: u32,
) -> Result<SampleBuffer, EngineError> {
    let bytes = source.fetch(def.location)?;
    SampleBuffer::decode_wav(&bytes, target_rate).map_err(|source| EngineError::Decode {
        location: def.location.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::registry::GUITAR_SAMPLES;

    #[test]
    fn missing_file_is_a_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirSource::new(dir.path());
        match load(&source, &GUITAR_SAMPLES[0], 44100) {
            Err(EngineError::Fetch { location, .. }) => assert!(location.ends_with("E2.wav")),
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[test]
    fn bad_bytes_are_a_decode_error() {
        let source = MemorySource::new().with("E2.wav", vec![1, 2, 3, 4]);
        assert!(matches!(
            load(&source, &GUITAR_SAMPLES[0], 44100),
            Err(EngineError::Decode { .. })
        ));
    }

    #[test]
    fn reads_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(dir.path().join("E2.wav"), spec).unwrap();
        for _ in 0..10 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        let buf = load(&DirSource::new(dir.path()), &GUITAR_SAMPLES[0], 44100).unwrap();
        assert_eq!(buf.data.len(), 10);
    }
}
