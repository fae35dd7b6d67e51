// Per-project settings, read at startup. Lives next to the log in
// <project_dir>/.chordpad/ so a project folder carries its own setup.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::audio::EngineSettings;
use crate::music::{Note, ScaleName};
use crate::pipeline::track::{TimeSignature, TrackSettings, DEFAULT_BPM};
use crate::pipeline::scheduler::{Scheduler, DEFAULT_SLOT_BEATS};

pub const CHORDPAD_DIR: &str = ".chordpad";
const CONFIG_FILE: &str = "config.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Folder holding E2.wav .. E5.wav. Relative paths are taken from the
    /// project directory.
    pub samples_dir: PathBuf,
    pub lookahead_secs: f64,
    pub reference_octave: i32,
    pub slot_beats: f64,
    pub voice_gain: f32,
    pub default_bpm: u32,
    pub default_key: Note,
    pub default_scale: ScaleName,
    pub default_time_signature: TimeSignature,
}

impl Default for Config {
    fn default() -> Self {
        let engine = EngineSettings::default();
        Self {
            samples_dir: PathBuf::from("samples"),
            lookahead_secs: engine.lookahead,
            reference_octave: engine.reference_octave,
            slot_beats: DEFAULT_SLOT_BEATS,
            voice_gain: engine.voice_gain,
            default_bpm: DEFAULT_BPM,
            default_key: Note::C,
            default_scale: ScaleName::Major,
            default_time_signature: TimeSignature::FourFour,
        }
    }
}

impl Config {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            lookahead: self.lookahead_secs,
            reference_octave: self.reference_octave,
            voice_gain: self.voice_gain,
        }
    }

    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(self.slot_beats)
    }

    pub fn track_settings(&self) -> TrackSettings {
        TrackSettings::new(
            self.default_key,
            self.default_scale,
            self.default_bpm,
            self.default_time_signature,
        )
    }

    pub fn samples_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.samples_dir)
    }
}

// <project_dir>/.chordpad/config.json
fn config_file_path(project_dir: &Path) -> PathBuf {
    project_dir.join(CHORDPAD_DIR).join(CONFIG_FILE)
}

/// Missing file means defaults. A file that's there but broken is an error,
/// so a typo doesn't silently reset someone's setup.
pub fn load_config(project_dir: &Path) -> anyhow::Result<Config> {
    let path = config_file_path(project_dir);
    let data = match std::fs::read_to_string(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };
    serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
}

// Write the config, making .chordpad/ if it doesn't exist already
pub fn save_config(project_dir: &Path, config: &Config) -> anyhow::Result<()> {
    let path = config_file_path(project_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
