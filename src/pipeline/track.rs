// Settings that apply to the whole track: what key the palette is in, how
// fast things play and how many chords a bar holds.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::music::{Note, ScaleName};

pub const MIN_BPM: u32 = 40;
pub const MAX_BPM: u32 = 240;
pub const DEFAULT_BPM: u32 = 90;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeSignature {
    #[default]
    #[serde(rename = "4/4")]
    FourFour,
    #[serde(rename = "3/3")]
    ThreeThree,
    #[serde(rename = "2/2")]
    TwoTwo,
}

impl TimeSignature {
    pub const ALL: [TimeSignature; 3] = [
        TimeSignature::FourFour,
        TimeSignature::ThreeThree,
        TimeSignature::TwoTwo,
    ];

    /// Chord slots in one bar.
    pub fn slots(self) -> usize {
        match self {
            TimeSignature::FourFour => 4,
            TimeSignature::ThreeThree => 3,
            TimeSignature::TwoTwo => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeSignature::FourFour => "4/4",
            TimeSignature::ThreeThree => "3/3",
            TimeSignature::TwoTwo => "2/2",
        }
    }

    pub fn next(self) -> Self {
        match self {
            TimeSignature::FourFour => TimeSignature::ThreeThree,
            TimeSignature::ThreeThree => TimeSignature::TwoTwo,
            TimeSignature::TwoTwo => TimeSignature::FourFour,
        }
    }
}

pub fn clamp_bpm(bpm: i64) -> u32 {
    bpm.clamp(MIN_BPM as i64, MAX_BPM as i64) as u32
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrackSettings {
    pub name: String,
    pub key: Note,
    pub scale: ScaleName,
    bpm: u32,
    // only changed through Session, which resizes every phrase along with it
    pub(crate) time_signature: TimeSignature,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            key: Note::C,
            scale: ScaleName::Major,
            bpm: DEFAULT_BPM,
            time_signature: TimeSignature::default(),
        }
    }
}

impl TrackSettings {
    pub fn new(key: Note, scale: ScaleName, bpm: u32, time_signature: TimeSignature) -> Self {
        Self {
            key,
            scale,
            bpm: clamp_bpm(bpm as i64),
            time_signature,
            ..Self::default()
        }
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    pub fn set_bpm(&mut self, bpm: i64) {
        self.bpm = clamp_bpm(bpm);
    }

    pub fn tempo_plus(&mut self) {
        self.set_bpm(self.bpm as i64 + 1);
    }

    pub fn tempo_minus(&mut self) {
        self.set_bpm(self.bpm as i64 - 1);
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    pub fn slot_count(&self) -> usize {
        self.time_signature.slots()
    }

    pub fn rename(&mut self, name: &str) -> Result<(), ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName("track"));
        }
        self.name = name.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_per_time_signature() {
        assert_eq!(TimeSignature::FourFour.slots(), 4);
        assert_eq!(TimeSignature::ThreeThree.slots(), 3);
        assert_eq!(TimeSignature::TwoTwo.slots(), 2);
    }

    #[test]
    fn time_signature_serialises_as_label() {
        for sig in TimeSignature::ALL {
            let json = serde_json::to_string(&sig).unwrap();
            assert_eq!(json, format!("\"{}\"", sig.label()));
            assert_eq!(serde_json::from_str::<TimeSignature>(&json).unwrap(), sig);
        }
    }

    #[test]
    fn tempo_is_clamped() {
        let mut track = TrackSettings::default();
        assert_eq!(track.bpm(), 90);
        track.set_bpm(10);
        assert_eq!(track.bpm(), 40);
        track.tempo_minus();
        assert_eq!(track.bpm(), 40);
        track.set_bpm(1000);
        assert_eq!(track.bpm(), 240);
        track.tempo_plus();
        assert_eq!(track.bpm(), 240);
        track.tempo_minus();
        assert_eq!(track.bpm(), 239);

        let slow = TrackSettings::new(Note::C, ScaleName::Major, 5, TimeSignature::TwoTwo);
        assert_eq!(slow.bpm(), 40);
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut track = TrackSettings::default();
        assert_eq!(track.rename("   "), Err(ValidationError::EmptyName("track")));
        assert_eq!(track.name, "");
        track.rename("  Campfire ").unwrap();
        assert_eq!(track.name, "Campfire");
    }
}
