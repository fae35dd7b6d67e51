use serde::{Deserialize, Serialize};

use super::theory::{chord_to_pitch_triad, Chord};

/// Octave every preset voices its triad in.
pub const PRESET_OCTAVE: i32 = 3;

/// Gap between strings in a strum. This is articulation, not rhythm, so it
/// stays absolute while everything else scales with the slot.
pub const STRUM_DELAY: f64 = 0.02;

/// How one chord's notes are spread across its slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhrasePreset {
    SustainPad,
    #[default]
    DownStrum,
    UpDownStrum,
    BrokenArp,
    PulseRoot,
    WideArp,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhraseEvent {
    pub pitch: i32,
    /// Seconds from the start of the slot.
    pub offset: f64,
}

impl PhraseEvent {
    fn at(pitch: i32, offset: f64) -> Self {
        Self { pitch, offset }
    }
}

impl PhrasePreset {
    pub const ALL: [PhrasePreset; 6] = [
        PhrasePreset::SustainPad,
        PhrasePreset::DownStrum,
        PhrasePreset::UpDownStrum,
        PhrasePreset::BrokenArp,
        PhrasePreset::PulseRoot,
        PhrasePreset::WideArp,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PhrasePreset::SustainPad => "Sustain Pad",
            PhrasePreset::DownStrum => "Down Strum",
            PhrasePreset::UpDownStrum => "Up–Down Strum",
            PhrasePreset::BrokenArp => "Broken Arpeggio",
            PhrasePreset::PulseRoot => "Pulse Root",
            PhrasePreset::WideArp => "Wide Arpeggio",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Notes for one slot, ordered by offset. Rebuilt on every call since
    /// chord and slot length change from slot to slot.
    pub fn events(self, chord: &Chord, slot_duration: f64) -> Vec<PhraseEvent> {
        let notes = chord_to_pitch_triad(chord, PRESET_OCTAVE);
        let [root, third, fifth] = notes;
        let d = slot_duration;

        match self {
            PhrasePreset::SustainPad => notes.iter().map(|&p| PhraseEvent::at(p, 0.0)).collect(),
            PhrasePreset::DownStrum => strum(&notes, 0.0),
            PhrasePreset::UpDownStrum => {
                let mut events = strum(&notes, 0.0);
                events.extend(strum(&[fifth, third, root], d / 2.0));
                events
            }
            PhrasePreset::BrokenArp => vec![
                PhraseEvent::at(root, 0.0),
                PhraseEvent::at(third, d * 0.25),
                PhraseEvent::at(fifth, d * 0.5),
                PhraseEvent::at(third, d * 0.75),
            ],
            PhrasePreset::PulseRoot => vec![
                PhraseEvent::at(root, 0.0),
                PhraseEvent::at(root, d / 2.0),
            ],
            PhrasePreset::WideArp => vec![
                PhraseEvent::at(root, 0.0),
                PhraseEvent::at(fifth, d * 0.33),
                PhraseEvent::at(fifth, d * 0.66),
                PhraseEvent::at(root, d * 0.9),
            ],
        }
    }
}

fn strum(pitches: &[i32], start: f64) -> Vec<PhraseEvent> {
    pitches
        .iter()
        .enumerate()
        .map(|(i, &p)| PhraseEvent::at(p, start + i as f64 * STRUM_DELAY))
        .collect()
}
