//! Key/scale → chord derivation and triad voicing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::InstanceId;

pub const PITCH_CLASSES: usize = 12;

/// One of the 12 pitch classes, sharps only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Note {
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C#")]
    Cs,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D#")]
    Ds,
    #[serde(rename = "E")]
    E,
    #[serde(rename = "F")]
    F,
    #[serde(rename = "F#")]
    Fs,
    #[serde(rename = "G")]
    G,
    #[serde(rename = "G#")]
    Gs,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A#")]
    As,
    #[serde(rename = "B")]
    B,
}

impl Note {
    pub const ALL: [Note; PITCH_CLASSES] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    pub fn pitch_class(self) -> u8 {
        self as u8
    }

    /// Wraps any integer into 0..12, negatives included.
    pub fn from_pitch_class(pc: i32) -> Note {
        Note::ALL[pc.rem_euclid(PITCH_CLASSES as i32) as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            Note::C => "C",
            Note::Cs => "C#",
            Note::D => "D",
            Note::Ds => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::Fs => "F#",
            Note::G => "G",
            Note::Gs => "G#",
            Note::A => "A",
            Note::As => "A#",
            Note::B => "B",
        }
    }

    // transposes by semitones, used for key up/down in the ui
    pub fn shifted(self, semitones: i32) -> Note {
        Note::from_pitch_class(self.pitch_class() as i32 + semitones)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    Major,
    Minor,
    Diminished,
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::Major, Quality::Minor, Quality::Diminished];

    pub fn suffix(self) -> &'static str {
        match self {
            Quality::Major => "",
            Quality::Minor => "m",
            Quality::Diminished => "°",
        }
    }

    // short tag used inside chord template ids
    fn tag(self) -> &'static str {
        match self {
            Quality::Major => "maj",
            Quality::Minor => "min",
            Quality::Diminished => "dim",
        }
    }

    fn third(self) -> i32 {
        match self {
            Quality::Major => 4,
            Quality::Minor | Quality::Diminished => 3,
        }
    }

    fn fifth(self) -> i32 {
        match self {
            Quality::Major | Quality::Minor => 7,
            Quality::Diminished => 6,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScaleName {
    Major,
    #[serde(rename = "Natural Minor")]
    NaturalMinor,
}

impl ScaleName {
    pub const ALL: [ScaleName; 2] = [ScaleName::Major, ScaleName::NaturalMinor];

    pub fn offsets(self) -> [u8; 7] {
        match self {
            ScaleName::Major => [0, 2, 4, 5, 7, 9, 11],
            ScaleName::NaturalMinor => [0, 2, 3, 5, 7, 8, 10],
        }
    }

    /// Triad quality on each scale degree.
    pub fn qualities(self) -> [Quality; 7] {
        use Quality::*;
        match self {
            ScaleName::Major => [Major, Minor, Minor, Major, Major, Minor, Diminished],
            ScaleName::NaturalMinor => [Minor, Diminished, Major, Minor, Minor, Major, Major],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScaleName::Major => "Major",
            ScaleName::NaturalMinor => "Natural Minor",
        }
    }

    pub fn toggled(self) -> ScaleName {
        match self {
            ScaleName::Major => ScaleName::NaturalMinor,
            ScaleName::NaturalMinor => ScaleName::Major,
        }
    }
}

/// Where a chord template came from: the diatonic palette or the full
/// chromatic set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChordSource {
    Scale,
    All,
}

/// A chord template. Stateless; placing it somewhere goes through
/// [`Chord::instantiate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chord {
    pub id: String,
    pub root: Note,
    pub quality: Quality,
    pub label: String,
    pub source: ChordSource,
}

impl Chord {
    pub fn new(root: Note, quality: Quality, source: ChordSource, id: String) -> Self {
        Self {
            id,
            root,
            quality,
            label: format!("{}{}", root.name(), quality.suffix()),
            source,
        }
    }

    pub fn instantiate(&self) -> ChordInstance {
        ChordInstance {
            instance_id: InstanceId::next(),
            chord: self.clone(),
        }
    }
}

/// A chord placed into a phrase slot or the progression lane. The same
/// template can be placed any number of times; each placement gets its own id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChordInstance {
    pub instance_id: InstanceId,
    pub chord: Chord,
}

pub fn triads_for_scale(root: Note, scale: ScaleName) -> [Chord; 7] {
    let offsets = scale.offsets();
    let qualities = scale.qualities();
    std::array::from_fn(|degree| {
        let note = root.shifted(offsets[degree] as i32);
        let quality = qualities[degree];
        let id = format!("scale-{}-{}-{}", note.name(), quality.tag(), degree);
        Chord::new(note, quality, ChordSource::Scale, id)
    })
}

/// Every root × every quality: C, Cm, C°, C#, C#m, ...
pub fn all_triads() -> Vec<Chord> {
    Note::ALL
        .iter()
        .flat_map(|&root| {
            Quality::ALL.iter().map(move |&quality| {
                let id = format!("all-{}-{}", root.name(), quality.tag());
                Chord::new(root, quality, ChordSource::All, id)
            })
        })
        .collect()
}

/// Root, third and fifth as absolute pitch numbers, with C3 = 48.
pub fn chord_to_pitch_triad(chord: &Chord, octave: i32) -> [i32; 3] {
    let root = 12 * (octave + 1) + chord.root.pitch_class() as i32;
    [root, root + chord.quality.third(), root + chord.quality.fifth()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(chords: &[Chord]) -> Vec<&str> {
        chords.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn c_major_diatonic_chords() {
        let chords = triads_for_scale(Note::C, ScaleName::Major);
        assert_eq!(labels(&chords), vec!["C", "Dm", "Em", "F", "G", "Am", "B°"]);
        assert!(chords.iter().all(|c| c.source == ChordSource::Scale));
        assert_eq!(chords[0].id, "scale-C-maj-0");
        assert_eq!(chords[6].id, "scale-B-dim-6");
    }

    #[test]
    fn a_natural_minor_diatonic_chords() {
        let chords = triads_for_scale(Note::A, ScaleName::NaturalMinor);
        assert_eq!(labels(&chords), vec!["Am", "B°", "C", "Dm", "Em", "F", "G"]);
    }

    #[test]
    fn diatonic_chords_for_every_key() {
        for &root in Note::ALL.iter() {
            for &scale in ScaleName::ALL.iter() {
                let chords = triads_for_scale(root, scale);
                assert_eq!(chords.len(), 7);

                // pitch classes climb through one octave, wrapping at most once
                let pcs: Vec<i32> = chords.iter().map(|c| c.root.pitch_class() as i32).collect();
                let mut unwrapped = Vec::new();
                let mut octave = 0;
                for (i, &pc) in pcs.iter().enumerate() {
                    if i > 0 && pc < pcs[i - 1] {
                        octave += 12;
                    }
                    unwrapped.push(pc + octave);
                }
                assert!(unwrapped.windows(2).all(|w| w[0] < w[1]), "{root} {scale:?}: {pcs:?}");
                assert!(unwrapped[6] - unwrapped[0] < 12);

                let qualities: Vec<Quality> = chords.iter().map(|c| c.quality).collect();
                assert_eq!(qualities, scale.qualities().to_vec());
            }
        }
    }

    #[test]
    fn all_triads_order_and_count() {
        let chords = all_triads();
        assert_eq!(chords.len(), 36);
        assert_eq!(labels(&chords[..6]), vec!["C", "Cm", "C°", "C#", "C#m", "C#°"]);
        assert_eq!(chords[35].label, "B°");

        let mut ids: Vec<&str> = chords.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 36);

        for (i, chord) in chords.iter().enumerate() {
            assert_eq!(chord.root, Note::ALL[i / 3]);
            assert_eq!(chord.quality, Quality::ALL[i % 3]);
            assert_eq!(chord.source, ChordSource::All);
        }
    }

    #[test]
    fn pitch_triads() {
        let c = Chord::new(Note::C, Quality::Major, ChordSource::All, "c".into());
        assert_eq!(chord_to_pitch_triad(&c, 3), [48, 52, 55]);

        let am = Chord::new(Note::A, Quality::Minor, ChordSource::All, "am".into());
        assert_eq!(chord_to_pitch_triad(&am, 3), [57, 60, 64]);

        for &root in Note::ALL.iter() {
            let dim = Chord::new(root, Quality::Diminished, ChordSource::All, "d".into());
            let [r, t, f] = chord_to_pitch_triad(&dim, 4);
            assert_eq!(t - r, 3);
            assert_eq!(f - r, 6);
        }
    }

    #[test]
    fn pitch_class_wraps() {
        assert_eq!(Note::from_pitch_class(12), Note::C);
        assert_eq!(Note::from_pitch_class(-1), Note::B);
        assert_eq!(Note::B.shifted(2), Note::Cs);
    }

    #[test]
    fn instances_get_distinct_ids() {
        let chord = all_triads().remove(0);
        let a = chord.instantiate();
        let b = chord.instantiate();
        assert_ne!(a.instance_id, b.instance_id);
        assert_eq!(a.chord, b.chord);
    }
}
