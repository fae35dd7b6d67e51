pub mod presets;
pub mod theory;

pub use presets::{PhraseEvent, PhrasePreset};
pub use theory::{
    all_triads, chord_to_pitch_triad, triads_for_scale, Chord, ChordInstance, ChordSource, Note,
    Quality, ScaleName,
};
