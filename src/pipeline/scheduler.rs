// Turns phrases into timed notes. Everything is scheduled up front in one
// pass; the output timeline does the waiting.

use crate::audio::{GuitarEngine, PitchSink};
use crate::error::EngineError;
use crate::music::ChordInstance;

use super::arrangement::ArrangementItem;
use super::phrase::Phrase;

pub const DEFAULT_SLOT_BEATS: f64 = 4.0;

/// Fraction of a bar a progression chord rings before it's cut, so long
/// sustains don't pile up.
const PROGRESSION_CUT: f64 = 0.98;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scheduler {
    /// Beats each chord slot lasts.
    pub slot_beats: f64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self { slot_beats: DEFAULT_SLOT_BEATS }
    }
}

pub fn seconds_per_beat(bpm: f64) -> f64 {
    60.0 / bpm
}

impl Scheduler {
    pub fn new(slot_beats: f64) -> Self {
        Self { slot_beats }
    }

    pub fn slot_duration(&self, bpm: f64) -> f64 {
        self.slot_beats * seconds_per_beat(bpm)
    }

    pub fn phrase_duration(&self, phrase: &Phrase, bpm: f64, slots_per_bar: usize) -> f64 {
        (phrase.bar_count() * slots_per_bar) as f64 * self.slot_duration(bpm)
    }

    /// Length of the whole arrangement; items whose phrase is gone count as
    /// zero.
    pub fn arrangement_duration(
        &self,
        phrases: &[Phrase],
        items: &[ArrangementItem],
        bpm: f64,
        slots_per_bar: usize,
    ) -> f64 {
        items
            .iter()
            .filter_map(|item| phrases.iter().find(|p| p.id == item.phrase_id))
            .map(|p| self.phrase_duration(p, bpm, slots_per_bar))
            .sum()
    }

    /// Schedules every note of `phrase` starting `start` seconds from now and
    /// returns where the phrase ends. Empty slots are silent but still take
    /// their time.
    pub fn play_phrase(
        &self,
        sink: &dyn PitchSink,
        phrase: &Phrase,
        bpm: f64,
        slots_per_bar: usize,
        start: f64,
    ) -> f64 {
        let slot_len = self.slot_duration(bpm);

        for (b, bar) in phrase.bars().iter().enumerate() {
            for (s, cell) in bar.iter().take(slots_per_bar).enumerate() {
                let Some(instance) = cell else { continue };
                let slot_start = start + (b * slots_per_bar + s) as f64 * slot_len;
                for ev in phrase.preset.events(&instance.chord, slot_len) {
                    sink.play_midi(ev.pitch, slot_start + ev.offset);
                }
            }
        }

        start + self.phrase_duration(phrase, bpm, slots_per_bar)
    }

    /// Plays the arrangement back to back from now. Returns the total length.
    pub fn play_arrangement(
        &self,
        sink: &dyn PitchSink,
        phrases: &[Phrase],
        items: &[ArrangementItem],
        bpm: f64,
        slots_per_bar: usize,
    ) -> f64 {
        items.iter().fold(0.0, |t, item| match phrases.iter().find(|p| p.id == item.phrase_id) {
            Some(phrase) => self.play_phrase(sink, phrase, bpm, slots_per_bar, t),
            None => {
                log::warn!(
                    "arrangement item {} points at missing phrase {}, skipping",
                    item.id,
                    item.phrase_id
                );
                t
            }
        })
    }

    /// The progression lane: one chord per bar of `beats_per_bar`, each cut
    /// just before the next starts. Loads samples if needed.
    pub fn play_progression(
        &self,
        engine: &mut GuitarEngine,
        chords: &[ChordInstance],
        bpm: f64,
        beats_per_bar: f64,
    ) -> Result<f64, EngineError> {
        let bar = beats_per_bar * seconds_per_beat(bpm);
        let cut = bar * PROGRESSION_CUT;

        for (i, instance) in chords.iter().enumerate() {
            engine.play_chord(&instance.chord, i as f64 * bar, Some(cut))?;
        }
        Ok(chords.len() as f64 * bar)
    }
}
