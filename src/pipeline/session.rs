//! Everything the user is editing, in one place.
//!
//! `Session` owns the track settings, the phrases, the arrangement and the
//! progression lane. All edits go through it so a time signature change can
//! never leave a bar with the wrong number of slots.

use crate::error::ValidationError;
use crate::ids::{InstanceId, ItemId, PhraseId};
use crate::music::{triads_for_scale, Chord, Note, PhrasePreset, ScaleName};

use super::arrangement::{Arrangement, Direction};
use super::phrase::Phrase;
use super::progression::Progression;
use super::track::{TimeSignature, TrackSettings};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotRef {
    pub phrase_id: PhraseId,
    pub bar: usize,
    pub slot: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    track: TrackSettings,
    phrases: Vec<Phrase>,
    selected_phrase: Option<PhraseId>,
    selected_slot: Option<SlotRef>,
    arrangement: Arrangement,
    progression: Progression,
}

fn valid_name<'a>(kind: &'static str, name: &'a str) -> Result<&'a str, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName(kind));
    }
    Ok(name)
}

impl Session {
    pub fn new(track: TrackSettings) -> Self {
        Self { track, ..Self::default() }
    }

    // -- track --

    pub fn track(&self) -> &TrackSettings {
        &self.track
    }

    pub fn slot_count(&self) -> usize {
        self.track.slot_count()
    }

    pub fn rename_track(&mut self, name: &str) -> Result<(), ValidationError> {
        self.track.rename(name)
    }

    pub fn set_key(&mut self, key: Note) {
        self.track.key = key;
    }

    pub fn set_scale(&mut self, scale: ScaleName) {
        self.track.scale = scale;
    }

    pub fn set_bpm(&mut self, bpm: i64) {
        self.track.set_bpm(bpm);
    }

    pub fn tempo_plus(&mut self) {
        self.track.tempo_plus();
    }

    pub fn tempo_minus(&mut self) {
        self.track.tempo_minus();
    }

    /// Switches the time signature and resizes every bar of every phrase.
    /// A slot selection that no longer exists is dropped.
    pub fn set_time_signature(&mut self, sig: TimeSignature) {
        self.track.time_signature = sig;
        let slots = sig.slots();
        for phrase in &mut self.phrases {
            phrase.resize(slots);
        }
        if self.selected_slot.is_some_and(|s| s.slot >= slots) {
            self.selected_slot = None;
        }
        log::debug!("time signature now {} ({slots} slots per bar)", sig.label());
    }

    /// The seven diatonic chords of the current key and scale.
    pub fn palette(&self) -> [Chord; 7] {
        triads_for_scale(self.track.key, self.track.scale)
    }

    // -- phrases --

    /// Newest first.
    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    pub fn phrase(&self, id: PhraseId) -> Option<&Phrase> {
        self.phrases.iter().find(|p| p.id == id)
    }

    fn phrase_mut(&mut self, id: PhraseId) -> Result<&mut Phrase, ValidationError> {
        self.phrases
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ValidationError::UnknownPhrase(id))
    }

    pub fn selected_phrase(&self) -> Option<&Phrase> {
        self.selected_phrase.and_then(|id| self.phrase(id))
    }

    pub fn select_phrase(&mut self, id: PhraseId) -> Result<(), ValidationError> {
        if self.phrase(id).is_none() {
            return Err(ValidationError::UnknownPhrase(id));
        }
        self.selected_phrase = Some(id);
        if self.selected_slot.is_some_and(|s| s.phrase_id != id) {
            self.selected_slot = None;
        }
        Ok(())
    }

    /// Adds a phrase with one empty bar at the top of the list and selects it.
    pub fn create_phrase(&mut self, name: &str) -> Result<PhraseId, ValidationError> {
        let name = valid_name("phrase", name)?;
        let phrase = Phrase::new(name, self.slot_count());
        let id = phrase.id;
        self.phrases.insert(0, phrase);
        self.selected_phrase = Some(id);
        self.selected_slot = None;
        log::debug!("created phrase {id} ({name})");
        Ok(id)
    }

    pub fn rename_phrase(&mut self, id: PhraseId, name: &str) -> Result<(), ValidationError> {
        let name = valid_name("phrase", name)?;
        self.phrase_mut(id)?.name = name.to_string();
        Ok(())
    }

    pub fn set_preset(
        &mut self,
        id: PhraseId,
        preset: PhrasePreset,
    ) -> Result<(), ValidationError> {
        self.phrase_mut(id)?.preset = preset;
        Ok(())
    }

    pub fn add_bar(&mut self, id: PhraseId) -> Result<(), ValidationError> {
        let slots = self.slot_count();
        self.phrase_mut(id)?.add_bar(slots);
        Ok(())
    }

    pub fn delete_bar(&mut self, id: PhraseId, bar: usize) -> Result<(), ValidationError> {
        let phrase = self.phrase_mut(id)?;
        let before = phrase.bar_count();
        phrase.delete_bar(bar)?;
        let removed = phrase.bar_count() < before;

        if removed && self.selected_slot.is_some_and(|s| s.phrase_id == id && s.bar >= bar) {
            self.selected_slot = None;
        }
        Ok(())
    }

    /// Places a new instance of `chord`. See [`Phrase`] for where it lands
    /// when `at` is `None`.
    pub fn add_chord(
        &mut self,
        id: PhraseId,
        chord: &Chord,
        at: Option<(usize, usize)>,
    ) -> Result<(usize, usize), ValidationError> {
        let slots = self.slot_count();
        self.phrase_mut(id)?.place(chord.instantiate(), at, slots)
    }

    /// Adds to the selected phrase: into the selected slot if there is one,
    /// else wherever the next free slot is.
    pub fn add_chord_to_selection(&mut self, chord: &Chord) -> Result<SlotRef, ValidationError> {
        let phrase_id = self.selected_phrase.ok_or(ValidationError::NoPhraseSelected)?;
        let at = self
            .selected_slot
            .filter(|s| s.phrase_id == phrase_id)
            .map(|s| (s.bar, s.slot));
        let (bar, slot) = self.add_chord(phrase_id, chord, at)?;
        Ok(SlotRef { phrase_id, bar, slot })
    }

    pub fn delete_chord(
        &mut self,
        id: PhraseId,
        bar: usize,
        slot: usize,
    ) -> Result<(), ValidationError> {
        self.phrase_mut(id)?.delete_chord(bar, slot)?;
        Ok(())
    }

    pub fn selected_slot(&self) -> Option<SlotRef> {
        self.selected_slot
    }

    pub fn select_slot(&mut self, at: SlotRef) -> Result<(), ValidationError> {
        let phrase = self.phrase(at.phrase_id).ok_or(ValidationError::UnknownPhrase(at.phrase_id))?;
        if at.bar >= phrase.bar_count() || at.slot >= self.slot_count() {
            return Err(ValidationError::SlotOutOfRange { bar: at.bar, slot: at.slot });
        }
        self.selected_phrase = Some(at.phrase_id);
        self.selected_slot = Some(at);
        Ok(())
    }

    pub fn clear_slot_selection(&mut self) {
        self.selected_slot = None;
    }

    // -- arrangement --

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    pub fn append_to_arrangement(
        &mut self,
        phrase_id: PhraseId,
    ) -> Result<ItemId, ValidationError> {
        if self.phrase(phrase_id).is_none() {
            return Err(ValidationError::UnknownPhrase(phrase_id));
        }
        Ok(self.arrangement.append(phrase_id))
    }

    pub fn remove_from_arrangement(&mut self, item: ItemId) -> Result<(), ValidationError> {
        self.arrangement.remove(item)?;
        Ok(())
    }

    pub fn move_arrangement_item(&mut self, index: usize, dir: Direction) -> bool {
        self.arrangement.move_item(index, dir)
    }

    pub fn clear_arrangement(&mut self) {
        self.arrangement.clear();
    }

    // -- progression lane --

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn add_to_progression(&mut self, chord: &Chord) -> InstanceId {
        self.progression.append(chord)
    }

    pub fn remove_from_progression(&mut self, id: InstanceId) -> bool {
        self.progression.remove(id)
    }

    pub fn move_in_progression(&mut self, from: usize, to: usize) -> bool {
        self.progression.move_chord(from, to)
    }

    pub fn clear_progression(&mut self) {
        self.progression.clear();
    }
}
