use crate::error::ValidationError;
use crate::ids::PhraseId;
use crate::music::{ChordInstance, PhrasePreset};

pub type Slot = Option<ChordInstance>;
pub type Bar = Vec<Slot>;

/// A named run of bars, e.g. "Verse". Every mutator takes the track's
/// current slot count so every bar keeps exactly that many slots; callers go
/// through [`Session`](super::Session), which always passes the right one.
#[derive(Clone, Debug, PartialEq)]
pub struct Phrase {
    pub id: PhraseId,
    pub name: String,
    pub preset: PhrasePreset,
    bars: Vec<Bar>,
}

fn empty_bar(slot_count: usize) -> Bar {
    vec![None; slot_count]
}

impl Phrase {
    /// A phrase with a single empty bar.
    pub fn new(name: impl Into<String>, slot_count: usize) -> Self {
        Self {
            id: PhraseId::next(),
            name: name.into(),
            preset: PhrasePreset::default(),
            bars: vec![empty_bar(slot_count)],
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    pub fn slot(&self, bar: usize, slot: usize) -> Option<&ChordInstance> {
        self.bars.get(bar)?.get(slot)?.as_ref()
    }

    pub fn chords(&self) -> impl Iterator<Item = &ChordInstance> {
        self.bars.iter().flatten().flatten()
    }

    pub(crate) fn add_bar(&mut self, slot_count: usize) {
        self.bars.push(empty_bar(slot_count));
    }

    /// Removes a bar unless it is the only one left.
    pub(crate) fn delete_bar(&mut self, bar: usize) -> Result<(), ValidationError> {
        if bar >= self.bars.len() {
            return Err(ValidationError::BarOutOfRange(bar));
        }
        if self.bars.len() > 1 {
            self.bars.remove(bar);
        }
        Ok(())
    }

    /// Places a chord and returns where it went. With an explicit position
    /// that slot is overwritten; otherwise the first empty slot in bar order
    /// is used, and if there is none a new bar is started.
    pub(crate) fn place(
        &mut self,
        chord: ChordInstance,
        at: Option<(usize, usize)>,
        slot_count: usize,
    ) -> Result<(usize, usize), ValidationError> {
        if let Some((bar, slot)) = at {
            let cell = self
                .bars
                .get_mut(bar)
                .and_then(|b| b.get_mut(slot))
                .ok_or(ValidationError::SlotOutOfRange { bar, slot })?;
            *cell = Some(chord);
            return Ok((bar, slot));
        }

        for (b, bar) in self.bars.iter_mut().enumerate() {
            if let Some(s) = bar.iter().position(Option::is_none) {
                bar[s] = Some(chord);
                return Ok((b, s));
            }
        }

        let mut bar = empty_bar(slot_count);
        bar[0] = Some(chord);
        self.bars.push(bar);
        Ok((self.bars.len() - 1, 0))
    }

    /// Empties a slot and slides the rest of that bar left to close the gap.
    pub(crate) fn delete_chord(
        &mut self,
        bar: usize,
        slot: usize,
    ) -> Result<Option<ChordInstance>, ValidationError> {
        let cells = self
            .bars
            .get_mut(bar)
            .filter(|b| slot < b.len())
            .ok_or(ValidationError::SlotOutOfRange { bar, slot })?;

        let removed = cells[slot].take();
        let len = cells.len();
        cells.retain(Option::is_some);
        cells.resize(len, None);
        Ok(removed)
    }

    /// Truncates or pads every bar to `slot_count`, left to right.
    pub(crate) fn resize(&mut self, slot_count: usize) {
        for bar in &mut self.bars {
            bar.resize(slot_count, None);
        }
    }

    #[cfg(test)]
    pub(crate) fn from_bars(name: &str, preset: PhrasePreset, bars: Vec<Bar>) -> Self {
        Self {
            id: PhraseId::next(),
            name: name.to_string(),
            preset,
            bars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::{triads_for_scale, Note, ScaleName};

    fn chord(degree: usize) -> ChordInstance {
        triads_for_scale(Note::C, ScaleName::Major)[degree].instantiate()
    }

    fn labels(phrase: &Phrase) -> Vec<Vec<&str>> {
        phrase
            .bars()
            .iter()
            .map(|bar| {
                bar.iter()
                    .map(|s| s.as_ref().map_or("-", |c| c.chord.label.as_str()))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn new_phrase_has_one_empty_bar() {
        let phrase = Phrase::new("Verse", 3);
        assert_eq!(labels(&phrase), vec![vec!["-", "-", "-"]]);
        assert_eq!(phrase.preset, PhrasePreset::DownStrum);
    }

    #[test]
    fn place_fills_then_grows() {
        let mut phrase = Phrase::new("Verse", 2);
        assert_eq!(phrase.place(chord(0), None, 2).unwrap(), (0, 0));
        assert_eq!(phrase.place(chord(5), None, 2).unwrap(), (0, 1));
        assert_eq!(phrase.place(chord(3), None, 2).unwrap(), (1, 0));
        assert_eq!(labels(&phrase), vec![vec!["C", "Am"], vec!["F", "-"]]);
    }

    #[test]
    fn place_at_overwrites_or_rejects() {
        let mut phrase = Phrase::new("Verse", 4);
        phrase.place(chord(0), Some((0, 2)), 4).unwrap();
        phrase.place(chord(4), Some((0, 2)), 4).unwrap();
        assert_eq!(labels(&phrase), vec![vec!["-", "-", "G", "-"]]);

        assert_eq!(
            phrase.place(chord(1), Some((0, 4)), 4),
            Err(ValidationError::SlotOutOfRange { bar: 0, slot: 4 })
        );
        assert_eq!(
            phrase.place(chord(1), Some((3, 0)), 4),
            Err(ValidationError::SlotOutOfRange { bar: 3, slot: 0 })
        );

        // first gap is still found before the explicit chord
        assert_eq!(phrase.place(chord(1), None, 4).unwrap(), (0, 0));
    }

    #[test]
    fn delete_chord_compacts_the_bar() {
        let mut phrase = Phrase::new("Verse", 4);
        for d in [0, 5, 3, 4] {
            phrase.place(chord(d), None, 4).unwrap();
        }
        let removed = phrase.delete_chord(0, 1).unwrap();
        assert_eq!(removed.unwrap().chord.label, "Am");
        assert_eq!(labels(&phrase), vec![vec!["C", "F", "G", "-"]]);

        assert_eq!(phrase.delete_chord(0, 3).unwrap(), None);
        assert!(phrase.delete_chord(0, 4).is_err());
    }

    #[test]
    fn last_bar_is_never_deleted() {
        let mut phrase = Phrase::new("Verse", 4);
        phrase.add_bar(4);
        phrase.delete_bar(0).unwrap();
        assert_eq!(phrase.bar_count(), 1);
        phrase.delete_bar(0).unwrap();
        assert_eq!(phrase.bar_count(), 1);
        assert_eq!(phrase.delete_bar(1), Err(ValidationError::BarOutOfRange(1)));
    }

    #[test]
    fn resize_truncates_and_pads() {
        let mut phrase = Phrase::new("Verse", 4);
        for d in [0, 5, 3, 4] {
            phrase.place(chord(d), None, 4).unwrap();
        }
        phrase.resize(2);
        assert_eq!(labels(&phrase), vec![vec!["C", "Am"]]);
        phrase.resize(3);
        assert_eq!(labels(&phrase), vec![vec!["C", "Am", "-"]]);
    }
}
