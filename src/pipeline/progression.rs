// The quick-sketch lane: chords in a row, one per bar, no phrases involved.

use crate::ids::InstanceId;
use crate::music::{Chord, ChordInstance};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Progression {
    chords: Vec<ChordInstance>,
}

impl Progression {
    pub fn chords(&self) -> &[ChordInstance] {
        &self.chords
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    /// Places a fresh instance of `chord` at the end.
    pub fn append(&mut self, chord: &Chord) -> InstanceId {
        let instance = chord.instantiate();
        let id = instance.instance_id;
        self.chords.push(instance);
        id
    }

    /// Drops every instance with this id. Returns whether anything went.
    pub fn remove(&mut self, id: InstanceId) -> bool {
        let before = self.chords.len();
        self.chords.retain(|c| c.instance_id != id);
        self.chords.len() != before
    }

    /// Moves the chord at `from` so it ends up at `to`, shifting the ones in
    /// between. Out-of-range indices leave the lane alone.
    pub fn move_chord(&mut self, from: usize, to: usize) -> bool {
        if from >= self.chords.len() || to >= self.chords.len() {
            return false;
        }
        let chord = self.chords.remove(from);
        self.chords.insert(to, chord);
        true
    }

    pub fn clear(&mut self) {
        self.chords.clear();
    }
}
