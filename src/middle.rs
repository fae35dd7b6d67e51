// The layer between the terminal and the core. It owns the session and the
// audio engine, decides what each InputEvent means right now, and flattens
// everything into a DisplayState for the TUI to draw.

use std::fmt::Display;

use crate::audio::GuitarEngine;
use crate::music::{all_triads, Chord};
use crate::pipeline::{Direction, Scheduler, Session, SlotRef};
use crate::shared::{DisplayState, InputEvent, PaletteMode, PhraseView, SelectionMove};

// the progression lane always plays one chord per 4-beat bar
const PROGRESSION_BAR_BEATS: f64 = 4.0;

#[derive(Clone, Copy, Debug)]
struct Playing {
    what: &'static str,
    remaining: f64,
}

pub struct Middle {
    pub session: Session,
    engine: GuitarEngine,
    scheduler: Scheduler,
    palette_mode: PaletteMode,
    palette_cursor: usize,
    arrangement_cursor: usize,
    playing: Option<Playing>,
    status: String,
    phrases_created: usize,
}

impl Middle {
    pub fn new(session: Session, engine: GuitarEngine, scheduler: Scheduler) -> Self {
        Self {
            session,
            engine,
            scheduler,
            palette_mode: PaletteMode::default(),
            palette_cursor: 0,
            arrangement_cursor: 0,
            playing: None,
            status: String::new(),
            phrases_created: 0,
        }
    }

    pub fn engine(&self) -> &GuitarEngine {
        &self.engine
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::AddScaleChord(degree) => {
                if let Some(chord) = self.session.palette().get(degree as usize).cloned() {
                    self.add_to_phrase(&chord);
                }
            }
            InputEvent::TogglePalette => {
                self.palette_mode = match self.palette_mode {
                    PaletteMode::Scale => PaletteMode::All,
                    PaletteMode::All => PaletteMode::Scale,
                };
                self.palette_cursor = 0;
            }
            InputEvent::PaletteCursor(delta) => {
                let len = self.palette_chords().len() as i64;
                self.palette_cursor =
                    (self.palette_cursor as i64 + delta as i64).rem_euclid(len) as usize;
            }
            InputEvent::AddPaletteChord => {
                if let Some(chord) = self.cursor_chord() {
                    self.add_to_phrase(&chord);
                }
            }
            InputEvent::AddPaletteChordToProgression => {
                if let Some(chord) = self.cursor_chord() {
                    self.session.add_to_progression(&chord);
                    self.audition(&chord);
                }
            }

            InputEvent::MoveSelection(dir) => self.move_selection(dir),
            InputEvent::ClearSelection => self.session.clear_slot_selection(),
            InputEvent::DeleteChord => {
                if let Some(at) = self.session.selected_slot() {
                    if let Err(e) = self.session.delete_chord(at.phrase_id, at.bar, at.slot) {
                        self.report(e);
                    }
                }
            }

            InputEvent::KeyUp => self.session.set_key(self.session.track().key.shifted(1)),
            InputEvent::KeyDown => self.session.set_key(self.session.track().key.shifted(-1)),
            InputEvent::ToggleScale => self.session.set_scale(self.session.track().scale.toggled()),
            InputEvent::TempoUp => self.session.tempo_plus(),
            InputEvent::TempoDown => self.session.tempo_minus(),
            InputEvent::CycleTimeSignature => {
                let next = self.session.track().time_signature().next();
                self.session.set_time_signature(next);
            }

            InputEvent::NewPhrase => {
                self.phrases_created += 1;
                let name = format!("Phrase {}", self.phrases_created);
                if let Err(e) = self.session.create_phrase(&name) {
                    self.report(e);
                }
            }
            InputEvent::NextPhrase => self.next_phrase(),
            InputEvent::AddBar => {
                if let Some(id) = self.selected_phrase_id() {
                    if let Err(e) = self.session.add_bar(id) {
                        self.report(e);
                    }
                }
            }
            InputEvent::DeleteBar => {
                // the selected bar, or the last one
                if let Some(phrase) = self.session.selected_phrase() {
                    let id = phrase.id;
                    let bar = match self.session.selected_slot() {
                        Some(at) if at.phrase_id == id => at.bar,
                        _ => phrase.bar_count() - 1,
                    };
                    if let Err(e) = self.session.delete_bar(id, bar) {
                        self.report(e);
                    }
                }
            }
            InputEvent::CyclePreset => {
                if let Some(phrase) = self.session.selected_phrase() {
                    let (id, next) = (phrase.id, phrase.preset.next());
                    if let Err(e) = self.session.set_preset(id, next) {
                        self.report(e);
                    }
                }
            }

            InputEvent::AppendToArrangement => {
                if let Some(id) = self.selected_phrase_id() {
                    match self.session.append_to_arrangement(id) {
                        Ok(_) => self.arrangement_cursor = self.session.arrangement().len() - 1,
                        Err(e) => self.report(e),
                    }
                }
            }
            InputEvent::ArrangementCursor(delta) => {
                let len = self.session.arrangement().len();
                if len > 0 {
                    let moved = self.arrangement_cursor as i64 + delta as i64;
                    self.arrangement_cursor = moved.clamp(0, len as i64 - 1) as usize;
                }
            }
            InputEvent::MoveArrangementItem(dir) => {
                if self.session.move_arrangement_item(self.arrangement_cursor, dir) {
                    // follow the item
                    self.arrangement_cursor = match dir {
                        Direction::Earlier => self.arrangement_cursor - 1,
                        Direction::Later => self.arrangement_cursor + 1,
                    };
                }
            }
            InputEvent::RemoveArrangementItem => {
                let items = self.session.arrangement().items();
                let item = items.get(self.arrangement_cursor).map(|i| i.id);
                if let Some(item) = item {
                    if let Err(e) = self.session.remove_from_arrangement(item) {
                        self.report(e);
                    }
                    let last = self.session.arrangement().len().saturating_sub(1);
                    self.arrangement_cursor = self.arrangement_cursor.min(last);
                }
            }
            InputEvent::ClearArrangement => {
                self.session.clear_arrangement();
                self.arrangement_cursor = 0;
            }

            InputEvent::PlayProgression => self.play_progression(),
            InputEvent::ClearProgression => self.session.clear_progression(),

            InputEvent::LoadSamples => match self.engine.load() {
                Ok(()) => self.status = "guitar loaded".to_string(),
                Err(e) => self.report(e),
            },
            InputEvent::PlayPhrase => self.play_phrase(),
            InputEvent::PlayArrangement => self.play_arrangement(),
            InputEvent::Stop => {
                self.engine.stop();
                self.playing = None;
            }

            InputEvent::Quit => {}
        }
    }

    /// Counts down the playing indicator.
    pub fn tick(&mut self, elapsed: f64) {
        if let Some(p) = &mut self.playing {
            p.remaining -= elapsed;
            if p.remaining <= 0.0 {
                self.playing = None;
            }
        }
    }

    pub fn display_state(&self) -> DisplayState {
        let track = self.session.track();
        let selected_id = self.selected_phrase_id();

        let phrases = self
            .session
            .phrases()
            .iter()
            .map(|p| PhraseView {
                name: p.name.clone(),
                preset: p.preset.label(),
                selected: Some(p.id) == selected_id,
                bars: p
                    .bars()
                    .iter()
                    .map(|bar| {
                        bar.iter()
                            .map(|s| s.as_ref().map(|c| c.chord.label.clone()))
                            .collect()
                    })
                    .collect(),
            })
            .collect();

        let arrangement = self
            .session
            .arrangement()
            .items()
            .iter()
            .map(|item| {
                self.session
                    .phrase(item.phrase_id)
                    .map_or_else(|| "?".to_string(), |p| p.name.clone())
            })
            .collect();

        DisplayState {
            track_name: track.name.clone(),
            key: track.key,
            scale: track.scale,
            bpm: track.bpm(),
            time_signature: track.time_signature(),
            palette_mode: self.palette_mode,
            palette: self.palette_chords().into_iter().map(|c| c.label).collect(),
            palette_cursor: self.palette_cursor,
            phrases,
            selected_slot: self
                .session
                .selected_slot()
                .filter(|s| Some(s.phrase_id) == selected_id)
                .map(|s| (s.bar, s.slot)),
            arrangement,
            arrangement_cursor: self.arrangement_cursor,
            progression: self
                .session
                .progression()
                .chords()
                .iter()
                .map(|c| c.chord.label.clone())
                .collect(),
            loaded: self.engine.is_loaded(),
            playing: self.playing.map(|p| p.what),
            status: self.status.clone(),
        }
    }

    fn palette_chords(&self) -> Vec<Chord> {
        match self.palette_mode {
            PaletteMode::Scale => self.session.palette().to_vec(),
            PaletteMode::All => all_triads(),
        }
    }

    fn cursor_chord(&self) -> Option<Chord> {
        self.palette_chords().get(self.palette_cursor).cloned()
    }

    fn selected_phrase_id(&self) -> Option<crate::ids::PhraseId> {
        self.session.selected_phrase().map(|p| p.id)
    }

    fn add_to_phrase(&mut self, chord: &Chord) {
        match self.session.add_chord_to_selection(chord) {
            Ok(_) => self.audition(chord),
            Err(e) => self.report(e),
        }
    }

    fn audition(&mut self, chord: &Chord) {
        if let Err(e) = self.engine.play_chord(chord, 0.0, None) {
            self.report(e);
        }
    }

    fn report(&mut self, e: impl Display) {
        log::warn!("{e}");
        self.status = e.to_string();
    }

    fn next_phrase(&mut self) {
        let phrases = self.session.phrases();
        if phrases.is_empty() {
            return;
        }
        let idx = self
            .selected_phrase_id()
            .and_then(|id| phrases.iter().position(|p| p.id == id))
            .map_or(0, |i| (i + 1) % phrases.len());
        let id = phrases[idx].id;
        if let Err(e) = self.session.select_phrase(id) {
            self.report(e);
        }
    }

    fn move_selection(&mut self, dir: SelectionMove) {
        let Some(phrase) = self.session.selected_phrase() else { return };
        let slots = self.session.slot_count();
        let bars = phrase.bar_count();

        let next = match self.session.selected_slot().filter(|s| s.phrase_id == phrase.id) {
            None => SlotRef { phrase_id: phrase.id, bar: 0, slot: 0 },
            Some(mut at) => {
                match dir {
                    SelectionMove::Left => at.slot = at.slot.saturating_sub(1),
                    SelectionMove::Right => at.slot = (at.slot + 1).min(slots - 1),
                    SelectionMove::Up => at.bar = at.bar.saturating_sub(1),
                    SelectionMove::Down => at.bar = (at.bar + 1).min(bars - 1),
                }
                at
            }
        };
        if let Err(e) = self.session.select_slot(next) {
            self.report(e);
        }
    }

    // Loads before scheduling: per-note playback won't load on its own.
    fn ensure_loaded(&mut self) -> bool {
        match self.engine.load() {
            Ok(()) => true,
            Err(e) => {
                self.report(e);
                false
            }
        }
    }

    fn play_phrase(&mut self) {
        if self.session.selected_phrase().is_none() || !self.ensure_loaded() {
            return;
        }
        let Some(phrase) = self.session.selected_phrase() else { return };
        let track = self.session.track();
        let end = self
            .scheduler
            .play_phrase(&self.engine, phrase, track.bpm() as f64, track.slot_count(), 0.0);
        log::info!("playing phrase {} ({end:.2}s)", phrase.name);
        self.playing = Some(Playing { what: "phrase", remaining: end });
    }

    fn play_arrangement(&mut self) {
        if self.session.arrangement().is_empty() || !self.ensure_loaded() {
            return;
        }
        let track = self.session.track();
        let end = self.scheduler.play_arrangement(
            &self.engine,
            self.session.phrases(),
            self.session.arrangement().items(),
            track.bpm() as f64,
            track.slot_count(),
        );
        log::info!("playing arrangement ({end:.2}s)");
        self.playing = Some(Playing { what: "arrangement", remaining: end });
    }

    fn play_progression(&mut self) {
        if self.session.progression().is_empty() {
            return;
        }
        let bpm = self.session.track().bpm() as f64;
        match self.scheduler.play_progression(
            &mut self.engine,
            self.session.progression().chords(),
            bpm,
            PROGRESSION_BAR_BEATS,
        ) {
            Ok(end) => self.playing = Some(Playing { what: "progression", remaining: end }),
            Err(e) => self.report(e),
        }
    }
}
