// Types passed between the terminal front-end and the middle layer.
//
// The TUI only ever turns key presses into InputEvents and draws whatever
// DisplayState it's handed. Everything with meaning (the session, the audio
// engine, what a key does in context) lives in middle.rs.
//
// Keys:
//   1-7           //  AddScaleChord(0..6): add that degree to the phrase
//   v             //  TogglePalette (scale chords / all 36 triads)
//   h / l         //  PaletteCursor(-1 / +1)
//   Enter         //  AddPaletteChord
//   o / O         //  AddPaletteChordToProgression / PlayProgression
//   X             //  ClearProgression
//   arrows        //  MoveSelection
//   u             //  ClearSelection
//   x             //  DeleteChord (selected slot)
//   k / K         //  KeyUp / KeyDown
//   m             //  ToggleScale
//   - / =         //  TempoDown / TempoUp
//   t             //  CycleTimeSignature
//   n / Tab       //  NewPhrase / NextPhrase
//   b / B         //  AddBar / DeleteBar
//   p             //  CyclePreset
//   a             //  AppendToArrangement
//   { / }         //  ArrangementCursor(-1 / +1)
//   ( / )         //  MoveArrangementItem(Earlier / Later)
//   d / c         //  RemoveArrangementItem / ClearArrangement
//   g             //  LoadSamples
//   Space / r     //  PlayPhrase / PlayArrangement
//   s             //  Stop
//   Esc           //  Quit

use crate::music::{Note, ScaleName};
use crate::pipeline::{Direction, TimeSignature};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMove {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    // chord palette
    AddScaleChord(u8), // degree 0-6
    TogglePalette,
    PaletteCursor(i32),
    AddPaletteChord,
    AddPaletteChordToProgression,

    // slot selection
    MoveSelection(SelectionMove),
    ClearSelection,
    DeleteChord,

    // track settings
    KeyUp,
    KeyDown,
    ToggleScale,
    TempoUp,
    TempoDown,
    CycleTimeSignature,

    // phrases
    NewPhrase,
    NextPhrase,
    AddBar,
    DeleteBar,
    CyclePreset,

    // arrangement
    AppendToArrangement,
    ArrangementCursor(i32),
    MoveArrangementItem(Direction),
    RemoveArrangementItem,
    ClearArrangement,

    // progression lane
    PlayProgression,
    ClearProgression,

    // transport
    LoadSamples,
    PlayPhrase,
    PlayArrangement,
    Stop,

    Quit,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaletteMode {
    #[default]
    Scale,
    All,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhraseView {
    pub name: String,
    pub preset: &'static str,
    pub selected: bool,
    pub bars: Vec<Vec<Option<String>>>, // chord labels, None = empty slot
}

#[derive(Clone, Debug, PartialEq)]
pub struct DisplayState {
    pub track_name: String,
    pub key: Note,
    pub scale: ScaleName,
    pub bpm: u32,
    pub time_signature: TimeSignature,

    pub palette_mode: PaletteMode,
    pub palette: Vec<String>,
    pub palette_cursor: usize,

    pub phrases: Vec<PhraseView>,
    pub selected_slot: Option<(usize, usize)>, // (bar, slot) in the selected phrase

    pub arrangement: Vec<String>, // phrase names in play order
    pub arrangement_cursor: usize,
    pub progression: Vec<String>,

    pub loaded: bool,
    pub playing: Option<&'static str>, // what's playing, while it is
    pub status: String,
}
