use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::pipeline::Direction;
use crate::shared::{InputEvent, SelectionMove};

// poll for input from the terminal and map key presses to input events,
// the middle layer decides what they mean
pub fn poll_input(timeout: Duration) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(vec![]);
        }
        return Ok(map_key(key.code).into_iter().collect());
    }
    Ok(vec![])
}

pub fn map_key(code: KeyCode) -> Option<InputEvent> {
    let event = match code {
        KeyCode::Esc => InputEvent::Quit,
        KeyCode::Char(' ') => InputEvent::PlayPhrase,
        KeyCode::Enter => InputEvent::AddPaletteChord,
        KeyCode::Tab => InputEvent::NextPhrase,

        // scale degrees
        KeyCode::Char(c @ '1'..='7') => InputEvent::AddScaleChord(c as u8 - b'1'),

        KeyCode::Left => InputEvent::MoveSelection(SelectionMove::Left),
        KeyCode::Right => InputEvent::MoveSelection(SelectionMove::Right),
        KeyCode::Up => InputEvent::MoveSelection(SelectionMove::Up),
        KeyCode::Down => InputEvent::MoveSelection(SelectionMove::Down),

        KeyCode::Char(c) => match c {
            'v' => InputEvent::TogglePalette,
            'h' => InputEvent::PaletteCursor(-1),
            'l' => InputEvent::PaletteCursor(1),
            'o' => InputEvent::AddPaletteChordToProgression,
            'O' => InputEvent::PlayProgression,
            'X' => InputEvent::ClearProgression,

            'u' => InputEvent::ClearSelection,
            'x' => InputEvent::DeleteChord,

            'k' => InputEvent::KeyUp,
            'K' => InputEvent::KeyDown,
            'm' => InputEvent::ToggleScale,
            '-' => InputEvent::TempoDown,
            '=' => InputEvent::TempoUp,
            't' => InputEvent::CycleTimeSignature,

            'n' => InputEvent::NewPhrase,
            'b' => InputEvent::AddBar,
            'B' => InputEvent::DeleteBar,
            'p' => InputEvent::CyclePreset,

            'a' => InputEvent::AppendToArrangement,
            '{' => InputEvent::ArrangementCursor(-1),
            '}' => InputEvent::ArrangementCursor(1),
            '(' => InputEvent::MoveArrangementItem(Direction::Earlier),
            ')' => InputEvent::MoveArrangementItem(Direction::Later),
            'd' => InputEvent::RemoveArrangementItem,
            'c' => InputEvent::ClearArrangement,

            'g' => InputEvent::LoadSamples,
            'r' => InputEvent::PlayArrangement,
            's' => InputEvent::Stop,
            _ => return None,
        },
        _ => return None,
    };
    Some(event)
}
