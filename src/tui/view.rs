use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::shared::{DisplayState, PaletteMode};

use super::grid::draw_bar_grid;

const HELP: &str = "1-7 add  v/h/l/⏎ palette  ←→↑↓ slot  x del  n new  ⇥ next  b/B bar  p preset  \
                    a arrange  {}() d c  o/O lane  k/K key  m scale  -/= bpm  t sig  \
                    g load  ␣ phrase  r song  s stop  esc quit";

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState, blink_on: bool) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // track settings
            Constraint::Length(3), // chord palette
            Constraint::Min(8),    // phrases + bar grid
            Constraint::Length(3), // arrangement
            Constraint::Length(3), // progression lane
            Constraint::Length(2), // status + help
        ])
        .split(area);

    draw_header(frame, sections[0], state, blink_on);
    draw_palette(frame, sections[1], state);
    draw_phrases(frame, sections[2], state);
    draw_strip(
        frame,
        sections[3],
        "Arrangement",
        &state.arrangement,
        Some(state.arrangement_cursor),
    );
    draw_strip(frame, sections[4], "Progression", &state.progression, None);
    draw_footer(frame, sections[5], state);
}

fn draw_header(frame: &mut Frame, area: Rect, state: &DisplayState, blink_on: bool) {
    let name = if state.track_name.is_empty() { "untitled" } else { state.track_name.as_str() };
    let mut spans = vec![
        Span::styled(name.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            "   {} {}   {} bpm   {}",
            state.key,
            state.scale.label(),
            state.bpm,
            state.time_signature.label()
        )),
    ];
    spans.push(Span::raw("   "));
    if state.loaded {
        spans.push(Span::styled("● guitar", Style::default().fg(Color::Green)));
    } else {
        spans.push(Span::styled("○ guitar (g to load)", Style::default().fg(Color::DarkGray)));
    }
    if let Some(what) = state.playing {
        let style = if blink_on {
            Style::default().fg(Color::LightMagenta)
        } else {
            Style::default().fg(Color::Magenta)
        };
        spans.push(Span::styled(format!("   ▶ {what}"), style));
    }
    let block = Block::default().borders(Borders::ALL).title("chordpad");
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_palette(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let title = match state.palette_mode {
        PaletteMode::Scale => "Scale chords",
        PaletteMode::All => "All triads",
    };

    // keep the cursor in view for the long list
    let width = area.width.saturating_sub(2) as usize;
    let per_chord = 6;
    let visible = (width / per_chord).max(1);
    let first = state.palette_cursor.saturating_sub(visible - 1);

    let spans: Vec<Span> = state
        .palette
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .map(|(i, label)| {
            let text = match state.palette_mode {
                PaletteMode::Scale => format!("{}:{label:<4}", i + 1),
                PaletteMode::All => format!("{label:<5} "),
            };
            if i == state.palette_cursor {
                Span::styled(text, Style::default().fg(Color::Black).bg(Color::LightMagenta))
            } else {
                Span::raw(text)
            }
        })
        .collect();

    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_phrases(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(20)])
        .split(area);

    let lines: Vec<Line> = state
        .phrases
        .iter()
        .map(|p| {
            let style = if p.selected {
                Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let marker = if p.selected { "▸ " } else { "  " };
            Line::from(Span::styled(format!("{marker}{} ({} bars)", p.name, p.bars.len()), style))
        })
        .collect();
    let list = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Phrases"));
    frame.render_widget(list, cols[0]);

    let Some(selected) = state.phrases.iter().find(|p| p.selected) else {
        let hint =
            Paragraph::new("n to start a phrase").block(Block::default().borders(Borders::ALL));
        frame.render_widget(hint, cols[1]);
        return;
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{} · {}", selected.name, selected.preset));
    let inner = block.inner(cols[1]);
    frame.render_widget(block, cols[1]);
    draw_bar_grid(frame, inner, &selected.bars, state.selected_slot);
}

fn draw_strip(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    labels: &[String],
    cursor: Option<usize>,
) {
    let spans: Vec<Span> = labels
        .iter()
        .enumerate()
        .flat_map(|(i, label)| {
            let style = if cursor == Some(i) {
                Style::default().fg(Color::Black).bg(Color::LightMagenta)
            } else {
                Style::default().fg(Color::LightMagenta)
            };
            [Span::styled(format!("[{label}]"), style), Span::raw(" ")]
        })
        .collect();
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_footer(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let lines = vec![
        Line::from(Span::styled(state.status.clone(), Style::default().fg(Color::Yellow))),
        Line::from(Span::styled(HELP, Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}
