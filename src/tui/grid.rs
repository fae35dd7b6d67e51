use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

// most bars that fit on screen at once; longer phrases scroll with the selection
const VISIBLE_BARS: usize = 4;

// Draws a phrase as rows of bars, one cell per slot
pub fn draw_bar_grid(
    frame: &mut Frame,
    area: Rect,
    bars: &[Vec<Option<String>>],
    selected: Option<(usize, usize)>,
) {
    if bars.is_empty() {
        return;
    }
    let first = selected
        .map(|(bar, _)| bar.saturating_sub(VISIBLE_BARS - 1))
        .unwrap_or(0);
    let shown = &bars[first..bars.len().min(first + VISIBLE_BARS)];

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3); shown.len()])
        .split(area);

    for (row_idx, (bar, row_area)) in shown.iter().zip(rows.iter()).enumerate() {
        let bar_idx = first + row_idx;
        let slots = bar.len().max(1);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, slots as u32); slots])
            .split(*row_area);

        for (slot_idx, (cell, cell_area)) in bar.iter().zip(cols.iter()).enumerate() {
            let is_selected = selected == Some((bar_idx, slot_idx));
            let style = match (cell.is_some(), is_selected) {
                (_, true) => Style::default().fg(Color::Black).bg(Color::LightMagenta),
                (true, false) => Style::default().fg(Color::LightMagenta),
                (false, false) => Style::default().fg(Color::DarkGray),
            };
            let label = cell.as_deref().unwrap_or("·");
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(style)
                .title(format!("{}.{}", bar_idx + 1, slot_idx + 1));
            let text = Paragraph::new(label)
                .alignment(Alignment::Center)
                .style(style.add_modifier(Modifier::BOLD))
                .block(block);
            frame.render_widget(text, *cell_area);
        }
    }
}
