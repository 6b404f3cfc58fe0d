//! Recent-note lane - the last few notes as colored labels, newest last.

use keytone::mapper::context::MusicalContext;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::pitch_color;

pub fn render_notelane(frame: &mut Frame, area: Rect, context: &MusicalContext) {
    let block = Block::default().title(" recent ").borders(Borders::ALL);

    let count = context.history().count();
    let spans: Vec<Span> = context
        .history()
        .enumerate()
        .flat_map(|(i, note)| {
            let mut style = Style::default().fg(pitch_color(note.pitch_class.index()));
            if i + 1 == count {
                style = style.add_modifier(Modifier::BOLD);
            }
            [
                Span::styled(note.to_string(), style),
                Span::raw("  "),
            ]
        })
        .collect();

    let line = if spans.is_empty() {
        Line::from(Span::raw(" waiting for keys..."))
    } else {
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}
