//! Status bar - scale, octave, volume, progression and audio state.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::View;

pub fn render_status(frame: &mut Frame, area: Rect, view: &View) {
    let block = Block::default().title(" keytone ").borders(Borders::ALL);

    let octave = view.context.octave_shift;
    let octave_str = if octave >= 0 {
        format!("+{octave}")
    } else {
        octave.to_string()
    };

    let (audio_str, audio_color) = match view.sample_rate {
        Some(rate) if view.audio_live => (format!("live {:.0}kHz", rate / 1000.0), Color::Green),
        _ => ("no audio".to_string(), Color::Red),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" scale: {}  ", view.context.scale.name()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("octave: {octave_str}  "),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("volume: {:.0}%  ", view.settings.volume * 100.0),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!(
                "progression: {} ({}/{})  ",
                view.context.progression_name(),
                view.context.position + 1,
                keytone::theory::PROGRESSIONS[view.context.progression].len(),
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(audio_str, Style::default().fg(audio_color)),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
