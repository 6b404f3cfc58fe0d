//! TUI for keytone
//!
//! Three stacked panes: a status bar, the ripple field where key presses
//! land, and the recent-note lane, with a one-line help bar underneath.

mod notelane;
pub mod ripple;
mod status;

use keytone::mapper::context::MusicalContext;
use keytone::settings::Settings;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use ripple::RippleField;

/// Everything the renderer needs for one frame, borrowed from the app.
pub struct View<'a> {
    pub settings: &'a Settings,
    pub context: &'a MusicalContext,
    pub ripples: &'a RippleField,
    pub audio_live: bool,
    pub sample_rate: Option<f32>,
}

pub fn render(frame: &mut Frame, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status bar
            Constraint::Min(8),    // Ripple field
            Constraint::Length(3), // Recent-note lane
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    status::render_status(frame, chunks[0], view);
    ripple::render_ripples(frame, chunks[1], view.ripples);
    notelane::render_notelane(frame, chunks[2], view.context);

    let help = Paragraph::new(
        " type to play  [Tab] scale  [↑/↓] octave  [PgUp/PgDn] volume  [Esc] quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);
}

/// One terminal color per pitch class, a rough circle-of-hue so nearby
/// pitches look related.
pub fn pitch_color(pitch_class: u8) -> Color {
    const COLORS: [Color; 12] = [
        Color::Red,
        Color::LightRed,
        Color::Yellow,
        Color::LightYellow,
        Color::Green,
        Color::LightGreen,
        Color::Cyan,
        Color::LightCyan,
        Color::Blue,
        Color::LightBlue,
        Color::Magenta,
        Color::LightMagenta,
    ];
    COLORS[pitch_class as usize % 12]
}
