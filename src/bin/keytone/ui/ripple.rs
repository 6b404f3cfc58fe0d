//! Ripple field - one expanding ring per key press.
//!
//! The performer's visual event decides where a ripple spawns and which
//! pitch-class color it takes; the key class picks the animation shape.
//! Progress is advanced on the UI thread each frame, so rendering itself
//! is a pure function of the field.

use std::time::{Duration, Instant};

use keytone::mapper::performer::VisualEvent;
use keytone::mapper::KeyClass;
use keytone::theory::Note;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{
        canvas::{Canvas, Circle},
        Block, Borders,
    },
    Frame,
};

use super::pitch_color;

/// How long one ripple lives.
const LIFETIME: Duration = Duration::from_millis(1500);

/// Canvas coordinate space. Square-ish so circles look like circles.
const WIDTH: f64 = 100.0;
const HEIGHT: f64 = 100.0;

const MAX_RADIUS: f64 = 28.0;

struct Ripple {
    x: f64,
    y: f64,
    color: Color,
    style: KeyClass,
    label: String,
    born: Instant,
    /// 0 at spawn, 1 at expiry; updated by [`RippleField::advance`].
    progress: f64,
}

pub struct RippleField {
    ripples: Vec<Ripple>,
}

impl RippleField {
    pub fn new() -> Self {
        Self {
            ripples: Vec::new(),
        }
    }

    pub fn spawn(&mut self, visual: &VisualEvent, note: Note, now: Instant) {
        // Horizontal position from the key, vertical from the octave so
        // low notes sit low on screen
        let x = 8.0 + visual.position as f64 * (WIDTH - 16.0);
        let y = 15.0 + (note.octave.saturating_sub(2) as f64 / 4.0) * (HEIGHT - 30.0);

        self.ripples.push(Ripple {
            x,
            y,
            color: pitch_color(visual.color),
            style: visual.style,
            label: note.to_string(),
            born: now,
            progress: 0.0,
        });
    }

    /// Age every ripple and drop the expired ones.
    pub fn advance(&mut self, now: Instant) {
        self.ripples.retain_mut(|ripple| {
            let age = now.saturating_duration_since(ripple.born);
            ripple.progress = age.as_secs_f64() / LIFETIME.as_secs_f64();
            ripple.progress < 1.0
        });
    }
}

impl Default for RippleField {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render_ripples(frame: &mut Frame, area: Rect, field: &RippleField) {
    let canvas = Canvas::default()
        .block(Block::default().title(" keytone ").borders(Borders::ALL))
        .marker(symbols::Marker::Braille)
        .x_bounds([0.0, WIDTH])
        .y_bounds([0.0, HEIGHT])
        .paint(|ctx| {
            for ripple in &field.ripples {
                // Ease out: fast at first, settling as it fades
                let eased = 1.0 - (1.0 - ripple.progress).powi(2);
                let radius = eased * MAX_RADIUS;

                match ripple.style {
                    KeyClass::Letter => {
                        ctx.draw(&Circle {
                            x: ripple.x,
                            y: ripple.y,
                            radius,
                            color: ripple.color,
                        });
                    }
                    KeyClass::Digit => {
                        // Two concentric rings
                        for scale in [1.0, 0.55] {
                            ctx.draw(&Circle {
                                x: ripple.x,
                                y: ripple.y,
                                radius: radius * scale,
                                color: ripple.color,
                            });
                        }
                    }
                    KeyClass::Other => {
                        // A four-point burst instead of a ring
                        for (dx, dy) in [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)] {
                            ctx.draw(&Circle {
                                x: ripple.x + dx * radius,
                                y: ripple.y + dy * radius,
                                radius: 1.5,
                                color: ripple.color,
                            });
                        }
                    }
                }

                // Note label while the ripple is still fresh
                if ripple.progress < 0.4 {
                    ctx.print(
                        ripple.x,
                        ripple.y,
                        Span::styled(ripple.label.clone(), Style::default().fg(ripple.color)),
                    );
                }
            }
        });

    frame.render_widget(canvas, area);
}
