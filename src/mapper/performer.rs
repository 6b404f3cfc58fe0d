//! The single event-handling path: one key press in, one play plan out.
//!
//! `Performer` owns the musical context and the randomness source, so the
//! whole generative behavior of the instrument is reproducible from a seed.
//! Nothing here touches the audio device; the plan is plain data for the
//! caller to schedule.

use std::time::{Duration, Instant};

use rand::Rng;

use super::ambient::{self, BackgroundChord};
use super::context::MusicalContext;
use super::harmony;
use super::{key_to_note, KeyClass, Tuning};
use crate::settings::Settings;
use crate::theory::{Note, Scale, PROGRESSIONS};

/// One note the caller should hand to the synth, `delay` after the press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedNote {
    pub note: Note,
    pub velocity: f32,
    pub duration: Duration,
    pub delay: Duration,
}

/// A background chord to sound immediately as a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordPlan {
    pub symbol: &'static str,
    pub notes: Vec<Note>,
    pub velocity: f32,
    pub duration: Duration,
}

/// Rendering hint for the visual layer: where the ripple spawns, which of
/// the twelve pitch-class colors it takes, and the key-class animation style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualEvent {
    /// Horizontal position in 0..=1.
    pub position: f32,
    /// Pitch-class index into the caller's 12-color palette.
    pub color: u8,
    pub style: KeyClass,
}

impl VisualEvent {
    fn for_key(c: char, note: Note) -> Self {
        let class = KeyClass::of(c);
        let position = match class {
            KeyClass::Letter => (c.to_ascii_lowercase() as u8 - b'a') as f32 / 25.0,
            KeyClass::Digit => c.to_digit(10).unwrap_or(0) as f32 / 9.0,
            KeyClass::Other => (c as u32 % 20) as f32 / 19.0,
        };
        Self {
            position,
            color: note.pitch_class.index(),
            style: class,
        }
    }
}

/// Everything one key press produces.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyOutput {
    pub primary: PlannedNote,
    pub harmony: Vec<PlannedNote>,
    pub chord: Option<ChordPlan>,
    pub visual: VisualEvent,
}

pub struct Performer<R: Rng> {
    context: MusicalContext,
    tuning: Tuning,
    rng: R,
}

impl<R: Rng> Performer<R> {
    pub fn new(scale: Scale, rng: R) -> Self {
        Self::with_tuning(scale, Tuning::default(), rng)
    }

    pub fn with_tuning(scale: Scale, tuning: Tuning, rng: R) -> Self {
        Self {
            context: MusicalContext::new(scale),
            tuning,
            rng,
        }
    }

    pub fn context(&self) -> &MusicalContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut MusicalContext {
        &mut self.context
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Handle one key press at `now`: map it to a note, record it, and let
    /// the harmony and progression layers react.
    pub fn key_press(&mut self, c: char, now: Instant) -> KeyOutput {
        let note = key_to_note(c, self.context.scale, self.context.octave_shift);
        self.context.record(note, now);

        let harmony = harmony::generate(&self.context, &self.tuning, &mut self.rng)
            .into_iter()
            .map(|h| PlannedNote {
                note: h.note,
                velocity: self.tuning.harmony_velocity,
                duration: self.tuning.note_duration,
                delay: h.delay,
            })
            .collect();

        let chord = ambient::maybe_advance(&mut self.context, &self.tuning, &mut self.rng)
            .map(|BackgroundChord { symbol, notes }| ChordPlan {
                symbol,
                notes,
                velocity: self.tuning.chord_velocity,
                duration: self.tuning.chord_duration,
            });

        KeyOutput {
            primary: PlannedNote {
                note,
                velocity: self.tuning.note_velocity,
                duration: self.tuning.note_duration,
                delay: Duration::ZERO,
            },
            harmony,
            chord,
            visual: VisualEvent::for_key(c, note),
        }
    }

    /// Apply external configuration to the musical context.
    ///
    /// The scale name is validated against the registry before committing;
    /// unknown names keep the current scale. Independently, with
    /// `shuffle_probability`, the active progression is re-rolled and its
    /// cursor reset, so any settings change can reshuffle the backing.
    pub fn apply_settings(&mut self, settings: &Settings) {
        match Scale::from_name(&settings.scale) {
            Some(scale) => self.context.set_scale(scale),
            None => log::warn!("ignoring unknown scale {:?}", settings.scale),
        }

        if self.rng.gen::<f64>() < self.tuning.shuffle_probability {
            self.context.progression = self.rng.gen_range(0..PROGRESSIONS.len());
            self.context.position = 0;
        }
    }
}
