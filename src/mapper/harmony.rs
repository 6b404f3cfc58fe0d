//! Diatonic harmony layered over the most recent note.
//!
//! When enough notes are in flight the generator sometimes answers a key
//! press with the third and fifth above it in the current scale, slightly
//! delayed and quieter, which reads as a strummed chord rather than a
//! block of simultaneous attacks.

use std::time::Duration;

use rand::Rng;

use super::context::MusicalContext;
use super::{KeyClass, Tuning};
use crate::theory::Note;

/// Scale-degree offsets for the two harmony voices: diatonic third and fifth.
const HARMONY_OFFSETS: [usize; 2] = [2, 4];

/// A harmony note to be played `delay` after the triggering note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarmonyNote {
    pub note: Note,
    pub delay: Duration,
}

/// Generate harmony for the most recently recorded note, or nothing.
///
/// No-op when fewer than `harmony_min_pending` notes sit in the recent
/// window, when the draw does not clear the threshold, or when the last
/// note's pitch class has no position in the current scale (possible right
/// after a scale change).
pub fn generate<R: Rng>(
    ctx: &MusicalContext,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec<HarmonyNote> {
    if ctx.recent_len() < tuning.harmony_min_pending {
        return Vec::new();
    }
    if rng.gen::<f64>() <= tuning.harmony_threshold {
        return Vec::new();
    }
    let Some(last) = ctx.last_note() else {
        return Vec::new();
    };
    let Some(position) = ctx.scale.position_of(last.pitch_class) else {
        return Vec::new();
    };

    let len = ctx.scale.len();
    let octave_cap = KeyClass::Letter.octave_range().max;

    HARMONY_OFFSETS
        .iter()
        .zip(tuning.harmony_delays)
        .map(|(&offset, delay)| {
            let index = position + offset;
            // Each wrap past the scale length climbs one octave
            let octave = (last.octave + (index / len) as u8).min(octave_cap);
            HarmonyNote {
                note: Note::new(ctx.scale.degree(index), octave),
                delay,
            }
        })
        .collect()
}
