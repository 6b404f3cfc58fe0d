//! Background chord progression: the soft harmonic bed under the keys.

use rand::Rng;

use super::context::MusicalContext;
use super::Tuning;
use crate::theory::{chord, Note, PROGRESSIONS};

/// A progression step that fired: the chord symbol and its resolved notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundChord {
    pub symbol: &'static str,
    pub notes: Vec<Note>,
}

/// On a note-play event, advance the progression cursor and sound the new
/// chord with probability `chord_advance_probability`. Returns `None` the
/// rest of the time, leaving the cursor untouched.
pub fn maybe_advance<R: Rng>(
    ctx: &mut MusicalContext,
    tuning: &Tuning,
    rng: &mut R,
) -> Option<BackgroundChord> {
    if rng.gen::<f64>() >= tuning.chord_advance_probability {
        return None;
    }

    let progression = PROGRESSIONS[ctx.progression];
    ctx.position = (ctx.position + 1) % progression.len();
    let symbol = progression.chord_at(ctx.position);

    Some(BackgroundChord {
        symbol,
        notes: chord::resolve(symbol),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::Scale;
    use rand::rngs::mock::StepRng;

    /// Draws 0.0 — the advance always fires.
    fn always() -> StepRng {
        StepRng::new(0, 0)
    }

    /// Draws ~1.0 — the advance never fires.
    fn never() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    #[test]
    fn no_advance_leaves_cursor_alone() {
        let mut ctx = MusicalContext::new(Scale::Major);
        let out = maybe_advance(&mut ctx, &Tuning::default(), &mut never());
        assert!(out.is_none());
        assert_eq!(ctx.position, 0);
    }

    #[test]
    fn advance_moves_cursor_and_resolves_chord() {
        let mut ctx = MusicalContext::new(Scale::Major);
        let out = maybe_advance(&mut ctx, &Tuning::default(), &mut always()).unwrap();
        assert_eq!(ctx.position, 1);
        // "pop" progression: position 1 is G major
        assert_eq!(out.symbol, "G");
        assert_eq!(out.notes.len(), 3);
    }

    #[test]
    fn cursor_wraps_at_progression_end() {
        let mut ctx = MusicalContext::new(Scale::Major);
        let len = PROGRESSIONS[ctx.progression].len();
        for _ in 0..len {
            maybe_advance(&mut ctx, &Tuning::default(), &mut always());
        }
        assert_eq!(ctx.position, 0);
    }
}
