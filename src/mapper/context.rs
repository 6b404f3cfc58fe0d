use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::theory::{Note, Scale, PROGRESSIONS};

/// How many played notes the history ring keeps.
pub const HISTORY_LEN: usize = 8;

/// Lookback window for the recent-note queue.
pub const RECENT_WINDOW: Duration = Duration::from_secs(2);

/// The ambient musical state, owned by the performer and threaded through
/// the mapper and advancer explicitly. Timestamps come in from the caller,
/// so everything here is deterministic under test.
#[derive(Debug, Clone)]
pub struct MusicalContext {
    pub scale: Scale,
    /// Octave baseline applied before the per-class clamp in the mapper.
    pub octave_shift: i8,
    /// Index into [`PROGRESSIONS`].
    pub progression: usize,
    /// Cursor within the active progression.
    pub position: usize,
    history: VecDeque<Note>,
    recent: VecDeque<(Note, Instant)>,
}

impl MusicalContext {
    pub fn new(scale: Scale) -> Self {
        Self {
            scale,
            octave_shift: 0,
            progression: 0,
            position: 0,
            history: VecDeque::with_capacity(HISTORY_LEN),
            recent: VecDeque::new(),
        }
    }

    /// Record a played note at `now`: append to the history ring and the
    /// recent queue, dropping recent entries older than the lookback window
    /// relative to this insert.
    pub fn record(&mut self, note: Note, now: Instant) {
        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(note);

        while let Some(&(_, at)) = self.recent.front() {
            if now.saturating_duration_since(at) > RECENT_WINDOW {
                self.recent.pop_front();
            } else {
                break;
            }
        }
        self.recent.push_back((note, now));
    }

    pub fn last_note(&self) -> Option<Note> {
        self.history.back().copied()
    }

    /// Notes currently inside the recent-note window.
    pub fn recent_len(&self) -> usize {
        self.recent.len()
    }

    /// Played notes, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Note> {
        self.history.iter()
    }

    pub fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
    }

    /// Shift the octave baseline, bounded so no key class can be pushed
    /// past its configured range by more than the clamp absorbs.
    pub fn shift_octave(&mut self, delta: i8) {
        self.octave_shift = (self.octave_shift + delta).clamp(-2, 2);
    }

    /// Name of the active progression.
    pub fn progression_name(&self) -> &'static str {
        PROGRESSIONS[self.progression].name
    }
}
