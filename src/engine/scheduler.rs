//! Fire-and-forget scheduling of future synth messages.
//!
//! Harmony notes trail their trigger by a fixed delay, so the event loop
//! parks them here and drains whatever has come due each tick. Entries are
//! not cancellable and do not synchronize with later key presses; overlap
//! is free to interleave, which is part of the instrument's character.

use std::time::{Duration, Instant};

use super::message::SynthMessage;

pub struct NoteScheduler {
    /// Pending messages, kept sorted by due time.
    pending: Vec<(Instant, SynthMessage)>,
}

impl NoteScheduler {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, due: Instant, msg: SynthMessage) {
        let at = self.pending.partition_point(|&(t, _)| t <= due);
        self.pending.insert(at, (due, msg));
    }

    pub fn push_after(&mut self, now: Instant, delay: Duration, msg: SynthMessage) {
        self.push(now + delay, msg);
    }

    /// Remove and return every message due at or before `now`, in due order.
    pub fn drain_due(&mut self, now: Instant) -> Vec<SynthMessage> {
        let split = self.pending.partition_point(|&(t, _)| t <= now);
        self.pending
            .drain(..split)
            .map(|(_, msg)| msg)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for NoteScheduler {
    fn default() -> Self {
        Self::new()
    }
}
