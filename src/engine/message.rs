#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// Commands crossing from the event thread into the audio callback.
///
/// `NoteOn` is the whole playback contract: this pitch, for this long, at
/// this loudness. Terminal input has no key-release events, so there is no
/// `NoteOff` — every voice times itself out.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn {
        /// MIDI note number.
        note: u8,
        /// Loudness, 0-1.
        velocity: f32,
        duration_ms: u32,
    },
    AllNotesOff,
    SetVolume(f32),
    SetDelayMix(f32),
    SetReverbMix(f32),
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}
