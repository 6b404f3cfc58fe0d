// Purpose: everything between the play plan and the speaker.
// The mapper produces plain data; this layer turns it into sound.

pub mod fx;
pub mod message;
#[cfg(feature = "rtrb")]
pub mod poly;
pub mod scheduler;
pub mod voice;

pub use message::SynthMessage;
pub use scheduler::NoteScheduler;

/// Simultaneous voices: a full chord plus harmony plus fast typing.
pub const MAX_VOICES: usize = 12;
