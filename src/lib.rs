pub mod engine; // Voice pool, effects, delayed-note scheduling
pub mod mapper; // Key classification and the key-press event path
pub mod settings;
pub mod theory; // Scales, chords, progressions

pub const MAX_BLOCK_SIZE: usize = 2048;
