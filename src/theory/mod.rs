pub mod chord;
pub mod note;
pub mod progression;
pub mod scale;

pub use note::{Note, PitchClass};
pub use progression::{Progression, PROGRESSIONS};
pub use scale::Scale;
