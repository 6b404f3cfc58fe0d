use std::fmt;

/// The twelve pitch-class names in ascending chromatic order, sharps only.
pub const CHROMATIC: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A note name independent of octave, stored as an index into [`CHROMATIC`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);
    pub const E: PitchClass = PitchClass(4);
    pub const G: PitchClass = PitchClass(7);
    pub const A: PitchClass = PitchClass(9);

    /// Look up a pitch class by its chromatic-table name ("C", "F#", ...).
    pub fn from_name(name: &str) -> Option<PitchClass> {
        CHROMATIC
            .iter()
            .position(|&n| n == name)
            .map(|i| PitchClass(i as u8))
    }

    /// Map a natural note letter (A-G, either case) to its pitch class.
    pub fn from_letter(letter: char) -> Option<PitchClass> {
        let semitone = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };
        Some(PitchClass(semitone))
    }

    pub fn name(self) -> &'static str {
        CHROMATIC[self.0 as usize]
    }

    /// Chromatic index, 0 (C) through 11 (B).
    pub fn index(self) -> u8 {
        self.0
    }

    /// Move up by `semitones`, wrapping within the octave.
    pub fn transpose(self, semitones: u8) -> PitchClass {
        PitchClass((self.0 + semitones) % 12)
    }
}

/// A pitch class at a concrete octave. Displays as e.g. `"C#4"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pub pitch_class: PitchClass,
    pub octave: u8,
}

impl Note {
    pub fn new(pitch_class: PitchClass, octave: u8) -> Self {
        Self {
            pitch_class,
            octave,
        }
    }

    /// MIDI note number: `12 * (octave + 1) + semitone`, so C4 = 60.
    pub fn midi(self) -> u8 {
        12 * (self.octave + 1) + self.pitch_class.index()
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class.name(), self.octave)
    }
}
