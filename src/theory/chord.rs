//! Chord symbols and triad resolution for the background progression.
//!
//! Symbols are the compact pop shorthand used by the progression tables:
//! a root name from the chromatic table with an optional trailing `m`
//! minor marker ("C", "F#", "Am"). Anything richer (sevenths, inversions)
//! is out of scope for an ambient backing layer.

use super::note::{Note, PitchClass};

/// Octave the backing chords sound at. Low enough to sit under the melody.
pub const BACKGROUND_OCTAVE: u8 = 2;

const MAJOR_THIRD: u8 = 4;
const MINOR_THIRD: u8 = 3;
const PERFECT_FIFTH: u8 = 7;

/// A chord symbol split into its root name and quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordSymbol<'a> {
    pub root: &'a str,
    pub minor: bool,
}

/// Split a symbol into root and minor marker. `"Am"` → root `"A"`, minor.
pub fn parse(symbol: &str) -> ChordSymbol<'_> {
    match symbol.strip_suffix('m') {
        Some(root) => ChordSymbol { root, minor: true },
        None => ChordSymbol {
            root: symbol,
            minor: false,
        },
    }
}

/// Resolve a chord symbol to the notes to play, all at [`BACKGROUND_OCTAVE`].
///
/// A recognized root yields the triad: root, third (major 4 / minor 3
/// semitones up) and perfect fifth. A root missing from the chromatic table
/// degrades to a single-note "chord": the symbol's leading natural letter if
/// it names one, otherwise the tonic C.
pub fn resolve(symbol: &str) -> Vec<Note> {
    let sym = parse(symbol);

    let Some(root) = PitchClass::from_name(sym.root) else {
        let fallback = sym
            .root
            .chars()
            .next()
            .and_then(PitchClass::from_letter)
            .unwrap_or(PitchClass::C);
        return vec![Note::new(fallback, BACKGROUND_OCTAVE)];
    };

    let third = root.transpose(if sym.minor { MINOR_THIRD } else { MAJOR_THIRD });
    let fifth = root.transpose(PERFECT_FIFTH);

    vec![
        Note::new(root, BACKGROUND_OCTAVE),
        Note::new(third, BACKGROUND_OCTAVE),
        Note::new(fifth, BACKGROUND_OCTAVE),
    ]
}
