use super::note::PitchClass;

/// The five selectable scales, each an ordered set of pitch classes rooted
/// at C. Selected by name; everything outside this registry is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// C D E F G A B
    Major,
    /// C D Eb F G Ab Bb (natural minor)
    Minor,
    /// C D E G A (major pentatonic — hard to sound wrong)
    Pentatonic,
    /// C Eb F F# G Bb (hexatonic blues)
    Blues,
    /// All twelve pitch classes
    Chromatic,
}

impl Scale {
    pub const ALL: [Scale; 5] = [
        Scale::Major,
        Scale::Minor,
        Scale::Pentatonic,
        Scale::Blues,
        Scale::Chromatic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scale::Major => "major",
            Scale::Minor => "minor",
            Scale::Pentatonic => "pentatonic",
            Scale::Blues => "blues",
            Scale::Chromatic => "chromatic",
        }
    }

    pub fn from_name(name: &str) -> Option<Scale> {
        Scale::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Semitone offsets from the root for each scale degree.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            Scale::Major => &[0, 2, 4, 5, 7, 9, 11],
            Scale::Minor => &[0, 2, 3, 5, 7, 8, 10],
            Scale::Pentatonic => &[0, 2, 4, 7, 9],
            Scale::Blues => &[0, 3, 5, 6, 7, 10],
            Scale::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        }
    }

    /// Number of degrees in the scale.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(self) -> usize {
        self.intervals().len()
    }

    /// Pitch class of a scale degree, wrapping past the scale length.
    pub fn degree(self, index: usize) -> PitchClass {
        let intervals = self.intervals();
        PitchClass::C.transpose(intervals[index % intervals.len()])
    }

    /// Degree position of a pitch class, or None if it is not in the scale.
    pub fn position_of(self, pitch_class: PitchClass) -> Option<usize> {
        self.intervals()
            .iter()
            .position(|&iv| iv == pitch_class.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_five_scales() {
        assert_eq!(Scale::ALL.len(), 5);
        for scale in Scale::ALL {
            assert_eq!(Scale::from_name(scale.name()), Some(scale));
        }
        assert_eq!(Scale::from_name("dorian"), None);
    }

    #[test]
    fn degree_wraps_past_length() {
        // Pentatonic: C D E G A, degree 5 wraps back to C
        assert_eq!(Scale::Pentatonic.degree(0), PitchClass::C);
        assert_eq!(Scale::Pentatonic.degree(5), PitchClass::C);
        assert_eq!(Scale::Pentatonic.degree(7), PitchClass::E);
    }

    #[test]
    fn position_of_in_and_out_of_scale() {
        assert_eq!(Scale::Major.position_of(PitchClass::G), Some(4));
        // Eb is not in C major
        let e_flat = PitchClass::from_name("D#").unwrap();
        assert_eq!(Scale::Major.position_of(e_flat), None);
        // ...but every pitch class is in the chromatic scale
        assert_eq!(Scale::Chromatic.position_of(e_flat), Some(3));
    }

    #[test]
    fn interval_tables_are_sorted_and_in_range() {
        for scale in Scale::ALL {
            let intervals = scale.intervals();
            assert!(intervals.windows(2).all(|w| w[0] < w[1]));
            assert!(intervals.iter().all(|&iv| iv < 12));
        }
    }
}
