//! End-to-end tests of the key-press path: mapper, harmony, background
//! chords and the delay scheduler, with pinned randomness so both sides of
//! every probabilistic branch are covered.

use std::time::{Duration, Instant};

use rand::rngs::mock::StepRng;

use keytone::engine::{NoteScheduler, SynthMessage};
use keytone::mapper::performer::Performer;
use keytone::settings::Settings;
use keytone::theory::{Scale, PROGRESSIONS};

/// Draws ~1.0: harmony always clears its threshold, chord advance and
/// progression shuffle never fire.
fn rng_high() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

/// Draws 0.0: no harmony, chord advance and shuffle always fire.
fn rng_low() -> StepRng {
    StepRng::new(0, 0)
}

#[test]
fn first_press_is_a_lone_note() {
    let mut performer = Performer::new(Scale::Major, rng_high());
    let out = performer.key_press('a', Instant::now());

    assert_eq!(out.primary.note.to_string(), "C3");
    assert_eq!(out.primary.delay, Duration::ZERO);
    // Only one note in the recent window yet, so no harmony even though
    // the draw would have cleared the threshold
    assert!(out.harmony.is_empty());
    assert!(out.chord.is_none());
}

#[test]
fn second_press_picks_up_third_and_fifth() {
    let mut performer = Performer::new(Scale::Major, rng_high());
    let base = Instant::now();
    performer.key_press('c', base);
    let out = performer.key_press('e', base + Duration::from_millis(100));

    assert_eq!(out.primary.note.to_string(), "G3");
    let labels: Vec<String> = out.harmony.iter().map(|p| p.note.to_string()).collect();
    assert_eq!(labels, ["B3", "D4"]);
    assert_eq!(out.harmony[0].delay, Duration::from_millis(50));
    assert_eq!(out.harmony[1].delay, Duration::from_millis(100));
    // Harmony sits under the primary note
    assert!(out.harmony.iter().all(|p| p.velocity < out.primary.velocity));
}

#[test]
fn long_silence_resets_the_harmony_window() {
    let mut performer = Performer::new(Scale::Major, rng_high());
    let base = Instant::now();
    performer.key_press('c', base);

    // Three seconds later the first note has left the 2s window
    let out = performer.key_press('e', base + Duration::from_secs(3));
    assert!(out.harmony.is_empty());
}

#[test]
fn chord_advance_follows_the_progression() {
    let mut performer = Performer::new(Scale::Major, rng_low());
    let base = Instant::now();

    // "pop" progression: C G Am F; cursor starts at 0 and advances first
    let first = performer.key_press('a', base).chord.expect("chord fires");
    assert_eq!(first.symbol, "G");
    assert_eq!(first.notes.len(), 3);

    let second = performer
        .key_press('b', base + Duration::from_millis(50))
        .chord
        .expect("chord fires");
    assert_eq!(second.symbol, "Am");
    // The backing layer stays well under the primary notes
    assert!(second.velocity < 0.3);
}

#[test]
fn octaves_stay_in_bounds_through_the_full_path() {
    let mut performer = Performer::new(Scale::Pentatonic, rng_high());
    let base = Instant::now();
    for (i, c) in ('a'..='z').enumerate() {
        let out = performer.key_press(c, base + Duration::from_millis(i as u64 * 10));
        assert!(out.primary.note.octave <= 5);
        for planned in &out.harmony {
            assert!(planned.note.octave <= 5);
        }
    }
}

#[test]
fn settings_shuffle_resets_the_progression_cursor() {
    let mut performer = Performer::new(Scale::Major, rng_low());
    let base = Instant::now();

    // Walk the cursor off zero first
    performer.key_press('a', base);
    assert_ne!(performer.context().position, 0);

    performer.apply_settings(&Settings::default());
    assert_eq!(performer.context().position, 0);
    assert!(performer.context().progression < PROGRESSIONS.len());
}

#[test]
fn settings_without_shuffle_keep_the_progression() {
    let mut performer = Performer::new(Scale::Major, rng_high());
    performer.apply_settings(&Settings::default());
    assert_eq!(performer.context().progression, 0);
    assert_eq!(performer.context().scale, Scale::Major);
}

#[test]
fn harmony_flows_through_the_scheduler_in_order() {
    let mut performer = Performer::new(Scale::Major, rng_high());
    let mut scheduler = NoteScheduler::new();
    let base = Instant::now();

    performer.key_press('c', base);
    let out = performer.key_press('e', base + Duration::from_millis(10));
    let press = base + Duration::from_millis(10);
    for planned in &out.harmony {
        scheduler.push_after(
            press,
            planned.delay,
            SynthMessage::NoteOn {
                note: planned.note.midi(),
                velocity: planned.velocity,
                duration_ms: planned.duration.as_millis() as u32,
            },
        );
    }
    assert_eq!(scheduler.len(), 2);

    // Nothing fires before the first delay elapses
    assert!(scheduler.drain_due(press + Duration::from_millis(49)).is_empty());

    let due = scheduler.drain_due(press + Duration::from_millis(50));
    assert_eq!(due.len(), 1);
    match due[0] {
        SynthMessage::NoteOn { note, .. } => assert_eq!(note, 59), // B3
        ref other => panic!("unexpected message {other:?}"),
    }

    let rest = scheduler.drain_due(press + Duration::from_millis(200));
    assert_eq!(rest.len(), 1);
    assert!(scheduler.is_empty());
}
