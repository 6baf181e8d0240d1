//! # Note Mapping Module
//!
//! Converts a detected frequency to a musical note name with cents
//! deviation, using equal temperament anchored at A4 = 440 Hz. A dead-zone
//! on the cents deviation suppresses readings that land ambiguously
//! between two semitones, so a sustained, slightly detuned pitch reports
//! as rest instead of flickering between neighbors.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

/// Chromatic scale starting at C, the octave boundary.
const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Map from note name to its chromatic index, for the reverse conversion.
static NOTE_INDEX: Lazy<BTreeMap<&'static str, i32>> = Lazy::new(|| {
    NOTE_NAMES
        .iter()
        .enumerate()
        .map(|(i, &name)| (name, i as i32))
        .collect()
});

/// A mapped musical note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Chromatic name, "C" through "B".
    pub name: &'static str,
    /// Octave in scientific pitch notation (A4 = 440 Hz, C4 = middle C).
    pub octave: i32,
    /// Deviation from the note's canonical frequency, in cents.
    pub cents: f32,
}

impl Note {
    /// Renders the conventional label, e.g. "A4" or "C#3".
    pub fn label(&self) -> String {
        format!("{}{}", self.name, self.octave)
    }
}

/// Maps a frequency to the nearest note of the equal-tempered scale.
///
/// Returns `None` (rest) for non-finite or non-positive frequencies, and
/// for frequencies whose cents deviation exceeds `dead_zone_cents` - an
/// ambiguous reading between two semitones is reported as no note rather
/// than guessed.
pub fn frequency_to_note(frequency_hz: f32, dead_zone_cents: f32) -> Option<Note> {
    if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
        return None;
    }

    // Semitone distance from A4.
    let n = 12.0 * (frequency_hz / 440.0).log2();
    let nearest = n.round();
    let cents = (n - nearest) * 100.0;

    if cents.abs() > dead_zone_cents {
        return None;
    }

    // Shift so the scale index is relative to C; A sits 9 semitones above.
    let from_c = nearest as i32 + 9;
    let index = from_c.rem_euclid(12) as usize;
    let octave = 4 + from_c.div_euclid(12);

    Some(Note {
        name: NOTE_NAMES[index],
        octave,
        cents,
    })
}

/// Canonical equal-temperament frequency of a named note.
///
/// The inverse of `frequency_to_note` for exact pitches; returns `None`
/// for names outside the chromatic table.
pub fn note_to_frequency(name: &str, octave: i32) -> Option<f32> {
    let index = *NOTE_INDEX.get(name)?;
    let semitones_from_a4 = index - 9 + (octave - 4) * 12;
    Some(440.0 * 2.0_f32.powf(semitones_from_a4 as f32 / 12.0))
}
