//! Twelve-tone equal temperament pitch conversions.
//!
//! Pitches are MIDI note numbers (69 = A4) with an optional offset in
//! cents. The reference frequency of A4 is a parameter everywhere; the
//! pitch-adaptive peak picker passes a bin's own frequency as the
//! reference to find the frequency a fixed interval above it.

pub const DEFAULT_CONCERT_A: f64 = 440.0;

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Frequency of `midi_pitch + cents/100` given A4 = `concert_a`.
pub fn frequency_for_pitch(midi_pitch: i32, cents_offset: f64, concert_a: f64) -> f64 {
    let p = midi_pitch as f64 + cents_offset / 100.0;
    concert_a * 2f64.powf((p - 69.0) / 12.0)
}

/// Nearest MIDI pitch for `frequency` and the offset from it in cents,
/// in `[-50, 50)`.
pub fn pitch_for_frequency(frequency: f64, concert_a: f64) -> (i32, f64) {
    let p = 12.0 * (frequency / concert_a).log2() + 69.0;

    let mut midi_pitch = (p + 0.00001).floor() as i32;
    let mut cents = (p - midi_pitch as f64) * 100.0;

    if cents >= 50.0 {
        midi_pitch += 1;
        cents = -(100.0 - cents);
    }

    (midi_pitch, cents)
}

/// Note name with octave, e.g. `A4`, `C#5`, `Db-1`, plus a rounded cents
/// suffix (`A4+12c`) when the offset is non-zero.
pub fn pitch_label(midi_pitch: i32, cents_offset: f64, use_flats: bool) -> String {
    let names = if use_flats { &FLAT_NAMES } else { &SHARP_NAMES };
    let octave = midi_pitch.div_euclid(12) - 1;
    let name = names[midi_pitch.rem_euclid(12) as usize];

    let cents = cents_offset.round() as i32;
    match cents {
        0 => format!("{}{}", name, octave),
        c if c > 0 => format!("{}{}+{}c", name, octave, c),
        c => format!("{}{}{}c", name, octave, c),
    }
}

pub fn pitch_label_for_frequency(frequency: f64, concert_a: f64, use_flats: bool) -> String {
    let (pitch, cents) = pitch_for_frequency(frequency, concert_a);
    pitch_label(pitch, cents, use_flats)
}
