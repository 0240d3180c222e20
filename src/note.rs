//! Note Mapper
//!
//! Conversion between frequencies, note names with octaves, and pitch
//! classes. The name table is fixed at compile time and indexed both ways, so
//! no string handling happens on the per-frame path.

use std::fmt::Display;

/// Number of pitch classes in the chromatic scale.
pub const SEMITONES: usize = 12;

/// Reference tuning frequency for A4.
const A4_HZ: f32 = 440.0;

/// Semitone index of A4 in the absolute note numbering where C0 is 0.
const A4_INDEX: i32 = 57;

/// Twelve chromatic pitch classes, sharps preferred.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NoteName {
    /// C
    C,
    /// C sharp / D flat
    Cs,
    /// D
    D,
    /// D sharp / E flat
    Ds,
    /// E
    E,
    /// F
    F,
    /// F sharp / G flat
    Fs,
    /// G
    G,
    /// G sharp / A flat
    Gs,
    /// A
    A,
    /// A sharp / B flat
    As,
    /// B
    B,
}

impl NoteName {
    /// Map a pitch class to its name. Values are reduced modulo 12.
    pub const fn from_pitch_class(pc: u8) -> NoteName {
        match pc % 12 {
            0 => NoteName::C,
            1 => NoteName::Cs,
            2 => NoteName::D,
            3 => NoteName::Ds,
            4 => NoteName::E,
            5 => NoteName::F,
            6 => NoteName::Fs,
            7 => NoteName::G,
            8 => NoteName::Gs,
            9 => NoteName::A,
            10 => NoteName::As,
            _ => NoteName::B,
        }
    }

    /// The pitch class of this name, in `0..12`.
    pub const fn pitch_class(self) -> u8 {
        self as u8
    }

    /// Canonical spelling, e.g. `"C#"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            NoteName::C => "C",
            NoteName::Cs => "C#",
            NoteName::D => "D",
            NoteName::Ds => "D#",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::Fs => "F#",
            NoteName::G => "G",
            NoteName::Gs => "G#",
            NoteName::A => "A",
            NoteName::As => "A#",
            NoteName::B => "B",
        }
    }
}

impl Display for NoteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A note name paired with its octave, e.g. `A4`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Note {
    /// The pitch class label.
    pub name: NoteName,
    /// Scientific pitch octave; octave 4 contains A4 = 440 Hz.
    pub octave: i32,
}

impl Note {
    /// Map a frequency in Hz to the nearest equal-tempered note.
    ///
    /// Returns `None` for non-positive or non-finite frequencies. The pitch
    /// detector only ever hands over positive values, but a contract
    /// violation should not turn into `log2` of garbage.
    pub fn from_frequency(freq: f32) -> Option<Note> {
        if !freq.is_finite() || freq <= 0.0 {
            return None;
        }
        let semitones_from_a4 = 12.0 * (freq / A4_HZ).log2();
        let note_index = semitones_from_a4.round() as i32 + A4_INDEX;
        // Floor-style division keeps sub-C0 frequencies on the right side.
        let pc = note_index.rem_euclid(SEMITONES as i32) as u8;
        let octave = note_index.div_euclid(SEMITONES as i32);
        Some(Note {
            name: NoteName::from_pitch_class(pc),
            octave,
        })
    }

    /// The pitch class of this note, octave stripped.
    pub const fn pitch_class(self) -> u8 {
        self.name.pitch_class()
    }
}

impl Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}
