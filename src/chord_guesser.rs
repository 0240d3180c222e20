//! Chord Guesser
//!
//! Matches a short rolling window of recently detected pitch classes against
//! root-position triad templates. The match is deliberately permissive: every
//! chord tone must appear somewhere in the window, extra tones are ignored.

use crate::note::{NoteName, SEMITONES};
use std::collections::VecDeque;
use std::fmt::Display;

/// Capacity of the rolling pitch window.
const WINDOW_CAPACITY: usize = 5;

/// Minimum window length before a guess is attempted.
const MIN_WINDOW_LEN: usize = 3;

/// Triad interval templates in match order: major first, then minor.
const TRIAD_TEMPLATES: [(ChordQuality, [u8; 3]); 2] = [
    (ChordQuality::Major, [0, 4, 7]),
    (ChordQuality::Minor, [0, 3, 7]),
];

/// Quality of a guessed chord.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ChordQuality {
    /// Major triad (root, major third, perfect fifth).
    Major,
    /// Minor triad (root, minor third, perfect fifth).
    Minor,
}

impl Display for ChordQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChordQuality::Major => f.write_str("Major"),
            ChordQuality::Minor => f.write_str("Minor"),
        }
    }
}

/// A chord guessed from the recent pitch window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ChordGuess {
    /// Root pitch class of the chord.
    pub root: NoteName,
    /// Major or minor triad.
    pub quality: ChordQuality,
}

impl Display for ChordGuess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.root, self.quality)
    }
}

/// Rolling-window chord guesser.
///
/// Holds the last five detected pitch classes, oldest evicted first. One
/// instance per analysis session.
pub struct ChordGuesser {
    window: VecDeque<NoteName>,
}

impl ChordGuesser {
    /// Create a guesser with an empty window.
    pub fn new() -> Self {
        ChordGuesser {
            window: VecDeque::with_capacity(WINDOW_CAPACITY),
        }
    }

    /// Append a pitch class, evicting the oldest entry once the window is
    /// full.
    pub fn push(&mut self, note: NoteName) {
        if self.window.len() == WINDOW_CAPACITY {
            self.window.pop_front();
        }
        self.window.push_back(note);
    }

    /// Number of pitch classes currently held.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// True when nothing has been pushed since the last reset.
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Clear the window for a new session.
    pub fn reset(&mut self) {
        self.window.clear();
    }

    /// Guess the most likely triad from the current window.
    ///
    /// Returns `None` while the window holds fewer than three entries or when
    /// no template matches. Roots are scanned C through B with the major
    /// template tried before the minor one, and the first complete match
    /// wins. Duplicates and unrelated extra tones in the window never
    /// disqualify a match.
    pub fn guess(&self) -> Option<ChordGuess> {
        if self.window.len() < MIN_WINDOW_LEN {
            return None;
        }

        // Set-membership only; the window order does not matter here.
        let mut present = [false; SEMITONES];
        for note in &self.window {
            present[note.pitch_class() as usize] = true;
        }

        for root in 0..SEMITONES as u8 {
            for (quality, intervals) in TRIAD_TEMPLATES {
                let matches = intervals
                    .iter()
                    .all(|&off| present[((root + off) % SEMITONES as u8) as usize]);
                if matches {
                    return Some(ChordGuess {
                        root: NoteName::from_pitch_class(root),
                        quality,
                    });
                }
            }
        }

        None
    }
}

impl Default for ChordGuesser {
    fn default() -> Self {
        ChordGuesser::new()
    }
}
