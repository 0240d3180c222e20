//! Key Estimator
//!
//! Krumhansl-Schmuckler key finding over a running pitch-class histogram.
//! Every detected note bumps one of twelve counters; the estimate correlates
//! the histogram against the major and minor key profiles at all twelve
//! candidate tonics and keeps the global best.

use crate::note::{NoteName, SEMITONES};
use std::fmt::Display;
use tracing::trace;

/// Krumhansl-Schmuckler major key profile, index 0 = tonic.
const MAJOR_PROFILE: [f32; SEMITONES] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];

/// Krumhansl-Schmuckler minor key profile, index 0 = tonic.
const MINOR_PROFILE: [f32; SEMITONES] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

/// Major or minor mode of an estimated key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Major key.
    Major,
    /// Minor key.
    Minor,
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Major => f.write_str("Major"),
            Mode::Minor => f.write_str("Minor"),
        }
    }
}

/// An estimated musical key: tonic pitch class plus mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct KeyEstimate {
    /// Tonic of the key.
    pub tonic: NoteName,
    /// Major or minor.
    pub mode: Mode,
}

impl Display for KeyEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.tonic, self.mode)
    }
}

/// Running key estimator owning its own pitch-class histogram.
///
/// One instance per analysis session; independent sessions never share
/// counts. [`KeyEstimator::reset`] starts a fresh session.
pub struct KeyEstimator {
    histogram: [u64; SEMITONES],
}

impl KeyEstimator {
    /// Create an estimator with an empty histogram.
    pub fn new() -> Self {
        KeyEstimator {
            histogram: [0; SEMITONES],
        }
    }

    /// Record one pitch-class observation.
    pub fn observe(&mut self, note: NoteName) {
        self.histogram[note.pitch_class() as usize] += 1;
    }

    /// Total number of observations since the last reset.
    ///
    /// The estimate is defined even for an empty histogram (it degenerates to
    /// C Major); callers wanting a "no data yet" state should check this
    /// first.
    pub fn observations(&self) -> u64 {
        self.histogram.iter().sum()
    }

    /// Clear the histogram for a new session.
    pub fn reset(&mut self) {
        self.histogram = [0; SEMITONES];
    }

    /// Estimate the current key from the full histogram.
    ///
    /// Recomputed from scratch on every call, so repeated calls without an
    /// intervening [`KeyEstimator::observe`] return the identical estimate.
    /// Ties keep the first candidate in scan order: tonics C through B, major
    /// checked before minor at each tonic.
    pub fn estimate_key(&self) -> KeyEstimate {
        let counts = self.histogram.map(|c| c as f32);

        let mut best = KeyEstimate {
            tonic: NoteName::C,
            mode: Mode::Major,
        };
        let mut best_score = f32::NEG_INFINITY;

        for tonic in 0..SEMITONES as u8 {
            let rotated = rotate(&counts, tonic);
            for (mode, profile) in [
                (Mode::Major, &MAJOR_PROFILE),
                (Mode::Minor, &MINOR_PROFILE),
            ] {
                let score = correlate(&rotated, profile);
                if score > best_score {
                    best_score = score;
                    best = KeyEstimate {
                        tonic: NoteName::from_pitch_class(tonic),
                        mode,
                    };
                }
            }
        }

        trace!(key = %best, score = best_score, "key estimate");
        best
    }
}

impl Default for KeyEstimator {
    fn default() -> Self {
        KeyEstimator::new()
    }
}

/// Rotate the histogram so `tonic` lands at index 0 (scale degree order).
fn rotate(counts: &[f32; SEMITONES], tonic: u8) -> [f32; SEMITONES] {
    let mut rotated = [0.0f32; SEMITONES];
    for (degree, slot) in rotated.iter_mut().enumerate() {
        *slot = counts[(degree + tonic as usize) % SEMITONES];
    }
    rotated
}

/// Pearson correlation between an observed distribution and a key profile.
///
/// Returns 0.0 when either side has no variance (e.g. an all-zero
/// histogram), which leaves the first-candidate tie-break in charge.
fn correlate(observed: &[f32; SEMITONES], profile: &[f32; SEMITONES]) -> f32 {
    let mean_o: f32 = observed.iter().sum::<f32>() / SEMITONES as f32;
    let mean_p: f32 = profile.iter().sum::<f32>() / SEMITONES as f32;

    let mut numerator = 0.0f32;
    let mut denom_o = 0.0f32;
    let mut denom_p = 0.0f32;
    for (&o, &p) in observed.iter().zip(profile) {
        let diff_o = o - mean_o;
        let diff_p = p - mean_p;
        numerator += diff_o * diff_p;
        denom_o += diff_o * diff_o;
        denom_p += diff_p * diff_p;
    }

    let denom = (denom_o * denom_p).sqrt();
    if denom > 0.0 {
        numerator / denom
    } else {
        0.0
    }
}
