//! Analysis session
//!
//! One [`Analyzer`] per audio session. Each tick the caller hands over one
//! frame of samples; the analyzer runs pitch detection, note mapping, key
//! estimation and chord guessing to completion, refreshes the display
//! spectrum, and stores a [`Snapshot`] for collaborators to poll.

use crate::chord_guesser::{ChordGuess, ChordGuesser};
use crate::frame::{FrameError, SampleFrame};
use crate::key_estimator::{KeyEstimate, KeyEstimator};
use crate::note::Note;
use crate::pitch_detector::PitchDetector;
use crate::spectrum::{SpectrumAnalyzer, SpectrumError, SPECTRUM_BANDS};
use thiserror::Error;
use tracing::{debug, trace};

/// Errors returned by an analysis session.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Frame received was not of the configured size.
    #[error("expected frame of length {expected}, got {got}")]
    InvalidFrameSize {
        /// The configured frame size.
        expected: usize,
        /// The actual size of the received frame.
        got: usize,
    },

    /// The frame content was malformed.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// The spectrum pipeline rejected its configuration.
    #[error(transparent)]
    Spectrum(#[from] SpectrumError),
}

/// The latest analysis results, polled by the rendering collaborator.
///
/// On a tick with no detected pitch the note, key and chord fields are all
/// `None`; nothing is invented from stale data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    /// Detected fundamental frequency in Hz, if any.
    pub pitch_hz: Option<f32>,
    /// Note corresponding to the detected pitch.
    pub note: Option<Note>,
    /// Key estimate over the session histogram, present on detected ticks.
    pub key: Option<KeyEstimate>,
    /// Chord guess over the recent pitch window, if one matched.
    pub chord: Option<ChordGuess>,
    /// Normalized display spectrum of the latest frame.
    pub spectrum: [f32; SPECTRUM_BANDS],
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot {
            pitch_hz: None,
            note: None,
            key: None,
            chord: None,
            spectrum: [0.0; SPECTRUM_BANDS],
        }
    }
}

/// Builder for an [`Analyzer`] session.
pub struct AnalyzerBuilder {
    frame_size: usize,
    sample_rate: u32,
}

impl AnalyzerBuilder {
    /// Start with default parameters: frame_size = 2048,
    /// sample_rate = 44_100.
    pub fn new() -> Self {
        AnalyzerBuilder {
            frame_size: 2_048,
            sample_rate: 44_100,
        }
    }

    /// Set the expected frame length in samples.
    pub fn frame_size(mut self, size: usize) -> Self {
        self.frame_size = size;
        self
    }

    /// Set the sample rate of the incoming audio.
    pub fn sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Finalize and create the `Analyzer`.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let spectrum = SpectrumAnalyzer::builder()
            .sample_rate(self.sample_rate)
            .fft_size(self.frame_size)
            .build()?;
        Ok(Analyzer {
            frame_size: self.frame_size,
            sample_rate: self.sample_rate,
            pitch_detector: PitchDetector::new(),
            key_estimator: KeyEstimator::new(),
            chord_guesser: ChordGuesser::new(),
            spectrum,
            snapshot: Snapshot::default(),
        })
    }
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A complete analysis session over one audio source.
///
/// All state is owned by the instance; independent sessions are independent
/// values and can run on separate threads without coordination.
pub struct Analyzer {
    frame_size: usize,
    sample_rate: u32,
    pitch_detector: PitchDetector,
    key_estimator: KeyEstimator,
    chord_guesser: ChordGuesser,
    spectrum: SpectrumAnalyzer,
    snapshot: Snapshot,
}

impl Analyzer {
    /// Return a builder to configure a session.
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// The configured frame length in samples.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// The configured sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Run one analysis tick over `samples` and return the new snapshot.
    ///
    /// The slice length must match the configured frame size. The frame is
    /// consumed within this call; nothing borrows it afterwards.
    pub fn process_frame(&mut self, samples: &[f32]) -> Result<Snapshot, AnalyzerError> {
        if samples.len() != self.frame_size {
            return Err(AnalyzerError::InvalidFrameSize {
                expected: self.frame_size,
                got: samples.len(),
            });
        }
        let frame = SampleFrame::new(samples, self.sample_rate)?;

        let pitch_hz = self.pitch_detector.detect(&frame);
        let (note, key, chord) = match pitch_hz.and_then(Note::from_frequency) {
            Some(note) => {
                self.key_estimator.observe(note.name);
                self.chord_guesser.push(note.name);
                (
                    Some(note),
                    Some(self.key_estimator.estimate_key()),
                    self.chord_guesser.guess(),
                )
            }
            None => (None, None, None),
        };
        trace!(?pitch_hz, note = ?note.map(|n| n.to_string()), "tick");

        let spectrum = self.spectrum.analyze(samples)?;
        self.snapshot = Snapshot {
            pitch_hz,
            note,
            key,
            chord,
            spectrum,
        };
        Ok(self.snapshot)
    }

    /// The snapshot from the most recent tick.
    pub fn latest(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Total pitch-class observations since the session started.
    pub fn observations(&self) -> u64 {
        self.key_estimator.observations()
    }

    /// Start a new session: clears the key histogram, the chord window, the
    /// spectrum smoothing state, and the latest snapshot.
    ///
    /// Call this whenever the audio source switches to a new file or a new
    /// capture; otherwise key and chord estimates blend across unrelated
    /// recordings.
    pub fn reset(&mut self) {
        debug!("analysis session reset");
        self.key_estimator.reset();
        self.chord_guesser.reset();
        self.spectrum.reset();
        self.snapshot = Snapshot::default();
    }
}
