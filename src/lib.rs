//! # tonal_analyzer
//!
//! Real-time musical analysis of a monophonic audio stream: autocorrelation
//! pitch detection, note mapping, running key estimation and rolling-window
//! chord guessing, plus a banded display spectrum.
//!
//! ## Example
//! ```rust
//! use tonal_analyzer::Analyzer;
//!
//! fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1) Build one analysis session per audio source
//!     let mut session = Analyzer::builder()
//!         .frame_size(2_048)
//!         .sample_rate(44_100)
//!         .build()?;
//!
//!     // 2) In your audio loop, one frame per tick:
//!     let frame: Vec<f32> = vec![0.0; 2_048]; // fill with actual samples
//!     let snapshot = session.process_frame(&frame)?;
//!     if let (Some(hz), Some(note)) = (snapshot.pitch_hz, snapshot.note) {
//!         println!("{hz:.2} Hz -> {note}");
//!     }
//!     if let Some(key) = snapshot.key {
//!         println!("estimated key: {key}");
//!     }
//!     if let Some(chord) = snapshot.chord {
//!         println!("possible chord: {chord}");
//!     }
//!
//!     // 3) When the source switches to a new file or capture:
//!     session.reset();
//!     Ok(())
//! }
//! ```
//!
//! The analysis components ([`PitchDetector`], [`Note`], [`KeyEstimator`],
//! [`ChordGuesser`]) are also usable on their own; [`Analyzer`] only wires
//! them into the per-tick pipeline and owns the per-session state.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

/// Per-session analysis pipeline and its polled snapshot.
pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError, Snapshot};

/// Rolling-window chord guessing.
pub use chord_guesser::{ChordGuess, ChordGuesser, ChordQuality};

/// Validated sample frames.
pub use frame::{FrameError, SampleFrame};

/// Histogram-based key estimation.
pub use key_estimator::{KeyEstimate, KeyEstimator, Mode};

/// Notes, note names and pitch classes.
pub use note::{Note, NoteName, SEMITONES};

/// Autocorrelation pitch detection.
pub use pitch_detector::{PitchDetector, PitchDetectorBuilder};

/// Banded display spectrum.
pub use spectrum::{
    SpectrumAnalyzer, SpectrumAnalyzerBuilder, SpectrumError, SPECTRUM_BANDS,
};

/// Analysis session module.
pub mod analyzer;

/// Chord guessing module.
pub mod chord_guesser;

/// Sample frame module.
pub mod frame;

/// Key estimation module.
pub mod key_estimator;

/// Note mapping module.
pub mod note;

/// Pitch detection module.
pub mod pitch_detector;

/// Display spectrum module.
pub mod spectrum;
