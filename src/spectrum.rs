//! Spectrum Analyzer
//!
//! Banded magnitude spectrum of the latest frame, meant to be polled by a
//! rendering collaborator for a bar-chart style display. Not part of the
//! pitch/key/chord pipeline; purely informational output.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;
use thiserror::Error;

/// Number of display bands produced per frame.
pub const SPECTRUM_BANDS: usize = 32;

/// Errors returned by the spectrum pipeline.
#[derive(Debug, Error)]
pub enum SpectrumError {
    /// Frame received was not of the expected size.
    #[error("expected frame of length {expected}, got {got}")]
    InvalidFrameSize {
        /// The expected size of the audio frame.
        expected: usize,
        /// The actual size of the received audio frame.
        got: usize,
    },

    /// An error occurred during configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Builder for a [`SpectrumAnalyzer`].
pub struct SpectrumAnalyzerBuilder {
    sample_rate: u32,
    fft_size: usize,
    smoothing: f32,
}

impl SpectrumAnalyzerBuilder {
    /// Start with default parameters:
    /// sample_rate = 44_100, fft_size = 2048, smoothing = 0.65.
    pub fn new() -> Self {
        SpectrumAnalyzerBuilder {
            sample_rate: 44_100,
            fft_size: 2_048,
            smoothing: 0.65,
        }
    }

    /// Set the sample rate of the incoming audio.
    pub fn sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Set the FFT size (also the expected frame length).
    pub fn fft_size(mut self, size: usize) -> Self {
        self.fft_size = size;
        self
    }

    /// Set the exponential smoothing factor in `0.0..1.0`; higher values
    /// favor the previous display state.
    pub fn smoothing(mut self, value: f32) -> Self {
        self.smoothing = value;
        self
    }

    /// Finalize and create the `SpectrumAnalyzer`.
    pub fn build(self) -> Result<SpectrumAnalyzer, SpectrumError> {
        if self.fft_size == 0 {
            return Err(SpectrumError::Configuration(
                "fft_size cannot be zero".into(),
            ));
        }
        if self.sample_rate == 0 {
            return Err(SpectrumError::Configuration(
                "sample_rate cannot be zero".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(SpectrumError::Configuration(
                "smoothing must be in [0.0, 1.0)".into(),
            ));
        }

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(self.fft_size);

        // Hann window, computed once.
        let window: Vec<f32> = (0..self.fft_size)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / self.fft_size as f32).cos()))
            .collect();

        Ok(SpectrumAnalyzer {
            bands: band_edges(self.sample_rate, self.fft_size),
            fft_buffer: vec![Complex { re: 0.0, im: 0.0 }; self.fft_size],
            previous: [0.0; SPECTRUM_BANDS],
            fft_size: self.fft_size,
            smoothing: self.smoothing,
            fft,
            window,
        })
    }
}

impl Default for SpectrumAnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-frame FFT magnitude analyzer with logarithmically spaced bands.
pub struct SpectrumAnalyzer {
    bands: [(usize, usize); SPECTRUM_BANDS],
    fft_buffer: Vec<Complex<f32>>,
    previous: [f32; SPECTRUM_BANDS],
    fft_size: usize,
    smoothing: f32,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
}

impl SpectrumAnalyzer {
    /// Start customizing with a builder.
    pub fn builder() -> SpectrumAnalyzerBuilder {
        SpectrumAnalyzerBuilder::new()
    }

    /// Compute smoothed band magnitudes for one frame.
    ///
    /// The frame length must equal the configured FFT size. Output values
    /// are normalized to `0.0..=1.0` relative to the loudest band.
    pub fn analyze(&mut self, frame: &[f32]) -> Result<[f32; SPECTRUM_BANDS], SpectrumError> {
        if frame.len() != self.fft_size {
            return Err(SpectrumError::InvalidFrameSize {
                expected: self.fft_size,
                got: frame.len(),
            });
        }

        for (slot, (&s, &w)) in self
            .fft_buffer
            .iter_mut()
            .zip(frame.iter().zip(&self.window))
        {
            slot.re = s * w;
            slot.im = 0.0;
        }
        self.fft.process(&mut self.fft_buffer);

        let mut magnitudes = [0.0f32; SPECTRUM_BANDS];
        for (band, &(lo, hi)) in self.bands.iter().enumerate() {
            if lo >= hi {
                continue;
            }
            let sum: f32 = self.fft_buffer[lo..hi].iter().map(|c| c.norm()).sum();
            magnitudes[band] = sum / (hi - lo) as f32;
        }

        let peak = magnitudes.iter().cloned().fold(0.0f32, f32::max);
        if peak > 0.0 {
            for m in &mut magnitudes {
                *m /= peak;
            }
        }

        for (m, prev) in magnitudes.iter_mut().zip(self.previous.iter_mut()) {
            *m = *prev * self.smoothing + *m * (1.0 - self.smoothing);
            *prev = *m;
        }

        Ok(magnitudes)
    }

    /// Forget the smoothing state, for a new session.
    pub fn reset(&mut self) {
        self.previous = [0.0; SPECTRUM_BANDS];
    }
}

/// Log-spaced band edges from 20 Hz up to the Nyquist limit (capped at
/// 20 kHz), expressed as FFT bin ranges.
fn band_edges(sample_rate: u32, fft_size: usize) -> [(usize, usize); SPECTRUM_BANDS] {
    let bin_width = sample_rate as f32 / fft_size as f32;
    let max_bin = fft_size / 2;
    let min_freq = 20.0f32;
    let max_freq = (sample_rate as f32 / 2.0).min(20_000.0).max(min_freq * 2.0);
    let log_min = min_freq.ln();
    let log_span = max_freq.ln() - log_min;

    let mut edges = [(0usize, 0usize); SPECTRUM_BANDS];
    for (i, edge) in edges.iter_mut().enumerate() {
        let f_lo = (log_min + log_span * i as f32 / SPECTRUM_BANDS as f32).exp();
        let f_hi = (log_min + log_span * (i + 1) as f32 / SPECTRUM_BANDS as f32).exp();
        let lo = (f_lo / bin_width) as usize;
        let hi = ((f_hi / bin_width) as usize).min(max_bin).max(lo);
        *edge = (lo, hi);
    }
    edges
}
