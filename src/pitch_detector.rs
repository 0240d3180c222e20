//! Pitch Detector
//!
//! Fundamental frequency estimation from one time-domain frame, using
//! normalized autocorrelation with amplitude clipping. Pure: the detector
//! holds configuration only, never signal state.

/// Builder for a [`PitchDetector`] to customize its thresholds.
pub struct PitchDetectorBuilder {
    silence_rms: f32,
    trim_threshold: f32,
    min_correlation: f32,
}

impl PitchDetectorBuilder {
    /// Start with the default thresholds:
    /// silence_rms = 0.01, trim_threshold = 0.2, min_correlation = 0.9.
    pub fn new() -> Self {
        PitchDetectorBuilder {
            silence_rms: 0.01,
            trim_threshold: 0.2,
            min_correlation: 0.9,
        }
    }

    /// Set the RMS level below which a frame counts as silence.
    pub fn silence_rms(mut self, value: f32) -> Self {
        self.silence_rms = value;
        self
    }

    /// Set the amplitude below which leading/trailing samples are cropped.
    pub fn trim_threshold(mut self, value: f32) -> Self {
        self.trim_threshold = value;
        self
    }

    /// Set the minimum peak correlation required to report a pitch.
    pub fn min_correlation(mut self, value: f32) -> Self {
        self.min_correlation = value;
        self
    }

    /// Build the `PitchDetector`.
    pub fn build(self) -> PitchDetector {
        PitchDetector {
            silence_rms: self.silence_rms,
            trim_threshold: self.trim_threshold,
            min_correlation: self.min_correlation,
        }
    }
}

impl Default for PitchDetectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Autocorrelation pitch detector for monophonic signals.
pub struct PitchDetector {
    silence_rms: f32,
    trim_threshold: f32,
    min_correlation: f32,
}

impl PitchDetector {
    /// Return a builder to customize the detection thresholds.
    pub fn builder() -> PitchDetectorBuilder {
        PitchDetectorBuilder::new()
    }

    /// Create a detector with the default thresholds.
    pub fn new() -> Self {
        PitchDetectorBuilder::new().build()
    }

    /// Estimate the fundamental frequency of `frame` in Hz.
    ///
    /// Returns `None` when the frame is silent (RMS below the silence
    /// threshold), when trimming leaves no usable range, or when no candidate
    /// lag reaches the minimum peak correlation.
    pub fn detect(&self, frame: &crate::SampleFrame<'_>) -> Option<f32> {
        let samples = frame.samples();
        let len = samples.len();
        if len < 2 {
            return None;
        }

        // Silence gate.
        let energy: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
        let rms = (energy / len as f64).sqrt();
        if rms < f64::from(self.silence_rms) {
            return None;
        }

        // Crop low-amplitude leading and trailing samples toward the center;
        // this stabilizes the correlation against attack/release tails.
        let half = len / 2;
        let mut left = 0;
        while left < half && samples[left].abs() < self.trim_threshold {
            left += 1;
        }
        let mut right = len - 1;
        while right > half && samples[right].abs() < self.trim_threshold {
            right -= 1;
        }
        if left >= right {
            return None;
        }

        // Normalized autocorrelation over all candidate lags in the trimmed
        // range. Sums run in f64: thousands of f32 products per lag.
        let mut best_correlation = 0.0f64;
        let mut best_offset = 0usize;
        for offset in left..=right {
            let terms = len - offset;
            let mut sum = 0.0f64;
            for (&a, &b) in samples[..terms].iter().zip(&samples[offset..]) {
                sum += f64::from(a) * f64::from(b);
            }
            let correlation = sum / terms as f64;
            if correlation > best_correlation {
                best_correlation = correlation;
                best_offset = offset;
            }
        }

        // A low peak means no clear periodicity; lag zero cannot be
        // converted into a frequency.
        if best_correlation > f64::from(self.min_correlation) && best_offset > 0 {
            Some(frame.sample_rate() as f32 / best_offset as f32)
        } else {
            None
        }
    }
}

impl Default for PitchDetector {
    fn default() -> Self {
        PitchDetector::new()
    }
}
