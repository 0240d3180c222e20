//! Sample frame validation.
//!
//! All analysis entry points take a [`SampleFrame`], a borrowed view over one
//! frame of time-domain samples plus its sample rate. Malformed input is
//! rejected here, at construction, so the analysis functions downstream stay
//! total over every frame they ever see.

use thiserror::Error;

/// Errors raised when constructing a [`SampleFrame`].
#[derive(Debug, Error)]
pub enum FrameError {
    /// The sample slice was empty.
    #[error("sample frame is empty")]
    Empty,

    /// A sample was NaN or infinite.
    #[error("non-finite sample at index {index}")]
    NonFiniteSample {
        /// Index of the first offending sample.
        index: usize,
    },

    /// The sample rate was zero.
    #[error("sample rate must be positive")]
    InvalidSampleRate,
}

/// One frame of time-domain audio, consumed immediately by the analysis tick.
///
/// The view borrows the caller's buffer; nothing is retained between ticks.
#[derive(Debug, Clone, Copy)]
pub struct SampleFrame<'a> {
    samples: &'a [f32],
    sample_rate: u32,
}

impl<'a> SampleFrame<'a> {
    /// Validate and wrap a slice of samples at the given sample rate.
    ///
    /// Rejects empty frames, non-finite samples and a zero sample rate.
    pub fn new(samples: &'a [f32], sample_rate: u32) -> Result<Self, FrameError> {
        if samples.is_empty() {
            return Err(FrameError::Empty);
        }
        if sample_rate == 0 {
            return Err(FrameError::InvalidSampleRate);
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(FrameError::NonFiniteSample { index });
        }
        Ok(SampleFrame {
            samples,
            sample_rate,
        })
    }

    /// The validated samples.
    pub fn samples(&self) -> &'a [f32] {
        self.samples
    }

    /// The sample rate in Hz, always positive.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
