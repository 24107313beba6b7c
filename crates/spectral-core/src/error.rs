//! Spectral Pipeline Error Types

use thiserror::Error;

/// Errors raised at the boundary of each pipeline stage
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpectralError {
    /// Two arrays that must be aligned have different lengths
    #[error("Shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Time base has no instants
    #[error("Time base is empty")]
    EmptyInput,

    /// Signal handed to the analyzer has no samples
    #[error("Signal is empty")]
    EmptySignal,

    /// Coefficients handed to the reconstructor are empty
    #[error("Spectral coefficients are empty")]
    EmptyCoefficients,

    /// Sampling rate is zero, negative or not finite
    #[error("Invalid sampling rate: {0}")]
    InvalidSamplingRate(f64),

    /// Duration is negative or not finite
    #[error("Invalid duration: {0}")]
    InvalidDuration(f64),

    /// `duration * sampling_rate` exceeds what a sample buffer can address
    #[error("Requested {requested:e} samples, more than a buffer can hold")]
    TooManySamples { requested: f64 },

    /// Explicit instants are not strictly increasing with uniform spacing
    #[error("Non-uniform time base at index {index}: spacing {spacing}, expected {expected}")]
    NonUniformTimeBase {
        index: usize,
        spacing: f64,
        expected: f64,
    },

    /// Reconstruction drifted further from the original than allowed
    #[error("Round-trip error {max_error:e} exceeds tolerance {tolerance:e}")]
    ToleranceExceeded { max_error: f64, tolerance: f64 },

    /// Window name not recognised
    #[error("Unsupported window type: {0}")]
    UnsupportedWindow(String),

    /// STFT window/hop combination rejected
    #[error("Invalid STFT parameters: {0}")]
    InvalidStftParameters(&'static str),

    /// Signal shorter than one STFT frame
    #[error("Signal of {len} samples is shorter than window of {window_size}")]
    SignalTooShort { len: usize, window_size: usize },
}

/// Result alias for spectral operations
pub type Result<T> = std::result::Result<T, SpectralError>;
