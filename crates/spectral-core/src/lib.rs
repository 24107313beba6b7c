//! Spectral Analysis Core
//!
//! Pure, stateless pipeline stages:
//! - Sum-of-sinusoids synthesis over a uniform time base
//! - Forward transform to a one-sided magnitude spectrum
//! - Inverse transform back to the time domain
//! - Round-trip and shape validation for downstream presenters
//!
//! Nothing here logs or touches the filesystem.

mod analyzer;
mod error;
mod reconstructor;
mod stft;
mod synth;
mod timebase;
mod transform;
mod validation;
mod window;

pub use analyzer::{frequency_axis, one_sided_len, perform_fft, SpectralAnalyzer, Spectrum};
pub use error::{Result, SpectralError};
pub use reconstructor::{perform_ifft, SpectralReconstructor};
pub use stft::{compute_stft, compute_stft_with, Stft, StftConfig, DEFAULT_DB_RANGE};
pub use synth::{generate_signal, ComponentSet, ComponentSpec, SignalSynthesizer};
pub use timebase::TimeBase;
pub use transform::{RustFftTransform, SpectralTransform};
pub use validation::{
    ensure_same_len, ensure_sampling_rate, max_abs_error, round_trip_tolerance, signal_energy,
    spectral_energy, verify_round_trip, PipelineArrays, RoundTripReport,
    ROUND_TRIP_RELATIVE_TOLERANCE,
};
pub use window::{apply_window, blackman, hamming, hanning, WindowKind};

pub use rustfft::num_complex::Complex64;
