//! Numeric Contract Checks
//!
//! Stage-boundary guards, round-trip verification, energy bookkeeping and the
//! aligned column set handed to presenters.

use crate::analyzer::one_sided_len;
use crate::error::{Result, SpectralError};
use serde::{Deserialize, Serialize};

/// Relative bound on round-trip drift for double precision
pub const ROUND_TRIP_RELATIVE_TOLERANCE: f64 = 1e-9;

/// Reject zero, negative and non-finite sampling rates
pub fn ensure_sampling_rate(sampling_rate: f64) -> Result<()> {
    if sampling_rate.is_finite() && sampling_rate > 0.0 {
        Ok(())
    } else {
        Err(SpectralError::InvalidSamplingRate(sampling_rate))
    }
}

/// Require `actual == expected`
pub fn ensure_same_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(SpectralError::ShapeMismatch {
            what,
            expected,
            actual,
        })
    }
}

/// Largest element-wise absolute difference over the common prefix
pub fn max_abs_error(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Round-trip tolerance scaled by the signal's peak magnitude.
///
/// The relative factor never drops below `N` ulps, so long transforms keep
/// room for accumulated rounding; an all-zero signal gets a zero bound.
pub fn round_trip_tolerance(signal: &[f64]) -> f64 {
    let peak = signal.iter().map(|v| v.abs()).fold(0.0, f64::max);
    let ulps = signal.len() as f64 * f64::EPSILON;
    peak * ROUND_TRIP_RELATIVE_TOLERANCE.max(ulps)
}

/// Outcome of a successful round-trip check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundTripReport {
    /// Worst absolute sample error
    pub max_error: f64,
    /// Bound the error was checked against
    pub tolerance: f64,
    /// Samples compared
    pub samples: usize,
}

/// Check that `reconstructed` reproduces `original` within tolerance
pub fn verify_round_trip(original: &[f64], reconstructed: &[f64]) -> Result<RoundTripReport> {
    if original.is_empty() {
        return Err(SpectralError::EmptySignal);
    }
    ensure_same_len("reconstructed signal", original.len(), reconstructed.len())?;

    let max_error = max_abs_error(original, reconstructed);
    let tolerance = round_trip_tolerance(original);
    if max_error > tolerance {
        return Err(SpectralError::ToleranceExceeded {
            max_error,
            tolerance,
        });
    }

    Ok(RoundTripReport {
        max_error,
        tolerance,
        samples: original.len(),
    })
}

/// Mean square of the signal
pub fn signal_energy(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().map(|v| v * v).sum::<f64>() / signal.len() as f64
}

/// Mean-square estimate from a one-sided magnitude spectrum.
///
/// Sinusoid bins carry peak amplitude, so their power is `mag^2 / 2`; the DC
/// bin contributes `mag^2`. The Nyquist bin of even-length signals lies
/// outside the half spectrum, making this a lower bound in that case.
pub fn spectral_energy(magnitudes: &[f64]) -> f64 {
    match magnitudes.split_first() {
        Some((dc, rest)) => dc * dc + rest.iter().map(|m| m * m / 2.0).sum::<f64>(),
        None => 0.0,
    }
}

/// Length-consistent columns for plotting and export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineArrays {
    time: Vec<f64>,
    original: Vec<f64>,
    reconstructed: Vec<f64>,
    frequencies: Vec<f64>,
    magnitudes: Vec<f64>,
}

impl PipelineArrays {
    /// Bundle the five arrays, requiring the time-domain trio to share N
    /// and the spectrum pair to share `ceil(N/2)`.
    pub fn new(
        time: Vec<f64>,
        original: Vec<f64>,
        reconstructed: Vec<f64>,
        frequencies: Vec<f64>,
        magnitudes: Vec<f64>,
    ) -> Result<Self> {
        let n = time.len();
        if n == 0 {
            return Err(SpectralError::EmptyInput);
        }
        ensure_same_len("original signal", n, original.len())?;
        ensure_same_len("reconstructed signal", n, reconstructed.len())?;
        ensure_same_len("frequency axis", one_sided_len(n), frequencies.len())?;
        ensure_same_len("magnitude spectrum", frequencies.len(), magnitudes.len())?;

        Ok(Self {
            time,
            original,
            reconstructed,
            frequencies,
            magnitudes,
        })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn original(&self) -> &[f64] {
        &self.original
    }

    pub fn reconstructed(&self) -> &[f64] {
        &self.reconstructed
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    /// Time-domain row count (N)
    pub fn sample_count(&self) -> usize {
        self.time.len()
    }

    /// Spectrum row count (M)
    pub fn bin_count(&self) -> usize {
        self.frequencies.len()
    }

    /// `(time, original, reconstructed)` rows
    pub fn time_rows(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.time
            .iter()
            .zip(&self.original)
            .zip(&self.reconstructed)
            .map(|((&t, &o), &r)| (t, o, r))
    }

    /// `(frequency, magnitude)` rows
    pub fn spectrum_rows(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies
            .iter()
            .zip(&self.magnitudes)
            .map(|(&f, &m)| (f, m))
    }
}
