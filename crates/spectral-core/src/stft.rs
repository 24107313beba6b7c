//! Short-Time Fourier Transform
//!
//! Offline, whole-signal framing: each frame is windowed and forward
//! transformed, keeping the `window_size / 2 + 1` non-negative bins.

use crate::error::{Result, SpectralError};
use crate::transform::{RustFftTransform, SpectralTransform};
use crate::validation::ensure_sampling_rate;
use crate::window::WindowKind;
use rustfft::num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Default dynamic range of a spectrogram (dB)
pub const DEFAULT_DB_RANGE: f64 = 60.0;

/// STFT framing parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StftConfig {
    /// Frame length in samples
    pub window_size: usize,
    /// Samples between frame starts
    pub hop_length: usize,
    /// Taper applied to each frame
    pub window: WindowKind,
}

impl Default for StftConfig {
    fn default() -> Self {
        Self {
            window_size: 256,
            hop_length: 64,
            window: WindowKind::Hamming,
        }
    }
}

impl StftConfig {
    /// Reject empty frames, empty hops and hops that skip samples
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(SpectralError::InvalidStftParameters("window_size must be positive"));
        }
        if self.hop_length == 0 {
            return Err(SpectralError::InvalidStftParameters("hop_length must be positive"));
        }
        if self.hop_length > self.window_size {
            return Err(SpectralError::InvalidStftParameters(
                "hop_length must be less than or equal to window_size",
            ));
        }
        Ok(())
    }

    /// Bins kept per frame
    pub fn bin_count(&self) -> usize {
        self.window_size / 2 + 1
    }

    /// Frames that fit in a signal of `len` samples
    pub fn frame_count(&self, len: usize) -> usize {
        if len < self.window_size {
            0
        } else {
            1 + (len - self.window_size) / self.hop_length
        }
    }
}

/// Time-frequency matrix (frames x bins)
#[derive(Debug, Clone, PartialEq)]
pub struct Stft {
    /// Start time of each frame
    pub times: Vec<f64>,
    /// Bin frequencies
    pub frequencies: Vec<f64>,
    /// One row of `frequencies.len()` coefficients per frame
    pub frames: Vec<Vec<Complex64>>,
}

impl Stft {
    /// `(frames, bins)`
    pub fn shape(&self) -> (usize, usize) {
        (self.frames.len(), self.frequencies.len())
    }

    /// Power in dB relative to the strongest cell, clamped to `-db_range`
    pub fn spectrogram(&self, db_range: f64) -> Vec<Vec<f64>> {
        let power_db: Vec<Vec<f64>> = self
            .frames
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| 10.0 * c.norm_sqr().max(f64::EPSILON).log10())
                    .collect()
            })
            .collect();

        let peak = power_db
            .iter()
            .flatten()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        let floor = peak - db_range;

        power_db
            .into_iter()
            .map(|row| row.into_iter().map(|db| db.max(floor) - peak).collect())
            .collect()
    }

    /// Mean spectrogram level per bin across frames
    pub fn mean_power_db(&self, db_range: f64) -> Vec<f64> {
        let spectrogram = self.spectrogram(db_range);
        let frames = spectrogram.len().max(1) as f64;
        (0..self.frequencies.len())
            .map(|k| spectrogram.iter().map(|row| row[k]).sum::<f64>() / frames)
            .collect()
    }
}

/// Frame, window and transform a signal with the default transform
pub fn compute_stft(signal: &[f64], sampling_rate: f64, config: &StftConfig) -> Result<Stft> {
    compute_stft_with(&mut RustFftTransform::new(), signal, sampling_rate, config)
}

/// Frame, window and transform a signal with a caller-supplied transform
pub fn compute_stft_with<T: SpectralTransform>(
    transform: &mut T,
    signal: &[f64],
    sampling_rate: f64,
    config: &StftConfig,
) -> Result<Stft> {
    config.validate()?;
    ensure_sampling_rate(sampling_rate)?;
    if signal.len() < config.window_size {
        return Err(SpectralError::SignalTooShort {
            len: signal.len(),
            window_size: config.window_size,
        });
    }

    let bins = config.bin_count();
    let frame_count = config.frame_count(signal.len());
    let window = config.window.coefficients(config.window_size);

    let times = (0..frame_count)
        .map(|i| (i * config.hop_length) as f64 / sampling_rate)
        .collect();
    let frequencies = (0..bins)
        .map(|k| k as f64 * sampling_rate / config.window_size as f64)
        .collect();

    let frames = (0..frame_count)
        .map(|i| {
            let start = i * config.hop_length;
            let windowed: Vec<f64> = signal[start..start + config.window_size]
                .iter()
                .zip(&window)
                .map(|(s, w)| s * w)
                .collect();
            let mut row = transform.forward(&windowed);
            row.truncate(bins);
            row
        })
        .collect();

    Ok(Stft {
        times,
        frequencies,
        frames,
    })
}
