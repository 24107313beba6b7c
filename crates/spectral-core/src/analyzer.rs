//! One-Sided Spectrum Analysis

use crate::error::{Result, SpectralError};
use crate::transform::{RustFftTransform, SpectralTransform};
use crate::validation::ensure_sampling_rate;
use rustfft::num_complex::Complex64;

/// Length of the one-sided half spectrum, `ceil(n / 2)`
pub fn one_sided_len(n: usize) -> usize {
    n.div_ceil(2)
}

/// Non-negative bin frequencies `k * sampling_rate / n` for the half spectrum
pub fn frequency_axis(n: usize, sampling_rate: f64) -> Vec<f64> {
    let resolution = sampling_rate / n as f64;
    (0..one_sided_len(n)).map(|k| k as f64 * resolution).collect()
}

/// Output of the forward stage
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// One-sided frequency axis (Hz), length `ceil(N/2)`
    pub frequencies: Vec<f64>,
    /// Amplitude-scaled magnitudes, same length as `frequencies`
    pub magnitudes: Vec<f64>,
    /// Full N-length coefficients carrying phase for reconstruction
    pub coefficients: Vec<Complex64>,
    /// Sampling rate the axis was derived from
    pub sampling_rate: f64,
}

impl Spectrum {
    /// Number of samples in the analyzed signal
    pub fn signal_len(&self) -> usize {
        self.coefficients.len()
    }

    /// Bin spacing (Hz)
    pub fn frequency_resolution(&self) -> f64 {
        self.sampling_rate / self.signal_len() as f64
    }

    /// Index, frequency and magnitude of the largest bin
    pub fn peak(&self) -> Option<(usize, f64, f64)> {
        self.magnitudes
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &m)| match best {
                Some((_, bm)) if bm >= m => best,
                _ => Some((i, m)),
            })
            .map(|(i, m)| (i, self.frequencies[i], m))
    }

    /// Split into `(frequencies, magnitudes, coefficients)`
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>, Vec<Complex64>) {
        (self.frequencies, self.magnitudes, self.coefficients)
    }
}

/// Forward-transform analyzer
pub struct SpectralAnalyzer<T: SpectralTransform = RustFftTransform> {
    transform: T,
}

impl SpectralAnalyzer<RustFftTransform> {
    /// Analyzer over the default `rustfft` transform
    pub fn new() -> Self {
        Self::with_transform(RustFftTransform::new())
    }
}

impl Default for SpectralAnalyzer<RustFftTransform> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SpectralTransform> SpectralAnalyzer<T> {
    /// Analyzer over a caller-supplied transform
    pub fn with_transform(transform: T) -> Self {
        Self { transform }
    }

    /// Compute the one-sided spectrum and the full coefficient sequence
    pub fn analyze(&mut self, signal: &[f64], sampling_rate: f64) -> Result<Spectrum> {
        if signal.is_empty() {
            return Err(SpectralError::EmptySignal);
        }
        ensure_sampling_rate(sampling_rate)?;

        let n = signal.len();
        let coefficients = self.transform.forward(signal);

        // DC has no mirror bin, every other bin folds in its conjugate twin
        let scale = 2.0 / n as f64;
        let magnitudes = coefficients
            .iter()
            .take(one_sided_len(n))
            .enumerate()
            .map(|(k, c)| {
                if k == 0 {
                    c.norm() / n as f64
                } else {
                    c.norm() * scale
                }
            })
            .collect();

        Ok(Spectrum {
            frequencies: frequency_axis(n, sampling_rate),
            magnitudes,
            coefficients,
            sampling_rate,
        })
    }
}

/// Forward stage with the default transform
pub fn perform_fft(signal: &[f64], sampling_rate: f64) -> Result<Spectrum> {
    SpectralAnalyzer::new().analyze(signal, sampling_rate)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::synth::generate_signal;
    use crate::timebase::TimeBase;
    use std::f64::consts::PI;

    /// Direct O(N^2) DFT used to exercise the transform seam
    pub(crate) struct NaiveDft;

    impl SpectralTransform for NaiveDft {
        fn forward(&mut self, signal: &[f64]) -> Vec<Complex64> {
            let n = signal.len();
            (0..n)
                .map(|k| {
                    signal.iter().enumerate().fold(Complex64::new(0.0, 0.0), |acc, (t, &x)| {
                        let angle = -2.0 * PI * (k * t) as f64 / n as f64;
                        acc + Complex64::from_polar(x, angle)
                    })
                })
                .collect()
        }

        fn inverse(&mut self, coefficients: &[Complex64]) -> Vec<Complex64> {
            let n = coefficients.len();
            (0..n)
                .map(|t| {
                    coefficients.iter().enumerate().fold(Complex64::new(0.0, 0.0), |acc, (k, &c)| {
                        let angle = 2.0 * PI * (k * t) as f64 / n as f64;
                        acc + c * Complex64::from_polar(1.0, angle)
                    }) / n as f64
                })
                .collect()
        }
    }

    #[test]
    fn test_pure_tone_peak() {
        let tb = TimeBase::new(1000.0, 1.0).unwrap();
        let signal = generate_signal(&tb, &[10.0], &[1.0]).unwrap();
        let spectrum = perform_fft(&signal, 1000.0).unwrap();

        let (idx, freq, mag) = spectrum.peak().unwrap();
        assert_eq!(idx, 10);
        assert!((freq - 10.0).abs() < 1e-9);
        assert!((mag - 1.0).abs() < 1e-9);

        for (k, &m) in spectrum.magnitudes.iter().enumerate() {
            if k != 10 {
                assert!(m < 1e-9, "bin {} leaked {}", k, m);
            }
        }
    }

    #[test]
    fn test_three_tone_scenario() {
        let tb = TimeBase::new(1000.0, 1.0).unwrap();
        let signal = generate_signal(&tb, &[5.0, 50.0, 120.0], &[1.0, 0.5, 0.3]).unwrap();
        let spectrum = perform_fft(&signal, 1000.0).unwrap();

        assert_eq!(spectrum.frequencies.len(), 500);
        assert_eq!(spectrum.magnitudes.len(), 500);
        assert_eq!(spectrum.coefficients.len(), 1000);

        for (bin, amp) in [(5, 1.0), (50, 0.5), (120, 0.3)] {
            assert!((spectrum.frequencies[bin] - bin as f64).abs() < 1e-9);
            assert!((spectrum.magnitudes[bin] - amp).abs() < 1e-9);
            assert!(spectrum.magnitudes[bin] > spectrum.magnitudes[bin - 1]);
            assert!(spectrum.magnitudes[bin] > spectrum.magnitudes[bin + 1]);
        }
    }

    #[test]
    fn test_dc_not_doubled() {
        let spectrum = perform_fft(&[3.0; 16], 16.0).unwrap();
        assert!((spectrum.magnitudes[0] - 3.0).abs() < 1e-12);
        assert!(spectrum.magnitudes[1..].iter().all(|&m| m < 1e-12));
    }

    #[test]
    fn test_single_sample() {
        let spectrum = perform_fft(&[-2.5], 100.0).unwrap();
        assert_eq!(spectrum.frequencies, vec![0.0]);
        assert_eq!(spectrum.magnitudes, vec![2.5]);
        assert_eq!(spectrum.coefficients, vec![Complex64::new(-2.5, 0.0)]);
    }

    #[test]
    fn test_odd_length_axis() {
        let spectrum = perform_fft(&[1.0, 2.0, 3.0, 4.0, 5.0], 10.0).unwrap();
        assert_eq!(spectrum.frequencies, vec![0.0, 2.0, 4.0]);
        assert!((spectrum.frequency_resolution() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_conjugate_symmetry() {
        let signal = [0.3, -1.2, 4.0, 2.2, -0.7, 0.0, 1.1];
        let spectrum = perform_fft(&signal, 7.0).unwrap();
        let n = spectrum.signal_len();
        for k in 1..n {
            let diff = spectrum.coefficients[n - k] - spectrum.coefficients[k].conj();
            assert!(diff.norm() < 1e-12);
        }
    }

    #[test]
    fn test_errors() {
        assert_eq!(perform_fft(&[], 100.0), Err(SpectralError::EmptySignal));
        assert_eq!(
            perform_fft(&[1.0, 2.0], 0.0),
            Err(SpectralError::InvalidSamplingRate(0.0))
        );
        assert!(matches!(
            perform_fft(&[1.0, 2.0], -10.0),
            Err(SpectralError::InvalidSamplingRate(_))
        ));
    }

    #[test]
    fn test_custom_transform_matches_default() {
        let signal = [0.1, 0.9, -0.4, 2.0, 1.5, -3.0];
        let expected = perform_fft(&signal, 6.0).unwrap();
        let actual = SpectralAnalyzer::with_transform(NaiveDft)
            .analyze(&signal, 6.0)
            .unwrap();

        for (a, b) in expected.magnitudes.iter().zip(&actual.magnitudes) {
            assert!((a - b).abs() < 1e-9);
        }
        for (a, b) in expected.coefficients.iter().zip(&actual.coefficients) {
            assert!((a - b).norm() < 1e-9);
        }
    }
}
