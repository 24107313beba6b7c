//! Forward/Inverse Transform Primitive
//!
//! The pipeline only talks to [`SpectralTransform`]; [`RustFftTransform`] is the
//! default implementation backed by `rustfft`.

use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;

/// Narrow interface over a discrete Fourier transform implementation
pub trait SpectralTransform {
    /// Unnormalized forward transform of a real signal (N complex outputs)
    fn forward(&mut self, signal: &[f64]) -> Vec<Complex64>;

    /// Inverse transform normalized by `1/N`, so `inverse(forward(x)) == x`
    fn inverse(&mut self, coefficients: &[Complex64]) -> Vec<Complex64>;
}

/// `rustfft`-backed transform with a cached planner
pub struct RustFftTransform {
    planner: FftPlanner<f64>,
}

impl RustFftTransform {
    /// Create a transform with an empty plan cache
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }
}

impl Default for RustFftTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectralTransform for RustFftTransform {
    fn forward(&mut self, signal: &[f64]) -> Vec<Complex64> {
        let mut buffer: Vec<Complex64> = signal.iter().map(|&v| Complex64::new(v, 0.0)).collect();
        if buffer.is_empty() {
            return buffer;
        }

        let fft = self.planner.plan_fft_forward(buffer.len());
        fft.process(&mut buffer);
        buffer
    }

    fn inverse(&mut self, coefficients: &[Complex64]) -> Vec<Complex64> {
        let mut buffer = coefficients.to_vec();
        if buffer.is_empty() {
            return buffer;
        }

        let n = buffer.len();
        let ifft = self.planner.plan_fft_inverse(n);
        ifft.process(&mut buffer);

        // rustfft leaves the inverse unscaled
        let scale = 1.0 / n as f64;
        for c in buffer.iter_mut() {
            *c *= scale;
        }
        buffer
    }
}
