//! Inverse-Transform Reconstruction

use crate::error::{Result, SpectralError};
use crate::transform::{RustFftTransform, SpectralTransform};
use rustfft::num_complex::Complex64;

/// Rebuilds a real time-domain signal from full spectral coefficients
pub struct SpectralReconstructor<T: SpectralTransform = RustFftTransform> {
    transform: T,
}

impl SpectralReconstructor<RustFftTransform> {
    /// Create a reconstructor backed by rustfft
    pub fn new() -> Self {
        Self::with_transform(RustFftTransform::new())
    }
}

impl Default for SpectralReconstructor<RustFftTransform> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SpectralTransform> SpectralReconstructor<T> {
    /// Create a reconstructor over a custom transform
    pub fn with_transform(transform: T) -> Self {
        Self { transform }
    }

    /// Inverse transform, keeping only the real part.
    ///
    /// The imaginary residue is discarded without inspection; it is rounding
    /// noise whenever the input is conjugate symmetric.
    pub fn reconstruct(&mut self, coefficients: &[Complex64]) -> Result<Vec<f64>> {
        if coefficients.is_empty() {
            return Err(SpectralError::EmptyCoefficients);
        }

        Ok(self
            .transform
            .inverse(coefficients)
            .into_iter()
            .map(|c| c.re)
            .collect())
    }
}

/// Inverse stage with the default transform
pub fn perform_ifft(coefficients: &[Complex64]) -> Result<Vec<f64>> {
    SpectralReconstructor::new().reconstruct(coefficients)
}
