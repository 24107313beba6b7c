//! Tapering Windows

use crate::error::SpectralError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Supported window shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    #[default]
    Hamming,
    Hanning,
    Blackman,
}

impl WindowKind {
    /// Window coefficients of length `n`
    pub fn coefficients(self, n: usize) -> Vec<f64> {
        match self {
            WindowKind::Hamming => hamming(n),
            WindowKind::Hanning => hanning(n),
            WindowKind::Blackman => blackman(n),
        }
    }

    /// Lowercase name as accepted by `FromStr`
    pub fn name(self) -> &'static str {
        match self {
            WindowKind::Hamming => "hamming",
            WindowKind::Hanning => "hanning",
            WindowKind::Blackman => "blackman",
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowKind {
    type Err = SpectralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hamming" => Ok(WindowKind::Hamming),
            "hanning" | "hann" => Ok(WindowKind::Hanning),
            "blackman" => Ok(WindowKind::Blackman),
            _ => Err(SpectralError::UnsupportedWindow(s.to_string())),
        }
    }
}

/// Evaluate a symmetric window `f(phase)` where `phase = 2*pi*i/(n-1)`
fn symmetric(n: usize, f: impl Fn(f64) -> f64) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let denom = (n - 1) as f64;
            (0..n).map(|i| f(2.0 * PI * i as f64 / denom)).collect()
        }
    }
}

/// Hamming window
pub fn hamming(n: usize) -> Vec<f64> {
    symmetric(n, |p| 0.54 - 0.46 * p.cos())
}

/// Hanning (Hann) window, zero at both ends
pub fn hanning(n: usize) -> Vec<f64> {
    symmetric(n, |p| 0.5 * (1.0 - p.cos()))
}

/// Blackman window
pub fn blackman(n: usize) -> Vec<f64> {
    // Endpoints evaluate to a tiny negative value in floating point
    symmetric(n, |p| (0.42 - 0.5 * p.cos() + 0.08 * (2.0 * p).cos()).max(0.0))
}

/// Multiply a signal by the chosen window
pub fn apply_window(signal: &[f64], kind: WindowKind) -> Vec<f64> {
    signal
        .iter()
        .zip(kind.coefficients(signal.len()))
        .map(|(s, w)| s * w)
        .collect()
}
