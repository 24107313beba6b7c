//! Sum-of-Sinusoids Signal Synthesis

use crate::error::{Result, SpectralError};
use crate::timebase::TimeBase;
use crate::validation::ensure_same_len;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// One sinusoidal component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    /// Frequency (Hz)
    pub frequency: f64,
    /// Peak amplitude (negative inverts the component)
    pub amplitude: f64,
}

/// Ordered set of components with matching frequency/amplitude lengths
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentSet {
    components: Vec<ComponentSpec>,
}

impl ComponentSet {
    /// Pair up frequencies and amplitudes
    pub fn new(frequencies: &[f64], amplitudes: &[f64]) -> Result<Self> {
        ensure_same_len("amplitudes", frequencies.len(), amplitudes.len())?;
        let components = frequencies
            .iter()
            .zip(amplitudes)
            .map(|(&frequency, &amplitude)| ComponentSpec {
                frequency,
                amplitude,
            })
            .collect();
        Ok(Self { components })
    }

    /// Components in declaration order
    pub fn components(&self) -> &[ComponentSpec] {
        &self.components
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the set has no components
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl From<Vec<ComponentSpec>> for ComponentSet {
    fn from(components: Vec<ComponentSpec>) -> Self {
        Self { components }
    }
}

/// Produces sampled waveforms from a component set
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalSynthesizer;

impl SignalSynthesizer {
    /// Evaluate `sum(a_i * sin(2*pi*f_i*t))` at every instant
    pub fn synthesize(&self, time_base: &TimeBase, components: &ComponentSet) -> Result<Vec<f64>> {
        if time_base.is_empty() {
            return Err(SpectralError::EmptyInput);
        }

        let signal = time_base
            .instants()
            .iter()
            .map(|&t| {
                components
                    .components()
                    .iter()
                    .map(|c| c.amplitude * (2.0 * PI * c.frequency * t).sin())
                    .sum()
            })
            .collect();

        Ok(signal)
    }
}

/// Synthesize a signal from parallel frequency/amplitude slices
pub fn generate_signal(
    time_base: &TimeBase,
    frequencies: &[f64],
    amplitudes: &[f64],
) -> Result<Vec<f64>> {
    let components = ComponentSet::new(frequencies, amplitudes)?;
    SignalSynthesizer.synthesize(time_base, &components)
}
