//! Uniform Sampling Time Base

use crate::error::{Result, SpectralError};
use crate::validation::ensure_sampling_rate;

/// Relative deviation allowed between explicit instant spacing and 1/sampling_rate
const SPACING_TOLERANCE: f64 = 1e-6;

/// Guard against `duration * rate` landing just under an integer
const SAMPLE_COUNT_EPSILON: f64 = 1e-9;

/// Largest sample count whose `f64` buffer fits in the address space
const MAX_SAMPLES: f64 = (isize::MAX as usize / std::mem::size_of::<f64>()) as f64;

/// Ordered, uniformly spaced sample instants
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBase {
    instants: Vec<f64>,
    sampling_rate: f64,
}

impl TimeBase {
    /// Build `floor(duration * sampling_rate)` instants starting at zero,
    /// excluding the end point.
    pub fn new(sampling_rate: f64, duration: f64) -> Result<Self> {
        ensure_sampling_rate(sampling_rate)?;
        if !duration.is_finite() || duration < 0.0 {
            return Err(SpectralError::InvalidDuration(duration));
        }

        let requested = (duration * sampling_rate + SAMPLE_COUNT_EPSILON).floor();
        if requested > MAX_SAMPLES {
            return Err(SpectralError::TooManySamples { requested });
        }
        let n = requested as usize;
        let instants = (0..n).map(|i| i as f64 / sampling_rate).collect();

        Ok(Self {
            instants,
            sampling_rate,
        })
    }

    /// Wrap explicit instants, checking they advance by `1 / sampling_rate`
    pub fn from_instants(instants: Vec<f64>, sampling_rate: f64) -> Result<Self> {
        ensure_sampling_rate(sampling_rate)?;

        let expected = 1.0 / sampling_rate;
        for (i, pair) in instants.windows(2).enumerate() {
            let spacing = pair[1] - pair[0];
            let deviation = (spacing - expected).abs() / expected;
            if !(spacing > 0.0) || deviation > SPACING_TOLERANCE {
                return Err(SpectralError::NonUniformTimeBase {
                    index: i + 1,
                    spacing,
                    expected,
                });
            }
        }

        Ok(Self {
            instants,
            sampling_rate,
        })
    }

    /// Sample instants
    pub fn instants(&self) -> &[f64] {
        &self.instants
    }

    /// Number of instants
    pub fn len(&self) -> usize {
        self.instants.len()
    }

    /// Whether the time base holds no instants
    pub fn is_empty(&self) -> bool {
        self.instants.is_empty()
    }

    /// Samples per unit time
    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    /// Spacing between consecutive instants
    pub fn spacing(&self) -> f64 {
        1.0 / self.sampling_rate
    }

    /// Covered duration (`len * spacing`)
    pub fn duration(&self) -> f64 {
        self.len() as f64 * self.spacing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_second_at_1khz() {
        let tb = TimeBase::new(1000.0, 1.0).unwrap();
        assert_eq!(tb.len(), 1000);
        assert_eq!(tb.instants()[0], 0.0);
        assert!((tb.instants()[999] - 0.999).abs() < 1e-12);
        assert!((tb.duration() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fractional_duration_rounds_down() {
        let tb = TimeBase::new(100.0, 0.29).unwrap();
        assert_eq!(tb.len(), 29);

        let tb = TimeBase::new(10.0, 0.05).unwrap();
        assert!(tb.is_empty());
    }

    #[test]
    fn test_invalid_rate_and_duration() {
        assert_eq!(
            TimeBase::new(0.0, 1.0),
            Err(SpectralError::InvalidSamplingRate(0.0))
        );
        assert!(matches!(
            TimeBase::new(-5.0, 1.0),
            Err(SpectralError::InvalidSamplingRate(_))
        ));
        assert!(matches!(
            TimeBase::new(100.0, -1.0),
            Err(SpectralError::InvalidDuration(_))
        ));
        assert!(matches!(
            TimeBase::new(100.0, f64::NAN),
            Err(SpectralError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_oversized_request_is_typed_error() {
        assert_eq!(
            TimeBase::new(1e300, 1.0),
            Err(SpectralError::TooManySamples { requested: 1e300 })
        );
        assert!(matches!(
            TimeBase::new(f64::MAX, 10.0),
            Err(SpectralError::TooManySamples { .. })
        ));
    }

    #[test]
    fn test_from_instants_accepts_uniform() {
        let tb = TimeBase::from_instants(vec![0.5, 0.75, 1.0, 1.25], 4.0).unwrap();
        assert_eq!(tb.len(), 4);
        assert_eq!(tb.spacing(), 0.25);
    }

    #[test]
    fn test_from_instants_rejects_gaps_and_reversals() {
        let err = TimeBase::from_instants(vec![0.0, 0.25, 0.75], 4.0).unwrap_err();
        assert!(matches!(err, SpectralError::NonUniformTimeBase { index: 2, .. }));

        let err = TimeBase::from_instants(vec![1.0, 0.75], 4.0).unwrap_err();
        assert!(matches!(err, SpectralError::NonUniformTimeBase { index: 1, .. }));
    }

    #[test]
    fn test_from_instants_allows_empty_and_single() {
        assert!(TimeBase::from_instants(vec![], 10.0).unwrap().is_empty());
        assert_eq!(TimeBase::from_instants(vec![3.0], 10.0).unwrap().len(), 1);
    }
}
