//! Pipeline settings

use crate::PipelineError;
use run_tracking::DEFAULT_PREFIX;
use serde::{Deserialize, Serialize};
use spectral_core::{ComponentSet, SpectralError, StftConfig, TimeBase};
use std::path::{Path, PathBuf};

/// Environment variable prefix, e.g. `FFT_PIPELINE_SAMPLING_RATE=2000`
pub const ENV_PREFIX: &str = "FFT_PIPELINE";

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Samples per second
    pub sampling_rate: f64,

    /// Signal duration (seconds)
    pub duration: f64,

    /// Component frequencies (Hz)
    pub frequencies: Vec<f64>,

    /// Component amplitudes, one per frequency
    pub amplitudes: Vec<f64>,

    /// Root directory for per-run output directories
    pub output_dir: PathBuf,

    /// Experiment id prefix
    pub experiment_prefix: String,

    /// Write signal.csv / spectrum.csv
    pub export_csv: bool,

    /// Render visualization.png
    pub render_plot: bool,

    /// Write manifest.json
    pub write_manifest: bool,

    /// Figure size in pixels
    pub plot_width: u32,
    pub plot_height: u32,

    /// Optional time-frequency analysis
    pub stft: Option<StftConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 1000.0,
            duration: 1.0,
            frequencies: vec![5.0, 50.0, 120.0],
            amplitudes: vec![1.0, 0.5, 0.3],
            output_dir: PathBuf::from("output"),
            experiment_prefix: DEFAULT_PREFIX.to_string(),
            export_csv: true,
            render_plot: true,
            write_manifest: true,
            plot_width: 1200,
            plot_height: 1000,
            stft: None,
        }
    }
}

impl PipelineConfig {
    /// Single sinusoid, no artifacts written
    pub fn single_tone(frequency: f64, amplitude: f64) -> Self {
        Self {
            frequencies: vec![frequency],
            amplitudes: vec![amplitude],
            export_csv: false,
            render_plot: false,
            write_manifest: false,
            ..Default::default()
        }
    }

    /// Layer defaults, an optional file and `FFT_PIPELINE_*` variables.
    ///
    /// The merged result is not validated; callers apply their own overrides
    /// first and then call [`PipelineConfig::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let loaded = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("frequencies")
                    .with_list_parse_key("amplitudes"),
            )
            .build()?
            .try_deserialize()?;

        Ok(loaded)
    }

    /// Time base described by `sampling_rate` and `duration`
    pub fn time_base(&self) -> Result<TimeBase, SpectralError> {
        TimeBase::new(self.sampling_rate, self.duration)
    }

    /// Components described by `frequencies` and `amplitudes`
    pub fn components(&self) -> Result<ComponentSet, SpectralError> {
        ComponentSet::new(&self.frequencies, &self.amplitudes)
    }

    /// Check everything that would make a run fail before it starts
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.time_base()?.is_empty() {
            return Err(SpectralError::EmptyInput.into());
        }
        self.components()?;
        if let Some(stft) = &self.stft {
            stft.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_three_tone_scenario() {
        let config = PipelineConfig::default();
        assert_eq!(config.frequencies, vec![5.0, 50.0, 120.0]);
        assert_eq!(config.amplitudes, vec![1.0, 0.5, 0.3]);
        assert!(config.validate().is_ok());
        assert_eq!(config.time_base().unwrap().len(), 1000);
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        let mismatched = PipelineConfig {
            frequencies: vec![1.0, 2.0, 3.0],
            amplitudes: vec![1.0, 2.0],
            ..Default::default()
        };
        assert!(matches!(
            mismatched.validate(),
            Err(PipelineError::Spectral(SpectralError::ShapeMismatch { .. }))
        ));

        let zero_rate = PipelineConfig {
            sampling_rate: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            zero_rate.validate(),
            Err(PipelineError::Spectral(SpectralError::InvalidSamplingRate(_)))
        ));

        let too_short = PipelineConfig {
            duration: 0.0001,
            ..Default::default()
        };
        assert!(matches!(
            too_short.validate(),
            Err(PipelineError::Spectral(SpectralError::EmptyInput))
        ));

        let bad_stft = PipelineConfig {
            stft: Some(StftConfig {
                hop_length: 0,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            bad_stft.validate(),
            Err(PipelineError::Spectral(SpectralError::InvalidStftParameters(_)))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
sampling_rate = 2000.0
frequencies = [100.0]
amplitudes = [2.0]
render_plot = false

[stft]
window_size = 128
hop_length = 32
window = "blackman"
"#
        )
        .unwrap();

        let config = PipelineConfig::load(Some(&path)).unwrap();

        assert_eq!(config.sampling_rate, 2000.0);
        assert_eq!(config.duration, 1.0);
        assert_eq!(config.frequencies, vec![100.0]);
        assert!(!config.render_plot);
        assert!(config.export_csv);

        let stft = config.stft.unwrap();
        assert_eq!(stft.window_size, 128);
        assert_eq!(stft.hop_length, 32);
        assert_eq!(stft.window, spectral_core::WindowKind::Blackman);
    }

    #[test]
    fn test_load_defers_validation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        std::fs::write(&path, r#"{ "frequencies": [1.0, 2.0], "amplitudes": [1.0] }"#).unwrap();

        let mut config = PipelineConfig::load(Some(&path)).unwrap();
        assert_eq!(config.frequencies, vec![1.0, 2.0]);
        assert!(matches!(
            config.validate(),
            Err(PipelineError::Spectral(SpectralError::ShapeMismatch { .. }))
        ));

        config.amplitudes = vec![1.0, 0.5];
        assert!(config.validate().is_ok());
    }
}
