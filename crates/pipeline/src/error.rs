//! Pipeline Error Types

use result_presenter::PresenterError;
use run_tracking::TrackingError;
use spectral_core::SpectralError;
use thiserror::Error;

/// Errors that abort a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A core stage rejected its input
    #[error("Signal processing failed: {0}")]
    Spectral(#[from] SpectralError),

    /// Run context could not be set up
    #[error("Run tracking failed: {0}")]
    Tracking(#[from] TrackingError),

    /// Export or rendering failed
    #[error("Presentation failed: {0}")]
    Presenter(#[from] PresenterError),

    /// Configuration sources could not be read or merged
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
