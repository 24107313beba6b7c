//! Result Presentation
//!
//! Sinks for a finished pipeline run:
//! - Columnar CSV export of the time-domain and spectrum tables
//! - JSON run manifest
//! - Dual-panel PNG (time-domain overlay, magnitude stems)

mod export;
mod plot;

pub use export::{write_manifest, CsvExporter, ExportedTables, RunManifest};
pub use plot::{PlotRenderer, PlotStyle};

use run_tracking::TrackingError;
use std::path::PathBuf;
use thiserror::Error;

/// Presenter errors
#[derive(Debug, Error)]
pub enum PresenterError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid plot dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error(transparent)]
    Tracking(#[from] TrackingError),
}

impl PresenterError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PresenterError::Io {
            path: path.into(),
            source,
        }
    }
}
