//! FFT Analysis Pipeline
//!
//! Chains synthesis, analysis, reconstruction and presentation for one run,
//! and hosts the configuration and logging setup used by the `fft-pipeline`
//! binary.

mod error;
mod runner;
mod settings;

pub use error::PipelineError;
pub use runner::{detect_peaks, run_pipeline, PipelineReport, SpectralPeak, StftSummary};
pub use settings::{PipelineConfig, ENV_PREFIX};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging (INFO, or DEBUG when verbose; optional JSON lines)
pub fn init_logging(verbose: bool, json: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let result = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }
}
