//! FFT Analysis Pipeline - Main Entry Point

use anyhow::Context;
use clap::Parser;
use pipeline::{init_logging, run_pipeline, PipelineConfig};
use run_tracking::RunContext;
use spectral_core::{StftConfig, WindowKind};
use std::path::PathBuf;
use tracing::info;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "fft-pipeline", version)]
#[command(
    about = "Synthesize a multi-tone signal, analyze its spectrum and verify reconstruction",
    long_about = None
)]
struct Args {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Root directory for run outputs
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Sampling rate (Hz)
    #[arg(long, value_name = "HZ")]
    sampling_rate: Option<f64>,

    /// Signal duration (seconds)
    #[arg(long, value_name = "SECONDS")]
    duration: Option<f64>,

    /// Component frequencies, comma separated
    #[arg(long, value_name = "HZ,...", value_delimiter = ',')]
    frequencies: Option<Vec<f64>>,

    /// Component amplitudes, comma separated
    #[arg(long, value_name = "AMP,...", value_delimiter = ',', allow_hyphen_values = true)]
    amplitudes: Option<Vec<f64>>,

    /// Experiment id prefix
    #[arg(long, value_name = "PREFIX")]
    prefix: Option<String>,

    /// Skip visualization.png
    #[arg(long)]
    no_plot: bool,

    /// Skip signal.csv / spectrum.csv
    #[arg(long)]
    no_csv: bool,

    /// Run the STFT stage (default framing unless set in the config file)
    #[arg(long)]
    stft: bool,

    /// STFT window: hamming, hanning, blackman
    #[arg(long, value_name = "WINDOW", requires = "stft")]
    window: Option<WindowKind>,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(rate) = self.sampling_rate {
            config.sampling_rate = rate;
        }
        if let Some(duration) = self.duration {
            config.duration = duration;
        }
        if let Some(frequencies) = &self.frequencies {
            config.frequencies = frequencies.clone();
        }
        if let Some(amplitudes) = &self.amplitudes {
            config.amplitudes = amplitudes.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.experiment_prefix = prefix.clone();
        }
        if self.no_plot {
            config.render_plot = false;
        }
        if self.no_csv {
            config.export_csv = false;
        }
        if self.stft {
            let stft = config.stft.get_or_insert_with(StftConfig::default);
            if let Some(window) = self.window {
                stft.window = window;
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.log_json);

    info!("=== FFT Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let mut config = PipelineConfig::load(args.config.as_deref())
        .context("failed to load configuration")?;
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;

    let ctx = RunContext::new(&config.output_dir, &config.experiment_prefix)?;
    let report = run_pipeline(&config, &ctx)
        .with_context(|| format!("run {} failed", ctx.run_id))?;

    info!(
        "Run {} finished: {} samples, max round-trip error {:e}",
        report.context.experiment_id,
        report.arrays.sample_count(),
        report.round_trip.max_error
    );
    for path in &report.artifacts {
        info!("  {}", path.display());
    }

    Ok(())
}
