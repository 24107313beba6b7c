//! Pipeline run orchestration

use crate::{PipelineConfig, PipelineError};
use result_presenter::{write_manifest, CsvExporter, PlotRenderer, RunManifest};
use run_tracking::RunContext;
use serde::{Deserialize, Serialize};
use spectral_core::{
    compute_stft, verify_round_trip, PipelineArrays, RoundTripReport, SignalSynthesizer,
    SpectralAnalyzer, SpectralReconstructor, Spectrum, DEFAULT_DB_RANGE,
};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Peaks weaker than this fraction of the strongest bin are treated as noise
const PEAK_NOISE_FLOOR: f64 = 1e-6;

/// Local maximum of a magnitude spectrum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralPeak {
    pub index: usize,
    pub frequency: f64,
    pub magnitude: f64,
}

/// Condensed STFT result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StftSummary {
    pub frames: usize,
    pub bins: usize,
    /// Bin with the highest mean spectrogram level
    pub dominant_frequency: f64,
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub context: RunContext,
    pub arrays: PipelineArrays,
    pub round_trip: RoundTripReport,
    /// Strongest peaks, largest first
    pub peaks: Vec<SpectralPeak>,
    pub stft: Option<StftSummary>,
    /// Written files, in write order
    pub artifacts: Vec<PathBuf>,
}

/// Up to `count` local maxima of the magnitude spectrum, largest first
pub fn detect_peaks(spectrum: &Spectrum, count: usize) -> Vec<SpectralPeak> {
    let mags = &spectrum.magnitudes;
    let strongest = mags.iter().cloned().fold(0.0, f64::max);
    let floor = strongest * PEAK_NOISE_FLOOR;

    let mut peaks: Vec<SpectralPeak> = (0..mags.len())
        .filter(|&i| {
            let m = mags[i];
            let rises = i == 0 || m > mags[i - 1];
            let falls = i + 1 == mags.len() || m >= mags[i + 1];
            m > floor && rises && falls
        })
        .map(|i| SpectralPeak {
            index: i,
            frequency: spectrum.frequencies[i],
            magnitude: mags[i],
        })
        .collect();

    peaks.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
    peaks.truncate(count);
    peaks
}

/// Execute one run: synthesize, analyze, reconstruct, verify, then hand the
/// aligned arrays to the enabled sinks.
pub fn run_pipeline(
    config: &PipelineConfig,
    ctx: &RunContext,
) -> Result<PipelineReport, PipelineError> {
    info!(
        run_id = %ctx.run_id,
        experiment_id = %ctx.experiment_id,
        "Starting pipeline run"
    );

    let time_base = config.time_base()?;
    let components = config.components()?;
    let sampling_rate = time_base.sampling_rate();

    let signal = SignalSynthesizer.synthesize(&time_base, &components)?;
    info!(
        samples = signal.len(),
        components = components.len(),
        "Synthesized signal at {} Hz",
        sampling_rate
    );

    let spectrum = SpectralAnalyzer::new().analyze(&signal, sampling_rate)?;
    debug!(
        bins = spectrum.magnitudes.len(),
        resolution_hz = spectrum.frequency_resolution(),
        "Computed forward transform"
    );

    let reconstructed = SpectralReconstructor::new().reconstruct(&spectrum.coefficients)?;
    let round_trip = verify_round_trip(&signal, &reconstructed)?;
    info!(
        max_error = round_trip.max_error,
        tolerance = round_trip.tolerance,
        "Reconstruction verified"
    );

    let peaks = detect_peaks(&spectrum, components.len().max(1));
    for peak in &peaks {
        info!(
            "Peak at {:.3} Hz (bin {}): magnitude {:.4}",
            peak.frequency, peak.index, peak.magnitude
        );
    }

    let stft = match &config.stft {
        Some(stft_config) => {
            let stft = compute_stft(&signal, sampling_rate, stft_config)?;
            let mean = stft.mean_power_db(DEFAULT_DB_RANGE);
            let dominant = mean
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map(|(k, _)| stft.frequencies[k])
                .unwrap_or(0.0);
            let (frames, bins) = stft.shape();
            info!(frames, bins, window = %stft_config.window, "Computed STFT");
            Some(StftSummary {
                frames,
                bins,
                dominant_frequency: dominant,
            })
        }
        None => None,
    };

    let peak_frequency = peaks.first().map(|p| p.frequency);
    let arrays = PipelineArrays::new(
        time_base.instants().to_vec(),
        signal,
        reconstructed,
        spectrum.frequencies,
        spectrum.magnitudes,
    )?;

    let mut artifacts = Vec::new();

    if config.export_csv {
        let tables = CsvExporter::new().export(ctx, &arrays)?;
        artifacts.push(tables.signal);
        artifacts.push(tables.spectrum);
    }

    if config.render_plot {
        let renderer = PlotRenderer::new(config.plot_width, config.plot_height)?;
        artifacts.push(renderer.render(ctx, &arrays)?);
    }

    if config.write_manifest {
        let mut manifest = RunManifest::new(
            ctx,
            sampling_rate,
            components.components(),
            &arrays,
            round_trip,
        );
        if let Some(frequency) = peak_frequency {
            manifest = manifest.with_peak_frequency(frequency);
        }
        for path in &artifacts {
            manifest.add_artifact(path);
        }
        artifacts.push(write_manifest(ctx, &manifest)?);
    }

    if artifacts.is_empty() {
        warn!("All sinks disabled, nothing written");
    }

    info!(artifacts = artifacts.len(), "Pipeline run complete");

    Ok(PipelineReport {
        context: ctx.clone(),
        arrays,
        round_trip,
        peaks,
        stft,
        artifacts,
    })
}
