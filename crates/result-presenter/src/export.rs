//! CSV and Manifest Export

use crate::PresenterError;
use chrono::{DateTime, Utc};
use run_tracking::RunContext;
use serde::{Deserialize, Serialize};
use spectral_core::{ComponentSpec, PipelineArrays, RoundTripReport};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// Header of the time-domain table
pub const SIGNAL_HEADER: &str = "time,original_signal,reconstructed_signal";
/// Header of the spectrum table
pub const SPECTRUM_HEADER: &str = "frequency,magnitude";
/// File name of the run manifest
pub const MANIFEST_FILE: &str = "manifest.json";

/// Paths of the written tables
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedTables {
    pub signal: PathBuf,
    pub spectrum: PathBuf,
}

/// Writes the aligned pipeline arrays as two CSV tables
#[derive(Debug, Clone)]
pub struct CsvExporter {
    signal_file: String,
    spectrum_file: String,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self {
            signal_file: "signal.csv".to_string(),
            spectrum_file: "spectrum.csv".to_string(),
        }
    }
}

impl CsvExporter {
    /// Create an exporter writing `signal.csv` and `spectrum.csv`
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the output file names
    pub fn with_file_names(
        signal_file: impl Into<String>,
        spectrum_file: impl Into<String>,
    ) -> Self {
        Self {
            signal_file: signal_file.into(),
            spectrum_file: spectrum_file.into(),
        }
    }

    /// Write `signal.csv` and `spectrum.csv` into the run directory
    pub fn export(
        &self,
        ctx: &RunContext,
        arrays: &PipelineArrays,
    ) -> Result<ExportedTables, PresenterError> {
        ctx.prepare()?;

        let signal = ctx.artifact_path(&self.signal_file);
        write_table(
            &signal,
            SIGNAL_HEADER,
            arrays
                .time_rows()
                .map(|(t, o, r)| format!("{},{},{}", t, o, r)),
        )?;
        info!(rows = arrays.sample_count(), "Wrote {}", signal.display());

        let spectrum = ctx.artifact_path(&self.spectrum_file);
        write_table(
            &spectrum,
            SPECTRUM_HEADER,
            arrays.spectrum_rows().map(|(f, m)| format!("{},{}", f, m)),
        )?;
        info!(rows = arrays.bin_count(), "Wrote {}", spectrum.display());

        Ok(ExportedTables { signal, spectrum })
    }
}

fn write_table(
    path: &Path,
    header: &str,
    rows: impl Iterator<Item = String>,
) -> Result<(), PresenterError> {
    let file = File::create(path).map_err(|e| PresenterError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", header).map_err(|e| PresenterError::io(path, e))?;
    let mut count = 0usize;
    for row in rows {
        writeln!(writer, "{}", row).map_err(|e| PresenterError::io(path, e))?;
        count += 1;
    }
    writer.flush().map_err(|e| PresenterError::io(path, e))?;

    debug!("Flushed {} rows to {}", count, path.display());
    Ok(())
}

/// Summary of a run, written next to its artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: Uuid,
    pub experiment_id: String,
    pub started_at: DateTime<Utc>,
    pub sampling_rate: f64,
    pub components: Vec<ComponentSpec>,
    pub samples: usize,
    pub bins: usize,
    pub round_trip: RoundTripReport,
    /// Frequency of the strongest spectral bin
    pub peak_frequency: Option<f64>,
    /// Artifact file names relative to the run directory
    pub artifacts: Vec<String>,
}

impl RunManifest {
    /// Summarize a verified run; artifacts are added as they are written
    pub fn new(
        ctx: &RunContext,
        sampling_rate: f64,
        components: &[ComponentSpec],
        arrays: &PipelineArrays,
        round_trip: RoundTripReport,
    ) -> Self {
        Self {
            run_id: ctx.run_id,
            experiment_id: ctx.experiment_id.clone(),
            started_at: ctx.started_at,
            sampling_rate,
            components: components.to_vec(),
            samples: arrays.sample_count(),
            bins: arrays.bin_count(),
            round_trip,
            peak_frequency: None,
            artifacts: Vec::new(),
        }
    }

    /// Record the strongest spectral bin
    pub fn with_peak_frequency(mut self, frequency: f64) -> Self {
        self.peak_frequency = Some(frequency);
        self
    }

    /// Record an artifact by its file name
    pub fn add_artifact(&mut self, path: &Path) {
        if let Some(name) = path.file_name() {
            self.artifacts.push(name.to_string_lossy().into_owned());
        }
    }
}

/// Write the manifest as pretty JSON into the run directory
pub fn write_manifest(ctx: &RunContext, manifest: &RunManifest) -> Result<PathBuf, PresenterError> {
    ctx.prepare()?;

    let path = ctx.artifact_path(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&path, json).map_err(|e| PresenterError::io(&path, e))?;

    info!("Wrote manifest {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    /// Context rooted in a fresh directory, removed when the guard drops
    fn temp_context() -> (TempDir, RunContext) {
        let base = tempdir().unwrap();
        let ctx = RunContext::new(base.path(), "TEST").unwrap();
        (base, ctx)
    }

    fn sample_arrays() -> PipelineArrays {
        PipelineArrays::new(
            vec![0.0, 0.25, 0.5, 0.75],
            vec![0.0, 1.0, 0.0, -1.0],
            vec![1e-17, 1.0, 0.0, -1.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn test_export_tables() {
        let (_base, ctx) = temp_context();
        let tables = CsvExporter::new().export(&ctx, &sample_arrays()).unwrap();

        let signal = std::fs::read_to_string(&tables.signal).unwrap();
        let lines: Vec<&str> = signal.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], SIGNAL_HEADER);
        assert_eq!(lines[1], "0,0,0.00000000000000001");
        assert_eq!(lines[4], "0.75,-1,-1");

        let spectrum = std::fs::read_to_string(&tables.spectrum).unwrap();
        assert_eq!(spectrum, "frequency,magnitude\n0,0\n1,1\n");
    }

    #[test]
    fn test_values_round_trip_through_text() {
        let (_base, ctx) = temp_context();
        let value = 0.1 + 0.2;
        let arrays =
            PipelineArrays::new(vec![value], vec![value], vec![value], vec![0.0], vec![value])
                .unwrap();
        let tables = CsvExporter::with_file_names("a.csv", "b.csv")
            .export(&ctx, &arrays)
            .unwrap();
        assert!(tables.signal.ends_with("a.csv"));

        let text = std::fs::read_to_string(&tables.signal).unwrap();
        let row = text.lines().nth(1).unwrap();
        let parsed: f64 = row.split(',').next().unwrap().parse().unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_manifest_json() {
        let (_base, ctx) = temp_context();
        let arrays = sample_arrays();
        let report = RoundTripReport {
            max_error: 1e-17,
            tolerance: 1e-9,
            samples: 4,
        };
        let components = [ComponentSpec {
            frequency: 1.0,
            amplitude: 1.0,
        }];

        let mut manifest = RunManifest::new(&ctx, 4.0, &components, &arrays, report)
            .with_peak_frequency(1.0);
        manifest.add_artifact(Path::new("/some/dir/signal.csv"));

        let path = write_manifest(&ctx, &manifest).unwrap();
        let loaded: RunManifest =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

        assert_eq!(loaded, manifest);
        assert_eq!(loaded.samples, 4);
        assert_eq!(loaded.bins, 2);
        assert_eq!(loaded.artifacts, vec!["signal.csv".to_string()]);
    }
}
