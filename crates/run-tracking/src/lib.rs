//! Run Tracking
//!
//! Every pipeline run carries an explicit [`RunContext`]:
//! - Date-stamped experiment id (`EXP_20240131`, `EXP_20240131_visualize`)
//! - Random run id and start timestamp
//! - Per-run output directory handed to export collaborators
//!
//! There are no global counters; two contexts never share state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Default experiment id prefix
pub const DEFAULT_PREFIX: &str = "EXP";

/// Run tracking error types
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Failed to create output directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid experiment prefix: {0:?}")]
    InvalidPrefix(String),
}

/// Build `"{prefix}_{YYYYMMDD}"`, or `"{prefix}_{YYYYMMDD}_{function_name}"`
pub fn experiment_id(prefix: &str, function_name: Option<&str>, date: DateTime<Utc>) -> String {
    let date_str = date.format("%Y%m%d");
    match function_name {
        Some(name) if !name.is_empty() => format!("{}_{}_{}", prefix, date_str, name),
        _ => format!("{}_{}", prefix, date_str),
    }
}

/// Identity and output location of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunContext {
    /// Unique run id
    pub run_id: Uuid,
    /// Date-stamped experiment id
    pub experiment_id: String,
    /// Run start (UTC)
    pub started_at: DateTime<Utc>,
    /// Directory all artifacts of this run are written to
    pub output_dir: PathBuf,
}

impl RunContext {
    /// New run starting now with a random id.
    ///
    /// The output directory is derived but not created; see [`RunContext::prepare`].
    pub fn new(base_dir: impl AsRef<Path>, prefix: &str) -> Result<Self, TrackingError> {
        Self::at(base_dir, prefix, Utc::now(), Uuid::new_v4())
    }

    /// Run with a fixed start time and id
    pub fn at(
        base_dir: impl AsRef<Path>,
        prefix: &str,
        started_at: DateTime<Utc>,
        run_id: Uuid,
    ) -> Result<Self, TrackingError> {
        validate_prefix(prefix)?;

        let experiment_id = experiment_id(prefix, None, started_at);
        let short_id = &run_id.simple().to_string()[..8];
        let dir_name = format!(
            "{}_{}_{}",
            experiment_id,
            started_at.format("%H%M%S"),
            short_id
        );

        Ok(Self {
            run_id,
            experiment_id,
            started_at,
            output_dir: base_dir.as_ref().join(dir_name),
        })
    }

    /// Create the output directory (and parents) if missing
    pub fn prepare(&self) -> Result<&Path, TrackingError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| TrackingError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        info!(
            run_id = %self.run_id,
            experiment_id = %self.experiment_id,
            "Prepared output directory {}",
            self.output_dir.display()
        );
        Ok(&self.output_dir)
    }

    /// Path of a named artifact inside the run directory
    pub fn artifact_path(&self, file_name: &str) -> PathBuf {
        let path = self.output_dir.join(file_name);
        debug!("Artifact path: {}", path.display());
        path
    }

    /// Experiment id suffixed with the producing function, for labels
    pub fn labeled(&self, function_name: &str) -> String {
        format!("{}_{}", self.experiment_id, function_name)
    }
}

fn validate_prefix(prefix: &str) -> Result<(), TrackingError> {
    let valid = !prefix.is_empty()
        && prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(TrackingError::InvalidPrefix(prefix.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 31, 14, 5, 9).unwrap()
    }

    #[test]
    fn test_experiment_id_format() {
        let id = experiment_id("TEST", Some("test_function"), fixed_time());
        assert_eq!(id, "TEST_20240131_test_function");

        let id = experiment_id("EXP", None, fixed_time());
        assert_eq!(id, "EXP_20240131");

        let id = experiment_id("EXP", Some(""), fixed_time());
        assert_eq!(id, "EXP_20240131");
    }

    #[test]
    fn test_context_paths() {
        let run_id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let ctx = RunContext::at("output", "EXP", fixed_time(), run_id).unwrap();

        assert_eq!(ctx.experiment_id, "EXP_20240131");
        assert_eq!(
            ctx.output_dir,
            PathBuf::from("output").join("EXP_20240131_140509_67e55044")
        );
        assert_eq!(
            ctx.artifact_path("signal.csv"),
            ctx.output_dir.join("signal.csv")
        );
        assert_eq!(ctx.labeled("visualize_results"), "EXP_20240131_visualize_results");
    }

    #[test]
    fn test_contexts_are_independent() {
        let a = RunContext::new("output", DEFAULT_PREFIX).unwrap();
        let b = RunContext::new("output", DEFAULT_PREFIX).unwrap();
        assert_ne!(a.run_id, b.run_id);
        assert_ne!(a.output_dir, b.output_dir);
    }

    #[test]
    fn test_invalid_prefix() {
        assert!(matches!(
            RunContext::new("output", ""),
            Err(TrackingError::InvalidPrefix(_))
        ));
        assert!(matches!(
            RunContext::new("output", "../escape"),
            Err(TrackingError::InvalidPrefix(_))
        ));
    }

    #[test]
    fn test_prepare_creates_directory() {
        let base = tempdir().unwrap();
        let ctx = RunContext::new(base.path().join("runs"), "EXP").unwrap();
        assert!(!ctx.output_dir.exists());

        let dir = ctx.prepare().unwrap();
        assert!(dir.is_dir());
        assert!(dir.starts_with(base.path()));
    }
}
