//! Report and artifact persistence.
//!
//! The session report is written to `<dir>/session_report.json` through a
//! temporary file renamed into place, so readers never observe a partially
//! written report. Artifacts land under `<dir>/artifacts/<step>/`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use resonance_core::error::{ResonanceError, ResonanceResult};

use crate::result::SessionReport;
use crate::step::{Artifact, ArtifactBody};

/// File name of the persisted session report.
pub const REPORT_FILE_NAME: &str = "session_report.json";

/// Directory (under the output directory) holding per-step artifacts.
pub const ARTIFACT_DIR_NAME: &str = "artifacts";

/// Serialize `report` and atomically place it at `<dir>/session_report.json`.
///
/// # Errors
/// `Serialization` when the report cannot be encoded, `Io` when the
/// directory, temporary file or rename fails.
pub fn write_report_atomic(report: &SessionReport, dir: &Path) -> ResonanceResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(report).map_err(|e| {
        error!("report serialization failed: {e}");
        ResonanceError::Serialization(format!("session report: {e}"))
    })?;

    let path = dir.join(REPORT_FILE_NAME);
    let temp_path = dir.join(format!(".{REPORT_FILE_NAME}.{}.tmp", report.session_id));
    fs::write(&temp_path, json.as_bytes()).map_err(|e| {
        error!(path = %temp_path.display(), "report write failed: {e}");
        ResonanceError::Io(e)
    })?;
    if let Err(e) = fs::rename(&temp_path, &path) {
        error!(path = %path.display(), "report rename failed: {e}");
        let _ = fs::remove_file(&temp_path);
        return Err(ResonanceError::Io(e));
    }

    info!(path = %path.display(), steps = report.steps.len(), "session report written");
    Ok(path)
}

/// Load a previously persisted report.
pub fn read_report(path: &Path) -> ResonanceResult<SessionReport> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write one step's artifacts; returns their paths relative to `dir`.
pub fn write_artifacts(
    dir: &Path,
    step_name: &str,
    artifacts: &[Artifact],
) -> ResonanceResult<Vec<String>> {
    if artifacts.is_empty() {
        return Ok(Vec::new());
    }
    let step_dir = dir.join(ARTIFACT_DIR_NAME).join(step_name);
    fs::create_dir_all(&step_dir)?;

    artifacts
        .iter()
        .map(|artifact| {
            let file_name = artifact.file_name();
            let contents = match &artifact.body {
                ArtifactBody::Json(value) => serde_json::to_string_pretty(value)?,
                ArtifactBody::Text { contents, .. } => contents.clone(),
            };
            fs::write(step_dir.join(&file_name), contents)?;
            debug!(step = step_name, file = %file_name, "artifact written");
            Ok(format!("{ARTIFACT_DIR_NAME}/{step_name}/{file_name}"))
        })
        .collect()
}
