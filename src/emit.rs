//! Writes the analysis JSON and checklist markdown.
//!
//! Both artifacts are staged as `*.tmp` siblings first and only renamed
//! into place once both staged writes succeeded, so a failed run leaves
//! the previous pair untouched.

use crate::error::PipelineError;
use crate::models::analysis::AnalysisOutput;
use std::fs;
use std::path::{Path, PathBuf};

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn stage(path: &Path, contents: &str) -> Result<PathBuf, PipelineError> {
    let write_err = |source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let tmp = staging_path(path);
    fs::write(&tmp, contents).map_err(write_err)?;
    Ok(tmp)
}

/// Persist `analysis` and `checklist`, replacing any previous artifacts.
pub fn write_artifacts(
    analysis: &AnalysisOutput,
    checklist: &str,
    analysis_path: &Path,
    checklist_path: &Path,
) -> Result<(), PipelineError> {
    let json = serde_json::to_string_pretty(analysis)?;
    let staged_analysis = stage(analysis_path, &json)?;
    let staged_checklist = match stage(checklist_path, checklist) {
        Ok(p) => p,
        Err(e) => {
            let _ = fs::remove_file(&staged_analysis);
            return Err(e);
        }
    };
    let moves = [
        (&staged_analysis, analysis_path),
        (&staged_checklist, checklist_path),
    ];
    for (i, (tmp, dst)) in moves.iter().enumerate() {
        if let Err(source) = fs::rename(tmp, dst) {
            // drop every staged file not yet moved
            for (left, _) in &moves[i..] {
                let _ = fs::remove_file(left);
            }
            return Err(PipelineError::Write {
                path: dst.to_path_buf(),
                source,
            });
        }
        tracing::info!(path = %dst.display(), "wrote artifact");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;

    #[test]
    fn test_writes_both_artifacts_and_replaces_previous() {
        let dir = tempdir().unwrap();
        let json_path = dir.path().join("out").join("analysis.json");
        let md_path = dir.path().join("out").join("checklist.md");
        let analysis = AnalysisOutput::new(Utc::now());

        write_artifacts(&analysis, "first", &json_path, &md_path).unwrap();
        write_artifacts(&analysis, "second", &json_path, &md_path).unwrap();

        assert_eq!(fs::read_to_string(&md_path).unwrap(), "second");
        let v: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert!(v["generatedAt"].is_string());
        assert!(v["reviewChecklist"].as_array().unwrap().is_empty());
        assert!(!staging_path(&json_path).exists());
        assert!(!staging_path(&md_path).exists());
    }

    #[test]
    fn test_failed_checklist_write_keeps_previous_analysis() {
        let dir = tempdir().unwrap();
        let json_path = dir.path().join("analysis.json");
        fs::write(&json_path, "previous").unwrap();
        // A regular file where a parent directory is expected makes staging fail.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let md_path = blocker.join("checklist.md");

        let err = write_artifacts(&AnalysisOutput::new(Utc::now()), "x", &json_path, &md_path)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Write { .. }));
        assert_eq!(fs::read_to_string(&json_path).unwrap(), "previous");
        assert!(!staging_path(&json_path).exists());
    }

    #[test]
    fn test_failed_rename_removes_staged_files() {
        let dir = tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file.
        let json_path = dir.path().join("analysis.json");
        fs::create_dir_all(json_path.join("occupied")).unwrap();
        let md_path = dir.path().join("checklist.md");

        let err = write_artifacts(&AnalysisOutput::new(Utc::now()), "x", &json_path, &md_path)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Write { ref path, .. } if path == &json_path));
        assert!(!staging_path(&json_path).exists());
        assert!(!staging_path(&md_path).exists());
        assert!(!md_path.exists());

        let ok_json = dir.path().join("second.json");
        let md_dir = dir.path().join("review.md");
        fs::create_dir_all(md_dir.join("occupied")).unwrap();
        let err = write_artifacts(&AnalysisOutput::new(Utc::now()), "x", &ok_json, &md_dir)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Write { ref path, .. } if path == &md_dir));
        assert!(ok_json.exists());
        assert!(!staging_path(&md_dir).exists());
    }
}
