//! Error types for the analysis pipeline.
//!
//! `PipelineError` covers the fatal cases: the input report cannot be
//! loaded, or the output artifacts cannot be written. `ConversationError`
//! is per-folder and never aborts a run; evaluators fold it into the
//! folder's verdict notes.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal pipeline errors. Each variant names the file that failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input report missing or unreadable.
    #[error("failed to read validation report {path}: {source}")]
    ReportRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input report is not a valid `ValidationReport` document.
    #[error("validation report {path} is not valid JSON: {source}")]
    ReportParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Analysis could not be serialized.
    #[error("failed to serialize analysis output: {0}")]
    Serialize(#[from] serde_json::Error),

    /// An output artifact could not be written or moved into place.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a folder's `conversation.json` could not be used.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("conversation record missing")]
    Missing,

    #[error("conversation record unreadable: {0}")]
    Read(#[from] std::io::Error),

    #[error("conversation record malformed: {0}")]
    Parse(#[from] serde_json::Error),
}
