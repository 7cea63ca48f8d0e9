//! Presence checks for the files every dataset folder must carry.
//!
//! Results are never cached: files may change between runs. Stat failures
//! degrade to a negative result instead of aborting the run.

use crate::error::ConversationError;
use crate::models::analysis::{FileCheckResult, FolderFiles};
use serde_json::Value as Json;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const COMPONENTS_TS: &str = "components.ts";
pub const CANVAS_HTML: &str = "canvas.html";
pub const CONVERSATION_JSON: &str = "conversation.json";

/// Check that `<root>/<folder_name>/<filename>` exists and is non-empty.
pub fn check(root: &Path, folder_name: &str, filename: &str) -> FileCheckResult {
    let path = root.join(folder_name).join(filename);
    let result = match fs::metadata(&path) {
        Ok(meta) if !meta.is_file() => {
            FileCheckResult::absent("Error checking file: not a regular file")
        }
        Ok(meta) if meta.len() == 0 => FileCheckResult::absent("File is empty"),
        Ok(meta) => FileCheckResult::present(meta.len()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            FileCheckResult::absent("File does not exist")
        }
        Err(e) => FileCheckResult::absent(format!("Error checking file: {}", e)),
    };
    if !result.exists {
        tracing::debug!(
            path = %path.display(),
            reason = result.reason.as_deref().unwrap_or_default(),
            "required file unavailable"
        );
    }
    result
}

/// Run `check` for all three required files of a folder.
pub fn check_folder(root: &Path, folder_name: &str) -> FolderFiles {
    FolderFiles {
        components_ts: check(root, folder_name, COMPONENTS_TS),
        canvas_html: check(root, folder_name, CANVAS_HTML),
        conversation_json: check(root, folder_name, CONVERSATION_JSON),
    }
}

/// Load and parse a folder's conversation record.
pub fn load_conversation(root: &Path, folder_name: &str) -> Result<Json, ConversationError> {
    let path = root.join(folder_name).join(CONVERSATION_JSON);
    let data = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(ConversationError::Missing),
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&data)?)
}
