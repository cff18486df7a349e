//! Out-of-band editing of a single task's text in `$EDITOR`.
//!
//! The caller is responsible for suspending and restoring the terminal
//! around the call; this module only runs the subprocess against a guarded
//! temp file, which is removed on drop whatever the outcome.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::Command;

use thiserror::Error;

const DEFAULT_EDITOR: &str = "vim";

#[derive(Debug, Error)]
pub enum ExternalEditError {
    #[error("failed to prepare temp file: {0}")]
    TempFile(#[source] io::Error),
    #[error("failed to launch {editor}: {source}")]
    Launch {
        editor: String,
        #[source]
        source: io::Error,
    },
    #[error("{editor} exited with {status}")]
    Abnormal {
        editor: String,
        status: std::process::ExitStatus,
    },
    #[error("failed to read edited text: {0}")]
    ReadBack(#[source] io::Error),
}

/// Seeds a temp file with `text`, blocks on the editor, and reads the result
/// back trimmed of surrounding whitespace. `Ok(None)` means the user left the
/// file empty.
pub fn edit_text(text: &str) -> Result<Option<String>, ExternalEditError> {
    let editor = env::var("EDITOR")
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string());

    let mut file = tempfile::Builder::new()
        .prefix("the-todo-edit-")
        .suffix(".txt")
        .tempfile()
        .map_err(ExternalEditError::TempFile)?;
    file.write_all(text.as_bytes())
        .and_then(|_| file.flush())
        .map_err(ExternalEditError::TempFile)?;

    log::debug!("spawning {editor} on {}", file.path().display());
    let status = Command::new(&editor)
        .arg(file.path())
        .status()
        .map_err(|source| ExternalEditError::Launch {
            editor: editor.clone(),
            source,
        })?;
    if !status.success() {
        return Err(ExternalEditError::Abnormal { editor, status });
    }

    // Read through the path rather than the handle: editors commonly replace
    // the file instead of writing in place.
    let edited = fs::read_to_string(file.path()).map_err(ExternalEditError::ReadBack)?;
    let edited = edited.trim();
    Ok((!edited.is_empty()).then(|| edited.to_string()))
}
