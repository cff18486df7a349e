//! Persistence and reconciliation for the managed file.
//!
//! Tracks the last known modification time so the periodic check can tell
//! our own saves apart from edits made by other programs. A file that does
//! not exist yet loads as an empty document and is created on first save.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

use super::document::Document;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub struct Storage {
    path: PathBuf,
    last_modified: Option<SystemTime>,
}

impl Storage {
    pub fn new(path: PathBuf) -> Self {
        Storage {
            path,
            last_modified: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Reads and parses the file, refreshing the known modification time. A
    /// missing file yields an empty document with no timestamp.
    pub fn load(&mut self) -> Result<Document, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                self.last_modified = None;
                return Ok(Document::default());
            }
            Err(err) => return Err(err.into()),
        };
        let document = Document::from_text(&text);
        self.last_modified = fs::metadata(&self.path)?.modified().ok();
        log::debug!(
            "loaded {} items from {}",
            document.len(),
            self.path.display()
        );
        Ok(document)
    }

    /// Writes the document and refreshes the known modification time so the
    /// next periodic check does not mistake our own save for an external
    /// change.
    pub fn save(&mut self, document: &Document) -> Result<(), StorageError> {
        fs::write(&self.path, document.to_text())?;
        self.last_modified = fs::metadata(&self.path)?.modified().ok();
        log::debug!("saved {} items to {}", document.len(), self.path.display());
        Ok(())
    }

    /// Returns whether the file on disk is strictly newer than the last load
    /// or save. A file that has not appeared yet counts as unchanged.
    pub fn externally_modified(&self) -> Result<bool, StorageError> {
        let metadata = match fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(err.into()),
        };
        let Ok(modified) = metadata.modified() else {
            return Ok(false);
        };
        Ok(match self.last_modified {
            // We have never seen the file: it appearing is a change.
            None => true,
            Some(known) => modified > known,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        (dir, path)
    }

    #[test]
    fn missing_file_loads_empty_without_timestamp() {
        let (_dir, path) = temp_path("todo.md");
        let mut storage = Storage::new(path);
        assert!(storage.load().unwrap().is_empty());
        assert!(storage.last_modified.is_none());
    }

    #[test]
    fn save_creates_the_file_lazily() {
        let (_dir, path) = temp_path("todo.md");
        let mut storage = Storage::new(path.clone());
        let document = Document::from_text("- [ ] first\n");
        storage.save(&document).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "- [ ] first\n");
        assert!(storage.last_modified.is_some());
    }

    #[test]
    fn empty_document_saves_zero_bytes() {
        let (_dir, path) = temp_path("todo.md");
        let mut storage = Storage::new(path.clone());
        storage.save(&Document::default()).unwrap();
        assert_eq!(fs::read(&path).unwrap().len(), 0);
    }

    #[test]
    fn load_round_trips_saved_text() {
        let (_dir, path) = temp_path("todo.md");
        fs::write(&path, "- [ ] a\r\n## B\r\n- [x] c\r\n").unwrap();
        let mut storage = Storage::new(path);
        let document = storage.load().unwrap();
        assert_eq!(document.len(), 3);
        storage.save(&document).unwrap();
        let reloaded = storage.load().unwrap();
        assert_eq!(reloaded, document);
    }

    #[test]
    fn own_save_is_not_an_external_change() {
        let (_dir, path) = temp_path("todo.md");
        let mut storage = Storage::new(path);
        storage.save(&Document::from_text("- [ ] a\n")).unwrap();
        assert!(!storage.externally_modified().unwrap());
    }

    #[test]
    fn file_appearing_counts_as_changed() {
        let (_dir, path) = temp_path("todo.md");
        let mut storage = Storage::new(path.clone());
        storage.load().unwrap();
        assert!(!storage.externally_modified().unwrap());
        fs::write(&path, "- [ ] from elsewhere\n").unwrap();
        assert!(storage.externally_modified().unwrap());
    }

    #[test]
    fn missing_file_never_reports_changes() {
        let (_dir, path) = temp_path("absent.md");
        let storage = Storage::new(path);
        assert!(!storage.externally_modified().unwrap());
    }

    #[test]
    fn file_name_is_the_final_component() {
        let (_dir, path) = temp_path("todo.md");
        let storage = Storage::new(path);
        assert_eq!(storage.file_name(), "todo.md");
    }
}
