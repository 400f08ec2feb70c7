// Chunk: docs/chunks/history_snapshot - Persisted undo history

//! Directory of snapshot files, one per document.
//!
//! Files are named by the SHA-256 of the document id, so arbitrary ids
//! (paths, URIs) map to safe, fixed-length file names. Writes are atomic:
//! the JSON goes to a temp file which is then renamed over the target.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pocket_edit_buffer::Document;

use crate::error::{Result, SessionError};
use crate::snapshot::{hex_digest, HistorySnapshot};

/// Application name used for the data directory.
const APP_NAME: &str = "pocket-edit";

/// Subdirectory of the app data directory holding snapshots.
const HISTORY_DIRNAME: &str = "history";

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// `<data dir>/pocket-edit/history`.
    pub fn default_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir().ok_or(SessionError::NoDataDir)?;
        Ok(data_dir.join(APP_NAME).join(HISTORY_DIRNAME))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot file for `document_id`.
    pub fn path_for(&self, document_id: &str) -> PathBuf {
        self.dir
            .join(format!("{}.json", hex_digest(document_id.as_bytes())))
    }

    /// Writes `snapshot`, replacing any previous one for the same document.
    pub fn save(&self, snapshot: &HistorySnapshot) -> Result<()> {
        let path = self.path_for(&snapshot.document_id);
        let json = serde_json::to_string_pretty(snapshot)?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(
            document_id = %snapshot.document_id,
            path = %path.display(),
            entries = snapshot.entries.len(),
            "saved history snapshot"
        );
        Ok(())
    }

    /// Reads the snapshot for `document_id`; `Ok(None)` if none was saved.
    pub fn load(&self, document_id: &str) -> Result<Option<HistorySnapshot>> {
        let path = self.path_for(document_id);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Deletes the snapshot for `document_id`. Missing files are fine.
    pub fn remove(&self, document_id: &str) -> Result<()> {
        match fs::remove_file(self.path_for(document_id)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

/// Loads and installs the saved history for `document_id`.
///
/// Returns `true` if a history was restored. Any failure (no snapshot,
/// unreadable file, stale content) leaves the document with an empty
/// history so editing can continue.
pub fn restore_document(store: &SnapshotStore, document_id: &str, document: &mut Document) -> bool {
    let snapshot = match store.load(document_id) {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => {
            document.history_mut().clear();
            return false;
        }
        Err(err) => {
            tracing::warn!(document_id, error = %err, "failed to load history snapshot");
            document.history_mut().clear();
            return false;
        }
    };

    match snapshot.restore_into(document) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(document_id, error = %err, "discarding history snapshot");
            false
        }
    }
}
