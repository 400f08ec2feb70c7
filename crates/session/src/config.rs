// Chunk: docs/chunks/history_snapshot - Persisted undo history

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use pocket_edit_buffer::HistoryConfig;

use crate::error::Result;
use crate::store::SnapshotStore;

/// Editor-level settings for history and its persistence.
///
/// Loaded from JSON; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub history: HistoryConfig,
    /// Where snapshots live. `None` means [`SnapshotStore::default_dir`].
    pub snapshot_dir: Option<PathBuf>,
}

impl SessionConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no session config, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Opens the configured snapshot store.
    pub fn open_store(&self) -> Result<SnapshotStore> {
        match &self.snapshot_dir {
            Some(dir) => SnapshotStore::open(dir),
            None => SnapshotStore::open(SnapshotStore::default_dir()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;
    use tempfile::TempDir;

    #[test]
    fn test_partial_config_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("session.json");
        fs::write(&path, r#"{"history": {"coalesce_window_ms": 250}}"#).unwrap();

        let config = SessionConfig::load(&path).unwrap();
        assert_eq!(config.history.coalesce_window_ms, 250);
        assert_eq!(config.history.max_size, HistoryConfig::default().max_size);
        assert_eq!(config.snapshot_dir, None);
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.json");

        assert!(matches!(
            SessionConfig::load(&path),
            Err(SessionError::Io(_))
        ));
        assert_eq!(
            SessionConfig::load_or_default(&path).unwrap(),
            SessionConfig::default()
        );
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("session.json");
        fs::write(&path, "max_size = 3").unwrap();
        assert!(matches!(
            SessionConfig::load_or_default(&path),
            Err(SessionError::Json(_))
        ));
    }

    #[test]
    fn test_open_store_uses_configured_dir() {
        let temp = TempDir::new().unwrap();
        let config = SessionConfig {
            snapshot_dir: Some(temp.path().join("snapshots")),
            ..SessionConfig::default()
        };
        let store = config.open_store().unwrap();
        assert_eq!(store.dir(), temp.path().join("snapshots").as_path());
    }
}
