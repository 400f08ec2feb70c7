// Chunk: docs/chunks/history_snapshot - Persisted undo history

use std::io;

use thiserror::Error;

/// Errors from saving, loading or restoring history snapshots.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed snapshot or config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot schema version mismatch (expected {expected}, found {found})")]
    SchemaVersion { expected: u32, found: u32 },

    /// The document changed since the snapshot was taken; its offsets no
    /// longer apply.
    #[error("Snapshot does not match the current document content")]
    ContentMismatch,

    /// The record contradicts itself or the content it claims to describe.
    #[error("Inconsistent snapshot: {0}")]
    Inconsistent(String),

    #[error("Could not determine the platform data directory")]
    NoDataDir,
}

pub type Result<T> = std::result::Result<T, SessionError>;
