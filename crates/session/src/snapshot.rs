// Chunk: docs/chunks/history_snapshot - Persisted undo history

//! Serializable form of a document's undo history.
//!
//! A snapshot records the deltas, the undo/redo cursor and the budget, plus a
//! SHA-256 hash of the document content at capture time. Deltas address the
//! content by offset, so a snapshot is only restored onto byte-identical
//! content; anything else is rejected and the history starts empty.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use pocket_edit_buffer::{Document, EditHistory, HistoryConfig, TextDelta};

use crate::error::{Result, SessionError};

/// Current schema version for snapshot files.
///
/// Increment this when making breaking changes to the snapshot format.
pub const SCHEMA_VERSION: u32 = 1;

/// Lowercase hex SHA-256 digest of `text`.
pub fn content_hash(text: &str) -> String {
    hex_digest(text.as_bytes())
}

pub(crate) fn hex_digest(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    /// Schema version for forward compatibility.
    pub schema_version: u32,
    /// Caller-chosen identifier, usually the document's path or URI.
    pub document_id: String,
    /// [`content_hash`] of the document when captured.
    pub content_hash: String,
    pub cursor: usize,
    pub max_size: usize,
    pub entries: Vec<TextDelta>,
}

impl HistorySnapshot {
    /// Captures `document`'s current history.
    pub fn capture(document_id: impl Into<String>, document: &Document) -> Self {
        let history = document.history();
        Self {
            schema_version: SCHEMA_VERSION,
            document_id: document_id.into(),
            content_hash: content_hash(&document.content()),
            cursor: history.cursor(),
            max_size: history.max_size(),
            entries: history.entries().cloned().collect(),
        }
    }

    /// Installs this history on `document`.
    ///
    /// On any rejection the document's history is cleared and the reason
    /// returned; the document's content is never touched. The restored
    /// history keeps the document's coalescing window.
    pub fn restore_into(self, document: &mut Document) -> Result<()> {
        match self.validate(document) {
            Ok(history) => {
                tracing::debug!(
                    document_id = %self.document_id,
                    entries = history.len(),
                    cursor = history.cursor(),
                    "restored undo history"
                );
                *document.history_mut() = history;
                Ok(())
            }
            Err(err) => {
                document.history_mut().clear();
                Err(err)
            }
        }
    }

    fn validate(&self, document: &Document) -> Result<EditHistory> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(SessionError::SchemaVersion {
                expected: SCHEMA_VERSION,
                found: self.schema_version,
            });
        }
        if self.content_hash != content_hash(&document.content()) {
            return Err(SessionError::ContentMismatch);
        }

        if self.cursor > self.entries.len() {
            return Err(SessionError::Inconsistent(format!(
                "cursor {} beyond {} entries",
                self.cursor,
                self.entries.len()
            )));
        }
        check_entries_fit(&self.entries, self.cursor, document.len())?;

        let config = HistoryConfig {
            max_size: self.max_size,
            ..document.history().config()
        };
        EditHistory::from_parts(self.entries.clone(), self.cursor, &config).ok_or_else(|| {
            SessionError::Inconsistent(format!("cursor {} out of range", self.cursor))
        })
    }
}

/// Walks the undo entries backwards from the current length, then the
/// redo entries forwards, rejecting any delta whose span does not fit the
/// length the buffer would have at that step.
fn check_entries_fit(entries: &[TextDelta], cursor: usize, len: usize) -> Result<()> {
    let out_of_range = |index: usize, delta: &TextDelta, len: usize| {
        SessionError::Inconsistent(format!(
            "entry {index} at position {} does not fit a buffer of {len} characters",
            delta.position
        ))
    };

    let mut undo_len = len;
    for (index, delta) in entries[..cursor].iter().enumerate().rev() {
        let inserted = delta.inserted_text.chars().count();
        match delta.position.checked_add(inserted) {
            Some(end) if end <= undo_len => {}
            _ => return Err(out_of_range(index, delta, undo_len)),
        }
        undo_len = undo_len - inserted + delta.removed_text.chars().count();
    }

    let mut redo_len = len;
    for (index, delta) in entries.iter().enumerate().skip(cursor) {
        let removed = delta.removed_text.chars().count();
        match delta.position.checked_add(removed) {
            Some(end) if end <= redo_len => {}
            _ => return Err(out_of_range(index, delta, redo_len)),
        }
        redo_len = redo_len - removed + delta.inserted_text.chars().count();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edited_document() -> Document {
        let mut doc = Document::from_str("fn main() {}\n");
        doc.insert(11, "\n    run();\n");
        doc.delete(0, 3);
        doc.undo();
        doc
    }

    #[test]
    fn test_content_hash_is_sha256_hex() {
        assert_eq!(
            content_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(content_hash("abc").len(), 64);
        assert_ne!(content_hash("abc"), content_hash("abd"));
    }

    #[test]
    fn test_capture_records_history() {
        let doc = edited_document();
        let snapshot = HistorySnapshot::capture("main.rs", &doc);

        assert_eq!(snapshot.schema_version, SCHEMA_VERSION);
        assert_eq!(snapshot.document_id, "main.rs");
        assert_eq!(snapshot.cursor, 1);
        assert_eq!(snapshot.entries.len(), 2);
        assert_eq!(snapshot.content_hash, content_hash(&doc.content()));
    }

    #[test]
    fn test_restore_onto_matching_content() {
        let doc = edited_document();
        let snapshot = HistorySnapshot::capture("main.rs", &doc);

        let mut reopened = Document::from_str(&doc.content());
        snapshot.restore_into(&mut reopened).unwrap();
        assert_eq!(reopened.history().cursor(), 1);
        assert!(reopened.history().can_redo());

        reopened.redo().unwrap();
        assert_eq!(reopened.content(), "main() {\n    run();\n}\n");
        reopened.undo().unwrap();
        reopened.undo().unwrap();
        assert_eq!(reopened.content(), "fn main() {}\n");
    }

    #[test]
    fn test_restore_rejects_modified_content() {
        let doc = edited_document();
        let snapshot = HistorySnapshot::capture("main.rs", &doc);

        let mut modified = Document::from_str("fn main() { changed }\n");
        modified.insert(0, "// ");
        let err = snapshot.restore_into(&mut modified).unwrap_err();
        assert!(matches!(err, SessionError::ContentMismatch));
        assert!(modified.history().is_empty());
        assert_eq!(modified.content(), "// fn main() { changed }\n");
    }

    #[test]
    fn test_restore_rejects_future_schema() {
        let doc = edited_document();
        let mut snapshot = HistorySnapshot::capture("main.rs", &doc);
        snapshot.schema_version = SCHEMA_VERSION + 1;

        let mut reopened = Document::from_str(&doc.content());
        let err = snapshot.restore_into(&mut reopened).unwrap_err();
        assert!(matches!(
            err,
            SessionError::SchemaVersion { expected: 1, found: 2 }
        ));
        assert!(reopened.history().is_empty());
    }

    #[test]
    fn test_restore_rejects_cursor_past_entries() {
        let doc = edited_document();
        let mut snapshot = HistorySnapshot::capture("main.rs", &doc);
        snapshot.cursor = 7;

        let mut reopened = Document::from_str(&doc.content());
        let err = snapshot.restore_into(&mut reopened).unwrap_err();
        assert!(matches!(err, SessionError::Inconsistent(_)));
        assert!(reopened.history().is_empty());
    }

    #[test]
    fn test_restore_rejects_entries_outside_content() {
        let doc = Document::from_str("abc");
        let far = HistorySnapshot {
            schema_version: SCHEMA_VERSION,
            document_id: "abc.txt".to_string(),
            content_hash: content_hash("abc"),
            cursor: 1,
            max_size: 1024,
            entries: vec![TextDelta::new(usize::MAX, "", "x")],
        };
        let mut reopened = doc.clone();
        assert!(matches!(
            far.restore_into(&mut reopened),
            Err(SessionError::Inconsistent(_))
        ));
        assert!(reopened.undo().is_none());

        let past_end = HistorySnapshot {
            entries: vec![TextDelta::new(50, "q", "zz")],
            ..HistorySnapshot::capture("abc.txt", &doc)
        };
        let mut reopened = doc.clone();
        assert!(past_end.restore_into(&mut reopened).is_err());
        assert!(reopened.undo().is_none());
        assert_eq!(reopened.content(), "abc");
    }

    #[test]
    fn test_restore_checks_each_step_of_the_replay() {
        // "ab" -> "abc" -> "abcd": undoing needs 3 characters before the
        // older entry, so an older entry reaching past 3 is rejected.
        let doc = Document::from_str("abcd");
        let mut snapshot = HistorySnapshot::capture("abcd.txt", &doc);
        snapshot.cursor = 2;
        snapshot.entries = vec![TextDelta::new(2, "", "c"), TextDelta::new(3, "", "d")];
        let mut reopened = doc.clone();
        snapshot.clone().restore_into(&mut reopened).unwrap();
        reopened.undo();
        reopened.undo();
        assert_eq!(reopened.content(), "ab");

        snapshot.entries[0] = TextDelta::new(3, "", "c");
        let mut reopened = doc.clone();
        assert!(matches!(
            snapshot.restore_into(&mut reopened),
            Err(SessionError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_restore_checks_redo_entries_forward() {
        let doc = Document::from_str("ab");
        let mut snapshot = HistorySnapshot::capture("ab.txt", &doc);
        snapshot.cursor = 0;
        snapshot.entries = vec![TextDelta::new(2, "", "cd"), TextDelta::new(3, "d", "D")];
        let mut reopened = doc.clone();
        snapshot.clone().restore_into(&mut reopened).unwrap();
        reopened.redo();
        reopened.redo();
        assert_eq!(reopened.content(), "abcD");

        snapshot.entries[1] = TextDelta::new(4, "d", "D");
        let mut reopened = doc.clone();
        assert!(snapshot.restore_into(&mut reopened).is_err());
        assert!(reopened.history().is_empty());
    }

    #[test]
    fn test_json_serialization_roundtrip() {
        let snapshot = HistorySnapshot::capture("main.rs", &edited_document());
        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        assert!(json.contains("\"removed_text\""));
        let parsed: HistorySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
