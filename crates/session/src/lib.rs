// Chunk: docs/chunks/history_snapshot - Persisted undo history

//! pocket-edit-session: undo history that survives closing a document.
//!
//! A [`HistorySnapshot`] captures a [`Document`](pocket_edit_buffer::Document)'s
//! history together with a hash of its content. A [`SnapshotStore`] keeps one
//! JSON file per document. When the document is reopened,
//! [`restore_document`] reinstalls the history if the content is unchanged and
//! otherwise falls back to an empty history.
//!
//! # Example
//!
//! ```no_run
//! use pocket_edit_buffer::Document;
//! use pocket_edit_session::{restore_document, HistorySnapshot, SessionConfig};
//! use std::path::Path;
//!
//! let config = SessionConfig::load_or_default(Path::new("session.json"))?;
//! let store = config.open_store()?;
//!
//! let mut doc = Document::with_config("let x = 1;\n", &config.history);
//! doc.insert(10, " // one");
//! store.save(&HistorySnapshot::capture("src/lib.rs", &doc))?;
//!
//! let mut reopened = Document::with_config(&doc.content(), &config.history);
//! assert!(restore_document(&store, "src/lib.rs", &mut reopened));
//! # Ok::<(), pocket_edit_session::SessionError>(())
//! ```

mod config;
mod error;
mod snapshot;
mod store;

pub use config::SessionConfig;
pub use error::{Result, SessionError};
pub use snapshot::{content_hash, HistorySnapshot, SCHEMA_VERSION};
pub use store::{restore_document, SnapshotStore};
