// Chunk: docs/chunks/text_bookkeeping - Line index and undo history for an editable buffer
// Chunk: docs/chunks/line_index - Incremental line index
// Chunk: docs/chunks/edit_history - Coalescing, size-bounded undo history

//! pocket-edit-buffer: text bookkeeping for a mobile source editor.
//!
//! The host platform owns the rendered text; this crate owns what the host
//! needs to answer quickly after every keystroke:
//!
//! - [`LineIndex`]: offset ↔ line lookups, maintained incrementally from
//!   `(start, end, inserted)` edit descriptors.
//! - [`EditHistory`]: linear undo/redo of [`TextDelta`]s, folding rapid
//!   keystrokes into word-sized steps and capped at a character budget.
//! - [`Document`]: a gap buffer that keeps both in step, and replays
//!   history on undo/redo.
//!
//! All offsets count characters (Unicode scalar values), not bytes.
//!
//! # Example
//!
//! ```
//! use pocket_edit_buffer::{DirtyLines, Document};
//!
//! let mut doc = Document::from_str("hello\nworld");
//! assert_eq!(doc.line_for_offset(6), 1);
//!
//! let outcome = doc.insert(2, "\n");
//! assert_eq!(outcome.dirty, DirtyLines::FromLineToEnd(0));
//! assert_eq!(doc.line_count(), 3);
//!
//! let outcome = doc.undo().unwrap();
//! assert_eq!(outcome.caret, 2);
//! assert_eq!(doc.content(), "hello\nworld");
//! ```
//!
//! # Dirty Line Tracking
//!
//! Edits and replays return a [`DirtyLines`] value so the host can repaint
//! only what changed:
//!
//! - `DirtyLines::None` - nothing changed
//! - `DirtyLines::Single(line)` - one line's text changed, no line breaks moved
//! - `DirtyLines::FromLineToEnd(line)` - lines were split or joined

mod config;
mod document;
mod gap_buffer;
mod history;
mod line_index;
mod types;

pub use config::{HistoryConfig, DEFAULT_COALESCE_WINDOW_MS, DEFAULT_MAX_SIZE};
pub use document::{Document, EditOutcome};
pub use gap_buffer::GapBuffer;
pub use history::{classify, CharCategory, Coalesce, EditClass, EditHistory, TextDelta};
pub use line_index::{Line, LineIndex};
pub use types::{DirtyLines, Position};
