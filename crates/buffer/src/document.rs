// Chunk: docs/chunks/document_replay - Buffer, line index and history kept in step

//! A text buffer that keeps its [`LineIndex`] and [`EditHistory`] in sync.
//!
//! Every user edit goes through [`Document::apply_edit`], which replaces the
//! span in the gap buffer, updates the line index incrementally and records
//! the delta. Undo and redo replay recorded deltas through the same path
//! without recording them again.

use std::time::Instant;

use crate::config::HistoryConfig;
use crate::gap_buffer::GapBuffer;
use crate::history::{EditHistory, TextDelta};
use crate::line_index::LineIndex;
use crate::types::DirtyLines;

/// Result of an edit or a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    /// Lines to repaint.
    pub dirty: DirtyLines,
    /// Where the caret belongs afterwards.
    pub caret: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    buffer: GapBuffer,
    line_index: LineIndex,
    history: EditHistory,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Self {
        Self::with_config(text, &HistoryConfig::default())
    }

    pub fn with_config(text: &str, config: &HistoryConfig) -> Self {
        Self {
            buffer: GapBuffer::from_str(text),
            line_index: LineIndex::from_text(text),
            history: EditHistory::with_config(config),
        }
    }

    /// Replaces the whole content (e.g. a file was opened or reloaded).
    ///
    /// History is cleared since its offsets no longer describe the content.
    pub fn load(&mut self, text: &str) {
        self.buffer = GapBuffer::from_str(text);
        self.line_index.rebuild(text.chars());
        self.history.clear();
    }

    /// Replaces `[start, end)` with `text` and records the change.
    pub fn apply_edit(&mut self, start: usize, end: usize, text: &str) -> EditOutcome {
        self.apply_edit_at(start, end, text, Instant::now())
    }

    /// Like [`apply_edit`](Self::apply_edit) with an explicit timestamp for
    /// keystroke coalescing.
    pub fn apply_edit_at(
        &mut self,
        start: usize,
        end: usize,
        text: &str,
        now: Instant,
    ) -> EditOutcome {
        let start = start.min(self.len());
        let end = end.clamp(start, self.len());

        let (dirty, removed) = self.replace(start, end, text);
        self.history.push_at(start, removed, text, now);

        EditOutcome {
            dirty,
            caret: start + text.chars().count(),
        }
    }

    pub fn insert(&mut self, offset: usize, text: &str) -> EditOutcome {
        self.apply_edit(offset, offset, text)
    }

    pub fn delete(&mut self, start: usize, end: usize) -> EditOutcome {
        self.apply_edit(start, end, "")
    }

    /// Reverts the most recent undoable delta. `None` if there is none.
    pub fn undo(&mut self) -> Option<EditOutcome> {
        let delta = self.history.undo()?;
        let end = delta
            .position
            .saturating_add(delta.inserted_text.chars().count());
        let (dirty, _) = self.replace(delta.position, end, &delta.removed_text);
        Some(EditOutcome {
            dirty,
            caret: delta.undo_caret(),
        })
    }

    /// Re-applies the next redoable delta. `None` if there is none.
    pub fn redo(&mut self) -> Option<EditOutcome> {
        let delta = self.history.redo()?;
        Some(self.replay_forward(&delta))
    }

    fn replay_forward(&mut self, delta: &TextDelta) -> EditOutcome {
        let end = delta
            .position
            .saturating_add(delta.removed_text.chars().count());
        let (dirty, _) = self.replace(delta.position, end, &delta.inserted_text);
        EditOutcome {
            dirty,
            caret: delta.redo_caret(),
        }
    }

    /// Unrecorded replacement shared by edits and replays.
    fn replace(&mut self, start: usize, end: usize, text: &str) -> (DirtyLines, String) {
        let dirty = self.line_index.apply_edit(start, end, text);
        let removed = self.buffer.replace_range(start, end, text);
        (dirty, removed)
    }

    pub fn content(&self) -> String {
        self.buffer.to_string()
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_index.line_count()
    }

    /// Content of `line` without its trailing newline.
    pub fn line_content(&self, line: usize) -> Option<String> {
        let start = self.line_index.index_for_line(line)?;
        let end = self.line_index.line_end(line)?;
        Some(self.buffer.slice(start, end))
    }

    pub fn line_for_offset(&self, offset: usize) -> usize {
        self.line_index.line_for_index(offset)
    }

    pub fn offset_for_line(&self, line: usize) -> Option<usize> {
        self.line_index.index_for_line(line)
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// Mutable history access, e.g. to break coalescing on caret moves or
    /// to install a restored history.
    pub fn history_mut(&mut self) -> &mut EditHistory {
        &mut self.history
    }
}
