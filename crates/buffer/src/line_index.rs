// Chunk: docs/chunks/line_index - Incremental line index

//! Line index for tracking line boundaries in an editable buffer.
//!
//! Keeps the start offset of every line so that offset→line lookups are a
//! binary search and line→offset lookups are O(1). Edits are applied
//! incrementally from `(start, end, inserted)` descriptors; the buffer itself
//! is never rescanned.

use crate::types::{DirtyLines, Position};

/// One line's start offset in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    start: usize,
}

impl Line {
    /// Character offset of the first character of this line.
    pub fn start(&self) -> usize {
        self.start
    }
}

/// Tracks line boundaries of a buffer of `len` characters.
///
/// `lines[0].start == 0` always; line 0 can never be removed.
#[derive(Debug, Clone)]
pub struct LineIndex {
    lines: Vec<Line>,
    /// Character count of the buffer this index describes.
    len: usize,
}

impl LineIndex {
    /// Creates an index for an empty buffer (one empty line).
    pub fn new() -> Self {
        Self {
            lines: vec![Line { start: 0 }],
            len: 0,
        }
    }

    /// Builds an index for the given content.
    pub fn from_text(text: &str) -> Self {
        let mut index = Self::new();
        index.rebuild(text.chars());
        index
    }

    /// Rebuilds the index from scratch.
    ///
    /// O(n) in the content length; only needed when a whole buffer is
    /// (re)loaded.
    pub fn rebuild<I>(&mut self, content: I)
    where
        I: IntoIterator<Item = char>,
    {
        self.lines.clear();
        self.lines.push(Line { start: 0 });

        let mut offset = 0;
        for ch in content {
            offset += 1;
            if ch == '\n' {
                self.lines.push(Line { start: offset });
            }
        }
        self.len = offset;
    }

    /// Character count of the described buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of lines. Always at least 1.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the line entry, or `None` outside `[0, line_count())`.
    pub fn line(&self, line: usize) -> Option<&Line> {
        self.lines.get(line)
    }

    /// Start offset of `line`, or `None` if `line >= line_count()`.
    pub fn index_for_line(&self, line: usize) -> Option<usize> {
        self.lines.get(line).map(Line::start)
    }

    /// Line containing `offset`: the line with the largest start `<= offset`.
    ///
    /// Offsets at or past the last line start (including `len()`) map to the
    /// last line.
    pub fn line_for_index(&self, offset: usize) -> usize {
        self.lines
            .partition_point(|line| line.start <= offset)
            .saturating_sub(1)
    }

    /// Offset just past the last character of `line`, excluding its newline.
    pub fn line_end(&self, line: usize) -> Option<usize> {
        if line >= self.line_count() {
            return None;
        }
        match self.lines.get(line + 1) {
            Some(next) => Some(next.start - 1),
            None => Some(self.len),
        }
    }

    /// Length of `line` in characters, excluding the newline.
    pub fn line_len(&self, line: usize) -> Option<usize> {
        Some(self.line_end(line)? - self.index_for_line(line)?)
    }

    /// Converts an offset to (line, column). Offsets past the end clamp to
    /// the end of the buffer.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = self.line_for_index(offset);
        Position::new(line, offset - self.lines[line].start)
    }

    /// Converts (line, column) to an offset, clamping the line to the last
    /// line and the column to the line length.
    pub fn position_to_offset(&self, pos: Position) -> usize {
        let line = pos.line.min(self.line_count() - 1);
        let col = pos.col.min(self.line_len(line).unwrap_or(0));
        self.lines[line].start + col
    }

    /// Inserts a line entry at `line` starting at `offset`.
    ///
    /// Line 0 always exists, so `line == 0` is ignored, as is any `line`
    /// beyond `line_count()`.
    pub fn add(&mut self, line: usize, offset: usize) {
        if line == 0 || line > self.lines.len() {
            return;
        }
        self.lines.insert(line, Line { start: offset });
    }

    /// Removes the entry at `line`. Line 0 is never removed.
    pub fn remove(&mut self, line: usize) {
        if line == 0 || line >= self.lines.len() {
            return;
        }
        self.lines.remove(line);
    }

    /// Adds `delta` to the start of every line at index `>= from_line`.
    ///
    /// A line whose start would go negative has lost its newline to a
    /// deletion and is merged into the preceding line (removed).
    pub fn shift_indexes(&mut self, from_line: usize, delta: isize) {
        if from_line == 0 || from_line >= self.lines.len() || delta == 0 {
            return;
        }

        let mut i = from_line;
        while i < self.lines.len() {
            match self.lines[i].start.checked_add_signed(delta) {
                Some(start) => {
                    self.lines[i].start = start;
                    i += 1;
                }
                // The next line slides into slot `i`; revisit it.
                None => {
                    self.lines.remove(i);
                }
            }
        }
    }

    /// Updates the index for the replacement of `[start, end)` with
    /// `inserted`.
    ///
    /// Offsets are clamped into `[0, len()]` and `start > end` is treated as
    /// a pure insertion at `start`.
    pub fn apply_edit(&mut self, start: usize, end: usize, inserted: &str) -> DirtyLines {
        let start = start.min(self.len);
        let end = end.clamp(start, self.len);
        let removed_len = end - start;

        let first_line = self.line_for_index(start);

        // One line per newline in the removed span: exactly the lines that
        // start inside (start, end].
        let removed_lines = self.lines[first_line + 1..]
            .iter()
            .take_while(|line| line.start <= end)
            .count();
        self.lines
            .drain(first_line + 1..first_line + 1 + removed_lines);

        let mut inserted_len = 0;
        let mut new_lines = Vec::new();
        for ch in inserted.chars() {
            inserted_len += 1;
            if ch == '\n' {
                new_lines.push(Line {
                    start: start + inserted_len,
                });
            }
        }

        let delta = inserted_len as isize - removed_len as isize;
        self.shift_indexes(first_line + 1, delta);

        let added_lines = new_lines.len();
        self.lines
            .splice(first_line + 1..first_line + 1, new_lines);

        self.len = self.len - removed_len + inserted_len;

        if removed_len == 0 && inserted_len == 0 {
            DirtyLines::None
        } else if removed_lines == 0 && added_lines == 0 {
            DirtyLines::Single(first_line)
        } else {
            DirtyLines::FromLineToEnd(first_line)
        }
    }

    /// Returns the raw line starts (for validation).
    pub fn line_starts(&self) -> Vec<usize> {
        self.lines.iter().map(Line::start).collect()
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}
