// Chunk: docs/chunks/line_index - Incremental line index

/// Position in the buffer as (line, column) where both are 0-indexed.
///
/// Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Lines invalidated by an edit.
///
/// Returned by [`LineIndex::apply_edit`](crate::LineIndex::apply_edit) so a
/// host can repaint only what changed without inspecting the edit itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyLines {
    /// Nothing changed.
    None,
    /// Only this line's content changed; no line boundaries moved.
    Single(usize),
    /// Every line from this one to the end of the buffer changed
    /// (a newline was inserted or removed).
    FromLineToEnd(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(2, 1) < Position::new(2, 3));
    }
}
