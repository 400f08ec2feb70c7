// Chunk: docs/chunks/document_replay - Reference buffer collaborator

//! Gap buffer backing store for [`Document`](crate::Document).
//!
//! Characters live in one `Vec<char>` with an unused gap parked at the last
//! edit site. Typing at the same place only touches the gap edges; an edit
//! elsewhere first moves the gap (O(distance)).

const INITIAL_GAP_SIZE: usize = 64;

#[derive(Debug, Clone)]
pub struct GapBuffer {
    /// [pre-gap content | gap | post-gap content]
    data: Vec<char>,
    gap_start: usize,
    gap_end: usize,
}

impl GapBuffer {
    pub fn new() -> Self {
        Self::from_str("")
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Self {
        let mut data: Vec<char> = text.chars().collect();
        let len = data.len();
        data.resize(len + INITIAL_GAP_SIZE, '\0');
        Self {
            data,
            gap_start: len,
            gap_end: len + INITIAL_GAP_SIZE,
        }
    }

    /// Logical length in characters.
    pub fn len(&self) -> usize {
        self.data.len() - self.gap_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    fn move_gap_to(&mut self, pos: usize) {
        let pos = pos.min(self.len());
        if pos < self.gap_start {
            let shift = self.gap_start - pos;
            self.data
                .copy_within(pos..self.gap_start, self.gap_end - shift);
            self.gap_start -= shift;
            self.gap_end -= shift;
        } else if pos > self.gap_start {
            let shift = pos - self.gap_start;
            self.data
                .copy_within(self.gap_end..self.gap_end + shift, self.gap_start);
            self.gap_start += shift;
            self.gap_end += shift;
        }
    }

    /// Grows the gap in place to hold at least `needed` characters.
    fn reserve_gap(&mut self, needed: usize) {
        if self.gap_len() >= needed {
            return;
        }
        let growth = (needed - self.gap_len()).max(self.data.len()).max(INITIAL_GAP_SIZE);
        let tail_len = self.data.len() - self.gap_end;
        let old_len = self.data.len();

        self.data.resize(old_len + growth, '\0');
        let new_len = self.data.len();
        self.data
            .copy_within(self.gap_end..old_len, new_len - tail_len);
        self.gap_end = new_len - tail_len;
    }

    /// Replaces `[start, end)` with `text` and returns the removed characters.
    ///
    /// The range is clamped to the buffer; `start > end` inserts at `start`.
    pub fn replace_range(&mut self, start: usize, end: usize, text: &str) -> String {
        let start = start.min(self.len());
        let end = end.clamp(start, self.len());

        self.move_gap_to(start);
        let removed: String = self.data[self.gap_end..self.gap_end + (end - start)]
            .iter()
            .collect();
        self.gap_end += end - start;

        let chars: Vec<char> = text.chars().collect();
        self.reserve_gap(chars.len());
        self.data[self.gap_start..self.gap_start + chars.len()].copy_from_slice(&chars);
        self.gap_start += chars.len();

        removed
    }

    pub fn char_at(&self, pos: usize) -> Option<char> {
        if pos >= self.len() {
            return None;
        }
        if pos < self.gap_start {
            Some(self.data[pos])
        } else {
            Some(self.data[pos + self.gap_len()])
        }
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.data[..self.gap_start]
            .iter()
            .chain(self.data[self.gap_end..].iter())
            .copied()
    }

    /// Content of `[start, end)`, clamped to the buffer.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.len());
        let start = start.min(end);
        self.chars().skip(start).take(end - start).collect()
    }
}

impl Default for GapBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GapBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let content: String = self.chars().collect();
        f.write_str(&content)
    }
}
