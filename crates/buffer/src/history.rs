// Chunk: docs/chunks/edit_history - Coalescing, size-bounded undo history

//! Linear undo/redo history of text deltas.
//!
//! Entries before `cursor` are undoable, entries at or after it are redoable.
//! Consecutive keystrokes of the same kind are folded into one entry so that
//! undo works in word-sized steps rather than per character, and the total
//! amount of recorded text is capped by evicting the oldest entries.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::HistoryConfig;

/// One undoable change: at `position`, `removed_text` was replaced by
/// `inserted_text`. Positions and lengths are in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDelta {
    pub position: usize,
    pub removed_text: String,
    pub inserted_text: String,
}

impl TextDelta {
    pub fn new(
        position: usize,
        removed_text: impl Into<String>,
        inserted_text: impl Into<String>,
    ) -> Self {
        Self {
            position,
            removed_text: removed_text.into(),
            inserted_text: inserted_text.into(),
        }
    }

    pub fn class(&self) -> Option<EditClass> {
        EditClass::of(&self.removed_text, &self.inserted_text)
    }

    /// Budget cost: characters removed plus characters inserted.
    pub fn size(&self) -> usize {
        self.removed_text.chars().count() + self.inserted_text.chars().count()
    }

    /// Caret offset after this delta is undone.
    pub fn undo_caret(&self) -> usize {
        self.position.saturating_add(self.removed_text.chars().count())
    }

    /// Caret offset after this delta is (re)applied.
    pub fn redo_caret(&self) -> usize {
        self.position.saturating_add(self.inserted_text.chars().count())
    }

    /// Single-character insert or delete: the only edits that open a
    /// coalescing run.
    fn is_keystroke(&self) -> bool {
        match self.class() {
            Some(EditClass::Insert) => single_char(&self.inserted_text).is_some(),
            Some(EditClass::Delete) => single_char(&self.removed_text).is_some(),
            _ => false,
        }
    }
}

/// Kind of edit, used to decide whether two edits may coalesce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditClass {
    Insert,
    Delete,
    /// Both removed and inserted text: a paste over a selection, a
    /// replace-all, etc. Never coalesced.
    Replace,
}

impl EditClass {
    /// Returns `None` for an edit that changes nothing.
    pub fn of(removed: &str, inserted: &str) -> Option<Self> {
        match (removed.is_empty(), inserted.is_empty()) {
            (true, true) => None,
            (true, false) => Some(EditClass::Insert),
            (false, true) => Some(EditClass::Delete),
            (false, false) => Some(EditClass::Replace),
        }
    }
}

/// Broad character category; a run only grows while it stays in one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharCategory {
    Whitespace,
    Alphanumeric,
    Other,
}

impl CharCategory {
    pub fn of(ch: char) -> Self {
        if ch.is_whitespace() {
            CharCategory::Whitespace
        } else if ch.is_alphanumeric() {
            CharCategory::Alphanumeric
        } else {
            CharCategory::Other
        }
    }
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coalesce {
    /// Record the edit as a new entry.
    Append,
    /// Fold the edit into the top entry.
    Merge,
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let ch = chars.next()?;
    chars.next().is_none().then_some(ch)
}

fn same_category(a: Option<char>, b: char) -> bool {
    a.is_some_and(|a| CharCategory::of(a) == CharCategory::of(b))
}

/// Decides whether `edit` folds into `open_run`.
///
/// `open_run` is the top history entry if it is still accepting keystrokes
/// and `elapsed` is the time since it was last extended. Pure: the clock is
/// read by the caller.
pub fn classify(
    open_run: Option<&TextDelta>,
    edit: &TextDelta,
    elapsed: Duration,
    window: Duration,
) -> Coalesce {
    let Some(top) = open_run else {
        return Coalesce::Append;
    };
    if elapsed >= window || top.class() != edit.class() {
        return Coalesce::Append;
    }

    let mergeable = match edit.class() {
        Some(EditClass::Insert) => single_char(&edit.inserted_text).is_some_and(|ch| {
            top.position + top.inserted_text.chars().count() == edit.position
                && same_category(top.inserted_text.chars().next_back(), ch)
        }),
        Some(EditClass::Delete) => single_char(&edit.removed_text).is_some_and(|ch| {
            // Backspace grows the run leftwards, forward delete rightwards.
            let backspace = edit.position + 1 == top.position
                && same_category(top.removed_text.chars().next(), ch);
            let forward = edit.position == top.position
                && same_category(top.removed_text.chars().next_back(), ch);
            backspace || forward
        }),
        Some(EditClass::Replace) | None => false,
    };

    if mergeable {
        Coalesce::Merge
    } else {
        Coalesce::Append
    }
}

/// Folds an edit that [`classify`] accepted into the run.
fn absorb(top: &mut TextDelta, edit: TextDelta) {
    match edit.class() {
        Some(EditClass::Insert) => top.inserted_text.push_str(&edit.inserted_text),
        Some(EditClass::Delete) if edit.position < top.position => {
            top.removed_text.insert_str(0, &edit.removed_text);
            top.position = edit.position;
        }
        Some(EditClass::Delete) => top.removed_text.push_str(&edit.removed_text),
        Some(EditClass::Replace) | None => {}
    }
}

/// Bounded linear undo history for one document.
#[derive(Debug, Clone)]
pub struct EditHistory {
    entries: VecDeque<TextDelta>,
    cursor: usize,
    total_size: usize,
    config: HistoryConfig,
    /// When the open run was last extended. `None` closes the run.
    last_push: Option<Instant>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::with_config(&HistoryConfig::default())
    }

    pub fn with_config(config: &HistoryConfig) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            total_size: 0,
            config: *config,
            last_push: None,
        }
    }

    /// Rebuilds a history from persisted parts.
    ///
    /// Returns `None` if `cursor` points past the entries. The size budget
    /// is enforced on the result.
    pub fn from_parts(
        entries: Vec<TextDelta>,
        cursor: usize,
        config: &HistoryConfig,
    ) -> Option<Self> {
        if cursor > entries.len() {
            return None;
        }
        let mut history = Self::with_config(config);
        history.total_size = entries.iter().map(TextDelta::size).sum();
        history.entries = entries.into();
        history.cursor = cursor;
        history.enforce_budget();
        Some(history)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Boundary between undoable and redoable entries.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total_size(&self) -> usize {
        self.total_size
    }

    pub fn max_size(&self) -> usize {
        self.config.max_size
    }

    pub fn coalesce_window(&self) -> Duration {
        self.config.coalesce_window()
    }

    /// Current budget and coalescing window.
    pub fn config(&self) -> HistoryConfig {
        self.config
    }

    pub fn entries(&self) -> impl Iterator<Item = &TextDelta> + '_ {
        self.entries.iter()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Records an edit, reading the clock for coalescing.
    pub fn push(
        &mut self,
        position: usize,
        removed: impl Into<String>,
        inserted: impl Into<String>,
    ) {
        self.push_at(position, removed, inserted, Instant::now());
    }

    /// Records an edit made at `now`.
    ///
    /// An edit that neither removes nor inserts anything is ignored.
    pub fn push_at(
        &mut self,
        position: usize,
        removed: impl Into<String>,
        inserted: impl Into<String>,
        now: Instant,
    ) {
        let edit = TextDelta::new(position, removed, inserted);
        if edit.class().is_none() {
            return;
        }

        let open_run = match self.last_push {
            Some(last) if self.cursor == self.entries.len() => self
                .entries
                .back()
                .map(|top| (top, now.saturating_duration_since(last))),
            _ => None,
        };
        let decision = match open_run {
            Some((top, elapsed)) => classify(Some(top), &edit, elapsed, self.coalesce_window()),
            None => Coalesce::Append,
        };

        let keystroke = edit.is_keystroke();
        let size = edit.size();
        if decision == Coalesce::Merge {
            if let Some(top) = self.entries.back_mut() {
                absorb(top, edit);
            }
        } else {
            self.truncate_redo();
            self.entries.push_back(edit);
            self.cursor = self.entries.len();
        }
        self.total_size += size;
        self.last_push = keystroke.then_some(now);

        self.enforce_budget();
    }

    /// Steps back one entry and returns it for the caller to revert.
    ///
    /// Returns `None` (and changes nothing) when there is nothing to undo.
    pub fn undo(&mut self) -> Option<TextDelta> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.last_push = None;
        self.entries.get(self.cursor).cloned()
    }

    /// Steps forward one entry and returns it for the caller to re-apply.
    ///
    /// Returns `None` (and changes nothing) when there is nothing to redo.
    pub fn redo(&mut self) -> Option<TextDelta> {
        let delta = self.entries.get(self.cursor).cloned()?;
        self.cursor += 1;
        self.last_push = None;
        Some(delta)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        self.total_size = 0;
        self.last_push = None;
    }

    /// Forces the next push to start a new entry (e.g. after the caret is
    /// moved by the user).
    pub fn break_coalescing(&mut self) {
        self.last_push = None;
    }

    /// Sub-millisecond precision is dropped; windows beyond `u64::MAX` ms
    /// saturate.
    pub fn set_coalesce_window(&mut self, window: Duration) {
        self.config.coalesce_window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
    }

    /// Sets the budget and evicts old entries until the history fits.
    pub fn set_max_size(&mut self, max_size: usize) {
        self.config.max_size = max_size;
        self.enforce_budget();
    }

    fn truncate_redo(&mut self) {
        while self.entries.len() > self.cursor {
            if let Some(dropped) = self.entries.pop_back() {
                self.total_size -= dropped.size();
            }
        }
    }

    /// Evicts from the oldest end, only ever entries before the cursor.
    /// If redo entries alone exceed the budget the history is cleared.
    fn enforce_budget(&mut self) {
        let mut evicted = 0;
        while self.total_size > self.config.max_size && self.cursor > 0 {
            let Some(oldest) = self.entries.pop_front() else {
                break;
            };
            self.total_size -= oldest.size();
            self.cursor -= 1;
            evicted += 1;
        }

        if self.total_size > self.config.max_size {
            tracing::debug!(
                total_size = self.total_size,
                max_size = self.config.max_size,
                "redo entries exceed history budget, clearing"
            );
            self.clear();
        } else if evicted > 0 {
            tracing::debug!(
                evicted,
                total_size = self.total_size,
                max_size = self.config.max_size,
                "evicted oldest undo entries"
            );
        }
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}
