// Chunk: docs/chunks/edit_history - Coalescing, size-bounded undo history

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default history budget, in characters of removed + inserted text.
pub const DEFAULT_MAX_SIZE: usize = 256 * 1024;

/// Default window within which consecutive keystrokes coalesce.
pub const DEFAULT_COALESCE_WINDOW_MS: u64 = 1000;

/// Tunables for [`EditHistory`](crate::EditHistory).
///
/// Missing fields deserialize to their defaults, so a partial config file
/// such as `{"max_size": 4096}` is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub max_size: usize,
    pub coalesce_window_ms: u64,
}

impl HistoryConfig {
    pub fn coalesce_window(&self) -> Duration {
        Duration::from_millis(self.coalesce_window_ms)
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            coalesce_window_ms: DEFAULT_COALESCE_WINDOW_MS,
        }
    }
}
