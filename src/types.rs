//! Common types used throughout the editor.

use std::time::{Duration, Instant};

/// Tab stops land on every multiple of this many display columns.
pub const TAB_STOP: usize = 8;

/// How many consecutive Ctrl-Q presses it takes to discard unsaved changes.
pub const QUIT_TIMES: usize = 3;

/// How long a status message stays in the message bar.
pub const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// A logical cursor position in the document.
///
/// - `y`: row index (0-based). May equal the row count: the virtual line past the end.
/// - `x`: **byte index** into that row's `chars` (0-based), before tab expansion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub y: usize,
    pub x: usize,
}

/// Short-lived status message shown in the message bar.
#[derive(Clone, Debug)]
pub struct StatusMsg {
    pub text: String,
    pub until: Instant,
}

impl StatusMsg {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), until: Instant::now() + MESSAGE_TIMEOUT }
    }

    /// Whether the message should still be drawn at `now`.
    pub fn is_visible(&self, now: Instant) -> bool {
        !self.text.is_empty() && now < self.until
    }
}

/// Which way a search steps through the rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}
