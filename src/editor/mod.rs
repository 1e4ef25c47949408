//! Editor: the document, view and session state, and the operations that drive it.
//!
//! All state lives in one [`Editor`] value that the main loop passes to every operation; terminal
//! access goes through a [`crate::terminal::Console`] handed in by the caller.

mod file_ops;
mod input;
mod movement;
mod prompt;
mod render;
mod search;

use crate::buffer::Buffer;
use crate::syntax::{select_profile, SyntaxProfile};
use crate::terminal::WindowSize;
use crate::types::{Pos, StatusMsg, QUIT_TIMES};
use std::path::PathBuf;
use tracing::{debug, warn};

/// The top-level application state.
pub struct Editor {
    /// The document rows.
    pub buf: Buffer,
    /// Logical cursor: `x` indexes `chars`, `y` indexes rows.
    pub cursor: Pos,
    /// Display column of the cursor, derived from `cursor` on every redraw.
    pub rx: usize,
    /// Viewport scroll position.
    pub row_off: usize,
    pub col_off: usize,
    /// Text area size (the terminal minus the status and message bars).
    pub screen_rows: usize,
    pub screen_cols: usize,
    /// Path we'll save to.
    pub file_path: Option<PathBuf>,
    /// Short-lived status message.
    pub(crate) status: Option<StatusMsg>,
    /// Remaining Ctrl-Q presses before a dirty document is abandoned.
    pub(crate) quit_times: usize,
    /// Available syntax profiles.
    syntaxes: Vec<SyntaxProfile>,
}

impl Editor {
    /// Create an editor with an empty, unnamed document.
    pub fn new(size: WindowSize, syntaxes: Vec<SyntaxProfile>) -> Self {
        Self {
            buf: Buffer::new(),
            cursor: Pos::default(),
            rx: 0,
            row_off: 0,
            col_off: 0,
            // two lines for the status bar and the message bar
            screen_rows: size.rows.saturating_sub(2).max(1),
            screen_cols: size.cols.max(1),
            file_path: None,
            status: None,
            quit_times: QUIT_TIMES,
            syntaxes,
        }
    }

    /// Create the editor for a fresh session, showing the key help.
    ///
    /// `None` means the window size could not be detected: the editor assumes
    /// [`WindowSize::FALLBACK`] and says so in the message bar.
    pub fn startup(size: Option<WindowSize>, syntaxes: Vec<SyntaxProfile>) -> Self {
        let Some(size) = size else {
            warn!("window size unavailable, using {:?}", WindowSize::FALLBACK);
            let mut editor = Self::new(WindowSize::FALLBACK, syntaxes);
            editor.set_status("Could not detect window size, assuming 80x24");
            return editor;
        };
        let mut editor = Self::new(size, syntaxes);
        editor.set_status("HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find");
        editor
    }

    /// Show a message in the message bar.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(StatusMsg::new(msg));
    }

    /// Pick the syntax profile for the current file name and re-highlight the document.
    pub fn select_syntax(&mut self) {
        let profile = self
            .file_path
            .as_ref()
            .and_then(|p| select_profile(&self.syntaxes, &p.to_string_lossy()))
            .cloned();
        debug!(filetype = profile.as_ref().map(|p| p.filetype.as_str()), "selected syntax");
        self.buf.set_syntax(profile);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::syntax::builtin_profiles;

    /// A 10x40 editor (8 text rows) with the built-in profiles.
    pub fn editor() -> Editor {
        Editor::new(WindowSize { rows: 10, cols: 40 }, builtin_profiles().unwrap())
    }

    /// An editor holding `lines`, clean, with the cursor at the origin.
    pub fn editor_with(lines: &[&str]) -> Editor {
        let mut ed = editor();
        for l in lines {
            ed.buf.insert_row(ed.buf.len(), l.as_bytes());
        }
        ed.buf.dirty = false;
        ed
    }

    pub fn lines(ed: &Editor) -> Vec<String> {
        (0..ed.buf.len())
            .map(|y| String::from_utf8_lossy(ed.buf.row(y).unwrap().chars()).into_owned())
            .collect()
    }

    #[test]
    fn new_editor_reserves_bar_lines() {
        let ed = editor();
        assert_eq!(ed.screen_rows, 8);
        assert_eq!(ed.screen_cols, 40);
        assert!(ed.buf.is_empty());
        assert_eq!(ed.quit_times, QUIT_TIMES);
    }

    #[test]
    fn startup_shows_help() {
        let ed = Editor::startup(Some(WindowSize { rows: 30, cols: 100 }), Vec::new());
        assert_eq!((ed.screen_rows, ed.screen_cols), (28, 100));
        assert!(ed.status.as_ref().unwrap().text.starts_with("HELP: Ctrl-S = save"));
    }

    #[test]
    fn startup_without_size_assumes_80x24() {
        let ed = Editor::startup(None, Vec::new());
        assert_eq!((ed.screen_rows, ed.screen_cols), (22, 80));
        assert_eq!(
            ed.status.as_ref().unwrap().text,
            "Could not detect window size, assuming 80x24"
        );
    }

    #[test]
    fn tiny_window_keeps_one_row() {
        let ed = Editor::new(WindowSize { rows: 1, cols: 0 }, Vec::new());
        assert_eq!(ed.screen_rows, 1);
        assert_eq!(ed.screen_cols, 1);
    }

    #[test]
    fn select_syntax_by_file_name() {
        let mut ed = editor_with(&["int x;"]);
        ed.file_path = Some(PathBuf::from("src/main.c"));
        ed.select_syntax();
        assert_eq!(ed.buf.syntax().unwrap().filetype, "c");

        ed.file_path = Some(PathBuf::from("notes.txt"));
        ed.select_syntax();
        assert!(ed.buf.syntax().is_none());
    }
}
