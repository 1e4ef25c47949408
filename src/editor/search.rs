//! Incremental search.

use super::prompt::PromptHandler;
use super::Editor;
use crate::keys::{Key, ENTER};
use crate::syntax::Highlight;
use crate::terminal::Console;
use crate::types::{Direction, Pos};
use crate::utils::find_bytes;
use anyhow::Result;
use tracing::debug;

/// State of one search prompt interaction.
///
/// The match overlay is written straight into the matched row's highlight; the overwritten
/// classes are kept here and put back before the next step and when the prompt ends.
#[derive(Default)]
pub struct SearchSession {
    last_match: Option<usize>,
    direction: Direction,
    saved_hl: Option<(usize, Vec<Highlight>)>,
}

impl SearchSession {
    fn restore_highlight(&mut self, editor: &mut Editor) {
        let Some((y, saved)) = self.saved_hl.take() else { return };
        if let Some(hl) = editor.buf.highlight_mut(y) {
            if hl.len() == saved.len() {
                hl.copy_from_slice(&saved);
            }
        }
    }

    /// Step from the last match in the current direction, wrapping at either end, and stop at
    /// the first row whose rendered text contains `query`.
    ///
    /// On a hit the cursor moves to the match, the viewport is forced to re-scroll onto it and
    /// the match is overlaid with [`Highlight::Match`]. Returns the matched row.
    pub fn find_next(&mut self, editor: &mut Editor, query: &[u8]) -> Option<usize> {
        let rows = editor.buf.len();
        if query.is_empty() || rows == 0 {
            return None;
        }

        let mut current = self.last_match;
        for _ in 0..rows {
            let next = match (current, self.direction) {
                (None, Direction::Forward) => 0,
                (None, Direction::Backward) => rows - 1,
                (Some(y), Direction::Forward) => {
                    if y + 1 >= rows {
                        0
                    } else {
                        y + 1
                    }
                }
                (Some(y), Direction::Backward) => {
                    if y == 0 {
                        rows - 1
                    } else {
                        y - 1
                    }
                }
            };
            current = Some(next);

            let row = editor.buf.row(next)?;
            let Some(rx) = find_bytes(row.render(), query) else { continue };

            let y = row.idx;
            let x = row.rx_to_cx(rx);
            self.last_match = Some(y);
            editor.cursor = Pos { y, x };
            // past the end, so the next scroll brings the match row to the top
            editor.row_off = rows;

            if let Some(hl) = editor.buf.highlight_mut(y) {
                self.saved_hl = Some((y, hl.to_vec()));
                hl[rx..rx + query.len()].fill(Highlight::Match);
            }
            debug!(row = y, col = x, "search match");
            return Some(y);
        }
        None
    }
}

impl PromptHandler for SearchSession {
    fn on_key(&mut self, editor: &mut Editor, input: &str, key: Key) {
        self.restore_highlight(editor);

        match key {
            Key::Char(ENTER) | Key::Escape => {
                self.last_match = None;
                self.direction = Direction::Forward;
                return;
            }
            Key::ArrowRight | Key::ArrowDown => self.direction = Direction::Forward,
            Key::ArrowLeft | Key::ArrowUp => self.direction = Direction::Backward,
            _ => {
                self.last_match = None;
                self.direction = Direction::Forward;
            }
        }

        if self.last_match.is_none() {
            self.direction = Direction::Forward;
        }
        self.find_next(editor, input.as_bytes());
    }
}

impl Editor {
    /// Run an incremental search prompt.
    ///
    /// Escape puts the cursor and viewport back where they were; Enter leaves the cursor on the
    /// last match.
    pub fn find(&mut self, console: &mut impl Console) -> Result<()> {
        let saved_cursor = self.cursor;
        let saved_offsets = (self.row_off, self.col_off);

        let mut session = SearchSession::default();
        let query = self.prompt(console, "Search: ", " (Use ESC/Arrows/Enter)", &mut session)?;

        if query.is_none() {
            self.cursor = saved_cursor;
            (self.row_off, self.col_off) = saved_offsets;
        }
        Ok(())
    }
}
