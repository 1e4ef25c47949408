//! Key dispatch and the editing operations bound to keys.

use super::Editor;
use crate::keys::{ctrl, read_key, Key, ENTER};
use crate::terminal::Console;
use crate::types::QUIT_TIMES;
use anyhow::Result;
use tracing::info;

/// Bytes that are inserted as text: printable ASCII, tab, and anything non-ASCII (UTF-8 parts).
fn is_insertable(c: u8) -> bool {
    c == b'\t' || !c.is_ascii_control()
}

impl Editor {
    /// Read one key and act on it.
    ///
    /// Returns `Ok(true)` if the editor should quit, `Ok(false)` otherwise.
    pub fn process_keypress(&mut self, console: &mut impl Console) -> Result<bool> {
        let key = read_key(console)?;

        match key {
            Key::Char(ENTER) => self.insert_newline(),
            Key::Char(c) if c == ctrl(b'q') => {
                if self.buf.dirty && self.quit_times > 1 {
                    self.quit_times -= 1;
                    self.set_status(format!(
                        "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                        self.quit_times
                    ));
                    return Ok(false);
                }
                info!(dirty = self.buf.dirty, "quit");
                return Ok(true);
            }
            Key::Char(c) if c == ctrl(b's') => self.save(console)?,
            Key::Char(c) if c == ctrl(b'f') => self.find(console)?,
            Key::Backspace | Key::Delete => {
                if key == Key::Delete {
                    self.move_cursor(Key::ArrowRight);
                }
                self.delete_char();
            }
            Key::Char(c) if c == ctrl(b'h') => self.delete_char(),
            Key::ArrowUp
            | Key::ArrowDown
            | Key::ArrowLeft
            | Key::ArrowRight
            | Key::PageUp
            | Key::PageDown
            | Key::Home
            | Key::End => self.move_cursor(key),
            Key::Char(c) if is_insertable(c) => self.insert_char(c),
            // Escape, Ctrl-L and unbound control bytes
            Key::Escape | Key::Char(_) => {}
        }

        self.quit_times = QUIT_TIMES;
        Ok(false)
    }

    /// Insert `c` at the cursor, creating a row first when the cursor is past the last one.
    pub fn insert_char(&mut self, c: u8) {
        if self.cursor.y == self.buf.len() {
            self.buf.insert_row(self.buf.len(), b"");
        }
        self.buf.insert_char(self.cursor.y, self.cursor.x, c);
        self.cursor.x += 1;
    }

    /// Break the current row at the cursor.
    pub fn insert_newline(&mut self) {
        if self.cursor.x == 0 {
            self.buf.insert_row(self.cursor.y, b"");
        } else {
            self.buf.split_row(self.cursor.y, self.cursor.x);
        }
        self.cursor.y += 1;
        self.cursor.x = 0;
    }

    /// Backspace: delete the byte left of the cursor, or join with the previous row at column 0.
    pub fn delete_char(&mut self) {
        if self.cursor.y == self.buf.len() || (self.cursor.x == 0 && self.cursor.y == 0) {
            return;
        }
        if self.cursor.x > 0 {
            self.buf.delete_char(self.cursor.y, self.cursor.x - 1);
            self.cursor.x -= 1;
        } else if let Some(prev_len) = self.buf.join_with_previous(self.cursor.y) {
            self.cursor.y -= 1;
            self.cursor.x = prev_len;
        }
    }
}
