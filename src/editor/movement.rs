//! Cursor movement.

use super::Editor;
use crate::keys::Key;

impl Editor {
    /// Move the cursor in response to a navigation key.
    ///
    /// The cursor may rest on the virtual row just past the last row; `x` is always clamped to
    /// the length of the row the cursor ends up on.
    pub fn move_cursor(&mut self, key: Key) {
        match key {
            Key::ArrowLeft => {
                if self.cursor.x > 0 {
                    self.cursor.x -= 1;
                } else if self.cursor.y > 0 {
                    // start of row: wrap to the end of the previous one
                    self.cursor.y -= 1;
                    self.cursor.x = self.buf.row_len(self.cursor.y);
                }
            }
            Key::ArrowRight => {
                if let Some(row) = self.buf.row(self.cursor.y) {
                    if self.cursor.x < row.len() {
                        self.cursor.x += 1;
                    } else {
                        self.cursor.y += 1;
                        self.cursor.x = 0;
                    }
                }
            }
            Key::ArrowUp => self.cursor.y = self.cursor.y.saturating_sub(1),
            Key::ArrowDown => {
                if self.cursor.y < self.buf.len() {
                    self.cursor.y += 1;
                }
            }
            Key::PageUp => {
                self.cursor.y = self.row_off;
                for _ in 0..self.screen_rows {
                    self.move_cursor(Key::ArrowUp);
                }
            }
            Key::PageDown => {
                self.cursor.y = (self.row_off + self.screen_rows - 1).min(self.buf.len());
                for _ in 0..self.screen_rows {
                    self.move_cursor(Key::ArrowDown);
                }
            }
            Key::Home => self.cursor.x = 0,
            Key::End => {
                if self.cursor.y < self.buf.len() {
                    self.cursor.x = self.buf.row_len(self.cursor.y);
                }
            }
            _ => {}
        }

        self.cursor.x = self.cursor.x.min(self.buf.row_len(self.cursor.y));
    }
}
