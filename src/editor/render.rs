//! Rendering: composing a full frame and writing it to the terminal.
//!
//! A frame is built in memory (escape sequences queued with crossterm) and handed to the console
//! in a single write, so the terminal never shows a half-drawn screen.

use super::Editor;
use crate::row::Row;
use crate::syntax::Highlight;
use crate::terminal::Console;
use crate::utils::{display_width, truncate_to_width};
use anyhow::Result;
use crossterm::{
    cursor,
    style::{Attribute, Color, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
    QueueableCommand,
};
use std::io;
use std::time::Instant;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

impl Editor {
    /// Adjust the scroll offsets so the cursor is inside the viewport.
    pub fn scroll(&mut self) {
        self.rx = self.buf.row(self.cursor.y).map_or(0, |row| row.cx_to_rx(self.cursor.x));

        if self.cursor.y < self.row_off {
            self.row_off = self.cursor.y;
        }
        if self.cursor.y >= self.row_off + self.screen_rows {
            self.row_off = self.cursor.y + 1 - self.screen_rows;
        }
        if self.rx < self.col_off {
            self.col_off = self.rx;
        }
        if self.rx >= self.col_off + self.screen_cols {
            self.col_off = self.rx + 1 - self.screen_cols;
        }
    }

    /// Scroll, then build the bytes of one complete frame.
    pub fn draw_frame(&mut self) -> Result<Vec<u8>> {
        self.scroll();

        let mut out = Vec::new();
        out.queue(cursor::Hide)?;
        out.queue(cursor::MoveTo(0, 0))?;

        self.draw_rows(&mut out)?;
        self.draw_status_bar(&mut out)?;
        self.draw_message_bar(&mut out, Instant::now())?;

        out.queue(cursor::MoveTo(
            to_u16(self.rx - self.col_off),
            to_u16(self.cursor.y - self.row_off),
        ))?;
        out.queue(cursor::Show)?;
        Ok(out)
    }

    /// Redraw the whole screen.
    pub fn refresh_screen(&mut self, console: &mut impl Console) -> Result<()> {
        let frame = self.draw_frame()?;
        console.write_all(&frame)
    }

    fn draw_rows(&self, out: &mut Vec<u8>) -> io::Result<()> {
        for y in 0..self.screen_rows {
            match self.buf.row(y + self.row_off) {
                Some(row) => self.draw_row(out, row)?,
                None if self.buf.is_empty() && y == self.screen_rows / 3 => self.draw_welcome(out),
                None => out.push(b'~'),
            }
            out.queue(Clear(ClearType::UntilNewLine))?;
            out.extend_from_slice(b"\r\n");
        }
        Ok(())
    }

    fn draw_welcome(&self, out: &mut Vec<u8>) {
        let welcome = format!("Tilde editor -- version {VERSION}");
        let welcome = truncate_to_width(&welcome, self.screen_cols);
        let mut padding = (self.screen_cols - display_width(welcome)) / 2;
        if padding > 0 {
            out.push(b'~');
            padding -= 1;
        }
        out.resize(out.len() + padding, b' ');
        out.extend_from_slice(welcome.as_bytes());
    }

    /// The visible slice of one row, switching colors only where the class changes.
    ///
    /// Columns here are bytes of `render`, one terminal cell each; multi-byte characters are not
    /// width-aware.
    fn draw_row(&self, out: &mut Vec<u8>, row: &Row) -> io::Result<()> {
        let render = row.render();
        let start = self.col_off.min(render.len());
        let end = (self.col_off + self.screen_cols).min(render.len());

        let mut current: Option<Color> = None;
        for (&c, &hl) in render[start..end].iter().zip(&row.hl()[start..end]) {
            if c.is_ascii_control() {
                // show control bytes as inverse-video letters: ^A as `A`, DEL as `?`
                let symbol = if c <= 26 { b'@' + c } else { b'?' };
                out.queue(SetAttribute(Attribute::Reverse))?;
                out.push(symbol);
                out.queue(SetAttribute(Attribute::Reset))?;
                if let Some(color) = current {
                    out.queue(SetForegroundColor(color))?;
                }
            } else if hl == Highlight::Normal {
                if current.take().is_some() {
                    out.queue(SetForegroundColor(Color::Reset))?;
                }
                out.push(c);
            } else {
                let color = hl.color();
                if current != Some(color) {
                    current = Some(color);
                    out.queue(SetForegroundColor(color))?;
                }
                out.push(c);
            }
        }
        out.queue(SetForegroundColor(Color::Reset))?;
        Ok(())
    }

    fn draw_status_bar(&self, out: &mut Vec<u8>) -> io::Result<()> {
        out.queue(SetAttribute(Attribute::Reverse))?;

        let name = self
            .file_path
            .as_ref()
            .map_or_else(|| "[No Name]".to_string(), |p| p.display().to_string());
        let left = format!(
            "{} - {} lines {}",
            truncate_to_width(&name, 20),
            self.buf.len(),
            if self.buf.dirty { "(modified)" } else { "" }
        );
        let right = format!(
            "{} | {}/{}",
            self.buf.syntax().map_or("no ft", |s| s.filetype.as_str()),
            self.cursor.y + 1,
            self.buf.len()
        );

        let left = truncate_to_width(&left, self.screen_cols);
        out.extend_from_slice(left.as_bytes());

        // right-align the position info if it fits, otherwise pad with spaces
        let used = display_width(left);
        let rlen = display_width(&right);
        if used + rlen <= self.screen_cols {
            out.resize(out.len() + self.screen_cols - used - rlen, b' ');
            out.extend_from_slice(right.as_bytes());
        } else {
            out.resize(out.len() + self.screen_cols - used, b' ');
        }

        out.queue(SetAttribute(Attribute::Reset))?;
        out.extend_from_slice(b"\r\n");
        Ok(())
    }

    fn draw_message_bar(&self, out: &mut Vec<u8>, now: Instant) -> io::Result<()> {
        out.queue(Clear(ClearType::UntilNewLine))?;
        if let Some(msg) = self.status.as_ref().filter(|m| m.is_visible(now)) {
            out.extend_from_slice(truncate_to_width(&msg.text, self.screen_cols).as_bytes());
        }
        Ok(())
    }
}
