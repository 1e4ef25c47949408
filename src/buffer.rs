//! The row store: owns the document rows and provides the editing primitives.

use crate::row::Row;
use crate::syntax::{Highlight, SyntaxProfile};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// The document: an ordered list of rows, the active syntax profile and the dirty flag.
///
/// Every mutation goes through this type so that row indices, derived render/highlight state and
/// the dirty flag are always updated together.
#[derive(Default)]
pub struct Buffer {
    rows: Vec<Row>,
    syntax: Option<SyntaxProfile>,
    /// "Dirty" means there are unsaved changes.
    pub dirty: bool,
}

impl Buffer {
    /// Create a new empty document (zero rows).
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a document, one row per line. Trailing `\n` and `\r` bytes are stripped from each
    /// line; a final line without a terminator still becomes a row.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut buf = Self::new();
        let mut reader = BufReader::new(reader);
        let mut line = Vec::new();
        loop {
            line.clear();
            let n = reader.read_until(b'\n', &mut line).context("read failed")?;
            if n == 0 {
                break;
            }
            while matches!(line.last(), Some(b'\n' | b'\r')) {
                line.pop();
            }
            buf.insert_row(buf.len(), &line);
        }
        buf.dirty = false;
        Ok(buf)
    }

    /// Open and read `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Serialize for saving: every row followed by `\n`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let total: usize = self.rows.iter().map(|r| r.len() + 1).sum();
        let mut out = Vec::with_capacity(total);
        for row in &self.rows {
            out.extend_from_slice(row.chars());
            out.push(b'\n');
        }
        out
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, y: usize) -> Option<&Row> {
        self.rows.get(y)
    }

    /// Logical length of row `y`, or 0 for the virtual row past the end.
    pub fn row_len(&self, y: usize) -> usize {
        self.rows.get(y).map_or(0, Row::len)
    }

    pub fn syntax(&self) -> Option<&SyntaxProfile> {
        self.syntax.as_ref()
    }

    /// Switch syntax profile and re-highlight every row.
    pub fn set_syntax(&mut self, syntax: Option<SyntaxProfile>) {
        self.syntax = syntax;
        let syntax = self.syntax.as_ref();
        for row in &mut self.rows {
            row.update(syntax);
        }
    }

    /// Mutable highlight of row `y`, for transient overlays.
    pub fn highlight_mut(&mut self, y: usize) -> Option<&mut [Highlight]> {
        self.rows.get_mut(y).map(Row::hl_mut)
    }

    fn renumber_from(&mut self, start: usize) {
        for (i, row) in self.rows.iter_mut().enumerate().skip(start) {
            row.idx = i;
        }
    }

    /// Insert a row at `at`. No-op unless `at <= len()`.
    pub fn insert_row(&mut self, at: usize, text: &[u8]) {
        if at > self.rows.len() {
            return;
        }
        let row = Row::new(at, text.to_vec(), self.syntax.as_ref());
        self.rows.insert(at, row);
        self.renumber_from(at + 1);
        self.dirty = true;
    }

    /// Remove row `at`. No-op if out of bounds.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.renumber_from(at);
        self.dirty = true;
    }

    /// Insert byte `c` into row `y` at column `at` (clamped to the row length).
    pub fn insert_char(&mut self, y: usize, at: usize, c: u8) {
        let syntax = self.syntax.as_ref();
        if let Some(row) = self.rows.get_mut(y) {
            row.insert_byte(at, c, syntax);
            self.dirty = true;
        }
    }

    /// Append `text` to the end of row `y`.
    pub fn append_string(&mut self, y: usize, text: &[u8]) {
        let syntax = self.syntax.as_ref();
        if let Some(row) = self.rows.get_mut(y) {
            row.append(text, syntax);
            self.dirty = true;
        }
    }

    /// Delete the byte at column `at` of row `y`. No-op if there is no byte there.
    pub fn delete_char(&mut self, y: usize, at: usize) {
        let syntax = self.syntax.as_ref();
        if let Some(row) = self.rows.get_mut(y) {
            if row.remove_byte(at, syntax) {
                self.dirty = true;
            }
        }
    }

    /// Split row `y` at column `at`: the tail moves to a new row `y + 1`.
    pub fn split_row(&mut self, y: usize, at: usize) {
        let syntax = self.syntax.as_ref();
        let Some(row) = self.rows.get_mut(y) else { return };
        let tail = row.split_off(at, syntax);
        self.insert_row(y + 1, &tail);
    }

    /// Join row `y` onto the end of row `y - 1` and remove it.
    ///
    /// Returns the previous row's length before the join (where the cursor lands), or `None` if
    /// `y` is 0 or out of bounds.
    pub fn join_with_previous(&mut self, y: usize) -> Option<usize> {
        if y == 0 || y >= self.rows.len() {
            return None;
        }
        let prev_len = self.rows[y - 1].len();
        let moved = self.rows[y].chars().to_vec();
        self.append_string(y - 1, &moved);
        self.delete_row(y);
        Some(prev_len)
    }
}
