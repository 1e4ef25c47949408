//! A single document row and its derived display forms.

use crate::syntax::{highlight_row, Highlight, SyntaxProfile};
use crate::types::TAB_STOP;

/// One line of the document.
///
/// `render` and `hl` are derived from `chars` and are only ever rebuilt through [`Row::update`],
/// so every mutation path in the buffer keeps them in sync.
#[derive(Debug, Clone, Default)]
pub struct Row {
    /// Position of this row in the document.
    pub idx: usize,
    /// Logical content, without the line terminator.
    chars: Vec<u8>,
    /// `chars` with tabs expanded to spaces.
    render: Vec<u8>,
    /// One class per byte of `render`.
    hl: Vec<Highlight>,
}

impl Row {
    pub fn new(idx: usize, chars: Vec<u8>, syntax: Option<&SyntaxProfile>) -> Self {
        let mut row = Self { idx, chars, render: Vec::new(), hl: Vec::new() };
        row.update(syntax);
        row
    }

    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    pub fn render(&self) -> &[u8] {
        &self.render
    }

    pub fn hl(&self) -> &[Highlight] {
        &self.hl
    }

    /// Mutable highlight slice, for transient overlays. Its length cannot change.
    pub fn hl_mut(&mut self) -> &mut [Highlight] {
        &mut self.hl
    }

    /// Logical length in bytes.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Rebuild `render` and `hl` from `chars`.
    pub fn update(&mut self, syntax: Option<&SyntaxProfile>) {
        let tabs = self.chars.iter().filter(|&&c| c == b'\t').count();
        self.render.clear();
        self.render.reserve(self.chars.len() + tabs * (TAB_STOP - 1));
        for &c in &self.chars {
            if c == b'\t' {
                self.render.push(b' ');
                while self.render.len() % TAB_STOP != 0 {
                    self.render.push(b' ');
                }
            } else {
                self.render.push(c);
            }
        }
        self.hl = highlight_row(&self.render, syntax);
    }

    /// Insert a byte at `at`, clamped to the row length.
    pub(crate) fn insert_byte(&mut self, at: usize, c: u8, syntax: Option<&SyntaxProfile>) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, c);
        self.update(syntax);
    }

    pub(crate) fn append(&mut self, bytes: &[u8], syntax: Option<&SyntaxProfile>) {
        self.chars.extend_from_slice(bytes);
        self.update(syntax);
    }

    /// Remove the byte at `at`. Returns false (and changes nothing) when `at` is past the end.
    pub(crate) fn remove_byte(&mut self, at: usize, syntax: Option<&SyntaxProfile>) -> bool {
        if at >= self.chars.len() {
            return false;
        }
        self.chars.remove(at);
        self.update(syntax);
        true
    }

    /// Cut the row at `at`, returning everything from `at` onward.
    pub(crate) fn split_off(&mut self, at: usize, syntax: Option<&SyntaxProfile>) -> Vec<u8> {
        let at = at.min(self.chars.len());
        let tail = self.chars.split_off(at);
        self.update(syntax);
        tail
    }

    /// Display column of logical column `cx`.
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        let mut rx = 0;
        for &c in self.chars.iter().take(cx) {
            if c == b'\t' {
                rx += (TAB_STOP - 1) - (rx % TAB_STOP);
            }
            rx += 1;
        }
        rx
    }

    /// Logical column containing display column `rx`.
    ///
    /// Walks the row until the accumulated width passes `rx`; past the end of the row this is the
    /// row length.
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, &c) in self.chars.iter().enumerate() {
            if c == b'\t' {
                cur_rx += (TAB_STOP - 1) - (cur_rx % TAB_STOP);
            }
            cur_rx += 1;
            if cur_rx > rx {
                return cx;
            }
        }
        self.chars.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(s: &[u8]) -> Row {
        Row::new(0, s.to_vec(), None)
    }

    #[test]
    fn render_expands_tabs_to_next_stop() {
        let r = row(b"a\tb");
        assert_eq!(r.render(), b"a       b");
        let r = row(b"1234567\tx");
        assert_eq!(r.render(), b"1234567 x");
        let r = row(b"12345678\tx");
        assert_eq!(r.render().len(), 17);
    }

    #[test]
    fn n_tabs_render_to_8n_columns() {
        for n in 0..6 {
            let r = row(&vec![b'\t'; n]);
            assert_eq!(r.render().len(), 8 * n);
            for k in 0..=n {
                assert_eq!(r.cx_to_rx(k), 8 * k);
            }
        }
    }

    #[test]
    fn highlight_tracks_render_length() {
        let r = row(b"\tx\ty");
        assert_eq!(r.hl().len(), r.render().len());
    }

    #[test]
    fn cx_rx_round_trip() {
        for s in [&b""[..], b"abc", b"\t", b"a\tb\t\tc", b"\t\tx", b"1234567\t8"] {
            let r = row(s);
            for cx in 0..=r.len() {
                assert_eq!(r.rx_to_cx(r.cx_to_rx(cx)), cx, "row {s:?} cx {cx}");
            }
        }
    }

    #[test]
    fn rx_inside_tab_maps_to_the_tab() {
        let r = row(b"a\tb");
        // columns 1..8 are all the tab
        for rx in 1..8 {
            assert_eq!(r.rx_to_cx(rx), 1);
        }
        assert_eq!(r.rx_to_cx(8), 2);
        assert_eq!(r.rx_to_cx(100), 3);
    }

    #[test]
    fn insert_then_remove_restores_content() {
        let original = b"hello\tworld".to_vec();
        for c in 0..=original.len() {
            let mut r = row(&original);
            r.insert_byte(c, b'X', None);
            assert_eq!(r.len(), original.len() + 1);
            assert!(r.remove_byte(c, None));
            assert_eq!(r.chars(), &original[..]);
            assert_eq!(r.render(), row(&original).render());
        }
    }

    #[test]
    fn insert_clamps_to_end() {
        let mut r = row(b"ab");
        r.insert_byte(99, b'c', None);
        assert_eq!(r.chars(), b"abc");
        r.insert_byte(0, b'_', None);
        assert_eq!(r.chars(), b"_abc");
    }

    #[test]
    fn remove_past_end_is_noop() {
        let mut r = row(b"ab");
        assert!(!r.remove_byte(2, None));
        assert_eq!(r.chars(), b"ab");
    }

    #[test]
    fn split_preserves_bytes() {
        let mut r = row(b"ab\tcd");
        let tail = r.split_off(3, None);
        assert_eq!(r.chars(), b"ab\t");
        assert_eq!(tail, b"cd");
        assert_eq!(r.render(), b"ab      ");
    }
}
