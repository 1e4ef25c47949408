//! Utility functions.

use unicode_width::UnicodeWidthChar;

/// Byte offset of the first occurrence of `needle` in `haystack`.
///
/// An empty needle never matches: the search engine treats an empty query as "nothing to find".
pub fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Longest prefix of `s` that fits in `max_cols` terminal columns.
///
/// Never splits a character, so the result is always valid UTF-8.
pub fn truncate_to_width(s: &str, max_cols: usize) -> &str {
    let mut used = 0;
    for (bi, ch) in s.char_indices() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(1);
        if used + w > max_cols {
            return &s[..bi];
        }
        used += w;
    }
    s
}

/// Display width of `s` in terminal columns.
pub fn display_width(s: &str) -> usize {
    s.chars().map(|ch| UnicodeWidthChar::width(ch).unwrap_or(1)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_bytes_basic() {
        assert_eq!(find_bytes(b"hello world", b"world"), Some(6));
        assert_eq!(find_bytes(b"hello world", b"o"), Some(4));
        assert_eq!(find_bytes(b"hello", b"xyz"), None);
    }

    #[test]
    fn find_bytes_edge_cases() {
        assert_eq!(find_bytes(b"abc", b""), None);
        assert_eq!(find_bytes(b"ab", b"abc"), None);
        assert_eq!(find_bytes(b"abc", b"abc"), Some(0));
    }

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_to_width("hello world", 5), "hello");
        assert_eq!(truncate_to_width("hi", 5), "hi");
        assert_eq!(truncate_to_width("hi", 0), "");
    }

    #[test]
    fn truncate_wide_chars() {
        // CJK characters are two columns each
        assert_eq!(truncate_to_width("日本語", 5), "日本");
        assert_eq!(truncate_to_width("héllo", 2), "hé");
    }

    #[test]
    fn width_counts_columns() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("日本"), 4);
    }
}
