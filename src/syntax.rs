//! Syntax highlighting: per-filetype rule tables and the row classifier.
//!
//! Profiles are authored in `syntax.toml` and compiled into the binary. Classification works on a
//! row's `render` bytes (tabs already expanded) and yields one [`Highlight`] per byte.

use anyhow::{Context, Result};
use crossterm::style::Color;
use serde::Deserialize;

/// The built-in profile database.
const BUILTIN_SYNTAX: &str = include_str!("syntax.toml");

/// Highlight class of a single display byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Highlight {
    #[default]
    Normal,
    Comment,
    /// Control and structure words.
    Keyword1,
    /// Type names.
    Keyword2,
    Number,
    String,
    /// Transient overlay for the current search match.
    Match,
}

impl Highlight {
    /// Terminal foreground color for this class.
    pub fn color(self) -> Color {
        match self {
            Self::Normal => Color::Reset,
            Self::Comment => Color::Cyan,
            Self::Keyword1 => Color::Yellow,
            Self::Keyword2 => Color::Green,
            Self::Number => Color::Red,
            Self::String => Color::Magenta,
            Self::Match => Color::Blue,
        }
    }
}

/// A static rule set for one filetype.
#[derive(Debug, Clone, Deserialize)]
pub struct SyntaxProfile {
    /// Short name shown in the status bar.
    pub filetype: String,
    /// Extensions (`.c`) or file-name substrings (`Makefile`) that select this profile.
    pub filematch: Vec<String>,
    /// Keywords; a trailing `|` marks a type name (`Keyword2`).
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub single_line_comment: Option<String>,
    #[serde(default)]
    pub highlight_numbers: bool,
    #[serde(default)]
    pub highlight_strings: bool,
}

#[derive(Deserialize)]
struct SyntaxDb {
    #[serde(rename = "syntax")]
    profiles: Vec<SyntaxProfile>,
}

/// Load the built-in profiles.
pub fn builtin_profiles() -> Result<Vec<SyntaxProfile>> {
    parse_profiles(BUILTIN_SYNTAX).context("built-in syntax database is malformed")
}

fn parse_profiles(src: &str) -> Result<Vec<SyntaxProfile>> {
    let db: SyntaxDb = toml::from_str(src)?;
    Ok(db.profiles)
}

/// Pick the first profile whose matchers accept `filename`.
pub fn select_profile<'a>(profiles: &'a [SyntaxProfile], filename: &str) -> Option<&'a SyntaxProfile> {
    profiles.iter().find(|p| p.matches(filename))
}

impl SyntaxProfile {
    /// Whether this profile applies to `filename`.
    ///
    /// A matcher starting with `.` must equal the name's last extension (including the dot);
    /// any other matcher only has to appear somewhere in the name.
    pub fn matches(&self, filename: &str) -> bool {
        let ext = filename.rfind('.').map(|i| &filename[i..]);
        self.filematch.iter().any(|m| {
            if m.starts_with('.') {
                ext == Some(m.as_str())
            } else {
                filename.contains(m.as_str())
            }
        })
    }

    /// If a keyword starts at the beginning of `text` and is followed by a separator, return its
    /// length and class.
    fn keyword_at(&self, text: &[u8]) -> Option<(usize, Highlight)> {
        self.keywords.iter().find_map(|kw| {
            let (word, class) = match kw.strip_suffix('|') {
                Some(w) => (w, Highlight::Keyword2),
                None => (kw.as_str(), Highlight::Keyword1),
            };
            let word = word.as_bytes();
            if word.is_empty() || !text.starts_with(word) {
                return None;
            }
            // end of row counts as NUL, which is a separator
            let next = text.get(word.len()).copied().unwrap_or(0);
            is_separator(next).then_some((word.len(), class))
        })
    }
}

/// Token boundary test: whitespace, NUL or one of the operator/punctuation bytes.
pub fn is_separator(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c | 0)
        || b",.()+-/*=~%<>[];".contains(&c)
}

/// Classify every byte of `render`.
///
/// State carried across the row: whether the previous byte ended a token, and the quote byte of
/// the string we are inside (if any). Nothing is carried between rows.
pub fn highlight_row(render: &[u8], syntax: Option<&SyntaxProfile>) -> Vec<Highlight> {
    let mut hl = vec![Highlight::Normal; render.len()];
    let Some(syntax) = syntax else { return hl };

    let comment = syntax.single_line_comment.as_deref().unwrap_or("").as_bytes();

    let mut prev_sep = true;
    let mut in_string: Option<u8> = None;
    let mut i = 0;

    while i < render.len() {
        let c = render[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };

        if !comment.is_empty() && in_string.is_none() && render[i..].starts_with(comment) {
            hl[i..].fill(Highlight::Comment);
            break;
        }

        if syntax.highlight_strings {
            if let Some(quote) = in_string {
                hl[i] = Highlight::String;
                if c == b'\\' && i + 1 < render.len() {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            } else if c == b'"' || c == b'\'' {
                in_string = Some(c);
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if syntax.highlight_numbers
            && ((c.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                || (c == b'.' && prev_hl == Highlight::Number))
        {
            hl[i] = Highlight::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        if prev_sep {
            if let Some((len, class)) = syntax.keyword_at(&render[i..]) {
                hl[i..i + len].fill(class);
                i += len;
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    hl
}
