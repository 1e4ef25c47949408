//! Key decoding: turns raw terminal bytes into logical key events.

use crate::terminal::Console;
use anyhow::Result;

/// A decoded key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Any byte that is not part of an escape sequence (including Enter and Ctrl combinations).
    Char(u8),
    Backspace,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Enter arrives as a carriage return in raw mode.
pub const ENTER: u8 = b'\r';

/// The byte a terminal sends for Ctrl + `k`.
pub const fn ctrl(k: u8) -> u8 {
    k & 0x1f
}

/// Block until a full key is available and decode it.
///
/// Read timeouts before the first byte are retried forever; a timeout in the middle of an escape
/// sequence yields [`Key::Escape`].
pub fn read_key(console: &mut impl Console) -> Result<Key> {
    let c = loop {
        if let Some(b) = console.read_byte()? {
            break b;
        }
    };

    match c {
        0x1b => decode_escape(console),
        127 => Ok(Key::Backspace),
        _ => Ok(Key::Char(c)),
    }
}

fn decode_escape(console: &mut impl Console) -> Result<Key> {
    let Some(first) = console.read_byte()? else { return Ok(Key::Escape) };
    let Some(second) = console.read_byte()? else { return Ok(Key::Escape) };

    let key = match (first, second) {
        (b'[', b'0'..=b'9') => match console.read_byte()? {
            Some(b'~') => match second {
                b'1' | b'7' => Key::Home,
                b'3' => Key::Delete,
                b'4' | b'8' => Key::End,
                b'5' => Key::PageUp,
                b'6' => Key::PageDown,
                _ => Key::Escape,
            },
            Some(b) if !is_final_byte(b) => {
                skip_to_final_byte(console)?;
                Key::Escape
            }
            _ => Key::Escape,
        },
        (b'[', b'A') => Key::ArrowUp,
        (b'[', b'B') => Key::ArrowDown,
        (b'[', b'C') => Key::ArrowRight,
        (b'[', b'D') => Key::ArrowLeft,
        (b'[' | b'O', b'H') => Key::Home,
        (b'[' | b'O', b'F') => Key::End,
        _ => Key::Escape,
    };
    Ok(key)
}

/// Bytes that end a CSI sequence.
fn is_final_byte(b: u8) -> bool {
    (0x40..=0x7e).contains(&b)
}

/// Discard the rest of an unrecognized CSI sequence (e.g. `ESC [ 1 ; 5 C`) so its tail is not
/// read back as typed text.
fn skip_to_final_byte(console: &mut impl Console) -> Result<()> {
    for _ in 0..MAX_SEQUENCE_LEN {
        match console.read_byte()? {
            Some(b) if !is_final_byte(b) => {}
            _ => break,
        }
    }
    Ok(())
}

const MAX_SEQUENCE_LEN: usize = 16;
