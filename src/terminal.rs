//! Terminal setup and teardown, raw byte I/O and window geometry.

use anyhow::{Context, Result};
use nix::sys::termios::{
    self, ControlFlags, InputFlags, LocalFlags, OutputFlags, SetArg, SpecialCharacterIndices, Termios,
};
use std::io::{self, ErrorKind, Read, Write};
use std::os::fd::AsFd;
use tracing::{debug, warn};

/// Byte-level access to the controlling terminal.
///
/// The editor only talks to the terminal through this trait, so everything above it can run
/// against a scripted console in tests.
pub trait Console {
    /// Read one byte. `Ok(None)` means the read timed out with nothing available.
    fn read_byte(&mut self) -> Result<Option<u8>>;

    /// Write `bytes` in a single output call and flush.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;
}

/// RAII guard for raw mode.
///
/// `new()` captures the current attributes and switches to raw mode; `Drop` puts the captured
/// attributes back, so the terminal is restored on every exit path including panic unwind.
pub struct RawMode {
    original: Termios,
}

impl RawMode {
    /// Enter raw mode: no echo, no canonical line editing, no signals, no output processing.
    ///
    /// Reads return after at most 100ms, possibly with zero bytes.
    pub fn enable() -> Result<Self> {
        let original = termios::tcgetattr(io::stdin().as_fd()).context("tcgetattr failed")?;

        let mut raw = original.clone();
        raw.input_flags &= !(InputFlags::BRKINT
            | InputFlags::ICRNL
            | InputFlags::INPCK
            | InputFlags::ISTRIP
            | InputFlags::IXON);
        raw.output_flags &= !OutputFlags::OPOST;
        raw.control_flags |= ControlFlags::CS8;
        raw.local_flags &= !(LocalFlags::ECHO | LocalFlags::ICANON | LocalFlags::ISIG | LocalFlags::IEXTEN);
        raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 0;
        raw.control_chars[SpecialCharacterIndices::VTIME as usize] = 1;

        termios::tcsetattr(io::stdin().as_fd(), SetArg::TCSAFLUSH, &raw).context("tcsetattr failed")?;
        debug!("entered raw mode");
        Ok(Self { original })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = termios::tcsetattr(io::stdin().as_fd(), SetArg::TCSAFLUSH, &self.original) {
            warn!("failed to restore terminal attributes: {e}");
        } else {
            debug!("left raw mode");
        }
    }
}

/// The real terminal: stdin/stdout with raw mode held for its lifetime.
pub struct Terminal {
    _raw: RawMode,
    stdin: io::Stdin,
    stdout: io::Stdout,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        Ok(Self { _raw: RawMode::enable()?, stdin: io::stdin(), stdout: io::stdout() })
    }
}

impl Console for Terminal {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.stdin.read(&mut byte) {
            Ok(1) => Ok(Some(byte[0])),
            Ok(_) => Ok(None),
            Err(e) if matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => Ok(None),
            Err(e) => Err(e).context("read failed"),
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        let mut out = self.stdout.lock();
        out.write_all(bytes).context("write failed")?;
        out.flush().context("flush failed")
    }
}

/// Terminal geometry in character cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSize {
    pub rows: usize,
    pub cols: usize,
}

impl WindowSize {
    /// Used when the terminal will not tell us its size.
    pub const FALLBACK: Self = Self { rows: 24, cols: 80 };
}

/// Query the window size.
///
/// Asks the terminal driver first. If that fails or reports zero columns, pushes the cursor to
/// the bottom-right corner and asks the terminal where it ended up. `Ok(None)` means the cursor
/// report could not be parsed; failing to send the request is an error.
pub fn window_size(console: &mut impl Console) -> Result<Option<WindowSize>> {
    window_size_from(console, crossterm::terminal::size())
}

/// [`window_size`] given the driver's `(cols, rows)` answer.
fn window_size_from(
    console: &mut impl Console,
    direct: io::Result<(u16, u16)>,
) -> Result<Option<WindowSize>> {
    match direct {
        Ok((cols, rows)) if cols > 0 => {
            return Ok(Some(WindowSize { rows: rows.into(), cols: cols.into() }));
        }
        Ok(_) => debug!("terminal reported zero columns, probing with cursor report"),
        Err(e) => debug!("size query failed ({e}), probing with cursor report"),
    }
    console.write_all(b"\x1b[999C\x1b[999B").context("failed to move cursor for size probe")?;
    cursor_position(console)
}

/// Request a cursor position report and parse the answer.
fn cursor_position(console: &mut impl Console) -> Result<Option<WindowSize>> {
    console.write_all(b"\x1b[6n").context("failed to request cursor position")?;

    let mut reply = Vec::with_capacity(32);
    while reply.len() < 31 {
        match console.read_byte()? {
            Some(b'R') | None => break,
            Some(b) => reply.push(b),
        }
    }
    Ok(parse_cursor_report(&reply))
}

/// Parse `ESC [ rows ; cols` (the terminating `R` already stripped).
pub fn parse_cursor_report(reply: &[u8]) -> Option<WindowSize> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let body = std::str::from_utf8(body).ok()?;
    let (rows, cols) = body.split_once(';')?;
    Some(WindowSize { rows: rows.trim().parse().ok()?, cols: cols.trim().parse().ok()? })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::bail;
    use std::collections::VecDeque;

    /// In-memory console: replays scripted input and records everything written.
    ///
    /// `None` entries in the script are read timeouts. Reading past the end of the script is an
    /// error, so a test that waits for input it never scripted fails instead of hanging.
    #[derive(Default)]
    pub struct ScriptedConsole {
        pub input: VecDeque<Option<u8>>,
        pub frames: Vec<Vec<u8>>,
    }

    impl ScriptedConsole {
        pub fn new(bytes: &[u8]) -> Self {
            Self { input: bytes.iter().map(|b| Some(*b)).collect(), frames: Vec::new() }
        }

        pub fn push_timeout(&mut self) {
            self.input.push_back(None);
        }

        pub fn push_bytes(&mut self, bytes: &[u8]) {
            self.input.extend(bytes.iter().map(|b| Some(*b)));
        }

        pub fn last_frame(&self) -> &[u8] {
            self.frames.last().map_or(&[], Vec::as_slice)
        }
    }

    impl Console for ScriptedConsole {
        fn read_byte(&mut self) -> Result<Option<u8>> {
            match self.input.pop_front() {
                Some(b) => Ok(b),
                None => bail!("scripted input exhausted"),
            }
        }

        fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
            self.frames.push(bytes.to_vec());
            Ok(())
        }
    }

    #[test]
    fn parses_cursor_report() {
        assert_eq!(parse_cursor_report(b"\x1b[24;80"), Some(WindowSize { rows: 24, cols: 80 }));
        assert_eq!(parse_cursor_report(b"\x1b[100;250"), Some(WindowSize { rows: 100, cols: 250 }));
    }

    #[test]
    fn rejects_malformed_cursor_report() {
        assert_eq!(parse_cursor_report(b""), None);
        assert_eq!(parse_cursor_report(b"[24;80"), None);
        assert_eq!(parse_cursor_report(b"\x1b[24"), None);
        assert_eq!(parse_cursor_report(b"\x1b[a;b"), None);
    }

    #[test]
    fn cursor_position_reads_until_r() {
        let mut console = ScriptedConsole::new(b"\x1b[40;120Rxyz");
        let size = cursor_position(&mut console).unwrap();
        assert_eq!(size, Some(WindowSize { rows: 40, cols: 120 }));
        assert_eq!(console.frames, vec![b"\x1b[6n".to_vec()]);
        // bytes after the report are left unread
        assert_eq!(console.input.len(), 3);
    }

    const PROBE: &[u8] = b"\x1b[999C\x1b[999B";

    #[test]
    fn direct_size_is_used_without_probing() {
        let mut console = ScriptedConsole::default();
        let size = window_size_from(&mut console, Ok((100, 30))).unwrap();
        assert_eq!(size, Some(WindowSize { rows: 30, cols: 100 }));
        assert!(console.frames.is_empty());
    }

    #[test]
    fn zero_columns_falls_back_to_cursor_report() {
        let mut console = ScriptedConsole::new(b"\x1b[24;80R");
        let size = window_size_from(&mut console, Ok((0, 24))).unwrap();
        assert_eq!(size, Some(WindowSize { rows: 24, cols: 80 }));
        assert_eq!(console.frames, vec![PROBE.to_vec(), b"\x1b[6n".to_vec()]);
    }

    #[test]
    fn driver_error_falls_back_to_cursor_report() {
        let mut console = ScriptedConsole::new(b"\x1b[50;132R");
        let size = window_size_from(&mut console, Err(io::Error::other("not a tty"))).unwrap();
        assert_eq!(size, Some(WindowSize { rows: 50, cols: 132 }));
        assert_eq!(console.frames, vec![PROBE.to_vec(), b"\x1b[6n".to_vec()]);
    }

    #[test]
    fn unparsable_report_gives_no_size() {
        let mut console = ScriptedConsole::new(b"garbage");
        console.push_timeout();
        let size = window_size_from(&mut console, Ok((0, 0))).unwrap();
        assert_eq!(size, None);
        assert_eq!(console.frames.len(), 2);
    }

    #[test]
    fn cursor_position_timeout_is_unparsable() {
        let mut console = ScriptedConsole::new(b"\x1b[40");
        console.push_timeout();
        assert_eq!(cursor_position(&mut console).unwrap(), None);
    }
}
