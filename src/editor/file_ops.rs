//! File operations: open and save.

use super::prompt::PlainInput;
use super::Editor;
use crate::buffer::Buffer;
use crate::terminal::Console;
use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

impl Editor {
    /// Load `path` into the editor. Failing to read it is fatal to the caller.
    pub fn open(&mut self, path: PathBuf) -> Result<()> {
        self.buf = Buffer::open(&path)?;
        info!(path = %path.display(), rows = self.buf.len(), "opened file");
        self.file_path = Some(path);
        self.select_syntax();
        Ok(())
    }

    /// Save to the current file, asking for a name first if there is none.
    ///
    /// Write errors are reported in the message bar; only terminal errors escape.
    pub fn save(&mut self, console: &mut impl Console) -> Result<()> {
        if self.file_path.is_none() {
            let Some(name) = self.prompt(console, "Save as: ", " (ESC to cancel)", &mut PlainInput)? else {
                self.set_status("Save aborted");
                return Ok(());
            };
            self.file_path = Some(PathBuf::from(name));
            self.select_syntax();
        }
        let Some(path) = self.file_path.clone() else { return Ok(()) };

        let bytes = self.buf.to_bytes();
        match fs::write(&path, &bytes) {
            Ok(()) => {
                self.buf.dirty = false;
                info!(path = %path.display(), bytes = bytes.len(), "saved file");
                self.set_status(format!("{} bytes written to disk", bytes.len()));
            }
            Err(e) => {
                warn!(path = %path.display(), "save failed: {e}");
                self.set_status(format!("Can't save! I/O error: {e}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{editor, editor_with, lines};
    use crate::keys::ctrl;
    use crate::terminal::tests::ScriptedConsole;

    #[test]
    fn open_reads_rows_and_selects_syntax() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prog.c");
        std::fs::write(&path, "int main() {\r\n\treturn 0;\n}\n").unwrap();

        let mut ed = editor();
        ed.open(path.clone()).unwrap();
        assert_eq!(lines(&ed), ["int main() {", "\treturn 0;", "}"]);
        assert!(!ed.buf.dirty);
        assert_eq!(ed.file_path.as_deref(), Some(path.as_path()));
        assert_eq!(ed.buf.syntax().unwrap().filetype, "c");
    }

    #[test]
    fn open_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = editor();
        assert!(ed.open(dir.path().join("nope.txt")).is_err());
    }

    #[test]
    fn save_writes_rows_and_clears_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut ed = editor_with(&["one", "two"]);
        ed.buf.dirty = true;
        ed.file_path = Some(path.clone());

        let mut console = ScriptedConsole::default();
        ed.save(&mut console).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"one\ntwo\n");
        assert!(!ed.buf.dirty);
        assert_eq!(ed.status.as_ref().unwrap().text, "8 bytes written to disk");
    }

    #[test]
    fn save_then_reload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        let mut ed = editor_with(&["a\tb", "", "  c  "]);
        ed.file_path = Some(path.clone());
        ed.save(&mut ScriptedConsole::default()).unwrap();

        let mut reloaded = editor();
        reloaded.open(path).unwrap();
        assert_eq!(lines(&reloaded), lines(&ed));
    }

    #[test]
    fn save_prompts_for_a_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.rs");
        let mut ed = editor_with(&["fn main() {}"]);
        let mut console = ScriptedConsole::new(&[ctrl(b's')]);
        console.push_bytes(path.to_str().unwrap().as_bytes());
        console.push_bytes(b"\r");

        assert!(!ed.process_keypress(&mut console).unwrap());
        assert_eq!(std::fs::read(&path).unwrap(), b"fn main() {}\n");
        assert_eq!(ed.buf.syntax().unwrap().filetype, "rust");
    }

    #[test]
    fn cancelled_save_as_aborts() {
        let mut ed = editor_with(&["x"]);
        ed.buf.dirty = true;
        let mut console = ScriptedConsole::new(b"\x1b");
        console.push_timeout();
        ed.save(&mut console).unwrap();
        assert!(ed.file_path.is_none());
        assert!(ed.buf.dirty);
        assert_eq!(ed.status.as_ref().unwrap().text, "Save aborted");
    }

    #[test]
    fn write_failure_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = editor_with(&["x"]);
        ed.buf.dirty = true;
        // a directory cannot be written as a file
        ed.file_path = Some(dir.path().to_path_buf());
        ed.save(&mut ScriptedConsole::default()).unwrap();
        assert!(ed.buf.dirty);
        assert!(ed.status.as_ref().unwrap().text.starts_with("Can't save! I/O error:"));
    }
}
