//! The message-bar prompt, shared by "Save as" and incremental search.

use super::Editor;
use crate::keys::{ctrl, read_key, Key, ENTER};
use crate::terminal::Console;
use anyhow::Result;

/// Per-keystroke behavior plugged into [`Editor::prompt`].
///
/// Called after every key the prompt reads, including the Enter or Escape that ends it, with the
/// input as it stands after that key.
pub trait PromptHandler {
    fn on_key(&mut self, editor: &mut Editor, input: &str, key: Key);
}

/// A prompt that only collects text.
pub struct PlainInput;

impl PromptHandler for PlainInput {
    fn on_key(&mut self, _editor: &mut Editor, _input: &str, _key: Key) {}
}

impl Editor {
    /// Ask the user for a line of text in the message bar.
    ///
    /// The bar shows `label`, the input so far, then `hint`. Returns `None` if the user pressed
    /// Escape; Enter only accepts non-empty input.
    pub fn prompt(
        &mut self,
        console: &mut impl Console,
        label: &str,
        hint: &str,
        handler: &mut impl PromptHandler,
    ) -> Result<Option<String>> {
        let mut input = String::new();

        loop {
            self.set_status(format!("{label}{input}{hint}"));
            self.refresh_screen(console)?;

            let key = read_key(console)?;
            match key {
                Key::Backspace | Key::Delete => {
                    input.pop();
                }
                Key::Char(c) if c == ctrl(b'h') => {
                    input.pop();
                }
                Key::Escape => {
                    self.set_status("");
                    handler.on_key(self, &input, key);
                    return Ok(None);
                }
                Key::Char(ENTER) if !input.is_empty() => {
                    self.set_status("");
                    handler.on_key(self, &input, key);
                    return Ok(Some(input));
                }
                Key::Char(c) if c.is_ascii() && !c.is_ascii_control() => input.push(char::from(c)),
                _ => {}
            }

            handler.on_key(self, &input, key);
        }
    }
}
