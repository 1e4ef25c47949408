//! `tilde`: a small full-screen text editor for ANSI terminals.
//!
//! ## Reading guide (high level architecture)
//! - **`main()` / `run()`**: parses arguments, puts the terminal in raw mode and runs the
//!   refresh → read key → dispatch loop.
//! - **`terminal`**: the `Console` byte I/O seam, the raw-mode guard and window-size detection.
//! - **`keys`**: decodes raw bytes and escape sequences into logical keys.
//! - **`row` / `buffer`**: the document as a list of byte rows, each with a tab-expanded render
//!   and per-column highlight classes.
//! - **`syntax`**: filetype profiles (embedded TOML) and the per-row highlighter.
//! - **`editor::Editor`**: cursor, viewport, prompts, search, save and the screen compositor.

mod buffer;
mod editor;
mod keys;
mod logging;
mod row;
mod syntax;
mod terminal;
mod types;
mod utils;

use anyhow::Result;
use editor::Editor;
use std::io::{self, Write};
use std::path::PathBuf;
use terminal::{window_size, Console, Terminal};
use tracing::info;

const CLEAR_SCREEN: &[u8] = b"\x1b[2J\x1b[H";

/// Program entry point.
///
/// `run()` owns the terminal, so by the time an error reaches us raw mode has been restored and
/// the message can be printed on a clean screen.
fn main() {
    if let Err(e) = run() {
        let mut stdout = io::stdout();
        // best effort: we are already reporting a failure
        let _ = stdout.write_all(CLEAR_SCREEN);
        let _ = stdout.flush();
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut file_to_open = None;

    if args.len() > 1 {
        match args[1].as_str() {
            "-h" | "--help" => {
                println!("tilde — a small terminal text editor");
                println!();
                println!("USAGE:");
                println!("    tilde [FILE]          Open a file");
                println!("    tilde -h, --help      Show this help message");
                println!("    tilde -V, --version   Show version information");
                println!();
                println!("KEYBINDINGS:");
                println!("    Ctrl+S                Save");
                println!("    Ctrl+Q                Quit");
                println!("    Ctrl+F                Find (arrows step between matches)");
                println!();
                println!("ENVIRONMENT:");
                println!("    TILDE_LOG             Write a debug log to this file");
                return Ok(());
            }
            "-V" | "-v" | "--version" => {
                println!("tilde {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            flag if flag.starts_with('-') => {
                eprintln!("Error: Unknown flag '{flag}'");
                eprintln!("Try 'tilde --help' for more information.");
                std::process::exit(1);
            }
            path => {
                file_to_open = Some(PathBuf::from(path));
            }
        }
    }

    logging::init()?;
    let syntaxes = syntax::builtin_profiles()?;

    let mut term = Terminal::new()?;

    let size = window_size(&mut term)?;
    info!(?size, "starting editor");

    let mut editor = Editor::startup(size, syntaxes);
    if let Some(path) = file_to_open {
        editor.open(path)?;
    }

    loop {
        editor.refresh_screen(&mut term)?;
        if editor.process_keypress(&mut term)? {
            break;
        }
    }

    term.write_all(CLEAR_SCREEN)?;
    info!("exiting");
    Ok(())
}
