//! Diagnostic logging.
//!
//! The editor owns the terminal, so logs can only go to a file. Nothing is installed unless
//! `TILDE_LOG` names one; `RUST_LOG` filters as usual and defaults to `debug`.

use anyhow::{Context, Result};
use std::env;
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log file path.
const LOG_ENV: &str = "TILDE_LOG";

/// Install the global subscriber if logging was requested.
pub fn init() -> Result<()> {
    let Some(path) = env::var_os(LOG_ENV) else { return Ok(()) };
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file {}", path.to_string_lossy()))?;
    build_subscriber(file).init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging started");
    Ok(())
}

fn build_subscriber(log_file: File) -> impl tracing::Subscriber + Send + Sync {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let fmt_layer = fmt::layer().with_ansi(false).with_writer(Arc::new(log_file));

    tracing_subscriber::registry().with(fmt_layer).with(env_filter)
}
