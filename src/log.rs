// src/log.rs
//! Logging setup. Library code only emits `tracing` events; frontends call
//! [`init`] once to decide where they go.

use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};
use crate::file::ensure_directory;

/// Level used when `RUST_LOG` is unset, by `-v` count.
pub fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// `RUST_LOG` wins when set; otherwise `verbosity` picks the crate's level
/// and everything else stays at `warn`.
pub fn env_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,borough_map={}", default_level(verbosity)))
    })
}

/// Install the global subscriber. Events go to stderr, or are appended to
/// `log_file` (parent directories created) without colour codes.
pub fn init(verbosity: u8, log_file: Option<&Path>) -> Result<()> {
    let filter = env_filter(verbosity);
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let installed = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                ensure_directory(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| Error::Config(format!("log file {}: {e}", path.display())))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder
            .with_ansi(std::io::stderr().is_terminal())
            .with_writer(std::io::stderr)
            .try_init(),
    };
    installed.map_err(|e| Error::Config(format!("logging already initialised: {e}")))
}
