//! Logging setup and dispatcher state snapshots
//!
//! # Usage
//!
//! The console filter comes from RUST_LOG, falling back to the level chosen
//! on the command line:
//! - `RUST_LOG=debug` - every resolved key event
//! - `RUST_LOG=keyseq::mode=debug` - dispatcher only
//! - `RUST_LOG=keyseq::keymap::cache=info` - keymap compilation
//!
//! # Log Files
//!
//! The file layer always records debug level into
//! `<config dir>/logs/keyseq.log.YYYY-MM-DD`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config_paths;
use crate::mode::{Dispatcher, Mode};

/// Install the console (stderr) and file layers.
///
/// `default_level` is used for the console when RUST_LOG is unset or invalid.
pub fn init(default_level: &str) {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match config_paths::ensure_logs_dir() {
        Ok(logs_dir) => Some(
            fmt::layer()
                .with_writer(tracing_appender::rolling::daily(
                    logs_dir,
                    config_paths::LOG_FILE_NAME,
                ))
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_filter(EnvFilter::new("debug")),
        ),
        Err(e) => {
            eprintln!("Warning: file logging disabled: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Console level for a `-v` count
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Mode and pending keys at one point in time, for logging transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSnapshot {
    pub mode: Mode,
    pub pending: String,
}

impl DispatchSnapshot {
    pub fn from_dispatcher(dispatcher: &Dispatcher) -> Self {
        Self {
            mode: dispatcher.mode(),
            pending: dispatcher.suffix(),
        }
    }

    /// Describe what changed between `self` and `later`
    pub fn diff(&self, later: &DispatchSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        if self.mode != later.mode {
            changes.push(format!("mode: {} → {}", self.mode, later.mode));
        }
        if self.pending != later.pending {
            changes.push(format!("pending: '{}' → '{}'", self.pending, later.pending));
        }
        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
