//! keyseq - modal key-sequence resolution
//!
//! This crate compiles vim-style binding strings into keymaps, resolves
//! growing buffers of key events against them without timeouts, and
//! dispatches events to per-mode parsers that hand resolved commands to an
//! executor.

pub mod cli;
pub mod config_paths;
pub mod executor;
pub mod keymap;
pub mod mode;
pub mod tracing;

// Re-export commonly used types
pub use executor::{EchoExecutor, Executor};
pub use keymap::{Key, KeyEvent, KeyMap, KeymapConfig, KeymapError, ParserResponse};
pub use mode::{Dispatcher, Mode, ModeControl};
