//! Modes and the key-event dispatcher
//!
//! Every mode owns a buffer of pending keys and a parser. Most modes resolve
//! against their binding table; hint, gobble and nmode have parsers of
//! their own.
//!
//! ```text
//! KeyEvent → Dispatcher::feed → mode parser → Resolved → Executor
//!                                                 ↓
//!                                            ModeControl
//! ```

mod dispatcher;
mod parsers;

use std::fmt;
use std::str::FromStr;

use crate::keymap::KeymapError;

pub use dispatcher::Dispatcher;
pub use parsers::{GobbleState, NModeState};

/// The closed set of input modes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Visual,
    Ignore,
    Hint,
    Gobble,
    Input,
    Find,
    NMode,
}

impl Mode {
    pub const ALL: [Mode; 9] = [
        Mode::Normal,
        Mode::Insert,
        Mode::Visual,
        Mode::Ignore,
        Mode::Hint,
        Mode::Gobble,
        Mode::Input,
        Mode::Find,
        Mode::NMode,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Insert => "insert",
            Mode::Visual => "visual",
            Mode::Ignore => "ignore",
            Mode::Hint => "hint",
            Mode::Gobble => "gobble",
            Mode::Input => "input",
            Mode::Find => "find",
            Mode::NMode => "nmode",
        }
    }

    /// Name of the binding table this mode resolves against
    pub fn config_name(self) -> String {
        match self {
            Mode::Normal => "nmaps".to_string(),
            Mode::Insert => "imaps".to_string(),
            Mode::Visual => "vmaps".to_string(),
            Mode::Input => "inputmaps".to_string(),
            Mode::Ignore => "ignoremaps".to_string(),
            Mode::Hint => "hintmaps".to_string(),
            other => format!("{}maps", other.name()),
        }
    }

    /// Whether `nmode` can borrow this mode's bindings. Gobble and nmode
    /// have parsers of their own rather than a table.
    pub fn has_table(self) -> bool {
        !matches!(self, Mode::Gobble | Mode::NMode)
    }

    /// Modes that focusing a text field does not switch away from
    pub fn keeps_focus_mode(self) -> bool {
        matches!(self, Mode::Ignore | Mode::Hint | Mode::Input | Mode::Find)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = KeymapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| KeymapError::UnknownMode(s.to_string()))
    }
}

/// A mode switch requested while executing a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Enter {
    Gobble(GobbleState),
    NMode(NModeState),
}

/// The executor's handle on the dispatcher's mode.
///
/// Changes are applied once the command finishes executing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeControl {
    mode: Mode,
    enter: Option<Enter>,
}

impl ModeControl {
    pub fn new(mode: Mode) -> Self {
        Self { mode, enter: None }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.enter = None;
    }

    /// Collect `chars` printable characters, then run `end_command` with them
    pub fn gobble(&mut self, chars: usize, end_command: impl Into<String>) {
        self.mode = Mode::Gobble;
        self.enter = Some(Enter::Gobble(GobbleState::new(chars, end_command)));
    }

    /// Run `count` commands from `mode`'s table, then run `end_command`
    pub fn nmode(&mut self, mode: Mode, count: usize, end_command: impl Into<String>) {
        self.mode = Mode::NMode;
        self.enter = Some(Enter::NMode(NModeState::new(mode, count, end_command)));
    }

    pub(crate) fn into_parts(self) -> (Mode, Option<Enter>) {
        (self.mode, self.enter)
    }
}
