//! The executor boundary
//!
//! The dispatcher hands every resolved command string to an [`Executor`].
//! What a command does is up to the executor; the only commands this crate
//! understands itself are the mode switches in [`apply_mode_command`].

use anyhow::{bail, Context};

use crate::mode::{Mode, ModeControl};

/// Runs resolved command strings
pub trait Executor {
    /// Execute one command. Mode changes go through `modes`.
    fn execute(&mut self, exstr: &str, modes: &mut ModeControl) -> anyhow::Result<()>;
}

/// Split a `composite a; b | c` command into its parts.
///
/// Anything else is a single part.
pub fn split_composite(exstr: &str) -> Vec<&str> {
    match exstr.trim().strip_prefix("composite ") {
        Some(rest) => rest
            .split([';', '|'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect(),
        None => vec![exstr.trim()],
    }
}

/// Apply the mode-switching commands:
///
/// - `mode <name>`
/// - `gobble <count> <command...>`
/// - `nmode <mode> <count> <command...>`
/// - `hint [args]` enters hint mode, `hint.reset` and `hint.selectFocusedHint` leave it
///
/// Returns whether `command` was one of them.
pub fn apply_mode_command(command: &str, modes: &mut ModeControl) -> anyhow::Result<bool> {
    let mut words = command.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(false);
    };

    match name {
        "mode" => {
            let target = words.next().context("mode: missing mode name")?;
            modes.set_mode(target.parse::<Mode>()?);
        }
        "gobble" => {
            let count = parse_count(words.next(), "gobble")?;
            let end: Vec<&str> = words.collect();
            if end.is_empty() {
                bail!("gobble: missing command");
            }
            modes.gobble(count, end.join(" "));
        }
        "nmode" => {
            let target = words.next().context("nmode: missing mode name")?;
            let mode = target.parse::<Mode>()?;
            if !mode.has_table() {
                bail!("nmode: {} mode has no bindings to borrow", mode);
            }
            let count = parse_count(words.next(), "nmode")?;
            let end: Vec<&str> = words.collect();
            if end.is_empty() {
                bail!("nmode: missing command");
            }
            modes.nmode(mode, count, end.join(" "));
        }
        "hint" => modes.set_mode(Mode::Hint),
        "hint.reset" | "hint.selectFocusedHint" => modes.set_mode(Mode::Normal),
        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_count(word: Option<&str>, command: &str) -> anyhow::Result<usize> {
    let word = word.with_context(|| format!("{}: missing count", command))?;
    word.parse::<usize>()
        .with_context(|| format!("{}: invalid count '{}'", command, word))
}

/// Records every command and applies mode switches; used by the CLI
#[derive(Debug, Default)]
pub struct EchoExecutor {
    pub executed: Vec<String>,
}

impl EchoExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands executed since the last call
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.executed)
    }
}

impl Executor for EchoExecutor {
    fn execute(&mut self, exstr: &str, modes: &mut ModeControl) -> anyhow::Result<()> {
        self.executed.push(exstr.to_string());
        for part in split_composite(exstr) {
            apply_mode_command(part, modes)?;
        }
        Ok(())
    }
}
