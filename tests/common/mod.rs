//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use keyseq::executor::{apply_mode_command, split_composite, Executor};
use keyseq::keymap::{default_config, mapstr_to_keyseq, parse_keymap_yaml, KeyContext};
use keyseq::mode::{Dispatcher, Mode, ModeControl};

/// Executor that records each command with the mode it ran in.
///
/// Mode-switching commands are applied like the CLI's executor does.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub log: Vec<(Mode, String)>,
    /// Commands that fail instead of running
    pub failing: Vec<String>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(commands: &[&str]) -> Self {
        Self {
            log: Vec::new(),
            failing: commands.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Commands executed since the last call, without their modes
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.log)
            .into_iter()
            .map(|(_, command)| command)
            .collect()
    }
}

impl Executor for RecordingExecutor {
    fn execute(&mut self, exstr: &str, modes: &mut ModeControl) -> anyhow::Result<()> {
        self.log.push((modes.mode(), exstr.to_string()));
        if self.failing.iter().any(|c| c == exstr) {
            anyhow::bail!("{} failed", exstr);
        }
        for part in split_composite(exstr) {
            apply_mode_command(part, modes)?;
        }
        Ok(())
    }
}

/// Dispatcher over the built-in tables
pub fn default_dispatcher() -> Dispatcher {
    Dispatcher::new(default_config())
}

/// Dispatcher over the tables in `yaml`
pub fn dispatcher(yaml: &str) -> Dispatcher {
    Dispatcher::new(parse_keymap_yaml(yaml).unwrap())
}

/// Feed the keys of `mapstr` with focus on the page; returns executed commands
pub fn type_keys(d: &mut Dispatcher, ex: &mut RecordingExecutor, mapstr: &str) -> Vec<String> {
    type_keys_in(d, ex, mapstr, KeyContext::page())
}

/// Feed the keys of `mapstr` with focus in a text field
pub fn type_in_field(d: &mut Dispatcher, ex: &mut RecordingExecutor, mapstr: &str) -> Vec<String> {
    type_keys_in(d, ex, mapstr, KeyContext::text_field())
}

fn type_keys_in(
    d: &mut Dispatcher,
    ex: &mut RecordingExecutor,
    mapstr: &str,
    context: KeyContext,
) -> Vec<String> {
    for key in mapstr_to_keyseq(mapstr) {
        let _ = d.feed(key, context, ex);
    }
    ex.take()
}
