//! Command-line interface
//!
//! Supports:
//! - Feeding key events through a dispatcher and printing resolved commands
//! - Checking that every configured table compiles
//! - Canonicalising binding strings
//! - Listing which-key completions for a prefix

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::executor::EchoExecutor;
use crate::keymap::{
    canonicalise_mapstr, default_config, load_default_keymap, load_keymap_file, mapstr_to_keyseq,
    which_key_mapstr, KeyEvent, KeymapConfig, KeymapError,
};
use crate::mode::{Dispatcher, Mode};

/// Modal key-sequence resolver
#[derive(Parser, Debug)]
#[command(name = "keyseq", version, about = "Modal key-sequence resolver")]
pub struct CliArgs {
    /// Keymap file layered over the built-in tables (skips ./keymap.yaml and the user file)
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// More console logging (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Feed key events and print the commands they resolve to
    ///
    /// Each input line is either a JSON key event
    /// (`{"key":"g","ctrlKey":false,"editable":false}`) or a binding string
    /// such as `2gg` or `<C-u>`. Blank lines and `#` comments are skipped.
    Run {
        /// Mode to start in
        #[arg(short, long, default_value = "normal")]
        mode: Mode,
        /// Input file (stdin when omitted)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Compile every table and report conflicts
    Check,
    /// Print the canonical form of a binding string
    Canon {
        #[arg(value_name = "MAPSTR")]
        mapstr: String,
    },
    /// List the keys that can follow a prefix
    Keys {
        #[arg(short, long, default_value = "normal")]
        mode: Mode,
        #[arg(value_name = "PREFIX", default_value = "")]
        prefix: String,
    },
    /// Print config and log file locations
    Paths,
}

/// Run a parsed command line, writing results to `out`
pub fn run(args: CliArgs, out: &mut impl Write) -> Result<()> {
    match args.command {
        Command::Canon { mapstr } => {
            writeln!(out, "{}", canonicalise_mapstr(&mapstr))?;
            Ok(())
        }
        Command::Paths => print_paths(out),
        command => {
            let config = load_config(args.config.as_deref())?;
            match command {
                Command::Run { mode, input } => {
                    let mut dispatcher = Dispatcher::new(config);
                    dispatcher.set_mode(mode);
                    match input {
                        Some(path) => {
                            let file = File::open(&path)
                                .with_context(|| format!("Failed to open {}", path.display()))?;
                            run_events(&mut dispatcher, BufReader::new(file), out)
                        }
                        None => run_events(&mut dispatcher, io::stdin().lock(), out),
                    }
                }
                Command::Check => check(&config, out),
                Command::Keys { mode, prefix } => {
                    let mut dispatcher = Dispatcher::new(config);
                    let keymap = dispatcher.keymap(mode)?;
                    for (key, target) in which_key_mapstr(&prefix, &keymap) {
                        writeln!(out, "{}\t{}", key, target)?;
                    }
                    Ok(())
                }
                Command::Canon { .. } | Command::Paths => Ok(()),
            }
        }
    }
}

/// The built-in tables with `path` layered on top, or the usual layered
/// lookup when no path is given
pub fn load_config(path: Option<&Path>) -> Result<KeymapConfig> {
    let Some(path) = path else {
        return Ok(load_default_keymap());
    };
    let mut config = default_config();
    let overlay = load_keymap_file(path)
        .with_context(|| format!("Failed to load keymap {}", path.display()))?;
    config.merge(overlay);
    Ok(config)
}

/// Parse one input line into key events
pub fn parse_input_line(line: &str) -> Result<Vec<KeyEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(Vec::new());
    }
    if line.starts_with('{') {
        let event = KeyEvent::from_json(line)
            .with_context(|| format!("Invalid key event: {}", line))?;
        return Ok(vec![event]);
    }
    Ok(mapstr_to_keyseq(line).iter().map(KeyEvent::from).collect())
}

/// Feed every line of `reader` to `dispatcher`, printing executed commands.
///
/// Malformed lines and unresolvable modes are reported on stderr and
/// skipped.
pub fn run_events(
    dispatcher: &mut Dispatcher,
    reader: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let mut executor = EchoExecutor::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let events = match parse_input_line(&line) {
            Ok(events) => events,
            Err(e) => {
                eprintln!("line {}: {:#}", number + 1, e);
                continue;
            }
        };
        for event in &events {
            if let Err(e) = dispatcher.feed_event(event, &mut executor) {
                eprintln!("line {}: {}", number + 1, e);
            }
            for command in executor.take() {
                writeln!(out, "{}", command)?;
            }
        }
    }
    Ok(())
}

/// Compile every configured table plus the hint keymap
pub fn check(config: &KeymapConfig, out: &mut impl Write) -> Result<()> {
    let mut dispatcher = Dispatcher::new(config.clone());
    let mut failures = 0;

    let names: Vec<String> = config.table_names().map(str::to_string).collect();
    for name in &names {
        match config.keymap(name) {
            Ok(keymap) => writeln!(out, "{}: {} bindings", name, keymap.len())?,
            Err(e) => {
                failures += 1;
                writeln!(out, "{}: {}", name, e)?;
            }
        }
    }
    match dispatcher.keymap(Mode::Hint) {
        Ok(keymap) => writeln!(out, "hint keys: {} bindings", keymap.len())?,
        Err(KeymapError::NoBindings { .. }) => {}
        Err(e) => {
            failures += 1;
            writeln!(out, "hint keys: {}", e)?;
        }
    }

    if failures > 0 {
        bail!("{} table(s) failed to compile", failures);
    }
    Ok(())
}

fn print_paths(out: &mut impl Write) -> Result<()> {
    let show = |path: Option<PathBuf>| {
        path.map(|p| p.display().to_string())
            .unwrap_or_else(|| "(unavailable)".to_string())
    };
    writeln!(out, "config dir: {}", show(crate::config_paths::config_dir()))?;
    writeln!(out, "keymap:     {}", show(crate::config_paths::keymap_file()))?;
    writeln!(out, "log file:   {}", show(crate::config_paths::log_file()))?;
    Ok(())
}
