//! Key sequences, keymaps and incremental resolution
//!
//! This module provides a data-driven keybinding system that:
//! - Compiles vim-style binding strings (`"<C-u>j"`) into key sequences
//! - Resolves a growing buffer of key events against a prefix-free keymap,
//!   without timeouts
//! - Splits off a leading count (`"20gg"`) and appends it to the command
//! - Loads per-mode tables from layered YAML config files
//!
//! # Architecture
//!
//! ```text
//! KeyEvent → Key → parse(buffer, &KeyMap) → ParserResponse → exstr
//! ```
//!
//! # Loading Keymaps
//!
//! ```ignore
//! let config = load_default_keymap();
//! let keymap = config.keymap("nmaps")?;
//! let response = parse(&mapstr_to_keyseq("2gg"), &keymap);
//! assert_eq!(response.exstr(), Some("scrollto 0 2"));
//! ```

mod binding;
mod cache;
mod command;
mod config;
mod context;
mod defaults;
mod event;
#[allow(clippy::module_inception)]
mod keymap;
mod mapstr;
mod mozmap;
mod parser;
mod types;
mod which_key;

pub use binding::{with_tolerance_tokens, Keybinding};
pub use cache::KeymapCache;
pub use command::{Callback, MapTarget};
pub use config::{
    load_keymap_file, parse_keymap_yaml, HintFilterMode, HintNames, KeymapConfig, KeymapError,
    TableConfig, DEFAULT_HINTCHARS,
};
pub use context::KeyContext;
pub use defaults::{default_config, get_default_keymap_yaml, load_default_keymap, load_layered_keymap};
pub use event::KeyEvent;
pub use keymap::KeyMap;
pub use mapstr::{bracketexpr_to_key, canonicalise_mapstr, expand_alias, mapstr_to_keyseq};
pub use mozmap::{key_to_shortcut, shortcut_to_key};
pub use parser::{completions, parse, parse_literal, split_numeric_prefix, strip_bare_modifiers, ParserResponse, Resolved};
pub use types::{sequence_to_mapstr, Key, KeySequence, Modifiers, BARE_MODIFIERS};
pub use which_key::{which_key, which_key_mapstr, PREFIX_LABEL};
