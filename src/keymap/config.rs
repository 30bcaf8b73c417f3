//! YAML configuration for keymaps
//!
//! A keymap file holds one binding table per mode plus the settings the
//! mode parsers read:
//!
//! ```yaml
//! maps:
//!   nmaps:
//!     bindings:
//!       gg: scrolltop
//!       x: null            # unbind
//!   inputmaps:
//!     inherits: imaps
//!     bindings:
//!       "<Tab>": focusinput -n
//! keytranslatemap: { "д": "l" }
//! keytranslatemodes: { nmaps: true }
//! hintchars: hjklasdfgyuiopqwertnmzxcvb
//! hintnames: short
//! hintfiltermode: simple
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::binding::Keybinding;
use super::keymap::KeyMap;
use super::mapstr::canonicalise_mapstr;

/// Default characters used to label hints
pub const DEFAULT_HINTCHARS: &str = "hjklasdfgyuiopqwertnmzxcvb";

/// Errors raised while loading or compiling keymaps
#[derive(Debug, Error)]
pub enum KeymapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// The table for a mode is missing or has no bindings left
    #[error("No bindings configured for '{table}'")]
    NoBindings { table: String },
    /// One bound sequence is a prefix of (or equal to) another
    #[error("Binding '{shorter}' is a prefix of '{longer}'")]
    PrefixConflict { shorter: String, longer: String },
    #[error("Table '{table}' inherits from unknown table '{parent}'")]
    UnknownParent { table: String, parent: String },
    #[error("Inheritance cycle: {chain}")]
    InheritanceCycle { chain: String },
    #[error("Unknown mode: {0}")]
    UnknownMode(String),
    #[error("Invalid shortcut: {0}")]
    InvalidShortcut(String),
}

/// How hints are labelled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintNames {
    #[default]
    Short,
    Numeric,
    Uniform,
}

/// How typed keys filter hints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HintFilterMode {
    /// Only hint characters are accepted
    #[default]
    Simple,
    /// Any key filters hints by element text
    Vimperator,
    VimperatorReflow,
}

impl HintFilterMode {
    /// Whether keys outside the hint alphabet filter by text
    pub fn filters_by_text(self) -> bool {
        !matches!(self, HintFilterMode::Simple)
    }
}

/// One binding table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Table whose bindings are merged underneath this one
    pub inherits: Option<String>,
    /// mapstr → command template; `null` or `""` unbinds
    pub bindings: BTreeMap<String, Option<String>>,
}

/// Root structure of a keymap YAML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeymapConfig {
    pub maps: BTreeMap<String, TableConfig>,
    pub keytranslatemap: BTreeMap<String, String>,
    pub keytranslatemodes: BTreeMap<String, bool>,
    pub hintchars: Option<String>,
    pub hintnames: Option<HintNames>,
    pub hintfiltermode: Option<HintFilterMode>,
}

/// A resolved binding and how far up the inheritance chain it came from
#[derive(Debug, Clone, PartialEq)]
struct Inherited {
    target: String,
    depth: usize,
}

impl KeymapConfig {
    /// Layer `overlay` on top of `self`.
    ///
    /// Tables merge per binding, so an overlay can unbind a single key with
    /// `null` without restating the rest of the table.
    pub fn merge(&mut self, overlay: KeymapConfig) {
        for (name, table) in overlay.maps {
            let base = self.maps.entry(name).or_default();
            if table.inherits.is_some() {
                base.inherits = table.inherits;
            }
            base.bindings.extend(table.bindings);
        }
        self.keytranslatemap.extend(overlay.keytranslatemap);
        self.keytranslatemodes.extend(overlay.keytranslatemodes);
        if overlay.hintchars.is_some() {
            self.hintchars = overlay.hintchars;
        }
        if overlay.hintnames.is_some() {
            self.hintnames = overlay.hintnames;
        }
        if overlay.hintfiltermode.is_some() {
            self.hintfiltermode = overlay.hintfiltermode;
        }
    }

    pub fn hint_chars(&self) -> &str {
        match self.hintchars.as_deref() {
            Some(chars) if !chars.is_empty() => chars,
            _ => DEFAULT_HINTCHARS,
        }
    }

    pub fn hint_names(&self) -> HintNames {
        self.hintnames.unwrap_or_default()
    }

    pub fn hint_filter_mode(&self) -> HintFilterMode {
        self.hintfiltermode.unwrap_or_default()
    }

    /// Whether observed keys are translated before resolving against `table`
    pub fn translates(&self, table: &str) -> bool {
        self.keytranslatemodes.get(table).copied().unwrap_or(false)
    }

    /// Names of all configured tables
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(String::as_str)
    }

    /// The inheritance chain of `name`, leaf first
    fn chain<'a>(&'a self, name: &'a str) -> Result<Vec<(&'a str, &'a TableConfig)>, KeymapError> {
        let Some(mut table) = self.maps.get(name) else {
            return Err(KeymapError::NoBindings {
                table: name.to_string(),
            });
        };
        let mut chain = vec![(name, table)];
        while let Some(parent) = table.inherits.as_deref() {
            if chain.iter().any(|(n, _)| *n == parent) {
                let mut names: Vec<&str> = chain.iter().map(|(n, _)| *n).collect();
                names.push(parent);
                return Err(KeymapError::InheritanceCycle {
                    chain: names.join(" -> "),
                });
            }
            let (child, _) = chain[chain.len() - 1];
            table = self.maps.get(parent).ok_or_else(|| KeymapError::UnknownParent {
                table: child.to_string(),
                parent: parent.to_string(),
            })?;
            chain.push((parent, table));
        }
        Ok(chain)
    }

    /// Flatten `name` and its ancestors, keyed by canonical mapstr
    fn resolve(&self, name: &str) -> Result<BTreeMap<String, Inherited>, KeymapError> {
        let chain = self.chain(name)?;
        let mut resolved = BTreeMap::new();
        for (depth, (_, table)) in chain.iter().enumerate().rev() {
            for (mapstr, target) in &table.bindings {
                let mapstr = canonicalise_mapstr(mapstr);
                match target.as_deref() {
                    None | Some("") => {
                        resolved.remove(&mapstr);
                    }
                    Some(target) => {
                        resolved.insert(
                            mapstr,
                            Inherited {
                                target: target.to_string(),
                                depth,
                            },
                        );
                    }
                }
            }
        }
        if resolved.is_empty() {
            return Err(KeymapError::NoBindings {
                table: name.to_string(),
            });
        }
        Ok(resolved)
    }

    /// The flat mapstr → command table for `name`, inheritance applied
    pub fn table(&self, name: &str) -> Result<BTreeMap<String, String>, KeymapError> {
        Ok(self
            .resolve(name)?
            .into_iter()
            .map(|(mapstr, inherited)| (mapstr, inherited.target))
            .collect())
    }

    /// Compile the table for `name` into a [`KeyMap`].
    ///
    /// A binding inherited from a parent that conflicts with one defined
    /// closer to `name` is shadowed. Conflicts within one table are errors.
    pub fn keymap(&self, name: &str) -> Result<KeyMap, KeymapError> {
        let mut entries: Vec<(String, Inherited)> = self.resolve(name)?.into_iter().collect();
        entries.sort_by_key(|(_, inherited)| inherited.depth);

        let mut depths: HashMap<String, usize> = HashMap::new();
        let mut keymap = KeyMap::new();
        for (mapstr, inherited) in entries {
            let binding = Keybinding::new(&mapstr, inherited.target);
            match keymap.add_binding(binding) {
                Ok(()) => {
                    depths.insert(mapstr, inherited.depth);
                }
                Err(KeymapError::PrefixConflict { shorter, longer }) => {
                    let existing = if shorter == mapstr { &longer } else { &shorter };
                    let shadowed = depths
                        .get(existing)
                        .is_some_and(|&depth| depth < inherited.depth);
                    if !shadowed {
                        return Err(KeymapError::PrefixConflict { shorter, longer });
                    }
                    tracing::debug!(
                        "'{}' in '{}' shadows inherited binding '{}'",
                        existing,
                        name,
                        mapstr
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(keymap)
    }
}

/// Load a keymap configuration from a YAML file
pub fn load_keymap_file(path: &Path) -> Result<KeymapConfig, KeymapError> {
    let content = std::fs::read_to_string(path)?;
    parse_keymap_yaml(&content)
}

/// Parse a keymap configuration from a YAML string
pub fn parse_keymap_yaml(yaml: &str) -> Result<KeymapConfig, KeymapError> {
    if yaml.trim().is_empty() {
        return Ok(KeymapConfig::default());
    }
    Ok(serde_yaml::from_str(yaml)?)
}
