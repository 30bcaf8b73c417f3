//! KeyMap struct for storing compiled bindings and finding completions

use std::collections::HashMap;

use super::binding::Keybinding;
use super::command::MapTarget;
use super::config::KeymapError;
use super::types::Key;

/// A prefix-free set of compiled bindings.
///
/// No bound sequence may be a prefix of another; this is what lets the
/// resolver decide without a timeout whether a sequence is complete.
/// [`KeyMap::add_binding`] rejects bindings that would break this.
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    /// All registered bindings
    bindings: Vec<Keybinding>,
    /// Bindings indexed by the name of their first key
    by_first_key: HashMap<String, Vec<usize>>,
}

impl KeyMap {
    /// Create an empty keymap
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a keymap with the given bindings
    pub fn with_bindings(bindings: Vec<Keybinding>) -> Result<Self, KeymapError> {
        let mut keymap = Self::new();
        for binding in bindings {
            keymap.add_binding(binding)?;
        }
        Ok(keymap)
    }

    /// Compile a flat table of mapstr → target pairs
    pub fn from_mapstrs<I, S, T>(table: I) -> Result<Self, KeymapError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: Into<MapTarget>,
    {
        let bindings = table
            .into_iter()
            .map(|(mapstr, target)| Keybinding::new(mapstr.as_ref(), target))
            .collect();
        Self::with_bindings(bindings)
    }

    /// Add a binding, rejecting it if it would make the map ambiguous
    pub fn add_binding(&mut self, binding: Keybinding) -> Result<(), KeymapError> {
        if binding.keys.is_empty() {
            return Ok(());
        }

        if let Some(existing) = self.bindings.iter().find(|b| {
            b.is_prefix_of(&binding) || binding.is_prefix_of(b)
        }) {
            let (shorter, longer) = if existing.real_len() <= binding.real_len() {
                (existing.mapstr.clone(), binding.mapstr.clone())
            } else {
                (binding.mapstr.clone(), existing.mapstr.clone())
            };
            return Err(KeymapError::PrefixConflict { shorter, longer });
        }

        self.push(binding);
        Ok(())
    }

    fn push(&mut self, binding: Keybinding) {
        let idx = self.bindings.len();
        self.by_first_key
            .entry(binding.keys[0].key.clone())
            .or_default()
            .push(idx);
        self.bindings.push(binding);
    }

    /// Bindings that `observed` is a valid prefix of
    pub fn candidates(&self, observed: &[Key]) -> Vec<&Keybinding> {
        let Some(first) = observed.first() else {
            return self.bindings.iter().collect();
        };
        self.by_first_key
            .get(&first.key)
            .into_iter()
            .flatten()
            .map(|&idx| &self.bindings[idx])
            .filter(|b| b.starts_with(observed))
            .collect()
    }

    /// The sub-map of bindings that `observed` is a valid prefix of
    pub fn completions(&self, observed: &[Key]) -> KeyMap {
        let mut sub = KeyMap::new();
        for binding in self.candidates(observed) {
            sub.push(binding.clone());
        }
        sub
    }

    /// Get all bindings
    pub fn bindings(&self) -> &[Keybinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Get the first binding whose target is the given command template
    pub fn binding_for(&self, excmd: &str) -> Option<&Keybinding> {
        self.bindings
            .iter()
            .find(|b| b.target.excmd() == Some(excmd))
    }

    /// Get display string for a command's keybinding
    pub fn display_for(&self, excmd: &str) -> Option<String> {
        self.binding_for(excmd).map(|b| b.display_string())
    }
}
