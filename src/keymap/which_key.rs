//! Which-key listing: what can follow a pending prefix

use std::collections::BTreeMap;

use super::keymap::KeyMap;
use super::mapstr::mapstr_to_keyseq;
use super::parser::completions;
use super::types::Key;

/// Label shown for a next key that leads to further keys rather than a command
pub const PREFIX_LABEL: &str = "+prefix";

/// For each key that can follow `prefix`, the command it completes or
/// [`PREFIX_LABEL`] when more keys are needed.
///
/// Keys are rendered as mapstrs. An empty result means `prefix` leads nowhere.
pub fn which_key(prefix: &[Key], map: &KeyMap) -> BTreeMap<String, String> {
    let sub = completions(prefix, map);
    let observed: Vec<Key> = prefix.iter().filter(|k| !k.is_bare_modifier()).cloned().collect();

    let mut listing = BTreeMap::new();
    for binding in sub.bindings() {
        let Some(rest) = binding.remaining(&observed) else {
            continue;
        };
        let Some(next) = rest.first() else {
            continue;
        };
        let label = if rest.len() > 1 {
            PREFIX_LABEL.to_string()
        } else {
            binding.target.display_name().to_string()
        };
        listing.insert(next.to_mapstr(), label);
    }
    tracing::debug!("which-key for {:?}: {} entries", prefix, listing.len());
    listing
}

/// [`which_key`] for a prefix written as a mapstr
pub fn which_key_mapstr(prefix: &str, map: &KeyMap) -> BTreeMap<String, String> {
    which_key(&mapstr_to_keyseq(prefix), map)
}
