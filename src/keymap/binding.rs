//! Keybinding struct representing a mapping from a key sequence to a target

use super::command::MapTarget;
use super::mapstr::mapstr_to_keyseq;
use super::types::{sequence_to_mapstr, Key, KeySequence};

/// A compiled binding: the mapstr it came from, its key sequence with
/// tolerance tokens inserted, and its target
#[derive(Debug, Clone, PartialEq)]
pub struct Keybinding {
    /// The binding string as written in the config
    pub mapstr: String,
    /// Compiled keys, including tolerance tokens between real keys
    pub keys: KeySequence,
    /// The command template or callback
    pub target: MapTarget,
}

impl Keybinding {
    /// Compile a mapstr binding
    pub fn new(mapstr: &str, target: impl Into<MapTarget>) -> Self {
        Self::from_keys(mapstr_to_keyseq(mapstr), target).with_mapstr(mapstr)
    }

    /// Build a binding from already-compiled observed keys
    pub fn from_keys(keys: KeySequence, target: impl Into<MapTarget>) -> Self {
        let mapstr = sequence_to_mapstr(&keys);
        Self {
            mapstr,
            keys: with_tolerance_tokens(keys),
            target: target.into(),
        }
    }

    fn with_mapstr(mut self, mapstr: &str) -> Self {
        self.mapstr = mapstr.to_string();
        self
    }

    /// The real (non-optional) keys of this binding
    pub fn real_keys(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter().filter(|k| !k.optional)
    }

    /// Number of real keys
    pub fn real_len(&self) -> usize {
        self.real_keys().count()
    }

    /// Check if this is a multi-key binding
    pub fn is_chord(&self) -> bool {
        self.real_len() > 1
    }

    /// Positions in `keys` reachable after consuming all of `observed`.
    ///
    /// Tolerance tokens may either consume an observed key they match or be
    /// skipped, so more than one position can be live at a time.
    fn reachable(&self, observed: &[Key]) -> Vec<usize> {
        let mut current = self.skip_optional(vec![0]);
        for event in observed {
            let mut next = Vec::new();
            for &pos in &current {
                let advances = self.keys.get(pos).is_some_and(|bound| bound.matches(event));
                if advances && !next.contains(&(pos + 1)) {
                    next.push(pos + 1);
                }
            }
            current = self.skip_optional(next);
            if current.is_empty() {
                break;
            }
        }
        current
    }

    fn skip_optional(&self, mut positions: Vec<usize>) -> Vec<usize> {
        let mut i = 0;
        while i < positions.len() {
            let pos = positions[i];
            let optional = self.keys.get(pos).is_some_and(|k| k.optional);
            if optional && !positions.contains(&(pos + 1)) {
                positions.push(pos + 1);
            }
            i += 1;
        }
        positions
    }

    /// True if `observed` is a prefix of (or equal to) this binding
    pub fn starts_with(&self, observed: &[Key]) -> bool {
        !self.reachable(observed).is_empty()
    }

    /// True if `observed` consumes this whole binding
    pub fn is_complete(&self, observed: &[Key]) -> bool {
        self.reachable(observed).contains(&self.keys.len())
    }

    /// Real keys still to be typed after `observed`, or `None` if `observed`
    /// is not a prefix of this binding
    pub fn remaining(&self, observed: &[Key]) -> Option<Vec<&Key>> {
        let start = self.reachable(observed).into_iter().min()?;
        Some(self.keys[start..].iter().filter(|k| !k.optional).collect())
    }

    /// True if the real keys of `self` are a prefix of, or equal to, those of `other`
    pub fn is_prefix_of(&self, other: &Keybinding) -> bool {
        if self.real_len() > other.real_len() {
            return false;
        }
        self.real_keys()
            .zip(other.real_keys())
            .all(|(a, b)| a.matches(b) || b.matches(a))
    }

    /// Get display string for this keybinding
    pub fn display_string(&self) -> String {
        sequence_to_mapstr(&self.keys)
    }
}

/// Insert a tolerance token after every key except the last
pub fn with_tolerance_tokens(keys: KeySequence) -> KeySequence {
    let len = keys.len();
    let mut out = Vec::with_capacity(len * 2);
    for (idx, key) in keys.into_iter().enumerate() {
        let token = (idx + 1 < len).then(|| key.tolerance_token());
        out.push(key);
        out.extend(token);
    }
    out
}
