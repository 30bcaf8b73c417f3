//! Core types for the keymap system: Key, Modifiers, KeySequence

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Names of keys that only ever act as modifiers
pub const BARE_MODIFIERS: [&str; 5] = ["Control", "Shift", "Alt", "AltGraph", "Meta"];

/// Modifier keys as a bitfield for efficient storage and comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000);

    /// Create modifiers from individual flags
    pub const fn new(ctrl: bool, shift: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0u8;
        if ctrl {
            bits |= 0b0001;
        }
        if shift {
            bits |= 0b0010;
        }
        if alt {
            bits |= 0b0100;
        }
        if meta {
            bits |= 0b1000;
        }
        Modifiers(bits)
    }

    /// Check if ctrl is held
    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & 0b0001 != 0
    }

    /// Check if shift is held
    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b0010 != 0
    }

    /// Check if alt is held
    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & 0b0100 != 0
    }

    /// Check if meta is held
    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & 0b1000 != 0
    }

    /// Check if no modifiers are held
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Combine two modifier sets
    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Check if this contains all modifiers in other
    #[inline]
    pub const fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// The same set with shift cleared
    #[inline]
    pub const fn without_shift(self) -> Modifiers {
        Modifiers(self.0 & !0b0010)
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Renders the mapstr modifier prefix, e.g. `AC-` (empty when no modifiers)
impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        if self.alt() {
            f.write_str("A")?;
        }
        if self.ctrl() {
            f.write_str("C")?;
        }
        if self.meta() {
            f.write_str("M")?;
        }
        if self.shift() {
            f.write_str("S")?;
        }
        f.write_str("-")
    }
}

/// One physical key press, a tolerated release, or a compiled binding key.
///
/// `key` holds the canonical key name: a single printable character, or a
/// named key such as `Escape`, `Tab` or `" "` for space.
///
/// `keyup`, `keydown` and `optional` are only set on tolerance tokens built
/// by the keymap builder, and `keyup` on observed release events. Ordinary
/// presses have all three cleared.
///
/// Equality and hashing ignore whether the key went through layout
/// translation.
#[derive(Clone, Debug)]
pub struct Key {
    pub key: String,
    pub mods: Modifiers,
    pub keyup: bool,
    pub keydown: bool,
    pub optional: bool,
    translated: bool,
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.mods == other.mods
            && self.keyup == other.keyup
            && self.keydown == other.keydown
            && self.optional == other.optional
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.mods.hash(state);
        self.keyup.hash(state);
        self.keydown.hash(state);
        self.optional.hash(state);
    }
}

/// An ordered, chronological sequence of keys
pub type KeySequence = Vec<Key>;

impl Key {
    /// Create a key press with the given modifiers
    pub fn new(key: impl Into<String>, mods: Modifiers) -> Self {
        Self {
            key: key.into(),
            mods,
            keyup: false,
            keydown: false,
            optional: false,
            translated: false,
        }
    }

    /// Create a key press with no modifiers
    pub fn plain(key: impl Into<String>) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// Mark this key as a release event
    pub fn released(mut self) -> Self {
        self.keyup = true;
        self
    }

    /// The synthetic token inserted after `self` in a multi-key binding.
    ///
    /// It tolerates the release of `self`; when `self` carries a non-shift
    /// modifier it also tolerates a repeated press.
    pub fn tolerance_token(&self) -> Key {
        Key {
            key: self.key.clone(),
            mods: self.mods,
            keyup: true,
            keydown: self.has_non_shift_modifiers(),
            optional: true,
            translated: false,
        }
    }

    /// True for `Control`, `Shift`, `Alt`, `AltGraph` and `Meta` pressed on their own
    pub fn is_bare_modifier(&self) -> bool {
        BARE_MODIFIERS.contains(&self.key.as_str())
    }

    /// True when `key` is exactly one character
    pub fn is_single_char(&self) -> bool {
        let mut chars = self.key.chars();
        chars.next().is_some() && chars.next().is_none()
    }

    pub fn has_modifiers(&self) -> bool {
        !self.mods.is_empty()
    }

    /// shiftKey is set for any capital letter and most symbols, so usually
    /// only the other modifiers matter.
    pub fn has_non_shift_modifiers(&self) -> bool {
        !self.mods.without_shift().is_empty()
    }

    /// A single-character key without ctrl, alt or meta
    pub fn is_simple(&self) -> bool {
        self.is_single_char() && !self.has_non_shift_modifiers()
    }

    /// Value of an unmodified digit press, if this is one
    pub fn digit(&self) -> Option<u32> {
        if self.keyup || self.has_modifiers() || !self.is_single_char() {
            return None;
        }
        self.key.chars().next().and_then(|c| c.to_digit(10))
    }

    /// Whether a shift difference is ignored when this (bound) key is matched
    fn ignores_shift(&self) -> bool {
        self.is_single_char()
            && self.key != " "
            && !self.mods.shift()
            && !self.has_non_shift_modifiers()
    }

    /// Does the observed key `event` satisfy this bound key?
    ///
    /// Key names and ctrl/alt/meta must be identical. For single printable
    /// characters bound without shift or other modifiers, shift is ignored
    /// because the character case already encodes it.
    ///
    /// A plain bound key only accepts presses. A tolerance token accepts a
    /// release, and a repeated press when its `keydown` flag is set.
    pub fn matches(&self, event: &Key) -> bool {
        if self.key != event.key {
            return false;
        }
        if self.mods.without_shift() != event.mods.without_shift() {
            return false;
        }
        if self.mods.shift() != event.mods.shift() && !self.ignores_shift() {
            return false;
        }
        if self.optional {
            if event.keyup {
                self.keyup
            } else {
                self.keydown
            }
        } else {
            !event.keyup
        }
    }

    pub fn is_translated(&self) -> bool {
        self.translated
    }

    /// Remap `key` through a keyboard-layout translation table.
    ///
    /// Modifiers are preserved. A key that has already been translated is
    /// returned unchanged, so applying the table again is a no-op.
    pub fn translate(&self, table: &BTreeMap<String, String>) -> Key {
        if self.translated {
            return self.clone();
        }
        let mut out = self.clone();
        if let Some(new_key) = table.get(&self.key) {
            out.key = new_key.clone();
        }
        out.translated = true;
        out
    }

    /// Render the canonical binding-string form of this key.
    ///
    /// Multi-character names and modified keys are bracketed, modifiers are
    /// written in `ACMS` order, space is `<Space>` and a bare `<` is `<lt>`.
    pub fn to_mapstr(&self) -> String {
        let mods = self.mods.to_string();
        let (name, named) = match self.key.as_str() {
            " " => ("Space", true),
            "<" if mods.is_empty() => ("lt", true),
            other => (other, !self.is_single_char()),
        };
        if named || !mods.is_empty() {
            format!("<{}{}>", mods, name)
        } else {
            name.to_string()
        }
    }

    /// Short display form used for the pending-keys status suffix.
    ///
    /// Bare modifiers render as nothing.
    pub fn display_string(&self) -> String {
        if self.is_bare_modifier() || self.key == "OS" {
            return String::new();
        }
        let mut result = self.key.clone();
        if self.mods.alt() {
            result = format!("A-{}", result);
        }
        if self.mods.ctrl() {
            result = format!("C-{}", result);
        }
        if self.mods.shift() {
            result = format!("S-{}", result);
        }
        if result.chars().count() > 1 {
            result = format!("<{}>", result);
        }
        result
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_mapstr())
    }
}

/// Render a sequence of keys as one mapstr
pub fn sequence_to_mapstr(keys: &[Key]) -> String {
    keys.iter()
        .filter(|k| !k.optional)
        .map(Key::to_mapstr)
        .collect()
}
