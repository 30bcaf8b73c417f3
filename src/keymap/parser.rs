//! Incremental key-sequence resolution
//!
//! Given the keys observed so far and a [`KeyMap`], [`parse`] decides whether
//! they resolve to a binding, are a live prefix of one, or cannot match and
//! should be dropped. There is no timeout: the keymap is prefix-free, so a
//! complete match is never also the start of a longer one.
//!
//! A leading run of digits (starting with `1`-`9`) is a count. It is split
//! off before matching and appended to the rendered command.

use super::binding::Keybinding;
use super::command::MapTarget;
use super::keymap::KeyMap;
use super::types::Key;

/// A fully resolved binding
///
/// Callback targets are invoked with the count; `exstr`, when present, is
/// handed to the executor afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// The bound target
    pub value: MapTarget,
    /// The command string to execute; `None` for callback targets
    pub exstr: Option<String>,
    /// The count typed before the sequence
    pub numeric_prefix: Option<u32>,
}

/// Result of one resolution step
#[derive(Debug, Clone, PartialEq)]
pub enum ParserResponse {
    /// Keys to keep for the next step.
    ///
    /// `is_match` is true when the keys are a valid, incomplete prefix of a
    /// binding, and false when nothing (beyond a bare count) is pending.
    Partial { keys: Vec<Key>, is_match: bool },
    /// The keys resolved to a binding
    Matched(Resolved),
}

impl ParserResponse {
    /// Nothing pending
    pub fn empty() -> Self {
        ParserResponse::Partial {
            keys: Vec::new(),
            is_match: false,
        }
    }

    pub fn is_match(&self) -> bool {
        match self {
            ParserResponse::Partial { is_match, .. } => *is_match,
            ParserResponse::Matched(_) => true,
        }
    }

    /// Keys that remain pending (empty after a match)
    pub fn keys(&self) -> &[Key] {
        match self {
            ParserResponse::Partial { keys, .. } => keys,
            ParserResponse::Matched(_) => &[],
        }
    }

    pub fn resolved(&self) -> Option<&Resolved> {
        match self {
            ParserResponse::Matched(resolved) => Some(resolved),
            ParserResponse::Partial { .. } => None,
        }
    }

    pub fn exstr(&self) -> Option<&str> {
        self.resolved().and_then(|r| r.exstr.as_deref())
    }

    pub fn into_keys(self) -> Vec<Key> {
        match self {
            ParserResponse::Partial { keys, .. } => keys,
            ParserResponse::Matched(_) => Vec::new(),
        }
    }
}

/// Remove lone `Control`/`Shift`/`Alt`/`AltGraph`/`Meta` presses
pub fn strip_bare_modifiers(keys: &[Key]) -> Vec<Key> {
    keys.iter().filter(|k| !k.is_bare_modifier()).cloned().collect()
}

/// Split keys into a leading count and the rest.
///
/// The count must start with an unmodified `1`-`9` press; it continues with
/// unmodified `0`-`9` presses. Releases of digit keys inside the count are
/// absorbed into it without adding digits. A lone leading `0` is not a count.
pub fn split_numeric_prefix(mut keys: Vec<Key>) -> (Vec<Key>, Vec<Key>) {
    let starts_count = keys
        .first()
        .and_then(Key::digit)
        .is_some_and(|d| d != 0);
    if !starts_count {
        return (Vec::new(), keys);
    }

    let len = keys
        .iter()
        .skip(1)
        .take_while(|k| k.digit().is_some() || is_digit_release(k))
        .count()
        + 1;
    let rest = keys.split_off(len);
    (keys, rest)
}

fn is_digit_release(key: &Key) -> bool {
    key.keyup && !key.has_modifiers() && key.is_single_char() && key.key.chars().all(|c| c.is_ascii_digit())
}

/// The digit string of a count, and its value
fn count_of(prefix: &[Key]) -> (String, Option<u32>) {
    let digits: String = prefix
        .iter()
        .filter(|k| k.digit().is_some())
        .map(|k| k.key.as_str())
        .collect();
    if digits.is_empty() {
        return (digits, None);
    }
    let value = digits
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(d));
    (digits, Some(value))
}

/// Resolve the observed keys against `map`.
///
/// Never fails: every input is either a match, a pending prefix, or dropped.
pub fn parse(keys: &[Key], map: &KeyMap) -> ParserResponse {
    resolve(keys, map, true)
}

/// [`parse`] without count extraction: digits are matched like any other key
pub fn parse_literal(keys: &[Key], map: &KeyMap) -> ParserResponse {
    resolve(keys, map, false)
}

fn resolve(keys: &[Key], map: &KeyMap, counts: bool) -> ParserResponse {
    let keys = strip_bare_modifiers(keys);
    if keys.is_empty() {
        return ParserResponse::empty();
    }

    let (mut prefix, mut working) = if counts {
        split_numeric_prefix(keys)
    } else {
        (Vec::new(), keys)
    };

    // Keep the longest suffix that is still a prefix of some binding
    let mut candidates = map.candidates(&working);
    while candidates.is_empty() && !working.is_empty() {
        working.remove(0);
        prefix.clear();
        candidates = map.candidates(&working);
    }

    if let Some(binding) = perfect_match(&candidates, &working) {
        let (digits, numeric_prefix) = count_of(&prefix);
        return ParserResponse::Matched(Resolved {
            value: binding.target.clone(),
            exstr: binding.target.render(&digits),
            numeric_prefix,
        });
    }

    let is_match = !working.is_empty();
    prefix.extend(working);
    ParserResponse::Partial {
        keys: prefix,
        is_match,
    }
}

/// The candidate that `working` completes.
///
/// In a prefix-free map only one real-key sequence can be complete. When a
/// tolerance token absorbed a repeated press, the binding that consumed the
/// most keys as real keys wins.
fn perfect_match<'a>(candidates: &[&'a Keybinding], working: &[Key]) -> Option<&'a Keybinding> {
    if working.is_empty() {
        return None;
    }
    candidates
        .iter()
        .copied()
        .filter(|b| b.is_complete(working))
        .max_by_key(|b| b.real_len())
}

/// The sub-map of `map` that `keys` is a valid prefix of
pub fn completions(keys: &[Key], map: &KeyMap) -> KeyMap {
    map.completions(&strip_bare_modifiers(keys))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::mapstr::mapstr_to_keyseq as mks;
    use crate::keymap::types::Modifiers;

    fn mk(key: &str) -> Key {
        Key::plain(key)
    }

    #[test]
    fn test_split_numeric_prefix() {
        let (prefix, rest) = split_numeric_prefix(mks("20gg"));
        assert_eq!(prefix, mks("20"));
        assert_eq!(rest, mks("gg"));
    }

    #[test]
    fn test_split_numeric_prefix_leading_zero() {
        let (prefix, rest) = split_numeric_prefix(mks("0gg"));
        assert!(prefix.is_empty());
        assert_eq!(rest, mks("0gg"));
    }

    #[test]
    fn test_split_numeric_prefix_ignores_modified_digits() {
        let (prefix, rest) = split_numeric_prefix(mks("<C-2>gg"));
        assert!(prefix.is_empty());
        assert_eq!(rest.len(), 3);

        let (prefix, rest) = split_numeric_prefix(mks("2<C-3>"));
        assert_eq!(prefix, mks("2"));
        assert_eq!(rest, vec![Key::new("3", Modifiers::CTRL)]);
    }

    #[test]
    fn test_split_numeric_prefix_absorbs_digit_release() {
        let keys = vec![mk("2"), mk("2").released(), mk("0"), mk("g")];
        let (prefix, rest) = split_numeric_prefix(keys);
        assert_eq!(prefix.len(), 3);
        assert_eq!(rest, mks("g"));
        assert_eq!(count_of(&prefix), ("20".to_string(), Some(20)));
    }

    #[test]
    fn test_count_saturates() {
        let prefix = mks("99999999999999");
        let (digits, value) = count_of(&prefix);
        assert_eq!(digits, "99999999999999");
        assert_eq!(value, Some(u32::MAX));
    }

    #[test]
    fn test_strip_bare_modifiers() {
        let keys = vec![mk("Shift"), mk("g"), mk("Control"), mk("AltGraph"), mk("Meta"), mk("Alt")];
        assert_eq!(strip_bare_modifiers(&keys), vec![mk("g")]);
    }

    #[test]
    fn test_parse_empty_buffer() {
        let map = KeyMap::from_mapstrs([("j", "down")]).unwrap();
        assert_eq!(parse(&[], &map), ParserResponse::empty());
        assert_eq!(parse(&[], &map), ParserResponse::empty());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_parse_against_empty_map_drops_everything() {
        let map = KeyMap::new();
        assert_eq!(parse(&mks("abc"), &map), ParserResponse::empty());
    }

    #[test]
    fn test_response_accessors() {
        let map = KeyMap::from_mapstrs([("gg", "scrolltop")]).unwrap();
        let pending = parse(&mks("g"), &map);
        assert!(pending.is_match());
        assert_eq!(pending.keys(), mks("g").as_slice());
        assert!(pending.exstr().is_none());

        let matched = parse(&mks("3gg"), &map);
        assert!(matched.is_match());
        assert!(matched.keys().is_empty());
        assert_eq!(matched.exstr(), Some("scrolltop 3"));
        assert_eq!(matched.resolved().and_then(|r| r.numeric_prefix), Some(3));
    }

    #[test]
    fn test_parse_literal_matches_digits() {
        let map = KeyMap::from_mapstrs([("1", "hint.pushKey 1"), ("2", "hint.pushKey 2")]).unwrap();
        assert_eq!(parse(&mks("1"), &map), ParserResponse::Partial { keys: mks("1"), is_match: false });
        assert_eq!(parse_literal(&mks("1"), &map).exstr(), Some("hint.pushKey 1"));
    }

    #[test]
    fn test_callback_target_resolves_without_exstr() {
        let target = MapTarget::callback(|_| Ok(()));
        let map = KeyMap::from_mapstrs([("x", target.clone())]).unwrap();
        let response = parse(&mks("4x"), &map);
        let resolved = response.resolved().expect("should resolve");
        assert_eq!(resolved.value, target);
        assert_eq!(resolved.exstr, None);
        assert_eq!(resolved.numeric_prefix, Some(4));
    }
}
