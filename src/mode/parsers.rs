//! Parsers for modes that do more than look up a binding table

use crate::keymap::{
    parse, parse_literal, strip_bare_modifiers, HintFilterMode, HintNames, Key, KeyMap,
    Keybinding, KeymapConfig, KeymapError, MapTarget, ParserResponse, Resolved,
};

use super::Mode;

/// A match on a plain command string
fn command(exstr: String) -> ParserResponse {
    ParserResponse::Matched(Resolved {
        value: MapTarget::Excmd(exstr.clone()),
        exstr: Some(exstr),
        numeric_prefix: None,
    })
}

// ============================================================================
// Hint mode
// ============================================================================

/// Hint mode's keymap: every hint label pushes itself, `hintmaps` on top.
///
/// A `hintmaps` binding that conflicts with a label wins over it.
pub fn hint_keymap(config: &KeymapConfig) -> Result<KeyMap, KeymapError> {
    let mut keymap = match config.keymap(&Mode::Hint.config_name()) {
        Ok(keymap) => keymap,
        Err(KeymapError::NoBindings { .. }) => KeyMap::new(),
        Err(e) => return Err(e),
    };

    let labels: Vec<String> = match config.hint_names() {
        HintNames::Numeric => (0..10).map(|d| d.to_string()).collect(),
        HintNames::Short | HintNames::Uniform => {
            config.hint_chars().chars().map(String::from).collect()
        }
    };
    for label in labels {
        let binding = Keybinding::from_keys(vec![Key::plain(label.as_str())], format!("hint.pushKey {}", label));
        match keymap.add_binding(binding) {
            Ok(()) => {}
            Err(KeymapError::PrefixConflict { shorter, longer }) => {
                tracing::debug!("Hint label '{}' shadowed ('{}' / '{}')", label, shorter, longer);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(keymap)
}

/// Resolve keys in hint mode.
///
/// Digits are hint labels here, never counts. With a vimperator filter mode
/// any unmodified key that matches nothing is pushed as filter text.
pub fn hint(keys: &[Key], map: &KeyMap, filter: HintFilterMode) -> ParserResponse {
    let response = parse_literal(keys, map);
    if response.is_match() {
        return response;
    }
    if !filter.filters_by_text() {
        return ParserResponse::empty();
    }

    let simple: Vec<&Key> = keys
        .iter()
        .filter(|k| !k.keyup && !k.has_modifiers() && !k.is_bare_modifier())
        .collect();
    match simple.as_slice() {
        [] => ParserResponse::empty(),
        [key] => command(format!("hint.pushKey {}", key.key)),
        many => {
            let pushes: Vec<String> = many
                .iter()
                .map(|k| format!("hint.pushKey {}", k.key))
                .collect();
            command(format!("composite {}", pushes.join("; ")))
        }
    }
}

// ============================================================================
// Gobble mode
// ============================================================================

/// State of one gobble: collect characters, then run a command with them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GobbleState {
    wanted: usize,
    chars: String,
    end_command: String,
}

impl GobbleState {
    pub fn new(wanted: usize, end_command: impl Into<String>) -> Self {
        Self {
            wanted,
            chars: String::new(),
            end_command: end_command.into(),
        }
    }

    pub fn chars(&self) -> &str {
        &self.chars
    }

    /// Feed the newest key. Returns the response and whether gobbling is over.
    ///
    /// `Escape` cancels. Named keys other than `Escape` are ignored.
    pub fn feed(&mut self, keys: &[Key]) -> (ParserResponse, bool) {
        let Some(key) = keys.last() else {
            return (ParserResponse::empty(), false);
        };
        if key.key == "Escape" {
            return (ParserResponse::empty(), true);
        }
        if key.keyup || !key.is_single_char() {
            return (ParserResponse::empty(), false);
        }

        self.chars.push_str(&key.key);
        if self.chars.chars().count() >= self.wanted {
            let exstr = format!("{} {}", self.end_command, self.chars);
            return (command(exstr), true);
        }
        (ParserResponse::empty(), false)
    }
}

// ============================================================================
// NMode
// ============================================================================

/// State of `nmode`: run a number of commands from another mode's table,
/// then an end command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NModeState {
    mode: Mode,
    wanted: usize,
    done: usize,
    end_command: String,
}

impl NModeState {
    pub fn new(mode: Mode, wanted: usize, end_command: impl Into<String>) -> Self {
        Self {
            mode,
            wanted,
            done: 0,
            end_command: end_command.into(),
        }
    }

    /// The mode whose table is borrowed
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Resolve keys against the borrowed table. Returns the response and
    /// whether nmode is over.
    ///
    /// A step counts when it resolves a command or when the keys are
    /// dropped. `Escape` ends immediately with just the end command.
    pub fn feed(&mut self, keys: &[Key], map: &KeyMap) -> (ParserResponse, bool) {
        let keys = strip_bare_modifiers(keys);
        let Some(last) = keys.last() else {
            return (ParserResponse::empty(), false);
        };
        if last.key == "Escape" {
            return (command(self.end_command.clone()), true);
        }

        let response = parse(&keys, map);
        let counts = match &response {
            ParserResponse::Matched(_) => true,
            ParserResponse::Partial { is_match, .. } => !is_match,
        };
        if counts {
            self.done += 1;
        }
        if self.done < self.wanted {
            return (response, false);
        }

        let finished = match response {
            ParserResponse::Matched(resolved) => {
                let exstr = match resolved.exstr {
                    Some(exstr) => format!("composite {}; {}", exstr, self.end_command),
                    None => self.end_command.clone(),
                };
                ParserResponse::Matched(Resolved {
                    value: resolved.value,
                    exstr: Some(exstr),
                    numeric_prefix: resolved.numeric_prefix,
                })
            }
            ParserResponse::Partial { .. } => command(self.end_command.clone()),
        };
        (finished, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{mapstr_to_keyseq as mks, parse_keymap_yaml};

    fn hint_config(extra: &str) -> KeymapConfig {
        let yaml = format!(
            "maps: {{ hintmaps: {{ bindings: {{ \"<Escape>\": hint.reset, \"<Space>\": hint.selectFocusedHint }} }} }}\n{}",
            extra
        );
        parse_keymap_yaml(&yaml).unwrap()
    }

    #[test]
    fn test_hint_keymap_labels_and_overrides() {
        let keymap = hint_keymap(&hint_config("hintchars: abc")).unwrap();
        assert_eq!(keymap.len(), 5);
        assert_eq!(
            hint(&mks("b"), &keymap, HintFilterMode::Simple).exstr(),
            Some("hint.pushKey b")
        );
        assert_eq!(
            hint(&mks("<Escape>"), &keymap, HintFilterMode::Simple).exstr(),
            Some("hint.reset")
        );
    }

    #[test]
    fn test_hint_numeric_labels_are_not_counts() {
        let keymap = hint_keymap(&hint_config("hintnames: numeric")).unwrap();
        assert_eq!(
            hint(&mks("3"), &keymap, HintFilterMode::Simple).exstr(),
            Some("hint.pushKey 3")
        );
        assert_eq!(
            hint(&mks("0"), &keymap, HintFilterMode::Simple).exstr(),
            Some("hint.pushKey 0")
        );
    }

    #[test]
    fn test_hint_without_hintmaps_table() {
        let config = parse_keymap_yaml("hintchars: xy").unwrap();
        let keymap = hint_keymap(&config).unwrap();
        assert_eq!(keymap.len(), 2);
    }

    #[test]
    fn test_hint_simple_drops_unknown_keys() {
        let keymap = hint_keymap(&hint_config("hintchars: abc")).unwrap();
        assert_eq!(
            hint(&mks("z"), &keymap, HintFilterMode::Simple),
            ParserResponse::empty()
        );
    }

    #[test]
    fn test_hint_vimperator_pushes_any_key() {
        let keymap = hint_keymap(&hint_config("hintchars: abc")).unwrap();
        assert_eq!(
            hint(&mks("z"), &keymap, HintFilterMode::Vimperator).exstr(),
            Some("hint.pushKey z")
        );
        assert_eq!(
            hint(&mks("<C-z>"), &keymap, HintFilterMode::VimperatorReflow),
            ParserResponse::empty()
        );
    }

    #[test]
    fn test_hint_vimperator_pushes_several_keys() {
        let keymap = KeyMap::from_mapstrs([("xy", "something")]).unwrap();
        let response = hint(&mks("xz"), &keymap, HintFilterMode::Vimperator);
        assert_eq!(
            response.exstr(),
            Some("composite hint.pushKey x; hint.pushKey z")
        );
    }

    #[test]
    fn test_gobble_collects_chars() {
        let mut gobble = GobbleState::new(2, "quickmark");
        let (response, done) = gobble.feed(&mks("a"));
        assert!(!done);
        assert!(response.exstr().is_none());
        assert_eq!(gobble.chars(), "a");

        let (response, done) = gobble.feed(&[Key::plain("Shift")]);
        assert!(!done);
        assert!(response.exstr().is_none());

        let (response, done) = gobble.feed(&mks("B"));
        assert!(done);
        assert_eq!(response.exstr(), Some("quickmark aB"));
    }

    #[test]
    fn test_gobble_escape_cancels() {
        let mut gobble = GobbleState::new(1, "markadd");
        let (response, done) = gobble.feed(&mks("<Esc>"));
        assert!(done);
        assert_eq!(response, ParserResponse::empty());
    }

    #[test]
    fn test_nmode_runs_then_ends() {
        let map = KeyMap::from_mapstrs([("gg", "scrolltop"), ("j", "down")]).unwrap();
        let mut nmode = NModeState::new(Mode::Normal, 1, "mode ignore");

        let (response, done) = nmode.feed(&mks("g"), &map);
        assert!(!done);
        assert!(response.is_match());

        let (response, done) = nmode.feed(&mks("gg"), &map);
        assert!(done);
        assert_eq!(response.exstr(), Some("composite scrolltop; mode ignore"));
    }

    #[test]
    fn test_nmode_counts_dropped_keys() {
        let map = KeyMap::from_mapstrs([("j", "down")]).unwrap();
        let mut nmode = NModeState::new(Mode::Normal, 2, "mode ignore");

        let (_, done) = nmode.feed(&mks("x"), &map);
        assert!(!done);
        let (response, done) = nmode.feed(&mks("x"), &map);
        assert!(done);
        assert_eq!(response.exstr(), Some("mode ignore"));
    }

    #[test]
    fn test_nmode_escape_ends() {
        let map = KeyMap::from_mapstrs([("j", "down")]).unwrap();
        let mut nmode = NModeState::new(Mode::Normal, 3, "mode ignore");
        let (response, done) = nmode.feed(&mks("<Escape>"), &map);
        assert!(done);
        assert_eq!(response.exstr(), Some("mode ignore"));
    }

    #[test]
    fn test_nmode_callback_target() {
        let target = MapTarget::callback(|_| Ok(()));
        let map = KeyMap::from_mapstrs([("j", target.clone())]).unwrap();
        let mut nmode = NModeState::new(Mode::Normal, 1, "mode ignore");
        let (response, done) = nmode.feed(&mks("j"), &map);
        assert!(done);
        let resolved = response.resolved().unwrap();
        assert_eq!(resolved.value, target);
        assert_eq!(resolved.exstr.as_deref(), Some("mode ignore"));
    }
}
