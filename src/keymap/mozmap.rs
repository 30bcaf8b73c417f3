//! Conversion to and from host shortcut strings such as `Alt+Shift+K`
//!
//! `MacCtrl` is the physical control key on every platform and `Command` is
//! meta. A handful of key names differ from the ones in key events.

use super::config::KeymapError;
use super::types::{Key, Modifiers};

/// Shortcut key name → key event name
const SHORTCUT_KEYS: [(&str, &str); 7] = [
    ("Comma", ","),
    ("Period", "."),
    ("Up", "ArrowUp"),
    ("Down", "ArrowDown"),
    ("Left", "ArrowLeft"),
    ("Right", "ArrowRight"),
    ("Space", " "),
];

/// Parse a shortcut string into a key
pub fn shortcut_to_key(shortcut: &str) -> Result<Key, KeymapError> {
    let invalid = || KeymapError::InvalidShortcut(shortcut.to_string());

    let mut parts: Vec<&str> = shortcut.split('+').collect();
    let name = parts.pop().filter(|n| !n.is_empty()).ok_or_else(invalid)?;

    let mut mods = Modifiers::NONE;
    for part in parts {
        mods = mods
            | match part {
                "Alt" => Modifiers::ALT,
                "MacCtrl" | "Ctrl" => Modifiers::CTRL,
                "Shift" => Modifiers::SHIFT,
                "Command" => Modifiers::META,
                _ => return Err(invalid()),
            };
    }

    let key = SHORTCUT_KEYS
        .iter()
        .find(|(short, _)| *short == name)
        .map(|(_, event)| event.to_string())
        .unwrap_or_else(|| name.to_lowercase());
    Ok(Key::new(key, mods))
}

/// Render a key as a shortcut string
pub fn key_to_shortcut(key: &Key) -> String {
    let mut parts: Vec<String> = Vec::new();
    if key.mods.alt() {
        parts.push("Alt".into());
    }
    if key.mods.ctrl() {
        parts.push("MacCtrl".into());
    }
    if key.mods.shift() {
        parts.push("Shift".into());
    }
    if key.mods.meta() {
        parts.push("Command".into());
    }
    let name = SHORTCUT_KEYS
        .iter()
        .find(|(_, event)| *event == key.key)
        .map(|(short, _)| short.to_string())
        .unwrap_or_else(|| key.key.to_uppercase());
    parts.push(name);
    parts.join("+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shortcut() {
        let key = shortcut_to_key("Alt+Shift+K").unwrap();
        assert_eq!(key, Key::new("k", Modifiers::ALT | Modifiers::SHIFT));

        let key = shortcut_to_key("MacCtrl+Comma").unwrap();
        assert_eq!(key, Key::new(",", Modifiers::CTRL));

        let key = shortcut_to_key("Command+Up").unwrap();
        assert_eq!(key, Key::new("ArrowUp", Modifiers::META));
    }

    #[test]
    fn test_render_shortcut() {
        assert_eq!(key_to_shortcut(&Key::new("k", Modifiers::ALT | Modifiers::SHIFT)), "Alt+Shift+K");
        assert_eq!(key_to_shortcut(&Key::new(" ", Modifiers::CTRL)), "MacCtrl+Space");
        assert_eq!(key_to_shortcut(&Key::new("6", Modifiers::CTRL)), "MacCtrl+6");
    }

    #[test]
    fn test_invalid_shortcuts() {
        assert!(shortcut_to_key("").is_err());
        assert!(shortcut_to_key("Alt+").is_err());
        assert!(matches!(
            shortcut_to_key("Hyper+K"),
            Err(KeymapError::InvalidShortcut(s)) if s == "Hyper+K"
        ));
    }

    #[test]
    fn test_round_trip() {
        for shortcut in ["Alt+Shift+K", "MacCtrl+Period", "Command+Right", "Alt+F1"] {
            let key = shortcut_to_key(shortcut).unwrap();
            assert_eq!(key_to_shortcut(&key), shortcut);
        }
    }
}
