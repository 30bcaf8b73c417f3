//! Adapter from host key-event descriptors to our Key type
//!
//! The host delivers one descriptor per press or release:
//!
//! ```json
//! {"key": "g", "ctrlKey": false, "altKey": false, "metaKey": false,
//!  "shiftKey": false, "keyup": false, "editable": false}
//! ```
//!
//! Every field except `key` is optional and defaults to false.

use serde::{Deserialize, Serialize};

use super::context::KeyContext;
use super::types::{Key, Modifiers};

/// One key event as reported by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub ctrl_key: bool,
    #[serde(default)]
    pub alt_key: bool,
    #[serde(default)]
    pub meta_key: bool,
    #[serde(default)]
    pub shift_key: bool,
    /// Release rather than press
    #[serde(default)]
    pub keyup: bool,
    /// Whether the focused element accepts text
    #[serde(default)]
    pub editable: bool,
}

impl KeyEvent {
    /// A press of `key` with no modifiers on a non-editable target
    pub fn press(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Parse one JSON descriptor
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn modifiers(&self) -> Modifiers {
        Modifiers::new(self.ctrl_key, self.shift_key, self.alt_key, self.meta_key)
    }

    pub fn to_key(&self) -> Key {
        let key = Key::new(self.key.clone(), self.modifiers());
        if self.keyup {
            key.released()
        } else {
            key
        }
    }

    pub fn context(&self) -> KeyContext {
        KeyContext {
            editable: self.editable,
        }
    }
}

impl From<&KeyEvent> for Key {
    fn from(event: &KeyEvent) -> Self {
        event.to_key()
    }
}

/// Build the descriptor a host would send for `key`
impl From<&Key> for KeyEvent {
    fn from(key: &Key) -> Self {
        Self {
            key: key.key.clone(),
            ctrl_key: key.mods.ctrl(),
            alt_key: key.mods.alt(),
            meta_key: key.mods.meta(),
            shift_key: key.mods.shift(),
            keyup: key.keyup,
            editable: false,
        }
    }
}
