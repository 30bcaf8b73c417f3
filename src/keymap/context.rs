//! Per-event focus context
//!
//! The dispatcher uses this to move between normal, insert and input mode
//! as focus enters or leaves text fields.

/// Focus state reported alongside each key event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyContext {
    /// Whether the focused element accepts text input
    pub editable: bool,
}

impl KeyContext {
    /// Focus is on something that is not a text field
    pub fn page() -> Self {
        Self { editable: false }
    }

    /// Focus is on a text field
    pub fn text_field() -> Self {
        Self { editable: true }
    }
}
