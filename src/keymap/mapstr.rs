//! Mapstr compiler: binding strings like `"<C-u>j"` into key sequences
//!
//! A mapstr is scanned left to right. Any character is a key on its own,
//! except that `<` may open a bracket expression:
//!
//! ```text
//! bracketexpr ::= '<' modifier? key '>'
//! modifier    ::= [ACMSacms]+ '-'
//! key         ::= '<' | '>' | '-' | [^\s<>-]+
//! ```
//!
//! When the text after a `<` is not a valid bracket expression the `<` is a
//! literal key and scanning resumes at the next character. Compilation
//! therefore never fails.
//!
//! Named keys are case-insensitively expanded through a small alias table
//! (`<CR>` is `Enter`, `<lt>` is `<`, and so on). Shift + letter must use the
//! correct case: `<S-J>` matches `J`, `<S-j>` does not.

use super::types::{Key, KeySequence, Modifiers};

/// Expand the vim-compatible key aliases (case-insensitive)
pub fn expand_alias(key: &str) -> &str {
    match key.to_ascii_lowercase().as_str() {
        "cr" | "return" | "enter" => "Enter",
        "esc" => "Escape",
        "space" => " ",
        "bar" => "|",
        "del" => "Delete",
        "bs" => "Backspace",
        "lt" => "<",
        _ => key,
    }
}

fn modifier_flag(c: char) -> Option<Modifiers> {
    match c.to_ascii_uppercase() {
        'A' => Some(Modifiers::ALT),
        'C' => Some(Modifiers::CTRL),
        'M' => Some(Modifiers::META),
        'S' => Some(Modifiers::SHIFT),
        _ => None,
    }
}

/// Parse the optional `[ACMS]+-` prefix of a bracket body.
///
/// Returns the modifiers and the rest of the body, or no modifiers and the
/// untouched body when there is no such prefix.
fn split_modifiers(body: &str) -> (Modifiers, &str) {
    let mut mods = Modifiers::NONE;
    for (idx, c) in body.char_indices() {
        if let Some(flag) = modifier_flag(c) {
            mods = mods | flag;
            continue;
        }
        if c == '-' && idx > 0 {
            return (mods, &body[idx + 1..]);
        }
        break;
    }
    (Modifiers::NONE, body)
}

fn is_key_char(c: char) -> bool {
    !c.is_whitespace() && c != '<' && c != '>' && c != '-'
}

/// Parse a bracket expression at the start of `input`.
///
/// `input` must start with `<`. Returns the key and the unparsed remainder.
/// Malformed expressions yield a literal `<` and everything after it.
pub fn bracketexpr_to_key(input: &str) -> (Key, &str) {
    let literal = || (Key::plain("<"), &input[1..]);

    if !input[1..].contains('>') {
        return literal();
    }

    let (mods, body) = split_modifiers(&input[1..]);

    // `<`, `>` and `-` are only valid as single-character keys
    let mut chars = body.chars();
    if let (Some(first @ ('<' | '>' | '-')), Some('>')) = (chars.next(), chars.next()) {
        return (Key::new(first.to_string(), mods), &body[2..]);
    }

    let end = body
        .char_indices()
        .find(|&(_, c)| !is_key_char(c))
        .map(|(idx, _)| idx)
        .unwrap_or(body.len());
    if end == 0 || !body[end..].starts_with('>') {
        return literal();
    }

    let name = expand_alias(&body[..end]);
    (Key::new(name, mods), &body[end + 1..])
}

/// Compile a mapstr into a sequence of keys
pub fn mapstr_to_keyseq(mapstr: &str) -> KeySequence {
    let mut keys = Vec::new();
    let mut rest = mapstr;
    while let Some(first) = rest.chars().next() {
        if first == '<' {
            let (key, remainder) = bracketexpr_to_key(rest);
            keys.push(key);
            rest = remainder;
        } else {
            keys.push(Key::plain(first.to_string()));
            rest = &rest[first.len_utf8()..];
        }
    }
    keys
}

/// Rewrite a mapstr into its canonical form
///
/// `"<c-A><cr>"` becomes `"<C-A><Enter>"`.
pub fn canonicalise_mapstr(mapstr: &str) -> String {
    mapstr_to_keyseq(mapstr)
        .iter()
        .map(Key::to_mapstr)
        .collect()
}
