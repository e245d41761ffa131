//! Host event model consumed by the launcher session.
//!
//! The display host delivers one [`Event`] at a time. Key presses carry both
//! the resolved logical key and the raw bytes the host translated for it, so
//! the dispatcher can decide between editing commands and literal insertion
//! without knowing anything about the host's keyboard layer.

use std::fmt;

/// Top-level event enum consumed by the session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The window contents must be repainted (initial map, damage).
    Expose,
    /// Host surface size changed (columns, rows).
    Resize(u16, u16),
    /// Keyboard focus gained (`true`) or lost (`false`).
    Focus(bool),
    /// Key press with resolved symbol, modifiers and translated bytes.
    Key(KeyEvent),
    /// Host asked the window to close (window manager, interrupt).
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Logical key symbols the dispatcher distinguishes.
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Delete,
    /// Any key the host resolved but the launcher has no symbol for.
    Other,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

/// A single key press.
///
/// `text` holds the bytes the host translated for this press (UTF-8 for
/// character keys, empty for named keys and control chords).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
    pub text: Vec<u8>,
}

impl KeyEvent {
    /// Named key without translated text.
    pub fn named(code: KeyCode, mods: KeyModifiers) -> Self {
        Self {
            code,
            mods,
            text: Vec::new(),
        }
    }

    /// Unmodified character key carrying its UTF-8 encoding as text.
    pub fn char(c: char) -> Self {
        let mut buf = [0u8; 4];
        Self {
            code: KeyCode::Char(c),
            mods: KeyModifiers::empty(),
            text: c.encode_utf8(&mut buf).as_bytes().to_vec(),
        }
    }

    /// Control chord on a character key; hosts translate no text for these.
    pub fn ctrl(c: char) -> Self {
        Self::named(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Translated bytes are reported by length only.
        write!(f, "{:?}{:?}+{}b", self.code, self.mods, self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_display_redacts_text() {
        let k = KeyEvent::char('x');
        let s = format!("{}", k);
        assert!(s.contains("Char"));
        assert!(s.ends_with("+1b"));
    }

    #[test]
    fn char_constructor_encodes_utf8() {
        let k = KeyEvent::char('é');
        assert_eq!(k.text, "é".as_bytes());
        assert!(k.mods.is_empty());
        assert!(k.has_text());
    }

    #[test]
    fn ctrl_chord_has_no_text() {
        let k = KeyEvent::ctrl('u');
        assert_eq!(k.code, KeyCode::Char('u'));
        assert!(k.mods.contains(KeyModifiers::CTRL));
        assert!(!k.has_text());
    }
}
