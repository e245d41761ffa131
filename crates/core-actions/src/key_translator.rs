//! Key press -> [`KeyAction`] translation.
//!
//! Stateless; the first matching rule wins:
//! Escape, Enter, Backspace, Left, Right, Home, End, Ctrl+U, then any press
//! that carries translated bytes. Modifiers do not affect the named keys, so
//! Ctrl+Left is still Left.

use crate::KeyAction;
use core_events::{KeyCode, KeyEvent, KeyModifiers};

pub fn classify(key: &KeyEvent) -> Option<KeyAction> {
    let action = match key.code {
        KeyCode::Esc => KeyAction::Cancel,
        KeyCode::Enter => KeyAction::Confirm,
        KeyCode::Backspace => KeyAction::Backspace,
        KeyCode::Left => KeyAction::Left,
        KeyCode::Right => KeyAction::Right,
        KeyCode::Home => KeyAction::Home,
        KeyCode::End => KeyAction::End,
        KeyCode::Char('u' | 'U') if key.mods.contains(KeyModifiers::CTRL) => KeyAction::ClearLine,
        _ if key.has_text() => KeyAction::Insert(key.text.clone()),
        _ => return None,
    };
    Some(action)
}
