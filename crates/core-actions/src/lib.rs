//! Launcher session: key classification and the event dispatcher.
//!
//! [`Session::handle`] is a step function over [`core_events::Event`]. It owns
//! the line buffer and the scroll state, and reaches the outside world only
//! through three collaborators: a [`core_render::View`] for repainting, a
//! [`core_exec::CommandLauncher`] for the confirmed command and a writer that
//! receives the stdout echo.

pub mod key_translator;

mod dispatcher;

pub use dispatcher::{DispatchResult, Flow, Session, SessionResult, SessionState};
pub use key_translator::classify;

/// Editing or terminating intent of a single key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Cancel,
    Confirm,
    Backspace,
    Left,
    Right,
    Home,
    End,
    ClearLine,
    /// Literal bytes translated by the host for this press.
    Insert(Vec<u8>),
}

impl KeyAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyAction::Cancel => "cancel",
            KeyAction::Confirm => "confirm",
            KeyAction::Backspace => "backspace",
            KeyAction::Left => "left",
            KeyAction::Right => "right",
            KeyAction::Home => "home",
            KeyAction::End => "end",
            KeyAction::ClearLine => "clear_line",
            KeyAction::Insert(_) => "insert",
        }
    }
}
