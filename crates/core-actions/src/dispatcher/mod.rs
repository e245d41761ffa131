//! Session state machine.
//!
//! States: `Running` (initial), then exactly one of `Confirmed` or
//! `Cancelled`. Terminal states are sticky: once reached, every further event
//! is ignored and reports the same result.
//!
//! Sub-modules:
//! * `edit`    - buffer mutations for editing keys
//! * `confirm` - stdout echo and command launch

use crate::{KeyAction, classify};
use core_events::{Event, KeyEvent};
use core_exec::CommandLauncher;
use core_render::{ScrollState, View};
use core_text::LineBuffer;
use std::borrow::Cow;
use std::io::Write;
use tracing::{debug, info, trace};

mod confirm;
mod edit;

/// Whether an edit requires a repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self { dirty: true }
    }
    pub fn clean() -> Self {
        Self { dirty: false }
    }
    pub fn from_changed(changed: bool) -> Self {
        Self { dirty: changed }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Confirmed,
    Cancelled,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Running => "running",
            SessionState::Confirmed => "confirmed",
            SessionState::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::Running)
    }
}

/// Outcome of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResult {
    /// Enter was pressed; holds the buffer bytes (possibly empty).
    Confirmed(Vec<u8>),
    Cancelled,
}

impl SessionResult {
    pub fn state(&self) -> SessionState {
        match self {
            SessionResult::Confirmed(_) => SessionState::Confirmed,
            SessionResult::Cancelled => SessionState::Cancelled,
        }
    }

    /// Confirmed text, decoded lossily.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            SessionResult::Confirmed(bytes) => Some(String::from_utf8_lossy(bytes)),
            SessionResult::Cancelled => None,
        }
    }
}

/// What the event loop should do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Finished(SessionResult),
}

pub struct Session<W: Write> {
    buffer: LineBuffer,
    scroll: ScrollState,
    focus_requested: bool,
    result: Option<SessionResult>,
    echo: W,
}

impl<W: Write> Session<W> {
    /// Empty session with a buffer of `capacity` bytes echoing to `echo`.
    pub fn new(capacity: usize, echo: W) -> Self {
        Self {
            buffer: LineBuffer::with_capacity(capacity),
            scroll: ScrollState::new(),
            focus_requested: false,
            result: None,
            echo,
        }
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn scroll(&self) -> ScrollState {
        self.scroll
    }

    pub fn state(&self) -> SessionState {
        self.result
            .as_ref()
            .map_or(SessionState::Running, SessionResult::state)
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    pub fn echo(&self) -> &W {
        &self.echo
    }

    /// Apply one event.
    pub fn handle<V, L>(&mut self, event: &Event, view: &mut V, launcher: &mut L) -> Flow
    where
        V: View + ?Sized,
        L: CommandLauncher + ?Sized,
    {
        if let Some(result) = &self.result {
            trace!(target: "session", state = result.state().as_str(), "event_after_finish");
            return Flow::Finished(result.clone());
        }
        match event {
            Event::Expose => {
                if !self.focus_requested {
                    self.focus_requested = true;
                    debug!(target: "session", "focus_requested");
                    view.request_focus();
                }
                view.redraw(&self.buffer, &mut self.scroll);
                Flow::Continue
            }
            Event::Resize(cols, rows) => {
                view.resize(*cols, *rows);
                view.redraw(&self.buffer, &mut self.scroll);
                Flow::Continue
            }
            Event::Focus(gained) => {
                trace!(target: "session", gained, "focus_changed");
                Flow::Continue
            }
            Event::Close => self.finish(SessionResult::Cancelled),
            Event::Key(key) => self.handle_key(key, view, launcher),
        }
    }

    fn handle_key<V, L>(&mut self, key: &KeyEvent, view: &mut V, launcher: &mut L) -> Flow
    where
        V: View + ?Sized,
        L: CommandLauncher + ?Sized,
    {
        let Some(action) = classify(key) else {
            trace!(target: "session", key = %key, "key_ignored");
            return Flow::Continue;
        };
        match action {
            KeyAction::Cancel => self.finish(SessionResult::Cancelled),
            KeyAction::Confirm => {
                let result = confirm::confirm(&self.buffer, &mut self.echo, launcher);
                self.finish(result)
            }
            other => {
                if edit::handle_edit(&other, &mut self.buffer, &mut self.scroll).dirty {
                    view.redraw(&self.buffer, &mut self.scroll);
                }
                Flow::Continue
            }
        }
    }

    fn finish(&mut self, result: SessionResult) -> Flow {
        info!(
            target: "session",
            state = result.state().as_str(),
            len = self.buffer.len(),
            "session_finished"
        );
        self.result = Some(result.clone());
        Flow::Finished(result)
    }
}
