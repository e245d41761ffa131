//! Terminal input source for the launcher session.
//!
//! Reads crossterm events from the controlling terminal and converts them to
//! [`core_events::Event`]. Events the session has no use for (mouse, paste,
//! key releases) are dropped here so the session loop only ever sees its own
//! vocabulary.

mod key_token;

use anyhow::Result;
use core_events::{Event, KeyCode, KeyModifiers};
use crossterm::event::Event as CEvent;
use tracing::trace;

/// Convert one terminal event. Returns `None` for events with no launcher meaning.
///
/// An interrupt chord (Ctrl+C) arrives as a key in raw mode and is reported
/// as [`Event::Close`], the same as a host close request.
pub fn map_event(event: CEvent) -> Option<Event> {
    match event {
        CEvent::Key(key) => {
            let key = key_token::map_key_event(&key)?;
            if key.code == KeyCode::Char('c') && key.mods.contains(KeyModifiers::CTRL) {
                trace!(target: "input.event", "interrupt_chord");
                return Some(Event::Close);
            }
            trace!(target: "input.event", key = %key, "key");
            Some(Event::Key(key))
        }
        CEvent::Resize(w, h) => {
            trace!(target: "input.event", w, h, "resize");
            Some(Event::Resize(w, h))
        }
        CEvent::FocusGained => Some(Event::Focus(true)),
        CEvent::FocusLost => Some(Event::Focus(false)),
        CEvent::Mouse(_) | CEvent::Paste(_) => None,
    }
}

/// Source of launcher events.
pub trait EventSource {
    /// Block until the next event the session understands.
    fn next_event(&mut self) -> Result<Event>;
}

/// Blocking reader over the terminal's input queue.
#[derive(Debug, Default)]
pub struct TerminalInput {
    dropped: u64,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of terminal events discarded as irrelevant so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl EventSource for TerminalInput {
    fn next_event(&mut self) -> Result<Event> {
        loop {
            let raw = crossterm::event::read()?;
            match map_event(raw) {
                Some(ev) => return Ok(ev),
                None => self.dropped += 1,
            }
        }
    }
}

/// Replays a fixed list of events, then reports close.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    events: std::collections::VecDeque<Event>,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

impl EventSource for ScriptedInput {
    fn next_event(&mut self) -> Result<Event> {
        Ok(self.events.pop_front().unwrap_or(Event::Close))
    }
}
