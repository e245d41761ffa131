//! Terminal backend acting as the launcher's display host.
//!
//! The backend talks to the controlling terminal through `/dev/tty` rather
//! than stdout, so stdout stays free for the confirmed command line when the
//! launcher is used at the head of a pipeline.

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, SetCursorStyle, Show},
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::fs::{File, OpenOptions};
use std::io::Write;
use tracing::debug;

pub mod error;
pub mod geometry;
pub mod resources;

pub use error::ResourceError;
pub use geometry::WindowGeometry;
pub use resources::{FontHandle, Palette, load_font, resolve_color};

pub const TTY_PATH: &str = "/dev/tty";

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    /// Ask the host to report focus changes to this window.
    fn request_focus(&mut self) -> Result<()>;
}

pub struct CrosstermBackend {
    tty: File,
    entered: bool,
    focus_reporting: bool,
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a> {
    backend: &'a mut CrosstermBackend,
    active: bool,
}

impl CrosstermBackend {
    /// Open the controlling terminal. Failure is the "cannot open display"
    /// condition and is fatal for the launcher.
    pub fn open() -> Result<Self> {
        let tty = OpenOptions::new()
            .read(true)
            .write(true)
            .open(TTY_PATH)
            .map_err(|source| ResourceError::DisplayUnavailable {
                path: TTY_PATH.to_string(),
                source,
            })?;
        Ok(Self::from_file(tty))
    }

    pub fn from_file(tty: File) -> Self {
        Self {
            tty,
            entered: false,
            focus_reporting: false,
        }
    }

    /// Independent handle to the terminal for drawing.
    pub fn writer(&self) -> Result<File> {
        self.tty
            .try_clone()
            .context("cannot duplicate terminal handle")
    }

    /// Current terminal size in cells (columns, rows).
    pub fn size(&self) -> Result<(u16, u16)> {
        crossterm::terminal::size().context("cannot query terminal size")
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.enter()?;
        Ok(TerminalGuard {
            backend: self,
            active: true,
        })
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(self.tty, EnterAlternateScreen, Hide)?;
            self.entered = true;
            debug!(target: "runtime", "terminal_entered");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            if self.focus_reporting {
                execute!(self.tty, DisableFocusChange)?;
                self.focus_reporting = false;
            }
            execute!(
                self.tty,
                SetCursorStyle::DefaultUserShape,
                LeaveAlternateScreen,
                Show
            )?;
            disable_raw_mode()?;
            self.tty.flush()?;
            self.entered = false;
            debug!(target: "runtime", "terminal_left");
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(self.tty, SetTitle(title))?;
        Ok(())
    }

    fn request_focus(&mut self) -> Result<()> {
        if !self.focus_reporting {
            execute!(self.tty, EnableFocusChange)?;
            self.focus_reporting = true;
        }
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl<'a> TerminalGuard<'a> {
    pub fn backend(&mut self) -> &mut CrosstermBackend {
        self.backend
    }

    /// Restore the terminal now instead of at drop.
    pub fn release(&mut self) -> Result<()> {
        if self.active {
            self.active = false;
            self.backend.leave()?;
        }
        Ok(())
    }
}

impl<'a> Drop for TerminalGuard<'a> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.backend.leave();
        }
    }
}
