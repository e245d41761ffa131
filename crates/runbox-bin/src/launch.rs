//! Launch ordering relative to the terminal.
//!
//! With stdout on the terminal the window is drawn on, a command started
//! during the session would inherit a raw tty showing the alternate screen,
//! and its output would be wiped on restore. [`LaunchGate`] then stores the
//! confirmed bytes, and [`LaunchGate::release`] starts the command once the
//! terminal is back and the echo has been written.

use core_exec::{CommandLauncher, LaunchError};
use tracing::debug;

pub struct LaunchGate {
    inner: Box<dyn CommandLauncher>,
    hold: bool,
    held: Option<Vec<u8>>,
}

impl LaunchGate {
    pub fn new(inner: Box<dyn CommandLauncher>, hold: bool) -> Self {
        Self {
            inner,
            hold,
            held: None,
        }
    }

    /// Start the held command, if any.
    pub fn release(mut self) -> Result<(), LaunchError> {
        match self.held.take() {
            Some(command) => self.inner.launch(&command),
            None => Ok(()),
        }
    }
}

impl CommandLauncher for LaunchGate {
    fn launch(&mut self, command: &[u8]) -> Result<(), LaunchError> {
        if !self.hold {
            return self.inner.launch(command);
        }
        debug!(target: "exec", bytes = command.len(), "launch_held");
        self.held = Some(command.to_vec());
        Ok(())
    }
}
