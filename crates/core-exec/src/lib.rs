//! Detached command launching.
//!
//! A confirmed line is handed to `/bin/sh -c` in a new session and never
//! waited on. The launcher process ignores `SIGCHLD` for its whole lifetime
//! so exited children are reaped by the kernel instead of lingering as
//! zombies; the child gets the default disposition back before `exec` so the
//! shell can still wait on its own children.

use std::ffi::OsStr;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{debug, info};

pub const SHELL: &str = "/bin/sh";

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("refusing to launch an empty command")]
    EmptyCommand,
    #[error("failed to spawn /bin/sh: {0}")]
    Spawn(#[source] io::Error),
}

/// Seam between the session and process creation.
pub trait CommandLauncher {
    /// Start `command` without waiting for it.
    fn launch(&mut self, command: &[u8]) -> Result<(), LaunchError>;
}

/// Launches commands through the system shell.
#[derive(Debug, Default, Clone)]
pub struct ShellLauncher {
    launched: u32,
}

impl ShellLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launched(&self) -> u32 {
        self.launched
    }

    fn command(line: &[u8]) -> Command {
        let mut cmd = Command::new(SHELL);
        cmd.arg("-c")
            .arg(OsStr::from_bytes(line))
            // The launcher's terminal stays in raw mode until it exits.
            .stdin(Stdio::null());
        unsafe {
            cmd.pre_exec(|| {
                if libc::signal(libc::SIGCHLD, libc::SIG_DFL) == libc::SIG_ERR {
                    return Err(io::Error::last_os_error());
                }
                match libc::setsid() {
                    -1 => Err(io::Error::last_os_error()),
                    _ => Ok(()),
                }
            });
        }
        cmd
    }
}

impl CommandLauncher for ShellLauncher {
    fn launch(&mut self, command: &[u8]) -> Result<(), LaunchError> {
        if command.is_empty() {
            return Err(LaunchError::EmptyCommand);
        }
        let child = Self::command(command)
            .spawn()
            .map_err(LaunchError::Spawn)?;
        self.launched += 1;
        info!(target: "exec", pid = child.id(), bytes = command.len(), "command_launched");
        // Dropping the handle does not wait; SIGCHLD is ignored in this process.
        drop(child);
        Ok(())
    }
}

/// Launcher that records nothing and starts nothing (`--no-exec`).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLauncher;

impl CommandLauncher for NoopLauncher {
    fn launch(&mut self, command: &[u8]) -> Result<(), LaunchError> {
        debug!(target: "exec", bytes = command.len(), "launch_skipped");
        Ok(())
    }
}

/// Let the kernel reap exited children. Call once at startup.
pub fn ignore_child_exits() -> io::Result<()> {
    let prev = unsafe { libc::signal(libc::SIGCHLD, libc::SIG_IGN) };
    if prev == libc::SIG_ERR {
        return Err(io::Error::last_os_error());
    }
    debug!(target: "exec", "sigchld_ignored");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::{Duration, Instant};

    fn wait_for(path: &Path) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if path.exists() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        false
    }

    #[test]
    fn empty_command_is_rejected() {
        let mut l = ShellLauncher::new();
        assert!(matches!(l.launch(b""), Err(LaunchError::EmptyCommand)));
        assert_eq!(l.launched(), 0);
    }

    #[test]
    fn shell_runs_command_detached() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ran");
        let line = format!("echo ok > '{}'", marker.display());
        let mut l = ShellLauncher::new();
        l.launch(line.as_bytes()).unwrap();
        assert_eq!(l.launched(), 1);
        assert!(wait_for(&marker));
    }

    #[test]
    fn shell_syntax_is_honoured() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        let line = format!("touch '{}' && touch '{}'", a.display(), b.display());
        ShellLauncher::new().launch(line.as_bytes()).unwrap();
        assert!(wait_for(&a));
        assert!(wait_for(&b));
    }

    #[test]
    fn noop_launcher_accepts_anything() {
        assert!(NoopLauncher.launch(b"rm -rf /nonexistent").is_ok());
    }

    #[test]
    fn launch_error_messages() {
        assert_eq!(
            LaunchError::EmptyCommand.to_string(),
            "refusing to launch an empty command"
        );
        let e = LaunchError::Spawn(io::Error::from(io::ErrorKind::NotFound));
        assert!(e.to_string().starts_with("failed to spawn /bin/sh"));
    }
}
