//! Confirmation: stdout echo followed by the launch.

use super::SessionResult;
use core_exec::CommandLauncher;
use core_text::LineBuffer;
use std::io::{self, Write};
use tracing::{debug, info, warn};

pub(crate) fn confirm<W: Write, L: CommandLauncher + ?Sized>(
    buffer: &LineBuffer,
    echo: &mut W,
    launcher: &mut L,
) -> SessionResult {
    let line = buffer.as_bytes().to_vec();
    if line.is_empty() {
        debug!(target: "session", "confirm_empty");
        return SessionResult::Confirmed(line);
    }
    // The echo lands before the child can write anything of its own.
    if let Err(e) = write_echo(echo, &line) {
        warn!(target: "session", ?e, "echo_failed");
    }
    info!(target: "session", command = %String::from_utf8_lossy(&line), "command_confirmed");
    if let Err(e) = launcher.launch(&line) {
        warn!(target: "exec", error = %e, "launch_failed");
    }
    SessionResult::Confirmed(line)
}

fn write_echo<W: Write>(echo: &mut W, line: &[u8]) -> io::Result<()> {
    echo.write_all(line)?;
    echo.write_all(b"\n")?;
    echo.flush()
}
