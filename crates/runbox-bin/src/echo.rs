//! Stdout mirror for the confirmed line.
//!
//! When stdout is a pipe the line goes out immediately, ahead of the launch.
//! When stdout is the terminal the window is drawn on, anything written now
//! would land on the alternate screen and vanish, so the bytes are held and
//! written by [`EchoSink::release`] once the terminal is restored.

use std::io::{self, Write};

pub enum EchoSink<W: Write> {
    Direct(W),
    Deferred { held: Vec<u8>, out: W },
}

impl<W: Write> EchoSink<W> {
    pub fn new(out: W, defer: bool) -> Self {
        if defer {
            EchoSink::Deferred {
                held: Vec::new(),
                out,
            }
        } else {
            EchoSink::Direct(out)
        }
    }

    /// Write out anything held back. Returns the underlying writer.
    pub fn release(self) -> io::Result<W> {
        match self {
            EchoSink::Direct(out) => Ok(out),
            EchoSink::Deferred { held, mut out } => {
                if !held.is_empty() {
                    out.write_all(&held)?;
                    out.flush()?;
                }
                Ok(out)
            }
        }
    }
}

impl<W: Write> Write for EchoSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            EchoSink::Direct(out) => out.write(buf),
            EchoSink::Deferred { held, .. } => {
                held.extend_from_slice(buf);
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            EchoSink::Direct(out) => out.flush(),
            EchoSink::Deferred { .. } => Ok(()),
        }
    }
}
