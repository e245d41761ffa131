//! runbox entrypoint.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::{Flow, Session, SessionResult};
use core_events::Event;
use core_exec::{CommandLauncher, NoopLauncher, ShellLauncher};
use core_input::{EventSource, TerminalInput};
use core_render::{CellMetrics, RenderView, Renderer, ScrollState, TerminalSurface, View};
use core_terminal::{
    CrosstermBackend, FontHandle, Palette, TerminalBackend, TerminalGuard, load_font,
};
use core_text::LineBuffer;
use std::fmt;
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod echo;
mod launch;

use echo::EchoSink;
use launch::LaunchGate;

const LOG_FILE_NAME: &str = "runbox.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "runbox", version, about = "Single-line command launcher")]
struct Args {
    /// Configuration file path (overrides discovery of `runbox.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Only print the confirmed line to stdout; do not run it.
    #[arg(long = "no-exec")]
    pub no_exec: bool,
    /// Log file path (defaults to `runbox.log` in the user cache directory).
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    Confirmed,
    Cancelled,
    InputError,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::Confirmed => "confirmed",
            ShutdownReason::Cancelled => "cancelled",
            ShutdownReason::InputError => "input_error",
        }
    }

    fn for_result(result: &SessionResult) -> Self {
        match result {
            SessionResult::Confirmed(_) => ShutdownReason::Confirmed,
            SessionResult::Cancelled => ShutdownReason::Cancelled,
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum LoopControl {
    Continue,
    Break {
        result: SessionResult,
        reason: ShutdownReason,
    },
}

/// Terminal-backed view: rendering plus focus reporting on the backend.
struct TerminalView<'g, 'b> {
    render: RenderView<TerminalSurface<File>, CellMetrics>,
    guard: &'g mut TerminalGuard<'b>,
}

impl View for TerminalView<'_, '_> {
    fn redraw(&mut self, buffer: &LineBuffer, scroll: &mut ScrollState) {
        self.render.redraw(buffer, scroll);
    }

    fn request_focus(&mut self) {
        if let Err(e) = self.guard.backend().request_focus() {
            warn!(target: "runtime", error = %e, "focus_request_failed");
        }
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.render.resize(cols, rows);
    }
}

/// Feed events to the session until it finishes. The first event is a
/// synthetic expose so the window is painted before any input arrives.
fn run_session<S, V, L, W>(
    source: &mut S,
    session: &mut Session<W>,
    view: &mut V,
    launcher: &mut L,
) -> (SessionResult, ShutdownReason)
where
    S: EventSource + ?Sized,
    V: View + ?Sized,
    L: CommandLauncher + ?Sized,
    W: Write,
{
    let mut event = Event::Expose;
    let mut read_failed = false;
    loop {
        match step(session.handle(&event, view, launcher), read_failed) {
            LoopControl::Continue => {}
            LoopControl::Break { result, reason } => return (result, reason),
        }
        event = match source.next_event() {
            Ok(ev) => ev,
            Err(e) => {
                warn!(target: "runtime", error = %e, "input_read_failed");
                read_failed = true;
                Event::Close
            }
        };
    }
}

fn step(flow: Flow, read_failed: bool) -> LoopControl {
    match flow {
        Flow::Continue => LoopControl::Continue,
        Flow::Finished(result) => {
            let reason = if read_failed {
                ShutdownReason::InputError
            } else {
                ShutdownReason::for_result(&result)
            };
            LoopControl::Break { result, reason }
        }
    }
}

fn log_dir_default() -> PathBuf {
    dirs::cache_dir()
        .map(|d| d.join("runbox"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Route tracing to a fresh log file. Logging problems never stop the launcher.
fn configure_logging(path: Option<&Path>) -> Option<WorkerGuard> {
    let (dir, file_name) = match path {
        Some(p) => (
            p.parent()
                .filter(|d| !d.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
            p.file_name()?.to_os_string(),
        ),
        None => (log_dir_default(), LOG_FILE_NAME.into()),
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return None;
    }
    let log_path = dir.join(&file_name);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(&dir, &file_name);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
        .ok()
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn launch_with(no_exec: bool) -> Box<dyn CommandLauncher> {
    if no_exec {
        Box::new(NoopLauncher)
    } else {
        Box::new(ShellLauncher::new())
    }
}

/// Write the held echo, then start the held command.
fn release_held<W: Write>(echo: EchoSink<W>, launcher: LaunchGate) {
    if let Err(e) = echo.release() {
        warn!(target: "runtime.shutdown", error = %e, "echo_release_failed");
    }
    if let Err(e) = launcher.release() {
        warn!(target: "exec", error = %e, "launch_failed");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(args.log_file.as_deref());
    install_panic_hook();
    info!(target: "runtime", version = env!("CARGO_PKG_VERSION"), "startup");

    core_exec::ignore_child_exits().context("cannot ignore SIGCHLD")?;

    let config = core_config::load_from(args.config.clone())?.validated();
    let mut backend = CrosstermBackend::open()?;
    let font: FontHandle = load_font(config.font_name())?;
    let palette = Palette::resolve(&config.colors().background, &config.colors().foreground);
    let window = config.window();

    let screen = backend.size()?;
    let tty = backend.writer()?;
    backend.set_title("runbox")?;

    let stdout = io::stdout();
    let defer_echo = stdout.is_terminal();
    let mut echo = EchoSink::new(stdout, defer_echo);
    let mut launcher = LaunchGate::new(launch_with(args.no_exec), defer_echo);

    info!(
        target: "runtime.startup",
        config = ?config.source,
        font = font.family.as_str(),
        width = window.width,
        height = window.height,
        padding = window.padding,
        input_max = config.input_max(),
        no_exec = args.no_exec,
        defer_echo,
        "bootstrap_complete"
    );

    let (result, reason) = {
        let mut guard = backend.enter_guard()?;
        let surface = TerminalSurface::new(
            tty,
            palette,
            font.ambiguous_wide,
            (window.width, window.height),
            screen,
        );
        let render = RenderView::new(
            Renderer::new(u32::from(window.padding)),
            surface,
            CellMetrics::for_font(&font),
        );
        let mut session = Session::new(config.input_max(), &mut echo);
        let mut input = TerminalInput::new();
        let outcome = {
            let mut view = TerminalView {
                render,
                guard: &mut guard,
            };
            run_session(&mut input, &mut session, &mut view, &mut launcher)
        };
        if let Err(e) = guard.release() {
            warn!(target: "runtime.shutdown", error = %e, "terminal_restore_failed");
        }
        info!(
            target: "runtime.shutdown",
            dropped_events = input.dropped(),
            "input_closed"
        );
        outcome
    };

    release_held(echo, launcher);
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        state = result.state().as_str(),
        "shutdown"
    );
    Ok(())
}
