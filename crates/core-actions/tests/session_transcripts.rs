//! End-to-end dispatcher transcripts driven through a recording surface.

use core_actions::{Flow, Session, SessionResult, SessionState};
use core_events::{Event, KeyCode, KeyEvent, KeyModifiers};
use core_exec::{CommandLauncher, LaunchError};
use core_render::{CellMetrics, DrawOp, FrameRecorder, RenderView, Renderer};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::Level;
use tracing::subscriber::with_default;
use tracing_subscriber::fmt::MakeWriter;

type Log = Rc<RefCell<Vec<String>>>;

/// Stdout stand-in; each flush records the line written since the last one.
struct EchoSink {
    log: Log,
    pending: Vec<u8>,
}

impl Write for EchoSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let line = String::from_utf8_lossy(&self.pending).into_owned();
            self.log.borrow_mut().push(format!("stdout:{line}"));
            self.pending.clear();
        }
        Ok(())
    }
}

struct RecordingLauncher {
    log: Log,
    fail: bool,
}

impl CommandLauncher for RecordingLauncher {
    fn launch(&mut self, command: &[u8]) -> Result<(), LaunchError> {
        self.log
            .borrow_mut()
            .push(format!("launch:{}", String::from_utf8_lossy(command)));
        if self.fail {
            return Err(LaunchError::Spawn(io::Error::from(io::ErrorKind::NotFound)));
        }
        Ok(())
    }
}

struct Harness {
    session: Session<EchoSink>,
    view: RenderView<FrameRecorder, CellMetrics>,
    launcher: RecordingLauncher,
    log: Log,
}

impl Harness {
    fn new(capacity: usize, width: u32) -> Self {
        let log: Log = Rc::default();
        Self {
            session: Session::new(
                capacity,
                EchoSink {
                    log: log.clone(),
                    pending: Vec::new(),
                },
            ),
            view: RenderView::new(
                Renderer::new(1),
                FrameRecorder::new(width, 1),
                CellMetrics::default(),
            ),
            launcher: RecordingLauncher {
                log: log.clone(),
                fail: false,
            },
            log,
        }
    }

    fn send(&mut self, event: Event) -> Flow {
        self.session
            .handle(&event, &mut self.view, &mut self.launcher)
    }

    fn key(&mut self, code: KeyCode) -> Flow {
        self.send(Event::Key(KeyEvent::named(code, KeyModifiers::empty())))
    }

    fn type_str(&mut self, text: &str) {
        for c in text.chars() {
            assert_eq!(self.send(Event::Key(KeyEvent::char(c))), Flow::Continue);
        }
    }

    fn frames(&self) -> usize {
        self.view.surface().frames().len()
    }

    fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

#[test]
fn typed_command_is_echoed_then_launched() {
    let mut h = Harness::new(256, 40);
    h.send(Event::Expose);
    h.type_str("ls -la");
    let flow = h.key(KeyCode::Enter);
    assert_eq!(flow, Flow::Finished(SessionResult::Confirmed(b"ls -la".to_vec())));
    assert_eq!(h.log(), vec!["stdout:ls -la\n", "launch:ls -la"]);
    assert_eq!(h.session.state(), SessionState::Confirmed);
}

#[test]
fn enter_on_empty_buffer_confirms_silently() {
    let mut h = Harness::new(256, 40);
    let flow = h.key(KeyCode::Enter);
    assert_eq!(flow, Flow::Finished(SessionResult::Confirmed(Vec::new())));
    assert!(h.log().is_empty());
}

#[test]
fn escape_cancels_without_launch() {
    let mut h = Harness::new(256, 40);
    h.type_str("rm -rf /tmp/x");
    assert_eq!(h.key(KeyCode::Esc), Flow::Finished(SessionResult::Cancelled));
    assert!(h.log().is_empty());
}

#[test]
fn close_request_cancels() {
    let mut h = Harness::new(256, 40);
    h.type_str("echo");
    assert_eq!(h.send(Event::Close), Flow::Finished(SessionResult::Cancelled));
    assert!(h.log().is_empty());
}

#[test]
fn launch_failure_still_confirms() {
    let mut h = Harness::new(256, 40);
    h.launcher.fail = true;
    h.type_str("nope");
    let flow = h.key(KeyCode::Enter);
    assert_eq!(flow, Flow::Finished(SessionResult::Confirmed(b"nope".to_vec())));
    assert_eq!(h.log(), vec!["stdout:nope\n", "launch:nope"]);
}

#[test]
fn capacity_ten_editing_scenario() {
    let mut h = Harness::new(10, 40);
    h.type_str("hello");
    assert_eq!(h.session.buffer().cursor(), 5);
    assert_eq!(h.session.buffer().len(), 5);
    h.type_str("X");
    assert_eq!(h.session.buffer().as_bytes(), b"helloX");
    h.key(KeyCode::Home);
    assert_eq!(h.session.buffer().cursor(), 0);
    let frames = h.frames();
    h.key(KeyCode::Backspace);
    assert_eq!(h.session.buffer().as_bytes(), b"helloX");
    assert_eq!(h.frames(), frames);
}

#[test]
fn overflowing_insert_is_dropped_without_redraw() {
    let mut h = Harness::new(10, 40);
    h.type_str("abcdefgh");
    let frames = h.frames();
    h.type_str("i");
    assert_eq!(h.session.buffer().as_bytes(), b"abcdefgh");
    assert_eq!(h.frames(), frames);
}

#[test]
fn home_and_end_at_bounds_do_not_redraw() {
    let mut h = Harness::new(256, 40);
    h.type_str("abc");
    let frames = h.frames();
    h.key(KeyCode::End);
    assert_eq!(h.frames(), frames);
    h.key(KeyCode::Home);
    assert_eq!(h.frames(), frames + 1);
    h.key(KeyCode::Home);
    assert_eq!(h.frames(), frames + 1);
}

#[test]
fn ctrl_u_clears_and_resets_scroll() {
    // width 8, padding 1 -> 6 cells of text
    let mut h = Harness::new(256, 8);
    h.type_str("abcdefghijkl");
    assert_eq!(h.session.scroll().offset(), 6);
    h.send(Event::Key(KeyEvent::ctrl('u')));
    assert!(h.session.buffer().is_empty());
    assert_eq!(h.session.scroll().offset(), 0);
    let frame = h.view.surface().last_frame().unwrap();
    assert_eq!(
        frame,
        &[
            DrawOp::Clear,
            DrawOp::Cursor {
                x: 1,
                y: 0,
                width: 1,
                height: 1
            },
            DrawOp::Present
        ]
    );
}

#[test]
fn moving_left_past_scrolled_text_scrolls_back() {
    let mut h = Harness::new(256, 8);
    h.type_str("abcdefghijkl");
    for _ in 0..8 {
        h.key(KeyCode::Left);
    }
    // cursor at 4, previous offset 6 -> aligns to cursor
    assert_eq!(h.session.buffer().cursor(), 4);
    assert_eq!(h.session.scroll().offset(), 4);
    assert_eq!(h.view.surface().last_cursor(), Some((1, 0)));
}

#[test]
fn multibyte_backspace_splits_character() {
    let mut h = Harness::new(256, 40);
    h.type_str("é");
    h.key(KeyCode::Backspace);
    assert_eq!(h.session.buffer().as_bytes(), &[0xC3]);
    h.key(KeyCode::Enter);
    assert_eq!(h.log(), vec!["stdout:\u{FFFD}\n", "launch:\u{FFFD}"]);
}

#[derive(Clone)]
struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl Write for LockedWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}

fn capture<F: FnOnce()>(f: F) -> String {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_target(true)
        .with_ansi(false)
        .without_time()
        .with_writer(BufferWriter { inner: buf.clone() })
        .finish();
    with_default(subscriber, f);
    let out = buf.lock().unwrap().clone();
    String::from_utf8(out).unwrap()
}

#[test]
fn typed_text_only_logged_on_confirm() {
    let mut h = Harness::new(256, 40);
    let editing = capture(|| h.type_str("s3cr3t"));
    assert!(editing.contains("edit"));
    assert!(!editing.contains("s3cr3t"));
    let confirming = capture(|| {
        h.key(KeyCode::Enter);
    });
    assert!(confirming.contains("command_confirmed"));
    assert!(confirming.contains("s3cr3t"));
}
