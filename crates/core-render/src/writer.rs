//! Terminal writer and the terminal-backed [`Surface`].
//!
//! `Writer` batches primitive terminal operations for one frame and flushes
//! them in order with a single `flush` at the end, so a frame never appears
//! half drawn.
//!
//! Design invariants:
//! * Commands preserve ordering; no flushing mid-frame.
//! * All positions are absolute screen cells; the surface translates window
//!   interior coordinates and clips before emitting anything.
//! * The cursor bar is the terminal's own steady bar cursor, positioned after
//!   all text so later prints cannot move it.

use crate::metrics::cluster_width;
use crate::surface::Surface;
use anyhow::Result;
use core_terminal::{Palette, WindowGeometry};
use crossterm::{
    cursor::{Hide, MoveTo, SetCursorStyle, Show},
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::Write;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ClearScreen,
    MoveTo(u16, u16),
    Colors { fg: Color, bg: Color },
    Print(String),
    ResetColors,
    /// Show the bar cursor at a screen cell, or hide it.
    CursorBar(Option<(u16, u16)>),
}

#[derive(Default, Debug)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }
    pub fn clear_screen(&mut self) {
        self.cmds.push(Command::ClearScreen);
    }
    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }
    pub fn colors(&mut self, fg: Color, bg: Color) {
        self.cmds.push(Command::Colors { fg, bg });
    }
    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }
    pub fn reset_colors(&mut self) {
        self.cmds.push(Command::ResetColors);
    }
    pub fn cursor_bar(&mut self, at: Option<(u16, u16)>) {
        self.cmds.push(Command::CursorBar(at));
    }
    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }
    pub fn flush<W: Write>(self, out: &mut W) -> Result<()> {
        for c in self.cmds {
            match c {
                Command::ClearScreen => {
                    queue!(out, ResetColor, Clear(ClearType::All))?;
                }
                Command::MoveTo(x, y) => {
                    queue!(out, MoveTo(x, y))?;
                }
                Command::Colors { fg, bg } => {
                    queue!(out, SetForegroundColor(fg), SetBackgroundColor(bg))?;
                }
                Command::Print(s) => {
                    queue!(out, Print(s))?;
                }
                Command::ResetColors => {
                    queue!(out, ResetColor)?;
                }
                Command::CursorBar(Some((x, y))) => {
                    queue!(out, MoveTo(x, y), SetCursorStyle::SteadyBar, Show)?;
                }
                Command::CursorBar(None) => {
                    queue!(out, Hide)?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }
}

/// [`Surface`] drawing the launcher window onto a terminal.
pub struct TerminalSurface<W: Write> {
    out: W,
    palette: Palette,
    ambiguous_wide: bool,
    requested: (u16, u16),
    geometry: WindowGeometry,
    full_clear: bool,
    writer: Writer,
    cursor: Option<(u16, u16)>,
}

impl<W: Write> TerminalSurface<W> {
    /// `requested` is the configured interior size; it is centered on a
    /// `screen` of (columns, rows) and shrunk to fit.
    pub fn new(
        out: W,
        palette: Palette,
        ambiguous_wide: bool,
        requested: (u16, u16),
        screen: (u16, u16),
    ) -> Self {
        Self {
            out,
            palette,
            ambiguous_wide,
            requested,
            geometry: WindowGeometry::centered(screen.0, screen.1, requested.0, requested.1),
            full_clear: true,
            writer: Writer::new(),
            cursor: None,
        }
    }

    pub fn geometry(&self) -> WindowGeometry {
        self.geometry
    }

    /// Commands queued for the frame in progress.
    pub fn pending(&self) -> &[Command] {
        self.writer.commands()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw_frame(&mut self) {
        let g = self.geometry;
        let (fg, bg) = (self.palette.foreground, self.palette.background);
        let inner = usize::from(g.width);
        self.writer.colors(fg, bg);
        self.writer.move_to(g.x, g.y);
        self.writer.print(format!("┌{}┐", "─".repeat(inner)));
        for row in 0..g.height {
            self.writer.move_to(g.x, g.y + 1 + row);
            self.writer.print(format!("│{}│", " ".repeat(inner)));
        }
        self.writer.move_to(g.x, g.y + 1 + g.height);
        self.writer.print(format!("└{}┘", "─".repeat(inner)));
        self.writer.reset_colors();
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn size(&self) -> (u32, u32) {
        (
            u32::from(self.geometry.width),
            u32::from(self.geometry.height),
        )
    }

    fn clear(&mut self) {
        self.writer = Writer::new();
        self.cursor = None;
        if self.full_clear {
            self.writer.clear_screen();
            self.full_clear = false;
        }
        if !self.geometry.is_degenerate() {
            self.draw_frame();
        }
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &[u8]) {
        let (width, height) = self.size();
        if y < 0 || y as u32 >= height {
            return;
        }
        let width = i64::from(width);
        let (ox, oy) = self.geometry.interior_origin();
        let row = oy + y as u16;
        let decoded = String::from_utf8_lossy(text);

        // Contiguous visible run: (start column, content).
        let mut run: Option<(i64, String)> = None;
        let mut col = i64::from(x);
        for g in decoded.graphemes(true) {
            let w = i64::from(cluster_width(g, self.ambiguous_wide));
            if w == 0 {
                continue;
            }
            let visible = col >= 0 && col + w <= width;
            if visible {
                run.get_or_insert_with(|| (col, String::new())).1.push_str(g);
            } else if col < 0 && col + w > 0 {
                // Wide cluster straddling the left edge: blank its visible half.
                run.get_or_insert_with(|| (0, String::new()))
                    .1
                    .push_str(&" ".repeat((col + w) as usize));
            } else if col + w > width {
                break;
            }
            col += w;
        }

        if let Some((start, content)) = run {
            self.writer
                .colors(self.palette.foreground, self.palette.background);
            self.writer.move_to(ox + start as u16, row);
            self.writer.print(content);
            self.writer.reset_colors();
        }
    }

    fn draw_cursor(&mut self, x: i32, y: i32, _width: u32, _height: u32) {
        let (width, height) = self.size();
        let inside = x >= 0 && (x as u32) < width && y >= 0 && (y as u32) < height;
        self.cursor = if inside {
            let (ox, oy) = self.geometry.interior_origin();
            Some((ox + x as u16, oy + y as u16))
        } else {
            None
        };
    }

    fn present(&mut self) -> Result<()> {
        let mut frame = std::mem::take(&mut self.writer);
        frame.cursor_bar(self.cursor);
        frame.flush(&mut self.out)
    }

    fn host_resized(&mut self, cols: u16, rows: u16) {
        self.geometry = WindowGeometry::centered(cols, rows, self.requested.0, self.requested.1);
        self.full_clear = true;
    }
}
