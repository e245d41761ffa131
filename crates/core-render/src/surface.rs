//! Drawing surface abstraction.
//!
//! Coordinates are relative to the window interior in extent units. Text may
//! start left of the interior (negative `x`) when the line is scrolled; the
//! surface clips whatever falls outside.

use anyhow::Result;

pub trait Surface {
    /// Interior size (width, height).
    fn size(&self) -> (u32, u32);
    /// Erase the window to its background.
    fn clear(&mut self);
    /// Paint `text` with its top-left corner at (`x`, `y`).
    fn draw_text(&mut self, x: i32, y: i32, text: &[u8]);
    /// Paint the cursor bar.
    fn draw_cursor(&mut self, x: i32, y: i32, width: u32, height: u32);
    /// Make everything drawn since the last `clear` visible.
    fn present(&mut self) -> Result<()>;
    /// The host surface changed size; re-place the window.
    fn host_resized(&mut self, _cols: u16, _rows: u16) {}
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Clear,
    Text { x: i32, y: i32, text: Vec<u8> },
    Cursor { x: i32, y: i32, width: u32, height: u32 },
    Present,
}

/// Headless surface that records operations; each `present` closes a frame.
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    width: u32,
    height: u32,
    pending: Vec<DrawOp>,
    frames: Vec<Vec<DrawOp>>,
}

impl FrameRecorder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pending: Vec::new(),
            frames: Vec::new(),
        }
    }

    pub fn frames(&self) -> &[Vec<DrawOp>] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&[DrawOp]> {
        self.frames.last().map(Vec::as_slice)
    }

    /// Cursor rectangle of the last presented frame.
    pub fn last_cursor(&self) -> Option<(i32, i32)> {
        self.last_frame()?.iter().rev().find_map(|op| match op {
            DrawOp::Cursor { x, y, .. } => Some((*x, *y)),
            _ => None,
        })
    }
}

impl Surface for FrameRecorder {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.pending.clear();
        self.pending.push(DrawOp::Clear);
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &[u8]) {
        self.pending.push(DrawOp::Text {
            x,
            y,
            text: text.to_vec(),
        });
    }

    fn draw_cursor(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.pending.push(DrawOp::Cursor {
            x,
            y,
            width,
            height,
        });
    }

    fn present(&mut self) -> Result<()> {
        self.pending.push(DrawOp::Present);
        self.frames.push(std::mem::take(&mut self.pending));
        Ok(())
    }
}
