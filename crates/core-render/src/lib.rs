//! Rendering for the single-line launcher window.
//!
//! Exposed components:
//! - `metrics`: the [`TextMetrics`] seam and the terminal cell implementation.
//! - `viewport`: greedy horizontal scroll policy keeping the cursor visible.
//! - `surface`: the [`Surface`] seam plus a headless frame recorder.
//! - `writer`: batched terminal command emission and [`TerminalSurface`].
//!
//! A redraw measures the buffer, recomputes the scroll offset, clears the
//! window, paints the text shifted left by the offset and finally paints the
//! cursor bar. The text row is vertically centered from the font metrics:
//! `baseline = (height + ascent - descent) / 2`, `top = baseline - ascent`.

use anyhow::Result;
use core_text::LineBuffer;
use tracing::error;

pub mod metrics;
pub mod surface;
pub mod viewport;
pub mod writer;

pub use metrics::{CellMetrics, TextMetrics};
pub use surface::{DrawOp, FrameRecorder, Surface};
pub use viewport::{ScrollState, ViewportScroller, recompute_scroll};
pub use writer::TerminalSurface;

/// Width of the cursor bar in extent units.
pub const CURSOR_BAR_WIDTH: u32 = 1;

/// Extents measured for one redraw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextLayout {
    pub cursor_extent: u32,
    pub total_extent: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    padding: u32,
}

impl Renderer {
    pub fn new(padding: u32) -> Self {
        Self { padding }
    }

    pub fn scroller(&self, width: u32) -> ViewportScroller {
        ViewportScroller::new(width, self.padding)
    }

    /// Measure the buffer and bring the scroll offset up to date.
    pub fn layout<M: TextMetrics + ?Sized>(
        &self,
        metrics: &M,
        width: u32,
        buffer: &LineBuffer,
        scroll: &mut ScrollState,
    ) -> TextLayout {
        let total_extent = if buffer.is_empty() {
            0
        } else {
            metrics.extent(buffer.as_bytes())
        };
        let cursor_extent = if buffer.cursor() == 0 {
            0
        } else {
            metrics.extent(buffer.before_cursor())
        };
        self.scroller(width)
            .recompute(scroll, cursor_extent, total_extent);
        TextLayout {
            cursor_extent,
            total_extent,
        }
    }

    /// Paint one frame for an already computed layout.
    pub fn paint<S: Surface + ?Sized, M: TextMetrics + ?Sized>(
        &self,
        surface: &mut S,
        metrics: &M,
        buffer: &LineBuffer,
        layout: TextLayout,
        scroll: ScrollState,
    ) -> Result<()> {
        let (_, height) = surface.size();
        let ascent = metrics.ascent();
        let baseline = (height + ascent).saturating_sub(metrics.descent()) / 2;
        let top = to_i32(i64::from(baseline) - i64::from(ascent));
        let offset = i64::from(scroll.offset());
        let pad = i64::from(self.padding);

        surface.clear();
        if !buffer.is_empty() {
            surface.draw_text(to_i32(pad - offset), top, buffer.as_bytes());
        }
        let cursor_x = to_i32(pad + i64::from(layout.cursor_extent) - offset);
        surface.draw_cursor(cursor_x, top, CURSOR_BAR_WIDTH, metrics.line_height());
        surface.present()
    }

    /// Layout followed by paint.
    pub fn draw<S: Surface + ?Sized, M: TextMetrics + ?Sized>(
        &self,
        surface: &mut S,
        metrics: &M,
        buffer: &LineBuffer,
        scroll: &mut ScrollState,
    ) -> Result<TextLayout> {
        let (width, _) = surface.size();
        let layout = self.layout(metrics, width, buffer, scroll);
        self.paint(surface, metrics, buffer, layout, *scroll)?;
        Ok(layout)
    }
}

fn to_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Display collaborator driven by the session dispatcher.
pub trait View {
    /// Recompute the scroll offset for `buffer` and repaint the window.
    fn redraw(&mut self, buffer: &LineBuffer, scroll: &mut ScrollState);
    /// Ask the host to direct keyboard input to the window.
    fn request_focus(&mut self) {}
    /// The host surface changed size.
    fn resize(&mut self, _cols: u16, _rows: u16) {}
}

/// [`View`] composed from a renderer, a surface and metrics.
pub struct RenderView<S, M> {
    renderer: Renderer,
    surface: S,
    metrics: M,
    last_layout: TextLayout,
}

impl<S: Surface, M: TextMetrics> RenderView<S, M> {
    pub fn new(renderer: Renderer, surface: S, metrics: M) -> Self {
        Self {
            renderer,
            surface,
            metrics,
            last_layout: TextLayout::default(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn last_layout(&self) -> TextLayout {
        self.last_layout
    }
}

impl<S: Surface, M: TextMetrics> View for RenderView<S, M> {
    fn redraw(&mut self, buffer: &LineBuffer, scroll: &mut ScrollState) {
        match self
            .renderer
            .draw(&mut self.surface, &self.metrics, buffer, scroll)
        {
            Ok(layout) => self.last_layout = layout,
            // A failed frame leaves the session running; the next event repaints.
            Err(e) => error!(target: "render", ?e, "render_error"),
        }
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.surface.host_resized(cols, rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &str) -> LineBuffer {
        let mut b = LineBuffer::with_capacity(256);
        b.insert(text.as_bytes());
        b
    }

    #[test]
    fn empty_buffer_draws_only_cursor_at_padding() {
        let mut surface = FrameRecorder::new(12, 1);
        let mut scroll = ScrollState::new();
        Renderer::new(1)
            .draw(&mut surface, &CellMetrics::default(), &buffer(""), &mut scroll)
            .unwrap();
        assert_eq!(
            surface.last_frame().unwrap(),
            &[
                DrawOp::Clear,
                DrawOp::Cursor {
                    x: 1,
                    y: 0,
                    width: CURSOR_BAR_WIDTH,
                    height: 1
                },
                DrawOp::Present
            ]
        );
    }

    #[test]
    fn long_text_scrolls_so_cursor_stays_at_right_edge() {
        // width 12, padding 1 -> available 10
        let mut surface = FrameRecorder::new(12, 1);
        let mut scroll = ScrollState::new();
        let layout = Renderer::new(1)
            .draw(
                &mut surface,
                &CellMetrics::default(),
                &buffer("abcdefghijklmno"),
                &mut scroll,
            )
            .unwrap();
        assert_eq!(layout.total_extent, 15);
        assert_eq!(scroll.offset(), 5);
        let frame = surface.last_frame().unwrap();
        assert!(matches!(&frame[1], DrawOp::Text { x: -4, y: 0, .. }));
        assert_eq!(surface.last_cursor(), Some((11, 0)));
    }

    #[test]
    fn text_row_is_vertically_centered() {
        let mut surface = FrameRecorder::new(12, 3);
        let mut scroll = ScrollState::new();
        Renderer::new(1)
            .draw(&mut surface, &CellMetrics::default(), &buffer("x"), &mut scroll)
            .unwrap();
        // baseline = (3 + 1 - 0) / 2 = 2, top = 1
        assert_eq!(surface.last_cursor(), Some((2, 1)));
    }

    #[test]
    fn render_view_tracks_layout() {
        let mut view = RenderView::new(
            Renderer::new(1),
            FrameRecorder::new(12, 1),
            CellMetrics::default(),
        );
        let mut scroll = ScrollState::new();
        let mut b = buffer("hello");
        b.move_home();
        view.redraw(&b, &mut scroll);
        assert_eq!(
            view.last_layout(),
            TextLayout {
                cursor_extent: 0,
                total_extent: 5
            }
        );
        assert_eq!(view.surface().frames().len(), 1);
    }
}
