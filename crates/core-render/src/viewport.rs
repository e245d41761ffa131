//! Horizontal viewport scrolling.
//!
//! Greedy minimal-scroll policy: the offset moves only as far as needed to
//! bring the cursor back inside the visible band and never recenters.
//!
//! 1. cursor past the right edge: `offset = cursor - available`
//! 2. cursor past the left edge: `offset = cursor`
//! 3. clamp to `[0, total]`
//!
//! The offset is derived state. It is recomputed after every mutation and is
//! never authoritative on its own.

use tracing::trace;

/// Compute the next scroll offset.
pub fn recompute_scroll(offset: u32, cursor_extent: u32, total_extent: u32, available: u32) -> u32 {
    let offset = i64::from(offset);
    let cursor = i64::from(cursor_extent);
    let available = i64::from(available);
    let next = if cursor - offset > available {
        cursor - available
    } else if cursor - offset < 0 {
        cursor
    } else {
        offset
    };
    next.clamp(0, i64::from(total_extent)) as u32
}

/// Current horizontal scroll offset in extent units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    offset: u32,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }
}

/// Scroll policy bound to a display width and horizontal padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportScroller {
    pub width: u32,
    pub padding: u32,
}

impl ViewportScroller {
    pub fn new(width: u32, padding: u32) -> Self {
        Self { width, padding }
    }

    /// Width left for text between the paddings.
    pub fn available_width(&self) -> u32 {
        self.width.saturating_sub(self.padding.saturating_mul(2))
    }

    /// Update `state` for the given extents. Returns true when the offset changed.
    pub fn recompute(&self, state: &mut ScrollState, cursor_extent: u32, total_extent: u32) -> bool {
        let available = self.available_width();
        let next = recompute_scroll(state.offset, cursor_extent, total_extent, available);
        let changed = next != state.offset;
        if changed {
            trace!(
                target: "render.scroll",
                old = state.offset,
                new = next,
                cursor_extent,
                total_extent,
                available,
                "scroll_offset_changed"
            );
        }
        state.offset = next;
        changed
    }
}
