//! Window placement on the terminal screen.
//!
//! The launcher window is a fixed-size interior surrounded by a one-cell
//! border, centered on the screen. When the screen is smaller than the
//! requested window the interior shrinks to fit instead of being pushed off
//! screen.

/// Cells taken by the border on each side.
pub const BORDER: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    /// Column of the outer (border) top-left corner.
    pub x: u16,
    /// Row of the outer (border) top-left corner.
    pub y: u16,
    /// Interior width in cells.
    pub width: u16,
    /// Interior height in cells.
    pub height: u16,
}

impl WindowGeometry {
    /// Center a `width` x `height` interior (plus border) on a screen of
    /// `screen_cols` x `screen_rows`.
    pub fn centered(screen_cols: u16, screen_rows: u16, width: u16, height: u16) -> Self {
        let max_inner_w = screen_cols.saturating_sub(2 * BORDER);
        let max_inner_h = screen_rows.saturating_sub(2 * BORDER);
        let width = width.min(max_inner_w);
        let height = height.min(max_inner_h);
        let outer_w = width + 2 * BORDER;
        let outer_h = height + 2 * BORDER;
        Self {
            x: screen_cols.saturating_sub(outer_w) / 2,
            y: screen_rows.saturating_sub(outer_h) / 2,
            width,
            height,
        }
    }

    /// Screen position of interior cell (0, 0).
    pub fn interior_origin(&self) -> (u16, u16) {
        (self.x + BORDER, self.y + BORDER)
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_on_large_screen() {
        let g = WindowGeometry::centered(80, 24, 60, 1);
        assert_eq!(g.width, 60);
        assert_eq!(g.height, 1);
        assert_eq!(g.x, 9);
        assert_eq!(g.y, 10);
        assert_eq!(g.interior_origin(), (10, 11));
    }

    #[test]
    fn shrinks_to_small_screen() {
        let g = WindowGeometry::centered(20, 2, 60, 1);
        assert_eq!(g.width, 18);
        assert_eq!(g.height, 0);
        assert_eq!(g.x, 0);
        assert!(g.is_degenerate());
    }

    #[test]
    fn zero_screen_is_degenerate() {
        let g = WindowGeometry::centered(0, 0, 60, 1);
        assert!(g.is_degenerate());
        assert_eq!((g.x, g.y), (0, 0));
    }
}
