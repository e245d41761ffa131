//! Text measurement.
//!
//! All display width decisions flow through [`cluster_width`] so the extent
//! used for scrolling and the columns the terminal surface actually occupies
//! never disagree. Input is raw buffer bytes: invalid UTF-8 (for example a
//! character split by a single-byte backspace) decodes to U+FFFD and measures
//! one cell.

use core_terminal::FontHandle;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Measurement collaborator consumed by the renderer and scroller.
pub trait TextMetrics {
    /// Display width of `text`.
    fn extent(&self, text: &[u8]) -> u32;
    /// Distance from the top of a line to the baseline.
    fn ascent(&self) -> u32;
    /// Distance from the baseline to the bottom of a line.
    fn descent(&self) -> u32;
    fn line_height(&self) -> u32 {
        self.ascent() + self.descent()
    }
}

/// Cell metrics for a terminal font: one row per line, baseline at the
/// bottom of the row, widths from Unicode East Asian Width data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellMetrics {
    ambiguous_wide: bool,
}

impl CellMetrics {
    pub fn new(ambiguous_wide: bool) -> Self {
        Self { ambiguous_wide }
    }

    pub fn for_font(font: &FontHandle) -> Self {
        Self::new(font.ambiguous_wide)
    }
}

impl TextMetrics for CellMetrics {
    fn extent(&self, text: &[u8]) -> u32 {
        let decoded = String::from_utf8_lossy(text);
        decoded
            .graphemes(true)
            .map(|g| cluster_width(g, self.ambiguous_wide))
            .sum()
    }

    fn ascent(&self) -> u32 {
        1
    }

    fn descent(&self) -> u32 {
        0
    }
}

/// Columns occupied by one grapheme cluster. Clusters containing control
/// characters are never printed and occupy nothing.
pub fn cluster_width(cluster: &str, ambiguous_wide: bool) -> u32 {
    if cluster.chars().any(char::is_control) {
        return 0;
    }
    let w = if ambiguous_wide {
        cluster.width_cjk()
    } else {
        cluster.width()
    };
    w as u32
}
