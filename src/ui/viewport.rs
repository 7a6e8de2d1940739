//! Viewport management for the scrolling panes.
//!
//! Each pane (source editor, rendered preview) owns a [`Viewport`] tracking
//! its scroll offset. The scroll synchronizer reads both viewports as
//! [`PaneMetrics`] and writes back clamped offsets.

use std::ops::Range;

use crate::sync::PaneMetrics;

/// Manages the visible portion of one pane.
///
/// # Example
///
/// ```
/// use tandem::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 24, 100);
/// assert_eq!(vp.visible_range(), 0..24);
///
/// vp.scroll_down(10);
/// assert_eq!(vp.visible_range(), 10..34);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// The visible line range, clamped to the document bounds.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.height as usize).min(self.total_lines);
        self.offset..end
    }

    /// Scroll geometry for the synchronizer, in line units.
    pub fn metrics(&self) -> PaneMetrics {
        #[allow(clippy::cast_precision_loss)]
        PaneMetrics::new(
            self.offset as f64,
            self.total_lines as f64,
            f64::from(self.height),
        )
    }

    /// Apply a scroll target computed by the synchronizer.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn apply_sync_target(&mut self, target: f64) {
        let target = target.round().max(0.0) as usize;
        self.offset = target.min(self.max_offset());
    }

    /// Scroll percentage (0-100) for the status bar.
    pub fn scroll_percent(&self) -> u8 {
        let max_offset = self.max_offset();
        if self.total_lines == 0 || max_offset == 0 {
            return 100;
        }
        // Percentage value always 0-100
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        {
            ((self.offset as f64 / max_offset as f64) * 100.0).round() as u8
        }
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    pub const fn page_up(&mut self) {
        self.scroll_up(self.height as usize);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.height as usize);
    }

    pub const fn go_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn go_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Put a specific line at the top of the viewport.
    pub fn go_to_line(&mut self, line: usize) {
        self.offset = line.min(self.max_offset());
    }

    /// Scroll the minimum amount needed to bring `line` into view.
    pub fn ensure_visible(&mut self, line: usize) {
        if line < self.offset {
            self.offset = line;
        } else if line >= self.offset + self.height as usize {
            self.offset = line + 1 - self.height as usize;
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the total line count (after an edit re-renders the document).
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}
